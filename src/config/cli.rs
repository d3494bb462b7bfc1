use crate::config::toml_config::TomlConfig;
use crate::config::RunSettings;
use crate::domain::model::SeverityLevel;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "surge-readiness")]
#[command(about = "Match a crowd-safety event to hospitals with spare capacity and prepare alerts")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Hospital registry export (.csv or .xlsx)
    #[arg(long)]
    pub registry: Option<String>,

    /// Crowd status from the behavior classifier (Calm, Dispersing, Aggressive, Stampede, ...)
    #[arg(long)]
    pub severity: String,

    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Crowd event CSV; the last row's Latitude/Longitude locates the event
    #[arg(long)]
    pub event_file: Option<String>,

    /// Number of hospitals to alert
    #[arg(long)]
    pub top_n: Option<usize>,

    /// Directory where surge_report.json is written
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long, help = "Print the dispatch report as JSON")]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    /// Loads and validates `--config`; without one, every setting is defaulted.
    pub fn load_file_config(&self) -> Result<TomlConfig> {
        match &self.config {
            Some(path) => {
                let config = TomlConfig::from_file(path)?;
                config.validate()?;
                Ok(config)
            }
            None => Ok(TomlConfig::default()),
        }
    }

    /// Command line values win over the file; the event location falls back
    /// from `--lat/--lon` to the event file, then to the configured default.
    pub fn resolve(&self, file: &TomlConfig) -> Result<RunSettings> {
        let (default_lat, default_lon) = file.default_event_location();

        let from_event_file = match &self.event_file {
            Some(path) => crate::adapters::event_file::last_event_location_from_path(
                std::path::Path::new(path),
            )?,
            None => None,
        };

        let (latitude, longitude) = match (self.lat, self.lon, from_event_file) {
            (Some(lat), Some(lon), _) => (lat, lon),
            (lat, lon, Some(location)) => (
                lat.unwrap_or(location.latitude()),
                lon.unwrap_or(location.longitude()),
            ),
            (lat, lon, None) => (lat.unwrap_or(default_lat), lon.unwrap_or(default_lon)),
        };

        Ok(RunSettings {
            registry_path: self.registry.clone().or_else(|| file.registry.path.clone()),
            severity: SeverityLevel::parse(&self.severity),
            latitude,
            longitude,
            top_n: self.top_n.unwrap_or_else(|| file.top_n()),
            output_path: self.output_path.clone().or_else(|| file.output.path.clone()),
            json_output: self.json,
            verbose: self.verbose,
            log_level: file.logging.level.clone(),
            json_logs: file.json_logs(),
        })
    }
}
