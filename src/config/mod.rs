#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::TomlConfig;

use crate::core::ConfigProvider;
use crate::domain::model::SeverityLevel;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

/// Fully merged settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub registry_path: Option<String>,
    pub severity: SeverityLevel,
    pub latitude: f64,
    pub longitude: f64,
    pub top_n: usize,
    pub output_path: Option<String>,
    pub json_output: bool,
    pub verbose: bool,
    pub log_level: Option<String>,
    pub json_logs: bool,
}

impl ConfigProvider for RunSettings {
    fn registry_path(&self) -> Option<&str> {
        self.registry_path.as_deref()
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }

    fn top_n(&self) -> usize {
        self.top_n
    }
}

impl Validate for RunSettings {
    fn validate(&self) -> Result<()> {
        let registry = validation::validate_required_field("registry", &self.registry_path)?;
        validation::validate_path("registry", registry)?;
        validation::validate_file_extensions(
            "registry",
            std::slice::from_ref(registry),
            &["csv", "xlsx", "xls"],
        )?;
        validation::validate_positive_number("top_n", self.top_n, 1)?;
        if let Some(output) = &self.output_path {
            validation::validate_path("output_path", output)?;
        }
        Ok(())
    }
}
