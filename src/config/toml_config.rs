use crate::core::matcher::DEFAULT_TOP_N;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, SurgeError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Marine Drive, Mumbai.
pub const FALLBACK_EVENT_LATITUDE: f64 = 18.95;
pub const FALLBACK_EVENT_LONGITUDE: f64 = 72.8277;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub event: EventConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub top_n: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventConfig {
    pub default_latitude: Option<f64>,
    pub default_longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| SurgeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static pattern"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn top_n(&self) -> usize {
        self.matching.top_n.unwrap_or(DEFAULT_TOP_N)
    }

    /// Event location used when the caller does not supply one.
    pub fn default_event_location(&self) -> (f64, f64) {
        (
            self.event.default_latitude.unwrap_or(FALLBACK_EVENT_LATITUDE),
            self.event.default_longitude.unwrap_or(FALLBACK_EVENT_LONGITUDE),
        )
    }

    pub fn json_logs(&self) -> bool {
        self.logging.json.unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn registry_path(&self) -> Option<&str> {
        self.registry.path.as_deref()
    }

    fn output_path(&self) -> Option<&str> {
        self.output.path.as_deref()
    }

    fn top_n(&self) -> usize {
        TomlConfig::top_n(self)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.registry.path {
            validation::validate_path("registry.path", path)?;
            validation::validate_file_extensions(
                "registry.path",
                std::slice::from_ref(path),
                &["csv", "xlsx", "xls"],
            )?;
        }

        if let Some(top_n) = self.matching.top_n {
            validation::validate_positive_number("matching.top_n", top_n, 1)?;
        }

        if let Some(lat) = self.event.default_latitude {
            validation::validate_range("event.default_latitude", lat, -90.0, 90.0)?;
        }
        if let Some(lon) = self.event.default_longitude {
            validation::validate_range("event.default_longitude", lon, -180.0, 180.0)?;
        }

        if let Some(path) = &self.output.path {
            validation::validate_path("output.path", path)?;
        }

        if let Some(level) = &self.logging.level {
            validation::validate_non_empty_string("logging.level", level)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[registry]
path = "data/hospital_data.xlsx"

[matching]
top_n = 5

[event]
default_latitude = 19.076
default_longitude = 72.8777

[output]
path = "./reports"

[logging]
level = "debug"
json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.registry_path(), Some("data/hospital_data.xlsx"));
        assert_eq!(config.top_n(), 5);
        assert_eq!(config.default_event_location(), (19.076, 72.8777));
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.top_n(), 3);
        assert_eq!(
            config.default_event_location(),
            (FALLBACK_EVENT_LATITUDE, FALLBACK_EVENT_LONGITUDE)
        );
        assert_eq!(config.output_path(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SURGE_TEST_REGISTRY", "/srv/hospitals.csv");

        let config = TomlConfig::from_toml_str(
            r#"
[registry]
path = "${SURGE_TEST_REGISTRY}"
"#,
        )
        .unwrap();
        assert_eq!(config.registry_path(), Some("/srv/hospitals.csv"));

        std::env::remove_var("SURGE_TEST_REGISTRY");
    }

    #[test]
    fn test_config_validation() {
        let zero_top_n = TomlConfig::from_toml_str("[matching]\ntop_n = 0\n").unwrap();
        assert!(zero_top_n.validate().is_err());

        let bad_lat = TomlConfig::from_toml_str("[event]\ndefault_latitude = 123.0\n").unwrap();
        assert!(bad_lat.validate().is_err());

        let bad_registry = TomlConfig::from_toml_str("[registry]\npath = \"hospitals.txt\"\n").unwrap();
        assert!(bad_registry.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[matching\ntop_n = 3");
        assert!(matches!(
            result,
            Err(SurgeError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\npath = \"./out\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), Some("./out"));
    }
}
