// src/config.rs
use serde::Deserialize;
use std::path::Path;

use crate::errors::{PredictError, Result};
use crate::models::FeatureOptions;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

/// High-level application configuration loaded from an optional TOML file
/// and environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Base URL of the prediction service, without a trailing slash.
    pub api_base: String,
    pub bind_address: String,
    pub port: u16,
    /// Idle page sessions older than this are dropped.
    pub session_ttl_secs: u64,
    /// Categorical values shown until the service supplies its own.
    pub fallback_options: FeatureOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            fallback_options: FeatureOptions::default(),
        }
    }
}

/// Shape of the `PREDICT_CONFIG` file. Every key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_base: Option<String>,
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub session_ttl_secs: Option<u64>,
    pub fallback_options: Option<FeatureOptions>,
}

impl FileConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable source; environment wins over the file.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let file = match lookup("PREDICT_CONFIG") {
            Some(path) => {
                log::info!("Loading configuration file {}", path);
                FileConfig::load(&path)?
            }
            None => FileConfig::default(),
        };

        let mut config = AppConfig::default();
        config.apply_file(file);

        if let Some(api_base) = lookup("PREDICT_API_BASE") {
            config.api_base = api_base;
        }
        if let Some(bind_address) = lookup("PREDICT_BIND_ADDRESS") {
            config.bind_address = bind_address;
        }
        if let Some(port) = lookup("PREDICT_PORT") {
            config.port = parse_number("PREDICT_PORT", &port)?;
        }
        if let Some(ttl) = lookup("PREDICT_SESSION_TTL_SECS") {
            config.session_ttl_secs = parse_number("PREDICT_SESSION_TTL_SECS", &ttl)?;
        }

        config.api_base = config.api_base.trim_end_matches('/').to_string();
        config.validate()?;
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(api_base) = file.api_base {
            self.api_base = api_base;
        }
        if let Some(bind_address) = file.bind_address {
            self.bind_address = bind_address;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(ttl) = file.session_ttl_secs {
            self.session_ttl_secs = ttl;
        }
        if let Some(options) = file.fallback_options {
            self.fallback_options = options;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.api_base.is_empty() {
            return Err(PredictError::Config(
                "PREDICT_API_BASE must not be empty".to_string(),
            ));
        }
        if self.fallback_options.gender_options.is_empty()
            || self.fallback_options.smoking_history_options.is_empty()
        {
            return Err(PredictError::Config(
                "Fallback option lists must not be empty".to_string(),
            ));
        }
        if self.session_ttl_secs == 0 {
            return Err(PredictError::Config(
                "PREDICT_SESSION_TTL_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| PredictError::Config(format!("{} must be a number, got '{}'", key, value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_any_variables() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.api_base, "http://127.0.0.1:5000");
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn environment_overrides_and_trims_base() {
        let config = AppConfig::from_lookup(lookup(&[
            ("PREDICT_API_BASE", "http://predictor:5000/"),
            ("PREDICT_PORT", "9000"),
            ("PREDICT_SESSION_TTL_SECS", "60"),
        ]))
        .unwrap();

        assert_eq!(config.api_base, "http://predictor:5000");
        assert_eq!(config.port, 9000);
        assert_eq!(config.session_ttl_secs, 60);
    }

    #[test]
    fn invalid_port_is_a_config_error() {
        let err = AppConfig::from_lookup(lookup(&[("PREDICT_PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, PredictError::Config(msg) if msg.contains("PREDICT_PORT")));
    }

    #[test]
    fn file_values_apply_below_environment() {
        let mut file = tempfile();
        writeln!(
            file.1,
            r#"
api_base = "http://from-file:5000"
port = 7000

[fallback_options]
gender_options = ["Female", "Male"]
smoking_history_options = ["never"]
"#
        )
        .unwrap();

        let path = file.0.to_string_lossy().to_string();
        let config = AppConfig::from_lookup(lookup(&[
            ("PREDICT_CONFIG", path.as_str()),
            ("PREDICT_PORT", "7001"),
        ]))
        .unwrap();
        std::fs::remove_file(&file.0).ok();

        assert_eq!(config.api_base, "http://from-file:5000");
        assert_eq!(config.port, 7001);
        assert_eq!(config.fallback_options.gender_options, ["Female", "Male"]);
        assert_eq!(config.fallback_options.smoking_history_options, ["never"]);
    }

    #[test]
    fn empty_fallback_list_is_rejected() {
        let file = FileConfig::parse(
            r#"
[fallback_options]
gender_options = []
smoking_history_options = ["never"]
"#,
        )
        .unwrap();
        let mut config = AppConfig::default();
        config.apply_file(file);
        assert!(matches!(config.validate(), Err(PredictError::Config(_))));
    }

    #[test]
    fn unknown_file_keys_fail_to_parse() {
        let err = FileConfig::parse("api_bsae = \"typo\"").unwrap_err();
        assert!(matches!(err, PredictError::TomlParse(_)));
    }

    #[test]
    fn missing_config_file_is_a_read_error() {
        let err = AppConfig::from_lookup(lookup(&[(
            "PREDICT_CONFIG",
            "/nonexistent/diabetes-predict.toml",
        )]))
        .unwrap_err();
        assert!(matches!(err, PredictError::FileRead(_)));
    }

    fn tempfile() -> (std::path::PathBuf, std::fs::File) {
        let path = std::env::temp_dir().join(format!("predict-config-{}.toml", uuid::Uuid::new_v4()));
        let file = std::fs::File::create(&path).unwrap();
        (path, file)
    }
}
