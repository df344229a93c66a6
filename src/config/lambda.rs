use crate::config::toml_config::TomlConfig;
use crate::utils::error::{PulseError, Result};
use crate::utils::validation::{validate_path, Validate};
use std::env;

/// Settings for the scheduled serverless entry point, read from the
/// function's environment.
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub dry_run: bool,
    pub config_path: Option<String>,
    /// Directory for a saved chart copy (`/tmp` is the only writable path).
    pub chart_dir: Option<String>,
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(PulseError::InvalidConfigValueError {
            field: name.to_string(),
            value: value.to_string(),
            reason: "Expected true or false".to_string(),
        }),
    }
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dry_run = match lookup("PULSE_DRY_RUN") {
            Some(value) => parse_flag("PULSE_DRY_RUN", &value)?,
            None => false,
        };

        Ok(Self {
            dry_run,
            config_path: lookup("PULSE_CONFIG").filter(|v| !v.trim().is_empty()),
            chart_dir: lookup("PULSE_CHART_DIR").filter(|v| !v.trim().is_empty()),
        })
    }

    pub fn load_toml(&self) -> Result<TomlConfig> {
        match &self.config_path {
            Some(path) => TomlConfig::from_file(path),
            None => Ok(TomlConfig::default()),
        }
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config_path {
            validate_path("PULSE_CONFIG", path)?;
        }
        if let Some(dir) = &self.chart_dir {
            validate_path("PULSE_CHART_DIR", dir)?;
        }
        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
