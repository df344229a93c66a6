use crate::adapters::twitter::PublisherSettings;
use crate::core::chart::ChartStyle;
use crate::core::message::DEFAULT_HASHTAGS;
use crate::utils::error::{PulseError, Result};
use crate::utils::validation::{
    parse_hex_color, validate_non_empty_string, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Optional `pulse.toml`: chart look, hashtags and publisher tuning.
/// Every section and field may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default)]
    pub message: MessageConfig,
    #[serde(default)]
    pub publisher: PublisherConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartConfig {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub completed_color: Option<String>,
    pub remaining_color: Option<String>,
    pub edge_color: Option<String>,
    pub background_color: Option<String>,
    pub plot_background_color: Option<String>,
    pub text_color: Option<String>,
    pub watermark: Option<String>,
    pub labels: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageConfig {
    pub hashtags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PublisherConfig {
    pub api_base: Option<String>,
    pub upload_base: Option<String>,
    pub web_base: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub retry_delay_seconds: Option<u64>,
    pub max_post_length: Option<usize>,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PulseError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PulseError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| PulseError::config(format!("invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn chart_style(&self) -> Result<ChartStyle> {
        let defaults = ChartStyle::default();
        let chart = &self.chart;
        let color = |field: &str, value: &Option<String>, fallback: (u8, u8, u8)| match value {
            Some(hex) => parse_hex_color(field, hex),
            None => Ok(fallback),
        };

        Ok(ChartStyle {
            width: chart.width.unwrap_or(defaults.width),
            height: chart.height.unwrap_or(defaults.height),
            completed: color("chart.completed_color", &chart.completed_color, defaults.completed)?,
            remaining: color("chart.remaining_color", &chart.remaining_color, defaults.remaining)?,
            edge: color("chart.edge_color", &chart.edge_color, defaults.edge)?,
            background: color(
                "chart.background_color",
                &chart.background_color,
                defaults.background,
            )?,
            plot_background: color(
                "chart.plot_background_color",
                &chart.plot_background_color,
                defaults.plot_background,
            )?,
            text: color("chart.text_color", &chart.text_color, defaults.text)?,
            watermark: chart.watermark.clone().unwrap_or(defaults.watermark),
            draw_labels: chart.labels.unwrap_or(defaults.draw_labels),
        })
    }

    pub fn hashtags(&self) -> Vec<String> {
        self.message.hashtags.clone().unwrap_or_else(|| {
            DEFAULT_HASHTAGS.iter().map(|tag| tag.to_string()).collect()
        })
    }

    pub fn publisher_settings(&self) -> PublisherSettings {
        let defaults = PublisherSettings::default();
        let publisher = &self.publisher;
        PublisherSettings {
            api_base: publisher.api_base.clone().unwrap_or(defaults.api_base),
            upload_base: publisher.upload_base.clone().unwrap_or(defaults.upload_base),
            web_base: publisher.web_base.clone().unwrap_or(defaults.web_base),
            request_timeout: publisher
                .timeout_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            retry_delay: publisher
                .retry_delay_seconds
                .map(Duration::from_secs)
                .unwrap_or(defaults.retry_delay),
            max_post_length: publisher.max_post_length.unwrap_or(defaults.max_post_length),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        let style = self.chart_style()?;
        validate_range("chart.width", style.width, 200, 4096)?;
        validate_range("chart.height", style.height, 150, 4096)?;
        if let Some(watermark) = &self.chart.watermark {
            validate_non_empty_string("chart.watermark", watermark)?;
        }

        for tag in self.hashtags() {
            let bare = tag.trim_start_matches('#');
            if bare.is_empty() || bare.chars().any(char::is_whitespace) {
                return Err(PulseError::InvalidConfigValueError {
                    field: "message.hashtags".to_string(),
                    value: tag,
                    reason: "Hashtags must be a single non-empty word".to_string(),
                });
            }
        }

        let publisher = self.publisher_settings();
        validate_url("publisher.api_base", &publisher.api_base)?;
        validate_url("publisher.upload_base", &publisher.upload_base)?;
        validate_url("publisher.web_base", &publisher.web_base)?;
        validate_range(
            "publisher.timeout_seconds",
            publisher.request_timeout.as_secs(),
            1,
            300,
        )?;
        validate_range(
            "publisher.retry_delay_seconds",
            publisher.retry_delay.as_secs(),
            0,
            900,
        )?;
        validate_range("publisher.max_post_length", publisher.max_post_length, 40, 25_000)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.chart_style().unwrap(), ChartStyle::default());
        assert_eq!(config.hashtags().len(), DEFAULT_HASHTAGS.len());
        assert_eq!(config.publisher_settings().max_post_length, 280);
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = TomlConfig::from_toml_str(
            r##"
[chart]
width = 800
height = 600
completed_color = "#FF0000"
labels = false

[message]
hashtags = ["#DailyProgress", "Rust"]

[publisher]
api_base = "http://127.0.0.1:9000"
retry_delay_seconds = 0
max_post_length = 500
"##,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        let style = config.chart_style().unwrap();
        assert_eq!((style.width, style.height), (800, 600));
        assert_eq!(style.completed, (255, 0, 0));
        assert_eq!(style.remaining, ChartStyle::default().remaining);
        assert!(!style.draw_labels);

        assert_eq!(config.hashtags(), vec!["#DailyProgress", "Rust"]);

        let publisher = config.publisher_settings();
        assert_eq!(publisher.api_base, "http://127.0.0.1:9000");
        assert_eq!(publisher.upload_base, "https://upload.twitter.com");
        assert_eq!(publisher.retry_delay, Duration::ZERO);
        assert_eq!(publisher.max_post_length, 500);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_color = TomlConfig::from_toml_str("[chart]\ncompleted_color = \"blue\"").unwrap();
        assert!(bad_color.validate().is_err());

        let tiny = TomlConfig::from_toml_str("[chart]\nwidth = 10").unwrap();
        assert!(tiny.validate().is_err());

        let bad_tag = TomlConfig::from_toml_str("[message]\nhashtags = [\"two words\"]").unwrap();
        assert!(bad_tag.validate().is_err());

        let bad_url = TomlConfig::from_toml_str("[publisher]\napi_base = \"ftp://x\"").unwrap();
        assert!(bad_url.validate().is_err());
    }

    #[test]
    fn test_unknown_keys_fail_to_parse() {
        assert!(TomlConfig::from_toml_str("[chart]\ncolour = \"#FFFFFF\"").is_err());
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("PULSE_TEST_WATERMARK", "MyBot");
        let config = TomlConfig::from_toml_str(
            "[chart]\nwatermark = \"${PULSE_TEST_WATERMARK}\"\n[publisher]\nweb_base = \"${PULSE_TEST_UNSET_VAR}\"",
        )
        .unwrap();
        assert_eq!(config.chart.watermark.as_deref(), Some("MyBot"));
        assert_eq!(
            config.publisher.web_base.as_deref(),
            Some("${PULSE_TEST_UNSET_VAR}")
        );
    }
}
