pub mod cli;
pub mod credentials;
pub mod lambda;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{validate_path, Validate};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "progress-pulse")]
#[command(about = "Posts the year's progress as a chart and a short message")]
pub struct CliConfig {
    /// Compute, render and print the post without publishing it
    #[arg(long, visible_alias = "test")]
    pub dry_run: bool,

    /// Only check the TWITTER_* credentials against the API
    #[arg(long, conflicts_with = "dry_run")]
    pub check_auth: bool,

    /// Use this date (YYYY-MM-DD) instead of today
    #[arg(long, env = "PULSE_DATE")]
    pub date: Option<String>,

    /// Take "today" from UTC instead of the local timezone
    #[arg(long)]
    pub utc: bool,

    /// Optional TOML file with [chart], [message] and [publisher] sections
    #[arg(short, long, env = "PULSE_CONFIG")]
    pub config: Option<String>,

    /// Also save the rendered chart under --output-path with this file name
    #[arg(long)]
    pub save_chart: Option<String>,

    #[arg(long, default_value = ".")]
    pub output_path: String,

    /// Log CPU and memory after each phase
    #[arg(long)]
    pub monitor: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output_path", &self.output_path)?;
        if let Some(name) = &self.save_chart {
            validate_path("save_chart", name)?;
        }
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        Ok(())
    }
}
