pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::twitter::{PublisherSettings, TwitterPublisher};
pub use config::{
    cli::LocalStorage, credentials::Credentials, lambda::LambdaConfig, toml_config::TomlConfig,
};

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use core::{engine::PulseEngine, engine::RunMode};
pub use utils::error::{PulseError, Result};
