pub mod client;
pub mod oauth;

pub use client::TwitterPublisher;

use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.twitter.com";
pub const DEFAULT_UPLOAD_BASE: &str = "https://upload.twitter.com";
pub const DEFAULT_WEB_BASE: &str = "https://twitter.com";
pub const DEFAULT_MAX_POST_LENGTH: usize = 280;

#[derive(Debug, Clone)]
pub struct PublisherSettings {
    pub api_base: String,
    pub upload_base: String,
    /// Used to build the link to the published post.
    pub web_base: String,
    pub request_timeout: Duration,
    pub retry_delay: Duration,
    pub max_post_length: usize,
}

impl Default for PublisherSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            upload_base: DEFAULT_UPLOAD_BASE.to_string(),
            web_base: DEFAULT_WEB_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            retry_delay: Duration::from_secs(15),
            max_post_length: DEFAULT_MAX_POST_LENGTH,
        }
    }
}

impl PublisherSettings {
    /// Points both API hosts at one base URL, e.g. a local mock server.
    pub fn with_base_url(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            api_base: base.clone(),
            upload_base: base,
            ..Self::default()
        }
    }
}
