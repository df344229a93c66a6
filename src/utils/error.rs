use thiserror::Error;

#[derive(Error, Debug)]
pub enum PulseError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Clock unavailable: {message}")]
    ClockError { message: String },

    #[error("Chart rendering failed: {message}")]
    RenderError { message: String },

    #[error("Authentication rejected (HTTP {status}): {message}")]
    AuthError { status: u16, message: String },

    #[error("Transient publish failure: {message}")]
    TransientPublishError { message: String },

    #[error("Post rejected (HTTP {status}): {message}")]
    PublishError { status: u16, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Clock,
    Rendering,
    Authentication,
    Network,
    Publishing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Retryable failure that survived its retry
    Medium,
    High,
    Critical,
}

impl PulseError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::RenderError {
            message: message.into(),
        }
    }

    /// Whether the publisher may retry the failed call once.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::TransientPublishError { .. } => true,
            Self::HttpError(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::ClockError { .. } => ErrorCategory::Clock,
            Self::RenderError { .. } => ErrorCategory::Rendering,
            Self::AuthError { .. } => ErrorCategory::Authentication,
            Self::TransientPublishError { .. } | Self::HttpError(_) => ErrorCategory::Network,
            Self::PublishError { .. } | Self::SerializationError(_) => ErrorCategory::Publishing,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        if self.is_transient() {
            return ErrorSeverity::Medium;
        }
        match self.category() {
            ErrorCategory::Configuration | ErrorCategory::Authentication | ErrorCategory::Clock => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::High,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the TWITTER_* environment variables and the --config file"
            }
            ErrorCategory::Clock => "Check the system clock or pass --date YYYY-MM-DD",
            ErrorCategory::Rendering => {
                "Install a sans-serif system font, or disable chart labels in [chart]"
            }
            ErrorCategory::Authentication => {
                "Regenerate the access token and make sure the app has read and write permissions"
            }
            ErrorCategory::Network => "The service is busy or unreachable; the next scheduled run will retry",
            ErrorCategory::Publishing => "Inspect the response above; the post content was rejected",
            ErrorCategory::System => "Check file permissions for the chart output directory",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingConfigError { field } => format!("Missing required setting: {}", field),
            Self::AuthError { .. } => "Authentication with the posting service failed".to_string(),
            Self::TransientPublishError { .. } => {
                "The posting service is temporarily unavailable".to_string()
            }
            Self::RenderError { .. } => "Could not render the progress chart".to_string(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PulseError>;
