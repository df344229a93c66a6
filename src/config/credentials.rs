use crate::utils::error::{PulseError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use std::fmt;

pub const API_KEY_VAR: &str = "TWITTER_API_KEY";
pub const API_SECRET_VAR: &str = "TWITTER_API_SECRET";
pub const ACCESS_TOKEN_VAR: &str = "TWITTER_ACCESS_TOKEN";
pub const ACCESS_TOKEN_SECRET_VAR: &str = "TWITTER_ACCESS_TOKEN_SECRET";

/// The four OAuth 1.0a user-context secrets.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reports every missing variable at once.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let names = [
            API_KEY_VAR,
            API_SECRET_VAR,
            ACCESS_TOKEN_VAR,
            ACCESS_TOKEN_SECRET_VAR,
        ];
        let values: Vec<Option<String>> = names
            .iter()
            .map(|name| lookup(name).filter(|value| !value.trim().is_empty()))
            .collect();

        let missing: Vec<&str> = names
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();
        if !missing.is_empty() {
            return Err(PulseError::MissingConfigError {
                field: missing.join(", "),
            });
        }

        let mut values = values.into_iter().flatten();
        let mut next = || values.next().unwrap_or_default();
        let credentials = Self::new(next(), next(), next(), next());
        credentials.validate()?;
        Ok(credentials)
    }

    /// First four characters followed by `...`, for logs.
    pub fn mask(secret: &str) -> String {
        let visible: String = secret.chars().take(4).collect();
        format!("{}...", visible)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &Self::mask(&self.api_key))
            .field("api_secret", &"<redacted>")
            .field("access_token", &Self::mask(&self.access_token))
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

impl Validate for Credentials {
    fn validate(&self) -> Result<()> {
        let fields = [
            (API_KEY_VAR, &self.api_key),
            (API_SECRET_VAR, &self.api_secret),
            (ACCESS_TOKEN_VAR, &self.access_token),
            (ACCESS_TOKEN_SECRET_VAR, &self.access_token_secret),
        ];
        for (name, value) in fields {
            validate_non_empty_string(name, value)?;
            if value.chars().any(char::is_whitespace) {
                return Err(PulseError::InvalidConfigValueError {
                    field: name.to_string(),
                    value: Self::mask(value),
                    reason: "Credential contains whitespace".to_string(),
                });
            }
        }
        Ok(())
    }
}
