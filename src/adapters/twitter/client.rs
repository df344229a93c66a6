use super::oauth::OAuth1Signer;
use super::PublisherSettings;
use crate::config::credentials::Credentials;
use crate::domain::model::{ChartImage, ComposedPost, PublishReceipt};
use crate::domain::ports::Publisher;
use crate::utils::error::{PulseError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use std::future::Future;

#[derive(Debug, Deserialize)]
struct AccountResponse {
    screen_name: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    followers_count: u64,
}

#[derive(Debug, Deserialize)]
struct MediaResponse {
    media_id_string: String,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CreatePostResponse {
    data: CreatedPost,
}

/// Maps a non-success status to the error taxonomy.
pub fn classify_status(status: StatusCode, body: &str) -> PulseError {
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string()
    } else {
        body.trim().chars().take(300).collect()
    };

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PulseError::AuthError {
            status: status.as_u16(),
            message,
        },
        StatusCode::TOO_MANY_REQUESTS => PulseError::TransientPublishError {
            message: format!("rate limited: {}", message),
        },
        s if s.is_server_error() => PulseError::TransientPublishError {
            message: format!("HTTP {}: {}", s.as_u16(), message),
        },
        s => PulseError::PublishError {
            status: s.as_u16(),
            message,
        },
    }
}

async fn checked<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(classify_status(status, &body));
    }
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

pub struct TwitterPublisher {
    client: Client,
    signer: OAuth1Signer,
    settings: PublisherSettings,
}

impl TwitterPublisher {
    pub fn new(credentials: Credentials, settings: PublisherSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(concat!("progress-pulse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            signer: OAuth1Signer::new(credentials),
            settings,
        })
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.settings.api_base.trim_end_matches('/'), path)
    }

    fn upload_url(&self, path: &str) -> String {
        format!("{}{}", self.settings.upload_base.trim_end_matches('/'), path)
    }

    /// Runs `call`, and once more after the retry delay if it failed transiently.
    async fn with_retry<T, F, Fut>(&self, operation: &str, mut call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match call().await {
            Err(error) if error.is_transient() => {
                tracing::warn!(
                    "⚠️ {} failed ({}), retrying once in {:?}",
                    operation,
                    error,
                    self.settings.retry_delay
                );
                tokio::time::sleep(self.settings.retry_delay).await;
                call().await
            }
            other => other,
        }
    }

    async fn fetch_account(&self) -> Result<AccountResponse> {
        let url = self.api_url("/1.1/account/verify_credentials.json");
        tracing::debug!("Verifying credentials at {}", url);
        let response = self
            .client
            .get(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                self.signer.authorization_header("GET", &url, &[]),
            )
            .send()
            .await?;
        checked(response).await
    }

    async fn upload_media(&self, chart: &ChartImage) -> Result<String> {
        let url = self.upload_url("/1.1/media/upload.json");
        let part = Part::bytes(chart.bytes.clone())
            .file_name(chart.file_name.clone())
            .mime_str(chart.mime)?;
        let form = Form::new().part("media", part);

        tracing::debug!("Uploading {} bytes to {}", chart.len(), url);
        let response = self
            .client
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                self.signer.authorization_header("POST", &url, &[]),
            )
            .multipart(form)
            .send()
            .await?;
        let media: MediaResponse = checked(response).await?;
        Ok(media.media_id_string)
    }

    async fn create_post(&self, text: &str, media_id: &str) -> Result<String> {
        let url = self.api_url("/2/tweets");
        let body = serde_json::json!({
            "text": text,
            "media": { "media_ids": [media_id] },
        });

        let response = self
            .client
            .post(&url)
            .header(
                reqwest::header::AUTHORIZATION,
                self.signer.authorization_header("POST", &url, &[]),
            )
            .json(&body)
            .send()
            .await?;
        let created: CreatePostResponse = checked(response).await?;
        Ok(created.data.id)
    }
}

#[async_trait::async_trait]
impl Publisher for TwitterPublisher {
    async fn verify(&self) -> Result<String> {
        let account = self
            .with_retry("credential check", || self.fetch_account())
            .await?;
        tracing::info!(
            "👤 Authenticated as @{} ({}), {} followers",
            account.screen_name,
            account.name,
            account.followers_count
        );
        Ok(account.screen_name)
    }

    /// Verify, upload and post are each retried at most once, so a run waits
    /// at most three retry delays.
    async fn publish(&self, post: &ComposedPost, chart: &ChartImage) -> Result<PublishReceipt> {
        let screen_name = self.verify().await?;

        tracing::info!("📤 Uploading progress chart ({} bytes)", chart.len());
        let media_id = self
            .with_retry("media upload", || self.upload_media(chart))
            .await?;
        tracing::info!("✅ Chart uploaded, media id {}", media_id);

        tracing::info!("🐦 Submitting post ({} characters)", post.char_count());
        let post_id = self
            .with_retry("post submission", || self.create_post(&post.text, &media_id))
            .await?;

        let url = format!("{}/{}/status/{}", self.settings.web_base, screen_name, post_id);
        tracing::info!("✅ Posted {}", url);

        Ok(PublishReceipt {
            post_id,
            screen_name,
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, ""),
            PulseError::AuthError { status: 401, .. }
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, "{\"detail\":\"read-only app\"}"),
            PulseError::AuthError { status: 403, .. }
        ));
        assert!(classify_status(StatusCode::TOO_MANY_REQUESTS, "").is_transient());
        assert!(classify_status(StatusCode::BAD_GATEWAY, "").is_transient());
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, "duplicate content"),
            PulseError::PublishError { status: 400, .. }
        ));
    }

    #[test]
    fn test_classify_status_uses_reason_for_empty_body() {
        match classify_status(StatusCode::UNAUTHORIZED, "  ") {
            PulseError::AuthError { message, .. } => assert_eq!(message, "Unauthorized"),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
