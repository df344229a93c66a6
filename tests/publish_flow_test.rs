use anyhow::Result;
use httpmock::prelude::*;
use progress_pulse::core::{ChartRenderer, ChartStyle, FixedClock, MessageComposer};
use progress_pulse::domain::model::RunOutcome;
use progress_pulse::domain::ports::Publisher;
use progress_pulse::{
    Credentials, LocalStorage, PublisherSettings, PulseEngine, PulseError, RunMode,
    TwitterPublisher,
};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

const VERIFY_PATH: &str = "/1.1/account/verify_credentials.json";
const UPLOAD_PATH: &str = "/1.1/media/upload.json";
const POST_PATH: &str = "/2/tweets";

fn publisher_for(server: &MockServer) -> TwitterPublisher {
    let settings = PublisherSettings {
        web_base: "https://x.example".to_string(),
        retry_delay: Duration::ZERO,
        ..PublisherSettings::with_base_url(server.base_url())
    };
    let credentials = Credentials::new("key", "secret", "token", "token-secret");
    TwitterPublisher::new(credentials, settings).unwrap()
}

fn engine_for(date: &str, output: &TempDir) -> PulseEngine<FixedClock, LocalStorage> {
    let style = ChartStyle {
        width: 480,
        height: 320,
        draw_labels: false,
        ..ChartStyle::default()
    };
    PulseEngine::new(
        FixedClock::parse(date).unwrap(),
        LocalStorage::new(output.path().display().to_string()),
        MessageComposer::default(),
        ChartRenderer::new(style),
    )
}

async fn mock_verify(server: &MockServer, status: u16) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path(VERIFY_PATH)
                .header_exists("authorization");
            if status == 200 {
                then.status(200).json_body(json!({
                    "screen_name": "pulse_bot",
                    "name": "Progress Pulse",
                    "followers_count": 42
                }));
            } else {
                then.status(status)
                    .json_body(json!({ "errors": [{ "code": 89, "message": "Invalid or expired token." }] }));
            }
        })
        .await
}

async fn mock_upload(server: &MockServer, status: u16) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(UPLOAD_PATH)
                .header_exists("authorization")
                .body_contains("name=\"media\"");
            if status == 200 {
                then.status(200)
                    .json_body(json!({ "media_id": 9001, "media_id_string": "9001" }));
            } else {
                then.status(status).body("Service Unavailable");
            }
        })
        .await
}

async fn mock_post(server: &MockServer, status: u16) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path(POST_PATH)
                .header_exists("authorization")
                .body_contains("\"media_ids\":[\"9001\"]")
                .body_contains("33.7%");
            if status == 201 {
                then.status(201)
                    .json_body(json!({ "data": { "id": "1790000000000000001", "text": "..." } }));
            } else {
                then.status(status)
                    .json_body(json!({ "title": "Too Many Requests", "status": status }));
            }
        })
        .await
}

#[tokio::test]
async fn test_publish_flow_uploads_chart_then_posts() -> Result<()> {
    let server = MockServer::start_async().await;
    let verify = mock_verify(&server, 200).await;
    let upload = mock_upload(&server, 200).await;
    let post = mock_post(&server, 201).await;

    let output = TempDir::new()?;
    let engine = engine_for("2023-05-03", &output)
        .with_publisher(Box::new(publisher_for(&server)))
        .save_chart_as("chart.png");

    let report = engine.run(RunMode::Publish).await?;

    verify.assert_async().await;
    upload.assert_async().await;
    post.assert_async().await;

    match report.outcome {
        RunOutcome::Published(receipt) => {
            assert_eq!(receipt.post_id, "1790000000000000001");
            assert_eq!(receipt.screen_name, "pulse_bot");
            assert_eq!(
                receipt.url,
                "https://x.example/pulse_bot/status/1790000000000000001"
            );
        }
        other => panic!("expected a published post, got {:?}", other),
    }
    assert!(output.path().join("chart.png").exists());
    Ok(())
}

#[tokio::test]
async fn test_server_errors_are_retried_once() -> Result<()> {
    let server = MockServer::start_async().await;
    let _verify = mock_verify(&server, 200).await;
    let upload = mock_upload(&server, 503).await;
    let post = mock_post(&server, 201).await;

    let output = TempDir::new()?;
    let engine = engine_for("2023-05-03", &output).with_publisher(Box::new(publisher_for(&server)));

    let error = engine.run(RunMode::Publish).await.unwrap_err();

    assert!(matches!(error, PulseError::TransientPublishError { .. }));
    assert_eq!(error.exit_code(), 2);
    upload.assert_hits_async(2).await;
    post.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_rate_limited_post_is_transient() -> Result<()> {
    let server = MockServer::start_async().await;
    let _verify = mock_verify(&server, 200).await;
    let _upload = mock_upload(&server, 200).await;
    let post = mock_post(&server, 429).await;

    let output = TempDir::new()?;
    let engine = engine_for("2023-05-03", &output).with_publisher(Box::new(publisher_for(&server)));

    let error = engine.run(RunMode::Publish).await.unwrap_err();

    assert!(error.is_transient());
    assert_eq!(error.exit_code(), 2);
    post.assert_hits_async(2).await;
    Ok(())
}

#[tokio::test]
async fn test_rejected_credentials_are_not_retried() -> Result<()> {
    let server = MockServer::start_async().await;
    let verify = mock_verify(&server, 401).await;
    let upload = mock_upload(&server, 200).await;

    let output = TempDir::new()?;
    let engine = engine_for("2023-05-03", &output).with_publisher(Box::new(publisher_for(&server)));

    let error = engine.run(RunMode::Publish).await.unwrap_err();

    match &error {
        PulseError::AuthError { status, message } => {
            assert_eq!(*status, 401);
            assert!(message.contains("Invalid or expired token"));
        }
        other => panic!("expected an auth error, got {:?}", other),
    }
    assert_eq!(error.exit_code(), 3);
    verify.assert_hits_async(1).await;
    upload.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_verify_only_checks_credentials() -> Result<()> {
    let server = MockServer::start_async().await;
    let verify = mock_verify(&server, 200).await;
    let upload = mock_upload(&server, 200).await;

    let screen_name = publisher_for(&server).verify().await?;

    assert_eq!(screen_name, "pulse_bot");
    verify.assert_async().await;
    upload.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_dry_run_saves_chart_without_network_calls() -> Result<()> {
    let server = MockServer::start_async().await;
    let verify = mock_verify(&server, 200).await;
    let upload = mock_upload(&server, 200).await;
    let post = mock_post(&server, 201).await;

    let output = TempDir::new()?;
    let engine = engine_for("2023-05-03", &output)
        .with_publisher(Box::new(publisher_for(&server)))
        .save_chart_as("charts/preview.png");

    let report = engine.run(RunMode::DryRun).await?;

    verify.assert_hits_async(0).await;
    upload.assert_hits_async(0).await;
    post.assert_hits_async(0).await;

    let saved = output.path().join("charts/preview.png");
    assert_eq!(
        report.outcome,
        RunOutcome::DryRun {
            saved_chart: Some(saved.display().to_string())
        }
    );
    let bytes = std::fs::read(&saved)?;
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    assert_eq!(bytes.len(), report.chart_bytes);
    assert!(report.text.contains("242 days"));
    Ok(())
}
