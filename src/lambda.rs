use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use progress_pulse::core::{ChartRenderer, Clock, FixedClock, MessageComposer, SystemClock};
use progress_pulse::domain::model::{ProgressSnapshot, PublishReceipt, RunOutcome, RunReport};
use progress_pulse::utils::{logger, validation::Validate};
use progress_pulse::{
    Credentials, LambdaConfig, LocalStorage, PulseEngine, RunMode, TwitterPublisher,
};
use serde::{Deserialize, Serialize};

/// Scheduled events usually carry an empty payload; both fields are overrides.
#[derive(Debug, Default, Deserialize)]
pub struct Request {
    pub dry_run: Option<bool>,
    pub date: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Response {
    pub message: String,
    /// The post as published, or as it would have been on a dry run.
    pub text: String,
    pub snapshot: ProgressSnapshot,
    pub receipt: Option<PublishReceipt>,
}

impl From<RunReport> for Response {
    fn from(report: RunReport) -> Self {
        let (message, receipt) = match report.outcome {
            RunOutcome::Published(receipt) => ("Progress update published", Some(receipt)),
            RunOutcome::DryRun { .. } => ("Dry run completed, nothing published", None),
        };
        Self {
            message: message.to_string(),
            text: report.text,
            snapshot: report.snapshot,
            receipt,
        }
    }
}

fn boxed(e: progress_pulse::PulseError) -> Error {
    tracing::error!(
        "❌ Progress update failed: {} (Category: {:?})",
        e,
        e.category()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    Box::new(e)
}

async fn function_handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    tracing::info!("Starting progress-pulse Lambda function");

    let lambda_config = LambdaConfig::from_env().map_err(boxed)?;
    lambda_config.validate().map_err(boxed)?;
    let toml = lambda_config.load_toml().map_err(boxed)?;
    toml.validate().map_err(boxed)?;

    let dry_run = event.payload.dry_run.unwrap_or(lambda_config.dry_run);
    let clock: Box<dyn Clock> = match &event.payload.date {
        Some(date) => Box::new(FixedClock::parse(date).map_err(boxed)?),
        None => Box::new(SystemClock::utc()),
    };

    let settings = toml.publisher_settings();
    let storage = LocalStorage::new(
        lambda_config
            .chart_dir
            .clone()
            .unwrap_or_else(|| "/tmp".to_string()),
    );
    let mut engine = PulseEngine::new(
        clock,
        storage,
        MessageComposer::new(toml.hashtags()),
        ChartRenderer::new(toml.chart_style().map_err(boxed)?),
    )
    .with_max_post_length(settings.max_post_length);

    if lambda_config.chart_dir.is_some() {
        engine = engine.save_chart_as("year_progress_chart.png");
    }

    let mode = if dry_run {
        RunMode::DryRun
    } else {
        let credentials = Credentials::from_env().map_err(boxed)?;
        let publisher = TwitterPublisher::new(credentials, settings).map_err(boxed)?;
        engine = engine.with_publisher(Box::new(publisher));
        RunMode::Publish
    };

    let report = engine.run(mode).await.map_err(boxed)?;

    tracing::info!("progress-pulse Lambda function completed successfully");
    Ok(Response::from(report))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    run(service_fn(function_handler)).await
}
