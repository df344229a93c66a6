use clap::Parser;
use progress_pulse::core::{ChartRenderer, Clock, FixedClock, MessageComposer, SystemClock};
use progress_pulse::domain::model::RunOutcome;
use progress_pulse::domain::ports::Publisher;
use progress_pulse::utils::{logger, validation::Validate};
use progress_pulse::{
    CliConfig, Credentials, LocalStorage, PulseEngine, PulseError, Result, RunMode, TomlConfig,
    TwitterPublisher,
};

fn load_toml(config: &CliConfig) -> Result<TomlConfig> {
    let toml = match &config.config {
        Some(path) => {
            tracing::info!("📄 Loading configuration from {}", path);
            TomlConfig::from_file(path)?
        }
        None => TomlConfig::default(),
    };
    toml.validate()?;
    Ok(toml)
}

fn select_clock(config: &CliConfig) -> Result<Box<dyn Clock>> {
    match &config.date {
        Some(date) => {
            tracing::info!("📅 Using fixed date {}", date);
            Ok(Box::new(FixedClock::parse(date)?))
        }
        None if config.utc => Ok(Box::new(SystemClock::utc())),
        None => Ok(Box::new(SystemClock::local())),
    }
}

async fn run(config: CliConfig) -> Result<()> {
    config.validate()?;
    let toml = load_toml(&config)?;
    let settings = toml.publisher_settings();

    if config.check_auth {
        let publisher = TwitterPublisher::new(Credentials::from_env()?, settings)?;
        let screen_name = publisher.verify().await?;
        println!("✅ Credentials are valid for @{}", screen_name);
        return Ok(());
    }

    if config.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let max_post_length = settings.max_post_length;
    let mut engine = PulseEngine::new(
        select_clock(&config)?,
        LocalStorage::new(config.output_path.clone()),
        MessageComposer::new(toml.hashtags()),
        ChartRenderer::new(toml.chart_style()?),
    )
    .with_max_post_length(max_post_length)
    .with_monitoring(config.monitor);

    if let Some(name) = &config.save_chart {
        engine = engine.save_chart_as(name.clone());
    }

    let mode = if config.dry_run {
        RunMode::DryRun
    } else {
        let publisher = TwitterPublisher::new(Credentials::from_env()?, settings)?;
        engine = engine.with_publisher(Box::new(publisher));
        RunMode::Publish
    };

    let report = engine.run(mode).await?;

    match report.outcome {
        RunOutcome::Published(receipt) => {
            tracing::info!("✅ Daily progress update completed successfully!");
            println!("✅ Posted {}", receipt.url);
        }
        RunOutcome::DryRun { saved_chart } => {
            println!("🧪 Dry run, nothing was published. Post text:\n");
            println!("{}\n", report.text);
            println!(
                "📊 Chart: {} bytes, {:.1}% of {} complete",
                report.chart_bytes, report.snapshot.percentage_complete, report.snapshot.year
            );
            if let Some(path) = saved_chart {
                println!("📁 Chart saved to: {}", path);
            }
        }
    }

    Ok(())
}

fn report_failure(e: &PulseError) -> i32 {
    tracing::error!(
        "❌ Progress update failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    e.exit_code()
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting progress-pulse");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(config).await {
        std::process::exit(report_failure(&e));
    }
}
