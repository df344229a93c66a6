use crate::adapters::twitter::DEFAULT_MAX_POST_LENGTH;
use crate::core::chart::ChartRenderer;
use crate::core::message::MessageComposer;
use crate::core::progress::DateProgressCalculator;
use crate::domain::model::{ChartImage, ProgressSnapshot, RunOutcome, RunReport};
use crate::domain::ports::{Clock, Publisher, Storage};
use crate::utils::error::{PulseError, Result};
use crate::utils::monitor::SystemMonitor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Publish,
    /// Everything except the publish step.
    DryRun,
}

/// Runs calculate → compose → render → publish once.
pub struct PulseEngine<C: Clock, S: Storage> {
    calculator: DateProgressCalculator<C>,
    composer: MessageComposer,
    renderer: ChartRenderer,
    storage: S,
    publisher: Option<Box<dyn Publisher>>,
    max_post_length: usize,
    save_chart_as: Option<String>,
    monitor: SystemMonitor,
}

impl<C: Clock, S: Storage> PulseEngine<C, S> {
    pub fn new(clock: C, storage: S, composer: MessageComposer, renderer: ChartRenderer) -> Self {
        Self {
            calculator: DateProgressCalculator::new(clock),
            composer,
            renderer,
            storage,
            publisher: None,
            max_post_length: DEFAULT_MAX_POST_LENGTH,
            save_chart_as: None,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn with_publisher(mut self, publisher: Box<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn with_max_post_length(mut self, limit: usize) -> Self {
        self.max_post_length = limit;
        self
    }

    pub fn save_chart_as(mut self, file_name: impl Into<String>) -> Self {
        self.save_chart_as = Some(file_name.into());
        self
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor = SystemMonitor::new(enabled);
        self
    }

    async fn render_chart(&self, snapshot: &ProgressSnapshot) -> Result<ChartImage> {
        let renderer = self.renderer.clone();
        let snapshot = *snapshot;
        tokio::task::spawn_blocking(move || renderer.render(&snapshot))
            .await
            .map_err(|e| PulseError::render(format!("render task failed: {}", e)))?
    }

    pub async fn run(&self, mode: RunMode) -> Result<RunReport> {
        tracing::info!("🔄 Starting daily progress update ({:?})", mode);

        let snapshot = self.calculator.current()?;
        tracing::info!(
            "📊 {} progress: {:.1}% complete, {} days remaining ({} weeks)",
            snapshot.year,
            snapshot.percentage_complete,
            snapshot.days_remaining,
            snapshot.weeks_remaining
        );
        self.monitor.log_phase("Calculate");

        let composed = self.composer.compose(&snapshot);
        let original_length = composed.char_count();
        let post = composed.fit_to(self.max_post_length);
        if post.char_count() < original_length {
            tracing::warn!(
                "⚠️ Post was {} characters, truncated to {}",
                original_length,
                self.max_post_length
            );
        }
        tracing::info!("📝 Post preview:\n{}", post.text);
        self.monitor.log_phase("Compose");

        tracing::info!("🎨 Rendering progress chart...");
        let chart = self.render_chart(&snapshot).await?;
        tracing::info!("📊 Chart rendered, {} bytes", chart.len());
        self.monitor.log_phase("Render");

        let saved_chart = match &self.save_chart_as {
            Some(name) => {
                let location = self.storage.write_file(name, &chart.bytes).await?;
                tracing::info!("📁 Chart saved to {}", location);
                Some(location)
            }
            None => None,
        };

        let outcome = match mode {
            RunMode::DryRun => {
                tracing::info!("🧪 Dry run: skipping publish");
                RunOutcome::DryRun { saved_chart }
            }
            RunMode::Publish => {
                let publisher = self.publisher.as_ref().ok_or_else(|| {
                    PulseError::config("publish requested but no publisher is configured")
                })?;
                let receipt = publisher.publish(&post, &chart).await?;
                self.monitor.log_phase("Publish");
                RunOutcome::Published(receipt)
            }
        };

        self.monitor.log_final_stats();

        Ok(RunReport {
            snapshot,
            text: post.text,
            chart_bytes: chart.len(),
            outcome,
        })
    }
}
