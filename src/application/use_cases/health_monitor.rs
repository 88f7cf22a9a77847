use crate::application::run_coordinator::RunCoordinator;
use crate::application::use_cases::{AnalyzeDependenciesUseCase, GenerateReportsUseCase};
use crate::health_analysis::domain::DependencyRecord;
use crate::ports::inbound::{AnalysisControlPort, AnalysisStatus, RunSummary, StartOutcome};
use crate::ports::outbound::{DatasetStore, ProgressReporter};
use crate::shared::{Clock, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

struct MonitorInner {
    dataset: Arc<dyn DatasetStore>,
    analyzer: AnalyzeDependenciesUseCase,
    reports: GenerateReportsUseCase,
    clock: Arc<dyn Clock>,
    progress_reporter: Arc<dyn ProgressReporter>,
}

impl MonitorInner {
    /// One full run: read, analyze, write back, report
    ///
    /// Reports are generated even when writing the dataset back fails, so a
    /// run always leaves reports behind; the write error is returned after.
    async fn run(&self) -> Result<RunSummary> {
        let records = self.dataset.read_dependencies()?;
        let output = self.analyzer.execute(records).await;

        let persisted = self.dataset.write_dependencies(&output.records);
        let written = self.reports.execute(&output.records, self.clock.now());
        persisted?;

        let summary = RunSummary {
            total: output.records.len(),
            analyzed: output.analyzed,
            skipped: output.skipped,
            with_vulnerabilities: output
                .records
                .iter()
                .filter(|r| r.has_vulnerabilities())
                .count(),
            reports_written: written.len(),
        };

        info!(
            total = summary.total,
            analyzed = summary.analyzed,
            skipped = summary.skipped,
            "Analysis run finished"
        );
        self.progress_reporter.report_completion(&format!(
            "✅ Analyzed {} of {} dependencies",
            summary.analyzed, summary.total
        ));
        Ok(summary)
    }
}

/// HealthMonitor - Drives analysis runs behind the inbound control port
///
/// Synchronous triggers run on the caller's task; background triggers are
/// spawned onto the tokio runtime. Both hold the injected
/// [`RunCoordinator`]'s guard for the whole run.
pub struct HealthMonitor {
    inner: Arc<MonitorInner>,
    coordinator: RunCoordinator,
}

impl HealthMonitor {
    /// Creates a new HealthMonitor with injected dependencies
    pub fn new(
        dataset: Arc<dyn DatasetStore>,
        analyzer: AnalyzeDependenciesUseCase,
        reports: GenerateReportsUseCase,
        coordinator: RunCoordinator,
        clock: Arc<dyn Clock>,
        progress_reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            inner: Arc::new(MonitorInner {
                dataset,
                analyzer,
                reports,
                clock,
                progress_reporter,
            }),
            coordinator,
        }
    }
}

#[async_trait]
impl AnalysisControlPort for HealthMonitor {
    async fn start_analysis(&self, synchronous: bool) -> Result<StartOutcome> {
        let Some(guard) = self.coordinator.try_begin() else {
            info!("Analysis already running, ignoring trigger");
            return Ok(StartOutcome::AlreadyRunning);
        };

        if synchronous {
            let summary = self.inner.run().await;
            drop(guard);
            return summary.map(StartOutcome::Completed);
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let _guard = guard;
            if let Err(e) = inner.run().await {
                error!(error = %format!("{:#}", e), "Background analysis failed");
                inner
                    .progress_reporter
                    .report_error(&format!("❌ Background analysis failed: {}", e));
            }
        });
        Ok(StartOutcome::Started)
    }

    fn get_status(&self) -> AnalysisStatus {
        AnalysisStatus {
            analyzing: self.coordinator.is_running(),
            last_run_completed_at: self.coordinator.last_completed_at(),
        }
    }

    fn list_current_dataset(&self) -> Result<Vec<DependencyRecord>> {
        self.inner.dataset.read_dependencies()
    }
}
