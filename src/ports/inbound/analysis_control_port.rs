use crate::health_analysis::domain::DependencyRecord;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of the monitor's run state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnalysisStatus {
    /// Whether a run is in flight right now
    pub analyzing: bool,
    /// When the most recent run finished, if any has
    pub last_run_completed_at: Option<DateTime<Utc>>,
}

/// Counts describing a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub analyzed: usize,
    pub skipped: usize,
    pub with_vulnerabilities: usize,
    pub reports_written: usize,
}

/// Result of asking the monitor to start a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartOutcome {
    /// Synchronous run finished
    Completed(RunSummary),
    /// Background run accepted; poll [`AnalysisControlPort::get_status`]
    Started,
    /// Another run is in flight; nothing was started
    AlreadyRunning,
}

/// AnalysisControlPort - Inbound port for triggering and observing analysis runs
///
/// This is what an external control surface (CLI, HTTP dashboard, scheduler)
/// talks to. At most one run is active at a time; a trigger while a run is
/// active is answered with [`StartOutcome::AlreadyRunning`], never queued.
#[async_trait]
pub trait AnalysisControlPort: Send + Sync {
    /// Starts an analysis run
    ///
    /// # Arguments
    /// * `synchronous` - `true` to wait for the run to finish, `false` to run
    ///   it in the background and return immediately
    ///
    /// # Errors
    /// Returns an error only if a synchronous run cannot read or write the
    /// dataset. Source failures never surface here.
    async fn start_analysis(&self, synchronous: bool) -> Result<StartOutcome>;

    /// Current run state
    fn get_status(&self) -> AnalysisStatus;

    /// The dataset as currently stored
    fn list_current_dataset(&self) -> Result<Vec<DependencyRecord>>;
}
