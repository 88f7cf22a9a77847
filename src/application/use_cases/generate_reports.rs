use crate::application::read_models::HealthReportBuilder;
use crate::health_analysis::domain::DependencyRecord;
use crate::ports::outbound::{ProgressReporter, ReportFormatter, ReportWriter};
use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// File name of the machine-readable dataset snapshot
pub const SNAPSHOT_FILE_NAME: &str = "dependencies.json";

/// Stem of the global summary report; the formatter supplies the extension
pub const SUMMARY_REPORT_STEM: &str = "dependency_report";

/// GenerateReportsUseCase - Renders the analyzed dataset into report files
///
/// Writes one summary report, one report per distinct project and the JSON
/// snapshot of every record. Read-only with respect to the dataset. A report
/// that fails to render or write is logged and skipped; the rest still go out.
pub struct GenerateReportsUseCase {
    formatter: Box<dyn ReportFormatter>,
    writer: Arc<dyn ReportWriter>,
    progress_reporter: Arc<dyn ProgressReporter>,
}

impl GenerateReportsUseCase {
    pub fn new(
        formatter: Box<dyn ReportFormatter>,
        writer: Arc<dyn ReportWriter>,
        progress_reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            formatter,
            writer,
            progress_reporter,
        }
    }

    /// Writes every report and returns the paths that were written
    pub fn execute(&self, records: &[DependencyRecord], generated_at: DateTime<Utc>) -> Vec<PathBuf> {
        let report = HealthReportBuilder::build(records, generated_at);
        let extension = self.formatter.file_extension();
        let mut written = Vec::new();

        let summary_name = format!("{}.{}", SUMMARY_REPORT_STEM, extension);
        self.emit(&summary_name, self.formatter.format_summary(&report), &mut written);

        for project in &report.projects {
            let name = format!("{}_report.{}", project.slug, extension);
            self.emit(&name, self.formatter.format_project(&report, project), &mut written);
        }

        self.emit(SNAPSHOT_FILE_NAME, Self::snapshot(records), &mut written);

        self.progress_reporter.report(&format!(
            "📄 Wrote {} report file(s)",
            written.len()
        ));
        written
    }

    fn snapshot(records: &[DependencyRecord]) -> Result<String> {
        Ok(serde_json::to_string_pretty(records)?)
    }

    fn emit(&self, file_name: &str, rendered: Result<String>, written: &mut Vec<PathBuf>) {
        let outcome = rendered.and_then(|content| self.writer.write_report(file_name, &content));
        match outcome {
            Ok(path) => {
                info!(report = %path.display(), "Report written");
                written.push(path);
            }
            Err(e) => {
                error!(report = file_name, error = %format!("{:#}", e), "Failed to write report");
                self.progress_reporter
                    .report_error(&format!("⚠️  Failed to write {}: {}", file_name, e));
            }
        }
    }
}
