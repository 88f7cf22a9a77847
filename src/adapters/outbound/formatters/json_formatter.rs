use crate::application::read_models::{HealthReport, ProjectReport};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Envelope for a single project's JSON report
#[derive(Debug, Serialize)]
struct ProjectDocument<'a> {
    generated_at: DateTime<Utc>,
    #[serde(flatten)]
    project: &'a ProjectReport,
}

/// JsonReportFormatter adapter for machine-readable reports
///
/// Serializes the read model as-is, so JSON consumers see the same
/// structure the Markdown formatter renders from.
pub struct JsonReportFormatter;

impl JsonReportFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonReportFormatter {
    fn file_extension(&self) -> &'static str {
        "json"
    }

    fn format_summary(&self, report: &HealthReport) -> Result<String> {
        Ok(serde_json::to_string_pretty(report)?)
    }

    fn format_project(&self, report: &HealthReport, project: &ProjectReport) -> Result<String> {
        let document = ProjectDocument {
            generated_at: report.generated_at,
            project,
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }
}
