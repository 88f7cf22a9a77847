use crate::application::read_models::{HealthReport, ProjectReport};
use crate::shared::Result;

/// ReportFormatter port for rendering the health read model
///
/// Implementations render the same read model into different formats
/// (Markdown, JSON).
pub trait ReportFormatter: Send + Sync {
    /// File extension (without dot) for reports in this format
    fn file_extension(&self) -> &'static str;

    /// Renders the global summary report
    fn format_summary(&self, report: &HealthReport) -> Result<String>;

    /// Renders one project's report
    fn format_project(&self, report: &HealthReport, project: &ProjectReport) -> Result<String>;
}
