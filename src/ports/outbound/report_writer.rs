use crate::shared::Result;
use std::path::PathBuf;

/// ReportWriter port for persisting rendered reports
pub trait ReportWriter: Send + Sync {
    /// Writes `content` under `file_name` and returns the full path written
    ///
    /// # Errors
    /// Returns an error if the destination is unsafe (e.g. a symlink) or
    /// the write fails
    fn write_report(&self, file_name: &str, content: &str) -> Result<PathBuf>;
}
