use crate::ports::outbound::ReportWriter;
use crate::shared::error::MonitorError;
use crate::shared::security::validate_write_target;
use crate::shared::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// ReportDirectoryWriter adapter for writing reports into one directory
///
/// Implements the ReportWriter port. The directory is created on first
/// write; file names must be bare names, and existing symlinks are never
/// written through.
pub struct ReportDirectoryWriter {
    report_dir: PathBuf,
}

impl ReportDirectoryWriter {
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
        }
    }

    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    fn target_path(&self, file_name: &str) -> Result<PathBuf> {
        let is_bare = Path::new(file_name)
            .file_name()
            .is_some_and(|name| name == file_name);
        if !is_bare || file_name.starts_with('.') {
            return Err(MonitorError::Validation {
                message: format!("report file name must be a plain file name, got '{}'", file_name),
            }
            .into());
        }
        Ok(self.report_dir.join(file_name))
    }
}

impl ReportWriter for ReportDirectoryWriter {
    fn write_report(&self, file_name: &str, content: &str) -> Result<PathBuf> {
        let path = self.target_path(file_name)?;
        let write_error = |details: String| MonitorError::FileWriteError {
            path: path.clone(),
            details,
        };

        fs::create_dir_all(&self.report_dir).map_err(|e| write_error(e.to_string()))?;
        validate_write_target(&path).map_err(|e| write_error(e.to_string()))?;
        fs::write(&path, content).map_err(|e| write_error(e.to_string()))?;

        info!(path = %path.display(), "Report written");
        Ok(path)
    }
}
