use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes allow CI systems to distinguish between different
/// types of failures and successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Analysis completed
    Success = 0,
    /// Vulnerable dependencies found and `--fail-on-vulnerabilities` was set
    VulnerabilitiesDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Configuration, dataset or output error
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::VulnerabilitiesDetected => write!(f, "Vulnerabilities Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// User-facing errors of the dependency health monitor.
///
/// Only configuration problems abort a run; the remaining variants surface
/// from the dataset boundary and report output.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Config file not found: {path}\n\n💡 Hint: Pass --config <PATH> or create config/config.yaml")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid configuration: {path}\nDetails: {details}\n\n💡 Hint: Compare your file with config/config.example.yaml")]
    ConfigInvalid { path: PathBuf, details: String },

    #[error("Failed to read dependency dataset: {path}\nDetails: {details}\n\n💡 Hint: The CSV needs at least the columns project, ecosystem, package_name, version, license")]
    DatasetReadError { path: PathBuf, details: String },

    #[error("Failed to write dependency dataset: {path}\nDetails: {details}")]
    DatasetWriteError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory is writable")]
    FileWriteError { path: PathBuf, details: String },

    /// Validation error for value objects
    #[error("Validation error: {message}")]
    Validation { message: String },
}
