/// Use cases module containing application business logic orchestration
mod analyze_dependencies;
mod correlate_vulnerabilities;
mod generate_reports;
mod health_monitor;

pub use analyze_dependencies::{AnalysisOutput, AnalyzeDependenciesUseCase, DEFAULT_CONCURRENCY};
pub use correlate_vulnerabilities::VulnerabilityCorrelator;
pub use generate_reports::{GenerateReportsUseCase, SNAPSHOT_FILE_NAME, SUMMARY_REPORT_STEM};
pub use health_monitor::HealthMonitor;
