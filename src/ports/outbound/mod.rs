/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (registries, caches, file system, console).
pub mod cache_store;
pub mod dataset_store;
pub mod package_registry;
pub mod progress_reporter;
pub mod report_formatter;
pub mod report_writer;
pub mod repository_activity_source;
pub mod vulnerability_source;

pub use cache_store::{cached_or_fetch, read_cached, write_cached, CacheStore};
pub use dataset_store::DatasetStore;
pub use package_registry::PackageRegistry;
pub use progress_reporter::ProgressReporter;
pub use report_formatter::ReportFormatter;
pub use report_writer::ReportWriter;
pub use repository_activity_source::RepositoryActivitySource;
pub use vulnerability_source::VulnerabilitySource;
