/// Mock implementations for testing
mod mock_package_registry;
mod mock_progress_reporter;
mod mock_repository_source;
mod mock_vulnerability_source;

pub use mock_package_registry::MockPackageRegistry;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_repository_source::MockRepositorySource;
pub use mock_vulnerability_source::MockVulnerabilitySource;
