pub mod dependency_record;
pub mod ecosystem;
pub mod package_info;
pub mod repository;
pub mod risk;
pub mod vulnerability;

pub use dependency_record::{DependencyRecord, HEALTHY_SCORE_FLOOR};
pub use ecosystem::{normalize_ecosystem, osv_ecosystem};
pub use package_info::{parse_timestamp, PackageInfo, UNKNOWN_VERSION};
pub use repository::{RepositoryActivity, RepositoryRef};
pub use risk::AbandonmentRisk;
pub use vulnerability::{highest_severity, CvssScore, Severity, Vulnerability, VulnerabilityDetail};
