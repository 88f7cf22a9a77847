use crate::health_analysis::domain::PackageInfo;
use async_trait::async_trait;

/// PackageRegistry port for ecosystem registries (npm, PyPI, ...)
///
/// One implementation per registry backend; the application looks them up
/// by ecosystem tag instead of branching on the tag itself.
///
/// # Failure semantics
/// Implementations never fail. Network errors, non-2xx responses and
/// malformed payloads all degrade to [`PackageInfo::fallback`].
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Lowercase ecosystem tag this registry serves, e.g. `npm`
    fn ecosystem(&self) -> &str;

    /// Staleness threshold in days used for abandonment-risk assessment
    fn threshold_days(&self) -> u32;

    /// Fetches metadata for the latest release of `package_name`
    async fn fetch_package_info(&self, package_name: &str) -> PackageInfo;
}
