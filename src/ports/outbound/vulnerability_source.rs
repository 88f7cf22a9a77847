use crate::health_analysis::domain::Vulnerability;
use crate::shared::Result;
use async_trait::async_trait;

/// VulnerabilitySource port for an OSV-style advisory service
///
/// Unlike the registry ports this one does surface errors, so the caller
/// can decide not to cache a failed lookup.
#[async_trait]
pub trait VulnerabilitySource: Send + Sync {
    /// Queries advisories affecting one package version
    ///
    /// # Arguments
    /// * `ecosystem` - Ecosystem name in the advisory database's own taxonomy (e.g. `PyPI`)
    /// * `package_name` - Name of the package
    /// * `version` - Installed version
    ///
    /// # Errors
    /// Returns an error if the request fails or the response cannot be parsed
    async fn query(
        &self,
        ecosystem: &str,
        package_name: &str,
        version: &str,
    ) -> Result<Vec<Vulnerability>>;
}
