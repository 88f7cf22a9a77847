use crate::health_analysis::domain::{osv_ecosystem, Vulnerability};
use crate::health_analysis::services::UpgradeAdvisor;
use crate::ports::outbound::{cached_or_fetch, CacheStore, VulnerabilitySource};
use std::sync::Arc;
use tracing::debug;

/// VulnerabilityCorrelator - Cross-references dependencies with an advisory source
///
/// Maps ecosystem tags to the advisory database's taxonomy, caches every
/// (ecosystem, package, version) lookup and degrades failures to "no known
/// vulnerabilities". Also decides whether the latest release is a safer
/// upgrade target.
pub struct VulnerabilityCorrelator {
    source: Arc<dyn VulnerabilitySource>,
    cache: Arc<dyn CacheStore>,
    enabled: bool,
}

impl VulnerabilityCorrelator {
    /// Creates a new VulnerabilityCorrelator
    ///
    /// # Arguments
    /// * `source` - Advisory source to query
    /// * `cache` - Cache for query results, usually with a longer TTL than registry data
    /// * `enabled` - When false every check returns an empty list without querying
    pub fn new(
        source: Arc<dyn VulnerabilitySource>,
        cache: Arc<dyn CacheStore>,
        enabled: bool,
    ) -> Self {
        Self {
            source,
            cache,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Known vulnerabilities affecting `package_name` at `version`
    ///
    /// Unmapped ecosystems, a disabled scanner and source failures all yield
    /// an empty list.
    pub async fn check(
        &self,
        ecosystem: &str,
        package_name: &str,
        version: &str,
    ) -> Vec<Vulnerability> {
        self.lookup(ecosystem, package_name, version)
            .await
            .unwrap_or_default()
    }

    /// Like [`check`](Self::check) but `None` when the source failed
    async fn lookup(
        &self,
        ecosystem: &str,
        package_name: &str,
        version: &str,
    ) -> Option<Vec<Vulnerability>> {
        if !self.enabled {
            return Some(Vec::new());
        }

        let Some(osv_eco) = osv_ecosystem(ecosystem) else {
            debug!(ecosystem, package = %package_name, "Ecosystem not covered by advisory source");
            return Some(Vec::new());
        };

        let key = format!("vuln_{}_{}_{}", osv_eco, package_name, version);
        cached_or_fetch(
            self.cache.as_ref(),
            &key,
            self.source.query(osv_eco, package_name, version),
        )
        .await
    }

    /// Latest version if it is a strictly safer target than `current`
    ///
    /// Queries the current version's advisories first; see
    /// [`advise_upgrade`](Self::advise_upgrade) when they are already known.
    pub async fn recommend_safe_upgrade(
        &self,
        ecosystem: &str,
        package_name: &str,
        current: &str,
        latest: &str,
    ) -> Option<String> {
        let current_vulns = self.check(ecosystem, package_name, current).await;
        self.advise_upgrade(ecosystem, package_name, current, latest, &current_vulns)
            .await
    }

    /// Same decision as [`recommend_safe_upgrade`](Self::recommend_safe_upgrade),
    /// reusing advisories already fetched for `current`
    ///
    /// The latest version is only queried when that lookup could change the
    /// outcome.
    pub async fn advise_upgrade(
        &self,
        ecosystem: &str,
        package_name: &str,
        current: &str,
        latest: &str,
        current_vulns: &[Vulnerability],
    ) -> Option<String> {
        if !UpgradeAdvisor::worth_checking(current, latest, current_vulns) {
            return None;
        }

        // An unanswered lookup is not evidence that latest is clean
        let Some(latest_vulns) = self.lookup(ecosystem, package_name, latest).await else {
            debug!(package = %package_name, latest, "Advisories for latest unavailable, no upgrade advice");
            return None;
        };
        UpgradeAdvisor::recommend(current, latest, current_vulns, &latest_vulns)
    }
}
