use crate::adapters::outbound::cache::FileCache;
use crate::adapters::outbound::filesystem::{CsvDatasetStore, ReportDirectoryWriter};
use crate::adapters::outbound::network::{
    build_http_client, GitHubClient, NpmRegistry, OsvClient, PyPiRegistry, NPM_ECOSYSTEM,
    PYPI_ECOSYSTEM,
};
use crate::application::factories::{FormatterFactory, RegistrySelector};
use crate::application::run_coordinator::RunCoordinator;
use crate::application::use_cases::{
    AnalyzeDependenciesUseCase, GenerateReportsUseCase, HealthMonitor, VulnerabilityCorrelator,
};
use crate::config::{AppConfig, EcosystemConfig};
use crate::health_analysis::domain::normalize_ecosystem;
use crate::health_analysis::services::HealthScorer;
use crate::ports::outbound::{CacheStore, PackageRegistry, ProgressReporter};
use crate::shared::{Clock, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Factory wiring a [`HealthMonitor`] from configuration
///
/// The one place that knows which adapter backs which port. Everything
/// below it receives trait objects.
pub struct MonitorFactory;

impl MonitorFactory {
    /// Builds the monitor and all of its adapters
    ///
    /// # Errors
    /// Returns an error only if the HTTP client cannot be constructed
    pub fn create(
        config: &AppConfig,
        clock: Arc<dyn Clock>,
        progress_reporter: Arc<dyn ProgressReporter>,
    ) -> Result<HealthMonitor> {
        let client = build_http_client(std::time::Duration::from_secs(
            config.analysis.request_timeout_secs,
        ))?;

        let source_cache: Arc<dyn CacheStore> = Arc::new(FileCache::new(
            &config.cache.path,
            ttl_from_secs(config.cache.ttl),
            config.cache.enabled,
            clock.clone(),
        ));
        let advisory_cache: Arc<dyn CacheStore> = Arc::new(FileCache::new(
            &config.cache.path,
            ttl_from_secs(config.security.cache_ttl),
            config.cache.enabled,
            clock.clone(),
        ));

        let registries = Self::create_registries(config, &client, &source_cache);

        let activity_source = Arc::new(GitHubClient::new(
            client.clone(),
            config.github.api_url.clone(),
            config.github.resolve_token(),
            config.github.enabled,
            source_cache,
        ));

        let correlator = Arc::new(VulnerabilityCorrelator::new(
            Arc::new(OsvClient::new(client, config.security.osv_api_url.clone())),
            advisory_cache,
            config.security.enabled,
        ));

        let analyzer = AnalyzeDependenciesUseCase::new(
            registries,
            activity_source,
            correlator,
            HealthScorer::new(config.health_metrics.clone()),
            clock.clone(),
            progress_reporter.clone(),
        )
        .with_concurrency(config.analysis.concurrency);

        let reports = GenerateReportsUseCase::new(
            FormatterFactory::create(config.output.report_format),
            Arc::new(ReportDirectoryWriter::new(&config.output.report_dir)),
            progress_reporter.clone(),
        );

        Ok(HealthMonitor::new(
            Arc::new(CsvDatasetStore::new(&config.data_source.path)),
            analyzer,
            reports,
            RunCoordinator::new(clock.clone()),
            clock,
            progress_reporter,
        ))
    }

    /// One registry per enabled ecosystem that has a client implementation
    pub fn create_registries(
        config: &AppConfig,
        client: &reqwest::Client,
        cache: &Arc<dyn CacheStore>,
    ) -> RegistrySelector {
        let mut selector = RegistrySelector::new();

        for (tag, ecosystem) in &config.ecosystems {
            if !ecosystem.enabled {
                debug!(ecosystem = %tag, "Ecosystem disabled in config");
                continue;
            }
            match Self::create_registry(tag, ecosystem, client, cache) {
                Some(registry) => selector.register(registry),
                None => warn!(
                    ecosystem = %tag,
                    "No registry client for configured ecosystem, its records will be skipped"
                ),
            }
        }

        selector
    }

    fn create_registry(
        tag: &str,
        ecosystem: &EcosystemConfig,
        client: &reqwest::Client,
        cache: &Arc<dyn CacheStore>,
    ) -> Option<Arc<dyn PackageRegistry>> {
        let normalized = normalize_ecosystem(tag);
        let registry: Arc<dyn PackageRegistry> = match normalized.as_str() {
            NPM_ECOSYSTEM => Arc::new(NpmRegistry::new(
                client.clone(),
                ecosystem
                    .registry_url
                    .as_deref()
                    .unwrap_or(NpmRegistry::DEFAULT_REGISTRY_URL),
                ecosystem.threshold_days,
                cache.clone(),
            )),
            PYPI_ECOSYSTEM => Arc::new(PyPiRegistry::new(
                client.clone(),
                ecosystem
                    .registry_url
                    .as_deref()
                    .unwrap_or(PyPiRegistry::DEFAULT_REGISTRY_URL),
                ecosystem.threshold_days,
                cache.clone(),
            )),
            _ => return None,
        };
        Some(registry)
    }
}

/// Cache TTL from configured seconds, saturating instead of overflowing
fn ttl_from_secs(secs: u64) -> chrono::Duration {
    i64::try_from(secs)
        .ok()
        .and_then(chrono::Duration::try_seconds)
        .unwrap_or(chrono::Duration::MAX)
}
