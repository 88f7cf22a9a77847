use crate::application::factories::RegistrySelector;
use crate::application::use_cases::VulnerabilityCorrelator;
use crate::health_analysis::domain::{
    highest_severity, AbandonmentRisk, DependencyRecord, PackageInfo, RepositoryActivity,
    Vulnerability,
};
use crate::health_analysis::services::HealthScorer;
use crate::ports::outbound::{PackageRegistry, ProgressReporter, RepositoryActivitySource};
use crate::shared::Clock;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{info, warn};

/// Default number of records analyzed concurrently
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Result of analyzing a dataset
#[derive(Debug, Clone, Default)]
pub struct AnalysisOutput {
    /// Full replacement dataset, in input order
    pub records: Vec<DependencyRecord>,
    pub analyzed: usize,
    /// Records passed through unmodified (no registry, missing name/ecosystem)
    pub skipped: usize,
}

enum RecordOutcome {
    Analyzed(DependencyRecord),
    Skipped(DependencyRecord),
}

/// AnalyzeDependenciesUseCase - Runs the per-record health pipeline
///
/// For every record: registry metadata, repository activity, advisories for
/// the pinned version, then score, abandonment risk and upgrade advice are
/// merged back into the record. Records are independent, so up to
/// `concurrency` of them are in flight at once; output order matches input.
pub struct AnalyzeDependenciesUseCase {
    registries: RegistrySelector,
    activity_source: Arc<dyn RepositoryActivitySource>,
    correlator: Arc<VulnerabilityCorrelator>,
    scorer: HealthScorer,
    clock: Arc<dyn Clock>,
    progress_reporter: Arc<dyn ProgressReporter>,
    concurrency: usize,
}

impl AnalyzeDependenciesUseCase {
    /// Creates a new AnalyzeDependenciesUseCase with injected dependencies
    pub fn new(
        registries: RegistrySelector,
        activity_source: Arc<dyn RepositoryActivitySource>,
        correlator: Arc<VulnerabilityCorrelator>,
        scorer: HealthScorer,
        clock: Arc<dyn Clock>,
        progress_reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            registries,
            activity_source,
            correlator,
            scorer,
            clock,
            progress_reporter,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets how many records are analyzed concurrently (at least 1)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Analyzes every record. Never fails: per-record problems degrade to
    /// fallbacks or pass the record through.
    pub async fn execute(&self, records: Vec<DependencyRecord>) -> AnalysisOutput {
        let total = records.len();
        self.progress_reporter
            .report(&format!("🔍 Analyzing {} dependencies...", total));

        let mut outcomes = stream::iter(records)
            .map(|record| self.analyze_record(record))
            .buffered(self.concurrency);

        let mut output = AnalysisOutput {
            records: Vec::with_capacity(total),
            ..Default::default()
        };

        while let Some(outcome) = outcomes.next().await {
            let record = match outcome {
                RecordOutcome::Analyzed(record) => {
                    output.analyzed += 1;
                    record
                }
                RecordOutcome::Skipped(record) => {
                    output.skipped += 1;
                    record
                }
            };
            self.progress_reporter.report_progress(
                output.records.len() + 1,
                total,
                Some(&record.package_name),
            );
            output.records.push(record);
        }

        output
    }

    async fn analyze_record(&self, record: DependencyRecord) -> RecordOutcome {
        if record.package_name.trim().is_empty() || record.ecosystem.trim().is_empty() {
            warn!(
                project = %record.project,
                "Skipping record with missing package name or ecosystem"
            );
            return RecordOutcome::Skipped(record);
        }

        let Some(registry) = self.registries.select(&record.ecosystem) else {
            warn!(
                package = %record.package_name,
                ecosystem = %record.ecosystem,
                "No registry configured for ecosystem, passing record through"
            );
            return RecordOutcome::Skipped(record);
        };

        RecordOutcome::Analyzed(self.analyze_with(registry.as_ref(), record).await)
    }

    async fn analyze_with(
        &self,
        registry: &dyn PackageRegistry,
        record: DependencyRecord,
    ) -> DependencyRecord {
        let package_info = registry.fetch_package_info(&record.package_name).await;

        let activity = match package_info.repository_url.as_deref() {
            Some(url) => self.activity_source.fetch_repository_activity(url).await,
            None => None,
        };

        let vulnerabilities = self
            .correlator
            .check(&record.ecosystem, &record.package_name, &record.version)
            .await;

        let safe_upgrade_version = self
            .correlator
            .advise_upgrade(
                &record.ecosystem,
                &record.package_name,
                &record.version,
                &package_info.latest_version,
                &vulnerabilities,
            )
            .await;

        let now = self.clock.now();
        let assessment = Assessment {
            health_score: self.scorer.score(&package_info, activity.as_ref(), now),
            abandonment_risk: self.scorer.assess_abandonment_risk(
                &package_info,
                activity.as_ref(),
                registry.threshold_days(),
                now,
            ),
            safe_upgrade_version,
        };

        let merged = merge(record, package_info, activity.as_ref(), &vulnerabilities, assessment);
        info!(
            package = %merged.package_name,
            ecosystem = %merged.ecosystem,
            score = merged.health_score.unwrap_or_default(),
            vulnerabilities = vulnerabilities.len(),
            "Analyzed dependency"
        );
        merged
    }
}

/// Values derived by the scorer and advisor for one record
struct Assessment {
    health_score: u8,
    abandonment_risk: AbandonmentRisk,
    safe_upgrade_version: Option<String>,
}

/// Folds fetched data into the record. Input fields the sources have no
/// value for (license, repository URL) are kept.
fn merge(
    mut record: DependencyRecord,
    package_info: PackageInfo,
    activity: Option<&RepositoryActivity>,
    vulnerabilities: &[Vulnerability],
    assessment: Assessment,
) -> DependencyRecord {
    record.needs_update = Some(package_info.latest_version != record.version);
    record.latest_version = Some(package_info.latest_version);
    record.last_updated = package_info.last_published;
    record.health_score = Some(assessment.health_score);
    record.abandonment_risk = Some(assessment.abandonment_risk);

    if package_info.repository_url.is_some() {
        record.repository_url = package_info.repository_url;
    }

    let source_license = package_info
        .license
        .or_else(|| activity.and_then(|a| a.license.clone()));
    if source_license.is_some() {
        record.license = source_license;
    }

    record.has_vulnerabilities = Some(!vulnerabilities.is_empty());
    record.vulnerability_count = Some(vulnerabilities.len() as u32);
    record.vulnerability_details = vulnerabilities.iter().map(Vulnerability::to_detail).collect();
    record.highest_severity = Some(highest_severity(vulnerabilities));
    record.safe_upgrade_version = assessment.safe_upgrade_version;

    record
}
