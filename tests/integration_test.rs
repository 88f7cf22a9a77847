/// Integration tests for the application layer
mod test_utilities;

use chrono::{TimeZone, Utc};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use test_utilities::mocks::*;
use dep_health::prelude::*;

const DATASET: &str = "\
project,ecosystem,package_name,version,license
Web App,npm,express,4.18.2,
Web App,npm,left-pad,1.3.0,WTFPL
api,pypi,flask,2.0.0,BSD-3-Clause
api,cargo,serde,1.0.0,MIT
";

const EXPRESS_REPO: &str = "https://github.com/expressjs/express";
const LEFT_PAD_REPO: &str = "https://github.com/left-pad/left-pad";

struct Harness {
    dir: TempDir,
    monitor: HealthMonitor,
    registry: Arc<MockPackageRegistry>,
    advisories: Arc<MockVulnerabilitySource>,
    progress: MockProgressReporter,
}

impl Harness {
    fn new(advisories: MockVulnerabilitySource) -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("dependencies.csv"), DATASET).unwrap();

        let clock: Arc<dyn Clock> = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        ));
        let progress = MockProgressReporter::new();
        let progress_port: Arc<dyn ProgressReporter> = Arc::new(progress.clone());

        let registry = Arc::new(
            MockPackageRegistry::new("npm")
                .with_package(
                    "express",
                    "4.19.2",
                    "2024-05-22T00:00:00Z",
                    Some(EXPRESS_REPO),
                    6,
                )
                .with_package(
                    "left-pad",
                    "1.3.0",
                    "2018-04-09T00:00:00Z",
                    Some(LEFT_PAD_REPO),
                    1,
                ),
        );
        let pypi = Arc::new(MockPackageRegistry::new("pypi").with_package(
            "flask",
            "3.0.3",
            "2024-04-01T00:00:00Z",
            None,
            1,
        ));
        let activity = MockRepositorySource::new()
            .with_activity(
                EXPRESS_REPO,
                RepositoryActivity {
                    stars: 60_000,
                    forks: 12_000,
                    contributors_count: 300,
                    commit_frequency: 12.0,
                    ..Default::default()
                },
            )
            .with_archived(LEFT_PAD_REPO);

        let advisories = Arc::new(advisories);
        let cache: Arc<dyn CacheStore> =
            Arc::new(InMemoryCache::new(chrono::Duration::hours(24), clock.clone()));

        let analyzer = AnalyzeDependenciesUseCase::new(
            RegistrySelector::new()
                .with(registry.clone())
                .with(pypi),
            Arc::new(activity),
            Arc::new(VulnerabilityCorrelator::new(advisories.clone(), cache, true)),
            HealthScorer::default(),
            clock.clone(),
            progress_port.clone(),
        )
        .with_concurrency(2);

        let reports = GenerateReportsUseCase::new(
            Box::new(MarkdownReportFormatter::new()),
            Arc::new(ReportDirectoryWriter::new(dir.path().join("reports"))),
            progress_port.clone(),
        );

        let monitor = HealthMonitor::new(
            Arc::new(CsvDatasetStore::new(dir.path().join("dependencies.csv"))),
            analyzer,
            reports,
            RunCoordinator::new(clock.clone()),
            clock,
            progress_port,
        );

        Self {
            dir,
            monitor,
            registry,
            advisories,
            progress,
        }
    }

    fn path(&self, relative: &str) -> std::path::PathBuf {
        self.dir.path().join(relative)
    }

    fn record(&self, name: &str) -> DependencyRecord {
        self.monitor
            .list_current_dataset()
            .unwrap()
            .into_iter()
            .find(|r| r.package_name == name)
            .unwrap()
    }
}

fn flask_advisories() -> MockVulnerabilitySource {
    MockVulnerabilitySource::new().with_advisory(
        "flask",
        "2.0.0",
        "GHSA-m2qf-hxjv-5gpq",
        Severity::High,
        "2.2.5",
    )
}

async fn run_sync(monitor: &HealthMonitor) -> RunSummary {
    match monitor.start_analysis(true).await.unwrap() {
        StartOutcome::Completed(summary) => summary,
        other => panic!("expected a completed run, got {:?}", other),
    }
}

#[tokio::test]
async fn test_full_run_augments_dataset_in_place() {
    let harness = Harness::new(flask_advisories());

    let summary = run_sync(&harness.monitor).await;

    assert_eq!(summary.total, 4);
    assert_eq!(summary.analyzed, 3);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.with_vulnerabilities, 1);

    let records = harness.monitor.list_current_dataset().unwrap();
    let names: Vec<&str> = records.iter().map(|r| r.package_name.as_str()).collect();
    assert_eq!(names, vec!["express", "left-pad", "flask", "serde"]);
}

#[tokio::test]
async fn test_run_keeps_unknown_dataset_columns() {
    let harness = Harness::new(MockVulnerabilitySource::new());
    fs::write(
        harness.path("dependencies.csv"),
        "project,ecosystem,package_name,version,license,team\n\
         web,npm,express,4.18.2,MIT,core\n",
    )
    .unwrap();

    run_sync(&harness.monitor).await;

    let express = harness.record("express");
    assert!(express.is_analyzed());
    assert_eq!(
        express.extra_columns,
        vec![("team".to_string(), "core".to_string())]
    );

    let written = fs::read_to_string(harness.path("dependencies.csv")).unwrap();
    let mut lines = written.lines();
    assert!(lines.next().unwrap().ends_with(",highest_severity,team"));
    assert!(lines.next().unwrap().ends_with(",core"));
}

#[tokio::test]
async fn test_active_package_scores_high_with_low_risk() {
    let harness = Harness::new(MockVulnerabilitySource::new());
    run_sync(&harness.monitor).await;

    let express = harness.record("express");
    assert_eq!(express.latest_version.as_deref(), Some("4.19.2"));
    assert_eq!(express.needs_update, Some(true));
    assert_eq!(express.health_score, Some(95));
    assert_eq!(express.abandonment_risk, Some(AbandonmentRisk::Low));
    assert_eq!(express.repository_url.as_deref(), Some(EXPRESS_REPO));
    assert_eq!(express.license.as_deref(), Some("MIT"));
    assert_eq!(express.has_vulnerabilities, Some(false));
    assert_eq!(express.safe_upgrade_version, None);
}

#[tokio::test]
async fn test_archived_repository_is_critical() {
    let harness = Harness::new(MockVulnerabilitySource::new());
    run_sync(&harness.monitor).await;

    let left_pad = harness.record("left-pad");
    assert_eq!(left_pad.abandonment_risk, Some(AbandonmentRisk::Critical));
    assert_eq!(left_pad.needs_update, Some(false));
    assert!(left_pad.health_score.unwrap() < 70);
}

#[tokio::test]
async fn test_vulnerable_package_gets_safe_upgrade() {
    let harness = Harness::new(flask_advisories());
    run_sync(&harness.monitor).await;

    let flask = harness.record("flask");
    assert_eq!(flask.has_vulnerabilities, Some(true));
    assert_eq!(flask.vulnerability_count, Some(1));
    assert_eq!(flask.highest_severity, Some(Severity::High));
    assert_eq!(flask.vulnerability_details[0].id, "GHSA-m2qf-hxjv-5gpq");
    assert_eq!(flask.vulnerability_details[0].fixed_versions, vec!["2.2.5"]);
    assert_eq!(flask.safe_upgrade_version.as_deref(), Some("3.0.3"));
    assert_eq!(flask.health_score, Some(25));
}

#[tokio::test]
async fn test_latest_with_same_advisories_is_not_recommended() {
    let advisories = flask_advisories().with_advisory(
        "flask",
        "3.0.3",
        "GHSA-m2qf-hxjv-5gpq",
        Severity::High,
        "3.1.0",
    );
    let harness = Harness::new(advisories);
    run_sync(&harness.monitor).await;

    assert_eq!(harness.record("flask").safe_upgrade_version, None);
}

#[tokio::test]
async fn test_unsupported_ecosystem_passes_through_unchanged() {
    let harness = Harness::new(MockVulnerabilitySource::new());
    run_sync(&harness.monitor).await;

    let serde = harness.record("serde");
    assert_eq!(serde, DependencyRecord::new("api", "cargo", "serde", "1.0.0").with_license("MIT"));
    assert!(!serde.is_analyzed());
}

#[tokio::test]
async fn test_failing_advisory_source_degrades_to_no_vulnerabilities() {
    let harness = Harness::new(MockVulnerabilitySource::with_failure());

    let summary = run_sync(&harness.monitor).await;

    assert_eq!(summary.analyzed, 3);
    assert_eq!(summary.with_vulnerabilities, 0);
    let flask = harness.record("flask");
    assert_eq!(flask.has_vulnerabilities, Some(false));
    assert_eq!(flask.latest_version.as_deref(), Some("3.0.3"));
}

#[tokio::test]
async fn test_second_run_reuses_cached_advisories() {
    let harness = Harness::new(flask_advisories());

    run_sync(&harness.monitor).await;
    // express, left-pad and flask at their pinned versions, plus flask's latest
    assert_eq!(harness.advisories.call_count(), 4);
    assert_eq!(harness.registry.call_count(), 2);

    run_sync(&harness.monitor).await;
    assert_eq!(harness.advisories.call_count(), 4);
    assert_eq!(harness.registry.call_count(), 4);
}

#[tokio::test]
async fn test_reports_written_per_project() {
    let harness = Harness::new(flask_advisories());

    let summary = run_sync(&harness.monitor).await;
    assert_eq!(summary.reports_written, 4);

    let reports = harness.path("reports");
    for name in [
        "dependency_report.md",
        "web_app_report.md",
        "api_report.md",
        "dependencies.json",
    ] {
        assert!(reports.join(name).exists(), "missing {}", name);
    }

    let overview = fs::read_to_string(reports.join("dependency_report.md")).unwrap();
    assert!(overview.contains("GHSA-m2qf-hxjv-5gpq"));
    assert!(overview.contains("left-pad"));

    let snapshot: Vec<DependencyRecord> =
        serde_json::from_str(&fs::read_to_string(reports.join("dependencies.json")).unwrap())
            .unwrap();
    assert_eq!(snapshot, harness.monitor.list_current_dataset().unwrap());
}

#[tokio::test]
async fn test_background_run_reports_progress_and_finishes() {
    let harness = Harness::new(MockVulnerabilitySource::new());

    assert_eq!(
        harness.monitor.start_analysis(false).await.unwrap(),
        StartOutcome::Started
    );
    for _ in 0..200 {
        if !harness.monitor.get_status().analyzing {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    let status = harness.monitor.get_status();
    assert!(!status.analyzing);
    assert!(status.last_run_completed_at.is_some());
    assert!(harness.record("express").is_analyzed());
    assert!(harness
        .progress
        .get_messages()
        .iter()
        .any(|m| m.starts_with("Progress: 4/4")));
    assert!(harness.progress.errors().is_empty());
}

#[tokio::test]
async fn test_missing_dataset_yields_empty_run() {
    let harness = Harness::new(MockVulnerabilitySource::new());
    fs::remove_file(harness.path("dependencies.csv")).unwrap();

    let summary = run_sync(&harness.monitor).await;

    assert_eq!(summary.total, 0);
    assert!(harness.path("reports/dependency_report.md").exists());
}
