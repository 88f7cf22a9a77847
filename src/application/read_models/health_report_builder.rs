//! Builder for constructing HealthReport from analyzed records

use super::health_report::{
    DependencyView, HealthReport, ProjectReport, ReportSummary, VulnerabilityView,
};
use crate::health_analysis::domain::{DependencyRecord, Severity};
use crate::shared::security::file_slug;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Builds the report read model. Pure: reads the records, never changes them.
pub struct HealthReportBuilder;

impl HealthReportBuilder {
    pub fn build(records: &[DependencyRecord], generated_at: DateTime<Utc>) -> HealthReport {
        let views: Vec<DependencyView> = records.iter().map(Self::build_view).collect();

        let mut vulnerability_listing: Vec<VulnerabilityView> = views
            .iter()
            .flat_map(|v| v.vulnerabilities.iter().cloned())
            .collect();
        // Stable sort keeps dataset order within a severity
        vulnerability_listing.sort_by(|a, b| b.severity.cmp(&a.severity));

        let select = |predicate: fn(&DependencyRecord) -> bool| -> Vec<DependencyView> {
            records
                .iter()
                .zip(&views)
                .filter(|(record, _)| predicate(record))
                .map(|(_, view)| view.clone())
                .collect()
        };

        HealthReport {
            generated_at,
            summary: Self::summarize(records.iter()),
            vulnerable: select(DependencyRecord::has_vulnerabilities),
            high_risk: select(DependencyRecord::is_high_risk),
            outdated: select(DependencyRecord::needs_update),
            vulnerability_listing,
            projects: Self::build_projects(records, &views),
        }
    }

    /// Counts for any subset of records
    pub fn summarize<'a, I>(records: I) -> ReportSummary
    where
        I: IntoIterator<Item = &'a DependencyRecord>,
    {
        let mut summary = ReportSummary::default();
        for record in records {
            summary.total += 1;
            if !record.is_analyzed() {
                summary.unanalyzed += 1;
            }
            if record.needs_update() {
                summary.needing_update += 1;
            }
            if record.is_high_risk() {
                summary.high_risk += 1;
            }
            if record.is_healthy() {
                summary.healthy += 1;
            }
            if record.has_vulnerabilities() {
                summary.with_vulnerabilities += 1;
                for detail in &record.vulnerability_details {
                    match detail.severity {
                        Severity::Critical => summary.critical_vulnerabilities += 1,
                        Severity::High => summary.high_vulnerabilities += 1,
                        _ => {}
                    }
                }
            }
        }
        summary
    }

    /// One report per distinct project, in first-seen order
    ///
    /// Slugs are unique across the report: a project whose slug is already
    /// taken gets `_2`, `_3`, ... appended.
    fn build_projects(records: &[DependencyRecord], views: &[DependencyView]) -> Vec<ProjectReport> {
        let mut taken: HashSet<String> = HashSet::new();
        let mut order: Vec<&str> = Vec::new();
        for record in records {
            if !order.contains(&record.project.as_str()) {
                order.push(&record.project);
            }
        }

        order
            .into_iter()
            .map(|project| {
                let members: Vec<(&DependencyRecord, &DependencyView)> = records
                    .iter()
                    .zip(views)
                    .filter(|(record, _)| record.project == project)
                    .collect();

                ProjectReport {
                    project: project.to_string(),
                    slug: unique_slug(project, &mut taken),
                    summary: Self::summarize(members.iter().map(|(record, _)| *record)),
                    records: members.into_iter().map(|(_, view)| view.clone()).collect(),
                }
            })
            .collect()
    }

    fn build_view(record: &DependencyRecord) -> DependencyView {
        let vulnerabilities = record
            .vulnerability_details
            .iter()
            .map(|detail| VulnerabilityView {
                project: record.project.clone(),
                package_name: record.package_name.clone(),
                version: record.version.clone(),
                id: detail.id.clone(),
                summary: detail.summary.clone(),
                severity: detail.severity,
                fixed_versions: detail.fixed_versions.clone(),
                reference: detail.references.first().cloned(),
            })
            .collect();

        DependencyView {
            project: record.project.clone(),
            ecosystem: record.ecosystem.clone(),
            package_name: record.package_name.clone(),
            version: record.version.clone(),
            latest_version: record.latest_version.clone(),
            health_score: record.health_score,
            abandonment_risk: record.abandonment_risk,
            license: record.license.clone(),
            vulnerability_count: record
                .vulnerability_count
                .unwrap_or(record.vulnerability_details.len() as u32),
            highest_severity: record.highest_severity,
            safe_upgrade_version: record.safe_upgrade_version.clone(),
            vulnerabilities,
        }
    }
}

fn unique_slug(project: &str, taken: &mut HashSet<String>) -> String {
    let base = file_slug(project);
    let mut slug = base.clone();
    let mut suffix = 2;
    while taken.contains(&slug) {
        slug = format!("{}_{}", base, suffix);
        suffix += 1;
    }
    taken.insert(slug.clone());
    slug
}
