//! Health report read model
//!
//! A denormalized, render-ready projection of the analyzed dataset. Both
//! the Markdown and JSON formatters consume this one structure.

use crate::health_analysis::domain::{AbandonmentRisk, Severity};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Top-level report over the whole dataset
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub generated_at: DateTime<Utc>,
    pub summary: ReportSummary,
    /// Records with at least one known vulnerability
    pub vulnerable: Vec<DependencyView>,
    /// Records at High or Critical abandonment risk
    pub high_risk: Vec<DependencyView>,
    /// Records whose latest version differs from the pinned one
    pub outdated: Vec<DependencyView>,
    /// Every vulnerability across the dataset, most severe first
    pub vulnerability_listing: Vec<VulnerabilityView>,
    pub projects: Vec<ProjectReport>,
}

/// Counts shown at the top of every report
///
/// Records that were never analyzed still count toward `total` and
/// `unanalyzed` but never toward the score-based buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub needing_update: usize,
    pub high_risk: usize,
    pub with_vulnerabilities: usize,
    pub healthy: usize,
    pub unanalyzed: usize,
    pub critical_vulnerabilities: usize,
    pub high_vulnerabilities: usize,
}

/// One project's slice of the dataset
#[derive(Debug, Clone, Serialize)]
pub struct ProjectReport {
    pub project: String,
    /// File-name-safe form of `project`
    pub slug: String,
    pub summary: ReportSummary,
    pub records: Vec<DependencyView>,
}

/// A dependency row as rendered in reports
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DependencyView {
    pub project: String,
    pub ecosystem: String,
    pub package_name: String,
    pub version: String,
    pub latest_version: Option<String>,
    pub health_score: Option<u8>,
    pub abandonment_risk: Option<AbandonmentRisk>,
    pub license: Option<String>,
    pub vulnerability_count: u32,
    pub highest_severity: Option<Severity>,
    pub safe_upgrade_version: Option<String>,
    pub vulnerabilities: Vec<VulnerabilityView>,
}

/// A vulnerability attributed to one dependency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VulnerabilityView {
    pub project: String,
    pub package_name: String,
    pub version: String,
    pub id: String,
    pub summary: String,
    pub severity: Severity,
    pub fixed_versions: Vec<String>,
    /// First advisory reference, if any
    pub reference: Option<String>,
}
