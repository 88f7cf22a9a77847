use serde::{Deserialize, Serialize};

use super::risk::AbandonmentRisk;
use super::vulnerability::{Severity, VulnerabilityDetail};

/// Score above which a low-risk, up-to-date dependency counts as healthy.
pub const HEALTHY_SCORE_FLOOR: u8 = 70;

/// One tracked dependency: a (project, ecosystem, package) tuple plus
/// whatever the last analysis run derived for it.
///
/// Derived fields stay `None` until a run analyzes the record. Records the
/// run cannot analyze (unknown ecosystem, missing name) keep them as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyRecord {
    pub project: String,
    pub ecosystem: String,
    pub package_name: String,
    pub version: String,
    #[serde(default)]
    pub license: Option<String>,

    #[serde(default)]
    pub latest_version: Option<String>,
    #[serde(default)]
    pub needs_update: Option<bool>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default)]
    pub health_score: Option<u8>,
    #[serde(default)]
    pub abandonment_risk: Option<AbandonmentRisk>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub has_vulnerabilities: Option<bool>,
    #[serde(default)]
    pub vulnerability_count: Option<u32>,
    #[serde(default)]
    pub vulnerability_details: Vec<VulnerabilityDetail>,
    #[serde(default)]
    pub safe_upgrade_version: Option<String>,
    #[serde(default)]
    pub highest_severity: Option<Severity>,

    /// Dataset columns this crate does not interpret, as `(column, cell)`
    /// in their original column order. Carried through runs untouched.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_columns: Vec<(String, String)>,
}

impl DependencyRecord {
    pub fn new(
        project: impl Into<String>,
        ecosystem: impl Into<String>,
        package_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            project: project.into(),
            ecosystem: ecosystem.into(),
            package_name: package_name.into(),
            version: version.into(),
            ..Default::default()
        }
    }

    pub fn with_license(mut self, license: impl Into<String>) -> Self {
        self.license = Some(license.into());
        self
    }

    /// `(project, ecosystem, package_name)`
    pub fn identity(&self) -> (&str, &str, &str) {
        (&self.project, &self.ecosystem, &self.package_name)
    }

    /// Whether a run has scored this record.
    pub fn is_analyzed(&self) -> bool {
        self.health_score.is_some() && self.abandonment_risk.is_some()
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update.unwrap_or(false)
    }

    pub fn has_vulnerabilities(&self) -> bool {
        self.has_vulnerabilities.unwrap_or(false)
    }

    pub fn is_high_risk(&self) -> bool {
        self.abandonment_risk
            .is_some_and(AbandonmentRisk::is_high_or_critical)
    }

    /// Low risk, up to date and scoring above [`HEALTHY_SCORE_FLOOR`].
    pub fn is_healthy(&self) -> bool {
        self.abandonment_risk == Some(AbandonmentRisk::Low)
            && self.needs_update == Some(false)
            && self.health_score.is_some_and(|s| s > HEALTHY_SCORE_FLOOR)
    }
}
