use std::collections::HashSet;

use crate::health_analysis::domain::{Vulnerability, UNKNOWN_VERSION};

/// UpgradeAdvisor decides whether the latest release is a safer target
/// than the installed version.
///
/// This is a heuristic over what the advisory source reports. It never
/// claims a version is free of vulnerabilities the source does not know about.
pub struct UpgradeAdvisor;

impl UpgradeAdvisor {
    /// Whether looking up the latest version's advisories can change the outcome.
    ///
    /// False when the versions match, the latest version is unresolved, or
    /// the current version has no known vulnerabilities.
    pub fn worth_checking(current: &str, latest: &str, current_vulns: &[Vulnerability]) -> bool {
        current != latest && latest != UNKNOWN_VERSION && !current_vulns.is_empty()
    }

    /// Recommends `latest` when it has no known vulnerabilities or its
    /// vulnerability ids are a proper subset of the current version's.
    pub fn recommend(
        current: &str,
        latest: &str,
        current_vulns: &[Vulnerability],
        latest_vulns: &[Vulnerability],
    ) -> Option<String> {
        if !Self::worth_checking(current, latest, current_vulns) {
            return None;
        }

        if latest_vulns.is_empty() {
            return Some(latest.to_string());
        }

        let current_ids: HashSet<&str> = current_vulns.iter().map(|v| v.id.as_str()).collect();
        let latest_ids: HashSet<&str> = latest_vulns.iter().map(|v| v.id.as_str()).collect();

        if latest_ids.len() < current_ids.len() && latest_ids.is_subset(&current_ids) {
            Some(latest.to_string())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health_analysis::domain::Severity;

    fn vulns(ids: &[&str]) -> Vec<Vulnerability> {
        ids.iter()
            .map(|id| Vulnerability {
                id: id.to_string(),
                summary: String::new(),
                details: String::new(),
                severity: Severity::High,
                published: None,
                modified: None,
                references: vec![],
                affected_versions: vec![],
                fixed_versions: vec![],
            })
            .collect()
    }

    #[test]
    fn test_latest_without_vulns_is_recommended() {
        let rec = UpgradeAdvisor::recommend("1.0.0", "2.0.0", &vulns(&["V1"]), &[]);
        assert_eq!(rec.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_same_set_is_not_recommended() {
        let rec = UpgradeAdvisor::recommend(
            "1.0.0",
            "2.0.0",
            &vulns(&["V1", "V2"]),
            &vulns(&["V2", "V1"]),
        );
        assert_eq!(rec, None);
    }

    #[test]
    fn test_strict_subset_is_recommended() {
        let rec =
            UpgradeAdvisor::recommend("1.0.0", "2.0.0", &vulns(&["V1", "V2"]), &vulns(&["V2"]));
        assert_eq!(rec.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_different_set_is_not_recommended() {
        let rec =
            UpgradeAdvisor::recommend("1.0.0", "2.0.0", &vulns(&["V1", "V2"]), &vulns(&["V3"]));
        assert_eq!(rec, None);
    }

    #[test]
    fn test_no_recommendation_when_current_is_clean() {
        assert!(!UpgradeAdvisor::worth_checking("1.0.0", "2.0.0", &[]));
        assert_eq!(UpgradeAdvisor::recommend("1.0.0", "2.0.0", &[], &[]), None);
    }

    #[test]
    fn test_no_recommendation_when_already_latest_or_unknown() {
        let current = vulns(&["V1"]);
        assert_eq!(UpgradeAdvisor::recommend("2.0.0", "2.0.0", &current, &[]), None);
        assert_eq!(UpgradeAdvisor::recommend("1.0.0", "unknown", &current, &[]), None);
    }
}
