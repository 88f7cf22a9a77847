use anyhow::bail;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::Result;

/// CVSS base score value object (0.0 to 10.0)
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CvssScore(f32);

impl CvssScore {
    pub fn new(score: f32) -> Result<Self> {
        if !(0.0..=10.0).contains(&score) {
            bail!("CVSS score must be between 0.0 and 10.0, got {}", score);
        }
        Ok(Self(score))
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

/// Advisory severity, totally ordered from `None` to `Critical`.
///
/// The derived `Ord` follows declaration order, so `max()` over a list
/// yields the highest severity present.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Severity {
    #[default]
    None,
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// Maps a numeric CVSS score to a level:
    /// >= 9.0 Critical, >= 7.0 High, >= 4.0 Medium, else Low.
    pub fn from_cvss_score(score: CvssScore) -> Self {
        match score.value() {
            s if s >= 9.0 => Severity::Critical,
            s if s >= 7.0 => Severity::High,
            s if s >= 4.0 => Severity::Medium,
            _ => Severity::Low,
        }
    }

    /// Parses an advisory label such as `CRITICAL` or `MODERATE`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "CRITICAL" => Some(Severity::Critical),
            "HIGH" => Some(Severity::High),
            "MODERATE" | "MEDIUM" => Some(Severity::Medium),
            "LOW" => Some(Severity::Low),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Unknown => "Unknown",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" => Ok(Severity::None),
            "unknown" => Ok(Severity::Unknown),
            "low" => Ok(Severity::Low),
            "medium" | "moderate" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}

/// A known vulnerability affecting a specific package version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vulnerability {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub details: String,
    pub severity: Severity,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    pub modified: Option<String>,
    #[serde(default)]
    pub references: Vec<String>,
    /// Advisory range bounds such as `>=1.0.0` and `<1.2.3`, passed through verbatim
    #[serde(default)]
    pub affected_versions: Vec<String>,
    /// Empty when no fix has been released yet
    #[serde(default)]
    pub fixed_versions: Vec<String>,
}

impl Vulnerability {
    /// Trimmed view stored alongside an analyzed dependency.
    pub fn to_detail(&self) -> VulnerabilityDetail {
        VulnerabilityDetail {
            id: self.id.clone(),
            summary: self.summary.clone(),
            severity: self.severity,
            references: self.references.clone(),
            fixed_versions: self.fixed_versions.clone(),
        }
    }
}

/// Per-record vulnerability view persisted with the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityDetail {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default)]
    pub fixed_versions: Vec<String>,
}

/// Highest severity in `vulnerabilities`, `Severity::None` for an empty list.
pub fn highest_severity<'a, I>(vulnerabilities: I) -> Severity
where
    I: IntoIterator<Item = &'a Vulnerability>,
{
    vulnerabilities
        .into_iter()
        .map(|v| v.severity)
        .max()
        .unwrap_or(Severity::None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vuln(id: &str, severity: Severity) -> Vulnerability {
        Vulnerability {
            id: id.to_string(),
            summary: format!("{} summary", id),
            details: String::new(),
            severity,
            published: None,
            modified: None,
            references: vec![format!("https://osv.dev/vulnerability/{}", id)],
            affected_versions: vec![],
            fixed_versions: vec!["1.2.3".to_string()],
        }
    }

    #[test]
    fn test_cvss_score_bounds() {
        assert!(CvssScore::new(0.0).is_ok());
        assert!(CvssScore::new(10.0).is_ok());
        assert!(CvssScore::new(-0.1).is_err());
        assert!(CvssScore::new(10.1).is_err());
    }

    #[test]
    fn test_severity_from_cvss_score() {
        let s = |v| Severity::from_cvss_score(CvssScore::new(v).unwrap());
        assert_eq!(s(9.8), Severity::Critical);
        assert_eq!(s(9.0), Severity::Critical);
        assert_eq!(s(8.9), Severity::High);
        assert_eq!(s(7.0), Severity::High);
        assert_eq!(s(4.0), Severity::Medium);
        assert_eq!(s(3.9), Severity::Low);
        assert_eq!(s(0.0), Severity::Low);
    }

    #[test]
    fn test_severity_ordering_is_total() {
        let mut all = vec![
            Severity::Critical,
            Severity::None,
            Severity::Medium,
            Severity::Unknown,
            Severity::High,
            Severity::Low,
        ];
        all.sort();
        assert_eq!(
            all,
            vec![
                Severity::None,
                Severity::Unknown,
                Severity::Low,
                Severity::Medium,
                Severity::High,
                Severity::Critical,
            ]
        );
    }

    #[test]
    fn test_severity_from_label() {
        assert_eq!(Severity::from_label("CRITICAL"), Some(Severity::Critical));
        assert_eq!(Severity::from_label("moderate"), Some(Severity::Medium));
        assert_eq!(Severity::from_label("Medium"), Some(Severity::Medium));
        assert_eq!(Severity::from_label("low"), Some(Severity::Low));
        assert_eq!(Severity::from_label("UNKNOWN"), None);
        assert_eq!(Severity::from_label(""), None);
    }

    #[test]
    fn test_severity_from_str_round_trips_display() {
        for s in [
            Severity::None,
            Severity::Unknown,
            Severity::Low,
            Severity::Medium,
            Severity::High,
            Severity::Critical,
        ] {
            assert_eq!(s.to_string().parse::<Severity>().unwrap(), s);
        }
        assert!("urgent".parse::<Severity>().is_err());
    }

    #[test]
    fn test_highest_severity() {
        let list = vec![
            vuln("A", Severity::Low),
            vuln("B", Severity::High),
            vuln("C", Severity::Unknown),
        ];
        assert_eq!(highest_severity(&list), Severity::High);
        assert_eq!(highest_severity(&Vec::new()), Severity::None);
    }

    #[test]
    fn test_to_detail_keeps_reporting_fields() {
        let detail = vuln("GHSA-1", Severity::Critical).to_detail();
        assert_eq!(detail.id, "GHSA-1");
        assert_eq!(detail.severity, Severity::Critical);
        assert_eq!(detail.fixed_versions, vec!["1.2.3"]);
        assert_eq!(detail.references.len(), 1);
    }

    #[test]
    fn test_severity_serde_uses_variant_names() {
        let json = serde_json::to_string(&Severity::High).unwrap();
        assert_eq!(json, "\"High\"");
    }
}
