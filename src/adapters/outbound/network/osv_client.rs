use crate::health_analysis::domain::{CvssScore, Severity, Vulnerability};
use crate::ports::outbound::VulnerabilitySource;
use crate::shared::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::warn;

/// Range types whose events carry version bounds worth reporting
const VERSIONED_RANGE_TYPES: [&str; 2] = ["SEMVER", "ECOSYSTEM"];

/// OsvClient adapter for the OSV.dev single-package query API
///
/// Implements the VulnerabilitySource port with one
/// `POST {api_url}` per (ecosystem, package, version). Caching and the
/// ecosystem mapping live in the correlator; this adapter only speaks the wire format.
///
/// # Security
/// - Per-request timeout from the shared HTTP client
/// - Does not retry failed requests
pub struct OsvClient {
    client: reqwest::Client,
    api_url: String,
}

impl OsvClient {
    pub const DEFAULT_API_URL: &'static str = "https://api.osv.dev/v1/query";

    pub fn new(client: reqwest::Client, api_url: impl Into<String>) -> Self {
        Self {
            client,
            api_url: api_url.into(),
        }
    }

    /// Converts an OSV advisory into the domain model
    fn convert_to_vulnerability(osv_vuln: OsvVulnerability, package_name: &str) -> Vulnerability {
        let (affected_versions, fixed_versions) = collect_version_bounds(&osv_vuln, package_name);
        let severity = extract_severity(&osv_vuln, !fixed_versions.is_empty());

        Vulnerability {
            id: osv_vuln.id,
            summary: osv_vuln.summary.unwrap_or_default(),
            details: osv_vuln.details.unwrap_or_default(),
            severity,
            published: osv_vuln.published,
            modified: osv_vuln.modified,
            references: osv_vuln
                .references
                .into_iter()
                .filter_map(|r| r.url)
                .collect(),
            affected_versions,
            fixed_versions,
        }
    }
}

#[async_trait]
impl VulnerabilitySource for OsvClient {
    async fn query(
        &self,
        ecosystem: &str,
        package_name: &str,
        version: &str,
    ) -> Result<Vec<Vulnerability>> {
        let query = OsvQuery {
            package: OsvPackage {
                name: package_name.to_string(),
                ecosystem: ecosystem.to_string(),
            },
            version: version.to_string(),
        };

        let response = self.client.post(&self.api_url).json(&query).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("OSV API returned status code {}", response.status());
        }

        let result: OsvResult = response.json().await?;
        Ok(result
            .vulns
            .into_iter()
            .map(|v| Self::convert_to_vulnerability(v, package_name))
            .collect())
    }
}

#[derive(Debug, Serialize)]
struct OsvQuery {
    package: OsvPackage,
    version: String,
}

#[derive(Debug, Serialize)]
struct OsvPackage {
    name: String,
    ecosystem: String,
}

#[derive(Debug, Deserialize)]
struct OsvResult {
    #[serde(default, deserialize_with = "lenient_list")]
    vulns: Vec<OsvVulnerability>,
}

#[derive(Debug, Deserialize)]
struct OsvVulnerability {
    id: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    published: Option<String>,
    #[serde(default)]
    modified: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    references: Vec<OsvReference>,
    #[serde(default, deserialize_with = "lenient_list")]
    severity: Vec<OsvSeverity>,
    #[serde(default)]
    database_specific: Option<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    affected: Vec<OsvAffected>,
}

#[derive(Debug, Deserialize)]
struct OsvReference {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OsvSeverity {
    #[serde(rename = "type")]
    severity_type: String,
    score: String,
}

#[derive(Debug, Deserialize)]
struct OsvAffected {
    #[serde(default)]
    package: Option<OsvAffectedPackage>,
    #[serde(default, deserialize_with = "lenient_list")]
    ranges: Vec<OsvRange>,
}

#[derive(Debug, Deserialize)]
struct OsvAffectedPackage {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OsvRange {
    #[serde(rename = "type")]
    range_type: String,
    #[serde(default, deserialize_with = "lenient_list")]
    events: Vec<OsvEvent>,
}

#[derive(Debug, Deserialize)]
struct OsvEvent {
    #[serde(default)]
    introduced: Option<String>,
    #[serde(default)]
    fixed: Option<String>,
}

/// Reads a JSON array entry by entry, dropping entries that do not fit `T`
/// so one malformed advisory or range does not void the whole response.
/// `null` or a non-array value reads as empty.
fn lenient_list<'de, D, T>(deserializer: D) -> std::result::Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };

    Ok(items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                warn!(error = %e, "Skipping malformed OSV entry");
                None
            }
        })
        .collect())
}

/// Determines severity with a fallback chain:
/// 1. numeric score in `database_specific` (`cvss_score` or `cvss.score`)
/// 2. score computed from a `CVSS_V3` vector
/// 3. `database_specific.severity` label
/// 4. `Medium` if a fix exists, otherwise `Unknown`
fn extract_severity(osv_vuln: &OsvVulnerability, has_fix: bool) -> Severity {
    let db = osv_vuln.database_specific.as_ref();

    let numeric = db
        .and_then(|db| {
            db.get("cvss_score")
                .or_else(|| db.get("cvss").and_then(|c| c.get("score")))
        })
        .and_then(value_as_f32)
        .and_then(|s| CvssScore::new(s).ok());

    let computed = || {
        osv_vuln
            .severity
            .iter()
            .find(|s| s.severity_type == "CVSS_V3")
            .and_then(|s| parse_cvss_score(&s.score))
    };

    if let Some(score) = numeric.or_else(computed) {
        return Severity::from_cvss_score(score);
    }

    if let Some(label) = db
        .and_then(|db| db.get("severity"))
        .and_then(Value::as_str)
        .and_then(Severity::from_label)
    {
        return label;
    }

    if has_fix {
        Severity::Medium
    } else {
        Severity::Unknown
    }
}

fn value_as_f32(value: &Value) -> Option<f32> {
    match value {
        Value::Number(n) => n.as_f64().map(|f| f as f32),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Walks SEMVER and ECOSYSTEM range events of the entries for `package_name`.
///
/// Returns (`>=introduced` / `<fixed` bounds, fixed versions). This is
/// advisory metadata passthrough, not range evaluation.
fn collect_version_bounds(osv_vuln: &OsvVulnerability, package_name: &str) -> (Vec<String>, Vec<String>) {
    let mut bounds = Vec::new();
    let mut fixed = Vec::new();

    let relevant = osv_vuln.affected.iter().filter(|affected| {
        match affected.package.as_ref().and_then(|p| p.name.as_deref()) {
            Some(name) => name.eq_ignore_ascii_case(package_name),
            None => true,
        }
    });

    for affected in relevant {
        for range in affected
            .ranges
            .iter()
            .filter(|r| VERSIONED_RANGE_TYPES.contains(&r.range_type.as_str()))
        {
            for event in &range.events {
                if let Some(introduced) = &event.introduced {
                    bounds.push(format!(">={}", introduced));
                }
                if let Some(version) = &event.fixed {
                    bounds.push(format!("<{}", version));
                    if !fixed.contains(version) {
                        fixed.push(version.clone());
                    }
                }
            }
        }
    }

    (bounds, fixed)
}

/// Computes a CVSS v3 base score from a vector string
///
/// Example: "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H" -> Some(9.8)
fn parse_cvss_score(cvss_vector: &str) -> Option<CvssScore> {
    let metrics: HashMap<&str, &str> = cvss_vector
        .split('/')
        .skip(1)
        .filter_map(|part| part.split_once(':'))
        .collect();

    let scope_changed = match *metrics.get("S")? {
        "U" => false,
        "C" => true,
        _ => return None,
    };

    let attack_vector = match *metrics.get("AV")? {
        "N" => 0.85,
        "A" => 0.62,
        "L" => 0.55,
        "P" => 0.2,
        _ => return None,
    };
    let attack_complexity = match *metrics.get("AC")? {
        "L" => 0.77,
        "H" => 0.44,
        _ => return None,
    };
    let privileges = match (*metrics.get("PR")?, scope_changed) {
        ("N", _) => 0.85,
        ("L", false) => 0.62,
        ("L", true) => 0.68,
        ("H", false) => 0.27,
        ("H", true) => 0.5,
        _ => return None,
    };
    let user_interaction = match *metrics.get("UI")? {
        "N" => 0.85,
        "R" => 0.62,
        _ => return None,
    };

    let impact_weight = |key: &str| -> Option<f64> {
        match *metrics.get(key)? {
            "N" => Some(0.0),
            "L" => Some(0.22),
            "H" => Some(0.56),
            _ => None,
        }
    };
    let confidentiality = impact_weight("C")?;
    let integrity = impact_weight("I")?;
    let availability = impact_weight("A")?;

    let iss = 1.0_f64 - ((1.0 - confidentiality) * (1.0 - integrity) * (1.0 - availability));
    let impact = if scope_changed {
        7.52 * (iss - 0.029) - 3.25 * (iss - 0.02_f64).powi(15)
    } else {
        6.42 * iss
    };
    let exploitability =
        8.22 * attack_vector * attack_complexity * privileges * user_interaction;

    let base_score = if impact <= 0.0 {
        0.0
    } else if scope_changed {
        f64::min(1.08 * (impact + exploitability), 10.0)
    } else {
        f64::min(impact + exploitability, 10.0)
    };

    // CVSS rounds up to one decimal
    let rounded = (base_score * 10.0).ceil() / 10.0;
    CvssScore::new(rounded as f32).ok()
}
