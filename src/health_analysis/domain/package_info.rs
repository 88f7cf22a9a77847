use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version literal reported when the registry could not be reached.
pub const UNKNOWN_VERSION: &str = "unknown";

/// Registry metadata for one package, as reported by its ecosystem registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageInfo {
    pub name: String,
    pub latest_version: String,
    /// Raw publish timestamp of the latest version, as the registry wrote it
    #[serde(default)]
    pub last_published: Option<String>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub maintainers_count: u32,
    #[serde(default)]
    pub license: Option<String>,
}

impl PackageInfo {
    /// The value every registry client degrades to when its fetch fails.
    pub fn fallback(package_name: &str) -> Self {
        Self {
            name: package_name.to_string(),
            latest_version: UNKNOWN_VERSION.to_string(),
            last_published: None,
            repository_url: None,
            maintainers_count: 0,
            license: None,
        }
    }

    /// Whether the latest version was actually resolved.
    pub fn has_known_version(&self) -> bool {
        self.latest_version != UNKNOWN_VERSION
    }

    /// Parsed publish time, `None` when absent or unparsable.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.last_published.as_deref().and_then(parse_timestamp)
    }
}

/// Parses the timestamp shapes registries emit.
///
/// Accepts RFC 3339 (`2024-03-01T10:00:00.000Z`), naive date-times that are
/// taken as UTC (`2024-03-01T10:00:00`, PyPI style) and bare dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
