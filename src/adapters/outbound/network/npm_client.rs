use super::http::{join_url, validate_url_component};
use crate::health_analysis::domain::{PackageInfo, UNKNOWN_VERSION};
use crate::ports::outbound::{cached_or_fetch, CacheStore, PackageRegistry};
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub const NPM_ECOSYSTEM: &str = "npm";

/// Registry document, loosely typed. Published packuments carry `null` or
/// odd shapes in any of these fields, so each is read as raw JSON and
/// interpreted field by field.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NpmPackument {
    name: Value,
    #[serde(rename = "dist-tags")]
    dist_tags: Value,
    time: Value,
    repository: Value,
    maintainers: Value,
    license: Value,
}

/// NpmRegistry adapter for the npm registry document API
///
/// Implements the PackageRegistry port: one `GET {registry_url}{name}` per
/// cache miss, degrading to [`PackageInfo::fallback`] on any failure.
pub struct NpmRegistry {
    client: reqwest::Client,
    registry_url: String,
    threshold_days: u32,
    cache: Arc<dyn CacheStore>,
}

impl NpmRegistry {
    pub const DEFAULT_REGISTRY_URL: &'static str = "https://registry.npmjs.org/";

    pub fn new(
        client: reqwest::Client,
        registry_url: impl Into<String>,
        threshold_days: u32,
        cache: Arc<dyn CacheStore>,
    ) -> Self {
        Self {
            client,
            registry_url: registry_url.into(),
            threshold_days,
            cache,
        }
    }

    async fn fetch_from_registry(&self, package_name: &str) -> Result<PackageInfo> {
        validate_url_component(package_name, "Package name", true)?;

        // Scoped names keep their '@' but the separator must be escaped
        let path = package_name.replace('/', "%2F");
        let url = join_url(&self.registry_url, &path);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("npm registry returned status code {}", response.status());
        }

        let packument: NpmPackument = response.json().await?;
        Ok(Self::to_package_info(package_name, packument))
    }

    fn to_package_info(package_name: &str, doc: NpmPackument) -> PackageInfo {
        let latest_version = doc
            .dist_tags
            .get("latest")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN_VERSION)
            .to_string();

        let last_published = doc
            .time
            .get(&latest_version)
            .and_then(Value::as_str)
            .map(str::to_string);

        let repository_url = match doc.repository {
            Value::String(url) => Some(url),
            Value::Object(map) => map.get("url").and_then(Value::as_str).map(str::to_string),
            _ => None,
        };

        let license = match doc.license {
            Value::String(license) => Some(license),
            Value::Object(map) => map.get("type").and_then(Value::as_str).map(str::to_string),
            _ => None,
        };

        PackageInfo {
            name: doc
                .name
                .as_str()
                .map_or_else(|| package_name.to_string(), str::to_string),
            latest_version,
            last_published,
            repository_url,
            maintainers_count: doc.maintainers.as_array().map_or(0, Vec::len) as u32,
            license,
        }
    }
}

#[async_trait]
impl PackageRegistry for NpmRegistry {
    fn ecosystem(&self) -> &str {
        NPM_ECOSYSTEM
    }

    fn threshold_days(&self) -> u32 {
        self.threshold_days
    }

    async fn fetch_package_info(&self, package_name: &str) -> PackageInfo {
        let key = format!("npm_{}", package_name);
        info!(package = %package_name, ecosystem = NPM_ECOSYSTEM, "Fetching package metadata");
        cached_or_fetch(self.cache.as_ref(), &key, self.fetch_from_registry(package_name))
            .await
            .unwrap_or_else(|| PackageInfo::fallback(package_name))
    }
}
