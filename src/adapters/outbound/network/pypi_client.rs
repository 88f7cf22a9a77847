use super::http::{join_url, validate_url_component};
use crate::health_analysis::domain::{PackageInfo, UNKNOWN_VERSION};
use crate::ports::outbound::{cached_or_fetch, CacheStore, PackageRegistry};
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

pub const PYPI_ECOSYSTEM: &str = "pypi";

/// PyPI does not expose a maintainer list in the JSON API.
const PYPI_MAINTAINERS: u32 = 1;

#[derive(Debug, Deserialize)]
struct PyPiPackage {
    #[serde(default)]
    info: PyPiInfo,
    #[serde(default)]
    releases: HashMap<String, Vec<PyPiFile>>,
}

#[derive(Debug, Default, Deserialize)]
struct PyPiInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    project_urls: Option<HashMap<String, Option<String>>>,
    #[serde(default)]
    home_page: Option<String>,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    license_expression: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PyPiFile {
    #[serde(default)]
    upload_time: Option<String>,
}

/// PyPiRegistry adapter for the PyPI JSON API
///
/// Implements the PackageRegistry port with `GET {registry_url}{name}/json`.
pub struct PyPiRegistry {
    client: reqwest::Client,
    registry_url: String,
    threshold_days: u32,
    cache: Arc<dyn CacheStore>,
}

impl PyPiRegistry {
    pub const DEFAULT_REGISTRY_URL: &'static str = "https://pypi.org/pypi/";

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

    async fn fetch_from_pypi(&self, package_name: &str) -> Result<PackageInfo> {
        // Security: Validate URL components before using them
        validate_url_component(package_name, "Package name", false)?;

        let encoded_package = urlencoding::encode(package_name);
        let url = join_url(&self.registry_url, &format!("{}/json", encoded_package));

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("PyPI API returned status code {}", response.status());
        }

        let package: PyPiPackage = response.json().await?;
        Ok(Self::to_package_info(package_name, package))
    }

    fn to_package_info(package_name: &str, package: PyPiPackage) -> PackageInfo {
        let info = package.info;
        let latest_version = info
            .version
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string());

        let last_published = package
            .releases
            .get(&latest_version)
            .and_then(|files| files.first())
            .and_then(|file| file.upload_time.clone());

        let project_url = |label: &str| {
            info.project_urls
                .as_ref()
                .and_then(|urls| urls.get(label).cloned().flatten())
                .filter(|u| !u.is_empty())
        };
        let repository_url = project_url("Source")
            .or_else(|| project_url("Homepage"))
            .or_else(|| info.home_page.clone().filter(|u| !u.is_empty()));

        let license = info
            .license
            .filter(|l| !l.is_empty() && l != "UNKNOWN")
            .or_else(|| info.license_expression.filter(|l| !l.is_empty()));

        PackageInfo {
            name: info.name.unwrap_or_else(|| package_name.to_string()),
            latest_version,
            last_published,
            repository_url,
            maintainers_count: PYPI_MAINTAINERS,
            license,
        }
    }
}

#[async_trait]
impl PackageRegistry for PyPiRegistry {
    fn ecosystem(&self) -> &str {
        PYPI_ECOSYSTEM
    }

    fn threshold_days(&self) -> u32 {
        self.threshold_days
    }

    async fn fetch_package_info(&self, package_name: &str) -> PackageInfo {
        let key = format!("pypi_{}", package_name);
        info!(package = %package_name, ecosystem = PYPI_ECOSYSTEM, "Fetching package metadata");
        cached_or_fetch(self.cache.as_ref(), &key, self.fetch_from_pypi(package_name))
            .await
            .unwrap_or_else(|| PackageInfo::fallback(package_name))
    }
}
