//! Configuration file support for dep-health.
//!
//! Provides YAML-based configuration (default `config/config.yaml`),
//! including data structures, file loading, defaults and validation.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::adapters::outbound::network::OsvClient;
use crate::application::dto::OutputFormat;
use crate::application::use_cases::DEFAULT_CONCURRENCY;
use crate::health_analysis::policies::HealthMetrics;
use crate::health_analysis::services::DEFAULT_THRESHOLD_DAYS;
use crate::shared::error::MonitorError;
use crate::shared::Result;

pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Environment variable that overrides `github.token`
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Literal left in example configs; treated as "no token"
const TOKEN_PLACEHOLDER: &str = "${GITHUB_TOKEN}";

const DEFAULT_CACHE_TTL_SECS: u64 = 86_400;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration file schema.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub data_source: DataSourceConfig,
    /// Keyed by ecosystem tag (`npm`, `pypi`, ...)
    #[serde(default = "default_ecosystems")]
    pub ecosystems: BTreeMap<String, EcosystemConfig>,
    #[serde(default)]
    pub github: GitHubConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    #[serde(default)]
    pub health_metrics: HealthMetrics,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            data_source: DataSourceConfig::default(),
            ecosystems: default_ecosystems(),
            github: GitHubConfig::default(),
            security: SecurityConfig::default(),
            health_metrics: HealthMetrics::default(),
            output: OutputConfig::default(),
            analysis: AnalysisConfig::default(),
            unknown_fields: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Seconds
    pub ttl: u64,
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: DEFAULT_CACHE_TTL_SECS,
            path: PathBuf::from("data/cache"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSourceConfig {
    pub path: PathBuf,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/dependencies.csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EcosystemConfig {
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Falls back to the public registry for known ecosystems
    #[serde(default)]
    pub registry_url: Option<String>,
    #[serde(default = "default_threshold_days")]
    pub threshold_days: u32,
}

impl EcosystemConfig {
    fn enabled_with_defaults() -> Self {
        Self {
            enabled: true,
            registry_url: None,
            threshold_days: DEFAULT_THRESHOLD_DAYS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    pub enabled: bool,
    pub api_url: String,
    pub token: Option<String>,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://api.github.com".to_string(),
            token: None,
        }
    }
}

impl GitHubConfig {
    /// Token to authenticate with, `GITHUB_TOKEN` taking precedence over
    /// the configured value.
    pub fn resolve_token(&self) -> Option<String> {
        resolve_github_token(
            std::env::var(GITHUB_TOKEN_ENV).ok().as_deref(),
            self.token.as_deref(),
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub enabled: bool,
    pub osv_api_url: String,
    /// Seconds; advisories are cached separately from registry data
    pub cache_ttl: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            osv_api_url: OsvClient::DEFAULT_API_URL.to_string(),
            cache_ttl: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub report_dir: PathBuf,
    pub report_format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_dir: PathBuf::from("reports"),
            report_format: OutputFormat::Markdown,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Records analyzed concurrently
    pub concurrency: usize,
    /// Per-request timeout for every external call
    pub request_timeout_secs: u64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

fn enabled_by_default() -> bool {
    true
}

fn default_threshold_days() -> u32 {
    DEFAULT_THRESHOLD_DAYS
}

fn default_ecosystems() -> BTreeMap<String, EcosystemConfig> {
    ["npm", "pypi"]
        .into_iter()
        .map(|tag| (tag.to_string(), EcosystemConfig::enabled_with_defaults()))
        .collect()
}

/// Picks the effective token: a non-empty environment value wins, then a
/// non-empty configured value. The `${GITHUB_TOKEN}` placeholder counts as
/// empty in both places.
pub fn resolve_github_token(from_env: Option<&str>, configured: Option<&str>) -> Option<String> {
    [from_env, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|token| !token.is_empty() && *token != TOKEN_PLACEHOLDER)
        .map(str::to_string)
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Err(MonitorError::ConfigNotFound {
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = std::fs::read_to_string(path).map_err(|e| MonitorError::ConfigInvalid {
        path: path.to_path_buf(),
        details: format!("Failed to read config file: {}", e),
    })?;

    let config: AppConfig =
        serde_yaml_ng::from_str(&content).map_err(|e| MonitorError::ConfigInvalid {
            path: path.to_path_buf(),
            details: format!("Failed to parse config file: {}", e),
        })?;

    validate_config(&config).map_err(|e| MonitorError::ConfigInvalid {
        path: path.to_path_buf(),
        details: format!("{:#}", e),
    })?;
    warn_unknown_fields(&config);
    info!(path = %path.display(), "Loaded config");

    Ok(config)
}

/// Validate the loaded configuration.
fn validate_config(config: &AppConfig) -> Result<()> {
    config.health_metrics.validate()?;

    if config.analysis.concurrency == 0 {
        anyhow::bail!("analysis.concurrency must be at least 1");
    }
    if config.analysis.request_timeout_secs == 0 {
        anyhow::bail!("analysis.request_timeout_secs must be at least 1");
    }
    for (tag, ecosystem) in &config.ecosystems {
        if ecosystem.threshold_days == 0 {
            anyhow::bail!("ecosystems.{}.threshold_days must be at least 1", tag);
        }
    }
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &AppConfig) {
    for key in config.unknown_fields.keys() {
        warn!(field = %key, "Unknown config field will be ignored");
    }
}
