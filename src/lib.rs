//! dep-health - Dependency health monitor
//!
//! This library scores the dependencies listed in a CSV dataset by registry
//! freshness, repository activity and known vulnerabilities, then writes
//! the augmented dataset back along with Markdown or JSON reports. It follows
//! hexagonal architecture and Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`health_analysis`): Records, scoring policy, health scorer and upgrade advisor
//! - **Application Layer** (`application`): Use cases, run coordination, read models and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Registry, GitHub and OSV clients, caches, CSV store, formatters
//! - **Shared** (`shared`): Clock, error types and path safety checks
//!
//! # Example
//!
//! ```no_run
//! use dep_health::prelude::*;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<()> {
//! let config = load_config_from_path(Path::new("config/config.yaml"))?;
//! let monitor = MonitorFactory::create(
//!     &config,
//!     Arc::new(SystemClock),
//!     Arc::new(StderrProgressReporter::new()),
//! )?;
//!
//! if let StartOutcome::Completed(run) = monitor.start_analysis(true).await? {
//!     println!("analyzed {} of {} dependencies", run.analyzed, run.total);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod health_analysis;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::cache::{FileCache, InMemoryCache};
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{CsvDatasetStore, ReportDirectoryWriter};
    pub use crate::adapters::outbound::formatters::{JsonReportFormatter, MarkdownReportFormatter};
    pub use crate::adapters::outbound::network::{GitHubClient, NpmRegistry, OsvClient, PyPiRegistry};
    pub use crate::application::dto::OutputFormat;
    pub use crate::application::factories::{MonitorFactory, RegistrySelector};
    pub use crate::application::read_models::{HealthReport, HealthReportBuilder, ReportSummary};
    pub use crate::application::use_cases::{
        AnalyzeDependenciesUseCase, GenerateReportsUseCase, HealthMonitor, VulnerabilityCorrelator,
    };
    pub use crate::application::RunCoordinator;
    pub use crate::config::{load_config_from_path, AppConfig};
    pub use crate::health_analysis::domain::{
        AbandonmentRisk, DependencyRecord, PackageInfo, RepositoryActivity, Severity,
        Vulnerability,
    };
    pub use crate::health_analysis::policies::HealthMetrics;
    pub use crate::health_analysis::services::{HealthScorer, UpgradeAdvisor};
    pub use crate::ports::inbound::{AnalysisControlPort, AnalysisStatus, RunSummary, StartOutcome};
    pub use crate::ports::outbound::{
        CacheStore, DatasetStore, PackageRegistry, ProgressReporter, ReportFormatter, ReportWriter,
        RepositoryActivitySource, VulnerabilitySource,
    };
    pub use crate::shared::{Clock, FixedClock, Result, SystemClock};
}
