//! Read models for CQRS-lite pattern
//!
//! This module contains view-optimized structs that provide
//! a denormalized representation of the analyzed dataset for reports.

pub mod health_report;
pub mod health_report_builder;

pub use health_report::{
    DependencyView, HealthReport, ProjectReport, ReportSummary, VulnerabilityView,
};
pub use health_report_builder::HealthReportBuilder;
