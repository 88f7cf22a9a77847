pub mod scoring_metrics;

pub use scoring_metrics::{HealthMetrics, MetricBand};
