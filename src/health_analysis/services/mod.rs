mod health_scorer;
mod upgrade_advisor;

pub use health_scorer::{bucketed_fraction, days_since_publish, HealthScorer, DEFAULT_THRESHOLD_DAYS};
pub use upgrade_advisor::UpgradeAdvisor;
