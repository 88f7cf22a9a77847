use anyhow::bail;
use serde::{Deserialize, Serialize};

use crate::shared::Result;

/// Fractions of the update-frequency weight, most recent bucket first.
/// Anything at or beyond the last threshold (or undated) gets [`RECENCY_FLOOR`].
pub const RECENCY_FRACTIONS: [f64; 4] = [1.0, 0.8, 0.6, 0.3];
pub const RECENCY_FLOOR: f64 = 0.1;

/// Fractions of weight for the lowest-to-highest magnitude bucket crossed.
pub const MAGNITUDE_FRACTIONS: [f64; 5] = [0.2, 0.4, 0.6, 0.8, 1.0];

/// `(exclusive lower bound, bonus)` pairs, checked in order.
pub const COMMIT_FREQUENCY_BONUS: [(f64, f64); 3] = [(10.0, 5.0), (5.0, 3.0), (1.0, 1.0)];
pub const MAINTAINER_BONUS: [(u32, f64); 3] = [(5, 5.0), (2, 3.0), (0, 1.0)];

pub const ARCHIVED_PENALTY: f64 = 20.0;

/// Weekly commit rate below which abandonment risk is escalated.
pub const LOW_COMMIT_FREQUENCY: f64 = 0.25;

pub const MAX_SCORE: i64 = 100;

/// A weighted metric with ascending cut points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricBand {
    pub weight: f64,
    pub thresholds: Vec<f64>,
}

impl MetricBand {
    pub fn new(weight: f64, thresholds: Vec<f64>) -> Self {
        Self { weight, thresholds }
    }

    /// Checks the band is usable: non-negative weight, at least `min_thresholds`
    /// cut points, strictly ascending.
    pub fn validate(&self, name: &str, min_thresholds: usize) -> Result<()> {
        if !self.weight.is_finite() || self.weight < 0.0 {
            bail!("{}: weight must be a non-negative number, got {}", name, self.weight);
        }
        if self.thresholds.len() < min_thresholds {
            bail!(
                "{}: expected at least {} thresholds, got {}",
                name,
                min_thresholds,
                self.thresholds.len()
            );
        }
        if self.thresholds.windows(2).any(|w| w[0] >= w[1]) {
            bail!("{}: thresholds must be strictly ascending", name);
        }
        Ok(())
    }
}

/// Scoring weights and thresholds, one band per metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthMetrics {
    pub update_frequency: MetricBand,
    pub stars: MetricBand,
    pub forks: MetricBand,
    pub contributors: MetricBand,
}

impl Default for HealthMetrics {
    fn default() -> Self {
        Self {
            update_frequency: MetricBand::new(30.0, vec![30.0, 90.0, 180.0, 365.0]),
            stars: MetricBand::new(20.0, vec![10.0, 100.0, 1_000.0, 10_000.0, 50_000.0]),
            forks: MetricBand::new(15.0, vec![5.0, 50.0, 500.0, 5_000.0, 10_000.0]),
            contributors: MetricBand::new(20.0, vec![2.0, 5.0, 10.0, 50.0, 100.0]),
        }
    }
}

impl HealthMetrics {
    pub fn validate(&self) -> Result<()> {
        self.update_frequency
            .validate("health_metrics.update_frequency", RECENCY_FRACTIONS.len())?;
        self.stars
            .validate("health_metrics.stars", MAGNITUDE_FRACTIONS.len())?;
        self.forks
            .validate("health_metrics.forks", MAGNITUDE_FRACTIONS.len())?;
        self.contributors
            .validate("health_metrics.contributors", MAGNITUDE_FRACTIONS.len())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(HealthMetrics::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_descending_thresholds() {
        let band = MetricBand::new(10.0, vec![1.0, 5.0, 3.0, 10.0, 20.0]);
        let err = band.validate("stars", 5).unwrap_err();
        assert!(err.to_string().contains("ascending"));
    }

    #[test]
    fn test_rejects_duplicate_thresholds() {
        let band = MetricBand::new(10.0, vec![1.0, 1.0, 3.0, 10.0, 20.0]);
        assert!(band.validate("forks", 5).is_err());
    }

    #[test]
    fn test_rejects_too_few_thresholds() {
        let band = MetricBand::new(10.0, vec![1.0, 2.0, 3.0]);
        let err = band.validate("contributors", 5).unwrap_err();
        assert!(err.to_string().contains("at least 5"));
    }

    #[test]
    fn test_rejects_negative_weight() {
        let band = MetricBand::new(-1.0, vec![30.0, 90.0, 180.0, 365.0]);
        assert!(band.validate("update_frequency", 4).is_err());
    }

    #[test]
    fn test_partial_yaml_keeps_other_defaults() {
        let metrics: HealthMetrics =
            serde_yaml_ng::from_str("stars:\n  weight: 5\n  thresholds: [1, 2, 3, 4, 5]\n")
                .unwrap();
        assert_eq!(metrics.stars.weight, 5.0);
        assert_eq!(metrics.forks, HealthMetrics::default().forks);
    }
}
