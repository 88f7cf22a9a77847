use chrono::{DateTime, Utc};

use crate::health_analysis::domain::{AbandonmentRisk, PackageInfo, RepositoryActivity};
use crate::health_analysis::policies::scoring_metrics::{
    HealthMetrics, ARCHIVED_PENALTY, COMMIT_FREQUENCY_BONUS, LOW_COMMIT_FREQUENCY,
    MAGNITUDE_FRACTIONS, MAINTAINER_BONUS, MAX_SCORE, RECENCY_FLOOR, RECENCY_FRACTIONS,
};

/// Default staleness threshold in days when an ecosystem does not set one.
pub const DEFAULT_THRESHOLD_DAYS: u32 = 180;

/// HealthScorer turns package metadata and repository activity into a
/// 0-100 score and an abandonment-risk level.
///
/// Pure: the only time input is the explicit `now`, so identical inputs
/// always produce identical results.
#[derive(Debug, Clone, Default)]
pub struct HealthScorer {
    metrics: HealthMetrics,
}

impl HealthScorer {
    pub fn new(metrics: HealthMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &HealthMetrics {
        &self.metrics
    }

    /// Computes the health score.
    ///
    /// Repository components (stars, forks, contributors, commit bonus,
    /// archived penalty) only apply when `activity` is present. The sum is
    /// truncated and clamped to `[0, 100]`.
    pub fn score(
        &self,
        info: &PackageInfo,
        activity: Option<&RepositoryActivity>,
        now: DateTime<Utc>,
    ) -> u8 {
        let mut score = self.update_frequency_points(info, now);

        if let Some(activity) = activity {
            score += weighted_bucket(activity.stars as f64, &self.metrics.stars.thresholds)
                * self.metrics.stars.weight;
            score += weighted_bucket(activity.forks as f64, &self.metrics.forks.thresholds)
                * self.metrics.forks.weight;
            score += weighted_bucket(
                activity.contributors_count as f64,
                &self.metrics.contributors.thresholds,
            ) * self.metrics.contributors.weight;

            score += COMMIT_FREQUENCY_BONUS
                .iter()
                .find(|(floor, _)| activity.commit_frequency > *floor)
                .map_or(0.0, |(_, bonus)| *bonus);

            if activity.archived {
                score -= ARCHIVED_PENALTY;
            }
        }

        score += MAINTAINER_BONUS
            .iter()
            .find(|(floor, _)| info.maintainers_count > *floor)
            .map_or(0.0, |(_, bonus)| *bonus);

        (score.trunc() as i64).clamp(0, MAX_SCORE) as u8
    }

    /// Assesses abandonment risk.
    ///
    /// 1. Archived repository: `Critical`, nothing else is considered.
    /// 2. Base level from days since publish against `threshold_days` (T):
    ///    above 2T `High`, above T `Medium`, otherwise `Low`. Missing or
    ///    unparsable publish dates give `Medium`.
    /// 3. With repository activity present, a weekly commit rate below 0.25
    ///    escalates one level (capped at `High`).
    pub fn assess_abandonment_risk(
        &self,
        info: &PackageInfo,
        activity: Option<&RepositoryActivity>,
        threshold_days: u32,
        now: DateTime<Utc>,
    ) -> AbandonmentRisk {
        if activity.is_some_and(|a| a.archived) {
            return AbandonmentRisk::Critical;
        }

        let threshold = i64::from(threshold_days);
        let base = match days_since_publish(info, now) {
            Some(days) if days > threshold * 2 => AbandonmentRisk::High,
            Some(days) if days > threshold => AbandonmentRisk::Medium,
            Some(_) => AbandonmentRisk::Low,
            None => AbandonmentRisk::Medium,
        };

        match activity {
            Some(a) if a.commit_frequency < LOW_COMMIT_FREQUENCY => base.escalate(),
            _ => base,
        }
    }

    fn update_frequency_points(&self, info: &PackageInfo, now: DateTime<Utc>) -> f64 {
        let band = &self.metrics.update_frequency;
        let fraction = match days_since_publish(info, now) {
            Some(days) => band
                .thresholds
                .iter()
                .zip(RECENCY_FRACTIONS)
                .find(|(threshold, _)| (days as f64) < **threshold)
                .map_or(RECENCY_FLOOR, |(_, fraction)| fraction),
            None => RECENCY_FLOOR,
        };
        band.weight * fraction
    }
}

/// Whole days between the latest publish and `now`, `None` when undated.
pub fn days_since_publish(info: &PackageInfo, now: DateTime<Utc>) -> Option<i64> {
    info.published_at()
        .map(|published| (now - published).num_days())
}

/// Fraction of weight for the highest threshold `value` reaches.
///
/// Thresholds are inclusive lower bounds paired with `fractions` in order;
/// a value below the first threshold earns nothing.
pub fn bucketed_fraction(value: f64, thresholds: &[f64], fractions: &[f64]) -> f64 {
    thresholds
        .iter()
        .zip(fractions)
        .rev()
        .find(|(threshold, _)| value >= **threshold)
        .map_or(0.0, |(_, fraction)| *fraction)
}

fn weighted_bucket(value: f64, thresholds: &[f64]) -> f64 {
    bucketed_fraction(value, thresholds, &MAGNITUDE_FRACTIONS)
}
