use serde::{Deserialize, Serialize};
use std::fmt;

/// Likelihood that a dependency is no longer maintained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AbandonmentRisk {
    Low,
    Medium,
    High,
    Critical,
}

impl AbandonmentRisk {
    /// One level up, capped at `High`. `Critical` is reserved for archived repositories.
    pub fn escalate(self) -> Self {
        match self {
            AbandonmentRisk::Low => AbandonmentRisk::Medium,
            AbandonmentRisk::Medium => AbandonmentRisk::High,
            other => other,
        }
    }

    pub fn is_high_or_critical(self) -> bool {
        matches!(self, AbandonmentRisk::High | AbandonmentRisk::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AbandonmentRisk::Low => "Low",
            AbandonmentRisk::Medium => "Medium",
            AbandonmentRisk::High => "High",
            AbandonmentRisk::Critical => "Critical",
        }
    }
}

impl fmt::Display for AbandonmentRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AbandonmentRisk {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(AbandonmentRisk::Low),
            "medium" => Ok(AbandonmentRisk::Medium),
            "high" => Ok(AbandonmentRisk::High),
            "critical" => Ok(AbandonmentRisk::Critical),
            other => Err(format!("unknown abandonment risk: {}", other)),
        }
    }
}
