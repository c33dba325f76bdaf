//! Risk tiers and policy thresholds

use serde::{Deserialize, Serialize};

/// Dropout probability above which a student is high risk
pub const HIGH_RISK_THRESHOLD: f64 = 0.8;

/// Dropout probability above which a student is medium risk
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.6;

/// Semester pass rate below which the academic rules fire
pub const PASS_RATE_THRESHOLD: f64 = 0.6;

/// Dropout probability above which the fallback finding is emitted
pub const FALLBACK_RISK_THRESHOLD: f64 = 0.5;

/// Thresholds used by the tier classifier and the rule engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyThresholds {
    pub high_risk: f64,
    pub medium_risk: f64,
    pub pass_rate: f64,
    pub fallback_risk: f64,
}

impl Default for PolicyThresholds {
    fn default() -> Self {
        Self {
            high_risk: HIGH_RISK_THRESHOLD,
            medium_risk: MEDIUM_RISK_THRESHOLD,
            pass_rate: PASS_RATE_THRESHOLD,
            fallback_risk: FALLBACK_RISK_THRESHOLD,
        }
    }
}

/// Ordinal severity derived from the dropout probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Maps a dropout probability to a tier
///
/// Both boundaries are strict: a probability exactly on a threshold falls in
/// the lower tier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskTierClassifier {
    high: f64,
    medium: f64,
}

impl RiskTierClassifier {
    pub fn new(thresholds: &PolicyThresholds) -> Self {
        Self {
            high: thresholds.high_risk,
            medium: thresholds.medium_risk,
        }
    }

    pub fn classify(&self, p_dropout: f64) -> RiskTier {
        if p_dropout > self.high {
            RiskTier::High
        } else if p_dropout > self.medium {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }
}

impl Default for RiskTierClassifier {
    fn default() -> Self {
        Self::new(&PolicyThresholds::default())
    }
}
