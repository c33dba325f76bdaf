//! Intervention plans

use crate::risk::RiskTier;
use serde::{Deserialize, Serialize};

/// Shown when no rule produced a finding
pub const LOW_RISK_MESSAGE: &str = "This student has a low risk profile. No specific interventions required at this time, but regular academic advising is recommended.";

/// One fired rule's diagnosis and recommended interventions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFinding {
    /// Identifier of the rule that fired
    pub rule: String,
    pub area: String,
    pub description: String,
    pub interventions: Vec<String>,
}

/// A period of the implementation timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePhase {
    pub period: String,
    pub actions: Vec<String>,
}

impl TimelinePhase {
    fn new(period: &str, actions: &[&str]) -> Self {
        Self {
            period: period.to_string(),
            actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }
}

/// Three-phase rollout attached to every plan with findings
pub fn standard_timeline() -> Vec<TimelinePhase> {
    vec![
        TimelinePhase::new(
            "Immediate (Next 7 days)",
            &[
                "Initial contact with student via email and phone",
                "Schedule first advising appointment",
                "Provide resource information packet",
            ],
        ),
        TimelinePhase::new(
            "Short-term (2-4 weeks)",
            &[
                "Complete all initial consultations for identified risk areas",
                "Establish regular check-in schedule",
                "Set measurable goals for improvement",
            ],
        ),
        TimelinePhase::new(
            "Long-term (Semester)",
            &[
                "Monthly progress assessment",
                "Intervention strategy adjustments as needed",
                "End-of-semester comprehensive review",
            ],
        ),
    ]
}

/// Explainable output of the rule engine
///
/// Findings keep rule evaluation order; they are never sorted by severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionPlan {
    pub risk_tier: RiskTier,
    pub p_dropout: f64,
    pub findings: Vec<RiskFinding>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_message: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub timeline: Vec<TimelinePhase>,
}

impl InterventionPlan {
    /// Assemble a plan; the timeline and fallback message follow from
    /// whether any finding exists
    pub fn new(risk_tier: RiskTier, p_dropout: f64, findings: Vec<RiskFinding>) -> Self {
        let (fallback_message, timeline) = if findings.is_empty() {
            (Some(LOW_RISK_MESSAGE.to_string()), Vec::new())
        } else {
            (None, standard_timeline())
        };

        Self {
            risk_tier,
            p_dropout,
            findings,
            fallback_message,
            timeline,
        }
    }

    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Finding produced by the given rule, if it fired
    pub fn finding(&self, rule: &str) -> Option<&RiskFinding> {
        self.findings.iter().find(|f| f.rule == rule)
    }

    /// Identifiers of the fired rules, in order
    pub fn rule_ids(&self) -> Vec<&str> {
        self.findings.iter().map(|f| f.rule.as_str()).collect()
    }
}
