//! dropwatch policy
//!
//! Turns a dropout probability and the student's raw attributes into an
//! explainable intervention plan.
//!
//! - Risk tiers are a pure function of the dropout probability
//! - Rules are declarative (trigger, area, description, interventions) and
//!   can be loaded from YAML
//! - Findings keep rule order and carry no severity score
//!
//! Presentation gates (whether a caller shows risk factors or generic
//! recommendations at all) are not part of this crate.

pub mod engine;
pub mod plan;
pub mod risk;
pub mod rule;
pub mod trigger;

pub use engine::InterventionRuleEngine;
pub use plan::{InterventionPlan, RiskFinding, TimelinePhase, LOW_RISK_MESSAGE};
pub use risk::{PolicyThresholds, RiskTier, RiskTierClassifier};
pub use rule::{InterventionRule, RuleSet};
pub use trigger::{CompositeOperator, Trigger};

use dropwatch_core::{FeatureVector, Result};

/// Build a plan with the standard rules and default thresholds
pub fn build_plan(vector: &FeatureVector, p_dropout: f64) -> Result<InterventionPlan> {
    InterventionRuleEngine::new().evaluate(vector, p_dropout)
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::engine::InterventionRuleEngine;
    pub use crate::plan::{InterventionPlan, RiskFinding};
    pub use crate::risk::{RiskTier, RiskTierClassifier};
    pub use crate::rule::RuleSet;
}
