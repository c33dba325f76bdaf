//! Intervention rule engine

use crate::plan::{InterventionPlan, RiskFinding};
use crate::risk::{PolicyThresholds, RiskTierClassifier};
use crate::rule::RuleSet;
use crate::trigger::EvaluationContext;
use dropwatch_core::{Error, FeatureSchema, FeatureVector, Result};
use tracing::debug;

/// Name used for the probability in domain errors
pub const P_DROPOUT: &str = "p_dropout";

/// Evaluates a rule set over a raw vector and a dropout probability
///
/// Stateless per call: the same inputs always give the same plan.
#[derive(Debug, Clone)]
pub struct InterventionRuleEngine {
    rules: RuleSet,
    thresholds: PolicyThresholds,
    tiers: RiskTierClassifier,
}

impl InterventionRuleEngine {
    /// Engine with the standard rules and default thresholds
    pub fn new() -> Self {
        let thresholds = PolicyThresholds::default();
        Self {
            rules: RuleSet::standard(),
            thresholds,
            tiers: RiskTierClassifier::new(&thresholds),
        }
    }

    /// Replace the rule set after validating it against the student schema
    pub fn with_rules(mut self, rules: RuleSet) -> Result<Self> {
        rules.validate(&FeatureSchema::student())?;
        self.rules = rules;
        Ok(self)
    }

    pub fn with_thresholds(mut self, thresholds: PolicyThresholds) -> Self {
        self.thresholds = thresholds;
        self.tiers = RiskTierClassifier::new(&thresholds);
        self
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn thresholds(&self) -> &PolicyThresholds {
        &self.thresholds
    }

    /// Build the plan for one student
    ///
    /// The vector must match the student schema in layout and domain. Rules
    /// run in order and independently; a vector may fire none, one, or
    /// several.
    pub fn evaluate(&self, vector: &FeatureVector, p_dropout: f64) -> Result<InterventionPlan> {
        FeatureSchema::student().validate(vector)?;

        if !p_dropout.is_finite() || !(0.0..=1.0).contains(&p_dropout) {
            return Err(Error::domain(
                P_DROPOUT,
                p_dropout,
                "probability must be within [0, 1]",
            ));
        }

        let risk_tier = self.tiers.classify(p_dropout);
        let mut findings = Vec::new();

        for rule in self.rules.enabled() {
            let ctx = EvaluationContext {
                vector,
                p_dropout,
                prior_findings: findings.len(),
                thresholds: &self.thresholds,
            };

            if rule.trigger.evaluate(&ctx)? {
                debug!(rule = %rule.id, area = %rule.area, "Rule fired");
                findings.push(RiskFinding {
                    rule: rule.id.clone(),
                    area: rule.area.clone(),
                    description: rule.render_description(vector)?,
                    interventions: rule.interventions.clone(),
                });
            }
        }

        debug!(
            tier = %risk_tier,
            p_dropout,
            findings = findings.len(),
            "Intervention plan built"
        );

        Ok(InterventionPlan::new(risk_tier, p_dropout, findings))
    }
}

impl Default for InterventionRuleEngine {
    fn default() -> Self {
        Self::new()
    }
}
