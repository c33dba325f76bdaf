//! Rule trigger definitions

use crate::risk::PolicyThresholds;
use dropwatch_core::{FeatureVector, Result};
use serde::{Deserialize, Serialize};

/// Trigger condition for an intervention rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// `approved / max(enrolled, 1) < threshold`
    ///
    /// The `max(.., 1)` guard keeps zero enrollment defined: zero approved
    /// out of zero enrolled is a rate of 0, which fires.
    PassRateBelow {
        approved: String,
        enrolled: String,

        /// Falls back to the engine's pass-rate threshold
        #[serde(default, skip_serializing_if = "Option::is_none")]
        threshold: Option<f64>,
    },

    /// Field holds exactly the given value
    FieldEquals { field: String, value: f64 },

    /// Fires only when no earlier rule produced a finding and the dropout
    /// probability exceeds the threshold
    NoPriorFindings {
        /// Falls back to the engine's fallback threshold
        #[serde(default, skip_serializing_if = "Option::is_none")]
        risk_above: Option<f64>,
    },

    /// Composite trigger (AND/OR logic)
    Composite {
        operator: CompositeOperator,
        triggers: Vec<Trigger>,
    },
}

/// Operator for composite triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompositeOperator {
    And,
    Or,
}

/// Everything a trigger may look at
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub vector: &'a FeatureVector,
    pub p_dropout: f64,
    pub prior_findings: usize,
    pub thresholds: &'a PolicyThresholds,
}

impl Trigger {
    /// Evaluate against the context
    ///
    /// Composite children are all evaluated, so a missing field is reported
    /// even when an earlier child already decided the outcome.
    pub fn evaluate(&self, ctx: &EvaluationContext<'_>) -> Result<bool> {
        match self {
            Self::PassRateBelow {
                approved,
                enrolled,
                threshold,
            } => {
                let approved = ctx.vector.require(approved)?;
                let enrolled = ctx.vector.require(enrolled)?;
                let threshold = threshold.unwrap_or(ctx.thresholds.pass_rate);
                Ok(pass_rate(approved, enrolled) < threshold)
            }
            Self::FieldEquals { field, value } => Ok(ctx.vector.require(field)? == *value),
            Self::NoPriorFindings { risk_above } => {
                let threshold = risk_above.unwrap_or(ctx.thresholds.fallback_risk);
                Ok(ctx.prior_findings == 0 && ctx.p_dropout > threshold)
            }
            Self::Composite { operator, triggers } => {
                let results = triggers
                    .iter()
                    .map(|t| t.evaluate(ctx))
                    .collect::<Result<Vec<bool>>>()?;
                Ok(match operator {
                    CompositeOperator::And => results.iter().all(|r| *r),
                    CompositeOperator::Or => results.iter().any(|r| *r),
                })
            }
        }
    }

    /// Field names this trigger reads
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::PassRateBelow {
                approved, enrolled, ..
            } => vec![approved.as_str(), enrolled.as_str()],
            Self::FieldEquals { field, .. } => vec![field.as_str()],
            Self::NoPriorFindings { .. } => Vec::new(),
            Self::Composite { triggers, .. } => triggers.iter().flat_map(|t| t.fields()).collect(),
        }
    }

    /// OR over `field == value` for each field
    pub fn any_equals(conditions: &[(&str, f64)]) -> Self {
        Self::Composite {
            operator: CompositeOperator::Or,
            triggers: conditions
                .iter()
                .map(|(field, value)| Self::FieldEquals {
                    field: field.to_string(),
                    value: *value,
                })
                .collect(),
        }
    }
}

/// Share of enrolled units that were approved, with zero enrollment
/// treated as one
pub fn pass_rate(approved: f64, enrolled: f64) -> f64 {
    approved / enrolled.max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dropwatch_core::fields;

    fn ctx<'a>(
        vector: &'a FeatureVector,
        p_dropout: f64,
        prior_findings: usize,
        thresholds: &'a PolicyThresholds,
    ) -> EvaluationContext<'a> {
        EvaluationContext {
            vector,
            p_dropout,
            prior_findings,
            thresholds,
        }
    }

    #[test]
    fn test_pass_rate_guard() {
        assert_eq!(pass_rate(0.0, 0.0), 0.0);
        assert_eq!(pass_rate(3.0, 6.0), 0.5);
        assert_eq!(pass_rate(1.0, 0.0), 1.0);
    }

    #[test]
    fn test_pass_rate_trigger() {
        let thresholds = PolicyThresholds::default();
        let trigger = Trigger::PassRateBelow {
            approved: fields::CU_1ST_SEM_APPROVED.to_string(),
            enrolled: fields::CU_1ST_SEM_ENROLLED.to_string(),
            threshold: None,
        };

        let v = FeatureVector::from_parts(
            [fields::CU_1ST_SEM_ENROLLED, fields::CU_1ST_SEM_APPROVED],
            [5.0, 3.0],
        );
        // 3 / 5 = 0.6 is not below 0.6
        assert!(!trigger.evaluate(&ctx(&v, 0.9, 0, &thresholds)).unwrap());

        let v = v.with_value(fields::CU_1ST_SEM_APPROVED, 2.0).unwrap();
        assert!(trigger.evaluate(&ctx(&v, 0.9, 0, &thresholds)).unwrap());
    }

    #[test]
    fn test_composite_or_reads_every_field() {
        let thresholds = PolicyThresholds::default();
        let trigger = Trigger::any_equals(&[(fields::DEBTOR, 1.0), (fields::TUITION_FEES_UP_TO_DATE, 0.0)]);

        let v = FeatureVector::from_parts([fields::DEBTOR], [1.0]);
        let err = trigger.evaluate(&ctx(&v, 0.5, 0, &thresholds)).unwrap_err();
        assert!(err.is_schema());

        let v = FeatureVector::from_parts(
            [fields::DEBTOR, fields::TUITION_FEES_UP_TO_DATE],
            [0.0, 0.0],
        );
        assert!(trigger.evaluate(&ctx(&v, 0.5, 0, &thresholds)).unwrap());
    }

    #[test]
    fn test_composite_and() {
        let thresholds = PolicyThresholds::default();
        let trigger = Trigger::Composite {
            operator: CompositeOperator::And,
            triggers: vec![
                Trigger::FieldEquals {
                    field: fields::DEBTOR.to_string(),
                    value: 1.0,
                },
                Trigger::FieldEquals {
                    field: fields::SCHOLARSHIP_HOLDER.to_string(),
                    value: 0.0,
                },
            ],
        };

        let v = FeatureVector::from_parts([fields::DEBTOR, fields::SCHOLARSHIP_HOLDER], [1.0, 1.0]);
        assert!(!trigger.evaluate(&ctx(&v, 0.5, 0, &thresholds)).unwrap());
    }

    #[test]
    fn test_no_prior_findings() {
        let thresholds = PolicyThresholds::default();
        let trigger = Trigger::NoPriorFindings { risk_above: None };
        let v = FeatureVector::from_pairs(Vec::<(String, f64)>::new());

        assert!(trigger.evaluate(&ctx(&v, 0.55, 0, &thresholds)).unwrap());
        assert!(!trigger.evaluate(&ctx(&v, 0.50, 0, &thresholds)).unwrap());
        assert!(!trigger.evaluate(&ctx(&v, 0.95, 1, &thresholds)).unwrap());
    }

    #[test]
    fn test_trigger_yaml() {
        let yaml = r#"
type: composite
operator: or
triggers:
  - type: field_equals
    field: International
    value: 1
  - type: field_equals
    field: Displaced
    value: 1
"#;
        let trigger: Trigger = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(trigger.fields(), vec!["International", "Displaced"]);
    }
}
