//! Rule set and rule definitions
//!
//! Rules are data: a rule set can be loaded from YAML, and the standard set
//! used by default is built in [`RuleSet::standard`].

use crate::trigger::Trigger;
use dropwatch_core::{fields, Error, FeatureSchema, FeatureVector, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An ordered set of intervention rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Rule set name
    pub name: String,

    /// Version of the rule set
    #[serde(default)]
    pub version: String,

    /// Rules, in evaluation order
    pub rules: Vec<InterventionRule>,
}

/// A single intervention rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionRule {
    /// Stable identifier, carried by the finding
    pub id: String,

    /// Risk area named in the finding
    pub area: String,

    /// Finding description; `{Field_name}` placeholders are replaced by the
    /// student's value for that field
    pub description: String,

    /// Trigger condition
    pub trigger: Trigger,

    /// Recommended interventions, in order
    pub interventions: Vec<String>,

    /// Whether this rule is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_true() -> bool {
    true
}

impl InterventionRule {
    fn new(id: &str, area: &str, description: &str, trigger: Trigger, interventions: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            area: area.to_string(),
            description: description.to_string(),
            trigger,
            interventions: interventions.iter().map(|i| i.to_string()).collect(),
            enabled: true,
        }
    }

    /// Description with placeholders filled from the vector
    pub fn render_description(&self, vector: &FeatureVector) -> Result<String> {
        render_template(&self.description, vector)
    }
}

impl RuleSet {
    /// Load a rule set from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::config(format!("invalid rule set: {}", e)))
    }

    /// Load a rule set from a file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    /// Check ids are unique and every referenced field exists in the schema
    pub fn validate(&self, schema: &FeatureSchema) -> Result<()> {
        let mut seen = HashSet::new();

        for rule in &self.rules {
            if rule.id.is_empty() {
                return Err(Error::config("rule with empty id"));
            }
            if !seen.insert(rule.id.as_str()) {
                return Err(Error::config(format!("duplicate rule id `{}`", rule.id)));
            }

            let referenced = rule
                .trigger
                .fields()
                .into_iter()
                .chain(placeholders(&rule.description));
            for field in referenced {
                if schema.field(field).is_none() {
                    return Err(Error::config(format!(
                        "rule `{}` references unknown field `{}`",
                        rule.id, field
                    )));
                }
            }
        }

        Ok(())
    }

    /// Enabled rules in evaluation order
    pub fn enabled(&self) -> impl Iterator<Item = &InterventionRule> {
        self.rules.iter().filter(|r| r.enabled)
    }

    /// Rule by id
    pub fn rule(&self, id: &str) -> Option<&InterventionRule> {
        self.rules.iter().find(|r| r.id == id)
    }

    /// The standard five-rule set
    pub fn standard() -> Self {
        const SEMESTER_DESCRIPTION_1: &str =
            "Student passed only {Curricular_units_1st_sem_approved} of {Curricular_units_1st_sem_enrolled} courses.";
        const SEMESTER_DESCRIPTION_2: &str =
            "Student passed only {Curricular_units_2nd_sem_approved} of {Curricular_units_2nd_sem_enrolled} courses.";

        Self {
            name: "standard".to_string(),
            version: "1".to_string(),
            rules: vec![
                InterventionRule::new(
                    "first_semester",
                    "Academic Performance (1st Semester)",
                    SEMESTER_DESCRIPTION_1,
                    Trigger::PassRateBelow {
                        approved: fields::CU_1ST_SEM_APPROVED.to_string(),
                        enrolled: fields::CU_1ST_SEM_ENROLLED.to_string(),
                        threshold: None,
                    },
                    &[
                        "Weekly meetings with an academic advisor",
                        "Enrollment in supplemental instruction sessions",
                        "Consideration for course load reduction",
                    ],
                ),
                InterventionRule::new(
                    "second_semester",
                    "Academic Performance (2nd Semester)",
                    SEMESTER_DESCRIPTION_2,
                    Trigger::PassRateBelow {
                        approved: fields::CU_2ND_SEM_APPROVED.to_string(),
                        enrolled: fields::CU_2ND_SEM_ENROLLED.to_string(),
                        threshold: None,
                    },
                    &[
                        "Mandatory tutoring sessions for difficult subjects",
                        "Mid-semester progress review with program coordinator",
                        "Study skills workshop attendance",
                    ],
                ),
                InterventionRule::new(
                    "financial",
                    "Financial Stability",
                    "Student has financial difficulties with tuition payments.",
                    Trigger::any_equals(&[
                        (fields::DEBTOR, 1.0),
                        (fields::TUITION_FEES_UP_TO_DATE, 0.0),
                    ]),
                    &[
                        "Financial aid office consultation",
                        "Payment plan options review",
                        "Emergency scholarship or grant application",
                        "Part-time campus employment opportunities",
                    ],
                ),
                InterventionRule::new(
                    "social",
                    "Social Integration",
                    "Student may face adjustment challenges due to international/displaced status.",
                    Trigger::any_equals(&[(fields::INTERNATIONAL, 1.0), (fields::DISPLACED, 1.0)]),
                    &[
                        "Connection with student communities for similar backgrounds",
                        "Regular check-ins with international student office",
                        "Cultural transition support group",
                        "Mentor matching program",
                    ],
                ),
                InterventionRule::new(
                    "multiple_factors",
                    "Multiple Factors",
                    "No single major risk factor identified, but combination of minor factors increases dropout risk.",
                    Trigger::NoPriorFindings { risk_above: None },
                    &[
                        "Holistic student success meeting with advisor",
                        "Regular progress monitoring",
                        "Student engagement opportunities assessment",
                        "Academic and personal goal-setting workshop",
                    ],
                ),
            ],
        }
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// Field names referenced as `{Field_name}` in a template
fn placeholders(template: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                names.push(&after[..close]);
                rest = &after[close + 1..];
            }
            None => break,
        }
    }
    names
}

/// Replace each `{Field_name}` with the vector's value for that field
pub fn render_template(template: &str, vector: &FeatureVector) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        out.push_str(&format_value(vector.require(&after[..close])?));
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Integral values render without a fractional part
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_set_is_valid() {
        let rules = RuleSet::standard();
        rules.validate(&FeatureSchema::student()).unwrap();

        let ids: Vec<&str> = rules.enabled().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["first_semester", "second_semester", "financial", "social", "multiple_factors"]
        );
        assert_eq!(rules.rule("financial").unwrap().interventions.len(), 4);
    }

    #[test]
    fn test_render_template() {
        let v = FeatureVector::from_parts(
            [fields::CU_1ST_SEM_APPROVED, fields::CU_1ST_SEM_ENROLLED],
            [2.0, 6.0],
        );
        let rule = RuleSet::standard();
        let rendered = rule
            .rule("first_semester")
            .unwrap()
            .render_description(&v)
            .unwrap();
        assert_eq!(rendered, "Student passed only 2 of 6 courses.");
    }

    #[test]
    fn test_render_missing_field() {
        let v = FeatureVector::from_parts([fields::CU_1ST_SEM_APPROVED], [2.0]);
        let err = render_template("{Curricular_units_1st_sem_enrolled}", &v).unwrap_err();
        assert!(err.is_schema());
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(6.0), "6");
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(12.5), "12.5");
    }

    #[test]
    fn test_validate_rejects_unknown_field() {
        let yaml = r#"
name: custom
rules:
  - id: typo
    area: Finance
    description: "Owes {Debtr}"
    trigger:
      type: field_equals
      field: Debtor
      value: 1
    interventions: []
"#;
        let rules = RuleSet::from_yaml(yaml).unwrap();
        let err = rules.validate(&FeatureSchema::student()).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains("Debtr")));
    }

    #[test]
    fn test_validate_rejects_duplicate_ids() {
        let mut rules = RuleSet::standard();
        rules.rules.push(rules.rules[0].clone());
        assert!(rules.validate(&FeatureSchema::student()).is_err());
    }

    #[test]
    fn test_yaml_round_trip_of_standard_set() {
        let yaml = serde_yaml::to_string(&RuleSet::standard()).unwrap();
        assert_eq!(RuleSet::from_yaml(&yaml).unwrap(), RuleSet::standard());
    }
}
