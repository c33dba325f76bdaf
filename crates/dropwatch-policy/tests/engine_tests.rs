//! Intervention rule engine tests

use dropwatch_core::{fields, FeatureVector, StudentRecord};
use dropwatch_policy::{
    build_plan, InterventionRuleEngine, RiskTier, RiskTierClassifier, RuleSet, LOW_RISK_MESSAGE,
};
use proptest::prelude::*;

/// Passes both semesters, pays on time, local, not displaced
fn no_rule_student() -> StudentRecord {
    StudentRecord {
        cu_1st_sem_enrolled: 6.0,
        cu_1st_sem_approved: 5.0,
        cu_2nd_sem_enrolled: 6.0,
        cu_2nd_sem_approved: 5.0,
        debtor: 0.0,
        tuition_fees_up_to_date: 1.0,
        international: 0.0,
        displaced: 0.0,
        ..StudentRecord::default()
    }
}

#[test]
fn test_zero_enrollment_fires_first_semester_only() {
    let record = StudentRecord {
        cu_1st_sem_enrolled: 0.0,
        cu_1st_sem_approved: 0.0,
        ..no_rule_student()
    };

    let plan = build_plan(&FeatureVector::from(&record), 0.75).unwrap();
    assert_eq!(plan.findings.len(), 1);

    let finding = &plan.findings[0];
    assert_eq!(finding.rule, "first_semester");
    assert_eq!(finding.area, "Academic Performance (1st Semester)");
    assert_eq!(finding.description, "Student passed only 0 of 0 courses.");
    assert_eq!(
        finding.interventions,
        vec![
            "Weekly meetings with an academic advisor",
            "Enrollment in supplemental instruction sessions",
            "Consideration for course load reduction",
        ]
    );
    assert_eq!(plan.risk_tier, RiskTier::Medium);
    assert!(plan.fallback_message.is_none());
    assert_eq!(plan.timeline.len(), 3);
}

#[test]
fn test_fallback_above_half() {
    let plan = build_plan(&FeatureVector::from(&no_rule_student()), 0.55).unwrap();
    assert_eq!(plan.rule_ids(), vec!["multiple_factors"]);
    assert_eq!(plan.findings[0].area, "Multiple Factors");
    assert_eq!(plan.findings[0].interventions.len(), 4);
    assert_eq!(plan.risk_tier, RiskTier::Low);
}

#[test]
fn test_no_findings_below_half() {
    let plan = build_plan(&FeatureVector::from(&no_rule_student()), 0.40).unwrap();
    assert!(plan.findings.is_empty());
    assert_eq!(plan.fallback_message.as_deref(), Some(LOW_RISK_MESSAGE));
    assert!(plan.timeline.is_empty());
}

#[test]
fn test_fallback_boundary_is_strict() {
    let plan = build_plan(&FeatureVector::from(&no_rule_student()), 0.5).unwrap();
    assert!(plan.findings.is_empty());
}

#[test]
fn test_four_findings_in_fixed_order() {
    let record = StudentRecord {
        cu_1st_sem_approved: 1.0,
        cu_2nd_sem_approved: 2.0,
        debtor: 1.0,
        international: 1.0,
        ..no_rule_student()
    };

    // Even at low probability the order and set are unchanged
    for p in [0.95, 0.3] {
        let plan = build_plan(&FeatureVector::from(&record), p).unwrap();
        assert_eq!(
            plan.rule_ids(),
            vec!["first_semester", "second_semester", "financial", "social"]
        );
    }

    let plan = build_plan(&FeatureVector::from(&record), 0.95).unwrap();
    assert_eq!(plan.risk_tier, RiskTier::High);
    assert_eq!(
        plan.findings[1].description,
        "Student passed only 2 of 6 courses."
    );
    assert_eq!(
        plan.findings[2].description,
        "Student has financial difficulties with tuition payments."
    );
    assert_eq!(plan.findings[3].area, "Social Integration");
}

#[test]
fn test_tuition_arrears_alone_is_financial() {
    let record = StudentRecord {
        tuition_fees_up_to_date: 0.0,
        ..no_rule_student()
    };
    let plan = build_plan(&FeatureVector::from(&record), 0.9).unwrap();
    assert_eq!(plan.rule_ids(), vec!["financial"]);
}

#[test]
fn test_displaced_alone_is_social() {
    let record = StudentRecord {
        displaced: 1.0,
        ..no_rule_student()
    };
    let plan = build_plan(&FeatureVector::from(&record), 0.2).unwrap();
    assert_eq!(plan.rule_ids(), vec!["social"]);
}

#[test]
fn test_tier_boundaries() {
    let tiers = RiskTierClassifier::default();
    assert_eq!(tiers.classify(0.59), RiskTier::Low);
    assert_eq!(tiers.classify(0.60), RiskTier::Low);
    assert_eq!(tiers.classify(0.600001), RiskTier::Medium);
    assert_eq!(tiers.classify(0.80), RiskTier::Medium);
    assert_eq!(tiers.classify(0.81), RiskTier::High);
}

#[test]
fn test_rule_set_from_file() {
    let yaml = r#"
name: scholarship-review
version: "2"
rules:
  - id: lost_scholarship
    area: Scholarship
    description: "Scholarship holder with {Curricular_units_1st_sem_approved} approved units."
    trigger:
      type: composite
      operator: and
      triggers:
        - type: field_equals
          field: Scholarship_holder
          value: 1
        - type: pass_rate_below
          approved: Curricular_units_1st_sem_approved
          enrolled: Curricular_units_1st_sem_enrolled
          threshold: 0.9
    interventions:
      - Scholarship office review
  - id: fallback
    area: General
    description: "Elevated risk."
    trigger:
      type: no_prior_findings
      risk_above: 0.3
    interventions:
      - Advisor meeting
"#;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.yaml");
    std::fs::write(&path, yaml).unwrap();

    let engine = InterventionRuleEngine::new()
        .with_rules(RuleSet::from_file(&path).unwrap())
        .unwrap();

    let holder = StudentRecord {
        scholarship_holder: 1.0,
        ..no_rule_student()
    };
    let plan = engine.evaluate(&FeatureVector::from(&holder), 0.4).unwrap();
    assert_eq!(plan.rule_ids(), vec!["lost_scholarship"]);
    assert_eq!(
        plan.findings[0].description,
        "Scholarship holder with 5 approved units."
    );

    let plan = engine
        .evaluate(&FeatureVector::from(&no_rule_student()), 0.4)
        .unwrap();
    assert_eq!(plan.rule_ids(), vec!["fallback"]);
}

#[test]
fn test_missing_rule_field_is_schema_error() {
    let vector = FeatureVector::from(&no_rule_student());
    let partial = FeatureVector::from_pairs(
        vector
            .features()
            .iter()
            .filter(|f| f.name != fields::DISPLACED)
            .map(|f| (f.name.clone(), f.value)),
    );

    let err = build_plan(&partial, 0.7).unwrap_err();
    assert!(err.is_schema());
}

#[test]
fn test_invalid_vectors_are_rejected() {
    let flagged = FeatureVector::from(&no_rule_student())
        .with_value(fields::DEBTOR, 2.0)
        .unwrap();
    assert!(build_plan(&flagged, 0.3).unwrap_err().is_domain());

    let rule_fields_only = FeatureVector::from_parts(
        [
            fields::CU_1ST_SEM_APPROVED,
            fields::CU_1ST_SEM_ENROLLED,
            fields::CU_2ND_SEM_APPROVED,
            fields::CU_2ND_SEM_ENROLLED,
            fields::DEBTOR,
            fields::TUITION_FEES_UP_TO_DATE,
            fields::INTERNATIONAL,
            fields::DISPLACED,
        ],
        [5.0, 6.0, 5.0, 6.0, 0.0, 1.0, 0.0, 0.0],
    );
    assert!(build_plan(&rule_fields_only, 0.3).unwrap_err().is_schema());
}

proptest! {
    #[test]
    fn prop_plan_is_deterministic(
        approved1 in 0u8..=10,
        approved2 in 0u8..=10,
        debtor in prop::bool::ANY,
        international in prop::bool::ANY,
        p in 0.0f64..=1.0,
    ) {
        let record = StudentRecord {
            cu_1st_sem_approved: approved1 as f64,
            cu_1st_sem_enrolled: 10.0,
            cu_2nd_sem_approved: approved2 as f64,
            cu_2nd_sem_enrolled: 10.0,
            debtor: if debtor { 1.0 } else { 0.0 },
            international: if international { 1.0 } else { 0.0 },
            ..no_rule_student()
        };
        let vector = FeatureVector::from(&record);

        let a = build_plan(&vector, p).unwrap();
        let b = build_plan(&vector, p).unwrap();
        prop_assert_eq!(&a, &b);

        // The fallback never coexists with another finding
        if a.finding("multiple_factors").is_some() {
            prop_assert_eq!(a.findings.len(), 1);
        }
        prop_assert_eq!(a.fallback_message.is_some(), a.findings.is_empty());
    }
}
