//! Report assembly and rendering
//!
//! The presentation gates live here, outside the rule engine: risk factors
//! are listed only for predicted dropouts above [`RISK_FACTORS_GATE`], and
//! the generic recommendations only above [`INTERVENTIONS_GATE`].

use dropwatch_classifiers::PredictionResult;
use dropwatch_core::catalog::{attendance_label, flag_label, gender_label};
use dropwatch_core::{fields, Catalog, FeatureSchema, FieldDomain, FeatureVector, Result};
use dropwatch_policy::rule::format_value;
use dropwatch_policy::trigger::pass_rate;
use dropwatch_policy::InterventionPlan;
use serde::Serialize;
use std::fmt::Write;

/// Dropout probability above which risk factors are listed
pub const RISK_FACTORS_GATE: f64 = 0.7;

/// Dropout probability above which generic recommendations are shown
pub const INTERVENTIONS_GATE: f64 = 0.6;

/// Pass rate below which a semester counts as a risk factor
pub const FACTOR_PASS_RATE: f64 = 0.5;

/// Semester grade below which a semester counts as a risk factor
pub const FACTOR_GRADE: f64 = 11.0;

/// Shown when the gate opens but no individual factor applies
pub const NO_SPECIFIC_FACTORS: &str = "No specific risk factors identified, but the combination of various attributes indicates dropout risk.";

/// A generic recommended intervention
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub title: &'static str,
    pub description: &'static str,
}

pub const RECOMMENDATIONS: [Recommendation; 5] = [
    Recommendation {
        title: "Academic Advising",
        description: "Schedule a meeting with an academic advisor to discuss course progress and create a structured study plan.",
    },
    Recommendation {
        title: "Tutoring Services",
        description: "Connect with the tutoring center for additional academic support in challenging subjects.",
    },
    Recommendation {
        title: "Financial Assistance",
        description: "Meet with the financial aid office to explore scholarship options, payment plans, or emergency funding.",
    },
    Recommendation {
        title: "Regular Check-ins",
        description: "Establish bi-weekly check-ins with a faculty mentor to track progress and address concerns early.",
    },
    Recommendation {
        title: "Study Skills Workshop",
        description: "Attend workshops on time management, note-taking, and effective study techniques.",
    },
];

/// Individual risk factors for the gated risk section
pub fn risk_factors(vector: &FeatureVector) -> Result<Vec<String>> {
    let mut factors = Vec::new();

    let semesters = [
        (
            "1st",
            fields::CU_1ST_SEM_APPROVED,
            fields::CU_1ST_SEM_ENROLLED,
        ),
        (
            "2nd",
            fields::CU_2ND_SEM_APPROVED,
            fields::CU_2ND_SEM_ENROLLED,
        ),
    ];
    for (label, approved, enrolled) in semesters {
        if pass_rate(vector.require(approved)?, vector.require(enrolled)?) < FACTOR_PASS_RATE {
            factors.push(format!("Low pass rate in {} semester courses", label));
        }
    }

    for (label, grade) in [("1st", fields::CU_1ST_SEM_GRADE), ("2nd", fields::CU_2ND_SEM_GRADE)] {
        if vector.require(grade)? < FACTOR_GRADE {
            factors.push(format!("Below average grades in {} semester", label));
        }
    }

    if vector.require(fields::DEBTOR)? == 1.0 {
        factors.push("Has tuition debt".to_string());
    }
    if vector.require(fields::TUITION_FEES_UP_TO_DATE)? == 0.0 {
        factors.push("Tuition fees not up to date".to_string());
    }

    if factors.is_empty() {
        factors.push(NO_SPECIFIC_FACTORS.to_string());
    }
    Ok(factors)
}

/// Everything shown for one student
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub prediction: PredictionResult,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_factors: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Recommendation>>,

    pub plan: InterventionPlan,
}

impl Report {
    /// Apply the presentation gates
    pub fn build(
        vector: &FeatureVector,
        prediction: PredictionResult,
        plan: InterventionPlan,
    ) -> Result<Self> {
        let p_dropout = prediction.p_dropout();
        let dropout = prediction.is_dropout();

        let risk_factors = if dropout && p_dropout > RISK_FACTORS_GATE {
            Some(risk_factors(vector)?)
        } else {
            None
        };

        let recommendations = if dropout && p_dropout > INTERVENTIONS_GATE {
            Some(RECOMMENDATIONS.to_vec())
        } else {
            None
        };

        Ok(Self {
            prediction,
            risk_factors,
            recommendations,
            plan,
        })
    }
}

/// Human-readable student profile using the display catalogs
pub fn render_profile(vector: &FeatureVector) -> String {
    let value = |field: &str| vector.get(field).unwrap_or(f64::NAN);
    let category = |field: &str| match Catalog::for_field(field) {
        Some(catalog) => catalog.display_value(value(field)),
        None => format_value(value(field)),
    };

    let rows = [
        ("Course", category(fields::COURSE)),
        (
            "Attendance",
            attendance_label(value(fields::DAYTIME_EVENING_ATTENDANCE)).to_string(),
        ),
        ("Application mode", category(fields::APPLICATION_MODE)),
        ("Marital status", category(fields::MARITAL_STATUS)),
        ("Nationality", category(fields::NACIONALITY)),
        ("Gender", gender_label(value(fields::GENDER)).to_string()),
        ("Age at enrollment", format_value(value(fields::AGE_AT_ENROLLMENT))),
        (
            "Scholarship",
            flag_label(value(fields::SCHOLARSHIP_HOLDER)).to_string(),
        ),
        ("Debtor", flag_label(value(fields::DEBTOR)).to_string()),
    ];

    let mut out = String::from("Student Profile\n");
    for (label, shown) in rows {
        let _ = writeln!(out, "  {:<18}{}", format!("{}:", label), shown);
    }
    out
}

/// Text rendering of a plan
pub fn render_plan(plan: &InterventionPlan) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Intervention Plan");
    let _ = writeln!(
        out,
        "  Risk level: {} ({:.1}% dropout probability)",
        plan.risk_tier,
        plan.p_dropout * 100.0
    );

    for (i, finding) in plan.findings.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  {}. {}", i + 1, finding.area);
        let _ = writeln!(out, "     {}", finding.description);
        for intervention in &finding.interventions {
            let _ = writeln!(out, "     - {}", intervention);
        }
    }

    if let Some(message) = &plan.fallback_message {
        let _ = writeln!(out);
        let _ = writeln!(out, "  {}", message);
    }

    if !plan.timeline.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "  Implementation Timeline");
        for phase in &plan.timeline {
            let _ = writeln!(out, "  {}", phase.period);
            for action in &phase.actions {
                let _ = writeln!(out, "     - {}", action);
            }
        }
    }

    out
}

/// Text rendering of a full report
pub fn render_report(vector: &FeatureVector, report: &Report) -> String {
    let mut out = render_profile(vector);
    let prediction = &report.prediction;

    let _ = writeln!(out);
    let _ = writeln!(out, "Prediction Result");
    if prediction.is_dropout() {
        let _ = writeln!(out, "  High Risk of Dropout ({:.2}%)", prediction.p_dropout() * 100.0);
    } else {
        let _ = writeln!(out, "  Likely to Graduate ({:.2}%)", prediction.p_graduate() * 100.0);
    }
    let _ = writeln!(out, "  Dropout probability:    {:.2}%", prediction.p_dropout() * 100.0);
    let _ = writeln!(out, "  Graduation probability: {:.2}%", prediction.p_graduate() * 100.0);

    if let Some(factors) = &report.risk_factors {
        let _ = writeln!(out);
        let _ = writeln!(out, "Potential Risk Factors");
        for factor in factors {
            let _ = writeln!(out, "  - {}", factor);
        }
    }

    if let Some(recommendations) = &report.recommendations {
        let _ = writeln!(out);
        let _ = writeln!(out, "Recommended Interventions");
        for rec in recommendations {
            let _ = writeln!(out, "  {}: {}", rec.title, rec.description);
        }
    }

    let _ = writeln!(out);
    out.push_str(&render_plan(&report.plan));
    out
}

/// Short description of a field domain
pub fn describe_domain(domain: &FieldDomain) -> String {
    match domain {
        FieldDomain::Categorical => "category code".to_string(),
        FieldDomain::Binary => "flag (0 or 1)".to_string(),
        FieldDomain::Count { max: Some(max) } => format!("count (0 to {})", format_value(*max)),
        FieldDomain::Count { max: None } => "count".to_string(),
        FieldDomain::Continuous { min, max } => {
            format!("real [{}, {}]", format_value(*min), format_value(*max))
        }
    }
}

/// Text listing of the schema, in canonical order
pub fn render_schema(schema: &FeatureSchema) -> String {
    let mut out = String::new();
    for (i, spec) in schema.fields().iter().enumerate() {
        let _ = write!(out, "{:>2}. {:<46} {}", i + 1, spec.name, describe_domain(&spec.domain));
        if let Some(catalog) = Catalog::for_field(spec.name) {
            let _ = write!(out, " ({} known codes)", catalog.entries().len());
        }
        let _ = writeln!(out);
    }
    out
}
