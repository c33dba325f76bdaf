//! Canonical feature schema
//!
//! The model and the standardizer were both fitted on the 36 columns of the
//! reference dataset, in the order listed here. Every feature vector that
//! crosses into the pipeline must carry exactly these fields in exactly this
//! order; nothing downstream reorders.

use crate::{Error, FeatureVector, Result};
use serde::Serialize;

/// Field names, as they appear in the reference dataset header
pub mod fields {
    pub const MARITAL_STATUS: &str = "Marital_status";
    pub const APPLICATION_MODE: &str = "Application_mode";
    pub const APPLICATION_ORDER: &str = "Application_order";
    pub const COURSE: &str = "Course";
    pub const DAYTIME_EVENING_ATTENDANCE: &str = "Daytime_evening_attendance";
    pub const PREVIOUS_QUALIFICATION: &str = "Previous_qualification";
    pub const PREVIOUS_QUALIFICATION_GRADE: &str = "Previous_qualification_grade";
    pub const NACIONALITY: &str = "Nacionality";
    pub const MOTHERS_QUALIFICATION: &str = "Mothers_qualification";
    pub const FATHERS_QUALIFICATION: &str = "Fathers_qualification";
    pub const MOTHERS_OCCUPATION: &str = "Mothers_occupation";
    pub const FATHERS_OCCUPATION: &str = "Fathers_occupation";
    pub const ADMISSION_GRADE: &str = "Admission_grade";
    pub const DISPLACED: &str = "Displaced";
    pub const EDUCATIONAL_SPECIAL_NEEDS: &str = "Educational_special_needs";
    pub const DEBTOR: &str = "Debtor";
    pub const TUITION_FEES_UP_TO_DATE: &str = "Tuition_fees_up_to_date";
    pub const GENDER: &str = "Gender";
    pub const SCHOLARSHIP_HOLDER: &str = "Scholarship_holder";
    pub const AGE_AT_ENROLLMENT: &str = "Age_at_enrollment";
    pub const INTERNATIONAL: &str = "International";
    pub const CU_1ST_SEM_CREDITED: &str = "Curricular_units_1st_sem_credited";
    pub const CU_1ST_SEM_ENROLLED: &str = "Curricular_units_1st_sem_enrolled";
    pub const CU_1ST_SEM_EVALUATIONS: &str = "Curricular_units_1st_sem_evaluations";
    pub const CU_1ST_SEM_APPROVED: &str = "Curricular_units_1st_sem_approved";
    pub const CU_1ST_SEM_GRADE: &str = "Curricular_units_1st_sem_grade";
    pub const CU_1ST_SEM_WITHOUT_EVALUATIONS: &str = "Curricular_units_1st_sem_without_evaluations";
    pub const CU_2ND_SEM_CREDITED: &str = "Curricular_units_2nd_sem_credited";
    pub const CU_2ND_SEM_ENROLLED: &str = "Curricular_units_2nd_sem_enrolled";
    pub const CU_2ND_SEM_EVALUATIONS: &str = "Curricular_units_2nd_sem_evaluations";
    pub const CU_2ND_SEM_APPROVED: &str = "Curricular_units_2nd_sem_approved";
    pub const CU_2ND_SEM_GRADE: &str = "Curricular_units_2nd_sem_grade";
    pub const CU_2ND_SEM_WITHOUT_EVALUATIONS: &str = "Curricular_units_2nd_sem_without_evaluations";
    pub const UNEMPLOYMENT_RATE: &str = "Unemployment_rate";
    pub const INFLATION_RATE: &str = "Inflation_rate";
    pub const GDP: &str = "GDP";
}

/// Number of fields in the student schema
pub const FEATURE_COUNT: usize = 36;

/// Declared value domain of a field
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldDomain {
    /// Integer category code. Any non-negative code is accepted; codes missing
    /// from the display catalogs are passed to the model unchanged.
    Categorical,

    /// Flag, exactly 0 or 1
    Binary,

    /// Non-negative integer count with an optional upper bound
    Count { max: Option<f64> },

    /// Real value within a closed interval
    Continuous { min: f64, max: f64 },
}

impl FieldDomain {
    /// Check a single value against this domain
    pub fn check(&self, field: &str, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::domain(field, value, "value is not a finite number"));
        }

        match *self {
            Self::Categorical => {
                if value < 0.0 || value.fract() != 0.0 {
                    return Err(Error::domain(
                        field,
                        value,
                        "category code must be a non-negative integer",
                    ));
                }
            }
            Self::Binary => {
                if value != 0.0 && value != 1.0 {
                    return Err(Error::domain(field, value, "flag must be 0 or 1"));
                }
            }
            Self::Count { max } => {
                if value < 0.0 || value.fract() != 0.0 {
                    return Err(Error::domain(
                        field,
                        value,
                        "count must be a non-negative integer",
                    ));
                }
                if let Some(max) = max {
                    if value > max {
                        return Err(Error::domain(
                            field,
                            value,
                            format!("count exceeds maximum {}", max),
                        ));
                    }
                }
            }
            Self::Continuous { min, max } => {
                if value < min || value > max {
                    return Err(Error::domain(
                        field,
                        value,
                        format!("value outside [{}, {}]", min, max),
                    ));
                }
            }
        }

        Ok(())
    }
}

/// A named field and its domain
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub domain: FieldDomain,
}

impl FieldSpec {
    const fn new(name: &'static str, domain: FieldDomain) -> Self {
        Self { name, domain }
    }
}

const CATEGORICAL: FieldDomain = FieldDomain::Categorical;
const BINARY: FieldDomain = FieldDomain::Binary;
const UNITS: FieldDomain = FieldDomain::Count { max: None };
const SEMESTER_GRADE: FieldDomain = FieldDomain::Continuous { min: 0.0, max: 20.0 };
const ENTRY_GRADE: FieldDomain = FieldDomain::Continuous { min: 0.0, max: 200.0 };
const MACRO_RATE: FieldDomain = FieldDomain::Continuous {
    min: -100.0,
    max: 100.0,
};

use fields::*;

static STUDENT_FIELDS: [FieldSpec; FEATURE_COUNT] = [
    FieldSpec::new(MARITAL_STATUS, CATEGORICAL),
    FieldSpec::new(APPLICATION_MODE, CATEGORICAL),
    FieldSpec::new(APPLICATION_ORDER, FieldDomain::Count { max: Some(9.0) }),
    FieldSpec::new(COURSE, CATEGORICAL),
    FieldSpec::new(DAYTIME_EVENING_ATTENDANCE, BINARY),
    FieldSpec::new(PREVIOUS_QUALIFICATION, CATEGORICAL),
    FieldSpec::new(PREVIOUS_QUALIFICATION_GRADE, ENTRY_GRADE),
    FieldSpec::new(NACIONALITY, CATEGORICAL),
    FieldSpec::new(MOTHERS_QUALIFICATION, CATEGORICAL),
    FieldSpec::new(FATHERS_QUALIFICATION, CATEGORICAL),
    FieldSpec::new(MOTHERS_OCCUPATION, CATEGORICAL),
    FieldSpec::new(FATHERS_OCCUPATION, CATEGORICAL),
    FieldSpec::new(ADMISSION_GRADE, ENTRY_GRADE),
    FieldSpec::new(DISPLACED, BINARY),
    FieldSpec::new(EDUCATIONAL_SPECIAL_NEEDS, BINARY),
    FieldSpec::new(DEBTOR, BINARY),
    FieldSpec::new(TUITION_FEES_UP_TO_DATE, BINARY),
    FieldSpec::new(GENDER, BINARY),
    FieldSpec::new(SCHOLARSHIP_HOLDER, BINARY),
    FieldSpec::new(AGE_AT_ENROLLMENT, FieldDomain::Count { max: Some(120.0) }),
    FieldSpec::new(INTERNATIONAL, BINARY),
    FieldSpec::new(CU_1ST_SEM_CREDITED, UNITS),
    FieldSpec::new(CU_1ST_SEM_ENROLLED, UNITS),
    FieldSpec::new(CU_1ST_SEM_EVALUATIONS, UNITS),
    FieldSpec::new(CU_1ST_SEM_APPROVED, UNITS),
    FieldSpec::new(CU_1ST_SEM_GRADE, SEMESTER_GRADE),
    FieldSpec::new(CU_1ST_SEM_WITHOUT_EVALUATIONS, UNITS),
    FieldSpec::new(CU_2ND_SEM_CREDITED, UNITS),
    FieldSpec::new(CU_2ND_SEM_ENROLLED, UNITS),
    FieldSpec::new(CU_2ND_SEM_EVALUATIONS, UNITS),
    FieldSpec::new(CU_2ND_SEM_APPROVED, UNITS),
    FieldSpec::new(CU_2ND_SEM_GRADE, SEMESTER_GRADE),
    FieldSpec::new(CU_2ND_SEM_WITHOUT_EVALUATIONS, UNITS),
    FieldSpec::new(UNEMPLOYMENT_RATE, FieldDomain::Continuous { min: 0.0, max: 100.0 }),
    FieldSpec::new(INFLATION_RATE, MACRO_RATE),
    FieldSpec::new(GDP, MACRO_RATE),
];

/// Ordered list of named fields with their domains
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSchema {
    fields: &'static [FieldSpec],
}

impl FeatureSchema {
    /// The 36-field student schema
    pub fn student() -> Self {
        Self {
            fields: &STUDENT_FIELDS,
        }
    }

    /// Fields in canonical order
    pub fn fields(&self) -> &'static [FieldSpec] {
        self.fields
    }

    /// Field names in canonical order
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|f| f.name)
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Position of a field in the canonical order
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check that the vector carries exactly the schema's fields, in order
    pub fn check_layout(&self, vector: &FeatureVector) -> Result<()> {
        check_names(self.names(), vector.names())
    }

    /// Check every value against its field's declared domain
    ///
    /// Assumes the layout has already been checked.
    pub fn check_domain(&self, vector: &FeatureVector) -> Result<()> {
        for (spec, value) in self.fields.iter().zip(vector.values()) {
            spec.domain.check(spec.name, value)?;
        }
        Ok(())
    }

    /// Full structural validation: layout first, then domains
    pub fn validate(&self, vector: &FeatureVector) -> Result<()> {
        self.check_layout(vector)?;
        self.check_domain(vector)
    }
}

impl Default for FeatureSchema {
    fn default() -> Self {
        Self::student()
    }
}

/// Compare an expected name sequence against an actual one, reporting the
/// first divergence as a schema error
pub fn check_names<'a, 'b>(
    expected: impl IntoIterator<Item = &'a str>,
    actual: impl IntoIterator<Item = &'b str>,
) -> Result<()> {
    let expected: Vec<&str> = expected.into_iter().collect();
    let actual: Vec<&str> = actual.into_iter().collect();

    for (position, want) in expected.iter().enumerate() {
        match actual.get(position) {
            Some(got) if got == want => continue,
            Some(got) => {
                let reason = if actual.contains(want) {
                    format!("expected at position {}, found `{}` there", position, got)
                } else {
                    "missing".to_string()
                };
                return Err(Error::schema(*want, reason));
            }
            None => return Err(Error::schema(*want, "missing")),
        }
    }

    if let Some(extra) = actual.get(expected.len()) {
        return Err(Error::schema(
            *extra,
            format!("unexpected field (schema has {} fields)", expected.len()),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ordered_pairs() -> Vec<(String, f64)> {
        FeatureSchema::student()
            .names()
            .map(|n| (n.to_string(), 0.0))
            .collect()
    }

    fn vector_from(pairs: Vec<(String, f64)>) -> FeatureVector {
        FeatureVector::from_pairs(pairs)
    }

    #[test]
    fn test_student_schema_shape() {
        let schema = FeatureSchema::student();
        assert_eq!(schema.len(), FEATURE_COUNT);
        assert_eq!(schema.fields()[0].name, fields::MARITAL_STATUS);
        assert_eq!(schema.fields()[35].name, fields::GDP);
        assert_eq!(schema.index_of(fields::DEBTOR), Some(15));

        let mut names: Vec<_> = schema.names().collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FEATURE_COUNT, "field names must be unique");
    }

    #[test]
    fn test_layout_accepts_canonical_order() {
        let schema = FeatureSchema::student();
        assert!(schema.check_layout(&vector_from(ordered_pairs())).is_ok());
    }

    #[test]
    fn test_layout_rejects_missing_field() {
        let schema = FeatureSchema::student();
        let pairs: Vec<_> = ordered_pairs()
            .into_iter()
            .filter(|(n, _)| n != fields::GDP)
            .collect();

        let err = schema.check_layout(&vector_from(pairs)).unwrap_err();
        assert_eq!(err, Error::schema(fields::GDP, "missing"));
    }

    #[test]
    fn test_layout_rejects_misordered_fields() {
        let schema = FeatureSchema::student();
        let mut pairs = ordered_pairs();
        pairs.swap(0, 1);

        let err = schema.check_layout(&vector_from(pairs)).unwrap_err();
        match err {
            Error::Schema { field, reason } => {
                assert_eq!(field, fields::MARITAL_STATUS);
                assert!(reason.contains("position 0"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_layout_rejects_extra_field() {
        let schema = FeatureSchema::student();
        let mut pairs = ordered_pairs();
        pairs.push(("Target".to_string(), 1.0));

        let err = schema.check_layout(&vector_from(pairs)).unwrap_err();
        assert!(matches!(err, Error::Schema { ref field, .. } if field == "Target"));
    }

    #[test]
    fn test_binary_domain() {
        assert!(BINARY.check(fields::DEBTOR, 0.0).is_ok());
        assert!(BINARY.check(fields::DEBTOR, 1.0).is_ok());
        assert!(BINARY.check(fields::DEBTOR, 2.0).unwrap_err().is_domain());
        assert!(BINARY.check(fields::DEBTOR, 0.5).unwrap_err().is_domain());
    }

    #[test]
    fn test_categorical_accepts_unknown_codes() {
        // 9999 is in no catalog but is still a structurally valid code
        assert!(CATEGORICAL.check(fields::COURSE, 9999.0).is_ok());
        assert!(CATEGORICAL.check(fields::COURSE, -1.0).is_err());
        assert!(CATEGORICAL.check(fields::COURSE, 1.5).is_err());
    }

    #[test]
    fn test_non_finite_rejected() {
        let err = ENTRY_GRADE
            .check(fields::ADMISSION_GRADE, f64::NAN)
            .unwrap_err();
        assert!(err.is_domain());
        assert!(MACRO_RATE.check(fields::GDP, f64::INFINITY).is_err());
    }

    #[test]
    fn test_count_and_continuous_bounds() {
        let order = FieldDomain::Count { max: Some(9.0) };
        assert!(order.check(fields::APPLICATION_ORDER, 9.0).is_ok());
        assert!(order.check(fields::APPLICATION_ORDER, 10.0).is_err());
        assert!(SEMESTER_GRADE.check(fields::CU_1ST_SEM_GRADE, 20.0).is_ok());
        assert!(SEMESTER_GRADE.check(fields::CU_1ST_SEM_GRADE, 20.1).is_err());
        assert!(MACRO_RATE.check(fields::GDP, -4.06).is_ok());
    }

    #[test]
    fn test_validate_reports_domain_after_layout() {
        let schema = FeatureSchema::student();
        let mut pairs = ordered_pairs();
        let debtor = schema.index_of(fields::DEBTOR).unwrap();
        pairs[debtor].1 = 2.0;

        let err = schema.validate(&vector_from(pairs)).unwrap_err();
        assert_eq!(
            err,
            Error::domain(fields::DEBTOR, 2.0, "flag must be 0 or 1")
        );
    }
}
