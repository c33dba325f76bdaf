//! Typed student record
//!
//! Form and file adapters rarely produce fields in the canonical order. A
//! `StudentRecord` is deserialized by name and then laid out in schema order,
//! so an adapter never has to know the order itself.

use crate::schema::{fields, FeatureSchema, FEATURE_COUNT};
use crate::{FeatureVector, Result};
use serde::{Deserialize, Serialize};

/// One student's raw attributes, keyed by dataset column name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StudentRecord {
    #[serde(rename = "Marital_status")]
    pub marital_status: f64,
    #[serde(rename = "Application_mode")]
    pub application_mode: f64,
    #[serde(rename = "Application_order")]
    pub application_order: f64,
    #[serde(rename = "Course")]
    pub course: f64,
    #[serde(rename = "Daytime_evening_attendance")]
    pub daytime_evening_attendance: f64,
    #[serde(rename = "Previous_qualification")]
    pub previous_qualification: f64,
    #[serde(rename = "Previous_qualification_grade")]
    pub previous_qualification_grade: f64,
    #[serde(rename = "Nacionality")]
    pub nationality: f64,
    #[serde(rename = "Mothers_qualification")]
    pub mothers_qualification: f64,
    #[serde(rename = "Fathers_qualification")]
    pub fathers_qualification: f64,
    #[serde(rename = "Mothers_occupation")]
    pub mothers_occupation: f64,
    #[serde(rename = "Fathers_occupation")]
    pub fathers_occupation: f64,
    #[serde(rename = "Admission_grade")]
    pub admission_grade: f64,
    #[serde(rename = "Displaced")]
    pub displaced: f64,
    #[serde(rename = "Educational_special_needs")]
    pub educational_special_needs: f64,
    #[serde(rename = "Debtor")]
    pub debtor: f64,
    #[serde(rename = "Tuition_fees_up_to_date")]
    pub tuition_fees_up_to_date: f64,
    #[serde(rename = "Gender")]
    pub gender: f64,
    #[serde(rename = "Scholarship_holder")]
    pub scholarship_holder: f64,
    #[serde(rename = "Age_at_enrollment")]
    pub age_at_enrollment: f64,
    #[serde(rename = "International")]
    pub international: f64,
    #[serde(rename = "Curricular_units_1st_sem_credited")]
    pub cu_1st_sem_credited: f64,
    #[serde(rename = "Curricular_units_1st_sem_enrolled")]
    pub cu_1st_sem_enrolled: f64,
    #[serde(rename = "Curricular_units_1st_sem_evaluations")]
    pub cu_1st_sem_evaluations: f64,
    #[serde(rename = "Curricular_units_1st_sem_approved")]
    pub cu_1st_sem_approved: f64,
    #[serde(rename = "Curricular_units_1st_sem_grade")]
    pub cu_1st_sem_grade: f64,
    #[serde(rename = "Curricular_units_1st_sem_without_evaluations")]
    pub cu_1st_sem_without_evaluations: f64,
    #[serde(rename = "Curricular_units_2nd_sem_credited")]
    pub cu_2nd_sem_credited: f64,
    #[serde(rename = "Curricular_units_2nd_sem_enrolled")]
    pub cu_2nd_sem_enrolled: f64,
    #[serde(rename = "Curricular_units_2nd_sem_evaluations")]
    pub cu_2nd_sem_evaluations: f64,
    #[serde(rename = "Curricular_units_2nd_sem_approved")]
    pub cu_2nd_sem_approved: f64,
    #[serde(rename = "Curricular_units_2nd_sem_grade")]
    pub cu_2nd_sem_grade: f64,
    #[serde(rename = "Curricular_units_2nd_sem_without_evaluations")]
    pub cu_2nd_sem_without_evaluations: f64,
    #[serde(rename = "Unemployment_rate")]
    pub unemployment_rate: f64,
    #[serde(rename = "Inflation_rate")]
    pub inflation_rate: f64,
    #[serde(rename = "GDP")]
    pub gdp: f64,
}

impl StudentRecord {
    /// Values in canonical schema order
    pub fn to_row(&self) -> [f64; FEATURE_COUNT] {
        [
            self.marital_status,
            self.application_mode,
            self.application_order,
            self.course,
            self.daytime_evening_attendance,
            self.previous_qualification,
            self.previous_qualification_grade,
            self.nationality,
            self.mothers_qualification,
            self.fathers_qualification,
            self.mothers_occupation,
            self.fathers_occupation,
            self.admission_grade,
            self.displaced,
            self.educational_special_needs,
            self.debtor,
            self.tuition_fees_up_to_date,
            self.gender,
            self.scholarship_holder,
            self.age_at_enrollment,
            self.international,
            self.cu_1st_sem_credited,
            self.cu_1st_sem_enrolled,
            self.cu_1st_sem_evaluations,
            self.cu_1st_sem_approved,
            self.cu_1st_sem_grade,
            self.cu_1st_sem_without_evaluations,
            self.cu_2nd_sem_credited,
            self.cu_2nd_sem_enrolled,
            self.cu_2nd_sem_evaluations,
            self.cu_2nd_sem_approved,
            self.cu_2nd_sem_grade,
            self.cu_2nd_sem_without_evaluations,
            self.unemployment_rate,
            self.inflation_rate,
            self.gdp,
        ]
    }

    /// Lay the record out as a canonical feature vector
    pub fn to_feature_vector(&self) -> FeatureVector {
        FeatureVector::from_parts(FeatureSchema::student().names(), self.to_row())
    }

    /// Read a record back out of a canonical feature vector
    pub fn from_feature_vector(vector: &FeatureVector) -> Result<Self> {
        FeatureSchema::student().check_layout(vector)?;
        let v = |name: &str| vector.require(name);

        Ok(Self {
            marital_status: v(fields::MARITAL_STATUS)?,
            application_mode: v(fields::APPLICATION_MODE)?,
            application_order: v(fields::APPLICATION_ORDER)?,
            course: v(fields::COURSE)?,
            daytime_evening_attendance: v(fields::DAYTIME_EVENING_ATTENDANCE)?,
            previous_qualification: v(fields::PREVIOUS_QUALIFICATION)?,
            previous_qualification_grade: v(fields::PREVIOUS_QUALIFICATION_GRADE)?,
            nationality: v(fields::NACIONALITY)?,
            mothers_qualification: v(fields::MOTHERS_QUALIFICATION)?,
            fathers_qualification: v(fields::FATHERS_QUALIFICATION)?,
            mothers_occupation: v(fields::MOTHERS_OCCUPATION)?,
            fathers_occupation: v(fields::FATHERS_OCCUPATION)?,
            admission_grade: v(fields::ADMISSION_GRADE)?,
            displaced: v(fields::DISPLACED)?,
            educational_special_needs: v(fields::EDUCATIONAL_SPECIAL_NEEDS)?,
            debtor: v(fields::DEBTOR)?,
            tuition_fees_up_to_date: v(fields::TUITION_FEES_UP_TO_DATE)?,
            gender: v(fields::GENDER)?,
            scholarship_holder: v(fields::SCHOLARSHIP_HOLDER)?,
            age_at_enrollment: v(fields::AGE_AT_ENROLLMENT)?,
            international: v(fields::INTERNATIONAL)?,
            cu_1st_sem_credited: v(fields::CU_1ST_SEM_CREDITED)?,
            cu_1st_sem_enrolled: v(fields::CU_1ST_SEM_ENROLLED)?,
            cu_1st_sem_evaluations: v(fields::CU_1ST_SEM_EVALUATIONS)?,
            cu_1st_sem_approved: v(fields::CU_1ST_SEM_APPROVED)?,
            cu_1st_sem_grade: v(fields::CU_1ST_SEM_GRADE)?,
            cu_1st_sem_without_evaluations: v(fields::CU_1ST_SEM_WITHOUT_EVALUATIONS)?,
            cu_2nd_sem_credited: v(fields::CU_2ND_SEM_CREDITED)?,
            cu_2nd_sem_enrolled: v(fields::CU_2ND_SEM_ENROLLED)?,
            cu_2nd_sem_evaluations: v(fields::CU_2ND_SEM_EVALUATIONS)?,
            cu_2nd_sem_approved: v(fields::CU_2ND_SEM_APPROVED)?,
            cu_2nd_sem_grade: v(fields::CU_2ND_SEM_GRADE)?,
            cu_2nd_sem_without_evaluations: v(fields::CU_2ND_SEM_WITHOUT_EVALUATIONS)?,
            unemployment_rate: v(fields::UNEMPLOYMENT_RATE)?,
            inflation_rate: v(fields::INFLATION_RATE)?,
            gdp: v(fields::GDP)?,
        })
    }
}

impl Default for StudentRecord {
    /// Defaults of the intake form
    fn default() -> Self {
        Self {
            marital_status: 1.0,
            application_mode: 1.0,
            application_order: 1.0,
            course: 9119.0,
            daytime_evening_attendance: 0.0,
            previous_qualification: 1.0,
            previous_qualification_grade: 130.0,
            nationality: 1.0,
            mothers_qualification: 1.0,
            fathers_qualification: 1.0,
            mothers_occupation: 0.0,
            fathers_occupation: 0.0,
            admission_grade: 125.0,
            displaced: 0.0,
            educational_special_needs: 0.0,
            debtor: 0.0,
            tuition_fees_up_to_date: 0.0,
            gender: 0.0,
            scholarship_holder: 0.0,
            age_at_enrollment: 20.0,
            international: 0.0,
            cu_1st_sem_credited: 0.0,
            cu_1st_sem_enrolled: 6.0,
            cu_1st_sem_evaluations: 6.0,
            cu_1st_sem_approved: 5.0,
            cu_1st_sem_grade: 13.0,
            cu_1st_sem_without_evaluations: 0.0,
            cu_2nd_sem_credited: 0.0,
            cu_2nd_sem_enrolled: 6.0,
            cu_2nd_sem_evaluations: 6.0,
            cu_2nd_sem_approved: 5.0,
            cu_2nd_sem_grade: 13.0,
            cu_2nd_sem_without_evaluations: 0.0,
            unemployment_rate: 10.8,
            inflation_rate: 1.4,
            gdp: 1.0,
        }
    }
}

impl From<&StudentRecord> for FeatureVector {
    fn from(record: &StudentRecord) -> Self {
        record.to_feature_vector()
    }
}

impl TryFrom<&FeatureVector> for StudentRecord {
    type Error = crate::Error;

    fn try_from(vector: &FeatureVector) -> Result<Self> {
        Self::from_feature_vector(vector)
    }
}
