//! Category display catalogs
//!
//! Code-to-label dictionaries used only to render human-readable choices.
//! Prediction and plan building consume the raw codes and never look here;
//! a code missing from a catalog is still a legal input.

use serde::{Deserialize, Serialize};

/// A display catalog for one categorical attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Catalog {
    MaritalStatus,
    Nationality,
    ApplicationMode,
    Course,
    /// Shared by mother's and father's qualification
    EducationLevel,
    /// Shared by mother's and father's occupation
    Occupation,
    PreviousQualification,
}

const MARITAL_STATUS: &[(i64, &str)] = &[
    (1, "Single"),
    (2, "Married"),
    (3, "Widowed"),
    (4, "Divorced"),
];

const NATIONALITY: &[(i64, &str)] = &[
    (1, "Portuguese"),
    (2, "German"),
    (6, "Spanish"),
    (11, "Italian"),
    (13, "Dutch"),
    (14, "English"),
    (17, "Lithuanian"),
    (21, "Angolan"),
    (22, "Cape Verdean"),
    (24, "Guinean"),
    (25, "Mozambican"),
    (26, "Santomean"),
    (32, "Turkish"),
    (41, "Brazilian"),
    (62, "Romanian"),
    (100, "Moldova (Republic of)"),
    (101, "Mexican"),
    (103, "Ukrainian"),
    (105, "Russian"),
    (108, "Cuban"),
    (109, "Colombian"),
];

const APPLICATION_MODE: &[(i64, &str)] = &[
    (1, "1st phase - general contingent"),
    (2, "Ordinance No. 612/93"),
    (5, "1st phase - special contingent (Azores Island)"),
    (7, "Holders of other higher courses"),
    (10, "Ordinance No. 854-B/99"),
    (15, "International student (bachelor)"),
    (16, "1st phase - special contingent (Madeira Island)"),
    (17, "2nd phase - general contingent"),
    (18, "3rd phase - general contingent"),
    (26, "Ordinance No. 533-A/99, item b2) (Different Plan)"),
    (27, "Ordinance No. 533-A/99, item b3 (Other Institution)"),
    (39, "Over 23 years old"),
    (42, "Transfer"),
    (43, "Change of course"),
    (44, "Technological specialization diploma holders"),
    (51, "Change of institution/course"),
    (53, "Short cycle diploma holders"),
    (57, "Change of institution/course (International)"),
];

const COURSE: &[(i64, &str)] = &[
    (33, "Biofuel Production Technologies"),
    (171, "Animation and Multimedia Design"),
    (8014, "Social Service (evening)"),
    (9003, "Agronomy"),
    (9070, "Communication Design"),
    (9085, "Veterinary Nursing"),
    (9119, "Informatics Engineering"),
    (9130, "Equiniculture"),
    (9147, "Management"),
    (9238, "Social Service"),
    (9254, "Tourism"),
    (9500, "Nursing"),
    (9556, "Oral Hygiene"),
    (9670, "Advertising and Marketing Management"),
    (9773, "Journalism and Communication"),
    (9853, "Basic Education"),
    (9991, "Management (evening)"),
];

const EDUCATION_LEVEL: &[(i64, &str)] = &[
    (1, "Primary Education (4th grade)"),
    (2, "Basic Education 2nd Cycle (6th grade)"),
    (3, "Basic Education 3rd Cycle (9th grade)"),
    (4, "Secondary Education (12th grade)"),
    (5, "Higher Education - Bachelor's Degree"),
    (9, "Higher Education - Licentiate"),
    (11, "Higher Education - Master's"),
    (12, "Higher Education - Doctorate"),
    (19, "Higher Education (unspecified)"),
    (30, "Frequency of Higher Education"),
    (34, "Post-Graduate Specialization"),
    (36, "Higher Education - Degree (5 years)"),
    (37, "Cannot read or write"),
    (38, "Can read without having a 4th grade education"),
    (39, "Basic Education 1st Cycle (reading capability)"),
    (40, "Unknown"),
    (41, "Basic Education (unspecified)"),
    (42, "Technical-Professional Course"),
];

const OCCUPATION: &[(i64, &str)] = &[
    (0, "Student"),
    (1, "Representatives of Legislative and Executive Bodies"),
    (2, "Intellectual and Scientific Activities"),
    (3, "Technicians and Associate Professionals"),
    (4, "Administrative Staff"),
    (5, "Personal Service, Security and Safety Workers"),
    (6, "Farmers and Skilled Agricultural Workers"),
    (7, "Skilled Manufacturing Workers"),
    (8, "Plant and Machine Operators"),
    (9, "Unskilled Workers"),
    (90, "Armed Forces"),
    (99, "Unknown"),
    (121, "Health Professionals"),
    (124, "Teachers"),
    (125, "Specialists in Information Technology"),
    (141, "Legal Professionals"),
    (144, "Physical and Engineering Science Professionals"),
    (151, "Sales Workers"),
    (161, "Personal Care Workers"),
    (175, "Food Processing and Related Trades Workers"),
    (182, "Electricity and Electronics Trades Workers"),
    (191, "Building Construction Workers"),
    (192, "Metal, Machinery Workers"),
    (193, "Handicraft and Printing Workers"),
    (194, "Stationary Plant and Machine Operators"),
    (195, "Assemblers"),
];

const PREVIOUS_QUALIFICATION: &[(i64, &str)] = &[
    (1, "Secondary Education"),
    (2, "Higher Education - Bachelor's Degree"),
    (3, "Higher Education - Degree"),
    (4, "Higher Education - Master's"),
    (5, "Higher Education - Doctorate"),
    (6, "Frequency of Higher Education"),
    (9, "12th Year of Schooling - Not Completed"),
    (10, "11th Year of Schooling - Not Completed"),
    (12, "Other - 11th Year"),
    (14, "10th Year of Schooling"),
    (15, "10th Year of Schooling - Not Completed"),
    (19, "Basic Education 3rd Cycle (9th/10th/11th Year) or Equivalent"),
    (38, "Basic Education 2nd Cycle (6th/7th/8th Year) or Equivalent"),
    (39, "Technological Specialization Course"),
    (40, "Higher Education - Degree (1st Cycle)"),
    (42, "Professional Higher Technical Course"),
    (43, "Higher Education - Master (2nd Cycle)"),
];

impl Catalog {
    /// All catalogs
    pub const ALL: [Catalog; 7] = [
        Catalog::MaritalStatus,
        Catalog::Nationality,
        Catalog::ApplicationMode,
        Catalog::Course,
        Catalog::EducationLevel,
        Catalog::Occupation,
        Catalog::PreviousQualification,
    ];

    /// `(code, label)` entries in ascending code order
    pub fn entries(&self) -> &'static [(i64, &'static str)] {
        match self {
            Self::MaritalStatus => MARITAL_STATUS,
            Self::Nationality => NATIONALITY,
            Self::ApplicationMode => APPLICATION_MODE,
            Self::Course => COURSE,
            Self::EducationLevel => EDUCATION_LEVEL,
            Self::Occupation => OCCUPATION,
            Self::PreviousQualification => PREVIOUS_QUALIFICATION,
        }
    }

    /// Label for a code, if the catalog knows it
    pub fn label(&self, code: i64) -> Option<&'static str> {
        self.entries()
            .binary_search_by_key(&code, |(c, _)| *c)
            .ok()
            .map(|i| self.entries()[i].1)
    }

    /// Label for a code, falling back to `Unknown (<code>)`
    pub fn display(&self, code: i64) -> String {
        match self.label(code) {
            Some(label) => label.to_string(),
            None => format!("Unknown ({})", code),
        }
    }

    /// Display a raw feature value (codes travel as floats)
    pub fn display_value(&self, value: f64) -> String {
        if value.fract() == 0.0 && value.is_finite() {
            self.display(value as i64)
        } else {
            format!("Unknown ({})", value)
        }
    }

    /// Catalog used to render a given schema field, if any
    pub fn for_field(field: &str) -> Option<Catalog> {
        use crate::schema::fields;

        match field {
            fields::MARITAL_STATUS => Some(Self::MaritalStatus),
            fields::NACIONALITY => Some(Self::Nationality),
            fields::APPLICATION_MODE => Some(Self::ApplicationMode),
            fields::COURSE => Some(Self::Course),
            fields::MOTHERS_QUALIFICATION | fields::FATHERS_QUALIFICATION => {
                Some(Self::EducationLevel)
            }
            fields::MOTHERS_OCCUPATION | fields::FATHERS_OCCUPATION => Some(Self::Occupation),
            fields::PREVIOUS_QUALIFICATION => Some(Self::PreviousQualification),
            _ => None,
        }
    }
}

/// Gender flag label
pub fn gender_label(value: f64) -> &'static str {
    if value == 0.0 {
        "Female"
    } else {
        "Male"
    }
}

/// Attendance flag label
pub fn attendance_label(value: f64) -> &'static str {
    if value == 0.0 {
        "Daytime"
    } else {
        "Evening"
    }
}

/// Yes/no label for a binary flag
pub fn flag_label(value: f64) -> &'static str {
    if value == 1.0 {
        "Yes"
    } else {
        "No"
    }
}
