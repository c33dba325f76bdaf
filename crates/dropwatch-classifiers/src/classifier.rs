//! Classifier trait and common types

use dropwatch_core::Result;
use serde::{Deserialize, Serialize};

/// Trait for dropout classifiers
///
/// Implementations score vectors that have already been standardized with
/// the same parameters used at training time. Scoring is pure computation:
/// no I/O, no interior mutation, so one instance serves every request.
pub trait Classifier: Send + Sync {
    /// Get the classifier name
    fn name(&self) -> &str;

    /// Artifact version, reported alongside predictions
    fn version(&self) -> &str;

    /// Number of features the model was trained on
    fn num_features(&self) -> usize;

    /// Predict the class label
    fn predict_label(&self, features: &StandardizedVector) -> Result<ClassLabel>;

    /// Predict `[p_dropout, p_graduate]`
    fn predict_probabilities(&self, features: &StandardizedVector) -> Result<[f64; 2]>;
}

/// Terminal outcome predicted by the classifier
///
/// Codes match the relabeled reference data: dropout is 0, and the
/// "graduate" outcome is moved onto 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassLabel {
    Dropout,
    Graduate,
}

impl ClassLabel {
    /// Numeric class code used by the model
    pub fn code(&self) -> u8 {
        match self {
            Self::Dropout => 0,
            Self::Graduate => 1,
        }
    }

    /// Label for a numeric class code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Dropout),
            1 => Some(Self::Graduate),
            _ => None,
        }
    }

    /// Index of this class in a probability pair
    pub fn index(&self) -> usize {
        self.code() as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dropout => "dropout",
            Self::Graduate => "graduate",
        }
    }
}

impl std::fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dropout => write!(f, "Dropout"),
            Self::Graduate => write!(f, "Graduate"),
        }
    }
}

/// A feature row after standardization, in schema order
///
/// Only the standardizer constructs these, so a classifier can never be
/// handed raw, unscaled values by mistake.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardizedVector {
    values: Vec<f64>,
}

impl StandardizedVector {
    pub(crate) fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Standardized values in schema order
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Result of scoring one student
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Predicted outcome
    pub label: ClassLabel,

    /// `[p_dropout, p_graduate]`, summing to 1 within floating tolerance
    pub class_probabilities: [f64; 2],
}

impl PredictionResult {
    /// Create a new prediction result
    pub fn new(label: ClassLabel, class_probabilities: [f64; 2]) -> Self {
        Self {
            label,
            class_probabilities,
        }
    }

    /// Probability of dropping out
    pub fn p_dropout(&self) -> f64 {
        self.class_probabilities[0]
    }

    /// Probability of graduating
    pub fn p_graduate(&self) -> f64 {
        self.class_probabilities[1]
    }

    /// Probability assigned to the predicted label
    pub fn confidence(&self) -> f64 {
        self.class_probabilities[self.label.index()]
    }

    pub fn is_dropout(&self) -> bool {
        self.label == ClassLabel::Dropout
    }
}
