//! Prediction pipeline
//!
//! Validation, standardization, and classification of one raw feature
//! vector. The pipeline holds only immutable state, so a single instance is
//! shared by every request without locking.

use crate::classifier::{ClassLabel, Classifier, PredictionResult};
use crate::standardizer::Standardizer;
use dropwatch_core::{Error, FeatureSchema, FeatureVector, Result};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Allowed deviation of `p_dropout + p_graduate` from 1
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

/// Standardizer and classifier bound together
#[derive(Clone)]
pub struct PredictionPipeline {
    standardizer: Arc<Standardizer>,
    classifier: Arc<dyn Classifier>,
}

impl std::fmt::Debug for PredictionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionPipeline")
            .field("classifier", &self.classifier.name())
            .field("version", &self.classifier.version())
            .finish()
    }
}

impl PredictionPipeline {
    /// Bind a fitted standardizer to a classifier
    ///
    /// The classifier must have been trained on as many features as the
    /// standardizer's schema carries.
    pub fn new(standardizer: Arc<Standardizer>, classifier: Arc<dyn Classifier>) -> Result<Self> {
        let expected = standardizer.schema().len();
        if classifier.num_features() != expected {
            return Err(Error::model_unavailable(format!(
                "model `{}` expects {} features, schema has {}",
                classifier.name(),
                classifier.num_features(),
                expected
            )));
        }

        Ok(Self {
            standardizer,
            classifier,
        })
    }

    pub fn schema(&self) -> &FeatureSchema {
        self.standardizer.schema()
    }

    pub fn standardizer(&self) -> &Standardizer {
        &self.standardizer
    }

    pub fn classifier(&self) -> &Arc<dyn Classifier> {
        &self.classifier
    }

    /// Score one raw vector
    ///
    /// Deterministic: the same vector always yields the same result.
    pub fn predict(&self, vector: &FeatureVector) -> Result<PredictionResult> {
        let start = Instant::now();
        let outcome = self.run(vector);
        let elapsed_us = start.elapsed().as_micros() as f64;

        match &outcome {
            Ok(result) => {
                metrics::counter!("dropwatch_predictions_total", "label" => result.label.as_str())
                    .increment(1);
                metrics::histogram!("dropwatch_prediction_latency_us").record(elapsed_us);
                debug!(
                    label = %result.label,
                    p_dropout = result.p_dropout(),
                    latency_us = elapsed_us,
                    "Prediction complete"
                );
            }
            Err(e) => {
                metrics::counter!("dropwatch_prediction_errors_total", "kind" => e.kind())
                    .increment(1);
                debug!(error = %e, "Prediction rejected");
            }
        }

        outcome
    }

    fn run(&self, vector: &FeatureVector) -> Result<PredictionResult> {
        let standardized = self.standardizer.transform(vector)?;

        let label = self.classifier.predict_label(&standardized)?;
        let probabilities = self.classifier.predict_probabilities(&standardized)?;
        check_probabilities(probabilities)?;
        check_label(label, probabilities)?;

        Ok(PredictionResult::new(label, probabilities))
    }
}

fn check_probabilities(p: [f64; 2]) -> Result<()> {
    if p.iter().any(|v| !v.is_finite() || *v < 0.0 || *v > 1.0) {
        return Err(Error::classifier(format!(
            "probabilities out of range: {:?}",
            p
        )));
    }

    let sum = p[0] + p[1];
    if (sum - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(Error::classifier(format!(
            "probabilities sum to {}, not 1",
            sum
        )));
    }

    Ok(())
}

/// The label must agree with the probability pair; an exact tie allows either
fn check_label(label: ClassLabel, p: [f64; 2]) -> Result<()> {
    let [p_dropout, p_graduate] = p;
    let consistent = match label {
        ClassLabel::Graduate => p_graduate >= p_dropout,
        ClassLabel::Dropout => p_dropout >= p_graduate,
    };

    if !consistent {
        return Err(Error::classifier(format!(
            "label {} contradicts probabilities {:?}",
            label, p
        )));
    }

    Ok(())
}
