//! Per-field standardization
//!
//! Reproduces the training-time transform `(x - mean) / std_dev`, where the
//! statistics come from the reference population after in-progress students
//! are removed. Standard deviations use the population convention (ddof = 0).

use crate::classifier::StandardizedVector;
use crate::reference_data::{prepare_training_set, ReferenceRow};
use dropwatch_core::schema::check_names;
use dropwatch_core::{Error, FeatureSchema, FeatureVector, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Smallest standard deviation accepted for division
pub const MIN_STD_DEV: f64 = 1e-9;

/// Mean and standard deviation of one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldScale {
    pub name: String,
    pub mean: f64,
    pub std_dev: f64,
}

impl FieldScale {
    fn check(&self) -> Result<()> {
        if !self.mean.is_finite() {
            return Err(Error::domain(&self.name, self.mean, "mean is not finite"));
        }
        if !self.std_dev.is_finite() || self.std_dev < MIN_STD_DEV {
            return Err(Error::domain(
                &self.name,
                self.std_dev,
                "standard deviation is zero or near zero",
            ));
        }
        Ok(())
    }
}

/// Fitted statistics, one entry per schema field in schema order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardizationParameters {
    pub fields: Vec<FieldScale>,
}

impl StandardizationParameters {
    /// Check names against the schema and every scale for usability
    pub fn validate(&self, schema: &FeatureSchema) -> Result<()> {
        check_names(schema.names(), self.fields.iter().map(|f| f.name.as_str()))?;
        self.fields.iter().try_for_each(FieldScale::check)
    }

    /// Scale entry for a field
    pub fn get(&self, name: &str) -> Option<&FieldScale> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::config(format!("malformed standardization parameters: {}", e)))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::internal(format!("failed to serialize parameters: {}", e)))
    }

    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::reference_data(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&content).map_err(|e| match e {
            Error::Config(msg) => Error::reference_data(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    /// Write to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)
            .map_err(|e| Error::internal(format!("{}: {}", path.display(), e)))
    }
}

/// Fitted standardizer
///
/// Immutable after construction and shared across requests.
#[derive(Debug, Clone)]
pub struct Standardizer {
    schema: FeatureSchema,
    params: StandardizationParameters,
}

impl Standardizer {
    /// Fit on reference rows
    ///
    /// In-progress rows are dropped first. Any field whose standard deviation
    /// falls below [`MIN_STD_DEV`] fails the fit with a domain error.
    pub fn fit(schema: FeatureSchema, rows: &[ReferenceRow]) -> Result<Self> {
        let set = prepare_training_set(&schema, rows)?;
        let n = set.len() as f64;

        let mut fields = Vec::with_capacity(schema.len());
        for (col, spec) in schema.fields().iter().enumerate() {
            let mean = set.rows.iter().map(|r| r[col]).sum::<f64>() / n;
            let variance = set
                .rows
                .iter()
                .map(|r| {
                    let d = r[col] - mean;
                    d * d
                })
                .sum::<f64>()
                / n;

            let scale = FieldScale {
                name: spec.name.to_string(),
                mean,
                std_dev: variance.sqrt(),
            };
            scale.check()?;
            fields.push(scale);
        }

        info!(
            rows = set.len(),
            dropped_in_progress = set.dropped_in_progress,
            fields = fields.len(),
            "Fitted standardizer"
        );

        Ok(Self {
            schema,
            params: StandardizationParameters { fields },
        })
    }

    /// Build from previously fitted parameters
    pub fn from_parameters(schema: FeatureSchema, params: StandardizationParameters) -> Result<Self> {
        params.validate(&schema)?;
        debug!(fields = params.fields.len(), "Loaded standardization parameters");
        Ok(Self { schema, params })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn parameters(&self) -> &StandardizationParameters {
        &self.params
    }

    /// Validate and standardize a raw vector
    ///
    /// Layout violations are schema errors; out-of-domain values are domain
    /// errors. The input is not modified.
    pub fn transform(&self, vector: &FeatureVector) -> Result<StandardizedVector> {
        self.schema.validate(vector)?;

        let values = vector
            .values()
            .zip(&self.params.fields)
            .map(|(x, scale)| (x - scale.mean) / scale.std_dev)
            .collect();

        Ok(StandardizedVector::new(values))
    }
}
