//! Feature vectors

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// A single named feature value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Field name
    pub name: String,

    /// Raw value; integer-coded categoricals are carried as floats
    pub value: f64,
}

/// Ordered mapping of field names to raw numeric values
///
/// A vector is built once per request and never mutated afterwards. It keeps
/// whatever order the caller supplied: matching that order against the
/// schema is the validator's job, not the container's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureVector {
    features: Vec<Feature>,
}

impl FeatureVector {
    /// Build a vector from ordered `(name, value)` pairs
    pub fn from_pairs<N: Into<String>>(pairs: impl IntoIterator<Item = (N, f64)>) -> Self {
        Self {
            features: pairs
                .into_iter()
                .map(|(name, value)| Feature {
                    name: name.into(),
                    value,
                })
                .collect(),
        }
    }

    /// Build a vector by zipping a name list with a value list
    pub fn from_parts<'a>(
        names: impl IntoIterator<Item = &'a str>,
        values: impl IntoIterator<Item = f64>,
    ) -> Self {
        Self::from_pairs(names.into_iter().zip(values))
    }

    /// Features in the order they were supplied
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Field names in order
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.features.iter().map(|f| f.name.as_str())
    }

    /// Values in order
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.features.iter().map(|f| f.value)
    }

    /// Values collected into a dense row
    pub fn to_row(&self) -> Vec<f64> {
        self.values().collect()
    }

    /// Value of a field, if present
    pub fn get(&self, name: &str) -> Option<f64> {
        self.features
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value)
    }

    /// Value of a field, or a schema error naming it
    pub fn require(&self, name: &str) -> Result<f64> {
        self.get(name)
            .ok_or_else(|| Error::schema(name, "missing"))
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// Whether the vector has no features
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Copy of this vector with one value replaced
    ///
    /// Returns `None` when the field is absent.
    pub fn with_value(&self, name: &str, value: f64) -> Option<Self> {
        let index = self.features.iter().position(|f| f.name == name)?;
        let mut features = self.features.clone();
        features[index].value = value;
        Some(Self { features })
    }
}
