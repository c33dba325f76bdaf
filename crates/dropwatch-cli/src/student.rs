//! Student file parsing

use anyhow::Context;
use dropwatch_core::{FeatureVector, StudentRecord};
use std::path::Path;

/// Read a student record from YAML or JSON
///
/// Fields use the dataset column names; all 36 are required and unknown
/// fields are rejected.
pub fn load_student(path: &Path) -> anyhow::Result<StudentRecord> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read student file {}", path.display()))?;
    parse_student(&content, path)
}

fn parse_student(content: &str, path: &Path) -> anyhow::Result<StudentRecord> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let record = if is_json {
        serde_json::from_str(content)
            .with_context(|| format!("invalid student JSON in {}", path.display()))?
    } else {
        serde_yaml::from_str(content)
            .with_context(|| format!("invalid student YAML in {}", path.display()))?
    };

    Ok(record)
}

/// Canonical feature vector for a student file
pub fn load_vector(path: &Path) -> anyhow::Result<FeatureVector> {
    Ok(FeatureVector::from(&load_student(path)?))
}
