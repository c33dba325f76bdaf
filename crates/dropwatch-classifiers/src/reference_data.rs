//! Reference dataset reading
//!
//! The reference dataset is the population the standardizer is fitted on.
//! Each row carries the 36 schema fields plus a `Status` column holding the
//! three-class outcome code.

use crate::classifier::ClassLabel;
use async_trait::async_trait;
use dropwatch_core::schema::check_names;
use dropwatch_core::{Error, FeatureSchema, FeatureVector, Result};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the outcome column in the reference CSV
pub const STATUS_COLUMN: &str = "Status";

/// Three-class outcome encoding of the reference dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Dropout,
    /// Still in progress; excluded before fitting
    Enrolled,
    Graduate,
}

impl Outcome {
    /// Outcome for a raw `Status` value
    pub fn from_code(code: f64) -> Option<Self> {
        match code {
            c if c == 0.0 => Some(Self::Dropout),
            c if c == 1.0 => Some(Self::Enrolled),
            c if c == 2.0 => Some(Self::Graduate),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            Self::Dropout => 0,
            Self::Enrolled => 1,
            Self::Graduate => 2,
        }
    }

    /// Classifier label after relabeling, `None` for in-progress students
    pub fn label(&self) -> Option<ClassLabel> {
        match self {
            Self::Dropout => Some(ClassLabel::Dropout),
            Self::Enrolled => None,
            Self::Graduate => Some(ClassLabel::Graduate),
        }
    }
}

/// One reference student
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRow {
    pub features: FeatureVector,
    pub outcome: Outcome,
}

impl ReferenceRow {
    pub fn new(features: FeatureVector, outcome: Outcome) -> Self {
        Self { features, outcome }
    }
}

/// Reference rows after the in-progress class is dropped and the remaining
/// outcomes are relabeled onto classifier labels
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSet {
    /// Dense rows in schema order
    pub rows: Vec<Vec<f64>>,

    /// Relabeled outcome per row
    pub labels: Vec<ClassLabel>,

    /// Number of in-progress rows removed
    pub dropped_in_progress: usize,
}

impl TrainingSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count of rows carrying the given label
    pub fn count(&self, label: ClassLabel) -> usize {
        self.labels.iter().filter(|l| **l == label).count()
    }
}

/// Filter, relabel, and validate reference rows
pub fn prepare_training_set(schema: &FeatureSchema, rows: &[ReferenceRow]) -> Result<TrainingSet> {
    let mut set = TrainingSet {
        rows: Vec::with_capacity(rows.len()),
        labels: Vec::with_capacity(rows.len()),
        dropped_in_progress: 0,
    };

    for row in rows {
        let Some(label) = row.outcome.label() else {
            set.dropped_in_progress += 1;
            continue;
        };

        schema.validate(&row.features)?;
        set.rows.push(row.features.to_row());
        set.labels.push(label);
    }

    if set.is_empty() {
        return Err(Error::reference_data(format!(
            "no usable rows ({} read, {} in progress)",
            rows.len(),
            set.dropped_in_progress
        )));
    }

    debug!(
        rows = set.len(),
        dropout = set.count(ClassLabel::Dropout),
        graduate = set.count(ClassLabel::Graduate),
        dropped_in_progress = set.dropped_in_progress,
        "Prepared reference rows"
    );

    Ok(set)
}

/// Source of reference rows
#[async_trait]
pub trait ReferenceDataReader: Send + Sync {
    /// Read every reference row
    async fn read(&self) -> Result<Vec<ReferenceRow>>;

    /// Human-readable description of the source, for logs
    fn describe(&self) -> String;
}

/// Reads a headered CSV file
#[derive(Debug, Clone)]
pub struct CsvReferenceReader {
    path: PathBuf,
    delimiter: u8,
}

impl CsvReferenceReader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file on the current thread
    pub fn read_blocking(&self) -> Result<Vec<ReferenceRow>> {
        let file = std::fs::File::open(&self.path).map_err(|e| {
            Error::reference_data(format!("{}: {}", self.path.display(), e))
        })?;

        let rows = parse(file, self.delimiter).map_err(|e| match e {
            Error::ReferenceDataUnavailable(msg) => {
                Error::reference_data(format!("{}: {}", self.path.display(), msg))
            }
            other => other,
        })?;

        info!(path = %self.path.display(), rows = rows.len(), "Read reference data");
        Ok(rows)
    }
}

#[async_trait]
impl ReferenceDataReader for CsvReferenceReader {
    async fn read(&self) -> Result<Vec<ReferenceRow>> {
        let reader = self.clone();
        tokio::task::spawn_blocking(move || reader.read_blocking())
            .await
            .map_err(|e| Error::internal(format!("reference reader task failed: {}", e)))?
    }

    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }
}

/// Parse reference rows from CSV
///
/// The `Status` column may appear anywhere; every other column, in order,
/// must match the student schema.
pub fn parse<R: io::Read>(input: R, delimiter: u8) -> Result<Vec<ReferenceRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader
        .headers()
        .map_err(|e| Error::reference_data(format!("unreadable header: {}", e)))?
        .clone();

    let status_index = headers
        .iter()
        .position(|h| h == STATUS_COLUMN)
        .ok_or_else(|| Error::schema(STATUS_COLUMN, "missing"))?;

    let feature_names: Vec<&str> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != status_index)
        .map(|(_, h)| h)
        .collect();

    let schema = FeatureSchema::student();
    check_names(schema.names(), feature_names.iter().copied())?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        // Row 1 is the header
        let line = i + 2;
        let record =
            record.map_err(|e| Error::reference_data(format!("row {}: {}", line, e)))?;

        let mut values = Vec::with_capacity(schema.len());
        let mut outcome = None;

        for (col, raw) in record.iter().enumerate() {
            let value: f64 = raw.parse().map_err(|_| {
                Error::reference_data(format!(
                    "row {}: column `{}`: `{}` is not a number",
                    line,
                    headers.get(col).unwrap_or("?"),
                    raw
                ))
            })?;

            if col == status_index {
                outcome = Some(Outcome::from_code(value).ok_or_else(|| {
                    Error::reference_data(format!("row {}: unknown outcome code {}", line, raw))
                })?);
            } else {
                values.push(value);
            }
        }

        let outcome = outcome.ok_or_else(|| {
            Error::reference_data(format!("row {}: missing `{}` value", line, STATUS_COLUMN))
        })?;

        rows.push(ReferenceRow::new(
            FeatureVector::from_parts(feature_names.iter().copied(), values),
            outcome,
        ));
    }

    Ok(rows)
}

/// Reference rows held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceReader {
    rows: Vec<ReferenceRow>,
}

impl InMemoryReferenceReader {
    pub fn new(rows: Vec<ReferenceRow>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl ReferenceDataReader for InMemoryReferenceReader {
    async fn read(&self) -> Result<Vec<ReferenceRow>> {
        Ok(self.rows.clone())
    }

    fn describe(&self) -> String {
        format!("memory:{} rows", self.rows.len())
    }
}
