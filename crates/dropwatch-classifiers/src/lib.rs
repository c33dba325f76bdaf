//! dropwatch classifiers
//!
//! Everything between a raw student feature vector and a dropout prediction.
//!
//! - `standardizer`: per-field mean / standard deviation fitted on the
//!   reference population, applied as `(x - mean) / std_dev`
//! - `boosted_tree`: the gradient-boosted tree model artifact
//! - `pipeline`: validate, standardize, classify
//! - `service`: the lazily initialized, process-wide pipeline owner
//!
//! Scoring is synchronous and allocation-light; only the one-time loading of
//! the model artifact and reference data is async.

pub mod boosted_tree;
pub mod classifier;
pub mod config;
pub mod model_loader;
pub mod pipeline;
pub mod reference_data;
pub mod service;
pub mod standardizer;

pub use boosted_tree::{BoostedTreeArtifact, BoostedTreeClassifier, Node, Tree};
pub use classifier::{ClassLabel, Classifier, PredictionResult, StandardizedVector};
pub use config::{ModelSettings, ScalerSettings, ServiceConfig};
pub use model_loader::{FileModelLoader, ModelLoader, StaticModelLoader};
pub use pipeline::PredictionPipeline;
pub use reference_data::{
    CsvReferenceReader, InMemoryReferenceReader, Outcome, ReferenceDataReader, ReferenceRow,
    TrainingSet,
};
pub use service::{PredictionService, ScalerSource};
pub use standardizer::{FieldScale, StandardizationParameters, Standardizer, MIN_STD_DEV};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{ClassLabel, Classifier, PredictionResult};
    pub use crate::model_loader::{FileModelLoader, ModelLoader};
    pub use crate::pipeline::PredictionPipeline;
    pub use crate::reference_data::{CsvReferenceReader, ReferenceDataReader};
    pub use crate::service::{PredictionService, ScalerSource};
    pub use crate::standardizer::Standardizer;
}
