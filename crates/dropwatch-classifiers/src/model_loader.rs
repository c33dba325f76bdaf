//! Model artifact loading

use crate::boosted_tree::BoostedTreeClassifier;
use crate::classifier::Classifier;
use async_trait::async_trait;
use dropwatch_core::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Supplies the classifier used by the pipeline
#[async_trait]
pub trait ModelLoader: Send + Sync {
    /// Load the classifier; failures surface as `ModelUnavailable`
    async fn load(&self) -> Result<Arc<dyn Classifier>>;

    /// Human-readable description of the artifact location, for logs
    fn describe(&self) -> String;
}

/// Loads a boosted tree artifact from a JSON file
#[derive(Debug, Clone)]
pub struct FileModelLoader {
    path: PathBuf,
}

impl FileModelLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ModelLoader for FileModelLoader {
    async fn load(&self) -> Result<Arc<dyn Classifier>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::model_unavailable(format!("{}: {}", self.path.display(), e)))?;

        let model = BoostedTreeClassifier::from_json(&content).map_err(|e| match e {
            Error::ModelUnavailable(msg) => {
                Error::model_unavailable(format!("{}: {}", self.path.display(), msg))
            }
            other => other,
        })?;

        info!(
            path = %self.path.display(),
            model = model.name(),
            version = model.version(),
            trees = model.tree_count(),
            "Loaded model artifact"
        );

        Ok(Arc::new(model))
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// Hands out an already constructed classifier
#[derive(Clone)]
pub struct StaticModelLoader {
    classifier: Arc<dyn Classifier>,
}

impl StaticModelLoader {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }
}

#[async_trait]
impl ModelLoader for StaticModelLoader {
    async fn load(&self) -> Result<Arc<dyn Classifier>> {
        Ok(Arc::clone(&self.classifier))
    }

    fn describe(&self) -> String {
        format!("static:{}", self.classifier.name())
    }
}
