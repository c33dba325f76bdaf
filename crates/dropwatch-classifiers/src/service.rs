//! Lazily initialized prediction service
//!
//! The service owns the two expensive pieces of shared state, the loaded
//! classifier and the fitted standardizer. Both are built on first use under
//! a one-time initialization guard: concurrent first callers wait for a
//! single initializer, and the outcome is kept for the life of the service.
//! A failed initialization is handed back to every later caller and is never
//! retried.

use crate::classifier::{Classifier, PredictionResult};
use crate::config::ServiceConfig;
use crate::model_loader::ModelLoader;
use crate::pipeline::PredictionPipeline;
use crate::reference_data::ReferenceDataReader;
use crate::standardizer::{StandardizationParameters, Standardizer};
use dropwatch_core::{Error, FeatureSchema, FeatureVector, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::{error, info};

/// Default bound on loading the model and reference data
pub const DEFAULT_LOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the standardizer's parameters come from
#[derive(Clone)]
pub enum ScalerSource {
    /// Fit on rows supplied by a reader
    Fit(Arc<dyn ReferenceDataReader>),

    /// Load a saved parameter file
    Load(PathBuf),

    /// Use parameters already in memory
    Fitted(StandardizationParameters),
}

impl std::fmt::Debug for ScalerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fit(reader) => write!(f, "Fit({})", reader.describe()),
            Self::Load(path) => write!(f, "Load({})", path.display()),
            Self::Fitted(params) => write!(f, "Fitted({} fields)", params.fields.len()),
        }
    }
}

/// Owner of the shared prediction pipeline
pub struct PredictionService {
    schema: FeatureSchema,
    model_loader: Arc<dyn ModelLoader>,
    scaler_source: ScalerSource,
    load_timeout: Duration,
    pipeline: OnceCell<Result<Arc<PredictionPipeline>>>,
}

impl PredictionService {
    /// Create an uninitialized service; nothing is loaded until first use
    pub fn new(model_loader: Arc<dyn ModelLoader>, scaler_source: ScalerSource) -> Self {
        Self {
            schema: FeatureSchema::student(),
            model_loader,
            scaler_source,
            load_timeout: DEFAULT_LOAD_TIMEOUT,
            pipeline: OnceCell::new(),
        }
    }

    /// Build from configuration
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(config.model_loader()), config.scaler_source()?)
            .with_load_timeout(config.model.load_timeout()))
    }

    pub fn with_load_timeout(mut self, timeout: Duration) -> Self {
        self.load_timeout = timeout;
        self
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Run initialization now instead of on the first prediction
    pub async fn initialize(&self) -> Result<()> {
        self.pipeline().await.map(|_| ())
    }

    /// Whether initialization has completed successfully
    pub fn is_ready(&self) -> bool {
        matches!(self.pipeline.get(), Some(Ok(_)))
    }

    /// The shared pipeline, initializing it on first call
    pub async fn pipeline(&self) -> Result<Arc<PredictionPipeline>> {
        self.pipeline
            .get_or_init(|| async {
                let start = Instant::now();
                let outcome = self.build().await;

                match &outcome {
                    Ok(pipeline) => {
                        metrics::counter!("dropwatch_initializations_total", "outcome" => "success")
                            .increment(1);
                        info!(
                            model = pipeline.classifier().name(),
                            version = pipeline.classifier().version(),
                            elapsed_ms = start.elapsed().as_millis() as u64,
                            "Prediction service ready"
                        );
                    }
                    Err(e) => {
                        metrics::counter!("dropwatch_initializations_total", "outcome" => "failure")
                            .increment(1);
                        error!(error = %e, "Prediction service initialization failed");
                    }
                }

                outcome
            })
            .await
            .clone()
    }

    /// Score one raw vector
    pub async fn predict(&self, vector: &FeatureVector) -> Result<PredictionResult> {
        self.pipeline().await?.predict(vector)
    }

    async fn build(&self) -> Result<Arc<PredictionPipeline>> {
        info!(
            model = %self.model_loader.describe(),
            scaler = ?self.scaler_source,
            "Initializing prediction service"
        );

        let (classifier, standardizer) =
            tokio::try_join!(self.load_model(), self.load_standardizer())?;

        Ok(Arc::new(PredictionPipeline::new(
            Arc::new(standardizer),
            classifier,
        )?))
    }

    async fn load_model(&self) -> Result<Arc<dyn Classifier>> {
        tokio::time::timeout(self.load_timeout, self.model_loader.load())
            .await
            .map_err(|_| {
                Error::model_unavailable(format!(
                    "{}: timed out after {:?}",
                    self.model_loader.describe(),
                    self.load_timeout
                ))
            })?
    }

    async fn load_standardizer(&self) -> Result<Standardizer> {
        match &self.scaler_source {
            ScalerSource::Fit(reader) => {
                let rows = tokio::time::timeout(self.load_timeout, reader.read())
                    .await
                    .map_err(|_| {
                        Error::reference_data(format!(
                            "{}: timed out after {:?}",
                            reader.describe(),
                            self.load_timeout
                        ))
                    })??;
                Standardizer::fit(self.schema, &rows)
            }
            ScalerSource::Load(path) => {
                let path = path.clone();
                let params = tokio::task::spawn_blocking(move || {
                    StandardizationParameters::from_file(path)
                })
                .await
                .map_err(|e| Error::internal(format!("parameter loader task failed: {}", e)))??;
                Standardizer::from_parameters(self.schema, params)
            }
            ScalerSource::Fitted(params) => {
                Standardizer::from_parameters(self.schema, params.clone())
            }
        }
    }
}

impl std::fmt::Debug for PredictionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PredictionService")
            .field("model", &self.model_loader.describe())
            .field("scaler", &self.scaler_source)
            .field("load_timeout", &self.load_timeout)
            .field("ready", &self.is_ready())
            .finish()
    }
}
