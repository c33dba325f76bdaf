//! Service configuration

use crate::model_loader::FileModelLoader;
use crate::reference_data::CsvReferenceReader;
use crate::service::ScalerSource;
use dropwatch_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Configuration for the prediction service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Model artifact settings
    #[serde(default)]
    pub model: ModelSettings,

    /// Where standardization parameters come from
    #[serde(default)]
    pub scaler: ScalerSettings,
}

/// Model artifact settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Path to the JSON artifact
    #[serde(default = "default_model_path")]
    pub path: PathBuf,

    /// Upper bound on loading the model and reference data
    #[serde(default = "default_load_timeout_secs")]
    pub load_timeout_secs: u64,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            load_timeout_secs: default_load_timeout_secs(),
        }
    }
}

impl ModelSettings {
    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}

/// Standardization parameter source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum ScalerSettings {
    /// Fit on the reference dataset at startup
    Fit {
        #[serde(default = "default_reference_csv")]
        reference_csv: PathBuf,

        #[serde(default = "default_delimiter")]
        delimiter: String,
    },

    /// Load previously saved parameters
    Load { parameters: PathBuf },
}

impl Default for ScalerSettings {
    fn default() -> Self {
        Self::Fit {
            reference_csv: default_reference_csv(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_model_path() -> PathBuf {
    PathBuf::from("model/model.json")
}

fn default_load_timeout_secs() -> u64 {
    30
}

fn default_reference_csv() -> PathBuf {
    PathBuf::from("data/encoded_data.csv")
}

fn default_delimiter() -> String {
    ",".to_string()
}

/// Single-byte CSV delimiter from its configured string form
pub fn parse_delimiter(delimiter: &str) -> Result<u8> {
    match delimiter.as_bytes() {
        [b] => Ok(*b),
        _ if delimiter == "\\t" => Ok(b'\t'),
        _ => Err(Error::config(format!(
            "delimiter must be a single byte, got `{}`",
            delimiter
        ))),
    }
}

impl ServiceConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::config(e.to_string()))
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
            .map_err(|e| Error::config(format!("{}: {}", path.display(), e)))
    }

    /// Loader for the configured model artifact
    pub fn model_loader(&self) -> FileModelLoader {
        FileModelLoader::new(&self.model.path)
    }

    /// Scaler source for the configured settings
    pub fn scaler_source(&self) -> Result<ScalerSource> {
        match &self.scaler {
            ScalerSettings::Fit {
                reference_csv,
                delimiter,
            } => {
                let reader = CsvReferenceReader::new(reference_csv)
                    .with_delimiter(parse_delimiter(delimiter)?);
                Ok(ScalerSource::Fit(Arc::new(reader)))
            }
            ScalerSettings::Load { parameters } => Ok(ScalerSource::Load(parameters.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_yaml("{}").unwrap();
        assert_eq!(config.model.path, PathBuf::from("model/model.json"));
        assert_eq!(config.model.load_timeout(), Duration::from_secs(30));
        assert_eq!(config.scaler, ScalerSettings::default());
    }

    #[test]
    fn test_fit_source() {
        let yaml = r#"
model:
  path: /srv/models/dropout.json
  load_timeout_secs: 5
scaler:
  source: fit
  reference_csv: /srv/data/students.csv
  delimiter: ";"
"#;
        let config = ServiceConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.model.load_timeout_secs, 5);
        match &config.scaler {
            ScalerSettings::Fit {
                reference_csv,
                delimiter,
            } => {
                assert_eq!(reference_csv, &PathBuf::from("/srv/data/students.csv"));
                assert_eq!(parse_delimiter(delimiter).unwrap(), b';');
            }
            other => panic!("unexpected scaler settings: {other:?}"),
        }
        assert!(matches!(config.scaler_source().unwrap(), ScalerSource::Fit(_)));
    }

    #[test]
    fn test_load_source() {
        let yaml = "scaler:\n  source: load\n  parameters: model/scaler.json\n";
        let config = ServiceConfig::from_yaml(yaml).unwrap();
        assert_eq!(
            config.scaler,
            ScalerSettings::Load {
                parameters: PathBuf::from("model/scaler.json")
            }
        );
    }

    #[test]
    fn test_bad_delimiter() {
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("").is_err());
    }

    #[test]
    fn test_unknown_source_rejected() {
        let err = ServiceConfig::from_yaml("scaler:\n  source: magic\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
