//! Configuration for the dropwatch CLI

use dropwatch_classifiers::{ScalerSettings, ServiceConfig};
use dropwatch_policy::PolicyThresholds;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main CLI configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model and standardizer settings
    #[serde(flatten)]
    pub service: ServiceConfig,

    /// Rule engine settings
    #[serde(default)]
    pub policy: PolicySettings,
}

/// Rule engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicySettings {
    /// Tier and rule thresholds
    #[serde(default)]
    pub thresholds: PolicyThresholds,

    /// Rule set file; the standard rules are used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from file (if present) and apply CLI overrides
    pub fn load(config_path: &str, cli: &crate::cli::Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config: Self = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(model) = &cli.model {
            config.service.model.path = model.clone();
        }

        if let Some(reference) = &cli.reference {
            let delimiter = match &config.service.scaler {
                ScalerSettings::Fit { delimiter, .. } => delimiter.clone(),
                ScalerSettings::Load { .. } => ",".to_string(),
            };
            config.service.scaler = ScalerSettings::Fit {
                reference_csv: reference.clone(),
                delimiter,
            };
        }

        if let Some(scaler) = &cli.scaler {
            config.service.scaler = ScalerSettings::Load {
                parameters: scaler.clone(),
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_missing_file_uses_defaults() {
        let cli = Cli::try_parse_from(["dropwatch", "schema"]).unwrap();
        let config = AppConfig::load("/nonexistent/dropwatch.yaml", &cli).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_file_with_policy_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dropwatch.yaml");
        std::fs::write(
            &path,
            r#"
model:
  path: models/xgb.json
scaler:
  source: fit
  reference_csv: data/students.csv
  delimiter: ";"
policy:
  thresholds:
    fallback_risk: 0.45
  rules: rules/custom.yaml
"#,
        )
        .unwrap();

        let cli = Cli::try_parse_from(["dropwatch", "schema"]).unwrap();
        let config = AppConfig::load(path.to_str().unwrap(), &cli).unwrap();
        assert_eq!(config.service.model.path, PathBuf::from("models/xgb.json"));
        assert_eq!(config.policy.thresholds.fallback_risk, 0.45);
        assert_eq!(config.policy.thresholds.high_risk, 0.8);
        assert_eq!(config.policy.rules, Some(PathBuf::from("rules/custom.yaml")));
    }

    #[test]
    fn test_cli_overrides() {
        let cli = Cli::try_parse_from([
            "dropwatch",
            "schema",
            "--model",
            "other.json",
            "--reference",
            "ref.csv",
        ])
        .unwrap();
        let config = AppConfig::load("/nonexistent/dropwatch.yaml", &cli).unwrap();
        assert_eq!(config.service.model.path, PathBuf::from("other.json"));
        assert_eq!(
            config.service.scaler,
            ScalerSettings::Fit {
                reference_csv: PathBuf::from("ref.csv"),
                delimiter: ",".to_string(),
            }
        );

        let cli = Cli::try_parse_from([
            "dropwatch",
            "schema",
            "--reference",
            "ref.csv",
            "--scaler",
            "scaler.json",
        ])
        .unwrap();
        let config = AppConfig::load("/nonexistent/dropwatch.yaml", &cli).unwrap();
        assert_eq!(
            config.service.scaler,
            ScalerSettings::Load {
                parameters: PathBuf::from("scaler.json")
            }
        );
    }
}
