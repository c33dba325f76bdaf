mod cli;
mod config;
mod report;
mod student;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, OutputFormat};
use config::AppConfig;
use dropwatch_classifiers::config::parse_delimiter;
use dropwatch_classifiers::{
    CsvReferenceReader, PredictionService, ReferenceDataReader, ScalerSettings, Standardizer,
};
use dropwatch_core::{Catalog, FeatureSchema, FeatureVector};
use dropwatch_policy::{InterventionRuleEngine, RuleSet};
use report::Report;
use std::path::Path;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = AppConfig::load(&cli.config, &cli)
        .with_context(|| format!("failed to load configuration from {}", cli.config))?;

    match &cli.command {
        Commands::Predict {
            student: path,
            format,
        } => {
            let vector = student::load_vector(path)?;
            let service = PredictionService::from_config(&config.service)?;
            let prediction = service
                .predict(&vector)
                .await
                .context("prediction failed")?;

            let engine = build_engine(&config, None)?;
            let plan = engine.evaluate(&vector, prediction.p_dropout())?;
            let report = Report::build(&vector, prediction, plan)?;

            match format {
                OutputFormat::Text => print!("{}", report::render_report(&vector, &report)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }
        }

        Commands::Plan {
            student: path,
            probability,
            rules,
            format,
        } => {
            let vector = student::load_vector(path)?;

            let p_dropout = match probability {
                Some(p) => *p,
                None => predict_p_dropout(&config, &vector).await?,
            };

            let engine = build_engine(&config, rules.as_deref())?;
            let plan = engine.evaluate(&vector, p_dropout)?;

            match format {
                OutputFormat::Text => print!("{}", report::render_plan(&plan)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
            }
        }

        Commands::FitScaler { output } => {
            let (reference_csv, delimiter) = match &config.service.scaler {
                ScalerSettings::Fit {
                    reference_csv,
                    delimiter,
                } => (reference_csv, delimiter),
                ScalerSettings::Load { .. } => {
                    anyhow::bail!("fit-scaler needs a reference dataset; pass --reference or configure scaler.source: fit")
                }
            };

            let reader = CsvReferenceReader::new(reference_csv)
                .with_delimiter(parse_delimiter(delimiter)?);
            let rows = reader.read().await?;
            let standardizer = Standardizer::fit(FeatureSchema::student(), &rows)?;

            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            standardizer.parameters().save(output)?;

            info!(rows = rows.len(), output = %output.display(), "Standardization parameters saved");
            println!(
                "Fitted {} fields on {} rows of {}; saved to {}",
                standardizer.parameters().fields.len(),
                rows.len(),
                reference_csv.display(),
                output.display()
            );
        }

        Commands::Schema { format } => {
            let schema = FeatureSchema::student();
            match format {
                OutputFormat::Text => print!("{}", report::render_schema(&schema)),
                OutputFormat::Json => {
                    let catalogs: Vec<_> = Catalog::ALL
                        .iter()
                        .map(|c| serde_json::json!({ "catalog": c, "entries": c.entries() }))
                        .collect();
                    let doc = serde_json::json!({
                        "fields": schema.fields(),
                        "catalogs": catalogs,
                    });
                    println!("{}", serde_json::to_string_pretty(&doc)?);
                }
            }
        }
    }

    Ok(())
}

async fn predict_p_dropout(config: &AppConfig, vector: &FeatureVector) -> anyhow::Result<f64> {
    let service = PredictionService::from_config(&config.service)?;
    let prediction = service
        .predict(vector)
        .await
        .context("prediction failed")?;
    Ok(prediction.p_dropout())
}

/// Rule engine from the configured thresholds and rule set
fn build_engine(config: &AppConfig, rules: Option<&Path>) -> anyhow::Result<InterventionRuleEngine> {
    let engine = InterventionRuleEngine::new().with_thresholds(config.policy.thresholds);

    match rules.or(config.policy.rules.as_deref()) {
        Some(path) => {
            let rules = RuleSet::from_file(path)
                .with_context(|| format!("failed to load rule set {}", path.display()))?;
            info!(rules = %rules.name, count = rules.rules.len(), "Loaded rule set");
            Ok(engine.with_rules(rules)?)
        }
        None => Ok(engine),
    }
}

/// Initialize tracing; logs go to stderr so report output stays clean
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("dropwatch=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dropwatch=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
