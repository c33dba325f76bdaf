use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "dropwatch")]
#[command(
    author,
    version,
    about = "Student dropout prediction and intervention planning"
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "dropwatch.yaml", env = "DROPWATCH_CONFIG")]
    pub config: String,

    /// Model artifact (overrides the configured path)
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    /// Reference dataset CSV to fit the standardizer on
    #[arg(long, global = true)]
    pub reference: Option<PathBuf>,

    /// Saved standardization parameters (takes precedence over --reference)
    #[arg(long, global = true)]
    pub scaler: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Predict dropout risk for a student and show the full report
    Predict {
        /// Student file (YAML or JSON, dataset column names)
        student: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Build the intervention plan for a student
    Plan {
        /// Student file (YAML or JSON, dataset column names)
        student: PathBuf,

        /// Dropout probability to plan for; predicted with the model when omitted
        #[arg(short, long)]
        probability: Option<f64>,

        /// Rule set file replacing the standard rules
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Fit standardization parameters on the reference dataset and save them
    FitScaler {
        /// Where to write the parameters
        #[arg(short, long, default_value = "model/scaler.json")]
        output: PathBuf,
    },

    /// Print the feature schema
    Schema {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
