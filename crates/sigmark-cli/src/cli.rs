//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Sigmark: significance brackets for grouped, faceted measurements
#[derive(Parser)]
#[command(name = "sigmark")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log level for diagnostics written to stderr
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute significance annotations for a measurement file
    Annotate {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        fields: FieldArgs,

        /// Comparison as GROUP_A:GROUP_B (repeatable, order sets bracket stacking)
        #[arg(short, long = "compare", value_name = "A:B", conflicts_with = "all_pairs")]
        compare: Vec<String>,

        /// Compare every pair of group labels, in first-seen order
        #[arg(long)]
        all_pairs: bool,

        /// JSON file with annotation options (flags below override it)
        #[arg(long, value_name = "JSON")]
        config: Option<PathBuf>,

        /// Treat groups as paired samples
        #[arg(long)]
        paired: bool,

        /// Two-sample test (welch, student, mann_whitney)
        #[arg(long, value_name = "METHOD")]
        test: Option<String>,

        /// Adjust p-values across the run (holm, bonferroni, bh)
        #[arg(long, value_name = "METHOD")]
        adjust: Option<String>,

        /// Label format (signif, numeric, raw)
        #[arg(short, long, value_name = "FORMAT")]
        label_format: Option<String>,

        /// Headroom multiplier above the taller group
        #[arg(long, value_name = "X")]
        y_offset: Option<f64>,

        /// Evaluate facets in parallel
        #[arg(long)]
        parallel: bool,

        /// Output format
        #[arg(short, long, default_value = "tsv")]
        format: OutputFormat,

        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List facets and groups with their sample sizes
    Groups {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        fields: FieldArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Group, facet and value field names. Give all three or none.
#[derive(Args)]
pub struct FieldArgs {
    /// Grouping field (bracket endpoints)
    #[arg(short, long, requires_all = ["facet", "value"])]
    pub group: Option<String>,

    /// Facet field (comparisons run within each facet)
    #[arg(long, requires_all = ["group", "value"])]
    pub facet: Option<String>,

    /// Numeric value field
    #[arg(long, requires_all = ["group", "facet"])]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Tab-separated values
    Tsv,
    /// Comma-separated values
    Csv,
    /// JSON with annotations and diagnostics
    Json,
}
