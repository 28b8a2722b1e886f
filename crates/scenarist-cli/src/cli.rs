//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Scenarist: what-if scenario generation for merchandising datasets
#[derive(Parser)]
#[command(name = "scenarist")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Input files shared by all subcommands: either a table + catalog
/// pair, or one zip archive carrying both.
#[derive(clap::Args)]
pub struct Inputs {
    /// Path to the base table CSV (may be gzipped)
    #[arg(long, value_name = "FILE", conflicts_with = "archive")]
    pub table: Option<PathBuf>,

    /// Path to the product master JSON
    #[arg(long, value_name = "FILE", conflicts_with = "archive")]
    pub catalog: Option<PathBuf>,

    /// Zip archive containing both the CSV and the JSON
    #[arg(long, value_name = "FILE")]
    pub archive: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate scenarios from change specifications or a prompt
    Generate {
        #[command(flatten)]
        inputs: Inputs,

        /// Changes file (JSON array of change objects)
        #[arg(long, value_name = "FILE", conflicts_with = "prompt")]
        changes: Option<PathBuf>,

        /// Free-text description of the changes to apply
        #[arg(long, value_name = "TEXT")]
        prompt: Option<String>,

        /// Interpreter for --prompt
        #[arg(long, default_value = "heuristic")]
        interpreter: InterpreterChoice,

        /// Directory to write scenario CSVs into
        #[arg(short, long, default_value = ".", value_name = "DIR")]
        out_dir: PathBuf,

        /// Bundle all scenarios into one zip instead of loose CSVs
        #[arg(long)]
        zip: bool,

        /// Also persist scenarios as JSON records into this directory
        #[arg(long, value_name = "DIR")]
        store: Option<PathBuf>,

        /// Error out when change specs disagree on a metric's kind
        #[arg(long)]
        strict_kinds: bool,
    },

    /// List the value drivers and their options
    Drivers {
        #[command(flatten)]
        inputs: Inputs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interpret a prompt and print the resulting change objects
    Interpret {
        /// Free-text description of the changes
        #[arg(value_name = "TEXT")]
        prompt: String,

        #[command(flatten)]
        inputs: Inputs,

        /// Interpreter to use
        #[arg(long, default_value = "heuristic")]
        interpreter: InterpreterChoice,
    },
}

/// Which intent interpreter to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InterpreterChoice {
    /// Offline pattern-matching interpreter
    Heuristic,
    /// Remote model via the OpenAI API (needs OPENAI_API_KEY)
    Openai,
}
