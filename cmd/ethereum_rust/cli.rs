use std::path::PathBuf;

use clap::Parser;

/// Runs a batch of RLP-encoded transactions against an in-memory world state seeded
/// from a JSON fixture, printing the outcome of each one.
#[derive(Parser, Debug)]
#[command(name = "ethereum_rust", author = "Lambdaclass", version)]
pub struct Cli {
    /// Path to the JSON fixture describing the starting accounts and the
    /// transactions to run.
    #[arg(value_name = "INPUT_FILE")]
    pub input: PathBuf,

    #[arg(long = "log-level", default_value = "info", value_name = "LOG_LEVEL")]
    pub log_level: String,
}
