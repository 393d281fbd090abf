//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `schedb`.
#[derive(Debug, Parser)]
#[command(name = "schedb", version, about = "Classify products and look up Schedule B codes")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Classify a product interactively, then pick a Schedule B code.
    Classify {
        /// Product description; prompted for when omitted.
        description: Option<String>,
    },
    /// Print the Schedule B hierarchy under an HS code.
    Lookup {
        /// HS code, with or without punctuation.
        #[arg(value_name = "HS_CODE")]
        code: String,
    },
}
