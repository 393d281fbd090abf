//! Core library entry for the `schedb` CLI.
//!
//! `schedb` walks a user through the vendor's HS classification dialogue
//! and then lets them pick a ten-digit Schedule B code from the hierarchy
//! under the resolved heading.

pub mod adapters;
pub mod cassette;
pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod ports;
pub mod schedule;
pub mod session;
pub mod telemetry;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        assert!(run(["schedb", "unknown"]).is_err());
    }

    #[test]
    fn run_errors_on_lookup_without_code() {
        let err = run(["schedb", "lookup"]).unwrap_err();
        assert!(err.contains("HS_CODE"));
    }
}
