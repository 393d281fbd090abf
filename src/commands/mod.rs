//! Command dispatch and handlers.

pub mod classify;
pub mod lookup;

use std::io;
use std::path::Path;

use tracing::info;

use crate::cassette::session::RecordingSession;
use crate::cli::Command;
use crate::config::AppConfig;
use crate::context::ServiceContext;
use crate::telemetry::{self, TelemetryError};

/// Dispatch a parsed command to its handler.
///
/// Configuration comes from the environment. When `SCHEDB_RECORD` names a
/// directory, every port interaction is recorded to per-port cassettes in a
/// timestamped directory beneath it.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the command fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let config = AppConfig::load().map_err(|e| e.to_string())?;
    match telemetry::init(&config.log_level) {
        Err(err @ TelemetryError::EnvFilter { .. }) => return Err(err.to_string()),
        Err(TelemetryError::Subscriber(_)) | Ok(()) => {}
    }

    let (ctx, session) = if let Some(dir) = &config.record_dir {
        let (ctx, session) = ServiceContext::recording_at(&config, Path::new(dir))?;
        (ctx, Some(session))
    } else {
        (ServiceContext::live(&config), None)
    };

    let result = dispatch_with_context(command, &ctx, &config);

    // Finish recording even when the command failed.
    if let Some(session) = session {
        drop(ctx);
        finish_recording(session)?;
    }

    result
}

/// Runs `command` against `ctx`, reading stdin and writing stdout.
///
/// # Errors
///
/// Returns an error string if the runtime cannot start or the command fails.
pub fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &AppConfig,
) -> Result<(), String> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to start async runtime: {e}"))?;

    match command {
        Command::Classify { description } => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            let classify = classify::ClassifyLoop::new(&config.vendor, stdin.lock(), stdout.lock());
            runtime.block_on(classify.run(ctx, description.as_deref())).map(|_| ())
        }
        Command::Lookup { code } => {
            let mut stdout = io::stdout().lock();
            runtime.block_on(lookup::run(ctx, code, &mut stdout))
        }
    }
}

/// Finish a recording session and report where the cassettes went.
fn finish_recording(session: RecordingSession) -> Result<(), String> {
    let output_dir = session.finish()?;
    info!(dir = %output_dir.display(), "recording saved");
    eprintln!("Recording saved to: {}", output_dir.display());
    Ok(())
}

pub(crate) fn write_err(err: io::Error) -> String {
    format!("write error: {err}")
}
