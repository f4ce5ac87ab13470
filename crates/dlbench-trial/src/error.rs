//! Error types for dlbench-trial.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Errors that end a trial early. Failed runs are not errors.
#[derive(Debug, Error)]
pub enum TrialError {
    #[error("interrupted by operator")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, TrialError>;

/// Why a single run did not count.
#[derive(Debug, Error)]
pub enum RunFailure {
    #[error("failed to start {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for child: {0}")]
    Wait(#[source] io::Error),

    #[error("{status}{}", stderr_suffix(.stderr))]
    Exit { status: ExitStatus, stderr: String },

    #[error("timed out after {}s", .0.as_secs_f64())]
    TimedOut(Duration),
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
