//! Repeatable timed trials of retrieval tools.
//!
//! # Key Features
//!
//! - **Cold start**: output and sidecar files are removed before every run
//! - **No leaks**: they are removed again after every run, including failed,
//!   timed-out and interrupted ones, through the [`Artifacts`] drop guard
//! - **Local failures**: a failed run is counted in the [`TrialSample`] and
//!   the remaining runs continue
//! - **Sequential**: runs never overlap
//! - **Interruptible**: a latched [`Interrupt`] stops the loop at the next
//!   run boundary, or kills the child that is running

mod artifacts;
mod error;
mod interrupt;
mod runner;
mod sample;

pub use artifacts::Artifacts;
pub use error::{Result, RunFailure, TrialError};
pub use interrupt::{Interrupt, Trigger};
pub use runner::{TrialExecutor, TrialRunner};
pub use sample::TrialSample;
