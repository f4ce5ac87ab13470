//! Timed execution of one configuration.
//!
//! Trials are intentionally non-concurrent: concurrent downloads over the
//! same network path would contend for bandwidth and invalidate the relative
//! comparison. Each run is awaited to completion before the next starts.

use std::future::{Future, pending};
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::{Duration, Instant};

use dlbench_tool::Argv;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, ChildStderr, Command};
use tracing::{debug, warn};

use crate::artifacts::Artifacts;
use crate::error::{Result, RunFailure, TrialError};
use crate::interrupt::Interrupt;
use crate::sample::TrialSample;

/// Lines of child stderr kept for a failure report.
const STDERR_TAIL_LINES: usize = 5;

/// Something that can run a configuration `iterations` times.
pub trait TrialExecutor {
    fn execute(
        &self,
        label: &str,
        argv: &Argv,
        output: &Path,
        iterations: u32,
    ) -> impl Future<Output = Result<TrialSample>>;
}

/// Runs trials as child processes.
#[derive(Debug, Clone, Default)]
pub struct TrialRunner {
    timeout: Option<Duration>,
    interrupt: Interrupt,
}

enum RunOutcome {
    Success,
    Failed(RunFailure),
    Interrupted,
}

enum Exit {
    Finished(std::io::Result<ExitStatus>, String),
    TimedOut,
    Interrupted,
}

impl TrialRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill and fail a run that takes longer than `timeout`.
    #[must_use]
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Stop at the next run boundary, or kill the running child, once
    /// `interrupt` is raised. Without one, runs are never interrupted.
    #[must_use]
    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Run `argv` `iterations` times, cleaning `output` and its sidecars
    /// before and after every run.
    ///
    /// Failed runs are counted, never returned as errors. Only an operator
    /// interrupt stops the loop early, including one raised before the first
    /// run or between runs.
    pub async fn run(
        &self,
        label: &str,
        argv: &Argv,
        output: &Path,
        iterations: u32,
    ) -> Result<TrialSample> {
        let mut sample = TrialSample::default();

        for iteration in 1..=iterations {
            if self.interrupt.check().is_err() {
                warn!(tool = label, iteration, "interrupted before run");
                return Err(TrialError::Interrupted);
            }

            let artifacts = Artifacts::claim(output);
            let start = Instant::now();
            let outcome = self.run_once(argv).await;
            let elapsed = start.elapsed();
            drop(artifacts);

            match outcome {
                RunOutcome::Success => {
                    debug!(
                        tool = label,
                        iteration,
                        secs = elapsed.as_secs_f64(),
                        "run finished"
                    );
                    sample.record_success(elapsed);
                }
                RunOutcome::Failed(reason) => {
                    warn!(tool = label, iteration, command = %argv, %reason, "run failed");
                    sample.record_failure();
                }
                RunOutcome::Interrupted => {
                    warn!(tool = label, iteration, "run interrupted");
                    return Err(TrialError::Interrupted);
                }
            }
        }

        Ok(sample)
    }

    async fn run_once(&self, argv: &Argv) -> RunOutcome {
        let mut command = Command::new(argv.program());
        command
            .args(argv.get_args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(source) => {
                return RunOutcome::Failed(RunFailure::Spawn {
                    program: argv.program().to_path_buf(),
                    source,
                });
            }
        };
        let stderr = child.stderr.take();

        let exit = tokio::select! {
            biased;
            () = self.interrupt.raised() => Exit::Interrupted,
            (status, stderr) = wait_with_stderr(&mut child, stderr) => Exit::Finished(status, stderr),
            () = deadline(self.timeout) => Exit::TimedOut,
        };

        match exit {
            Exit::Finished(Ok(status), _) if status.success() => RunOutcome::Success,
            // The child shares our process group and sees Ctrl-C first.
            Exit::Finished(Ok(status), _) if killed_by_interrupt(status) => {
                RunOutcome::Interrupted
            }
            Exit::Finished(Ok(status), stderr) => RunOutcome::Failed(RunFailure::Exit {
                status,
                stderr: tail(&stderr),
            }),
            Exit::Finished(Err(e), _) => RunOutcome::Failed(RunFailure::Wait(e)),
            Exit::TimedOut => {
                kill(&mut child).await;
                RunOutcome::Failed(RunFailure::TimedOut(self.timeout.unwrap_or_default()))
            }
            Exit::Interrupted => {
                kill(&mut child).await;
                RunOutcome::Interrupted
            }
        }
    }
}

impl TrialExecutor for TrialRunner {
    fn execute(
        &self,
        label: &str,
        argv: &Argv,
        output: &Path,
        iterations: u32,
    ) -> impl Future<Output = Result<TrialSample>> {
        self.run(label, argv, output, iterations)
    }
}

async fn wait_with_stderr(
    child: &mut Child,
    stderr: Option<ChildStderr>,
) -> (std::io::Result<ExitStatus>, String) {
    let drain = async move {
        let mut buf = Vec::new();
        if let Some(mut pipe) = stderr {
            let _ = pipe.read_to_end(&mut buf).await;
        }
        String::from_utf8_lossy(&buf).into_owned()
    };
    tokio::join!(child.wait(), drain)
}

async fn deadline(timeout: Option<Duration>) {
    match timeout {
        Some(timeout) => tokio::time::sleep(timeout).await,
        None => pending().await,
    }
}

#[cfg(unix)]
fn killed_by_interrupt(status: ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;

    const SIGINT: i32 = 2;
    status.signal() == Some(SIGINT)
}

#[cfg(not(unix))]
fn killed_by_interrupt(_status: ExitStatus) -> bool {
    false
}

async fn kill(child: &mut Child) {
    if let Err(e) = child.kill().await {
        debug!(error = %e, "failed to kill child");
    }
}

fn tail(stderr: &str) -> String {
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join(" | ")
}
