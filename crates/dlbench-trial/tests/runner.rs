#![cfg(unix)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use dlbench_tool::Argv;
use dlbench_trial::{Artifacts, TrialRunner};
use tempfile::tempdir;

/// A stand-in downloader: writes the output and both sidecars, then exits with `code`.
fn fake_tool(output: &Path, code: i32) -> Argv {
    Argv::new("/bin/sh")
        .arg("-c")
        .arg(format!(
            "printf data > \"$0\"; touch \"$0.aria2\" \"$0.hydra\"; echo 'boom' >&2; exit {code}"
        ))
        .arg(output.display().to_string())
}

fn assert_clean(output: &Path) {
    for path in Artifacts::for_output(output).paths() {
        assert!(!path.exists(), "{} left behind", path.display());
    }
}

#[tokio::test]
async fn test_successful_runs_are_timed_and_cleaned() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("test_dl.dat");

    let sample = TrialRunner::new()
        .run("fake", &fake_tool(&output, 0), &output, 3)
        .await
        .unwrap();

    assert_eq!(sample.durations.len(), 3);
    assert_eq!(sample.failures, 0);
    assert!(sample.durations.iter().all(|d| *d >= 0.0));
    assert_clean(&output);
}

#[tokio::test]
async fn test_failed_runs_are_counted_and_cleaned() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("test_dl.dat");

    let sample = TrialRunner::new()
        .run("fake", &fake_tool(&output, 1), &output, 3)
        .await
        .unwrap();

    assert!(sample.all_failed());
    assert_eq!(sample.failures, 3);
    assert_eq!(sample.attempts(), 3);
    assert_clean(&output);
}

#[tokio::test]
async fn test_stale_artifacts_removed_before_first_run() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("test_dl.dat");
    std::fs::write(&output, b"stale").unwrap();

    // Fails if the output already exists.
    let argv = Argv::new("/bin/sh")
        .arg("-c")
        .arg("test ! -e \"$0\"")
        .arg(output.display().to_string());

    let sample = TrialRunner::new()
        .run("fresh", &argv, &output, 2)
        .await
        .unwrap();

    assert_eq!(sample.failures, 0);
    assert_eq!(sample.durations.len(), 2);
}

#[tokio::test]
async fn test_missing_program_is_a_failed_run() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("test_dl.dat");
    let argv = Argv::new(PathBuf::from("/nonexistent/dlbench-tool"));

    let sample = TrialRunner::new()
        .run("ghost", &argv, &output, 2)
        .await
        .unwrap();

    assert_eq!(sample.failures, 2);
    assert_clean(&output);
}

#[tokio::test]
async fn test_timeout_kills_and_fails_run() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("test_dl.dat");
    // Leaves a partial output and both sidecars, then stalls.
    let argv = Argv::new("/bin/sh")
        .arg("-c")
        .arg("printf data > \"$0\"; touch \"$0.hydra\" \"$0.aria2\"; sleep 5")
        .arg(output.display().to_string());

    let started = std::time::Instant::now();
    let sample = TrialRunner::new()
        .timeout(Some(Duration::from_millis(500)))
        .run("slow", &argv, &output, 1)
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(sample.failures, 1);
    assert!(sample.durations.is_empty());
    assert_clean(&output);
}

#[tokio::test]
async fn test_zero_iterations_runs_nothing() {
    let dir = tempdir().unwrap();
    let output = dir.path().join("test_dl.dat");

    let sample = TrialRunner::new()
        .run("fake", &fake_tool(&output, 0), &output, 0)
        .await
        .unwrap();

    assert_eq!(sample.attempts(), 0);
}
