//! Turning duration samples into ranked throughput reports.
//!
//! Output goes through a [`Sink`] handed in by the caller; nothing here
//! touches process-wide terminal state.

use std::fmt;

use dlbench_size::BenchmarkTarget;
use dlbench_trial::TrialSample;
use serde::{Deserialize, Serialize};

pub use aggregate::{RankedResult, mean, rank, throughput};
pub use sink::{ConsoleSink, MemorySink, Sink, Tone};
pub use table::{Formatter, format_relative, format_secs};

mod aggregate;
mod sink;
mod table;

use table::Row;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// The ranking of every configuration tried against one target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetReport {
    pub target: BenchmarkTarget,
    pub results: Vec<RankedResult>,
}

impl TargetReport {
    pub fn new<I, S>(target: BenchmarkTarget, samples: I) -> Self
    where
        I: IntoIterator<Item = (S, TrialSample)>,
        S: Into<String>,
    {
        let results = rank(target.size_mib, samples);
        Self { target, results }
    }

    pub fn failed(&self) -> impl Iterator<Item = &RankedResult> {
        self.results.iter().filter(|r| r.all_failed())
    }
}

/// Render one target's ranking as a table.
pub fn render_table(report: &TargetReport, sink: &mut impl Sink) {
    let table = Formatter {
        header: Some(format!(
            "{} (~{:.2} MiB)",
            report.target.name, report.target.size_mib
        )),
    }
    .build(report.results.iter().map(Row::from))
    .to_string();

    for line in table.lines() {
        sink.emit(line, Tone::Plain);
    }

    let failed: Vec<&str> = report.failed().map(|r| r.name.as_str()).collect();
    if !failed.is_empty() {
        sink.emit(
            &format!("Every run failed for: {}", failed.join(", ")),
            Tone::Failure,
        );
    }
}

/// Render all reports as one JSON array. Infinite times become `null`.
pub fn render_json(reports: &[TargetReport], sink: &mut impl Sink) -> serde_json::Result<()> {
    let json = serde_json::to_string_pretty(reports)?;
    for line in json.lines() {
        sink.emit(line, Tone::Plain);
    }
    Ok(())
}
