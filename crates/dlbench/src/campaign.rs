use anyhow::Context;
use dlbench_report::{OutputFormat, Sink, TargetReport, Tone, render_json, render_table};
use dlbench_size::{BenchmarkTarget, HttpClient};
use dlbench_sweep::generate;
use dlbench_tool::ToolHandle;
use dlbench_trial::{Interrupt, TrialError, TrialExecutor};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::Config;
use crate::progress::TrialProgress;

#[derive(Debug, Error)]
pub enum CampaignError {
    #[error("No tools found! Please install hydra, aria2c, curl, or wget.")]
    NoTools,
    #[error("benchmark interrupted")]
    Interrupted,
}

impl From<TrialError> for CampaignError {
    fn from(e: TrialError) -> Self {
        match e {
            TrialError::Interrupted => CampaignError::Interrupted,
        }
    }
}

/// One benchmarking pass over every active target.
pub struct Campaign<'a, E, C> {
    config: &'a Config,
    executor: &'a E,
    client: &'a C,
    interrupt: Interrupt,
}

impl<'a, E: TrialExecutor, C: HttpClient> Campaign<'a, E, C> {
    pub fn new(config: &'a Config, executor: &'a E, client: &'a C) -> Self {
        Self {
            config,
            executor,
            client,
            interrupt: Interrupt::never(),
        }
    }

    /// Abort between targets and configurations, and during size discovery,
    /// once `interrupt` is raised.
    #[must_use]
    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Benchmark `tools` against each active target in turn.
    ///
    /// Fails before touching any target when `tools` is empty.
    pub async fn run(
        &self,
        tools: &[ToolHandle],
        sink: &mut impl Sink,
    ) -> anyhow::Result<Vec<TargetReport>> {
        if tools.is_empty() {
            return Err(CampaignError::NoTools.into());
        }

        let config = self.config;
        let mut out = Narrator {
            sink: &mut *sink,
            quiet: config.format == OutputFormat::Json,
        };

        out.say(
            &format!("Starting Benchmark (Iterations: {})", config.iterations),
            Tone::Header,
        );
        let names: Vec<String> = tools
            .iter()
            .map(|t| format!("{} ({})", t.kind(), t.path().display()))
            .collect();
        out.say(&format!("Tools detected: {}", names.join(", ")), Tone::Plain);

        let mut reports = Vec::new();
        for spec in config.active_targets() {
            self.interrupt.check().map_err(CampaignError::from)?;
            out.say("", Tone::Plain);
            out.say(&format!("Benchmarking: {}", spec.name), Tone::Header);
            out.say(&format!("URL: {}", spec.url), Tone::Plain);

            let target = tokio::select! {
                biased;
                () = self.interrupt.raised() => return Err(CampaignError::Interrupted.into()),
                target = BenchmarkTarget::discover(spec, self.client, config.size_hint_timeout()) => target,
            };
            out.say(
                &format!("Target Size: ~{:.2} MiB", target.size_mib),
                Tone::Plain,
            );

            let configs = generate(
                config.mode,
                tools,
                &target.url,
                &config.output_file,
                &config.search,
            );
            if configs.is_empty() {
                warn!(
                    name = %target.name,
                    mode = %config.mode,
                    "no configurations to run, skipping target"
                );
                continue;
            }

            let mut samples = Vec::with_capacity(configs.len());
            for trial in &configs {
                self.interrupt.check().map_err(CampaignError::from)?;
                out.say(&format!("Running {}...", trial.name), Tone::Info);
                let progress = TrialProgress::start(&trial.name, config.iterations);
                let sample = self
                    .executor
                    .execute(&trial.name, &trial.argv(), &trial.output, config.iterations)
                    .await
                    .map_err(CampaignError::from)?;
                progress.finish();

                if sample.all_failed() {
                    out.say(
                        &format!("{}: every run failed", trial.name),
                        Tone::Failure,
                    );
                } else {
                    out.say(
                        &format!(
                            "{}: {}/{} runs succeeded",
                            trial.name,
                            sample.successes(),
                            sample.attempts()
                        ),
                        Tone::Success,
                    );
                }
                samples.push((trial.name.clone(), sample));
            }

            let report = TargetReport::new(target, samples);
            if config.format == OutputFormat::Table {
                render_table(&report, &mut *out.sink);
            }
            reports.push(report);
        }

        self.interrupt.check().map_err(CampaignError::from)?;
        if config.format == OutputFormat::Json {
            render_json(&reports, sink).context("failed to render JSON report")?;
        }

        Ok(reports)
    }
}

/// Progress lines go to the sink for tables and to the log for JSON, so a
/// JSON report on stdout stays parseable.
struct Narrator<'s, S> {
    sink: &'s mut S,
    quiet: bool,
}

impl<S: Sink> Narrator<'_, S> {
    fn say(&mut self, line: &str, tone: Tone) {
        if !self.quiet {
            self.sink.emit(line, tone);
        } else if !line.is_empty() {
            info!("{line}");
        }
    }
}
