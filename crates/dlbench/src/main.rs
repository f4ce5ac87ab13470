use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use dlbench_report::ConsoleSink;
use dlbench_size::ReqwestClient;
use dlbench_tool::ToolResolver;
use dlbench_trial::{Interrupt, TrialRunner};
use tracing::{debug, error};

use crate::campaign::{Campaign, CampaignError};
use crate::cli::Cli;
use crate::config::Config;

mod campaign;
mod cli;
mod config;
mod logging;
mod progress;

/// Conventional exit status after SIGINT.
const EXIT_INTERRUPTED: u8 = 130;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            match e.downcast_ref::<CampaignError>() {
                Some(CampaignError::Interrupted) => ExitCode::from(EXIT_INTERRUPTED),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load config")?;
    config.apply(&cli);
    config.validate()?;
    debug!(?config, "effective configuration");

    let interrupt = Interrupt::ctrl_c().context("failed to listen for Ctrl-C")?;

    let work_dir = std::env::current_dir().context("failed to read working directory")?;
    let tools = ToolResolver::new(work_dir).resolve(&config.tools);

    let client = ReqwestClient::new().context("failed to build HTTP client")?;
    let runner = TrialRunner::new()
        .timeout(config.trial_timeout())
        .interrupt(interrupt.clone());
    let mut sink = ConsoleSink::stdout();

    Campaign::new(&config, &runner, &client)
        .interrupt(interrupt)
        .run(&tools, &mut sink)
        .await?;
    Ok(())
}
