use std::path::{Path, PathBuf};
use std::time::Duration;

use dlbench_report::OutputFormat;
use dlbench_size::{DEFAULT_PROBE_TIMEOUT, TargetSpec};
use dlbench_sweep::{SearchSpace, SweepMode};
use dlbench_tool::ToolKind;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::Cli;

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "dlbench.toml";
pub const ENV_PREFIX: &str = "DLBENCH_";

pub const DEFAULT_ITERATIONS: u32 = 3;
pub const DEFAULT_OUTPUT_FILE: &str = "test_dl.dat";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file {} does not exist", .0.display())]
    MissingFile(PathBuf),
    #[error(transparent)]
    Figment(#[from] Box<figment::Error>),
    #[error("iterations must be at least 1")]
    NoIterations,
    #[error("no benchmark targets configured")]
    NoTargets,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Every knob of a campaign, after defaults, file, environment and flags
/// have been layered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub iterations: u32,
    pub mode: SweepMode,
    pub include_large: bool,
    pub targets: Vec<TargetSpec>,
    pub tools: Vec<ToolKind>,
    pub output_file: PathBuf,
    pub trial_timeout_secs: Option<u64>,
    pub size_hint_timeout_secs: u64,
    pub format: OutputFormat,
    pub search: SearchSpace,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            mode: SweepMode::default(),
            include_large: true,
            targets: TargetSpec::defaults(),
            tools: ToolKind::ALL.to_vec(),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            trial_timeout_secs: None,
            size_hint_timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs(),
            format: OutputFormat::default(),
            search: SearchSpace::default(),
        }
    }
}

impl Config {
    /// Layer defaults, a TOML file and `DLBENCH_*` variables.
    ///
    /// An explicit `path` must exist; otherwise `./dlbench.toml` is read
    /// when present.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        match path {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            Some(path) => figment = figment.merge(Toml::file(path)),
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.is_file() {
                    figment = figment.merge(Toml::file(local));
                }
            }
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Figment(Box::new(e)))
    }

    /// Apply command-line overrides, which take precedence over everything.
    pub fn apply(&mut self, cli: &Cli) {
        if let Some(iterations) = cli.iterations {
            self.iterations = iterations;
        }
        if let Some(mode) = cli.mode {
            self.mode = mode.into();
        }
        if let Some(format) = cli.format {
            self.format = format.into();
        }
        if cli.skip_5gb {
            self.include_large = false;
        }
        if !cli.tools.is_empty() {
            self.tools = cli.tools.clone();
        }
        if let Some(output) = &cli.output_file {
            self.output_file = output.clone();
        }
        if let Some(secs) = cli.timeout {
            self.trial_timeout_secs = Some(secs);
        }

        if !cli.targets.is_empty() {
            self.targets = cli.targets.clone();
        }
        let defaults = TargetSpec::defaults();
        for (url, stock) in [(&cli.url_1gb, &defaults[0]), (&cli.url_5gb, &defaults[1])] {
            let Some(url) = url else { continue };
            match self.targets.iter_mut().find(|t| t.name == stock.name) {
                Some(target) => target.url = url.clone(),
                None => self.targets.push(TargetSpec {
                    url: url.clone(),
                    ..stock.clone()
                }),
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        Ok(())
    }

    /// Targets of this campaign, in configured order.
    pub fn active_targets(&self) -> impl Iterator<Item = &TargetSpec> {
        self.targets
            .iter()
            .filter(|t| self.include_large || !t.large)
    }

    /// `None` or zero means runs are never cut short.
    pub fn trial_timeout(&self) -> Option<Duration> {
        self.trial_timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }

    pub fn size_hint_timeout(&self) -> Duration {
        Duration::from_secs(self.size_hint_timeout_secs.max(1))
    }
}
