use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};
use dlbench_report::OutputFormat;
use dlbench_size::TargetSpec;
use dlbench_sweep::SweepMode;
use dlbench_tool::ToolKind;

#[derive(Clone, Debug, Parser)]
#[command(
    name = "dlbench",
    version = env!("CARGO_PKG_VERSION"),
    about = "Rank download tools by throughput against remote targets",
    long_about = None
)]
pub struct Cli {
    /// TOML config file (defaults to ./dlbench.toml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// URL for the ~1GB target
    #[arg(long, value_name = "URL")]
    pub url_1gb: Option<String>,

    /// URL for the ~5GB target
    #[arg(long, value_name = "URL")]
    pub url_5gb: Option<String>,

    /// Benchmark this target instead of the defaults; repeatable
    #[arg(long = "target", value_name = "NAME=URL", value_parser = parse_target)]
    pub targets: Vec<TargetSpec>,

    /// Runs per configuration
    #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub iterations: Option<u32>,

    /// Skip large targets such as the 5GB file
    #[arg(long, visible_alias = "skip-large")]
    pub skip_5gb: bool,

    /// Compare tools, or search strategy pairings of the primary tool
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Only consider these tools (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub tools: Vec<ToolKind>,

    /// File every tool downloads into
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Kill and fail a run after this many seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Comparison,
    Search,
}

impl From<ModeArg> for SweepMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Comparison => SweepMode::Comparison,
            ModeArg::Search => SweepMode::Search,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Table,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Table => OutputFormat::Table,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn parse_target(s: &str) -> Result<TargetSpec, String> {
    let (name, url) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=URL, got '{s}'"))?;
    let (name, url) = (name.trim(), url.trim());
    if name.is_empty() || url.is_empty() {
        return Err(format!("expected NAME=URL, got '{s}'"));
    }
    Ok(TargetSpec::new(name, url))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_unset() {
        let cli = Cli::try_parse_from(["dlbench"]).unwrap();
        assert_eq!(cli.iterations, None);
        assert_eq!(cli.mode, None);
        assert!(cli.tools.is_empty());
        assert!(!cli.skip_5gb);
    }

    #[test]
    fn test_full_command_line() {
        let cli = Cli::try_parse_from([
            "dlbench",
            "-n",
            "5",
            "--mode",
            "search",
            "--tools",
            "hydra,curl",
            "--target",
            "mirror=https://example.com/100MB.bin",
            "--skip-large",
            "--timeout",
            "600",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.iterations, Some(5));
        assert_eq!(cli.mode, Some(ModeArg::Search));
        assert_eq!(cli.tools, [ToolKind::Hydra, ToolKind::Curl]);
        assert_eq!(cli.targets[0].name, "mirror");
        assert_eq!(cli.targets[0].url, "https://example.com/100MB.bin");
        assert!(cli.skip_5gb);
        assert_eq!(cli.timeout, Some(600));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(Cli::try_parse_from(["dlbench", "--iterations", "0"]).is_err());
    }

    #[test]
    fn test_unknown_tool_rejected() {
        assert!(Cli::try_parse_from(["dlbench", "--tools", "axel"]).is_err());
    }

    #[test]
    fn test_parse_target() {
        assert!(parse_target("no-separator").is_err());
        assert!(parse_target("=https://x").is_err());
        let spec = parse_target("big = https://x/5GB").unwrap();
        assert_eq!(spec.name, "big");
        assert_eq!(spec.url, "https://x/5GB");
    }
}
