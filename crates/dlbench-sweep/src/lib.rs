//! Expansion of resolved tools into the configurations of one benchmarking pass.
//!
//! Two modes exist and a pass uses exactly one of them:
//!
//! - [`SweepMode::Comparison`] - a few hand-picked configurations per tool
//! - [`SweepMode::Search`] - every selector × allocation pairing of the
//!   primary tool at a fixed connection count

use std::fmt;
use std::path::{Path, PathBuf};

use dlbench_tool::{Allocation, Argv, Invocation, Selector, ToolHandle, ToolKind};
use serde::{Deserialize, Serialize};

/// Connection count of the "many connections" comparison variant.
pub const HIGH_CONCURRENCY: u32 = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SweepMode {
    #[default]
    Comparison,
    Search,
}

impl fmt::Display for SweepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepMode::Comparison => write!(f, "comparison"),
            SweepMode::Search => write!(f, "search"),
        }
    }
}

/// Strategy matrix explored in search mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSpace {
    pub concurrency: u32,
    pub selectors: Vec<Selector>,
    pub allocations: Vec<Allocation>,
}

impl Default for SearchSpace {
    fn default() -> Self {
        Self {
            concurrency: HIGH_CONCURRENCY,
            selectors: Selector::ALL.to_vec(),
            allocations: Allocation::ALL.to_vec(),
        }
    }
}

impl SearchSpace {
    pub fn len(&self) -> usize {
        self.selectors.len() * self.allocations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One configuration under test. Never mutated once generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialConfig {
    pub tool: ToolHandle,
    pub url: String,
    pub output: PathBuf,
    pub concurrency: u32,
    pub selector: Option<Selector>,
    pub allocation: Option<Allocation>,
    pub name: String,
}

impl TrialConfig {
    pub fn kind(&self) -> ToolKind {
        self.tool.kind()
    }

    pub fn argv(&self) -> Argv {
        self.tool.synthesize(&Invocation {
            url: &self.url,
            output: &self.output,
            concurrency: self.concurrency,
            selector: self.selector,
            allocation: self.allocation,
        })
    }
}

/// Generate the configurations of one pass against `url`.
///
/// Enumeration order follows `tools`, which keeps ties in the ranking stable.
pub fn generate(
    mode: SweepMode,
    tools: &[ToolHandle],
    url: &str,
    output: &Path,
    space: &SearchSpace,
) -> Vec<TrialConfig> {
    let config = |tool: &ToolHandle, concurrency, selector, allocation, name| TrialConfig {
        tool: tool.clone(),
        url: url.to_string(),
        output: output.to_path_buf(),
        concurrency,
        selector,
        allocation,
        name,
    };

    match mode {
        SweepMode::Comparison => tools
            .iter()
            .flat_map(|tool| {
                let id = tool.kind().id();
                if tool.kind().capabilities().concurrency {
                    vec![
                        config(
                            tool,
                            HIGH_CONCURRENCY,
                            None,
                            None,
                            format!("{id} ({HIGH_CONCURRENCY} conn)"),
                        ),
                        config(tool, 1, None, None, format!("{id} (1 conn)")),
                    ]
                } else {
                    vec![config(tool, 1, None, None, id.to_string())]
                }
            })
            .collect(),
        SweepMode::Search => {
            let Some(primary) = tools.iter().find(|t| t.kind().is_primary()) else {
                return Vec::new();
            };
            space
                .selectors
                .iter()
                .flat_map(|&sel| {
                    space.allocations.iter().map(move |&alloc| (sel, alloc))
                })
                .map(|(sel, alloc)| {
                    config(
                        primary,
                        space.concurrency,
                        Some(sel),
                        Some(alloc),
                        format!("{} [{sel}/{alloc}]", primary.kind().id()),
                    )
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/1000mb.bin";

    fn all_tools() -> Vec<ToolHandle> {
        ToolKind::ALL
            .into_iter()
            .map(|kind| ToolHandle::new(kind, format!("/usr/bin/{kind}")))
            .collect()
    }

    #[test]
    fn test_comparison_mode() {
        let configs = generate(
            SweepMode::Comparison,
            &all_tools(),
            URL,
            Path::new("test_dl.dat"),
            &SearchSpace::default(),
        );
        let names: Vec<_> = configs.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "hydra (16 conn)",
                "hydra (1 conn)",
                "aria2c (16 conn)",
                "aria2c (1 conn)",
                "curl",
                "wget",
            ]
        );
        assert!(configs.iter().all(|c| c.selector.is_none() && c.allocation.is_none()));
        assert_eq!(configs[0].concurrency, 16);
        assert_eq!(configs[1].concurrency, 1);
    }

    #[test]
    fn test_search_mode_two_by_two() {
        let space = SearchSpace {
            concurrency: 16,
            selectors: vec![Selector::InOrder, Selector::Random],
            allocations: vec![Allocation::None, Allocation::Falloc],
        };
        let configs = generate(
            SweepMode::Search,
            &all_tools(),
            URL,
            Path::new("test_dl.dat"),
            &space,
        );

        assert_eq!(configs.len(), 4);
        assert!(configs.iter().all(|c| c.kind() == ToolKind::Hydra));
        assert!(configs.iter().all(|c| c.concurrency == 16));
        assert_eq!(configs[0].name, "hydra [inorder/none]");
        assert_eq!(configs[3].name, "hydra [random/falloc]");
    }

    #[test]
    fn test_default_search_space() {
        let configs = generate(
            SweepMode::Search,
            &all_tools(),
            URL,
            Path::new("test_dl.dat"),
            &SearchSpace::default(),
        );
        assert_eq!(configs.len(), SearchSpace::default().len());
        assert_eq!(configs.len(), 6);
    }

    #[test]
    fn test_search_mode_without_primary() {
        let tools: Vec<_> = all_tools()
            .into_iter()
            .filter(|t| !t.kind().is_primary())
            .collect();
        let configs = generate(
            SweepMode::Search,
            &tools,
            URL,
            Path::new("test_dl.dat"),
            &SearchSpace::default(),
        );
        assert!(configs.is_empty());
    }

    #[test]
    fn test_config_argv_carries_strategies() {
        let configs = generate(
            SweepMode::Search,
            &all_tools(),
            URL,
            Path::new("test_dl.dat"),
            &SearchSpace::default(),
        );
        let argv = configs[1].argv();
        assert_eq!(argv.value_of("--piece-selector"), Some("inorder"));
        assert_eq!(argv.value_of("--file-allocation"), Some("trunc"));
        assert_eq!(argv.value_of("-s"), Some("16"));
    }
}
