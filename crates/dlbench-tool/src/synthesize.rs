//! Translation of abstract trial parameters into per-tool argument vectors.
//!
//! Every tool accepts the same [`Invocation`]; whatever a tool cannot express
//! is dropped here instead of being reported, so one parameter set can be
//! swept across all tools.

use std::path::Path;

use crate::argv::Argv;
use crate::kind::{Allocation, Selector, ToolKind};

/// Retries the primary tool may spend inside a single run.
pub const PRIMARY_MAX_TRIES: u32 = 3;

/// Parameters of one invocation, independent of the tool that runs it.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub url: &'a str,
    pub output: &'a Path,
    pub concurrency: u32,
    pub selector: Option<Selector>,
    pub allocation: Option<Allocation>,
}

impl Invocation<'_> {
    /// Connection count actually requested; never below one.
    pub fn connections(&self) -> u32 {
        self.concurrency.max(1)
    }

    fn dir(&self) -> String {
        match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.display().to_string(),
            _ => ".".to_string(),
        }
    }

    fn file_name(&self) -> String {
        self.output
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.output.display().to_string())
    }

    fn output_path(&self) -> String {
        self.output.display().to_string()
    }
}

type SynthesizeFn = fn(&Path, &Invocation<'_>) -> Argv;

fn synthesizer(kind: ToolKind) -> SynthesizeFn {
    match kind {
        ToolKind::Hydra => hydra,
        ToolKind::Aria2c => aria2c,
        ToolKind::Curl => curl,
        ToolKind::Wget => wget,
    }
}

/// Build the argument vector `kind` needs to perform `inv` with the binary at `path`.
///
/// Pure: the same inputs always give the same vector.
pub fn synthesize(kind: ToolKind, path: &Path, inv: &Invocation<'_>) -> Argv {
    let caps = kind.capabilities();
    let inv = Invocation {
        selector: inv.selector.filter(|_| caps.selector),
        allocation: inv.allocation.filter(|_| caps.allocation),
        ..*inv
    };
    synthesizer(kind)(path, &inv)
}

fn hydra(path: &Path, inv: &Invocation<'_>) -> Argv {
    Argv::new(path)
        .args(["download", inv.url])
        .arg("-o")
        .arg(inv.file_name())
        .arg("--dir")
        .arg(inv.dir())
        .arg("-s")
        .arg(inv.connections().to_string())
        .arg("--max-tries")
        .arg(PRIMARY_MAX_TRIES.to_string())
        .opt("--piece-selector", inv.selector)
        .opt("--file-allocation", inv.allocation)
}

fn aria2c(path: &Path, inv: &Invocation<'_>) -> Argv {
    let connections = inv.connections().to_string();
    Argv::new(path)
        .arg(inv.url)
        .arg("-o")
        .arg(inv.file_name())
        .arg("-d")
        .arg(inv.dir())
        .args(["-x", connections.as_str(), "-s", connections.as_str()])
        .args([
            "--file-allocation=none",
            "--allow-overwrite=true",
            "-q",
        ])
}

fn curl(path: &Path, inv: &Invocation<'_>) -> Argv {
    Argv::new(path)
        .arg("-L")
        .arg("-o")
        .arg(inv.output_path())
        .arg("-s")
        .arg(inv.url)
}

fn wget(path: &Path, inv: &Invocation<'_>) -> Argv {
    Argv::new(path)
        .arg("-O")
        .arg(inv.output_path())
        .arg("-q")
        .arg(inv.url)
}
