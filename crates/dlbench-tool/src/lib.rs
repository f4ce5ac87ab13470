//! Retrieval tools as seen by the benchmark harness.
//!
//! # Architecture
//!
//! - [`ToolKind`] - the closed set of tools, each with a capability set
//! - [`ToolResolver`] - locates executables; missing tools are dropped
//! - [`synthesize`] - turns an [`Invocation`] into a tool-specific [`Argv`]
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use dlbench_tool::{Invocation, ToolKind, synthesize};
//!
//! let inv = Invocation {
//!     url: "https://example.com/file.bin",
//!     output: Path::new("out.dat"),
//!     concurrency: 0,
//!     selector: None,
//!     allocation: None,
//! };
//! let argv = synthesize(ToolKind::Aria2c, Path::new("/usr/bin/aria2c"), &inv);
//! assert_eq!(argv.value_of("-x"), Some("1"));
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

pub use argv::Argv;
pub use error::{Error, Result};
pub use kind::{Allocation, Capabilities, Selector, ToolKind};
pub use resolver::{LocalDir, SearchPath, TargetResolver, TripleResolver};
pub use synthesize::{Invocation, PRIMARY_MAX_TRIES, synthesize};

mod argv;
mod error;
mod kind;
mod resolver;
mod synthesize;

/// A tool that was found on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolHandle {
    kind: ToolKind,
    path: PathBuf,
}

impl ToolHandle {
    pub fn new(kind: ToolKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }

    pub fn kind(&self) -> ToolKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn synthesize(&self, inv: &Invocation<'_>) -> Argv {
        synthesize(self.kind, &self.path, inv)
    }
}

/// Finds the executables of candidate tools.
///
/// Every tool is looked up through `search`. The primary tool additionally
/// falls back to `<work_dir>/build` and then `<work_dir>`.
#[derive(Debug, Clone)]
pub struct ToolResolver<S = SearchPath> {
    search: S,
    work_dir: PathBuf,
}

impl ToolResolver<SearchPath> {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self::with_search(SearchPath, work_dir)
    }
}

impl<S: TargetResolver> ToolResolver<S> {
    pub fn with_search(search: S, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            search,
            work_dir: work_dir.into(),
        }
    }

    /// Resolve `candidates` in order; tools that cannot be located are omitted.
    pub fn resolve(&self, candidates: &[ToolKind]) -> Vec<ToolHandle> {
        let primary = TripleResolver::new(
            &self.search,
            LocalDir::new(self.work_dir.join("build")),
            LocalDir::new(&self.work_dir),
        );

        let mut handles: Vec<ToolHandle> = Vec::with_capacity(candidates.len());
        for &kind in candidates {
            if handles.iter().any(|h| h.kind == kind) {
                continue;
            }
            let path = if kind.is_primary() {
                primary.resolve(kind.id())
            } else {
                self.search.resolve(kind.id())
            };
            match path {
                Some(path) => {
                    debug!(tool = %kind, path = %path.display(), "resolved tool");
                    handles.push(ToolHandle::new(kind, path));
                }
                None => warn!(tool = %kind, "tool not found, skipping"),
            }
        }
        handles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_handle_synthesize_uses_path() {
        let handle = ToolHandle::new(ToolKind::Wget, "/usr/bin/wget");
        let inv = Invocation {
            url: "http://localhost/a",
            output: Path::new("a.dat"),
            concurrency: 4,
            selector: None,
            allocation: None,
        };
        assert_eq!(handle.synthesize(&inv).program(), Path::new("/usr/bin/wget"));
    }
}
