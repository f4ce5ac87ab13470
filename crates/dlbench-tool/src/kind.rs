//! Tool kinds and the knobs each of them understands.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// What a tool kind can be told to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub concurrency: bool,
    pub selector: bool,
    pub allocation: bool,
}

/// Retrieval tools the harness knows how to drive.
///
/// Declaration order is the resolution and enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// The segmented downloader under test.
    Hydra,
    /// Multi-connection competitor.
    Aria2c,
    Curl,
    Wget,
}

impl ToolKind {
    pub const ALL: [ToolKind; 4] = [
        ToolKind::Hydra,
        ToolKind::Aria2c,
        ToolKind::Curl,
        ToolKind::Wget,
    ];

    /// The tool whose strategy knobs are under test.
    pub const PRIMARY: ToolKind = ToolKind::Hydra;

    pub fn id(self) -> &'static str {
        match self {
            ToolKind::Hydra => "hydra",
            ToolKind::Aria2c => "aria2c",
            ToolKind::Curl => "curl",
            ToolKind::Wget => "wget",
        }
    }

    pub fn is_primary(self) -> bool {
        self == Self::PRIMARY
    }

    pub fn capabilities(self) -> Capabilities {
        match self {
            ToolKind::Hydra => Capabilities {
                concurrency: true,
                selector: true,
                allocation: true,
            },
            ToolKind::Aria2c => Capabilities {
                concurrency: true,
                selector: false,
                allocation: false,
            },
            ToolKind::Curl | ToolKind::Wget => Capabilities {
                concurrency: false,
                selector: false,
                allocation: false,
            },
        }
    }

    /// Suffix of the control file a segmented download leaves next to its output.
    pub fn sidecar_suffix(self) -> Option<&'static str> {
        match self {
            ToolKind::Hydra => Some(".hydra"),
            ToolKind::Aria2c => Some(".aria2"),
            ToolKind::Curl | ToolKind::Wget => None,
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ToolKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ToolKind::ALL
            .into_iter()
            .find(|kind| kind.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownTool(s.to_string()))
    }
}

/// Piece selection strategy of the primary tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    InOrder,
    Random,
}

impl Selector {
    pub const ALL: [Selector; 2] = [Selector::InOrder, Selector::Random];

    pub fn as_str(self) -> &'static str {
        match self {
            Selector::InOrder => "inorder",
            Selector::Random => "random",
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Selector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Selector::ALL
            .into_iter()
            .find(|sel| sel.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownSelector(s.to_string()))
    }
}

/// File allocation method of the primary tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Allocation {
    None,
    /// ftruncate, sparse
    Trunc,
    /// fallocate, blocks reserved up front
    Falloc,
}

impl Allocation {
    pub const ALL: [Allocation; 3] = [Allocation::None, Allocation::Trunc, Allocation::Falloc];

    pub fn as_str(self) -> &'static str {
        match self {
            Allocation::None => "none",
            Allocation::Trunc => "trunc",
            Allocation::Falloc => "falloc",
        }
    }
}

impl fmt::Display for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Allocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Allocation::ALL
            .into_iter()
            .find(|alloc| alloc.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownAllocation(s.to_string()))
    }
}
