use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::http::HttpClient;
use crate::probe::size_hint;

pub const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

pub const DEFAULT_URL_1GB: &str = "https://speedtest.wtnet.de/files/1000mb.bin";
pub const DEFAULT_URL_5GB: &str = "https://speedtest.wtnet.de/files/5000mb.bin";

/// Nominal sizes keyed by a pattern in the target name, checked in order.
const NOMINAL_SIZES: [(&str, f64); 3] = [("1GB", 1024.0), ("5GB", 5120.0), ("100MB", 100.0)];

/// A target as configured, before its size is known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub name: String,
    pub url: String,
    /// Size to assume when the server does not report one.
    #[serde(default)]
    pub nominal_mib: Option<f64>,
    /// Large targets are skipped when large targets are excluded.
    #[serde(default)]
    pub large: bool,
}

impl TargetSpec {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            nominal_mib: None,
            large: false,
        }
    }

    #[must_use]
    pub fn large(mut self, large: bool) -> Self {
        self.large = large;
        self
    }

    #[must_use]
    pub fn nominal_mib(mut self, mib: Option<f64>) -> Self {
        self.nominal_mib = mib;
        self
    }

    /// The stock 1 GB and 5 GB targets.
    pub fn defaults() -> Vec<TargetSpec> {
        vec![
            TargetSpec::new("1GB File", DEFAULT_URL_1GB),
            TargetSpec::new("5GB File", DEFAULT_URL_5GB).large(true),
        ]
    }
}

/// A target whose size has been settled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkTarget {
    pub name: String,
    pub url: String,
    /// Never negative or NaN; 0 means unknown.
    pub size_mib: f64,
}

impl BenchmarkTarget {
    /// Settle the size of `spec` from a reported byte count.
    ///
    /// Falls back to the configured nominal size, then to a size implied by
    /// the name, then to 0.
    pub fn resolve(spec: &TargetSpec, reported_bytes: Option<u64>) -> Self {
        let size_mib = reported_bytes
            .filter(|&bytes| bytes > 0)
            .map(|bytes| bytes as f64 / BYTES_PER_MIB)
            .or_else(|| spec.nominal_mib.filter(|mib| mib.is_finite() && *mib >= 0.0))
            .or_else(|| nominal_mib_for(&spec.name))
            .unwrap_or(0.0);

        Self {
            name: spec.name.clone(),
            url: spec.url.clone(),
            size_mib,
        }
    }

    /// Probe the server for the size of `spec`, bounded by `timeout`.
    pub async fn discover<C: HttpClient>(spec: &TargetSpec, client: &C, timeout: Duration) -> Self {
        let reported = size_hint(client, &spec.url, timeout).await;
        let target = Self::resolve(spec, reported);
        debug!(
            name = %target.name,
            reported = reported.is_some(),
            size_mib = target.size_mib,
            "settled target size"
        );
        target
    }
}

/// Size implied by patterns such as `1GB` in a target name.
pub fn nominal_mib_for(name: &str) -> Option<f64> {
    NOMINAL_SIZES
        .iter()
        .find(|(pattern, _)| name.contains(pattern))
        .map(|(_, mib)| *mib)
}
