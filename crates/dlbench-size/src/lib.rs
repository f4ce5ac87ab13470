//! Benchmark targets and their sizes.
//!
//! Throughput needs a size. The server is asked once per target with a
//! bounded HEAD request; when that fails for any reason the size falls back
//! to a nominal value, and lookup failures never reach the caller.

mod error;
mod http;
mod probe;
mod target;

pub use error::{Result, SizeError};
pub use http::HttpClient;
pub use probe::{DEFAULT_PROBE_TIMEOUT, content_length, size_hint};
pub use target::{
    BYTES_PER_MIB, BenchmarkTarget, DEFAULT_URL_1GB, DEFAULT_URL_5GB, TargetSpec, nominal_mib_for,
};

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
