//! SpMV cache-trace simulation library.
//!
//! This crate estimates the cache-miss cost of sparse matrix-vector
//! multiplication (SpMV) kernels against a modeled memory hierarchy, without
//! ever executing the kernel itself:
//! 1. **Cache:** fully-associative replacement-policy state machines
//!    (RAND/FIFO/LRU) and the trace-driven cost functions that run a
//!    reference string through them.
//! 2. **Trace:** NUMA page-placement math and the cache-hierarchy walker
//!    (`active_threads`, per-cache estimation).
//! 3. **Matrix:** deterministic, format-specific memory-reference-string
//!    generators for COO, CSR, ELLPACK, and HYBRID SpMV layouts.
//! 4. **Config:** the trace-config (cache hierarchy + thread affinities)
//!    and its JSON deserialization.
//! 5. **Estimator/report:** orchestration that ties the above together into
//!    a `{cache_name -> [[misses; per NUMA domain]; per thread]}` report.

/// Shared error types (`ConfigError`, `MatrixError`, `IoError`, `SimError`).
pub mod common;
/// Trace configuration: cache hierarchy, NUMA domains, thread affinities.
pub mod config;
/// Cache replacement-policy engine and the `CircularBuffer` it is built on.
pub mod cache;
/// Sparse-matrix reference-string generators (COO, CSR, ELLPACK, HYBRID).
pub mod matrix;
/// Trace-driven cost functions, page-placement model, hierarchy walker.
pub mod trace;
/// Top-level estimator orchestrating config + matrix + trace into a report.
pub mod estimator;
/// JSON-serializable report types for the estimator's output.
pub mod report;

/// Top-level error type for all fallible operations in this crate.
pub use crate::common::error::SimError;
/// Trace configuration; load with `TraceConfig::from_json`.
pub use crate::config::TraceConfig;
/// Runs the full estimator over a config + matrix, producing a `Report`.
pub use crate::estimator::trace_cache_misses;
/// The estimator's top-level output type.
pub use crate::report::Report;
