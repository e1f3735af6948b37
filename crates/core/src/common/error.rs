//! Error types for configuration, matrix, and I/O failures.
//!
//! Each kind is its own `thiserror::Error` enum so callers can match on the
//! specific failure mode; `SimError` aggregates them for code that just
//! wants to propagate with `?` up to the CLI boundary.

use thiserror::Error;

/// Failures validating or parsing a trace-config (§4.6, §7).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A thread affinity names a cache that is not defined in `caches`.
    #[error("Invalid thread affinity for thread {thread}: \"{cache}\" is not a known cache")]
    InvalidAffinity {
        /// Index of the offending thread affinity entry.
        thread: usize,
        /// The unknown cache name it referenced.
        cache: String,
    },

    /// A cache's `parents` list names a cache that is not defined in `caches`.
    #[error("{cache}: parent \"{parent}\" is not a known cache")]
    UnknownCache {
        /// The cache whose parent list is invalid.
        cache: String,
        /// The unknown parent name.
        parent: String,
    },

    /// A thread affinity names a NUMA domain that is not in `numa_domains`.
    #[error("Thread {thread}: \"{domain}\" is not a known NUMA domain")]
    UnknownNumaDomain {
        /// Index of the offending thread affinity entry.
        thread: usize,
        /// The unknown NUMA domain name.
        domain: String,
    },

    /// A cache's `size` is not an exact multiple of its `line_size`.
    #[error("{name}: Expected size ({size}) to be a multiple of line_size ({line_size})")]
    NonMultipleLineSize {
        /// The offending cache's name.
        name: String,
        /// The cache's configured size in bytes.
        size: u64,
        /// The cache's configured line size in bytes.
        line_size: u64,
    },

    /// A cache's `parents` links form a cycle.
    #[error("cache hierarchy has a cycle through \"{cache}\"")]
    CyclicHierarchy {
        /// A cache name on the cycle.
        cache: String,
    },

    /// The config source was not well-formed JSON.
    #[error("malformed trace-config JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}

/// Failures converting or generating reference strings for a matrix (§4.5, §7).
#[derive(Debug, Error)]
pub enum MatrixError {
    /// The input was not in the expected sparse format (e.g. not `coordinate`).
    #[error("wrong matrix format: expected {expected}, found {found}")]
    WrongFormat {
        /// The format the caller required.
        expected: &'static str,
        /// The format actually present.
        found: String,
    },

    /// The vectors passed to an SpMV helper do not match the matrix's dimensions.
    #[error("size mismatch: matrix is {rows}x{cols}, operand has length {len}")]
    SizeMismatch {
        /// Matrix row count.
        rows: usize,
        /// Matrix column count.
        cols: usize,
        /// Length of the mismatched operand.
        len: usize,
    },

    /// An index-space computation (`rows * num_threads`, `rows * R`, ...) overflowed.
    #[error("overflow computing {context}")]
    Overflow {
        /// What was being computed when the overflow occurred.
        context: &'static str,
    },
}

/// Failures reading external input (trace-config files, Matrix Market archives).
#[derive(Debug, Error)]
pub enum IoError {
    /// The underlying file could not be opened or read.
    #[error("{path}: {source}")]
    Read {
        /// Path of the file that failed to read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An archive (gzip/tar) was truncated or otherwise malformed.
    #[error("{path}: truncated or malformed archive: {reason}")]
    TruncatedArchive {
        /// Path of the offending archive.
        path: String,
        /// Human-readable description of the malformation.
        reason: String,
    },
}

/// Top-level error type all fallible public operations converge on.
#[derive(Debug, Error)]
pub enum SimError {
    /// A configuration error (§4.6).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A matrix or reference-string-generation error (§4.5, §4.7).
    #[error(transparent)]
    Matrix(#[from] MatrixError),

    /// An I/O error reading an external input.
    #[error(transparent)]
    Io(#[from] IoError),
}
