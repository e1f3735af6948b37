//! Common types shared across the simulation engine.
//!
//! Currently this is just the error hierarchy; address/tag arithmetic lives
//! next to the code that uses it (`trace::page`, `matrix::*`) rather than in
//! a shared strong-typed address module, since every address in this crate
//! is synthesized for tag purposes only (§9 "Address semantics").

/// Structured error types (`ConfigError`, `MatrixError`, `IoError`, `SimError`).
pub mod error;

pub use error::{ConfigError, IoError, MatrixError, SimError};
