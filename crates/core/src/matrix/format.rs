//! The matrix-format names recognized on the CLI (§6) and their mapping
//! down to the four reference-string generators this crate actually
//! implements.

use std::fmt;
use std::str::FromStr;

use crate::common::error::MatrixError;

/// A named SpMV storage-format variant (§6 "Matrix formats recognized").
///
/// The simulator treats every `csr_*` variant identically — the variant
/// tag only distinguishes execution strategies (unrolling, AVX width,
/// traffic shape) that are out of scope here. `SourceVectorOnly` is
/// COO-shaped and reuses the COO generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixFormat {
    Coo,
    Csr,
    CsrUnroll2,
    CsrUnroll2Avx128,
    CsrUnroll2Avx256,
    CsrUnroll4,
    CsrUnroll4Avx128,
    CsrUnroll4Avx256,
    CsrRegularTraffic,
    CsrIrregularTraffic,
    Ellpack,
    SourceVectorOnly,
    Hybrid,
}

/// The reference-string generator a [`MatrixFormat`] actually runs through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Coo,
    Csr,
    Ellpack,
    Hybrid,
}

impl MatrixFormat {
    /// All recognized format names, in the order `--list-matrix-formats`
    /// should print them.
    pub const ALL: [Self; 13] = [
        Self::Coo,
        Self::Csr,
        Self::CsrUnroll2,
        Self::CsrUnroll2Avx128,
        Self::CsrUnroll2Avx256,
        Self::CsrUnroll4,
        Self::CsrUnroll4Avx128,
        Self::CsrUnroll4Avx256,
        Self::CsrRegularTraffic,
        Self::CsrIrregularTraffic,
        Self::Ellpack,
        Self::SourceVectorOnly,
        Self::Hybrid,
    ];

    /// The generator this format variant reduces to (§6: "the simulator
    /// treats all `csr_*` variants identically"; `source_vector_only` is
    /// COO-shaped).
    #[must_use]
    pub const fn kind(self) -> Kind {
        match self {
            Self::Coo | Self::SourceVectorOnly => Kind::Coo,
            Self::Csr
            | Self::CsrUnroll2
            | Self::CsrUnroll2Avx128
            | Self::CsrUnroll2Avx256
            | Self::CsrUnroll4
            | Self::CsrUnroll4Avx128
            | Self::CsrUnroll4Avx256
            | Self::CsrRegularTraffic
            | Self::CsrIrregularTraffic => Kind::Csr,
            Self::Ellpack => Kind::Ellpack,
            Self::Hybrid => Kind::Hybrid,
        }
    }

    /// The canonical lowercase name, matching the CLI's `--matrix-format`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Coo => "coo",
            Self::Csr => "csr",
            Self::CsrUnroll2 => "csr_unroll2",
            Self::CsrUnroll2Avx128 => "csr_unroll2_avx128",
            Self::CsrUnroll2Avx256 => "csr_unroll2_avx256",
            Self::CsrUnroll4 => "csr_unroll4",
            Self::CsrUnroll4Avx128 => "csr_unroll4_avx128",
            Self::CsrUnroll4Avx256 => "csr_unroll4_avx256",
            Self::CsrRegularTraffic => "csr_regular_traffic",
            Self::CsrIrregularTraffic => "csr_irregular_traffic",
            Self::Ellpack => "ellpack",
            Self::SourceVectorOnly => "source_vector_only",
            Self::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for MatrixFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MatrixFormat {
    type Err = MatrixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| MatrixError::WrongFormat {
                expected: "one of the recognized matrix-format names",
                found: s.to_string(),
            })
    }
}
