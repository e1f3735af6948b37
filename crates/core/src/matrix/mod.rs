//! Deterministic memory-reference-string generators for SpMV storage
//! formats (§4.5).
//!
//! Each generator only needs the *sparsity pattern* (dimensions and index
//! arrays) to produce a reference string — the numeric values themselves
//! never affect which addresses are touched, so no generator stores or
//! reads a `value_type` payload. Every array gets its own disjoint address
//! range (see the `*_BASE` constants) so that tags derived from different
//! arrays never alias by accident.

mod coo;
mod csr;
mod ellpack;
mod format;
mod hybrid;

pub use coo::Coo;
pub use csr::Csr;
pub use ellpack::Ellpack;
pub use format::{Kind as FormatKind, MatrixFormat};
pub use hybrid::Hybrid;

use crate::common::error::MatrixError;
use crate::trace::{thread_of_index, Reference};

/// Byte size of an index element (`int` in the source, §9 "Address semantics").
pub const INDEX_ELEM_SIZE: u64 = 4;
/// Byte size of a value element (`double` in the source).
pub const VALUE_ELEM_SIZE: u64 = 8;

const ROW_PTR_BASE: u64 = 0;
const ROW_IDX_BASE: u64 = 1 << 40;
const COL_IDX_BASE: u64 = 2 << 40;
const VALUE_BASE: u64 = 3 << 40;
const X_BASE: u64 = 4 << 40;
const Y_BASE: u64 = 5 << 40;

/// Synthesizes `addr = base + index * elem_size` for one array's element
/// (§9 "Address semantics": a stable base index per operand array).
const fn addr(base: u64, elem_size: u64, index: u64) -> u64 {
    base + index * elem_size
}

/// Resolves the owning thread of element `index` of an `n`-element array
/// under the page-placement model (§4.4), then looks up that thread's NUMA
/// tag. This is the "any read of an array first-touched by `owner(element)`
/// takes `numa[owner(element)]`" rule (§4.5).
fn owner_domain(
    n: u64,
    index: u64,
    num_threads: u64,
    page_size: u64,
    numa_tag_of_thread: &impl Fn(u64) -> u32,
) -> u32 {
    let owner = thread_of_index(0, n, index, num_threads, page_size, VALUE_ELEM_SIZE);
    numa_tag_of_thread(owner)
}

/// A kernel's format-specific sparsity pattern, dispatched to its
/// reference-string generator (§4.5, §9 "Polymorphism over policies" —
/// the same tagged-enum treatment applies here as to replacement policies).
#[derive(Debug, Clone)]
pub enum Kernel {
    Coo(Coo),
    Csr(Csr),
    Ellpack(Ellpack),
    Hybrid(Hybrid),
}

impl Kernel {
    /// Number of rows (and hence the length of `y`).
    #[must_use]
    pub fn rows(&self) -> u64 {
        match self {
            Self::Coo(m) => m.rows,
            Self::Csr(m) => m.rows,
            Self::Ellpack(m) => m.rows,
            Self::Hybrid(m) => m.rows(),
        }
    }

    /// Number of columns (and hence the length of `x`).
    #[must_use]
    pub fn cols(&self) -> u64 {
        match self {
            Self::Coo(m) => m.cols,
            Self::Csr(m) => m.cols,
            Self::Ellpack(m) => m.cols,
            Self::Hybrid(m) => m.cols(),
        }
    }

    /// Builds the reference string thread `thread` (of `num_threads`) would
    /// produce for this kernel (§4.5). `numa_tag_of_thread` maps a thread id
    /// to its NUMA domain index.
    #[must_use]
    pub fn reference_string(
        &self,
        thread: u64,
        num_threads: u64,
        page_size: u64,
        numa_tag_of_thread: &impl Fn(u64) -> u32,
    ) -> Vec<Reference> {
        match self {
            Self::Coo(m) => m.reference_string(thread, num_threads, page_size, numa_tag_of_thread),
            Self::Csr(m) => m.reference_string(thread, num_threads, page_size, numa_tag_of_thread),
            Self::Ellpack(m) => m.reference_string(thread, num_threads, page_size, numa_tag_of_thread),
            Self::Hybrid(m) => m.reference_string(thread, num_threads, page_size, numa_tag_of_thread),
        }
    }

    /// The generic format this kernel runs through (`coo`/`csr`/`ellpack`/
    /// `hybrid`), for the report's kernel description (§6).
    #[must_use]
    pub const fn format_name(&self) -> &'static str {
        match self {
            Self::Coo(_) => "coo",
            Self::Csr(_) => "csr",
            Self::Ellpack(_) => "ellpack",
            Self::Hybrid(_) => "hybrid",
        }
    }

    /// Builds the kernel a [`MatrixFormat`] asks for from a CSR sparsity
    /// pattern (the shape every reader converts to first, see
    /// `crates/cli/src/matrix_market.rs`). `COO`-shaped formats are expanded
    /// back out of `csr`; `ELLPACK` pads every row to its widest; `HYBRID`
    /// chooses its ELLPACK row length via the 2/3-histogram-median rule
    /// (§4.5 "HYBRID").
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Overflow`] if the target format's dimension
    /// arithmetic (`rows * R`) overflows `u64`.
    pub fn build(format: MatrixFormat, csr: Csr) -> Result<Self, MatrixError> {
        Ok(match format.kind() {
            FormatKind::Coo => {
                let nnz = csr.nnz() as usize;
                let mut row_idx = Vec::with_capacity(nnz);
                let mut col_idx = Vec::with_capacity(nnz);
                for i in 0..csr.rows {
                    for k in csr.row_ptr[i as usize]..csr.row_ptr[i as usize + 1] {
                        row_idx.push(i);
                        col_idx.push(csr.col_idx[k as usize]);
                    }
                }
                Self::Coo(Coo::new(csr.rows, csr.cols, row_idx, col_idx).expect("built pairwise, same length by construction"))
            }
            FormatKind::Csr => Self::Csr(csr),
            FormatKind::Ellpack => Self::Ellpack(Ellpack::from_csr(&csr, None, false)?),
            FormatKind::Hybrid => {
                let r = Hybrid::median_row_length(&csr);
                Self::Hybrid(Hybrid::from_csr(&csr, r)?)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s6_csr() -> Csr {
        Csr::new(4, 5, vec![0, 2, 3, 4, 7], vec![0, 1, 1, 2, 0, 3, 4]).unwrap()
    }

    #[test]
    fn build_csr_passes_through_unchanged() {
        let kernel = Kernel::build(MatrixFormat::Csr, s6_csr()).unwrap();
        assert_eq!(kernel.rows(), 4);
        assert_eq!(kernel.cols(), 5);
    }

    #[test]
    fn build_coo_round_trips_nnz_count() {
        let csr = s6_csr();
        let nnz = csr.nnz();
        let kernel = Kernel::build(MatrixFormat::Coo, csr).unwrap();
        let Kernel::Coo(coo) = kernel else { panic!("expected Coo") };
        assert_eq!(coo.nnz(), nnz);
    }

    #[test]
    fn build_ellpack_pads_to_widest_row() {
        let kernel = Kernel::build(MatrixFormat::Ellpack, s6_csr()).unwrap();
        let Kernel::Ellpack(ellpack) = kernel else { panic!("expected Ellpack") };
        assert_eq!(ellpack.r, 3);
    }

    #[test]
    fn build_hybrid_uses_the_two_thirds_median_row_length() {
        let kernel = Kernel::build(MatrixFormat::Hybrid, s6_csr()).unwrap();
        let Kernel::Hybrid(hybrid) = kernel else { panic!("expected Hybrid") };
        assert_eq!(hybrid.ellpack.r, 1);
    }
}
