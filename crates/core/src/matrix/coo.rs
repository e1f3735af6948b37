//! COO (coordinate) reference-string generator (§4.5 "COO"), also used for
//! the `source_vector_only` format.

use crate::common::error::MatrixError;
use crate::trace::Reference;

use super::{addr, owner_domain, COL_IDX_BASE, INDEX_ELEM_SIZE, ROW_IDX_BASE, VALUE_BASE, VALUE_ELEM_SIZE};

/// A COO sparsity pattern: parallel `row_idx`/`col_idx` arrays, one entry
/// per nonzero.
#[derive(Debug, Clone)]
pub struct Coo {
    pub rows: u64,
    pub cols: u64,
    pub row_idx: Vec<u64>,
    pub col_idx: Vec<u64>,
}

impl Coo {
    /// Builds a COO pattern, checking `row_idx` and `col_idx` have the same
    /// length.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::SizeMismatch`] if the two index arrays differ
    /// in length.
    pub fn new(rows: u64, cols: u64, row_idx: Vec<u64>, col_idx: Vec<u64>) -> Result<Self, MatrixError> {
        if row_idx.len() != col_idx.len() {
            return Err(MatrixError::SizeMismatch {
                rows: rows as usize,
                cols: cols as usize,
                len: col_idx.len(),
            });
        }
        Ok(Self { rows, cols, row_idx, col_idx })
    }

    /// Total nonzero count.
    #[must_use]
    pub fn nnz(&self) -> u64 {
        self.row_idx.len() as u64
    }

    /// Builds the reference string thread `thread` produces (§4.5 "COO"):
    /// for each entry `k` in this thread's `[t*nnz/P, (t+1)*nnz/P)` range,
    /// emit `row_idx[k]`, `col_idx[k]`, `value[k]` tagged with the thread's
    /// own domain, then `x[col_idx[k]]` and `y[row_idx[k]]` tagged with
    /// their owning thread's domain.
    #[must_use]
    pub fn reference_string(
        &self,
        thread: u64,
        num_threads: u64,
        page_size: u64,
        numa_tag_of_thread: &impl Fn(u64) -> u32,
    ) -> Vec<Reference> {
        let nnz = self.nnz();
        let per_thread = nnz.div_ceil(num_threads.max(1));
        let start = (thread * per_thread).min(nnz);
        let end = ((thread + 1) * per_thread).min(nnz);
        let my_domain = numa_tag_of_thread(thread);

        let mut w = Vec::with_capacity(5 * (end - start) as usize);
        for k in start..end {
            let i = self.row_idx[k as usize];
            let j = self.col_idx[k as usize];

            w.push((addr(ROW_IDX_BASE, INDEX_ELEM_SIZE, k), my_domain));
            w.push((addr(COL_IDX_BASE, INDEX_ELEM_SIZE, k), my_domain));
            w.push((addr(VALUE_BASE, VALUE_ELEM_SIZE, k), my_domain));

            let x_domain = owner_domain(self.cols, j, num_threads, page_size, numa_tag_of_thread);
            w.push((addr(super::X_BASE, VALUE_ELEM_SIZE, j), x_domain));

            let y_domain = owner_domain(self.rows, i, num_threads, page_size, numa_tag_of_thread);
            w.push((addr(super::Y_BASE, VALUE_ELEM_SIZE, i), y_domain));
        }
        w
    }
}
