//! CSR (compressed sparse row) reference-string generator (§4.5 "CSR").

use crate::common::error::MatrixError;
use crate::trace::Reference;

use super::{addr, owner_domain, COL_IDX_BASE, INDEX_ELEM_SIZE, ROW_PTR_BASE, VALUE_BASE, VALUE_ELEM_SIZE};

/// A CSR sparsity pattern: `rows+1` row-pointer entries bracketing `nnz`
/// column indices.
#[derive(Debug, Clone)]
pub struct Csr {
    pub rows: u64,
    pub cols: u64,
    /// `rows + 1` entries; `row_ptr[i]..row_ptr[i+1]` bounds row `i`'s nonzeros.
    pub row_ptr: Vec<u64>,
    /// `row_ptr[rows]` entries; column index of each nonzero, in row order.
    pub col_idx: Vec<u64>,
}

impl Csr {
    /// Builds a CSR pattern, checking `row_ptr`/`col_idx` are consistently
    /// sized.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::SizeMismatch`] if `row_ptr.len() != rows + 1`
    /// or `col_idx.len()` does not equal the nonzero count `row_ptr` implies.
    pub fn new(rows: u64, cols: u64, row_ptr: Vec<u64>, col_idx: Vec<u64>) -> Result<Self, MatrixError> {
        if row_ptr.len() as u64 != rows + 1 {
            return Err(MatrixError::SizeMismatch {
                rows: rows as usize,
                cols: cols as usize,
                len: row_ptr.len(),
            });
        }
        let nnz = row_ptr.last().copied().unwrap_or(0);
        if col_idx.len() as u64 != nnz {
            return Err(MatrixError::SizeMismatch {
                rows: rows as usize,
                cols: cols as usize,
                len: col_idx.len(),
            });
        }
        Ok(Self { rows, cols, row_ptr, col_idx })
    }

    /// Total nonzero count, `row_ptr[rows]`.
    #[must_use]
    pub fn nnz(&self) -> u64 {
        self.row_ptr.last().copied().unwrap_or(0)
    }

    /// Builds a CSR pattern from COO triplets via a counting sort on row
    /// index, the same factory shape as the source's
    /// `csr_matrix::from_matrix_market` (grounded on `matrix/csr-matrix.hpp`).
    #[must_use]
    pub fn from_coo(rows: u64, cols: u64, row_idx: &[u64], col_idx: &[u64]) -> Self {
        let mut counts = vec![0u64; rows as usize + 1];
        for &i in row_idx {
            counts[i as usize + 1] += 1;
        }
        for i in 0..rows as usize {
            counts[i + 1] += counts[i];
        }
        let row_ptr = counts.clone();

        let mut cursor = counts;
        let mut sorted_col_idx = vec![0u64; col_idx.len()];
        for (&i, &j) in row_idx.iter().zip(col_idx) {
            let slot = &mut cursor[i as usize];
            sorted_col_idx[*slot as usize] = j;
            *slot += 1;
        }

        Self { rows, cols, row_ptr, col_idx: sorted_col_idx }
    }

    /// Builds the reference string thread `thread` produces (§4.5 "CSR"):
    /// a prefix read of `row_ptr[start_row]`, then per row `i` in range a
    /// read of `row_ptr[i+1]`, three reads per nonzero (`col_idx`, `value`,
    /// `x[col_idx[k]]`), and a trailing `y[i]` write. Length is exactly
    /// `1 + 3*local_nnz + 2*local_rows` (§8 invariant 6, scenario S6).
    #[must_use]
    pub fn reference_string(
        &self,
        thread: u64,
        num_threads: u64,
        page_size: u64,
        numa_tag_of_thread: &impl Fn(u64) -> u32,
    ) -> Vec<Reference> {
        let rows_per_thread = self.rows.div_ceil(num_threads.max(1));
        let start_row = (thread * rows_per_thread).min(self.rows);
        let end_row = ((thread + 1) * rows_per_thread).min(self.rows);
        let my_domain = numa_tag_of_thread(thread);

        let mut w = Vec::new();
        w.push((addr(ROW_PTR_BASE, INDEX_ELEM_SIZE, start_row), my_domain));

        for i in start_row..end_row {
            w.push((addr(ROW_PTR_BASE, INDEX_ELEM_SIZE, i + 1), my_domain));

            let k0 = self.row_ptr[i as usize];
            let k1 = self.row_ptr[i as usize + 1];
            for k in k0..k1 {
                let j = self.col_idx[k as usize];
                w.push((addr(COL_IDX_BASE, INDEX_ELEM_SIZE, k), my_domain));
                w.push((addr(VALUE_BASE, VALUE_ELEM_SIZE, k), my_domain));
                let domain = owner_domain(self.cols, j, num_threads, page_size, numa_tag_of_thread);
                w.push((addr(super::X_BASE, VALUE_ELEM_SIZE, j), domain));
            }

            let domain = owner_domain(self.rows, i, num_threads, page_size, numa_tag_of_thread);
            w.push((addr(super::Y_BASE, VALUE_ELEM_SIZE, i), domain));
        }

        w
    }
}
