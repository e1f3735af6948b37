//! ELLPACK reference-string generator (§4.5 "ELLPACK").

use crate::common::error::MatrixError;
use crate::trace::Reference;

use super::csr::Csr;
use super::{addr, owner_domain, COL_IDX_BASE, INDEX_ELEM_SIZE, VALUE_BASE, VALUE_ELEM_SIZE};

/// Column index recorded at a padding slot when `skip_padding` is set
/// (`std::numeric_limits<index_type>::max()` in the source), matching the
/// real kernel's sentinel check.
pub const PADDING_SENTINEL: u64 = u64::MAX;

/// An ELLPACK sparsity pattern: every row padded to the same width `r`.
#[derive(Debug, Clone)]
pub struct Ellpack {
    pub rows: u64,
    pub cols: u64,
    /// Row width; every row holds exactly `r` column-index/value slots.
    pub r: u64,
    /// `rows * r` entries, row-major. Padding slots carry either
    /// [`PADDING_SENTINEL`] or the row's last real column, per `skip_padding`.
    pub col_idx: Vec<u64>,
    /// When set, padding slots carry [`PADDING_SENTINEL`] and the real
    /// kernel branches out of its inner loop on the first one; when unset,
    /// padding slots repeat the row's last real column and the kernel scans
    /// every slot unconditionally (§4.5 "ELLPACK").
    pub skip_padding: bool,
}

impl Ellpack {
    /// Builds an ELLPACK pattern, checking `col_idx.len() == rows * r` and
    /// that `rows * r` does not overflow.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Overflow`] if `rows * r` overflows `u64`, or
    /// [`MatrixError::SizeMismatch`] if `col_idx` is the wrong length.
    pub fn new(rows: u64, cols: u64, r: u64, col_idx: Vec<u64>, skip_padding: bool) -> Result<Self, MatrixError> {
        let expected = rows
            .checked_mul(r)
            .ok_or(MatrixError::Overflow { context: "rows * R" })?;
        if col_idx.len() as u64 != expected {
            return Err(MatrixError::SizeMismatch {
                rows: rows as usize,
                cols: cols as usize,
                len: col_idx.len(),
            });
        }
        Ok(Self { rows, cols, r, col_idx, skip_padding })
    }

    /// Builds an ELLPACK pattern from a CSR one, padding every row to `r`
    /// columns (or to the widest row in `csr` if `r` is `None`). Padding
    /// slots carry [`PADDING_SENTINEL`] if `skip_padding`, otherwise the
    /// row's last real column (carried over from the previous row if the
    /// row has no real entries of its own, matching the source's global
    /// last-entry fallback). Rows wider than `r` are truncated here;
    /// callers that need the overflow preserved should build a
    /// [`super::Hybrid`] instead via [`super::Hybrid::from_csr`].
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Overflow`] if `csr.rows * r` overflows `u64`.
    pub fn from_csr(csr: &Csr, r: Option<u64>, skip_padding: bool) -> Result<Self, MatrixError> {
        let r = r.unwrap_or_else(|| {
            (0..csr.rows)
                .map(|i| csr.row_ptr[i as usize + 1] - csr.row_ptr[i as usize])
                .max()
                .unwrap_or(0)
        });

        let num_entries = csr
            .rows
            .checked_mul(r)
            .ok_or(MatrixError::Overflow { context: "rows * R" })?;

        let mut col_idx = vec![0u64; num_entries as usize];
        let mut last_valid_column = 0u64;
        for i in 0..csr.rows {
            let start = csr.row_ptr[i as usize];
            let end = csr.row_ptr[i as usize + 1];
            let width = (end - start).min(r);
            for l in 0..width {
                let column = csr.col_idx[(start + l) as usize];
                col_idx[(i * r + l) as usize] = column;
                last_valid_column = column;
            }
            for l in width..r {
                col_idx[(i * r + l) as usize] = if skip_padding { PADDING_SENTINEL } else { last_valid_column };
            }
        }

        Ok(Self { rows: csr.rows, cols: csr.cols, r, col_idx, skip_padding })
    }

    /// Builds the reference string thread `thread` produces (§4.5
    /// "ELLPACK"): for each row `i` in range and each `l in [0, r)`, emit
    /// `col_idx[k]`, `value[k]`, `x[col_idx[k]]` (`k = i*r + l`), then a
    /// trailing `y[i]` after the row. Under `skip_padding`, the first
    /// [`PADDING_SENTINEL`] slot in a row only emits its `col_idx[k]` read
    /// (the sentinel check) and breaks out of the row, matching the real
    /// kernel's early exit; otherwise every slot is emitted in full.
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
        for i in start_row..end_row {
            for l in 0..self.r {
                let k = i * self.r + l;
                let j = self.col_idx[k as usize];
                w.push((addr(COL_IDX_BASE, INDEX_ELEM_SIZE, k), my_domain));
                if self.skip_padding && j == PADDING_SENTINEL {
                    break;
                }
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

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Ellpack {
        // 4 rows, width 2: row widths padded from [2,1,1,3] to r=3.
        Ellpack::new(4, 5, 3, vec![0, 1, 0, 1, 0, 0, 2, 0, 0, 0, 3, 4], false).unwrap()
    }

    #[test]
    fn reference_string_length_matches_closed_form() {
        let m = sample();
        let w = m.reference_string(0, 1, 4096, &|_| 0);
        // local_rows * (3*r + 1) = 4 * (3*3 + 1) = 40
        assert_eq!(w.len(), 40);
    }

    #[test]
    fn rejects_mismatched_col_idx_length() {
        let err = Ellpack::new(4, 5, 3, vec![0, 1], false).unwrap_err();
        assert!(matches!(err, MatrixError::SizeMismatch { .. }));
    }

    #[test]
    fn rejects_overflowing_dimensions() {
        let err = Ellpack::new(u64::MAX, 5, 2, vec![], false).unwrap_err();
        assert!(matches!(err, MatrixError::Overflow { .. }));
    }

    #[test]
    fn from_csr_pads_every_row_to_widest_row() {
        let csr = Csr::new(4, 5, vec![0, 2, 3, 4, 7], vec![0, 1, 1, 2, 0, 3, 4]).unwrap();
        let ellpack = Ellpack::from_csr(&csr, None, false).unwrap();
        assert_eq!(ellpack.r, 3);
        assert_eq!(ellpack.col_idx.len(), 12);
        // Row 0 has 2 entries [0,1], padded by repeating the last real column.
        assert_eq!(&ellpack.col_idx[0..3], &[0, 1, 1]);
    }

    #[test]
    fn from_csr_overflow_surfaces_as_matrix_error() {
        let csr = Csr::new(2, 1, vec![0, 0, 0], vec![]).unwrap();
        let err = Ellpack::from_csr(&csr, Some(1u64 << 63), false).unwrap_err();
        assert!(matches!(err, MatrixError::Overflow { .. }));
    }

    #[test]
    fn skip_padding_uses_the_sentinel_column() {
        let csr = Csr::new(4, 5, vec![0, 2, 3, 4, 7], vec![0, 1, 1, 2, 0, 3, 4]).unwrap();
        let ellpack = Ellpack::from_csr(&csr, None, true).unwrap();
        // Row 0 has 2 real entries, one padding slot carrying the sentinel.
        assert_eq!(&ellpack.col_idx[0..3], &[0, 1, PADDING_SENTINEL]);
    }

    #[test]
    fn skip_padding_reference_string_stops_at_the_first_sentinel() {
        let csr = Csr::new(4, 5, vec![0, 2, 3, 4, 7], vec![0, 1, 1, 2, 0, 3, 4]).unwrap();
        let ellpack = Ellpack::from_csr(&csr, None, true).unwrap();
        let w = ellpack.reference_string(0, 1, 4096, &|_| 0);
        // Row 0 (2 real entries, r=3): 2*3 refs for real slots + 1 col_idx
        // read for the sentinel slot + 1 y write = 8.
        // Row 1 (1 real entry): 1*3 + 1 (sentinel col_idx) + 1 (y) = 5.
        // Row 2 (1 real entry): same as row 1 = 5.
        // Row 3 (3 real entries, no padding): 3*3 + 1 (y) = 10.
        assert_eq!(w.len(), 8 + 5 + 5 + 10);
    }
}
