//! HYBRID (ELLPACK + COO tail) reference-string generator (§4.5 "HYBRID").

use crate::common::error::MatrixError;
use crate::trace::Reference;

use super::csr::Csr;
use super::{Coo, Ellpack};

/// A HYBRID sparsity pattern: a regular ELLPACK part holding up to `r`
/// entries per row, plus a COO "overflow" tail for rows with more than `r`
/// nonzeros.
///
/// The reduction phase that would sum per-thread `y` partials from a
/// `workspace` is out of scope (§4.5: "the reduction phase ... is out of
/// the simulator's scope; only the SpMV-inner-loop reads/writes are
/// modeled").
#[derive(Debug, Clone)]
pub struct Hybrid {
    pub ellpack: Ellpack,
    pub coo: Coo,
}

impl Hybrid {
    #[must_use]
    pub fn rows(&self) -> u64 {
        self.ellpack.rows
    }

    #[must_use]
    pub fn cols(&self) -> u64 {
        self.ellpack.cols
    }

    /// Chooses HYBRID's ELLPACK row length `R`: the smallest `ℓ` such that
    /// at least 2/3 of rows have length `<= ℓ` (§4.5 "HYBRID"), via the
    /// histogram-based 2/3-median rule.
    #[must_use]
    pub fn median_row_length(csr: &Csr) -> u64 {
        if csr.rows == 0 {
            return 0;
        }

        let row_lengths: Vec<u64> =
            (0..csr.rows).map(|i| csr.row_ptr[i as usize + 1] - csr.row_ptr[i as usize]).collect();
        let max_row_length = row_lengths.iter().copied().max().unwrap_or(0);
        let mut num_rows_per_row_length = vec![0u64; max_row_length as usize + 1];
        for &len in &row_lengths {
            num_rows_per_row_length[len as usize] += 1;
        }

        let threshold = (2 * csr.rows) / 3;
        let mut median_row_length = 0u64;
        let mut num_rows_less_than_median = 0u64;
        while num_rows_less_than_median < threshold {
            num_rows_less_than_median += num_rows_per_row_length[median_row_length as usize];
            median_row_length += 1;
        }
        if median_row_length == 0 { 0 } else { median_row_length - 1 }
    }

    /// Splits a CSR pattern into a regular ELLPACK part (the first `r`
    /// columns of every row) plus a COO tail holding each row's overflow
    /// past `r` entries — the HYBRID format's usual construction (§4.5
    /// "HYBRID").
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::Overflow`] if `csr.rows * r` overflows `u64`.
    pub fn from_csr(csr: &Csr, r: u64) -> Result<Self, MatrixError> {
        let ellpack = Ellpack::from_csr(csr, Some(r), false)?;

        let mut coo_row_idx = Vec::new();
        let mut coo_col_idx = Vec::new();
        for i in 0..csr.rows {
            let start = csr.row_ptr[i as usize];
            let end = csr.row_ptr[i as usize + 1];
            if end - start > r {
                for k in (start + r)..end {
                    coo_row_idx.push(i);
                    coo_col_idx.push(csr.col_idx[k as usize]);
                }
            }
        }
        let coo = Coo::new(csr.rows, csr.cols, coo_row_idx, coo_col_idx)
            .expect("row_idx/col_idx built pairwise, same length by construction");

        Ok(Self { ellpack, coo })
    }

    /// Concatenates the ELLPACK part's reference string with the COO tail's
    /// (§4.5 "HYBRID"), both partitioned by the same `(thread, num_threads)`.
    #[must_use]
    pub fn reference_string(
        &self,
        thread: u64,
        num_threads: u64,
        page_size: u64,
        numa_tag_of_thread: &impl Fn(u64) -> u32,
    ) -> Vec<Reference> {
        let mut w = self.ellpack.reference_string(thread, num_threads, page_size, numa_tag_of_thread);
        w.extend(self.coo.reference_string(thread, num_threads, page_size, numa_tag_of_thread));
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Hybrid {
        let ellpack = Ellpack::new(2, 5, 2, vec![0, 1, 2, 3], false).unwrap();
        let coo = Coo::new(2, 5, vec![0, 1], vec![4, 0]).unwrap();
        Hybrid { ellpack, coo }
    }

    #[test]
    fn reference_string_concatenates_both_parts() {
        let h = sample();
        let ellpack_len = h.ellpack.reference_string(0, 1, 4096, &|_| 0).len();
        let coo_len = h.coo.reference_string(0, 1, 4096, &|_| 0).len();
        let combined = h.reference_string(0, 1, 4096, &|_| 0);
        assert_eq!(combined.len(), ellpack_len + coo_len);
    }

    #[test]
    fn from_csr_splits_overflow_into_coo_tail() {
        let csr = Csr::new(4, 5, vec![0, 2, 3, 4, 7], vec![0, 1, 1, 2, 0, 3, 4]).unwrap();
        let hybrid = Hybrid::from_csr(&csr, 2).unwrap();
        assert_eq!(hybrid.ellpack.r, 2);
        // Row 3 has 3 entries, 1 over the r=2 budget -> exactly one COO entry.
        assert_eq!(hybrid.coo.nnz(), 1);
        assert_eq!(hybrid.coo.row_idx[0], 3);
        assert_eq!(hybrid.coo.col_idx[0], 4);
    }

    #[test]
    fn median_row_length_uses_the_two_thirds_histogram_rule() {
        // Row lengths [2, 1, 1, 3]: with 4 rows the 2/3 threshold is 2, so
        // the smallest length covering it (lengths <= 1 cover 2 rows) wins.
        let csr = Csr::new(4, 5, vec![0, 2, 3, 4, 7], vec![0, 1, 1, 2, 0, 3, 4]).unwrap();
        assert_eq!(Hybrid::median_row_length(&csr), 1);
    }

    #[test]
    fn median_row_length_matches_the_smallest_row_when_most_rows_are_short() {
        // Row lengths [1, 1, 10]: 2/3 of 3 rows is 2, already covered by
        // length 1, so the average (4) would be badly wrong here.
        let csr = Csr::new(3, 11, vec![0, 1, 2, 12], vec![0; 12]).unwrap();
        assert_eq!(Hybrid::median_row_length(&csr), 1);
    }

    #[test]
    fn median_row_length_is_zero_for_an_empty_matrix() {
        let csr = Csr::new(0, 0, vec![0], vec![]).unwrap();
        assert_eq!(Hybrid::median_row_length(&csr), 0);
    }

    #[test]
    fn from_csr_with_median_row_length_surfaces_overflow() {
        let csr = Csr::new(2, 1, vec![0, 0, 0], vec![]).unwrap();
        let err = Hybrid::from_csr(&csr, 1u64 << 63).unwrap_err();
        assert!(matches!(err, MatrixError::Overflow { .. }));
    }
}
