//! Table-driven replay of the concrete end-to-end scenarios from §8
//! (S1–S6), using `rstest` so every row gets its own named test and a
//! `pretty_assertions` diff on failure.

use pretty_assertions::assert_eq;
use rstest::rstest;

use spmv_core::cache::policies::Kind;
use spmv_core::cache::Policy;
use spmv_core::matrix::Csr;
use spmv_core::trace::{interleaved_cost, single_stream_cost};

fn cost(kind: Kind, cache_lines: u64, initial: &[u64], input: &[u64]) -> u64 {
    let mut policy = Policy::new(kind, cache_lines, 1, initial);
    let w: Vec<(u64, u32)> = input.iter().map(|&t| (t, 0)).collect();
    single_stream_cost(&mut policy, &w, 1).into_iter().sum()
}

#[rstest]
#[case::s1_lru_basic(Kind::Lru, 4, &[0, 1, 2][..], &[0, 1, 2, 3, 0, 1, 2, 3][..], 1)]
#[case::s2_lru_replacement(Kind::Lru, 4, &[][..], &[0, 1, 0, 2, 0, 3, 0, 4, 0][..], 5)]
#[case::s3_fifo_vs_lru_fifo(Kind::Fifo, 4, &[][..], &[0, 1, 0, 2, 0, 3, 0, 4, 0][..], 6)]
#[case::s3_fifo_vs_lru_lru(Kind::Lru, 4, &[][..], &[0, 1, 0, 2, 0, 3, 0, 4, 0][..], 5)]
fn scenario_matches_expected_cost(
    #[case] kind: Kind,
    #[case] cache_lines: u64,
    #[case] initial: &[u64],
    #[case] input: &[u64],
    #[case] expected: u64,
) {
    assert_eq!(cost(kind, cache_lines, initial, input), expected);
}

#[test]
fn s4_interleaved_shared_cache() {
    let mut policy = Policy::new(Kind::Lru, 4, 1, &[0, 1, 2]);
    let streams: Vec<Vec<(u64, u32)>> = vec![
        [0, 1, 2, 3, 2, 7, 2, 3].into_iter().map(|t| (t, 0)).collect(),
        [4, 5, 6, 7, 6, 5, 6, 7].into_iter().map(|t| (t, 0)).collect(),
    ];
    let misses = interleaved_cost(&mut policy, &streams, 1);
    let totals: Vec<u64> = misses.iter().map(|m| m[0]).collect();
    assert_eq!(totals, vec![3, 6]);
}

#[test]
fn s5_numa_tagging() {
    let mut policy = Policy::new(Kind::Lru, 4, 1, &[0, 1, 2]);
    let streams: Vec<Vec<(u64, u32)>> = vec![
        vec![(0, 0), (1, 0), (2, 0), (3, 0), (2, 0), (7, 1), (2, 0), (3, 0)],
        vec![(4, 0), (5, 1), (6, 1), (7, 1), (6, 0), (5, 0), (6, 0), (7, 1)],
    ];
    let misses = interleaved_cost(&mut policy, &streams, 2);
    assert_eq!(misses, vec![vec![3, 0], vec![2, 4]]);
}

#[test]
fn s6_csr_reference_string_length_and_tags() {
    let csr = Csr::new(4, 5, vec![0, 2, 3, 4, 7], vec![0, 1, 1, 2, 0, 3, 4]).unwrap();
    let w = csr.reference_string(0, 1, 4096, &|_| 0);
    assert_eq!(w.len(), 1 + 3 * 7 + 2 * 4);
    let line_size = 1u64;
    for (addr, _domain) in w {
        assert_eq!(addr / line_size, addr);
    }
}
