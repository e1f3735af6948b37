//! Integration tests exercising the full config → matrix → trace →
//! estimator pipeline (§4.7), across every storage format and a non-trivial
//! cache hierarchy.

use pretty_assertions::assert_eq;

use spmv_core::config::TraceConfig;
use spmv_core::estimator::{trace_cache_misses, DEFAULT_PAGE_SIZE};
use spmv_core::matrix::{Csr, Kernel, MatrixFormat};

fn s6_csr() -> Csr {
    Csr::new(4, 5, vec![0, 2, 3, 4, 7], vec![0, 1, 1, 2, 0, 3, 4]).unwrap()
}

fn two_level_config() -> TraceConfig {
    let json = r#"{
        "name": "two-level",
        "caches": {
            "l1-0": { "size": 4, "line_size": 1, "parent": ["l2"] },
            "l1-1": { "size": 4, "line_size": 1, "parent": ["l2"] },
            "l2":   { "size": 16, "line_size": 1, "parent": [] }
        },
        "numa_domains": ["node0", "node1"],
        "thread_affinities": [
            { "thread": 0, "cpu": 0, "cache": "l1-0", "numa_domain": "node0" },
            { "thread": 1, "cpu": 1, "cache": "l1-1", "numa_domain": "node1" }
        ]
    }"#;
    TraceConfig::from_json(json).unwrap()
}

#[test]
fn every_matrix_format_produces_a_report_for_every_cache() {
    let config = two_level_config();
    for format in MatrixFormat::ALL {
        let kernel = Kernel::build(format, s6_csr()).unwrap_or_else(|e| panic!("{format}: {e}"));
        let report = trace_cache_misses(&config, &kernel, DEFAULT_PAGE_SIZE)
            .unwrap_or_else(|e| panic!("{format}: {e}"));
        assert_eq!(report.cache_misses.len(), 3, "format {format} missing a cache entry");
        for matrix in report.cache_misses.values() {
            assert_eq!(matrix.len(), 2, "format {format}: expected one row per thread");
        }
    }
}

#[test]
fn shared_ancestor_cache_sees_both_threads_traffic() {
    let config = two_level_config();
    let kernel = Kernel::Csr(s6_csr());
    let report = trace_cache_misses(&config, &kernel, DEFAULT_PAGE_SIZE).unwrap();

    // l1-0/l1-1 are each only active for their own thread.
    assert_eq!(report.cache_misses["l1-0"][1], vec![0, 0]);
    assert_eq!(report.cache_misses["l1-1"][0], vec![0, 0]);

    // l2 is the shared ancestor: both threads must contribute traffic.
    let l2 = &report.cache_misses["l2"];
    assert!(l2[0].iter().sum::<u64>() > 0);
    assert!(l2[1].iter().sum::<u64>() > 0);
}

#[test]
fn report_echoes_trace_config_identity() {
    let config = two_level_config();
    let kernel = Kernel::Csr(s6_csr());
    let report = trace_cache_misses(&config, &kernel, DEFAULT_PAGE_SIZE).unwrap();
    assert_eq!(report.config.name, "two-level");
}
