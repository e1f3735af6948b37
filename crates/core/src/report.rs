//! JSON-serializable output of [`crate::estimator::trace_cache_misses`]
//! (§6 "Output: JSON report").

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::TraceConfig;

/// Identifies which kernel generated a report, echoed alongside the miss
/// matrix so a report is self-describing without the original CLI
/// invocation (§6: "Emits ... the kernel description").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KernelDescription {
    /// The generator this kernel ran through (`coo`/`csr`/`ellpack`/`hybrid`).
    pub format: String,
    /// Number of rows (length of `y`).
    pub rows: u64,
    /// Number of columns (length of `x`).
    pub cols: u64,
}

/// The estimator's top-level output: the parsed trace-config, the kernel
/// description, and a per-cache miss matrix (§6 "Output: JSON report").
///
/// `cache_misses[cache_name][thread][numa_domain]` is the miss count thread
/// `thread` contributed to `numa_domain`'s counter while active on
/// `cache_name`; inactive threads hold an all-zero row. Thread ordering
/// matches the config's `thread_affinities`; NUMA-domain ordering matches
/// `numa_domains`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// The trace-config this report was produced against.
    pub config: TraceConfig,
    /// The kernel (format + dimensions) this report was produced against.
    pub kernel: KernelDescription,
    /// `{cache_name -> [[misses; per NUMA domain]; per thread]}`.
    pub cache_misses: BTreeMap<String, Vec<Vec<u64>>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> TraceConfig {
        TraceConfig::from_json(
            r#"{
                "name": "demo",
                "description": "two threads, two domains",
                "caches": { "l1": { "size": 64, "line_size": 64, "parent": [] } },
                "numa_domains": ["node0", "node1"],
                "thread_affinities": [
                    { "thread": 0, "cpu": 0, "cache": "l1", "numa_domain": "node0" },
                    { "thread": 1, "cpu": 1, "cache": "l1", "numa_domain": "node1" }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn round_trips_through_json() {
        let mut cache_misses = BTreeMap::new();
        cache_misses.insert("l1".to_string(), vec![vec![3, 0], vec![2, 4]]);
        let report = Report {
            config: sample_config(),
            kernel: KernelDescription { format: "csr".to_string(), rows: 4, cols: 5 },
            cache_misses,
        };

        let json = serde_json::to_string(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
