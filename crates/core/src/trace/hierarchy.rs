//! Cache hierarchy ancestor relation and per-cache active-thread sets
//! (§4.6, §4.7).

use std::collections::HashSet;

use crate::config::TraceConfig;

/// True iff `ancestor` equals `cache`, or `cache` is reachable from
/// `ancestor` by following `parents` links (the reflexive-transitive
/// closure of the parent relation, §4.6).
///
/// `config` is assumed already validated: every `parent` name resolves to a
/// known cache (enforced by [`TraceConfig::validate`]), so this never needs
/// to report an unknown-name error itself.
#[must_use]
pub fn cache_has_ancestor(config: &TraceConfig, cache: &str, ancestor: &str) -> bool {
    if cache == ancestor {
        return true;
    }
    let Some(node) = config.caches.get(cache) else {
        return false;
    };
    node.parents
        .iter()
        .any(|parent| cache_has_ancestor(config, parent, ancestor))
}

/// The set of thread ids whose affinity cache has `cache` as an ancestor
/// (or equals it), in ascending order (§4.6).
#[must_use]
pub fn active_threads(config: &TraceConfig, cache: &str) -> Vec<usize> {
    let mut threads: Vec<usize> = config
        .thread_affinities
        .iter()
        .enumerate()
        .filter(|(_, affinity)| cache_has_ancestor(config, &affinity.cache, cache))
        .map(|(t, _)| t)
        .collect();
    threads.sort_unstable();
    threads
}

/// All cache names reachable from `affinity_cache` via `cache_has_ancestor`,
/// deduplicated. Exposed for diagnostics; the estimator itself only needs
/// [`active_threads`].
#[must_use]
pub fn ancestors_of(config: &TraceConfig, affinity_cache: &str) -> HashSet<String> {
    config
        .caches
        .keys()
        .filter(|name| cache_has_ancestor(config, affinity_cache, name))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_level_config() -> TraceConfig {
        let json = r#"{
            "caches": {
                "l1-0": { "size": 32768, "line_size": 64, "parent": ["l2"] },
                "l1-1": { "size": 32768, "line_size": 64, "parent": ["l2"] },
                "l2":   { "size": 262144, "line_size": 64, "parent": [] }
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
    fn cache_is_its_own_ancestor() {
        let config = two_level_config();
        assert!(cache_has_ancestor(&config, "l1-0", "l1-0"));
    }

    #[test]
    fn leaf_has_shared_parent_as_ancestor() {
        let config = two_level_config();
        assert!(cache_has_ancestor(&config, "l1-0", "l2"));
        assert!(cache_has_ancestor(&config, "l1-1", "l2"));
        assert!(!cache_has_ancestor(&config, "l2", "l1-0"));
    }

    #[test]
    fn active_threads_at_leaf_is_one_thread_each() {
        let config = two_level_config();
        assert_eq!(active_threads(&config, "l1-0"), vec![0]);
        assert_eq!(active_threads(&config, "l1-1"), vec![1]);
    }

    #[test]
    fn active_threads_at_shared_root_is_every_thread() {
        let config = two_level_config();
        assert_eq!(active_threads(&config, "l2"), vec![0, 1]);
    }

    #[test]
    fn active_threads_empty_for_disconnected_cache() {
        let mut config = two_level_config();
        config.caches.insert(
            "l3-orphan".to_string(),
            crate::config::Cache {
                size: 64,
                line_size: 64,
                parents: Vec::new(),
            },
        );
        assert!(active_threads(&config, "l3-orphan").is_empty());
    }
}
