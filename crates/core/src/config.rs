//! Trace configuration: cache hierarchy, NUMA domains, thread affinities.
//!
//! Mirrors the external trace-config JSON shape: a map of
//! named caches (each with a size, line size, and parent links), an ordered
//! list of NUMA domain names, and a list of per-thread affinities. Validation
//! happens once, at construction (`TraceConfig::new`/`from_json`), so every
//! later lookup (`active_threads`, NUMA tag resolution) can assume a
//! well-formed hierarchy.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;

/// Default values for optional trace-config fields.
mod defaults {
    /// Default name when a trace-config omits `"name"`.
    pub fn name() -> String {
        String::new()
    }

    /// Default description when a trace-config omits `"description"`.
    pub fn description() -> String {
        String::new()
    }

    /// Default event-group list for a thread affinity (none).
    pub fn event_groups() -> Vec<Vec<String>> {
        Vec::new()
    }
}

/// A single named cache in the hierarchy (§3 "Cache hierarchy").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cache {
    /// Total cache capacity in bytes.
    pub size: u64,
    /// Cache line size in bytes; `size` must be an exact multiple of this.
    pub line_size: u64,
    /// Names of this cache's immediate parents in the hierarchy DAG.
    #[serde(default, rename = "parent")]
    pub parents: Vec<String>,
}

impl Cache {
    /// Number of cache lines this cache holds, `ceil(size / line_size)`.
    #[must_use]
    pub const fn cache_lines(&self) -> u64 {
        self.size.div_ceil(self.line_size)
    }
}

/// A single thread's CPU pinning, cache affinity, and NUMA placement (§3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadAffinity {
    /// Logical thread id (also its position within the reference-string partition math).
    pub thread: usize,
    /// Pinned CPU id (informative; not used by the simulation core).
    pub cpu: usize,
    /// Name of the cache this thread is bound to (must be a key of `caches`).
    pub cache: String,
    /// Name of the NUMA domain this thread's own references are tagged with.
    pub numa_domain: String,
    /// Performance-counter event groups (informative; passed through to the report).
    #[serde(default = "defaults::event_groups")]
    pub event_groups: Vec<Vec<String>>,
}

/// The parsed, validated trace configuration (§4.6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceConfig {
    /// Human-readable configuration name, echoed into the report.
    #[serde(default = "defaults::name")]
    pub name: String,
    /// Human-readable configuration description, echoed into the report.
    #[serde(default = "defaults::description")]
    pub description: String,
    /// Named caches forming the hierarchy DAG.
    pub caches: BTreeMap<String, Cache>,
    /// Ordered NUMA domain names; a domain's position is its NUMA tag.
    pub numa_domains: Vec<String>,
    /// Per-thread CPU/cache/NUMA placement.
    pub thread_affinities: Vec<ThreadAffinity>,
}

impl TraceConfig {
    /// Parses and validates a trace-config from its JSON representation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedJson`] if `src` is not well-formed
    /// JSON, or any other [`ConfigError`] variant if the parsed config
    /// violates an invariant (see [`TraceConfig::validate`]).
    pub fn from_json(src: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(src)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the invariants in §3/§4.6: line-size divisibility, acyclic
    /// and fully-resolved parent links, and fully-resolved affinity caches
    /// and NUMA domains.
    ///
    /// # Errors
    ///
    /// Returns the first violated [`ConfigError`] encountered.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, cache) in &self.caches {
            if cache.line_size == 0 || cache.size % cache.line_size != 0 {
                return Err(ConfigError::NonMultipleLineSize {
                    name: name.clone(),
                    size: cache.size,
                    line_size: cache.line_size,
                });
            }
            for parent in &cache.parents {
                if !self.caches.contains_key(parent) {
                    return Err(ConfigError::UnknownCache {
                        cache: name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }

        for name in self.caches.keys() {
            let mut on_stack = std::collections::HashSet::new();
            self.check_acyclic(name, &mut on_stack)?;
        }

        for (i, affinity) in self.thread_affinities.iter().enumerate() {
            if !self.caches.contains_key(&affinity.cache) {
                return Err(ConfigError::InvalidAffinity {
                    thread: i,
                    cache: affinity.cache.clone(),
                });
            }
            if !self.numa_domains.iter().any(|d| d == &affinity.numa_domain) {
                return Err(ConfigError::UnknownNumaDomain {
                    thread: i,
                    domain: affinity.numa_domain.clone(),
                });
            }
        }

        Ok(())
    }

    /// DFS over the `parents` DAG starting at `name`, failing if `name` is
    /// reachable from itself (`on_stack` tracks the current path).
    fn check_acyclic(&self, name: &str, on_stack: &mut std::collections::HashSet<String>) -> Result<(), ConfigError> {
        if !on_stack.insert(name.to_string()) {
            return Err(ConfigError::CyclicHierarchy { cache: name.to_string() });
        }
        if let Some(cache) = self.caches.get(name) {
            for parent in &cache.parents {
                self.check_acyclic(parent, on_stack)?;
            }
        }
        on_stack.remove(name);
        Ok(())
    }

    /// Total number of threads described by this configuration.
    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.thread_affinities.len()
    }

    /// Number of NUMA domains described by this configuration.
    #[must_use]
    pub fn num_numa_domains(&self) -> usize {
        self.numa_domains.len()
    }

    /// Resolves a thread's NUMA domain name to its index (its NUMA tag).
    ///
    /// Panics only if `thread` is out of range or its domain name is not in
    /// `numa_domains`; both are already enforced by [`TraceConfig::validate`]
    /// for any config constructed via [`TraceConfig::from_json`].
    #[must_use]
    pub fn numa_tag_of_thread(&self, thread: usize) -> usize {
        let domain = &self.thread_affinities[thread].numa_domain;
        self.numa_domains
            .iter()
            .position(|d| d == domain)
            .unwrap_or(0)
    }
}
