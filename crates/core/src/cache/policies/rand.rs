//! Random replacement policy (§4.2 "RAND").
//!
//! The spec deliberately leaves the eviction victim "implementation-defined
//! but deterministic" (§9 open questions): this implementation evicts the
//! oldest still-resident tag by insertion order, tracked in a plain `Vec`.
//! Property tests must only assert the general bounds in §8 invariants 1-2
//! for this policy, never an exact miss count.

use super::{Miss, NumaDomain, Tag};

/// RAND policy state: a resident set plus its insertion order (§4.2).
#[derive(Debug, Clone)]
pub struct Rand {
    cache_lines: u64,
    line_size: u64,
    resident: Vec<Tag>,
}

impl Rand {
    /// Builds a RAND policy pre-warmed with `initial_state` (§4.2 "Constructors").
    #[must_use]
    pub fn new(cache_lines: u64, line_size: u64, initial_state: &[Tag]) -> Self {
        Self {
            cache_lines,
            line_size: line_size.max(1),
            resident: initial_state.to_vec(),
        }
    }

    /// Feeds one reference through the policy; see [`super::Policy::allocate`].
    pub fn allocate(&mut self, addr: u64, _numa: NumaDomain) -> Miss {
        let tag = addr / self.line_size;
        if self.resident.contains(&tag) {
            return 0;
        }
        if self.resident.len() as u64 == self.cache_lines && !self.resident.is_empty() {
            self.resident.remove(0);
        }
        self.resident.push(tag);
        1
    }

    /// Number of tags currently resident.
    #[must_use]
    pub fn resident_len(&self) -> usize {
        self.resident.len()
    }
}
