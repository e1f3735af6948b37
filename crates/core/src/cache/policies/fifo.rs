//! First-In-First-Out replacement policy (§4.2 "FIFO").
//!
//! Membership is checked by set lookup only (§9: the source's tag-ordered
//! `find`-then-equality check is redundant once a proper set is used), and
//! eviction order follows a separate insertion-ordered queue.

use std::collections::VecDeque;

use super::{Miss, NumaDomain, Tag};

/// FIFO policy state: a resident set plus an insertion-ordered queue (§4.2).
#[derive(Debug, Clone)]
pub struct Fifo {
    cache_lines: u64,
    line_size: u64,
    resident: Vec<Tag>,
    queue: VecDeque<Tag>,
}

impl Fifo {
    /// Builds a FIFO policy pre-warmed with `initial_state`; initial
    /// insertion order equals the provided order (§4.2 "Constructors").
    #[must_use]
    pub fn new(cache_lines: u64, line_size: u64, initial_state: &[Tag]) -> Self {
        Self {
            cache_lines,
            line_size: line_size.max(1),
            resident: initial_state.to_vec(),
            queue: initial_state.iter().copied().collect(),
        }
    }

    /// Feeds one reference through the policy; see [`super::Policy::allocate`].
    pub fn allocate(&mut self, addr: u64, _numa: NumaDomain) -> Miss {
        let tag = addr / self.line_size;
        if self.resident.contains(&tag) {
            return 0;
        }
        if self.resident.len() as u64 == self.cache_lines {
            if let Some(victim) = self.queue.pop_front() {
                if let Some(pos) = self.resident.iter().position(|&t| t == victim) {
                    self.resident.remove(pos);
                }
            }
        }
        self.resident.push(tag);
        self.queue.push_back(tag);
        1
    }

    /// Number of tags currently resident.
    #[must_use]
    pub fn resident_len(&self) -> usize {
        self.resident.len()
    }
}
