//! Cache replacement policies: RAND, FIFO, LRU.
//!
//! Per §9 "Polymorphism over policies", these are tagged variants of a
//! single `Policy` enum rather than `dyn` trait objects — the simulation
//! call site knows its policy choice at construction time and dispatches
//! statically.

mod fifo;
mod lru;
mod rand;

pub use fifo::Fifo;
pub use lru::Lru;
pub use rand::Rand;

/// A cache-line tag: `address / line_size` (§3).
pub type Tag = u64;
/// A NUMA domain index (§3).
pub type NumaDomain = u32;
/// `0` for a hit, `1` for a miss — the return type of `Policy::allocate`.
pub type Miss = u64;

/// Which replacement algorithm to instantiate (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kind {
    /// Evict an implementation-defined but deterministic element on a full miss.
    Rand,
    /// Evict the oldest still-resident tag (insertion order).
    Fifo,
    /// Evict the least-recently-used tag.
    #[default]
    Lru,
}

/// A cache replacement-policy instance, statically dispatched over `Kind` (§9).
#[derive(Debug, Clone)]
pub enum Policy {
    /// See [`Rand`].
    Rand(Rand),
    /// See [`Fifo`].
    Fifo(Fifo),
    /// See [`Lru`].
    Lru(Lru),
}

impl Policy {
    /// Builds a fresh policy instance of `kind`, sized for `cache_lines`
    /// resident tags of `line_size` bytes each, optionally pre-warmed with
    /// `initial_state` tags (§4.2 "Constructors").
    #[must_use]
    pub fn new(kind: Kind, cache_lines: u64, line_size: u64, initial_state: &[Tag]) -> Self {
        match kind {
            Kind::Rand => Self::Rand(Rand::new(cache_lines, line_size, initial_state)),
            Kind::Fifo => Self::Fifo(Fifo::new(cache_lines, line_size, initial_state)),
            Kind::Lru => Self::Lru(Lru::new(cache_lines, line_size, initial_state)),
        }
    }

    /// Feeds one memory reference through the policy (§4.2 common contract).
    ///
    /// `addr` is reduced to a tag via `addr / line_size`; returns `1` on a
    /// miss and `0` on a hit. `numa` is not consulted by the policy itself —
    /// callers use it only to decide which counter to increment.
    pub fn allocate(&mut self, addr: u64, numa: NumaDomain) -> Miss {
        match self {
            Self::Rand(p) => p.allocate(addr, numa),
            Self::Fifo(p) => p.allocate(addr, numa),
            Self::Lru(p) => p.allocate(addr, numa),
        }
    }

    /// Number of tags currently resident.
    #[must_use]
    pub fn resident_len(&self) -> usize {
        match self {
            Self::Rand(p) => p.resident_len(),
            Self::Fifo(p) => p.resident_len(),
            Self::Lru(p) => p.resident_len(),
        }
    }
}
