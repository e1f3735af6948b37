//! Trace-driven cost functions (§4.3): single-stream and interleaved
//! (round-robin, shared-cache) replays of a reference string through a
//! [`crate::cache::Policy`].

use crate::cache::Policy;

use super::Reference;

/// Runs `w` through `policy`, tallying misses per NUMA domain.
///
/// Returns a length-`num_numa_domains` vector of miss counts.
#[must_use]
pub fn single_stream_cost(policy: &mut Policy, w: &[Reference], num_numa_domains: usize) -> Vec<u64> {
    let mut misses = vec![0u64; num_numa_domains];
    for &(addr, domain) in w {
        let miss = policy.allocate(addr, domain);
        if let Some(slot) = misses.get_mut(domain as usize) {
            *slot += miss;
        }
    }
    misses
}

/// Runs `P` reference strings through one shared `policy` in round-robin
/// order `(t=0,p=0),(t=0,p=1),...,(t=1,p=0),...` (§4.3, §5 "Ordering
/// guarantees").
///
/// Returns one length-`num_numa_domains` miss vector per stream, in the
/// same order as `streams`.
#[must_use]
pub fn interleaved_cost(
    policy: &mut Policy,
    streams: &[Vec<Reference>],
    num_numa_domains: usize,
) -> Vec<Vec<u64>> {
    let mut misses = vec![vec![0u64; num_numa_domains]; streams.len()];
    let max_len = streams.iter().map(Vec::len).max().unwrap_or(0);

    for t in 0..max_len {
        for (p, stream) in streams.iter().enumerate() {
            if let Some(&(addr, domain)) = stream.get(t) {
                let miss = policy.allocate(addr, domain);
                if let Some(slot) = misses[p].get_mut(domain as usize) {
                    *slot += miss;
                }
            }
        }
    }
    misses
}
