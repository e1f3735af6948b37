//! Top-level estimator: ties configuration, matrix, and trace together into
//! a per-cache, per-thread, per-domain miss report (§4.7).

use crate::cache::policies::Kind;
use crate::cache::Policy;
use crate::common::error::SimError;
use crate::config::TraceConfig;
use crate::matrix::Kernel;
use crate::report::{KernelDescription, Report};
use crate::trace::{active_threads, interleaved_cost};

/// Default system page size (bytes) used for NUMA page-placement math when
/// the caller does not override it (§4.4 is silent on a default; 4 KiB is
/// the common case this crate targets).
pub const DEFAULT_PAGE_SIZE: u64 = 4096;

/// Runs the full estimator described in §4.7 over `config` and `kernel`,
/// producing a `{cache_name -> [[misses; per NUMA domain]; per thread]}`
/// report.
///
/// For each cache: computes its active thread set, builds each active
/// thread's reference string (using the *full* thread count for the
/// partitioning math, so inactive threads still count in the denominator),
/// instantiates a fresh LRU sized to the cache, and runs the interleaved
/// cost function over the active threads' reference strings. Results are
/// scattered into a full `[num_threads][num_numa_domains]` matrix with
/// zeros for inactive threads.
///
/// # Errors
///
/// Propagates any [`SimError`] surfaced while building reference strings
/// (matrix-format overflow, malformed sparsity patterns).
pub fn trace_cache_misses(config: &TraceConfig, kernel: &Kernel, page_size: u64) -> Result<Report, SimError> {
    let num_threads = config.num_threads() as u64;
    let num_numa_domains = config.num_numa_domains();
    let numa_tag_of_thread =
        |t: u64| config.numa_tag_of_thread(t as usize) as u32;

    let mut cache_misses = std::collections::BTreeMap::new();

    for (cache_name, cache) in &config.caches {
        let threads = active_threads(config, cache_name);
        log::debug!("cache {cache_name}: {} active thread(s)", threads.len());
        if threads.is_empty() {
            log::warn!("cache {cache_name} has no active thread affinities; it will report all zeros");
        }

        let streams: Vec<Vec<_>> = threads
            .iter()
            .map(|&t| {
                log::trace!("cache {cache_name}: building reference string for thread {t}");
                kernel.reference_string(t as u64, num_threads, page_size, &numa_tag_of_thread)
            })
            .collect();

        let mut policy = Policy::new(Kind::Lru, cache.cache_lines(), cache.line_size, &[]);
        let per_active_thread = interleaved_cost(&mut policy, &streams, num_numa_domains);

        let mut matrix = vec![vec![0u64; num_numa_domains]; num_threads as usize];
        for (&thread, misses) in threads.iter().zip(per_active_thread) {
            matrix[thread] = misses;
        }

        cache_misses.insert(cache_name.clone(), matrix);
    }

    Ok(Report {
        config: config.clone(),
        kernel: KernelDescription {
            format: kernel.format_name().to_string(),
            rows: kernel.rows(),
            cols: kernel.cols(),
        },
        cache_misses,
    })
}
