//! SpMV cache-trace CLI.
//!
//! Reads a Matrix Market file, builds a kernel in the requested storage
//! format, loads a trace-config (from `--config PATH`, or synthesized from
//! the `--cache-*`/`--threads` flags), and prints the resulting miss report
//! as JSON (§6).

mod matrix_market;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use spmv_core::config::{Cache, ThreadAffinity, TraceConfig};
use spmv_core::estimator::{trace_cache_misses, DEFAULT_PAGE_SIZE};
use spmv_core::matrix::{Kernel, MatrixFormat};
use spmv_core::SimError;

#[derive(Parser, Debug)]
#[command(
    name = "spmv-cache-trace",
    author,
    version,
    about = "Cache-miss cost estimator for sparse matrix-vector multiplication kernels."
)]
struct Cli {
    /// Matrix Market file to load (optionally gzip'd or gzip'd-tar wrapped).
    #[arg(long)]
    matrix: Option<PathBuf>,

    /// Storage format to simulate (see `--list-matrix-formats`).
    #[arg(long, default_value = "csr")]
    matrix_format: String,

    /// Full trace-config JSON file describing the cache hierarchy and thread
    /// affinities (§4.3). When omitted, a flat config is synthesized from
    /// `--cache-size`/`--cache-line-size`/`--threads`/`--shared-cache`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Modeled cache size in bytes.
    #[arg(long, default_value_t = 32 * 1024)]
    cache_size: u64,

    /// Modeled cache line size in bytes.
    #[arg(long, default_value_t = 64)]
    cache_line_size: u64,

    /// Number of worker threads.
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Model one cache shared by all threads instead of one private cache per thread.
    #[arg(long)]
    shared_cache: bool,

    /// Emit detailed logging (`RUST_LOG` still takes precedence if set).
    #[arg(long)]
    verbose: bool,

    /// Print the recognized `--matrix-format` names and exit.
    #[arg(long)]
    list_matrix_formats: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.list_matrix_formats {
        for format in MatrixFormat::ALL {
            println!("{format}");
        }
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(report) => {
            match serde_json::to_string_pretty(&report) {
                Ok(json) => {
                    println!("{json}");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("spmv-cache-trace: failed to serialize report: {e}");
                    ExitCode::FAILURE
                }
            }
        }
        Err(e) => {
            eprintln!("spmv-cache-trace: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();
}

fn run(cli: &Cli) -> Result<spmv_core::Report, SimError> {
    let Some(matrix_path) = &cli.matrix else {
        eprintln!("spmv-cache-trace: --matrix PATH is required (see --help)");
        std::process::exit(2);
    };

    let format: MatrixFormat = cli.matrix_format.parse().map_err(SimError::Matrix)?;

    log::info!("reading matrix from {}", matrix_path.display());
    let csr = matrix_market::read_matrix(matrix_path)?;
    log::debug!("loaded {} x {} matrix, {} nonzeros", csr.rows, csr.cols, csr.nnz());

    let kernel = Kernel::build(format, csr).map_err(SimError::Matrix)?;
    let config = load_config(cli)?;

    trace_cache_misses(&config, &kernel, DEFAULT_PAGE_SIZE)
}

/// Loads the trace-config from `--config PATH` if given, otherwise
/// synthesizes a flat one from the simple `--cache-*`/`--threads` flags.
fn load_config(cli: &Cli) -> Result<TraceConfig, SimError> {
    let Some(path) = &cli.config else {
        return Ok(synthesize_config(cli.cache_size, cli.cache_line_size, cli.threads, cli.shared_cache));
    };

    log::info!("reading trace config from {}", path.display());
    let text = std::fs::read_to_string(path)
        .map_err(|source| SimError::Io(spmv_core::common::error::IoError::Read {
            path: path.display().to_string(),
            source,
        }))?;
    TraceConfig::from_json(&text).map_err(SimError::Config)
}

/// Builds a flat trace-config from the simple CLI flags: either one cache
/// shared by every thread, or one private cache per thread. Every thread
/// gets its own NUMA domain. For a multi-level hierarchy or asymmetric NUMA
/// topology, pass `--config PATH` instead (§6).
fn synthesize_config(cache_size: u64, cache_line_size: u64, threads: usize, shared: bool) -> TraceConfig {
    let numa_domains: Vec<String> = (0..threads.max(1)).map(|t| format!("node{t}")).collect();

    let mut caches = std::collections::BTreeMap::new();
    let mut thread_affinities = Vec::with_capacity(threads.max(1));

    if shared {
        caches.insert(
            "shared".to_string(),
            Cache { size: cache_size, line_size: cache_line_size, parents: Vec::new() },
        );
        for t in 0..threads.max(1) {
            thread_affinities.push(ThreadAffinity {
                thread: t,
                cpu: t,
                cache: "shared".to_string(),
                numa_domain: numa_domains[t].clone(),
                event_groups: Vec::new(),
            });
        }
    } else {
        for t in 0..threads.max(1) {
            let name = format!("l1-{t}");
            caches.insert(
                name.clone(),
                Cache { size: cache_size, line_size: cache_line_size, parents: Vec::new() },
            );
            thread_affinities.push(ThreadAffinity {
                thread: t,
                cpu: t,
                cache: name,
                numa_domain: numa_domains[t].clone(),
                event_groups: Vec::new(),
            });
        }
    }

    TraceConfig {
        name: "cli".to_string(),
        description: "synthesized from --cache-size/--cache-line-size/--threads/--shared-cache".to_string(),
        caches,
        numa_domains,
        thread_affinities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_cache_config_has_one_cache_for_every_thread() {
        let config = synthesize_config(32 * 1024, 64, 4, true);
        assert_eq!(config.caches.len(), 1);
        assert_eq!(config.num_threads(), 4);
        assert_eq!(spmv_core::trace::active_threads(&config, "shared"), vec![0, 1, 2, 3]);
    }

    #[test]
    fn private_cache_config_has_one_cache_per_thread() {
        let config = synthesize_config(32 * 1024, 64, 3, false);
        assert_eq!(config.caches.len(), 3);
        assert_eq!(spmv_core::trace::active_threads(&config, "l1-1"), vec![1]);
    }

    #[test]
    fn load_config_falls_back_to_synthesized_config_without_a_config_flag() {
        let cli = Cli {
            matrix: None,
            matrix_format: "csr".to_string(),
            config: None,
            cache_size: 1024,
            cache_line_size: 64,
            threads: 2,
            shared_cache: true,
            verbose: false,
            list_matrix_formats: false,
        };
        let config = load_config(&cli).unwrap();
        assert_eq!(config.caches.len(), 1);
        assert_eq!(config.num_threads(), 2);
    }

    #[test]
    fn load_config_reads_a_full_trace_config_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        std::fs::write(
            &path,
            r#"{
                "name": "from-file",
                "caches": { "l1": { "size": 4096, "line_size": 64, "parent": [] } },
                "numa_domains": ["node0"],
                "thread_affinities": [
                    { "thread": 0, "cpu": 0, "cache": "l1", "numa_domain": "node0" }
                ]
            }"#,
        )
        .unwrap();

        let cli = Cli {
            matrix: None,
            matrix_format: "csr".to_string(),
            config: Some(path),
            cache_size: 32 * 1024,
            cache_line_size: 64,
            threads: 1,
            shared_cache: false,
            verbose: false,
            list_matrix_formats: false,
        };
        let config = load_config(&cli).unwrap();
        assert_eq!(config.name, "from-file");
    }
}
