//! Matrix Market (coordinate, real, general/symmetric) reader, with
//! transparent gzip'd-tar unwrapping (§6 "Input: Matrix Market").
//!
//! This lives entirely in the CLI crate: the core library only ever sees a
//! [`spmv_core::matrix::Csr`] sparsity pattern, never a file format (§1
//! "Deliberately OUT of scope").

use std::io::Read as _;
use std::path::Path;

use spmv_core::common::error::{IoError, MatrixError, SimError};
use spmv_core::matrix::Csr;

/// Reads a Matrix Market file (optionally gzip'd, optionally tar-wrapped)
/// into a CSR sparsity pattern.
pub fn read_matrix(path: &Path) -> Result<Csr, SimError> {
    let text = read_text(path)?;
    let (rows, cols, row_idx, col_idx) = parse_matrix_market(path, &text)?;
    Ok(Csr::from_coo(rows, cols, &row_idx, &col_idx))
}

/// Loads the `.mtx` text content, transparently un-gzipping and
/// un-tarring as needed.
fn read_text(path: &Path) -> Result<String, SimError> {
    let bytes = std::fs::read(path).map_err(|source| {
        SimError::Io(IoError::Read { path: path.display().to_string(), source })
    })?;

    let name = path.to_string_lossy();
    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        return read_tar_gz(path, &bytes);
    }
    if name.ends_with(".gz") {
        return gunzip(path, &bytes);
    }
    String::from_utf8(bytes).map_err(|_| {
        SimError::Io(IoError::TruncatedArchive {
            path: path.display().to_string(),
            reason: "file is not valid UTF-8".to_string(),
        })
    })
}

fn gunzip(path: &Path, bytes: &[u8]) -> Result<String, SimError> {
    let mut decoder = flate2::read::GzDecoder::new(bytes);
    let mut text = String::new();
    decoder.read_to_string(&mut text).map_err(|source| {
        SimError::Io(IoError::Read { path: path.display().to_string(), source })
    })?;
    Ok(text)
}

/// Finds the single `.mtx` entry in a gzip'd tar archive (§6: "Input may be
/// wrapped in a gzip'd tar containing a single `.mtx` file under a
/// directory whose name matches the archive's stem").
fn read_tar_gz(path: &Path, bytes: &[u8]) -> Result<String, SimError> {
    let decoder = flate2::read::GzDecoder::new(bytes);
    let mut archive = tar::Archive::new(decoder);
    let entries = archive.entries().map_err(|source| {
        SimError::Io(IoError::Read { path: path.display().to_string(), source })
    })?;

    for entry in entries {
        let mut entry = entry.map_err(|source| {
            SimError::Io(IoError::Read { path: path.display().to_string(), source })
        })?;
        let entry_path = entry.path().map_err(|source| {
            SimError::Io(IoError::Read { path: path.display().to_string(), source })
        })?;
        if entry_path.extension().is_some_and(|ext| ext == "mtx") {
            let mut text = String::new();
            entry.read_to_string(&mut text).map_err(|source| {
                SimError::Io(IoError::Read { path: path.display().to_string(), source })
            })?;
            return Ok(text);
        }
    }

    Err(SimError::Io(IoError::TruncatedArchive {
        path: path.display().to_string(),
        reason: "no .mtx entry found in archive".to_string(),
    }))
}

/// Parses the coordinate/real/general|symmetric body (§6): an optional
/// `%%MatrixMarket` header, `%`-comment lines, a `rows cols nnz` line, then
/// `nnz` `i j a` triplets with 1-based indices. Symmetric matrices get their
/// off-diagonal entries mirrored.
fn parse_matrix_market(path: &Path, text: &str) -> Result<(u64, u64, Vec<u64>, Vec<u64>), SimError> {
    let mut lines = text.lines().enumerate();
    let mut symmetric = false;

    let mut size_line = None;
    for (lineno, line) in &mut lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix("%%MatrixMarket") {
            if !header.contains("coordinate") || !header.contains("real") {
                return Err(SimError::Matrix(MatrixError::WrongFormat {
                    expected: "matrix coordinate real <symmetry>",
                    found: header.trim().to_string(),
                }));
            }
            symmetric = header.contains("symmetric");
            continue;
        }
        if line.starts_with('%') {
            continue;
        }
        size_line = Some((lineno, line.to_string()));
        break;
    }

    let Some((lineno, size_line)) = size_line else {
        return Err(parse_error(path, 0, "missing 'rows cols nnz' line"));
    };
    let mut dims = size_line.split_whitespace();
    let rows: u64 = parse_field(path, lineno, dims.next())?;
    let cols: u64 = parse_field(path, lineno, dims.next())?;
    let nnz: u64 = parse_field(path, lineno, dims.next())?;

    let mut row_idx = Vec::with_capacity(nnz as usize);
    let mut col_idx = Vec::with_capacity(nnz as usize);
    for (lineno, line) in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let i: u64 = parse_field(path, lineno, fields.next())?;
        let j: u64 = parse_field(path, lineno, fields.next())?;
        let _value: f64 = parse_field(path, lineno, fields.next())?;

        let i = i - 1;
        let j = j - 1;
        row_idx.push(i);
        col_idx.push(j);
        if symmetric && i != j {
            row_idx.push(j);
            col_idx.push(i);
        }
    }

    Ok((rows, cols, row_idx, col_idx))
}

fn parse_field<T: std::str::FromStr>(path: &Path, lineno: usize, field: Option<&str>) -> Result<T, SimError> {
    field
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| parse_error(path, lineno, "malformed field"))
}

fn parse_error(path: &Path, lineno: usize, reason: &str) -> SimError {
    SimError::Io(IoError::TruncatedArchive {
        path: format!("{}:{}", path.display(), lineno + 1),
        reason: reason.to_string(),
    })
}
