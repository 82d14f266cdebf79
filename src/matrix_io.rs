//! Plain-text persistence of dense numeric matrices.
//!
//! The format is a header line `rows cols` followed by one
//! whitespace-separated line per row. Values are written with Rust's
//! shortest round-trip representation, so a write/read cycle restores them
//! exactly.

use crate::errors::{GpError, Result};
use linfa::Float;
use ndarray::Array2;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a matrix to a named text resource.
pub fn write_matrix<F: Float>(matrix: &Array2<F>, path: impl AsRef<Path>) -> Result<()> {
    let file = fs::File::create(path)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "{} {}", matrix.nrows(), matrix.ncols())?;
    for row in matrix.rows() {
        let line = row
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        writeln!(out, "{line}")?;
    }
    out.flush()?;
    Ok(())
}

/// Read a matrix back from a named text resource.
///
/// Fails with [`GpError::MissingResource`] when the path does not point to a
/// plain readable file, and with [`GpError::LoadError`] when the content does
/// not parse as a matrix of the declared shape.
pub fn read_matrix<F: Float>(path: impl AsRef<Path>) -> Result<Array2<F>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(GpError::MissingResource(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;
    let corrupt = |reason: String| GpError::LoadError(format!("{}: {reason}", path.display()));

    let mut tokens = content.split_whitespace();
    let mut read_dim = |what: &str| -> Result<usize> {
        tokens
            .next()
            .ok_or_else(|| corrupt(format!("missing {what} header")))?
            .parse::<usize>()
            .map_err(|e| corrupt(format!("bad {what} header: {e}")))
    };
    let rows = read_dim("row count")?;
    let cols = read_dim("column count")?;

    let mut values = Vec::with_capacity(rows * cols);
    for tok in tokens.by_ref().take(rows * cols) {
        let value: f64 = tok
            .parse()
            .map_err(|e| corrupt(format!("bad value {tok:?}: {e}")))?;
        values.push(F::cast(value));
    }
    if values.len() != rows * cols {
        return Err(corrupt(format!(
            "expected {} values, found {}",
            rows * cols,
            values.len()
        )));
    }
    if tokens.next().is_some() {
        return Err(corrupt("trailing tokens after matrix data".to_string()));
    }
    Array2::from_shape_vec((rows, cols), values)
        .map_err(|e| corrupt(format!("shape error: {e}")))
}
