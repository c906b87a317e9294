//! Row and column summaries computed block by block.

use crate::apply::{block_apply, chunk_apply};
use crate::config::BlockConfig;
use crate::grid::col_auto_grid;
use crate::materialize::extract_nonzero_data_by_col;
use anyhow::Error;
use ndarray::{Array1, Axis};
use tenx_types::{ColumnStore, MatrixValue};

fn col_grid<S: ColumnStore + ?Sized>(store: &S, config: &BlockConfig) -> crate::grid::Grid {
    col_auto_grid(store.shape(), config.block_size, std::mem::size_of::<S::Value>())
}

/// Sum of each column.
pub fn col_sums<S: ColumnStore + ?Sized>(store: &S, config: &BlockConfig) -> Result<Array1<f64>, Error> {
    let grid = col_grid(store, config);
    if grid.is_empty() {
        return Ok(Array1::zeros(store.shape()[1]));
    }
    let parts = chunk_apply(store, &grid, config, |chunk| {
        Ok(chunk
            .iter()
            .map(|slice| slice.values.iter().map(|v| v.as_f64()).sum::<f64>())
            .collect::<Vec<f64>>())
    })?;
    Ok(parts.into_iter().flatten().collect())
}

/// Mean of each column, zeros included.
pub fn col_means<S: ColumnStore + ?Sized>(store: &S, config: &BlockConfig) -> Result<Array1<f64>, Error> {
    let nrow = store.shape()[0];
    let sums = col_sums(store, config)?;
    if nrow == 0 {
        return Ok(Array1::from_elem(sums.len(), f64::NAN));
    }
    Ok(sums / nrow as f64)
}

/// Sum of each row, accumulated over dense column blocks.
pub fn row_sums<S: ColumnStore + ?Sized>(store: &S, config: &BlockConfig) -> Result<Array1<f64>, Error> {
    let nrow = store.shape()[0];
    let parts = block_apply(store, &col_grid(store, config), config, |block| {
        Ok(block.view().mapv(|v| v.as_f64()).sum_axis(Axis(1)))
    })?;
    Ok(parts.into_iter().fold(Array1::zeros(nrow), |acc, p| acc + p))
}

/// Number of stored entries per column. Reads only the column pointers.
pub fn col_nnz<S: ColumnStore + ?Sized>(store: &S) -> Result<Vec<usize>, Error> {
    Ok(store.col_nnz(0..store.shape()[1])?)
}

/// Mean of the nonzero values of each column in `cols`; `NaN` for a column with none.
pub fn nonzero_col_means<S: ColumnStore + ?Sized>(store: &S, cols: &[usize]) -> Result<Vec<f64>, Error> {
    let nz = extract_nonzero_data_by_col(store, cols)?;
    Ok(nz
        .iter()
        .map(|(_, values)| {
            if values.is_empty() {
                f64::NAN
            } else {
                values.iter().map(|v| v.as_f64()).sum::<f64>() / values.len() as f64
            }
        })
        .collect())
}
