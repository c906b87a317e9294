use itertools::Itertools;
use ndarray::Array2;
use std::ops::Range;
use tenx_types::{ColumnStore, DenseBlock, MatrixError, NonzeroByColumn};

/// Materialize the window `rows` x `cols` of `store` as a dense block.
///
/// One `read_column_range` call fetches the columns; entries whose row falls outside
/// `rows` are dropped and everything not stored is zero.
pub fn read_dense_block<S: ColumnStore + ?Sized>(
    store: &S,
    rows: Range<usize>,
    cols: Range<usize>,
) -> Result<DenseBlock<S::Value>, MatrixError> {
    store.seed().check_row_range(&rows)?;
    let chunk = store.read_column_range(cols.clone())?;

    let mut values = Array2::zeros((rows.len(), cols.len()));
    for slice in chunk.iter() {
        let j = slice.col - cols.start;
        for (r, v) in slice.iter() {
            if rows.contains(&r) {
                values[(r - rows.start, j)] = v;
            }
        }
    }
    Ok(DenseBlock::new(rows, cols, values))
}

/// Nonzero values of each column in `cols`, without their row positions.
///
/// `cols` may be unordered and may repeat; the result follows the request order. Every
/// index is checked before anything is read, so an out-of-range column fails the whole
/// call. The distinct columns are coalesced into maximal contiguous runs and each run is
/// fetched with a single `read_column_range`. Values of a column keep their stored order.
pub fn extract_nonzero_data_by_col<S: ColumnStore + ?Sized>(
    store: &S,
    cols: &[usize],
) -> Result<NonzeroByColumn<S::Value>, MatrixError> {
    for &c in cols {
        store.seed().check_col(c)?;
    }

    let mut distinct = cols.to_vec();
    distinct.sort_unstable();
    distinct.dedup();

    let mut values: Vec<Vec<S::Value>> = Vec::with_capacity(distinct.len());
    for run in contiguous_runs(&distinct) {
        let chunk = store.read_column_range(run)?;
        values.extend(chunk.iter().map(|slice| slice.values.to_vec()));
    }

    let by_request = cols
        .iter()
        .map(|c| {
            // distinct is sorted and contains every requested column
            let i = distinct.binary_search(c).unwrap_or_default();
            values[i].clone()
        })
        .collect();
    Ok(NonzeroByColumn::new(cols.to_vec(), by_request))
}

/// Group sorted, distinct column indices into maximal runs of consecutive columns.
pub fn contiguous_runs(sorted: &[usize]) -> Vec<Range<usize>> {
    sorted
        .iter()
        .map(|&c| c..c + 1)
        .coalesce(|a, b| {
            if a.end == b.start {
                Ok(a.start..b.end)
            } else {
                Err((a, b))
            }
        })
        .collect()
}
