use crate::error::MatrixError;
use crate::seed::{check_monotonic, check_row_indices};
use std::ops::Range;

/// The nonzero entries of a contiguous range of columns, as returned by one
/// `ColumnStore::read_column_range` call.
///
/// `indptr` keeps the absolute offsets read from the store; `indices` and `data`
/// hold exactly the entries `indptr[0]..indptr[last]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnChunk<T> {
    cols: Range<usize>,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<T>,
}

/// Borrowed view of one column inside a `ColumnChunk`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSlice<'a, T> {
    /// Column number in the full matrix
    pub col: usize,
    /// Row positions of the nonzero values
    pub rows: &'a [usize],
    /// Nonzero values, aligned with `rows`
    pub values: &'a [T],
}

impl<'a, T: Copy> ColumnSlice<'a, T> {
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterate over (row, value) pairs
    pub fn iter(&self) -> impl Iterator<Item = (usize, T)> + 'a {
        self.rows.iter().copied().zip(self.values.iter().copied())
    }
}

impl<T: Copy> ColumnChunk<T> {
    /// Assemble a chunk from the `indptr[cols.start..=cols.end]` window and the matching
    /// `indices`/`data` slices. Checks that the pieces agree with each other and that every
    /// row index is below `nrow`.
    pub fn new(
        cols: Range<usize>,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<T>,
        nrow: usize,
    ) -> Result<ColumnChunk<T>, MatrixError> {
        if indptr.len() != cols.len() + 1 {
            return Err(MatrixError::format(format!(
                "indptr window has {} elements for {} columns",
                indptr.len(),
                cols.len()
            )));
        }
        check_monotonic(&indptr, cols.start)?;
        let span = indptr[indptr.len() - 1] - indptr[0];
        if indices.len() != span || data.len() != span {
            return Err(MatrixError::format(format!(
                "columns {}..{} span {span} entries, got {} indices and {} values",
                cols.start,
                cols.end,
                indices.len(),
                data.len()
            )));
        }
        check_row_indices(&indices, nrow)?;
        Ok(ColumnChunk {
            cols,
            indptr,
            indices,
            data,
        })
    }

    /// A chunk covering no columns, positioned at column `at`.
    pub fn empty(at: usize) -> ColumnChunk<T> {
        ColumnChunk {
            cols: at..at,
            indptr: vec![0],
            indices: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Column range covered by this chunk
    pub fn cols(&self) -> Range<usize> {
        self.cols.clone()
    }

    /// Number of columns in the chunk
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    /// Number of nonzero entries across all columns of the chunk
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// All nonzero values, column after column
    pub fn values(&self) -> &[T] {
        &self.data
    }

    /// Row indices aligned with `values()`
    pub fn row_indices(&self) -> &[usize] {
        &self.indices
    }

    /// View of column `col` (a column number of the full matrix), if it is in the chunk.
    pub fn column(&self, col: usize) -> Option<ColumnSlice<'_, T>> {
        if !self.cols.contains(&col) {
            return None;
        }
        let i = col - self.cols.start;
        let base = self.indptr[0];
        let range = self.indptr[i] - base..self.indptr[i + 1] - base;
        Some(ColumnSlice {
            col,
            rows: &self.indices[range.clone()],
            values: &self.data[range],
        })
    }

    /// Iterate over the columns of the chunk in order
    pub fn iter(&self) -> impl Iterator<Item = ColumnSlice<'_, T>> + '_ {
        self.cols.clone().filter_map(move |c| self.column(c))
    }

    /// Split into (column pointers rebased to start at 0, row indices, values).
    pub fn into_parts(self) -> (Vec<usize>, Vec<usize>, Vec<T>) {
        let base = self.indptr[0];
        let indptr = self.indptr.into_iter().map(|p| p - base).collect();
        (indptr, self.indices, self.data)
    }
}
