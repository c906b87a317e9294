use crate::chunk::ColumnChunk;
use crate::error::MatrixError;
use crate::seed::SparseMatrixSeed;
use crate::value::MatrixValue;
use std::ops::Range;

/// Read access to a matrix stored column-compressed (CSC).
///
/// Implementations are read-only after construction, so a store can be shared
/// between worker threads and queried concurrently.
pub trait ColumnStore: Send + Sync {
    /// Element type of the stored nonzero values
    type Value: MatrixValue;

    /// Descriptor of the backing arrays
    fn seed(&self) -> &SparseMatrixSeed;

    /// Nonzero entries of the columns `cols.start..cols.end`.
    ///
    /// Reads `indptr[cols.start..=cols.end]`, then one contiguous slice each of `data` and
    /// `indices`. An empty range is answered without touching `data`/`indices`.
    fn read_column_range(&self, cols: Range<usize>) -> Result<ColumnChunk<Self::Value>, MatrixError>;

    /// Number of stored entries in each column of `cols`. Only reads `indptr`.
    fn col_nnz(&self, cols: Range<usize>) -> Result<Vec<usize>, MatrixError>;

    /// Fraction of zero entries in the matrix
    fn sparsity(&self) -> f64 {
        self.seed().sparsity()
    }

    /// Shape in [rows, cols]
    fn shape(&self) -> [usize; 2] {
        self.seed().shape()
    }

    /// Number of stored nonzero entries
    fn nnz(&self) -> usize {
        self.seed().nnz()
    }

    /// Stores always hold their data sparse
    fn is_sparse(&self) -> bool {
        true
    }
}
