use crate::error::MatrixError;
use crate::value::ElementType;
use std::ops::Range;
use std::path::PathBuf;

/// Where the three CSC arrays of a seed live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SeedSource {
    /// Arrays held in process memory.
    Memory,
    /// Datasets inside an HDF5 file.
    Hdf5 {
        filepath: PathBuf,
        data_path: String,
        indices_path: String,
        indptr_path: String,
    },
}

/// Immutable descriptor binding a logical matrix shape to its backing CSC arrays.
///
/// A seed is only ever constructed through `SparseMatrixSeed::validated`, so holding one
/// means the `indptr` array it was built from satisfied the CSC invariants:
/// `indptr.len() == ncol + 1`, `indptr[0] == 0`, non-decreasing, and
/// `indptr[ncol] == data.len() == indices.len()`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseMatrixSeed {
    nrow: usize,
    ncol: usize,
    nnz: usize,
    element_type: ElementType,
    source: SeedSource,
}

impl SparseMatrixSeed {
    /// Check `indptr` and the lengths of `data`/`indices` against `ncol` and build the seed.
    pub fn validated(
        nrow: usize,
        ncol: usize,
        indptr: &[usize],
        data_len: usize,
        indices_len: usize,
        element_type: ElementType,
        source: SeedSource,
    ) -> Result<SparseMatrixSeed, MatrixError> {
        let nnz = check_indptr(indptr, ncol)?;
        if data_len != nnz {
            return Err(MatrixError::format(format!(
                "data has {data_len} elements but indptr[ncol] = {nnz}"
            )));
        }
        if indices_len != nnz {
            return Err(MatrixError::format(format!(
                "indices has {indices_len} elements but indptr[ncol] = {nnz}"
            )));
        }
        if nrow.checked_mul(ncol).is_none() {
            return Err(MatrixError::format(format!("shape {nrow} x {ncol} overflows")));
        }
        Ok(SparseMatrixSeed {
            nrow,
            ncol,
            nnz,
            element_type,
            source,
        })
    }

    pub fn nrow(&self) -> usize {
        self.nrow
    }

    pub fn ncol(&self) -> usize {
        self.ncol
    }

    /// Shape in [rows, cols]
    pub fn shape(&self) -> [usize; 2] {
        [self.nrow, self.ncol]
    }

    /// Number of stored nonzero entries, `indptr[ncol]`
    pub fn nnz(&self) -> usize {
        self.nnz
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn source(&self) -> &SeedSource {
        &self.source
    }

    /// Fraction of zero entries, `1 - nnz / (nrow * ncol)`. An empty matrix is fully sparse.
    pub fn sparsity(&self) -> f64 {
        let len = self.nrow * self.ncol;
        if len == 0 {
            return 1.0;
        }
        1.0 - self.nnz as f64 / len as f64
    }

    /// Fail with `MatrixError::Range` unless `start <= end <= ncol`.
    pub fn check_col_range(&self, cols: &Range<usize>) -> Result<(), MatrixError> {
        check_range("column", cols, self.ncol)
    }

    /// Fail with `MatrixError::Range` unless `start <= end <= nrow`.
    pub fn check_row_range(&self, rows: &Range<usize>) -> Result<(), MatrixError> {
        check_range("row", rows, self.nrow)
    }

    /// Fail with `MatrixError::Range` unless `col < ncol`.
    pub fn check_col(&self, col: usize) -> Result<(), MatrixError> {
        if col >= self.ncol {
            return Err(MatrixError::range(format!("column {col} >= ncol {}", self.ncol)));
        }
        Ok(())
    }
}

fn check_range(what: &str, range: &Range<usize>, len: usize) -> Result<(), MatrixError> {
    if range.start > range.end {
        return Err(MatrixError::range(format!(
            "{what} range {}..{} is reversed",
            range.start, range.end
        )));
    }
    if range.end > len {
        return Err(MatrixError::range(format!(
            "{what} range {}..{} exceeds dimension {len}",
            range.start, range.end
        )));
    }
    Ok(())
}

/// Validate a full column pointer array for a matrix with `ncol` columns. Returns nnz.
pub fn check_indptr(indptr: &[usize], ncol: usize) -> Result<usize, MatrixError> {
    if indptr.len() != ncol + 1 {
        return Err(MatrixError::format(format!(
            "indptr has {} elements, expected ncol + 1 = {}",
            indptr.len(),
            ncol + 1
        )));
    }
    if indptr[0] != 0 {
        return Err(MatrixError::format(format!("indptr[0] = {}, expected 0", indptr[0])));
    }
    check_monotonic(indptr, 0)?;
    Ok(indptr[ncol])
}

/// Fail with `MatrixError::Format` if a window of `indptr` starting at column `first_col`
/// ever decreases.
pub fn check_monotonic(indptr: &[usize], first_col: usize) -> Result<(), MatrixError> {
    if let Some(pos) = indptr.windows(2).position(|w| w[1] < w[0]) {
        return Err(MatrixError::format(format!(
            "indptr decreases at column {}",
            first_col + pos
        )));
    }
    Ok(())
}

/// Fail with `MatrixError::Format` if any row index is `>= nrow`.
pub fn check_row_indices(indices: &[usize], nrow: usize) -> Result<(), MatrixError> {
    if let Some(&bad) = indices.iter().find(|&&r| r >= nrow) {
        return Err(MatrixError::format(format!("row index {bad} >= nrow {nrow}")));
    }
    Ok(())
}
