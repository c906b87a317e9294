use crate::chunk::ColumnChunk;
use crate::error::MatrixError;
use crate::seed::{check_row_indices, SeedSource, SparseMatrixSeed};
use crate::store::ColumnStore;
use crate::value::MatrixValue;
use sprs::{CsMatI, SpIndex};
use std::ops::Range;

/// CSC matrix held in memory. Answers the same queries as an on-disk store, which makes it
/// the reference implementation for tests and the landing type for full materialization.
#[derive(Clone, Debug, PartialEq)]
pub struct CscMatrix<T> {
    seed: SparseMatrixSeed,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<T>,
}

impl<T: MatrixValue> CscMatrix<T> {
    /// Build from the three CSC arrays. All invariants, including row bounds, are checked.
    pub fn from_parts(
        nrow: usize,
        ncol: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<T>,
    ) -> Result<CscMatrix<T>, MatrixError> {
        let seed = SparseMatrixSeed::validated(
            nrow,
            ncol,
            &indptr,
            data.len(),
            indices.len(),
            T::ELEMENT_TYPE,
            SeedSource::Memory,
        )?;
        check_row_indices(&indices, nrow)?;
        Ok(CscMatrix {
            seed,
            indptr,
            indices,
            data,
        })
    }

    /// Create a `CscMatrix` from a `sprs::CsMatI` of either storage order
    pub fn from_csmat<I: SpIndex, Iptr: SpIndex>(mat: &CsMatI<T, I, Iptr>) -> Result<CscMatrix<T>, MatrixError> {
        let csc;
        let mat = if mat.is_csc() {
            mat.view()
        } else {
            csc = mat.to_other_storage();
            csc.view()
        };
        let (rows, cols) = mat.shape();

        let mut indptr = Vec::with_capacity(cols + 1);
        let mut indices = Vec::with_capacity(mat.nnz());
        let mut data = Vec::with_capacity(mat.nnz());
        indptr.push(0);
        for v in mat.outer_iterator() {
            indices.extend(v.indices().iter().map(|i| i.index()));
            data.extend_from_slice(v.data());
            indptr.push(indices.len());
        }

        CscMatrix::from_parts(rows, cols, indptr, indices, data)
    }

    /// Load every column of `store` into memory.
    pub fn from_store<S: ColumnStore<Value = T> + ?Sized>(store: &S) -> Result<CscMatrix<T>, MatrixError> {
        let [nrow, ncol] = store.shape();
        let (indptr, indices, data) = store.read_column_range(0..ncol)?.into_parts();
        CscMatrix::from_parts(nrow, ncol, indptr, indices, data)
    }

    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Convert to a `sprs` CSC matrix. Fails if row indices within a column are not
    /// strictly increasing, which `sprs` requires.
    pub fn to_csmat(&self) -> Result<CsMatI<T, usize>, MatrixError> {
        CsMatI::try_new_csc(
            (self.seed.nrow(), self.seed.ncol()),
            self.indptr.clone(),
            self.indices.clone(),
            self.data.clone(),
        )
        .map_err(|(_, _, _, e)| MatrixError::format(e.to_string()))
    }
}

impl<T: MatrixValue> ColumnStore for CscMatrix<T> {
    type Value = T;

    fn seed(&self) -> &SparseMatrixSeed {
        &self.seed
    }

    fn read_column_range(&self, cols: Range<usize>) -> Result<ColumnChunk<T>, MatrixError> {
        self.seed.check_col_range(&cols)?;
        if cols.is_empty() {
            return Ok(ColumnChunk::empty(cols.start));
        }
        let window = self.indptr[cols.start..=cols.end].to_vec();
        let (lo, hi) = (window[0], window[window.len() - 1]);
        let indices = self.indices[lo..hi].to_vec();
        let data = self.data[lo..hi].to_vec();
        ColumnChunk::new(cols, window, indices, data, self.seed.nrow())
    }

    fn col_nnz(&self, cols: Range<usize>) -> Result<Vec<usize>, MatrixError> {
        self.seed.check_col_range(&cols)?;
        Ok(self.indptr[cols.start..=cols.end].windows(2).map(|w| w[1] - w[0]).collect())
    }
}

/// Export any store as a `sprs` CSC matrix (column pointers, row indices, values).
pub fn to_csmat<S: ColumnStore + ?Sized>(store: &S) -> Result<CsMatI<S::Value, usize>, MatrixError> {
    CscMatrix::from_store(store)?.to_csmat()
}

#[cfg(test)]
mod test {
    use super::*;
    use sprs::TriMat;

    fn example() -> CscMatrix<i32> {
        CscMatrix::from_parts(4, 3, vec![0, 2, 2, 3], vec![0, 3, 1], vec![5, 7, 9]).unwrap()
    }

    #[test]
    fn test_read_column_range() {
        let m = example();
        assert_eq!(m.sparsity(), 0.75);

        let all = m.read_column_range(0..3).unwrap();
        assert_eq!(all.nnz(), 3);
        let c0 = all.column(0).unwrap();
        assert_eq!(c0.iter().collect::<Vec<_>>(), vec![(0, 5), (3, 7)]);

        for c in 0..=3 {
            assert!(m.read_column_range(c..c).unwrap().is_empty());
        }
        assert!(m.read_column_range(0..4).unwrap_err().is_range());
        assert_eq!(m.col_nnz(0..3).unwrap(), vec![2, 0, 1]);
        assert_eq!(m.col_nnz(1..1).unwrap(), Vec::<usize>::new());
    }

    #[test]
    fn test_rejects_bad_rows() {
        let e = CscMatrix::from_parts(2, 1, vec![0, 1], vec![2], vec![1.0]).unwrap_err();
        assert!(e.is_format());
    }

    #[test]
    fn test_sprs_roundtrip() {
        let mut tri = TriMat::new((4, 3));
        tri.add_triplet(0, 0, 5);
        tri.add_triplet(3, 0, 7);
        tri.add_triplet(1, 2, 9);
        let csr: CsMatI<i32, usize> = tri.to_csr();

        let m = CscMatrix::from_csmat(&csr).unwrap();
        assert_eq!(m, example());

        let back = to_csmat(&m).unwrap();
        assert!(back.is_csc());
        assert_eq!(back.to_dense(), csr.to_dense());
    }
}
