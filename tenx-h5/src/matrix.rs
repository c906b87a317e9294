use crate::layout::TenxLayout;
use crate::strings::read_strings;
use crate::{h5err, H5Value};
use hdf5::types::{FloatSize, IntSize, TypeDescriptor};
use hdf5::Dataset;
use log::{debug, info, warn};
use ndarray::s;
use std::marker::PhantomData;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tenx_types::{
    ColumnChunk, ColumnStore, ElementType, MatrixDimnames, MatrixError, SeedSource, SparseMatrixSeed, TenxFeatures,
};

/// A 10x Genomics sparse matrix stored in an HDF5 file, read lazily column range by
/// column range.
///
/// Opening validates the whole `indptr` array once; afterwards every query goes back to
/// the file and reads only the column pointers and nonzero entries it needs. Nothing is
/// cached. The `hdf5` crate serializes every library call behind a global lock, so a
/// `TenxMatrix` can be shared across threads; the lock is held for each read only, not
/// while results are assembled.
#[derive(Debug)]
pub struct TenxMatrix<T = f64> {
    seed: SparseMatrixSeed,
    layout: Option<TenxLayout>,
    file: hdf5::File,
    data: Dataset,
    indices: Dataset,
    indptr: Dataset,
    _t: PhantomData<fn() -> T>,
}

impl<T: H5Value> TenxMatrix<T> {
    /// Open the matrix stored under `group` (e.g. `"matrix"` for CellRanger v3+ output, or
    /// the genome name for v2), taking the shape from `<group>/shape`.
    pub fn open(filepath: impl AsRef<Path>, group: &str) -> Result<TenxMatrix<T>, MatrixError> {
        let filepath = filepath.as_ref();
        let layout = TenxLayout::new(group);
        let file = hdf5::File::open(filepath).map_err(h5err)?;

        let shape = dataset(&file, &layout.shape())?.read_raw::<i64>().map_err(h5err)?;
        let [nrow, ncol] = match shape.as_slice() {
            &[r, c] => [to_usize(r, "shape")?, to_usize(c, "shape")?],
            _ => {
                return Err(MatrixError::format(format!(
                    "{}: expected 2 dimensions, found {}",
                    layout.shape(),
                    shape.len()
                )))
            }
        };

        let (data, indices, indptr) = (layout.data(), layout.indices(), layout.indptr());
        TenxMatrix::open_in(file, filepath, &data, &indices, &indptr, nrow, ncol, Some(layout))
    }

    /// Open a CSC matrix from three arbitrary dataset paths and an explicit shape.
    pub fn open_paths(
        filepath: impl AsRef<Path>,
        data_path: &str,
        indices_path: &str,
        indptr_path: &str,
        nrow: usize,
        ncol: usize,
    ) -> Result<TenxMatrix<T>, MatrixError> {
        let filepath = filepath.as_ref();
        let file = hdf5::File::open(filepath).map_err(h5err)?;
        TenxMatrix::open_in(file, filepath, data_path, indices_path, indptr_path, nrow, ncol, None)
    }

    #[allow(clippy::too_many_arguments)]
    fn open_in(
        file: hdf5::File,
        filepath: &Path,
        data_path: &str,
        indices_path: &str,
        indptr_path: &str,
        nrow: usize,
        ncol: usize,
        layout: Option<TenxLayout>,
    ) -> Result<TenxMatrix<T>, MatrixError> {
        let t0 = Instant::now();
        let data = vector(&file, data_path)?;
        let indices = vector(&file, indices_path)?;
        let indptr = vector(&file, indptr_path)?;

        let element_type = element_type(&data, data_path)?;
        if element_type.is_float() && !T::ELEMENT_TYPE.is_float() {
            warn!(
                "{data_path} holds {element_type} values, reading them as {} truncates",
                T::ELEMENT_TYPE
            );
        }

        let full_indptr = read_offsets(&indptr, 0..indptr.size(), indptr_path)?;
        let seed = SparseMatrixSeed::validated(
            nrow,
            ncol,
            &full_indptr,
            data.size(),
            indices.size(),
            element_type,
            SeedSource::Hdf5 {
                filepath: filepath.to_path_buf(),
                data_path: data_path.to_string(),
                indices_path: indices_path.to_string(),
                indptr_path: indptr_path.to_string(),
            },
        )?;

        info!(
            "opened {} x {} matrix with {} nonzeros from {} in {:.3}s",
            nrow,
            ncol,
            seed.nnz(),
            filepath.display(),
            t0.elapsed().as_secs_f64()
        );

        Ok(TenxMatrix {
            seed,
            layout,
            file,
            data,
            indices,
            indptr,
            _t: PhantomData,
        })
    }

    /// Path of the HDF5 file backing the matrix
    pub fn filepath(&self) -> PathBuf {
        match self.seed.source() {
            SeedSource::Hdf5 { filepath, .. } => filepath.clone(),
            SeedSource::Memory => PathBuf::new(),
        }
    }

    /// Group the matrix was opened from, if opened with `open`.
    pub fn group(&self) -> Option<&str> {
        self.layout.as_ref().map(TenxLayout::group)
    }

    /// Logical chunk shape: one full column.
    pub fn chunk_dim(&self) -> [usize; 2] {
        [self.seed.nrow(), 1]
    }

    /// HDF5 chunk shape of the `data` dataset, or `None` if it is stored contiguously.
    pub fn data_chunk(&self) -> Option<Vec<usize>> {
        self.data.chunk()
    }

    /// Feature annotation (v3 `features/*`, or v2 `genes`/`gene_names`).
    pub fn features(&self) -> Result<Option<TenxFeatures>, MatrixError> {
        let Some(layout) = &self.layout else {
            return Ok(None);
        };

        if let Some(ids) = read_strings(&self.file, &layout.feature_ids())? {
            let names = read_strings(&self.file, &layout.feature_names())?.unwrap_or_default();
            let feature_types = read_strings(&self.file, &layout.feature_types())?.unwrap_or_default();
            return Ok(Some(TenxFeatures {
                ids,
                names,
                feature_types,
            }));
        }

        if let Some(ids) = read_strings(&self.file, &layout.gene_ids())? {
            let names = read_strings(&self.file, &layout.gene_names())?.unwrap_or_default();
            let feature_types = vec!["Gene Expression".to_string(); ids.len()];
            return Ok(Some(TenxFeatures {
                ids,
                names,
                feature_types,
            }));
        }

        Ok(None)
    }

    /// Cell barcodes, one per column.
    pub fn barcodes(&self) -> Result<Option<Vec<String>>, MatrixError> {
        match &self.layout {
            Some(layout) => read_strings(&self.file, &layout.barcodes()),
            None => Ok(None),
        }
    }

    /// Feature ids as row names and barcodes as column names.
    pub fn dimnames(&self) -> Result<MatrixDimnames, MatrixError> {
        let rows = self.features()?.map(|f| f.ids);
        let cols = self.barcodes()?;
        MatrixDimnames::checked(rows, cols, self.seed.shape())
    }

    fn read_window(&self, cols: &Range<usize>) -> Result<Vec<usize>, MatrixError> {
        read_offsets(&self.indptr, cols.start..cols.end + 1, &indptr_path(&self.seed))
    }
}

impl<T: H5Value> ColumnStore for TenxMatrix<T> {
    type Value = T;

    fn seed(&self) -> &SparseMatrixSeed {
        &self.seed
    }

    fn read_column_range(&self, cols: Range<usize>) -> Result<ColumnChunk<T>, MatrixError> {
        self.seed.check_col_range(&cols)?;
        if cols.is_empty() {
            return Ok(ColumnChunk::empty(cols.start));
        }

        let window = self.read_window(&cols)?;
        let (lo, hi) = (window[0], window[window.len() - 1]);
        if lo > hi || hi > self.seed.nnz() {
            return Err(MatrixError::format(format!(
                "indptr window {lo}..{hi} for columns {}..{} is invalid",
                cols.start, cols.end
            )));
        }

        let data = read_slice::<T>(&self.data, lo..hi)?;
        let indices = read_offsets(&self.indices, lo..hi, "indices")?;
        debug!("read columns {}..{}: {} nonzeros", cols.start, cols.end, hi - lo);

        ColumnChunk::new(cols, window, indices, data, self.seed.nrow())
    }

    fn col_nnz(&self, cols: Range<usize>) -> Result<Vec<usize>, MatrixError> {
        self.seed.check_col_range(&cols)?;
        if cols.is_empty() {
            return Ok(Vec::new());
        }
        let window = self.read_window(&cols)?;
        tenx_types::seed::check_monotonic(&window, cols.start)?;
        Ok(window.windows(2).map(|w| w[1] - w[0]).collect())
    }
}

fn indptr_path(seed: &SparseMatrixSeed) -> String {
    match seed.source() {
        SeedSource::Hdf5 { indptr_path, .. } => indptr_path.clone(),
        SeedSource::Memory => "indptr".to_string(),
    }
}

fn dataset(file: &hdf5::File, path: &str) -> Result<Dataset, MatrixError> {
    if !file.link_exists(path) {
        return Err(MatrixError::format(format!("no dataset at {path}")));
    }
    file.dataset(path).map_err(h5err)
}

/// Open a dataset that must be one-dimensional.
fn vector(file: &hdf5::File, path: &str) -> Result<Dataset, MatrixError> {
    let ds = dataset(file, path)?;
    if ds.ndim() != 1 {
        return Err(MatrixError::format(format!(
            "{path}: expected a 1-d array, found shape {:?}",
            ds.shape()
        )));
    }
    Ok(ds)
}

fn element_type(ds: &Dataset, path: &str) -> Result<ElementType, MatrixError> {
    let descriptor = ds.dtype().and_then(|t| t.to_descriptor()).map_err(h5err)?;
    let ty = match descriptor {
        TypeDescriptor::Integer(IntSize::U8) => ElementType::I64,
        TypeDescriptor::Integer(_) => ElementType::I32,
        TypeDescriptor::Unsigned(IntSize::U8) => ElementType::U64,
        TypeDescriptor::Unsigned(_) => ElementType::U32,
        TypeDescriptor::Float(FloatSize::U4) => ElementType::F32,
        TypeDescriptor::Float(_) => ElementType::F64,
        other => {
            return Err(MatrixError::format(format!(
                "{path}: unsupported element type {other:?}"
            )))
        }
    };
    Ok(ty)
}

/// One contiguous hyperslab read. An empty range does no I/O.
fn read_slice<V: hdf5::H5Type>(ds: &Dataset, range: Range<usize>) -> Result<Vec<V>, MatrixError> {
    if range.is_empty() {
        return Ok(Vec::new());
    }
    let arr = ds.read_slice_1d::<V, _>(s![range.start..range.end]).map_err(h5err)?;
    Ok(arr.to_vec())
}

/// Read integer offsets or row indices, rejecting negative values.
fn read_offsets(ds: &Dataset, range: Range<usize>, what: &str) -> Result<Vec<usize>, MatrixError> {
    read_slice::<i64>(ds, range)?
        .into_iter()
        .map(|v| to_usize(v, what))
        .collect()
}

fn to_usize(v: i64, what: &str) -> Result<usize, MatrixError> {
    usize::try_from(v).map_err(|_| MatrixError::format(format!("{what}: negative value {v}")))
}
