#![deny(warnings)]

//! HDF5 backed `ColumnStore` for 10x Genomics feature-barcode matrices.

/// Dataset paths of 10x matrix groups
pub mod layout;
/// Lazy CSC reader over an HDF5 file
pub mod matrix;
mod strings;
/// Writing matrices in the CellRanger v3 layout
pub mod writer;

#[cfg(test)]
mod test;

pub use layout::TenxLayout;
pub use matrix::TenxMatrix;
pub use writer::write_tenx_matrix;

use tenx_types::{MatrixError, MatrixValue};

/// Matrix values that can be read from and written to HDF5 datasets.
pub trait H5Value: MatrixValue + hdf5::H5Type {}

impl<T: MatrixValue + hdf5::H5Type> H5Value for T {}

pub(crate) fn h5err(e: hdf5::Error) -> MatrixError {
    MatrixError::io(e)
}
