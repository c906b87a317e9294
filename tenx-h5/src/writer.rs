use crate::layout::TenxLayout;
use crate::strings::to_fixed_ascii;
use crate::H5Value;
use anyhow::{Context, Error};
use ndarray::Array1;
use std::path::Path;
use tenx_types::{ColumnStore, CscMatrix, MatrixDimnames, TenxFeatures};

/// Write `matrix` to a new HDF5 file in the CellRanger v3 layout under `group`:
/// `data`, `indices`, `indptr` and `shape`, plus `features/*` and `barcodes` when given.
/// An existing file at `filepath` is truncated.
pub fn write_tenx_matrix<T: H5Value>(
    filepath: impl AsRef<Path>,
    group: &str,
    matrix: &CscMatrix<T>,
    features: Option<&TenxFeatures>,
    barcodes: Option<&[String]>,
) -> Result<(), Error> {
    let filepath = filepath.as_ref();
    let [nrow, ncol] = matrix.shape();
    MatrixDimnames::checked(
        features.map(|f| f.ids.clone()),
        barcodes.map(<[String]>::to_vec),
        [nrow, ncol],
    )?;

    let layout = TenxLayout::new(group);
    let file = hdf5::File::create(filepath).with_context(|| filepath.display().to_string())?;
    let g = if layout.group() == "/" {
        file.group("/")?
    } else {
        file.create_group(layout.group())?
    };

    g.new_dataset_builder()
        .with_data(&Array1::from(matrix.data().to_vec()))
        .create("data")?;
    g.new_dataset_builder()
        .with_data(&to_i64(matrix.indices()))
        .create("indices")?;
    g.new_dataset_builder()
        .with_data(&to_i64(matrix.indptr()))
        .create("indptr")?;
    g.new_dataset_builder()
        .with_data(&Array1::from(vec![nrow as i32, ncol as i32]))
        .create("shape")?;

    if let Some(features) = features {
        let fg = g.create_group("features")?;
        for (name, values) in [
            ("id", &features.ids),
            ("name", &features.names),
            ("feature_type", &features.feature_types),
        ] {
            if values.is_empty() && nrow > 0 {
                continue;
            }
            fg.new_dataset_builder()
                .with_data(&Array1::from(to_fixed_ascii(values)?))
                .create(name)?;
        }
    }

    if let Some(barcodes) = barcodes {
        g.new_dataset_builder()
            .with_data(&Array1::from(to_fixed_ascii(barcodes)?))
            .create("barcodes")?;
    }

    Ok(())
}

fn to_i64(v: &[usize]) -> Array1<i64> {
    v.iter().map(|&x| x as i64).collect()
}
