use crate::{write_tenx_matrix, TenxMatrix};
use ndarray::{array, Array1};
use std::path::PathBuf;
use std::sync::Arc;
use tenx_block::{extract_nonzero_data_by_col, read_dense_block, BlockConfig};
use tenx_types::{to_csmat, ColumnStore, CscMatrix, TenxFeatures};

fn temp_h5(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tenx-h5-{}-{name}.h5", std::process::id()))
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(std::string::ToString::to_string).collect()
}

fn example() -> CscMatrix<i32> {
    CscMatrix::from_parts(4, 3, vec![0, 2, 2, 3], vec![0, 3, 1], vec![5, 7, 9]).unwrap()
}

fn example_features() -> TenxFeatures {
    TenxFeatures {
        ids: strings(&["ENSG01", "ENSG02", "ENSG03", "AB01"]),
        names: strings(&["G1", "G2", "G3", "CD3"]),
        feature_types: strings(&["Gene Expression", "Gene Expression", "Gene Expression", "Antibody Capture"]),
    }
}

/// 50 x 40 matrix with a deterministic scatter of nonzeros and a few empty columns
fn patterned() -> CscMatrix<i32> {
    let (nrow, ncol) = (50, 40);
    let mut indptr = vec![0];
    let mut indices = Vec::new();
    let mut data = Vec::new();
    for c in 0..ncol {
        if c % 9 != 4 {
            for r in 0..nrow {
                if (r * 7 + c * 3) % 5 == 0 {
                    indices.push(r);
                    data.push((r + c + 1) as i32);
                }
            }
        }
        indptr.push(indices.len());
    }
    CscMatrix::from_parts(nrow, ncol, indptr, indices, data).unwrap()
}

/// Write CSC arrays as-is, without any validation, under `/matrix`.
fn write_raw(path: &PathBuf, indptr: &[i64], indices: &[i64], data: &[i32], shape: [i32; 2]) {
    let file = hdf5::File::create(path).unwrap();
    let g = file.create_group("matrix").unwrap();
    g.new_dataset_builder()
        .with_data(&Array1::from(data.to_vec()))
        .create("data")
        .unwrap();
    g.new_dataset_builder()
        .with_data(&Array1::from(indices.to_vec()))
        .create("indices")
        .unwrap();
    g.new_dataset_builder()
        .with_data(&Array1::from(indptr.to_vec()))
        .create("indptr")
        .unwrap();
    g.new_dataset_builder()
        .with_data(&Array1::from(shape.to_vec()))
        .create("shape")
        .unwrap();
}

#[test]
fn test_open_example() {
    let path = temp_h5("example");
    let barcodes = strings(&["AAACCTGA-1", "AAACCTGC-1", "AAACGGGT-1"]);
    write_tenx_matrix(&path, "matrix", &example(), Some(&example_features()), Some(&barcodes)).unwrap();

    let m = TenxMatrix::<i32>::open(&path, "matrix").unwrap();
    assert_eq!(m.shape(), [4, 3]);
    assert_eq!(m.nnz(), 3);
    assert_eq!(m.sparsity(), 0.75);
    assert!(m.is_sparse());
    assert_eq!(m.chunk_dim(), [4, 1]);
    assert_eq!(m.group(), Some("/matrix"));
    assert_eq!(m.filepath(), path);

    let chunk = m.read_column_range(0..3).unwrap();
    let cols: Vec<Vec<(usize, i32)>> = chunk.iter().map(|s| s.iter().collect()).collect();
    assert_eq!(cols, vec![vec![(0, 5), (3, 7)], vec![], vec![(1, 9)]]);

    let tail = m.read_column_range(1..3).unwrap();
    assert_eq!(tail.nnz(), 1);
    assert_eq!(tail.column(2).unwrap().values, &[9]);

    assert_eq!(m.col_nnz(0..3).unwrap(), vec![2, 0, 1]);

    let dimnames = m.dimnames().unwrap();
    assert_eq!(dimnames.row_names.unwrap()[3], "AB01");
    assert_eq!(dimnames.col_names.unwrap(), barcodes);
    let features = m.features().unwrap().unwrap();
    assert_eq!(features.indices_of_type("Antibody Capture"), vec![3]);
    assert_eq!(features.names[0], "G1");

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_empty_and_out_of_range() {
    let path = temp_h5("ranges");
    write_tenx_matrix(&path, "matrix", &example(), None, None).unwrap();
    let m = TenxMatrix::<i32>::open(&path, "/matrix/").unwrap();

    for c in 0..=3 {
        let chunk = m.read_column_range(c..c).unwrap();
        assert!(chunk.is_empty());
        assert_eq!(chunk.nnz(), 0);
    }
    assert!(m.read_column_range(0..4).unwrap_err().is_range());
    #[allow(clippy::reversed_empty_ranges)]
    let reversed = 2..1;
    assert!(m.read_column_range(reversed).unwrap_err().is_range());
    assert!(m.col_nnz(3..4).unwrap_err().is_range());

    // no names stored
    let dimnames = m.dimnames().unwrap();
    assert!(dimnames.row_names.is_none());
    assert!(dimnames.col_names.is_none());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_values_converted_on_read() {
    let path = temp_h5("convert");
    write_tenx_matrix(&path, "matrix", &example(), None, None).unwrap();
    let m = TenxMatrix::<f64>::open(&path, "matrix").unwrap();
    assert_eq!(m.seed().element_type(), tenx_types::ElementType::I32);
    let chunk = m.read_column_range(0..1).unwrap();
    assert_eq!(chunk.values(), &[5.0, 7.0]);
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_open_paths() {
    let path = temp_h5("paths");
    {
        let file = hdf5::File::create(&path).unwrap();
        let g = file.create_group("custom").unwrap();
        g.new_dataset_builder()
            .with_data(&Array1::from(vec![5.5f32, 7.0, 9.25]))
            .create("x")
            .unwrap();
        g.new_dataset_builder()
            .with_data(&Array1::from(vec![0i64, 3, 1]))
            .create("i")
            .unwrap();
        g.new_dataset_builder()
            .with_data(&Array1::from(vec![0i64, 2, 2, 3]))
            .create("p")
            .unwrap();
    }

    let m = TenxMatrix::<f32>::open_paths(&path, "custom/x", "custom/i", "custom/p", 4, 3).unwrap();
    assert_eq!(m.group(), None);
    assert_eq!(m.seed().element_type(), tenx_types::ElementType::F32);
    assert_eq!(m.read_column_range(2..3).unwrap().values(), &[9.25]);
    assert!(m.features().unwrap().is_none());

    // shape disagreeing with indptr
    let e = TenxMatrix::<f32>::open_paths(&path, "custom/x", "custom/i", "custom/p", 4, 2).unwrap_err();
    assert!(e.is_format());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_format_errors() {
    // decreasing indptr
    let path = temp_h5("decreasing");
    write_raw(&path, &[0, 2, 1, 3], &[0, 3, 1], &[5, 7, 9], [4, 3]);
    assert!(TenxMatrix::<i32>::open(&path, "matrix").unwrap_err().is_format());
    std::fs::remove_file(&path).unwrap();

    // nnz disagrees with data length
    let path = temp_h5("short-data");
    write_raw(&path, &[0, 2, 2, 3], &[0, 3, 1], &[5, 7], [4, 3]);
    assert!(TenxMatrix::<i32>::open(&path, "matrix").unwrap_err().is_format());
    std::fs::remove_file(&path).unwrap();

    // row index out of bounds is only seen when the column is read
    let path = temp_h5("bad-row");
    write_raw(&path, &[0, 2, 2, 3], &[0, 3, 4], &[5, 7, 9], [4, 3]);
    let m = TenxMatrix::<i32>::open(&path, "matrix").unwrap();
    assert!(m.read_column_range(0..2).is_ok());
    assert!(m.read_column_range(2..3).unwrap_err().is_format());
    std::fs::remove_file(&path).unwrap();

    // missing datasets
    let path = temp_h5("missing");
    write_raw(&path, &[0, 2, 2, 3], &[0, 3, 1], &[5, 7, 9], [4, 3]);
    assert!(TenxMatrix::<i32>::open(&path, "nope").unwrap_err().is_format());
    std::fs::remove_file(&path).unwrap();

    // no file at all
    let e = TenxMatrix::<i32>::open(temp_h5("does-not-exist"), "matrix").unwrap_err();
    assert!(e.is_io());
}

#[test]
fn test_matches_in_memory() {
    let path = temp_h5("patterned");
    let mem = patterned();
    write_tenx_matrix(&path, "matrix", &mem, None, None).unwrap();
    let h5 = TenxMatrix::<i32>::open(&path, "matrix").unwrap();

    assert_eq!(h5.nnz(), mem.nnz());
    for (a, b) in [(0, 40), (0, 1), (3, 17), (13, 14), (39, 40), (22, 22)] {
        assert_eq!(h5.read_column_range(a..b).unwrap(), mem.read_column_range(a..b).unwrap());
        assert_eq!(h5.col_nnz(a..b).unwrap(), mem.col_nnz(a..b).unwrap());
    }

    // repeated reads are identical
    assert_eq!(h5.read_column_range(5..25).unwrap(), h5.read_column_range(5..25).unwrap());

    let csmat = to_csmat(&h5).unwrap();
    assert_eq!(csmat, mem.to_csmat().unwrap());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_concurrent_readers() {
    let path = temp_h5("threads");
    let mem = patterned();
    write_tenx_matrix(&path, "matrix", &mem, None, None).unwrap();
    let h5 = Arc::new(TenxMatrix::<i32>::open(&path, "matrix").unwrap());

    std::thread::scope(|s| {
        for t in 0..4 {
            let h5 = h5.clone();
            let mem = &mem;
            s.spawn(move || {
                for start in (t * 10..(t + 1) * 10).step_by(3) {
                    let cols = start..(start + 3).min(40);
                    assert_eq!(
                        h5.read_column_range(cols.clone()).unwrap(),
                        mem.read_column_range(cols).unwrap()
                    );
                }
            });
        }
    });

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_blocks_from_file() {
    let path = temp_h5("blocks");
    write_tenx_matrix(&path, "matrix", &example(), None, None).unwrap();
    let m = TenxMatrix::<i32>::open(&path, "matrix").unwrap();

    let block = read_dense_block(&m, 0..4, 0..3).unwrap();
    assert_eq!(block.view(), array![[5, 0, 0], [0, 0, 9], [0, 0, 0], [7, 0, 0]].view());

    let nz = extract_nonzero_data_by_col(&m, &[0, 1, 2]).unwrap();
    assert_eq!(nz.into_values(), vec![vec![5, 7], vec![], vec![9]]);
    assert!(extract_nonzero_data_by_col(&m, &[3]).unwrap_err().is_range());

    let config = BlockConfig::new(2, 16);
    let sums = tenx_block::summary::row_sums(&m, &config).unwrap();
    assert_eq!(sums, array![5.0, 9.0, 0.0, 7.0]);

    std::fs::remove_file(&path).unwrap();
}
