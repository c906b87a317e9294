// Command line utility for inspecting and summarizing 10x HDF5 matrices block by block

use anyhow::{bail, format_err, Context, Error};
use clap::{value_parser, Arg, ArgMatches, Command};
use flate2::write::GzEncoder;
use flate2::Compression;
use ndarray::prelude::*;
use serde::Serialize;
use std::fs::{create_dir, File};
use std::io::{BufWriter, Write};
use std::ops::Range;
use std::path::{Path, PathBuf};
use tenx_block::summary::{col_nnz, col_sums, nonzero_col_means, row_sums};
use tenx_block::{read_dense_block, BlockConfig};
use tenx_h5::TenxMatrix;
use tenx_types::{ColumnStore, ElementType};

#[derive(Serialize)]
struct MatrixInfo {
    path: PathBuf,
    group: Option<String>,
    nrow: usize,
    ncol: usize,
    nnz: usize,
    sparsity: f64,
    element_type: ElementType,
    chunk_dim: [usize; 2],
    data_chunk: Option<Vec<usize>>,
    num_features: Option<usize>,
    num_barcodes: Option<usize>,
}

pub fn main() -> Result<(), Error> {
    let matches = Command::new("tenx-cmd")
        .arg(
            Arg::new("INPUT")
                .help("10x HDF5 matrix file")
                .required(true)
                .index(1)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("GROUP")
                .help("HDF5 group holding the matrix")
                .short('g')
                .long("group")
                .default_value("matrix"),
        )
        .arg(
            Arg::new("OUT_DIR")
                .help("Output directory")
                .short('o')
                .long("out_dir")
                .default_value(".")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("CONFIG")
                .help("JSON file with block processing settings")
                .short('c')
                .long("config")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("WORKERS")
                .help("Number of worker threads")
                .short('w')
                .long("workers")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("BLOCK_SIZE")
                .help("Maximum bytes per dense block")
                .short('b')
                .long("block-size")
                .value_parser(value_parser!(usize)),
        )
        .subcommand_required(true)
        .subcommand(Command::new("info").about("Print shape, nnz and sparsity as JSON"))
        .subcommand(Command::new("col-sums").about("Write column sums to col_sums.csv.gz"))
        .subcommand(Command::new("row-sums").about("Write row sums to row_sums.csv.gz"))
        .subcommand(
            Command::new("block")
                .about("Write a dense block to block.csv.gz")
                .arg(Arg::new("ROWS").help("Row range start:end").long("rows").required(true))
                .arg(Arg::new("COLS").help("Column range start:end").long("cols").required(true)),
        )
        .subcommand(
            Command::new("nonzero")
                .about("Write nonzero counts and means of columns to nonzero.csv.gz")
                .arg(Arg::new("COLS").help("Comma separated column indices").long("cols").required(true)),
        )
        .get_matches();

    let input: &PathBuf = matches.get_one("INPUT").unwrap();
    let group: &String = matches.get_one("GROUP").unwrap();
    let out_dir: &PathBuf = matches.get_one("OUT_DIR").unwrap();
    let config = block_config(&matches)?;

    let matrix = TenxMatrix::<f64>::open(input, group).with_context(|| input.display().to_string())?;

    match matches.subcommand() {
        Some(("info", _)) => {
            let features = matrix.features()?;
            let barcodes = matrix.barcodes()?;
            let info = MatrixInfo {
                path: matrix.filepath(),
                group: matrix.group().map(str::to_string),
                nrow: matrix.shape()[0],
                ncol: matrix.shape()[1],
                nnz: matrix.nnz(),
                sparsity: matrix.sparsity(),
                element_type: matrix.seed().element_type(),
                chunk_dim: matrix.chunk_dim(),
                data_chunk: matrix.data_chunk(),
                num_features: features.map(|f| f.len()),
                num_barcodes: barcodes.map(|b| b.len()),
            };
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Some(("col-sums", _)) => {
            let sums = col_sums(&matrix, &config)?;
            let n = sums.len();
            ensure_dir(out_dir)?;
            array_to_csv(sums.into_shape((n, 1))?, out_dir.join("col_sums.csv.gz"))?;
        }
        Some(("row-sums", _)) => {
            let sums = row_sums(&matrix, &config)?;
            let n = sums.len();
            ensure_dir(out_dir)?;
            array_to_csv(sums.into_shape((n, 1))?, out_dir.join("row_sums.csv.gz"))?;
        }
        Some(("block", sub)) => {
            let rows = parse_range(sub.get_one::<String>("ROWS").unwrap())?;
            let cols = parse_range(sub.get_one::<String>("COLS").unwrap())?;
            let block = read_dense_block(&matrix, rows, cols)?;
            ensure_dir(out_dir)?;
            array_to_csv(block.into_array(), out_dir.join("block.csv.gz"))?;
        }
        Some(("nonzero", sub)) => {
            let cols = parse_cols(sub.get_one::<String>("COLS").unwrap())?;
            let counts = col_nnz(&matrix)?;
            let means = nonzero_col_means(&matrix, &cols)?;
            let mut table = Array2::<f64>::zeros((cols.len(), 3));
            for (i, (&c, &mean)) in cols.iter().zip(means.iter()).enumerate() {
                table[(i, 0)] = c as f64;
                table[(i, 1)] = counts[c] as f64;
                table[(i, 2)] = mean;
            }
            ensure_dir(out_dir)?;
            array_to_csv(table, out_dir.join("nonzero.csv.gz"))?;
        }
        _ => unreachable!("subcommand is required"),
    }

    Ok(())
}

/// Settings from the optional JSON file, overridden by explicit flags
fn block_config(matches: &ArgMatches) -> Result<BlockConfig, Error> {
    let mut config = match matches.get_one::<PathBuf>("CONFIG") {
        Some(path) => BlockConfig::from_json_file(path)?,
        None => BlockConfig::default(),
    };
    if let Some(&workers) = matches.get_one::<usize>("WORKERS") {
        config.workers = workers;
    }
    if let Some(&block_size) = matches.get_one::<usize>("BLOCK_SIZE") {
        config.block_size = block_size;
    }
    Ok(config)
}

fn ensure_dir(out_dir: &Path) -> Result<(), Error> {
    if !out_dir.exists() {
        create_dir(out_dir).with_context(|| out_dir.display().to_string())?;
    }
    Ok(())
}

/// Parse "start:end" into a half-open range
fn parse_range(s: &str) -> Result<Range<usize>, Error> {
    let (start, end) = s
        .split_once(':')
        .ok_or_else(|| format_err!("expected start:end, got {s:?}"))?;
    let start = start.trim().parse::<usize>().with_context(|| format!("bad range start in {s:?}"))?;
    let end = end.trim().parse::<usize>().with_context(|| format!("bad range end in {s:?}"))?;
    if start > end {
        bail!("range {s:?} is reversed");
    }
    Ok(start..end)
}

/// Parse "1,5,2" into column indices
fn parse_cols(s: &str) -> Result<Vec<usize>, Error> {
    s.split(',')
        .filter(|c| !c.trim().is_empty())
        .map(|c| c.trim().parse::<usize>().with_context(|| format!("bad column index {c:?}")))
        .collect()
}

pub fn array_to_csv(array: Array2<f64>, path: impl AsRef<Path>) -> Result<(), Error> {
    let mut writer = BufWriter::new(GzEncoder::new(File::create(path)?, Compression::default()));
    let num_cols = array.shape()[1];
    for row in array.axis_iter(Axis(0)) {
        for (i, entry) in row.iter().enumerate() {
            write!(writer, "{}", *entry)?;
            if i + 1 < num_cols {
                write!(writer, ",")?;
            }
        }
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}
