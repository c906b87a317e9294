//! # tenx-block: block-wise evaluation over column-compressed matrices
//!
//! Any `ColumnStore` can be read as dense windows (`read_dense_block`) or as per-column
//! nonzero listings (`extract_nonzero_data_by_col`). A `Grid` tiles the matrix into
//! windows sized by a byte budget, and `block_apply` runs a function over every window on
//! a worker pool configured by an explicit `BlockConfig`.

#![deny(warnings)]

/// Parallel iteration over grid blocks
pub mod apply;

/// Worker count and block size settings
pub mod config;

/// Tiling a matrix into viewports
pub mod grid;

/// Dense block and nonzero-by-column readers
pub mod materialize;

pub mod summary;

pub use apply::{block_apply, chunk_apply};
pub use config::BlockConfig;
pub use grid::{col_auto_grid, row_auto_grid, Grid, Viewport};
pub use materialize::{extract_nonzero_data_by_col, read_dense_block};
