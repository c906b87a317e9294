//! # tenx-types: shared types for column-compressed 10x count matrices
//!
//! A matrix is described by a `SparseMatrixSeed` and read through the `ColumnStore`
//! trait, which hands out `ColumnChunk`s: the nonzero entries of a contiguous range of
//! columns. Readers built on top of it produce `DenseBlock`s and `NonzeroByColumn` listings.

#![deny(warnings)]

/// Dense blocks and per-column nonzero listings
pub mod block;
/// Owned column ranges and borrowed single-column views
pub mod chunk;
/// In-memory CSC store and `sprs` interchange
pub mod csc;
/// Row / column names of 10x matrices
pub mod dimnames;
pub mod error;
/// Matrix descriptor and CSC invariant checks
pub mod seed;
/// The `ColumnStore` trait
pub mod store;
pub mod value;

pub use block::{DenseBlock, NonzeroByColumn};
pub use chunk::{ColumnChunk, ColumnSlice};
pub use csc::{to_csmat, CscMatrix};
pub use dimnames::{MatrixDimnames, TenxFeatures};
pub use error::MatrixError;
pub use seed::{SeedSource, SparseMatrixSeed};
pub use store::ColumnStore;
pub use value::{ElementType, MatrixValue};
