use crate::config::BlockConfig;
use crate::grid::Grid;
use crate::materialize::read_dense_block;
use anyhow::{Context, Error};
use log::info;
use rayon::prelude::*;
use std::time::Instant;
use tenx_types::{ColumnChunk, ColumnStore, DenseBlock};

/// Run `f` on the dense materialization of every viewport of `grid`.
///
/// Blocks are read and processed on a pool of `config.workers` threads. Results come back
/// in grid order; the first error aborts the remaining blocks.
pub fn block_apply<S, R, F>(store: &S, grid: &Grid, config: &BlockConfig, f: F) -> Result<Vec<R>, Error>
where
    S: ColumnStore + ?Sized,
    R: Send,
    F: Fn(&DenseBlock<S::Value>) -> Result<R, Error> + Send + Sync,
{
    check_grid(store, grid)?;
    let t0 = Instant::now();
    info!(
        "processing {} blocks of a {} x {} matrix on {} workers",
        grid.len(),
        grid.shape()[0],
        grid.shape()[1],
        config.workers
    );

    let pool = config.thread_pool()?;
    let results = pool.install(|| {
        grid.viewports()
            .par_iter()
            .map(|vp| {
                let block = read_dense_block(store, vp.rows.clone(), vp.cols.clone())
                    .with_context(|| format!("reading block rows {:?} cols {:?}", vp.rows, vp.cols))?;
                f(&block)
            })
            .collect::<Result<Vec<R>, Error>>()
    })?;

    info!("processed {} blocks in {:.3}s", grid.len(), t0.elapsed().as_secs_f64());
    Ok(results)
}

/// Run `f` on the sparse column range of every viewport of `grid`, skipping the dense
/// expansion. Row ranges of the viewports are ignored; use a column grid.
pub fn chunk_apply<S, R, F>(store: &S, grid: &Grid, config: &BlockConfig, f: F) -> Result<Vec<R>, Error>
where
    S: ColumnStore + ?Sized,
    R: Send,
    F: Fn(&ColumnChunk<S::Value>) -> Result<R, Error> + Send + Sync,
{
    check_grid(store, grid)?;
    let t0 = Instant::now();
    let pool = config.thread_pool()?;
    let results = pool.install(|| {
        grid.viewports()
            .par_iter()
            .map(|vp| {
                let chunk = store
                    .read_column_range(vp.cols.clone())
                    .with_context(|| format!("reading columns {:?}", vp.cols))?;
                f(&chunk)
            })
            .collect::<Result<Vec<R>, Error>>()
    })?;

    info!("processed {} column chunks in {:.3}s", grid.len(), t0.elapsed().as_secs_f64());
    Ok(results)
}

fn check_grid<S: ColumnStore + ?Sized>(store: &S, grid: &Grid) -> Result<(), Error> {
    if grid.shape() != store.shape() {
        anyhow::bail!(
            "grid for a {:?} matrix does not fit a {:?} matrix",
            grid.shape(),
            store.shape()
        );
    }
    Ok(())
}
