use std::ops::Range;

/// Rectangular window of a matrix; the unit of block processing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl Viewport {
    /// Number of cells in the window
    pub fn len(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Non-overlapping viewports that tile a matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    shape: [usize; 2],
    viewports: Vec<Viewport>,
}

impl Grid {
    /// Full-height viewports of `ncol_per_block` columns each (the last may be narrower).
    pub fn cols(shape: [usize; 2], ncol_per_block: usize) -> Grid {
        let [nrow, ncol] = shape;
        let viewports = if nrow == 0 || ncol == 0 {
            Vec::new()
        } else {
            split(ncol, ncol_per_block)
                .map(|cols| Viewport { rows: 0..nrow, cols })
                .collect()
        };
        Grid { shape, viewports }
    }

    /// Full-width viewports of `nrow_per_block` rows each (the last may be shorter).
    pub fn rows(shape: [usize; 2], nrow_per_block: usize) -> Grid {
        let [nrow, ncol] = shape;
        let viewports = if nrow == 0 || ncol == 0 {
            Vec::new()
        } else {
            split(nrow, nrow_per_block)
                .map(|rows| Viewport { rows, cols: 0..ncol })
                .collect()
        };
        Grid { shape, viewports }
    }

    /// Shape in [rows, cols] of the tiled matrix
    pub fn shape(&self) -> [usize; 2] {
        self.shape
    }

    pub fn viewports(&self) -> &[Viewport] {
        &self.viewports
    }

    /// Number of viewports
    pub fn len(&self) -> usize {
        self.viewports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.viewports.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Viewport> {
        self.viewports.iter()
    }
}

/// Column grid whose blocks hold at most `block_size` bytes of dense values
/// (at least one column per block).
pub fn col_auto_grid(shape: [usize; 2], block_size: usize, elem_size: usize) -> Grid {
    Grid::cols(shape, per_block(block_size, shape[0] * elem_size))
}

/// Row grid whose blocks hold at most `block_size` bytes of dense values
/// (at least one row per block).
pub fn row_auto_grid(shape: [usize; 2], block_size: usize, elem_size: usize) -> Grid {
    Grid::rows(shape, per_block(block_size, shape[1] * elem_size))
}

fn per_block(block_size: usize, line_bytes: usize) -> usize {
    if line_bytes == 0 {
        return 1;
    }
    (block_size / line_bytes).max(1)
}

fn split(len: usize, step: usize) -> impl Iterator<Item = Range<usize>> {
    let step = step.max(1);
    (0..len).step_by(step).map(move |start| start..(start + step).min(len))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_col_auto_grid() {
        // 10 rows of 8 bytes, 200 bytes per block -> 2 columns per block
        let g = col_auto_grid([10, 5], 200, 8);
        let cols: Vec<_> = g.iter().map(|v| v.cols.clone()).collect();
        assert_eq!(cols, vec![0..2, 2..4, 4..5]);
        assert!(g.iter().all(|v| v.rows == (0..10)));
        assert_eq!(g.iter().map(Viewport::len).sum::<usize>(), 50);

        // blocks smaller than one column still make progress
        assert_eq!(col_auto_grid([10, 5], 1, 8).len(), 5);
        // one block covers everything
        assert_eq!(col_auto_grid([10, 5], 1 << 20, 8).len(), 1);
    }

    #[test]
    fn test_row_auto_grid() {
        let g = row_auto_grid([7, 3], 24, 4);
        let rows: Vec<_> = g.iter().map(|v| v.rows.clone()).collect();
        assert_eq!(rows, vec![0..2, 2..4, 4..6, 6..7]);
        assert!(g.iter().all(|v| v.cols == (0..3)));
    }

    #[test]
    fn test_empty_shapes() {
        assert!(col_auto_grid([0, 5], 100, 8).is_empty());
        assert!(row_auto_grid([5, 0], 100, 8).is_empty());
        assert_eq!(Grid::cols([3, 0], 2).shape(), [3, 0]);
    }
}
