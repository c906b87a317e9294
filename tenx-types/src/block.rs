use ndarray::{Array2, ArrayView2};
use std::ops::Range;

/// Dense materialization of a rectangular window of a sparse matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct DenseBlock<T> {
    rows: Range<usize>,
    cols: Range<usize>,
    values: Array2<T>,
}

impl<T> DenseBlock<T> {
    /// `values` must have shape `(rows.len(), cols.len())`.
    pub fn new(rows: Range<usize>, cols: Range<usize>, values: Array2<T>) -> DenseBlock<T> {
        assert_eq!(values.dim(), (rows.len(), cols.len()), "block shape mismatch");
        DenseBlock { rows, cols, values }
    }

    /// Rows of the full matrix covered by the block
    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    /// Columns of the full matrix covered by the block
    pub fn cols(&self) -> Range<usize> {
        self.cols.clone()
    }

    /// Shape in [rows, cols] of the block
    pub fn shape(&self) -> [usize; 2] {
        [self.rows.len(), self.cols.len()]
    }

    /// Row-major values, indexed relative to the block origin
    pub fn view(&self) -> ArrayView2<'_, T> {
        self.values.view()
    }

    pub fn into_array(self) -> Array2<T> {
        self.values
    }
}

impl<T: Copy> DenseBlock<T> {
    /// Value at (row, col) in full-matrix coordinates
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if !self.rows.contains(&row) || !self.cols.contains(&col) {
            return None;
        }
        Some(self.values[(row - self.rows.start, col - self.cols.start)])
    }
}

/// Nonzero values of a set of columns, with their row positions dropped.
///
/// Entry `i` belongs to `cols()[i]`; columns keep the order (and repeats) of the request.
/// Values of one column are in the order they are stored on disk.
#[derive(Clone, Debug, PartialEq)]
pub struct NonzeroByColumn<T> {
    cols: Vec<usize>,
    values: Vec<Vec<T>>,
}

impl<T> NonzeroByColumn<T> {
    pub fn new(cols: Vec<usize>, values: Vec<Vec<T>>) -> NonzeroByColumn<T> {
        assert_eq!(cols.len(), values.len(), "one value list per column");
        NonzeroByColumn { cols, values }
    }

    /// The requested columns
    pub fn cols(&self) -> &[usize] {
        &self.cols
    }

    /// Number of requested columns
    pub fn len(&self) -> usize {
        self.cols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cols.is_empty()
    }

    /// Nonzero values of the `i`-th requested column
    pub fn get(&self, i: usize) -> Option<&[T]> {
        self.values.get(i).map(Vec::as_slice)
    }

    /// Iterate over (column, values) in request order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[T])> {
        self.cols.iter().copied().zip(self.values.iter().map(Vec::as_slice))
    }

    pub fn into_values(self) -> Vec<Vec<T>> {
        self.values
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dense_block_get() {
        let block = DenseBlock::new(2..4, 1..3, array![[1, 0], [0, 2]]);
        assert_eq!(block.shape(), [2, 2]);
        assert_eq!(block.get(2, 1), Some(1));
        assert_eq!(block.get(3, 2), Some(2));
        assert_eq!(block.get(1, 1), None);
        assert_eq!(block.get(2, 3), None);
    }

    #[test]
    #[should_panic]
    fn test_dense_block_shape_mismatch() {
        DenseBlock::new(0..1, 0..3, array![[1, 2]]);
    }

    #[test]
    fn test_nonzero_by_column() {
        let nz = NonzeroByColumn::new(vec![2, 0, 2], vec![vec![9], vec![5, 7], vec![9]]);
        assert_eq!(nz.len(), 3);
        assert_eq!(nz.get(1), Some(&[5, 7][..]));
        assert_eq!(nz.get(3), None);
        let cols: Vec<usize> = nz.iter().map(|(c, _)| c).collect();
        assert_eq!(cols, vec![2, 0, 2]);
    }
}
