use crate::math::Real;
use na::{DMatrix, DVector};

/// A dense sub-matrix stored at a given offset of a [`BlockSparseMatrix`].
#[derive(Clone, Debug, PartialEq)]
pub struct Block {
    /// The row of the top-left element of this block.
    pub row: usize,
    /// The column of the top-left element of this block.
    pub col: usize,
    /// The values of this block.
    pub values: DMatrix<Real>,
}

/// A sparse matrix made of a list of dense blocks.
///
/// Elements covered by no block are zero. Setting a block at the place and
/// with the shape of an existing one replaces it; any other overlapping
/// blocks are summed.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockSparseMatrix {
    nrows: usize,
    ncols: usize,
    blocks: Vec<Block>,
}

impl BlockSparseMatrix {
    /// Creates a zero matrix with the given dimensions.
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self {
            nrows,
            ncols,
            blocks: Vec::new(),
        }
    }

    /// The number of rows of this matrix.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// The number of columns of this matrix.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// The blocks of this matrix.
    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Sets the block with its top-left element at `(row, col)`.
    ///
    /// A block previously set at the same place with the same shape is replaced.
    ///
    /// # Panics
    /// If the block does not fit in this matrix.
    pub fn set_block(&mut self, row: usize, col: usize, values: DMatrix<Real>) {
        assert!(
            row + values.nrows() <= self.nrows && col + values.ncols() <= self.ncols,
            "block out of bounds"
        );

        if let Some(block) = self.blocks.iter_mut().find(|b| {
            b.row == row && b.col == col && b.values.shape() == values.shape()
        }) {
            block.values = values;
        } else {
            self.blocks.push(Block { row, col, values });
        }
    }

    /// Computes `self * x`.
    pub fn mul_vector(&self, x: &DVector<Real>) -> DVector<Real> {
        let mut out = DVector::zeros(self.nrows);

        for b in &self.blocks {
            let (r, c) = b.values.shape();
            out.rows_mut(b.row, r)
                .gemv(1.0, &b.values, &x.rows(b.col, c), 1.0);
        }

        out
    }

    /// Computes `self.transpose() * x`.
    pub fn tr_mul_vector(&self, x: &DVector<Real>) -> DVector<Real> {
        let mut out = DVector::zeros(self.ncols);

        for b in &self.blocks {
            let (r, c) = b.values.shape();
            out.rows_mut(b.col, c)
                .gemv_tr(1.0, &b.values, &x.rows(b.row, r), 1.0);
        }

        out
    }

    /// Converts this matrix to a dense matrix.
    pub fn to_dense(&self) -> DMatrix<Real> {
        let mut out = DMatrix::zeros(self.nrows, self.ncols);

        for b in &self.blocks {
            let mut view = out.view_mut((b.row, b.col), b.values.shape());
            view += &b.values;
        }

        out
    }
}
