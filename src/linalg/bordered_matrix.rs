use super::{BlockSparseMatrix, LinearOperator};
use crate::math::Real;
use na::{DMatrix, DVector};

/// A square matrix whose top-left corner is the identity, bordered by sparse blocks.
///
/// The identity covers the first `size - border` rows and columns. Every other
/// non-zero element comes from a block set with [`Self::set_block`].
#[derive(Clone, Debug, PartialEq)]
pub struct BorderedDiagonalIdentityMatrix {
    identity_dim: usize,
    blocks: BlockSparseMatrix,
}

impl BorderedDiagonalIdentityMatrix {
    /// Creates a `size × size` matrix with a border of `border` rows and columns.
    ///
    /// # Panics
    /// If `border > size`.
    pub fn new(size: usize, border: usize) -> Self {
        assert!(border <= size, "the border cannot be larger than the matrix");
        Self {
            identity_dim: size - border,
            blocks: BlockSparseMatrix::new(size, size),
        }
    }

    /// The number of rows (and columns) of this matrix.
    #[inline]
    pub fn size(&self) -> usize {
        self.blocks.nrows()
    }

    /// The dimension of the identity part of this matrix.
    #[inline]
    pub fn identity_dim(&self) -> usize {
        self.identity_dim
    }

    /// Sets the block with its top-left element at `(row, col)`.
    ///
    /// Blocks are added on top of the identity part.
    pub fn set_block(&mut self, row: usize, col: usize, values: DMatrix<Real>) {
        self.blocks.set_block(row, col, values)
    }
}

impl LinearOperator for BorderedDiagonalIdentityMatrix {
    fn dim(&self) -> usize {
        self.size()
    }

    fn apply(&self, x: &DVector<Real>) -> DVector<Real> {
        let mut out = self.blocks.mul_vector(x);
        let mut identity_part = out.rows_mut(0, self.identity_dim);
        identity_part += x.rows(0, self.identity_dim);
        out
    }

    fn apply_transpose(&self, x: &DVector<Real>) -> DVector<Real> {
        let mut out = self.blocks.tr_mul_vector(x);
        let mut identity_part = out.rows_mut(0, self.identity_dim);
        identity_part += x.rows(0, self.identity_dim);
        out
    }

    fn to_dense(&self) -> DMatrix<Real> {
        let mut out = self.blocks.to_dense();
        for i in 0..self.identity_dim {
            out[(i, i)] += 1.0;
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::BorderedDiagonalIdentityMatrix;
    use crate::linalg::LinearOperator;
    use na::{DMatrix, DVector};

    #[test]
    fn identity_with_border() {
        let mut m = BorderedDiagonalIdentityMatrix::new(4, 1);
        m.set_block(3, 0, DMatrix::from_row_slice(1, 3, &[1.0, 2.0, 3.0]));
        m.set_block(0, 3, DMatrix::from_row_slice(3, 1, &[-1.0, 0.0, 1.0]));
        m.set_block(3, 3, DMatrix::from_element(1, 1, 4.0));

        let dense = m.to_dense();
        assert_eq!(dense[(0, 0)], 1.0);
        assert_eq!(dense[(3, 3)], 4.0);
        assert_eq!(dense[(3, 1)], 2.0);

        let x = DVector::from_vec(vec![1.0, 2.0, 3.0, 4.0]);
        assert_relative_eq!(m.apply(&x), &dense * &x);
        assert_relative_eq!(m.apply_transpose(&x), dense.tr_mul(&x));
    }
}
