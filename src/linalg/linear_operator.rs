use super::BlockSparseMatrix;
use crate::math::Real;
use na::{DMatrix, DVector};

/// A square linear map usable by the iterative solvers.
pub trait LinearOperator {
    /// The dimension of the vectors this operator acts on.
    fn dim(&self) -> usize;

    /// Computes `A * x`.
    fn apply(&self, x: &DVector<Real>) -> DVector<Real>;

    /// Computes `Aᵗ * x`.
    fn apply_transpose(&self, x: &DVector<Real>) -> DVector<Real>;

    /// Builds the dense matrix of this operator.
    fn to_dense(&self) -> DMatrix<Real>;
}

impl LinearOperator for DMatrix<Real> {
    fn dim(&self) -> usize {
        self.nrows()
    }

    fn apply(&self, x: &DVector<Real>) -> DVector<Real> {
        self * x
    }

    fn apply_transpose(&self, x: &DVector<Real>) -> DVector<Real> {
        self.tr_mul(x)
    }

    fn to_dense(&self) -> DMatrix<Real> {
        self.clone()
    }
}

/// The matrix `J * W * Jᵗ` where `W` is diagonal, never formed explicitly.
///
/// This is the effective mass matrix of a set of constraints with Jacobian
/// `J` on bodies with inverse masses `W`.
#[derive(Copy, Clone, Debug)]
pub struct WeightedNormalMatrix<'a> {
    jacobian: &'a BlockSparseMatrix,
    weights: &'a DVector<Real>,
}

impl<'a> WeightedNormalMatrix<'a> {
    /// Wraps `jacobian` and the diagonal `weights`.
    ///
    /// # Panics
    /// If `weights` does not have one entry per column of `jacobian`.
    pub fn new(jacobian: &'a BlockSparseMatrix, weights: &'a DVector<Real>) -> Self {
        assert_eq!(jacobian.ncols(), weights.len());
        Self { jacobian, weights }
    }
}

impl LinearOperator for WeightedNormalMatrix<'_> {
    fn dim(&self) -> usize {
        self.jacobian.nrows()
    }

    fn apply(&self, x: &DVector<Real>) -> DVector<Real> {
        let jt_x = self.jacobian.tr_mul_vector(x);
        self.jacobian.mul_vector(&jt_x.component_mul(self.weights))
    }

    fn apply_transpose(&self, x: &DVector<Real>) -> DVector<Real> {
        // J W Jᵗ is symmetric.
        self.apply(x)
    }

    fn to_dense(&self) -> DMatrix<Real> {
        let j = self.jacobian.to_dense();
        let jw = &j * DMatrix::from_diagonal(self.weights);
        jw * j.transpose()
    }
}

#[cfg(test)]
mod test {
    use super::WeightedNormalMatrix;
    use crate::linalg::{BlockSparseMatrix, LinearOperator};
    use na::{DMatrix, DVector};

    #[test]
    fn implicit_product_matches_dense() {
        let mut j = BlockSparseMatrix::new(2, 3);
        j.set_block(0, 0, DMatrix::from_row_slice(2, 3, &[1.0, 0.0, -2.0, 0.0, 1.0, 0.5]));
        let w = DVector::from_vec(vec![0.5, 0.5, 2.0]);
        let a = WeightedNormalMatrix::new(&j, &w);
        let x = DVector::from_vec(vec![1.0, -3.0]);

        assert_relative_eq!(a.apply(&x), a.to_dense() * &x, epsilon = 1.0e-12);
        assert_relative_eq!(a.to_dense(), a.to_dense().transpose());
    }
}
