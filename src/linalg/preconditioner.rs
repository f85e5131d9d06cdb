use super::SolverError;
use crate::math::Real;
use na::{DMatrix, DVector};

/// An approximation `M` of a system matrix, applied through its inverse.
pub trait Preconditioner {
    /// Computes `M⁻¹ * r`.
    fn apply(&self, r: &DVector<Real>) -> DVector<Real>;

    /// Computes `M⁻ᵗ * r`.
    fn apply_transpose(&self, r: &DVector<Real>) -> DVector<Real>;
}

/// The identity preconditioner, i.e., no preconditioning.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IdentityPreconditioner;

impl Preconditioner for IdentityPreconditioner {
    fn apply(&self, r: &DVector<Real>) -> DVector<Real> {
        r.clone()
    }

    fn apply_transpose(&self, r: &DVector<Real>) -> DVector<Real> {
        r.clone()
    }
}

/// An incomplete LU factorization with no fill-in, ILU(0).
///
/// The factors keep the sparsity pattern of the original matrix, plus its
/// diagonal. The unit lower factor `L` and the upper factor `U` are packed
/// in the same matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct IncompleteLu {
    factors: DMatrix<Real>,
}

impl IncompleteLu {
    /// Computes the ILU(0) factorization of the square matrix `a`.
    pub fn new(a: &DMatrix<Real>) -> Result<Self, SolverError> {
        let n = a.nrows();
        let mut lu = a.clone();

        for i in 0..n {
            for k in 0..i {
                if a[(i, k)] == 0.0 {
                    continue;
                }

                let pivot = lu[(k, k)];
                if pivot == 0.0 {
                    return Err(SolverError::ZeroPivot { row: k });
                }

                let factor = lu[(i, k)] / pivot;
                lu[(i, k)] = factor;

                for j in k + 1..n {
                    if a[(i, j)] != 0.0 || i == j {
                        lu[(i, j)] -= factor * lu[(k, j)];
                    }
                }
            }

            if lu[(i, i)] == 0.0 || !lu[(i, i)].is_finite() {
                return Err(SolverError::ZeroPivot { row: i });
            }
        }

        Ok(Self { factors: lu })
    }
}

impl Preconditioner for IncompleteLu {
    fn apply(&self, r: &DVector<Real>) -> DVector<Real> {
        let lu = &self.factors;
        let n = lu.nrows();
        let mut x = r.clone();

        // Forward substitution with the unit lower factor.
        for i in 0..n {
            for k in 0..i {
                x[i] -= lu[(i, k)] * x[k];
            }
        }

        // Backward substitution with the upper factor.
        for i in (0..n).rev() {
            for k in i + 1..n {
                x[i] -= lu[(i, k)] * x[k];
            }
            x[i] /= lu[(i, i)];
        }

        x
    }

    fn apply_transpose(&self, r: &DVector<Real>) -> DVector<Real> {
        let lu = &self.factors;
        let n = lu.nrows();
        let mut x = r.clone();

        // Uᵗ is lower triangular.
        for i in 0..n {
            for k in 0..i {
                x[i] -= lu[(k, i)] * x[k];
            }
            x[i] /= lu[(i, i)];
        }

        // Lᵗ is unit upper triangular.
        for i in (0..n).rev() {
            for k in i + 1..n {
                x[i] -= lu[(k, i)] * x[k];
            }
        }

        x
    }
}

#[cfg(test)]
mod test {
    use super::{IncompleteLu, Preconditioner};
    use crate::linalg::SolverError;
    use na::{DMatrix, DVector};

    #[test]
    fn exact_on_dense_matrices() {
        // Without zeros, ILU(0) is the full LU factorization.
        let a = DMatrix::from_row_slice(3, 3, &[4.0, 1.0, 2.0, 1.0, 5.0, 1.0, 2.0, 1.0, 6.0]);
        let ilu = IncompleteLu::new(&a).unwrap();
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0]);

        assert_relative_eq!(&a * ilu.apply(&b), b, epsilon = 1.0e-12);
        assert_relative_eq!(a.tr_mul(&ilu.apply_transpose(&b)), b, epsilon = 1.0e-12);
    }

    #[test]
    fn zero_pivot() {
        let a = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);
        assert_eq!(
            IncompleteLu::new(&a),
            Err(SolverError::ZeroPivot { row: 0 })
        );
    }
}
