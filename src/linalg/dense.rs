use super::SolverError;
use crate::math::Real;
use na::{DMatrix, DVector};

/// Solves `a * x = b` with a dense LU decomposition with partial pivoting.
pub fn solve_dense(a: DMatrix<Real>, b: &DVector<Real>) -> Result<DVector<Real>, SolverError> {
    a.lu()
        .solve(b)
        .filter(|x| x.iter().all(|v| v.is_finite()))
        .ok_or(SolverError::Singular)
}

#[cfg(test)]
mod test {
    use super::solve_dense;
    use crate::linalg::SolverError;
    use na::{DMatrix, DVector};

    #[test]
    fn solves_and_detects_singularity() {
        let a = DMatrix::from_row_slice(2, 2, &[0.0, 2.0, 1.0, 1.0]);
        let x = solve_dense(a, &DVector::from_vec(vec![4.0, 3.0])).unwrap();
        assert_relative_eq!(x, DVector::from_vec(vec![1.0, 2.0]));

        let singular = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        assert_eq!(
            solve_dense(singular, &DVector::from_vec(vec![1.0, 1.0])),
            Err(SolverError::Singular)
        );
    }
}
