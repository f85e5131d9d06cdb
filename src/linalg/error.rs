use crate::math::Real;

/// Failure of one of the linear solvers.
///
/// The constraint engine recovers from these by switching to the next solver
/// tier. Only a failure of the dense solve reaches the caller.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq)]
pub enum SolverError {
    /// The iterative solver did not reach the requested tolerance.
    #[error("no convergence after {iterations} iterations (relative residual: {residual})")]
    NoConvergence {
        /// The number of iterations performed.
        iterations: usize,
        /// The relative residual reached by the last iterate.
        residual: Real,
    },
    /// A division by zero occurred inside the iterative solver.
    #[error("the bi-conjugate gradient iterations broke down")]
    Breakdown,
    /// A zero pivot was met while building the incomplete factorization.
    #[error("zero pivot at row {row} of the incomplete factorization")]
    ZeroPivot {
        /// The row of the zero pivot.
        row: usize,
    },
    /// The dense factorization found the matrix singular.
    #[error("the system matrix is singular")]
    Singular,
}
