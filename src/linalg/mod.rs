//! Structured matrices and the linear solvers used by the constraint engine.
//!
//! Dense storage and factorizations come from `nalgebra`. This module adds
//! the block-sparse and bordered matrix layouts of the constraint systems,
//! the bi-conjugate gradient solver, and its preconditioners.

pub use self::bicg::solve_bicg;
pub use self::block_sparse_matrix::{Block, BlockSparseMatrix};
pub use self::bordered_matrix::BorderedDiagonalIdentityMatrix;
pub use self::dense::solve_dense;
pub use self::error::SolverError;
pub use self::linear_operator::{LinearOperator, WeightedNormalMatrix};
pub use self::preconditioner::{IdentityPreconditioner, IncompleteLu, Preconditioner};

mod bicg;
mod block_sparse_matrix;
mod bordered_matrix;
mod dense;
mod error;
mod linear_operator;
mod preconditioner;
