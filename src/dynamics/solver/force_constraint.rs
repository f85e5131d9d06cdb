use crate::dynamics::{BodySet, PhysicsState};
use crate::linalg::BlockSparseMatrix;
use crate::math::Real;
use crate::SimulationError;
use downcast_rs::{impl_downcast, DowncastSync};
use na::DVector;

/// The rows of the continuous constraint system, filled by every force constraint.
///
/// Each vector and matrix has one row per constraint equation. The
/// matrices have one column per degree of freedom of the world.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceConstraintRows {
    /// The Jacobian `J = ∂C/∂q`.
    pub jacobian: BlockSparseMatrix,
    /// The time derivative of the Jacobian.
    pub jacobian_dot: BlockSparseMatrix,
    /// The constraint values `C`, zero when the constraint is satisfied.
    pub position_error: DVector<Real>,
    /// The constraint velocities `Ċ`.
    pub velocity_error: DVector<Real>,
}

impl ForceConstraintRows {
    /// Allocates `nrows` zero rows for a world with `dof` degrees of freedom.
    pub fn new(nrows: usize, dof: usize) -> Self {
        Self {
            jacobian: BlockSparseMatrix::new(nrows, dof),
            jacobian_dot: BlockSparseMatrix::new(nrows, dof),
            position_error: DVector::zeros(nrows),
            velocity_error: DVector::zeros(nrows),
        }
    }
}

/// A holonomic constraint enforced by continuous forces.
///
/// Force constraints stay registered until explicitly removed, and take part
/// in every derivative evaluation of the integrator.
pub trait ForceConstraint: DowncastSync {
    /// The number of scalar equations of this constraint.
    fn num_rows(&self) -> usize;

    /// Writes the rows `row..row + self.num_rows()` of the constraint system.
    fn assemble(
        &self,
        row: usize,
        bodies: &BodySet,
        state: &PhysicsState,
        out: &mut ForceConstraintRows,
    ) -> Result<(), SimulationError>;
}

impl_downcast!(sync ForceConstraint);
