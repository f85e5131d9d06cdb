use crate::dynamics::{BodySet, PhysicsState};
use crate::linalg::BorderedDiagonalIdentityMatrix;
use crate::math::Real;
use crate::SimulationError;
use downcast_rs::{impl_downcast, DowncastSync};
use na::DVector;

/// A constraint on velocities resolved by instantaneous impulses.
///
/// The impulse system is a bordered matrix: its first `DOF` rows and columns
/// map the post-impulse velocities to the current ones, and every impulse
/// constraint appends its own rows and columns to the border.
pub trait ImpulseConstraint: DowncastSync {
    /// The number of border rows used by this constraint.
    fn num_rows(&self) -> usize;

    /// Writes the blocks and right-hand side entries of this constraint.
    ///
    /// `row` is the first border row owned by this constraint.
    fn assemble(
        &self,
        row: usize,
        bodies: &BodySet,
        state: &PhysicsState,
        matrix: &mut BorderedDiagonalIdentityMatrix,
        rhs: &mut DVector<Real>,
    ) -> Result<(), SimulationError>;

    /// Applies the impulses found by the solver, read from `answers[row..]`.
    fn apply_impulses(
        &self,
        row: usize,
        answers: &DVector<Real>,
        bodies: &BodySet,
        state: &mut PhysicsState,
    ) -> Result<(), SimulationError>;
}

impl_downcast!(sync ImpulseConstraint);
