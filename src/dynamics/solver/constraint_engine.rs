use crate::dynamics::solver::{
    Collision, ForceConstraint, ForceConstraintRows, ImpulseConstraint,
};
use crate::dynamics::{BodyHandle, BodySet, IntegrationParameters, PhysicsState};
use crate::linalg::{
    solve_bicg, solve_dense, BorderedDiagonalIdentityMatrix, IdentityPreconditioner, IncompleteLu,
    LinearOperator, SolverError, WeightedNormalMatrix,
};
use crate::math::Real;
use crate::query::CollisionPair;
use crate::utils::SortedPair;
use crate::SimulationError;
use hashbrown::HashSet;
use indexmap::IndexMap;
use na::DVector;

/// The identifier of a force or impulse constraint registered to a world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConstraintHandle(pub(crate) u32);

/// Solves for constraint forces and collision impulses.
///
/// Force constraints are solved at every derivative evaluation of the
/// integrator. Collision impulses are solved once per confirmed contact,
/// together with the user impulse constraints.
#[derive(Default)]
pub struct ConstraintEngine {
    force_constraints: IndexMap<ConstraintHandle, Box<dyn ForceConstraint>>,
    impulse_constraints: IndexMap<ConstraintHandle, Box<dyn ImpulseConstraint>>,
    no_collisions: HashSet<SortedPair<BodyHandle>>,
    resting_contacts: Vec<SortedPair<BodyHandle>>,
    next_id: u32,
}

impl ConstraintEngine {
    /// Creates an engine without any constraint.
    pub fn new() -> Self {
        Self::default()
    }

    fn next_handle(&mut self) -> ConstraintHandle {
        let handle = ConstraintHandle(self.next_id);
        self.next_id += 1;
        handle
    }

    /// Registers a force constraint.
    pub fn insert_force_constraint(
        &mut self,
        constraint: Box<dyn ForceConstraint>,
    ) -> ConstraintHandle {
        let handle = self.next_handle();
        let _ = self.force_constraints.insert(handle, constraint);
        handle
    }

    /// Registers an impulse constraint taking part in every collision solve.
    pub fn insert_impulse_constraint(
        &mut self,
        constraint: Box<dyn ImpulseConstraint>,
    ) -> ConstraintHandle {
        let handle = self.next_handle();
        let _ = self.impulse_constraints.insert(handle, constraint);
        handle
    }

    /// Unregisters a force constraint.
    pub fn remove_force_constraint(
        &mut self,
        handle: ConstraintHandle,
    ) -> Option<Box<dyn ForceConstraint>> {
        self.force_constraints.shift_remove(&handle)
    }

    /// Unregisters an impulse constraint.
    pub fn remove_impulse_constraint(
        &mut self,
        handle: ConstraintHandle,
    ) -> Option<Box<dyn ImpulseConstraint>> {
        self.impulse_constraints.shift_remove(&handle)
    }

    /// Gets a registered force constraint.
    pub fn force_constraint(&self, handle: ConstraintHandle) -> Option<&dyn ForceConstraint> {
        self.force_constraints.get(&handle).map(|c| &**c)
    }

    /// Gets a registered impulse constraint.
    pub fn impulse_constraint(&self, handle: ConstraintHandle) -> Option<&dyn ImpulseConstraint> {
        self.impulse_constraints.get(&handle).map(|c| &**c)
    }

    /// The total number of rows of the force constraint system.
    pub fn num_force_rows(&self) -> usize {
        self.force_constraints.values().map(|c| c.num_rows()).sum()
    }

    /// The total number of border rows of the user impulse constraints.
    pub fn num_impulse_rows(&self) -> usize {
        self.impulse_constraints.values().map(|c| c.num_rows()).sum()
    }

    /// Turns off collisions between two bodies.
    pub fn set_no_collisions(&mut self, body1: BodyHandle, body2: BodyHandle) {
        let _ = self.no_collisions.insert(SortedPair::new(body1, body2));
    }

    /// Turns collisions between two bodies back on.
    pub fn remove_no_collisions(&mut self, body1: BodyHandle, body2: BodyHandle) {
        let _ = self.no_collisions.remove(&SortedPair::new(body1, body2));
    }

    /// Are collisions between these two bodies turned off?
    pub fn has_no_collisions(&self, body1: BodyHandle, body2: BodyHandle) -> bool {
        self.no_collisions.contains(&SortedPair::new(body1, body2))
    }

    /// Forgets every suppressed pair involving one of the given bodies.
    pub(crate) fn purge_bodies(&mut self, removed: &[BodyHandle]) {
        self.no_collisions
            .retain(|pair| !removed.iter().any(|h| pair.contains(h)));
        self.resting_contacts
            .retain(|pair| !removed.iter().any(|h| pair.contains(h)));
    }

    /// The pairs found at rest by the last collision solve.
    pub fn resting_contacts(&self) -> &[SortedPair<BodyHandle>] {
        &self.resting_contacts
    }

    /// Computes the generalized forces `Jᵗλ` enforcing the force constraints.
    ///
    /// The multipliers solve `J W Jᵗ λ = -J̇ q̇ - J W F - (ks C + kd Ċ)`, where
    /// `F` are the external forces, `W` the inverse masses, and `ks`, `kd` the
    /// Baumgarte gains.
    pub fn constraint_forces(
        &self,
        bodies: &BodySet,
        state: &PhysicsState,
        external_forces: &DVector<Real>,
        params: &IntegrationParameters,
    ) -> Result<DVector<Real>, SimulationError> {
        let dof = state.dof();
        let nrows = self.num_force_rows();
        if nrows == 0 {
            return Ok(DVector::zeros(dof));
        }

        let mut rows = ForceConstraintRows::new(nrows, dof);
        let mut row = 0;
        for constraint in self.force_constraints.values() {
            constraint.assemble(row, bodies, state, &mut rows)?;
            row += constraint.num_rows();
        }

        let qdot = state.velocities();
        let weights = state.inv_mass_diagonal();
        let feedback = &rows.position_error * params.baumgarte_position_gain
            + &rows.velocity_error * params.baumgarte_velocity_gain;
        let b = -rows.jacobian_dot.mul_vector(&qdot)
            - rows.jacobian.mul_vector(&weights.component_mul(external_forces))
            - feedback;

        let a = WeightedNormalMatrix::new(&rows.jacobian, weights);
        let lambda = match solve_bicg(
            &a,
            &b,
            DVector::zeros(nrows),
            2 * dof,
            params.force_solver_tolerance,
            &IdentityPreconditioner,
        ) {
            Ok(lambda) => lambda,
            Err(err) => {
                log::warn!("force constraint solve failed ({err}), using a dense factorization");
                solve_dense(a.to_dense(), &b)?
            }
        };

        Ok(rows.jacobian.tr_mul_vector(&lambda))
    }

    /// Resolves every contact of `contacts`, one after the other.
    ///
    /// Each contact is solved with an impulse system made of the current
    /// velocities, the user impulse constraints, and a transient [`Collision`].
    /// Afterwards the features and contact of the pair are cleared, and pairs
    /// with a near-zero relative velocity are recorded as resting contacts.
    pub fn apply_collision_responses(
        &mut self,
        contacts: &[SortedPair<BodyHandle>],
        pairs: &mut IndexMap<SortedPair<BodyHandle>, CollisionPair>,
        bodies: &BodySet,
        state: &mut PhysicsState,
        params: &IntegrationParameters,
    ) -> Result<(), SimulationError> {
        self.resting_contacts.clear();

        for key in contacts {
            let Some(pair) = pairs.get_mut(key) else {
                continue;
            };
            let Some(contact) = pair.contact else {
                continue;
            };

            let mut collision = Collision::new(
                pair.body1,
                contact.arm1,
                pair.body2,
                contact.arm2,
                contact.normal,
                contact.relative_velocity,
            );
            if pair.sticky {
                collision = collision.sticky();
            }

            self.solve_impulses(&collision, bodies, state, params)?;

            if contact.relative_velocity.abs() < params.resting_velocity_threshold {
                log::trace!("{:?} and {:?} are resting", pair.body1, pair.body2);
                self.resting_contacts.push(*key);
            }

            pair.clear();
        }

        Ok(())
    }

    fn solve_impulses(
        &self,
        collision: &Collision,
        bodies: &BodySet,
        state: &mut PhysicsState,
        params: &IntegrationParameters,
    ) -> Result<(), SimulationError> {
        let dof = state.dof();
        let border = self.num_impulse_rows() + collision.num_rows();
        let size = dof + border;

        let mut matrix = BorderedDiagonalIdentityMatrix::new(size, border);
        let mut rhs = DVector::zeros(size);
        rhs.rows_mut(0, dof).copy_from(&state.velocities());

        let mut row = dof;
        for constraint in self.impulse_constraints.values() {
            constraint.assemble(row, bodies, state, &mut matrix, &mut rhs)?;
            row += constraint.num_rows();
        }
        let collision_row = row;
        collision.assemble(collision_row, bodies, state, &mut matrix, &mut rhs)?;

        let answers = solve_bordered(&matrix, &rhs, params.impulse_solver_tolerance)?;

        let mut row = dof;
        for constraint in self.impulse_constraints.values() {
            constraint.apply_impulses(row, &answers, bodies, state)?;
            row += constraint.num_rows();
        }
        collision.apply_impulses(collision_row, &answers, bodies, state)
    }
}

/// Solves the impulse system, escalating from the cheapest method to the most robust.
fn solve_bordered(
    matrix: &BorderedDiagonalIdentityMatrix,
    rhs: &DVector<Real>,
    tolerance: Real,
) -> Result<DVector<Real>, SolverError> {
    let max_iterations = 2 * matrix.size();
    let x0 = DVector::zeros(matrix.size());

    solve_bicg(
        matrix,
        rhs,
        x0.clone(),
        max_iterations,
        tolerance,
        &IdentityPreconditioner,
    )
    .or_else(|err| {
        log::debug!("impulse solve failed ({err}), retrying with an ILU preconditioner");
        let ilu = IncompleteLu::new(&matrix.to_dense())?;
        solve_bicg(matrix, rhs, x0, max_iterations, tolerance, &ilu)
    })
    .or_else(|err| {
        log::warn!("preconditioned impulse solve failed ({err}), using a dense factorization");
        solve_dense(matrix.to_dense(), rhs)
    })
}
