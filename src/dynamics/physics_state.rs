use crate::math::{BodyVector, Isometry, Point, Real, Vector, BODY_DOF};
use crate::utils;
use na::DVector;

/// The global state vectors of all the bodies registered to a world.
///
/// Body `i` owns the slots `3i..3i + 3` of every per-degree-of-freedom
/// vector, in the order `(x, y, angle)`. The state vector is split in two
/// halves: positions first, then velocities.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsState {
    state: DVector<Real>,
    last_state: DVector<Real>,
    saved_positions: DVector<Real>,
    inv_mass: DVector<Real>,
    forces: DVector<Real>,
}

impl Default for PhysicsState {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsState {
    /// Creates the state of an empty world.
    pub fn new() -> Self {
        Self {
            state: DVector::zeros(0),
            last_state: DVector::zeros(0),
            saved_positions: DVector::zeros(0),
            inv_mass: DVector::zeros(0),
            forces: DVector::zeros(0),
        }
    }

    /// The number of bodies stored in this state.
    #[inline]
    pub fn num_bodies(&self) -> usize {
        self.inv_mass.len() / BODY_DOF
    }

    /// The total number of degrees of freedom, i.e., the length of each half of the state vector.
    #[inline]
    pub fn dof(&self) -> usize {
        self.inv_mass.len()
    }

    /// The full state vector `[positions ; velocities]`.
    #[inline]
    pub fn state_vector(&self) -> &DVector<Real> {
        &self.state
    }

    /// Overwrites the full state vector.
    ///
    /// # Panics
    /// If `state` does not have `2 * self.dof()` elements.
    pub fn set_state_vector(&mut self, state: DVector<Real>) {
        assert_eq!(state.len(), 2 * self.dof(), "state vector length mismatch");
        self.state = state;
    }

    /// The velocity half of the state vector.
    pub fn velocities(&self) -> DVector<Real> {
        self.state.rows(self.dof(), self.dof()).clone_owned()
    }

    /// The diagonal of the inverse mass matrix.
    #[inline]
    pub fn inv_mass_diagonal(&self) -> &DVector<Real> {
        &self.inv_mass
    }

    /// The accumulated external forces and torques.
    #[inline]
    pub fn forces(&self) -> &DVector<Real> {
        &self.forces
    }

    /// The position of the center of the `i`-th body.
    #[inline]
    pub fn position(&self, i: usize) -> Point<Real> {
        Point::new(self.state[i * BODY_DOF], self.state[i * BODY_DOF + 1])
    }

    /// The orientation of the `i`-th body, wrapped into `[0, 2π)`.
    #[inline]
    pub fn orientation(&self, i: usize) -> Real {
        utils::normalize_angle(self.state[i * BODY_DOF + 2])
    }

    /// The pose of the `i`-th body.
    #[inline]
    pub fn pose(&self, i: usize) -> Isometry<Real> {
        let p = self.state.fixed_rows::<3>(i * BODY_DOF);
        Isometry::new(Vector::new(p[0], p[1]), p[2])
    }

    /// The linear velocity of the `i`-th body.
    #[inline]
    pub fn linvel(&self, i: usize) -> Vector<Real> {
        let k = self.dof() + i * BODY_DOF;
        Vector::new(self.state[k], self.state[k + 1])
    }

    /// The angular velocity of the `i`-th body.
    #[inline]
    pub fn angvel(&self, i: usize) -> Real {
        self.state[self.dof() + i * BODY_DOF + 2]
    }

    /// The velocity of the point of the `i`-th body located at `arm` from its center.
    #[inline]
    pub fn velocity_at_arm(&self, i: usize, arm: &Vector<Real>) -> Vector<Real> {
        self.linvel(i) + Vector::new(-arm.y, arm.x) * self.angvel(i)
    }

    /// Sets the position and orientation of the `i`-th body.
    pub fn set_pose(&mut self, i: usize, position: &Point<Real>, orientation: Real) {
        self.state
            .fixed_rows_mut::<3>(i * BODY_DOF)
            .copy_from(&BodyVector::new(position.x, position.y, orientation));
    }

    /// Sets the linear velocity of the `i`-th body.
    pub fn set_linvel(&mut self, i: usize, linvel: &Vector<Real>) {
        let k = self.dof() + i * BODY_DOF;
        self.state[k] = linvel.x;
        self.state[k + 1] = linvel.y;
    }

    /// Sets the angular velocity of the `i`-th body.
    pub fn set_angvel(&mut self, i: usize, angvel: Real) {
        let k = self.dof() + i * BODY_DOF + 2;
        self.state[k] = angvel;
    }

    /// The inverse mass of the `i`-th body.
    #[inline]
    pub fn inv_mass(&self, i: usize) -> Real {
        self.inv_mass[i * BODY_DOF]
    }

    /// The inverse moment of inertia of the `i`-th body.
    #[inline]
    pub fn inv_inertia(&self, i: usize) -> Real {
        self.inv_mass[i * BODY_DOF + 2]
    }

    /// The external force accumulated on the `i`-th body.
    #[inline]
    pub fn force(&self, i: usize) -> Vector<Real> {
        Vector::new(self.forces[i * BODY_DOF], self.forces[i * BODY_DOF + 1])
    }

    /// The external torque accumulated on the `i`-th body.
    #[inline]
    pub fn torque(&self, i: usize) -> Real {
        self.forces[i * BODY_DOF + 2]
    }

    /// Adds a force to the accumulator of the `i`-th body.
    pub fn add_force(&mut self, i: usize, force: &Vector<Real>) {
        self.forces[i * BODY_DOF] += force.x;
        self.forces[i * BODY_DOF + 1] += force.y;
    }

    /// Adds a torque to the accumulator of the `i`-th body.
    pub fn add_torque(&mut self, i: usize, torque: Real) {
        self.forces[i * BODY_DOF + 2] += torque;
    }

    /// Resets all the force and torque accumulators to zero.
    pub fn clear_forces(&mut self) {
        self.forces.fill(0.0);
    }

    /// Appends a body and returns its index.
    pub fn push_body(
        &mut self,
        position: &Point<Real>,
        orientation: Real,
        linvel: &Vector<Real>,
        angvel: Real,
        inv_mass: Real,
        inv_inertia: Real,
    ) -> usize {
        let index = self.num_bodies();
        let dof = self.dof();
        let pos = BodyVector::new(position.x, position.y, orientation);
        let vel = BodyVector::new(linvel.x, linvel.y, angvel);

        let mut state = DVector::zeros(2 * (dof + BODY_DOF));
        state.rows_mut(0, dof).copy_from(&self.state.rows(0, dof));
        state.fixed_rows_mut::<3>(dof).copy_from(&pos);
        state
            .rows_mut(dof + BODY_DOF, dof)
            .copy_from(&self.state.rows(dof, dof));
        state
            .fixed_rows_mut::<3>(2 * dof + BODY_DOF)
            .copy_from(&vel);

        let mut saved_positions = DVector::zeros(dof + BODY_DOF);
        saved_positions
            .rows_mut(0, dof)
            .copy_from(&self.saved_positions);
        saved_positions.fixed_rows_mut::<3>(dof).copy_from(&pos);

        self.inv_mass = DVector::from_iterator(
            dof + BODY_DOF,
            self.inv_mass
                .iter()
                .copied()
                .chain([inv_mass, inv_mass, inv_inertia]),
        );

        // The last state of a new body is its current state.
        let mut last_state = state.clone();
        last_state
            .rows_mut(0, dof)
            .copy_from(&self.last_state.rows(0, dof));
        last_state
            .rows_mut(dof + BODY_DOF, dof)
            .copy_from(&self.last_state.rows(dof, dof));

        self.state = state;
        self.last_state = last_state;
        self.saved_positions = saved_positions;
        self.forces = DVector::zeros(self.dof());
        index
    }

    /// Keeps only the bodies with the given indices, in the given order.
    ///
    /// The body `kept[i]` becomes the body `i`.
    pub fn retain_bodies(&mut self, kept: &[usize]) {
        let dof = self.dof();
        let new_dof = kept.len() * BODY_DOF;
        let gather = |src: &DVector<Real>, offset: usize, dst: &mut DVector<Real>, dst_offset| {
            for (new_i, old_i) in kept.iter().enumerate() {
                dst.fixed_rows_mut::<3>(dst_offset + new_i * BODY_DOF)
                    .copy_from(&src.fixed_rows::<3>(offset + old_i * BODY_DOF));
            }
        };

        let mut state = DVector::zeros(2 * new_dof);
        let mut last_state = DVector::zeros(2 * new_dof);
        let mut saved_positions = DVector::zeros(new_dof);
        let mut inv_mass = DVector::zeros(new_dof);

        gather(&self.state, 0, &mut state, 0);
        gather(&self.state, dof, &mut state, new_dof);
        gather(&self.last_state, 0, &mut last_state, 0);
        gather(&self.last_state, dof, &mut last_state, new_dof);
        gather(&self.saved_positions, 0, &mut saved_positions, 0);
        gather(&self.inv_mass, 0, &mut inv_mass, 0);

        self.state = state;
        self.last_state = last_state;
        self.saved_positions = saved_positions;
        self.inv_mass = inv_mass;
        self.forces = DVector::zeros(new_dof);
    }

    /// Saves the current positions so that [`Self::restore_pose`] can bring them back.
    pub fn backup_positions(&mut self) {
        let dof = self.dof();
        self.saved_positions.copy_from(&self.state.rows(0, dof));
    }

    /// Records the current state as the starting point of the next integration step.
    pub fn save_last_state(&mut self) {
        self.last_state.copy_from(&self.state);
    }

    /// Moves the `i`-th body to where it was a fraction of the way through the last step.
    ///
    /// The pose is extrapolated linearly from the last saved state:
    /// `last_pose + last_velocity * fraction * dt`.
    pub fn replay_pose(&mut self, i: usize, fraction: Real, dt: Real) {
        let dof = self.dof();
        let pos = self.last_state.fixed_rows::<3>(i * BODY_DOF).clone_owned();
        let vel = self
            .last_state
            .fixed_rows::<3>(dof + i * BODY_DOF)
            .clone_owned();
        self.state
            .fixed_rows_mut::<3>(i * BODY_DOF)
            .copy_from(&(pos + vel * (fraction * dt)));
    }

    /// Moves the `i`-th body to a new pose it did not reach by integration.
    ///
    /// Its last step is rewritten as a straight motion at its current
    /// velocity that ends at the new pose, so that [`Self::replay_pose`]
    /// only goes through poses leading to it.
    pub fn teleport(&mut self, i: usize, position: &Point<Real>, orientation: Real, dt: Real) {
        self.set_pose(i, position, orientation);

        let dof = self.dof();
        let pos = self.state.fixed_rows::<3>(i * BODY_DOF).clone_owned();
        let vel = self
            .state
            .fixed_rows::<3>(dof + i * BODY_DOF)
            .clone_owned();
        self.last_state
            .fixed_rows_mut::<3>(i * BODY_DOF)
            .copy_from(&(pos - vel * dt));
        self.last_state
            .fixed_rows_mut::<3>(dof + i * BODY_DOF)
            .copy_from(&vel);
        self.saved_positions
            .fixed_rows_mut::<3>(i * BODY_DOF)
            .copy_from(&pos);
    }

    /// Puts the `i`-th body back at the pose saved by [`Self::backup_positions`].
    pub fn restore_pose(&mut self, i: usize) {
        let saved = self.saved_positions.fixed_rows::<3>(i * BODY_DOF).clone_owned();
        self.state.fixed_rows_mut::<3>(i * BODY_DOF).copy_from(&saved);
    }
}
