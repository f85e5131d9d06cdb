use crate::dynamics::solver::{ConstraintEngine, ConstraintHandle, ForceConstraint, ImpulseConstraint};
use crate::dynamics::{
    BodyHandle, BodySet, CollisionResponse, ForceGenerator, ForceGeneratorHandle,
    ForceGeneratorSet, IntegrationParameters, PhysicsState, RigidBody,
};
use crate::integrator::{Dynamics, OdeSolver};
use crate::math::{Isometry, Point, Real, Rotation, Vector};
use crate::partitioning::SweepAndPrune;
use crate::pipeline::ContactEvent;
use crate::query::NarrowPhase;
use crate::utils::SortedPair;
use crate::SimulationError;

/// A world of rigid bodies advanced in discrete time steps.
///
/// The world owns the bodies, their state, the force generators and the
/// constraints. Each call to [`PhysicsWorld::step`]:
///
/// 1. saves the current positions,
/// 2. updates the broad-phase,
/// 3. confirms contacts with the narrow-phase,
/// 4. asks the collision handlers of the bodies in contact how to respond,
/// 5. applies the collision impulses,
/// 6. integrates the equations of motion over `dt`,
/// 7. removes the bodies whose removal was requested.
pub struct PhysicsWorld {
    params: IntegrationParameters,
    bodies: BodySet,
    state: PhysicsState,
    broad_phase: SweepAndPrune,
    narrow_phase: NarrowPhase,
    generators: ForceGeneratorSet,
    engine: ConstraintEngine,
    ode_solver: Box<dyn OdeSolver>,
    pending_removals: Vec<BodyHandle>,
    removed_bodies: Vec<(BodyHandle, RigidBody)>,
    contacts: Vec<ContactEvent>,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::with_valid_params(IntegrationParameters::default())
    }
}

impl PhysicsWorld {
    /// Creates an empty world.
    ///
    /// Fails if `params` does not pass [`IntegrationParameters::validate`].
    pub fn new(params: IntegrationParameters) -> Result<Self, SimulationError> {
        params.validate()?;
        Ok(Self::with_valid_params(params))
    }

    fn with_valid_params(params: IntegrationParameters) -> Self {
        Self {
            bodies: BodySet::new(),
            state: PhysicsState::new(),
            broad_phase: SweepAndPrune::new(params.broad_phase_padding),
            narrow_phase: NarrowPhase::new(&params),
            generators: ForceGeneratorSet::new(),
            engine: ConstraintEngine::new(),
            ode_solver: params.integrator.build(),
            pending_removals: Vec::new(),
            removed_bodies: Vec::new(),
            contacts: Vec::new(),
            params,
        }
    }

    /// The parameters of this world.
    pub fn params(&self) -> &IntegrationParameters {
        &self.params
    }

    /// Replaces the integration scheme.
    pub fn set_ode_solver(&mut self, solver: impl OdeSolver + 'static) {
        self.ode_solver = Box::new(solver);
    }

    /// The bodies of this world.
    pub fn bodies(&self) -> &BodySet {
        &self.bodies
    }

    /// The state vectors of the bodies of this world.
    pub fn state(&self) -> &PhysicsState {
        &self.state
    }

    /// The constraints of this world.
    pub fn constraints(&self) -> &ConstraintEngine {
        &self.engine
    }

    /// The contacts confirmed during the last step.
    pub fn contacts(&self) -> &[ContactEvent] {
        &self.contacts
    }

    /// The pairs found at rest by the collision responses of the last step.
    pub fn resting_contacts(&self) -> &[SortedPair<BodyHandle>] {
        self.engine.resting_contacts()
    }

    /*
     * Bodies.
     */
    /// Registers a body.
    ///
    /// The pose and velocities of `body` become its initial state. Stationary
    /// bodies never move, whatever velocity they were given.
    pub fn insert_body(&mut self, mut body: RigidBody) -> Result<BodyHandle, SimulationError> {
        body.validate()?;

        let (linvel, angvel) = if body.is_stationary() {
            (Vector::zeros(), 0.0)
        } else {
            (body.linvel(), body.angvel())
        };
        let index = self.state.push_body(
            &body.position(),
            body.orientation(),
            &linvel,
            angvel,
            body.inv_mass(),
            body.inv_angular_inertia(),
        );
        body.refresh_features_cache(&body.pose());

        let half_extents = broad_phase_extents(&body, body.orientation());
        let stationary = body.is_stationary();
        let handle = self.bodies.insert(body);
        self.broad_phase
            .register(index, handle, &half_extents, stationary, &self.state);

        log::debug!("inserted body {:?} at state index {}", handle, index);
        Ok(handle)
    }

    /// Requests the removal of a body.
    ///
    /// The body is removed at the end of the next step, after which it can
    /// be retrieved with [`Self::drain_removed_bodies`].
    pub fn remove_body(&mut self, handle: BodyHandle) -> Result<(), SimulationError> {
        if !self.bodies.contains(handle) {
            return Err(SimulationError::UnregisteredBody(handle));
        }

        if !self.pending_removals.contains(&handle) {
            self.pending_removals.push(handle);
        }
        Ok(())
    }

    /// Takes the bodies removed so far, with their final state.
    pub fn drain_removed_bodies(&mut self) -> impl Iterator<Item = (BodyHandle, RigidBody)> + '_ {
        self.removed_bodies.drain(..)
    }

    /// Gets a registered body.
    ///
    /// The pose and velocities of a registered body are only up to date
    /// through the `body_*` accessors of the world.
    pub fn body(&self, handle: BodyHandle) -> Result<&RigidBody, SimulationError> {
        self.bodies.try_get(handle)
    }

    /// The position of the center of a body.
    pub fn body_position(&self, handle: BodyHandle) -> Result<Point<Real>, SimulationError> {
        Ok(self.state.position(self.bodies.index_of(handle)?))
    }

    /// The orientation of a body, in radians.
    pub fn body_orientation(&self, handle: BodyHandle) -> Result<Real, SimulationError> {
        Ok(self.state.orientation(self.bodies.index_of(handle)?))
    }

    /// The pose of a body.
    pub fn body_pose(&self, handle: BodyHandle) -> Result<Isometry<Real>, SimulationError> {
        Ok(self.state.pose(self.bodies.index_of(handle)?))
    }

    /// The linear velocity of a body.
    pub fn body_linvel(&self, handle: BodyHandle) -> Result<Vector<Real>, SimulationError> {
        Ok(self.state.linvel(self.bodies.index_of(handle)?))
    }

    /// The angular velocity of a body.
    pub fn body_angvel(&self, handle: BodyHandle) -> Result<Real, SimulationError> {
        Ok(self.state.angvel(self.bodies.index_of(handle)?))
    }

    fn mobile_index(&self, handle: BodyHandle) -> Result<usize, SimulationError> {
        if self.bodies.try_get(handle)?.is_stationary() {
            return Err(SimulationError::StationaryBody(handle));
        }
        self.bodies.index_of(handle)
    }

    /// Sets the linear velocity of a mobile body.
    pub fn set_body_linvel(
        &mut self,
        handle: BodyHandle,
        linvel: Vector<Real>,
    ) -> Result<(), SimulationError> {
        let i = self.mobile_index(handle)?;
        self.state.set_linvel(i, &linvel);
        Ok(())
    }

    /// Sets the angular velocity of a mobile body.
    pub fn set_body_angvel(&mut self, handle: BodyHandle, angvel: Real) -> Result<(), SimulationError> {
        let i = self.mobile_index(handle)?;
        self.state.set_angvel(i, angvel);
        Ok(())
    }

    /// Teleports a body.
    ///
    /// The broad-phase catches up at the next step. If the body then
    /// penetrates another one, the time of impact is searched along its
    /// current velocity, backward from the new pose.
    pub fn set_body_pose(
        &mut self,
        handle: BodyHandle,
        position: Point<Real>,
        orientation: Real,
    ) -> Result<(), SimulationError> {
        let i = self.bodies.index_of(handle)?;
        self.state.teleport(i, &position, orientation, self.params.dt);

        if let Some(body) = self.bodies.get_mut(handle) {
            if body.is_stationary() {
                body.refresh_features_cache(&self.state.pose(i));
            }
        }
        Ok(())
    }

    /*
     * Force generators.
     */
    /// Registers a force generator.
    ///
    /// Generators run in registration order at every derivative evaluation.
    pub fn insert_force_generator(
        &mut self,
        generator: impl ForceGenerator,
    ) -> ForceGeneratorHandle {
        self.generators.insert(Box::new(generator))
    }

    /// Unregisters a force generator.
    pub fn remove_force_generator(
        &mut self,
        handle: ForceGeneratorHandle,
    ) -> Result<Box<dyn ForceGenerator>, SimulationError> {
        self.generators
            .remove(handle)
            .ok_or(SimulationError::UnknownForceGenerator(handle))
    }

    /// Gets a registered force generator, if it has type `T`.
    pub fn force_generator<T: ForceGenerator>(
        &self,
        handle: ForceGeneratorHandle,
    ) -> Result<Option<&T>, SimulationError> {
        let generator = self
            .generators
            .get(handle)
            .ok_or(SimulationError::UnknownForceGenerator(handle))?;
        Ok(generator.downcast_ref::<T>())
    }

    /// Gets mutably a registered force generator, if it has type `T`.
    pub fn force_generator_mut<T: ForceGenerator>(
        &mut self,
        handle: ForceGeneratorHandle,
    ) -> Result<Option<&mut T>, SimulationError> {
        let generator = self
            .generators
            .get_mut(handle)
            .ok_or(SimulationError::UnknownForceGenerator(handle))?;
        Ok(generator.downcast_mut::<T>())
    }

    /*
     * Constraints.
     */
    /// Registers a force constraint.
    pub fn insert_force_constraint(&mut self, constraint: impl ForceConstraint) -> ConstraintHandle {
        self.engine.insert_force_constraint(Box::new(constraint))
    }

    /// Registers an impulse constraint, taking part in every collision response.
    pub fn insert_impulse_constraint(
        &mut self,
        constraint: impl ImpulseConstraint,
    ) -> ConstraintHandle {
        self.engine.insert_impulse_constraint(Box::new(constraint))
    }

    /// Unregisters a force constraint.
    pub fn remove_force_constraint(
        &mut self,
        handle: ConstraintHandle,
    ) -> Result<Box<dyn ForceConstraint>, SimulationError> {
        self.engine
            .remove_force_constraint(handle)
            .ok_or(SimulationError::UnknownConstraint(handle))
    }

    /// Unregisters an impulse constraint.
    pub fn remove_impulse_constraint(
        &mut self,
        handle: ConstraintHandle,
    ) -> Result<Box<dyn ImpulseConstraint>, SimulationError> {
        self.engine
            .remove_impulse_constraint(handle)
            .ok_or(SimulationError::UnknownConstraint(handle))
    }

    /// Gets a registered force constraint, if it has type `T`.
    pub fn force_constraint<T: ForceConstraint>(
        &self,
        handle: ConstraintHandle,
    ) -> Result<Option<&T>, SimulationError> {
        let constraint = self
            .engine
            .force_constraint(handle)
            .ok_or(SimulationError::UnknownConstraint(handle))?;
        Ok(constraint.downcast_ref::<T>())
    }

    /// Turns off collisions between two bodies.
    pub fn set_no_collisions(
        &mut self,
        body1: BodyHandle,
        body2: BodyHandle,
    ) -> Result<(), SimulationError> {
        let _ = self.bodies.try_get(body1)?;
        let _ = self.bodies.try_get(body2)?;
        self.engine.set_no_collisions(body1, body2);
        Ok(())
    }

    /// Turns collisions between two bodies back on.
    pub fn remove_no_collisions(&mut self, body1: BodyHandle, body2: BodyHandle) {
        self.engine.remove_no_collisions(body1, body2);
    }

    /*
     * Simulation.
     */
    /// Advances the simulation by one timestep of length `dt`.
    ///
    /// Fails if two bodies have shapes without contact test, if a
    /// constraint refers to a removed body, or if a linear system could
    /// not be solved. The state of the world is inconsistent afterwards.
    pub fn step(&mut self) -> Result<(), SimulationError> {
        self.contacts.clear();
        self.state.backup_positions();
        self.broad_phase.update(&self.state);

        let colliding = self.narrow_phase.detect(
            self.broad_phase.active_pairs_mut(),
            &self.bodies,
            &mut self.state,
            &self.engine,
        )?;
        let responding = self.run_collision_handlers(&colliding);

        self.engine.apply_collision_responses(
            &responding,
            self.broad_phase.active_pairs_mut(),
            &self.bodies,
            &mut self.state,
            &self.params,
        )?;

        self.state.save_last_state();
        let mut dynamics = Dynamics::new(
            &self.bodies,
            &mut self.state,
            &mut self.generators,
            &self.engine,
            &self.params,
        );
        self.ode_solver.solve(self.params.dt, &mut dynamics)?;

        self.apply_removals();
        Ok(())
    }

    /// Asks both bodies of every contact how it must be resolved.
    ///
    /// Returns the contacts that were not ignored.
    fn run_collision_handlers(
        &mut self,
        colliding: &[SortedPair<BodyHandle>],
    ) -> Vec<SortedPair<BodyHandle>> {
        let mut responding = Vec::with_capacity(colliding.len());

        for key in colliding {
            let Some(pair) = self.broad_phase.active_pairs_mut().get_mut(key) else {
                continue;
            };
            let Some(contact) = pair.contact else {
                continue;
            };

            let response1 = notify(&mut self.bodies, pair.body1, pair.body2, &contact.point);
            let response2 = notify(&mut self.bodies, pair.body2, pair.body1, &contact.point);
            let response = response1.combine(response2);

            self.contacts.push(ContactEvent {
                body1: pair.body1,
                body2: pair.body2,
                point: contact.point,
                normal: contact.normal,
                relative_velocity: contact.relative_velocity,
                response: response.unwrap_or(CollisionResponse::Ignore),
            });

            match response {
                Some(response) => {
                    pair.sticky = response == CollisionResponse::Sticky;
                    responding.push(*key);
                }
                None => {
                    log::trace!("contact between {:?} and {:?} ignored", pair.body1, pair.body2);
                    pair.contact = None;
                }
            }
        }

        responding
    }

    /// Removes the bodies whose removal was requested, and compacts the state.
    fn apply_removals(&mut self) {
        if self.pending_removals.is_empty() {
            return;
        }

        let handles = core::mem::take(&mut self.pending_removals);
        for handle in &handles {
            let Ok(i) = self.bodies.index_of(*handle) else {
                continue;
            };
            let (position, orientation) = (self.state.position(i), self.state.orientation(i));
            let (linvel, angvel) = (self.state.linvel(i), self.state.angvel(i));
            if let Some(body) = self.bodies.get_mut(*handle) {
                body.cache_state(position, orientation, linvel, angvel);
            }
        }

        let (removed, kept) = self.bodies.remove_batch(&handles);
        self.state.retain_bodies(&kept);
        self.engine.purge_bodies(&handles);
        self.rebuild_broad_phase();

        log::debug!("removed {} bodies", removed.len());
        self.removed_bodies.extend(removed);
    }

    fn rebuild_broad_phase(&mut self) {
        self.broad_phase.clear();

        for index in 0..self.bodies.len() {
            let Some(handle) = self.bodies.handle_at(index) else {
                continue;
            };
            let Some(body) = self.bodies.get(handle) else {
                continue;
            };

            let half_extents = broad_phase_extents(body, self.state.orientation(index));
            self.broad_phase.register(
                index,
                handle,
                &half_extents,
                body.is_stationary(),
                &self.state,
            );
        }
    }
}

/// Runs the collision handler of `this`, if it has one.
fn notify(
    bodies: &mut BodySet,
    this: BodyHandle,
    other: BodyHandle,
    point: &Point<Real>,
) -> CollisionResponse {
    bodies
        .get_mut(this)
        .and_then(|body| body.collision_handler.as_mut())
        .map(|handler| handler.handle_collision(this, other, point))
        .unwrap_or_default()
}

/// The half-extents registered to the broad-phase for `body`.
///
/// Mobile bodies rotate, so their extents are bounded by a circle.
fn broad_phase_extents(body: &RigidBody, orientation: Real) -> Vector<Real> {
    let shape = body.shape();
    if body.is_stationary() {
        shape.half_extents(&Rotation::new(orientation))
    } else {
        Vector::repeat(shape.bounding_radius())
    }
}
