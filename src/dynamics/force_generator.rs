use crate::dynamics::{BodyHandle, BodySet, PhysicsState};
use crate::math::{Point, Real, Vector};
use crate::SimulationError;
use downcast_rs::{impl_downcast, DowncastSync};
use indexmap::IndexMap;

/// The identifier of a force generator registered to a world.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ForceGeneratorHandle(pub(crate) u32);

/// Something that accumulates external forces on bodies.
///
/// Generators run in registration order each time the integrator evaluates
/// the state derivative, right after the accumulators are cleared.
pub trait ForceGenerator: DowncastSync {
    /// Adds this generator's forces to the bodies it affects.
    fn add_forces(&mut self, ctx: &mut ForceContext<'_>) -> Result<(), SimulationError>;
}

impl_downcast!(sync ForceGenerator);

/// The view of the world given to force generators.
pub struct ForceContext<'a> {
    bodies: &'a BodySet,
    state: &'a mut PhysicsState,
}

impl<'a> ForceContext<'a> {
    pub(crate) fn new(bodies: &'a BodySet, state: &'a mut PhysicsState) -> Self {
        Self { bodies, state }
    }

    /// The bodies of the world.
    #[inline]
    pub fn bodies(&self) -> &BodySet {
        self.bodies
    }

    /// The handles of every mobile body, ordered by state index.
    pub fn mobile_bodies(&self) -> impl Iterator<Item = BodyHandle> + '_ {
        self.bodies
            .iter()
            .filter(|(_, body)| body.is_mobile())
            .map(|(handle, _)| handle)
    }

    /// The current position of a body.
    pub fn position(&self, handle: BodyHandle) -> Result<Point<Real>, SimulationError> {
        Ok(self.state.position(self.bodies.index_of(handle)?))
    }

    /// The current orientation of a body.
    pub fn orientation(&self, handle: BodyHandle) -> Result<Real, SimulationError> {
        Ok(self.state.orientation(self.bodies.index_of(handle)?))
    }

    /// The current linear velocity of a body.
    pub fn linvel(&self, handle: BodyHandle) -> Result<Vector<Real>, SimulationError> {
        Ok(self.state.linvel(self.bodies.index_of(handle)?))
    }

    /// The current angular velocity of a body.
    pub fn angvel(&self, handle: BodyHandle) -> Result<Real, SimulationError> {
        Ok(self.state.angvel(self.bodies.index_of(handle)?))
    }

    /// The mass of a body.
    pub fn mass(&self, handle: BodyHandle) -> Result<Real, SimulationError> {
        Ok(self.bodies.try_get(handle)?.mass())
    }

    /// The force accumulated so far on a body during this evaluation.
    pub fn force(&self, handle: BodyHandle) -> Result<Vector<Real>, SimulationError> {
        Ok(self.state.force(self.bodies.index_of(handle)?))
    }

    /// Adds a force applied at the center of a body.
    pub fn add_force(
        &mut self,
        handle: BodyHandle,
        force: &Vector<Real>,
    ) -> Result<(), SimulationError> {
        let i = self.bodies.index_of(handle)?;
        self.state.add_force(i, force);
        Ok(())
    }

    /// Adds a torque to a body.
    pub fn add_torque(&mut self, handle: BodyHandle, torque: Real) -> Result<(), SimulationError> {
        let i = self.bodies.index_of(handle)?;
        self.state.add_torque(i, torque);
        Ok(())
    }

    /// Adds a force applied at the world-space `point`, which also yields a torque.
    pub fn add_force_at_point(
        &mut self,
        handle: BodyHandle,
        force: &Vector<Real>,
        point: &Point<Real>,
    ) -> Result<(), SimulationError> {
        let i = self.bodies.index_of(handle)?;
        let arm = point - self.state.position(i);
        self.state.add_force(i, force);
        self.state.add_torque(i, arm.perp(force));
        Ok(())
    }
}

/// The force generators registered to a world, in registration order.
#[derive(Default)]
pub struct ForceGeneratorSet {
    generators: IndexMap<ForceGeneratorHandle, Box<dyn ForceGenerator>>,
    next_id: u32,
}

impl ForceGeneratorSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of registered generators.
    #[inline]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Is this set empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Registers a generator.
    pub fn insert(&mut self, generator: Box<dyn ForceGenerator>) -> ForceGeneratorHandle {
        let handle = ForceGeneratorHandle(self.next_id);
        self.next_id += 1;
        let _ = self.generators.insert(handle, generator);
        handle
    }

    /// Removes a generator, keeping the order of the others.
    pub fn remove(&mut self, handle: ForceGeneratorHandle) -> Option<Box<dyn ForceGenerator>> {
        self.generators.shift_remove(&handle)
    }

    /// Is `handle` the handle of a registered generator?
    pub fn contains(&self, handle: ForceGeneratorHandle) -> bool {
        self.generators.contains_key(&handle)
    }

    /// Gets the generator with the given handle.
    pub fn get(&self, handle: ForceGeneratorHandle) -> Option<&dyn ForceGenerator> {
        self.generators.get(&handle).map(|g| &**g)
    }

    /// Gets mutably the generator with the given handle.
    pub fn get_mut(&mut self, handle: ForceGeneratorHandle) -> Option<&mut dyn ForceGenerator> {
        match self.generators.get_mut(&handle) {
            Some(g) => Some(&mut **g),
            None => None,
        }
    }

    /// Runs every generator, in registration order.
    pub fn add_forces(&mut self, ctx: &mut ForceContext<'_>) -> Result<(), SimulationError> {
        for generator in self.generators.values_mut() {
            generator.add_forces(ctx)?;
        }
        Ok(())
    }
}
