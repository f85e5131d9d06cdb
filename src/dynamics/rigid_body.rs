use crate::dynamics::CollisionHandler;
use crate::math::{Isometry, Point, Real, Vector};
use crate::shape::{PolygonFeatures, SharedShape};
use crate::SimulationError;
use std::borrow::Cow;
use std::fmt;

/// The kind of a rigid body.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RigidBodyType {
    /// A body with a finite mass, moved by forces, constraints and contacts.
    Mobile,
    /// A body with an infinite mass that never moves.
    Stationary,
}

/// A rigid body.
///
/// The pose and velocities stored here are the ones of a body outside of a
/// world: they seed the world's state vectors when the body is inserted,
/// and receive the final state when the body is removed. While the body is
/// registered, query its state through the world.
pub struct RigidBody {
    shape: SharedShape,
    body_type: RigidBodyType,
    inv_mass: Real,
    inv_inertia: Real,
    restitution: Real,
    friction: Real,
    static_friction: Real,
    position: Point<Real>,
    orientation: Real,
    linvel: Vector<Real>,
    angvel: Real,
    pub(crate) state_index: Option<usize>,
    pub(crate) features_cache: Option<PolygonFeatures>,
    pub(crate) collision_handler: Option<Box<dyn CollisionHandler>>,
}

impl fmt::Debug for RigidBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RigidBody")
            .field("shape", &self.shape)
            .field("body_type", &self.body_type)
            .field("inv_mass", &self.inv_mass)
            .field("inv_inertia", &self.inv_inertia)
            .field("position", &self.position)
            .field("orientation", &self.orientation)
            .field("state_index", &self.state_index)
            .finish_non_exhaustive()
    }
}

impl RigidBody {
    fn new(shape: SharedShape, body_type: RigidBodyType, inv_mass: Real, inv_inertia: Real) -> Self {
        Self {
            shape,
            body_type,
            inv_mass,
            inv_inertia,
            restitution: 1.0,
            friction: 0.0,
            static_friction: 0.0,
            position: Point::origin(),
            orientation: 0.0,
            linvel: Vector::zeros(),
            angvel: 0.0,
            state_index: None,
            features_cache: None,
            collision_handler: None,
        }
    }

    /// Creates a mobile body with the given shape and mass.
    ///
    /// The moment of inertia is derived from the shape. A non-positive mass
    /// is rejected when the body is inserted into a world.
    pub fn mobile(shape: SharedShape, mass: Real) -> Self {
        let inertia = shape.angular_inertia(mass);
        let inv_inertia = if inertia > 0.0 { 1.0 / inertia } else { 0.0 };
        Self::new(shape, RigidBodyType::Mobile, 1.0 / mass, inv_inertia)
    }

    /// Creates a stationary body with the given shape.
    pub fn stationary(shape: SharedShape) -> Self {
        Self::new(shape, RigidBodyType::Stationary, 0.0, 0.0)
    }

    /// Sets the position of the body center.
    pub fn with_position(mut self, position: Point<Real>) -> Self {
        self.position = position;
        self
    }

    /// Sets the orientation of the body, in radians.
    pub fn with_orientation(mut self, orientation: Real) -> Self {
        self.orientation = orientation;
        self
    }

    /// Sets the linear velocity. Ignored for stationary bodies.
    pub fn with_linvel(mut self, linvel: Vector<Real>) -> Self {
        self.linvel = linvel;
        self
    }

    /// Sets the angular velocity. Ignored for stationary bodies.
    pub fn with_angvel(mut self, angvel: Real) -> Self {
        self.angvel = angvel;
        self
    }

    /// Sets the coefficient of restitution. Defaults to `1.0`.
    pub fn with_restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    /// Sets the coefficient of dynamic friction against the background surface.
    pub fn with_friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Sets the coefficient of static friction against the background surface.
    pub fn with_static_friction(mut self, static_friction: Real) -> Self {
        self.static_friction = static_friction;
        self
    }

    /// Overrides the moment of inertia derived from the shape.
    pub fn with_angular_inertia(mut self, inertia: Real) -> Self {
        if self.is_mobile() {
            self.inv_inertia = if inertia > 0.0 { 1.0 / inertia } else { 0.0 };
        }
        self
    }

    /// Attaches a hook called whenever this body is part of a confirmed contact.
    pub fn with_collision_handler(mut self, handler: impl CollisionHandler + 'static) -> Self {
        self.collision_handler = Some(Box::new(handler));
        self
    }

    /// The shape of this body.
    #[inline]
    pub fn shape(&self) -> &SharedShape {
        &self.shape
    }

    /// The kind of this body.
    #[inline]
    pub fn body_type(&self) -> RigidBodyType {
        self.body_type
    }

    /// Is this body mobile?
    #[inline]
    pub fn is_mobile(&self) -> bool {
        self.body_type == RigidBodyType::Mobile
    }

    /// Is this body stationary?
    #[inline]
    pub fn is_stationary(&self) -> bool {
        self.body_type == RigidBodyType::Stationary
    }

    /// The mass of this body, infinite for stationary bodies.
    pub fn mass(&self) -> Real {
        if self.inv_mass == 0.0 {
            Real::INFINITY
        } else {
            1.0 / self.inv_mass
        }
    }

    /// The inverse mass of this body, zero for stationary bodies.
    #[inline]
    pub fn inv_mass(&self) -> Real {
        self.inv_mass
    }

    /// The inverse moment of inertia of this body, zero for stationary bodies.
    #[inline]
    pub fn inv_angular_inertia(&self) -> Real {
        self.inv_inertia
    }

    /// The coefficient of restitution of this body.
    #[inline]
    pub fn restitution(&self) -> Real {
        self.restitution
    }

    /// The coefficient of dynamic friction against the background surface.
    #[inline]
    pub fn friction(&self) -> Real {
        self.friction
    }

    /// The coefficient of static friction against the background surface.
    #[inline]
    pub fn static_friction(&self) -> Real {
        self.static_friction
    }

    /// The position of this body when outside of a world.
    #[inline]
    pub fn position(&self) -> Point<Real> {
        self.position
    }

    /// The orientation of this body when outside of a world.
    #[inline]
    pub fn orientation(&self) -> Real {
        self.orientation
    }

    /// The pose of this body when outside of a world.
    pub fn pose(&self) -> Isometry<Real> {
        Isometry::new(self.position.coords, self.orientation)
    }

    /// The linear velocity of this body when outside of a world.
    #[inline]
    pub fn linvel(&self) -> Vector<Real> {
        self.linvel
    }

    /// The angular velocity of this body when outside of a world.
    #[inline]
    pub fn angvel(&self) -> Real {
        self.angvel
    }

    /// The index of this body in the state vectors of the world it is registered to.
    #[inline]
    pub fn state_index(&self) -> Option<usize> {
        self.state_index
    }

    /// Is this body registered to a world?
    #[inline]
    pub fn is_registered(&self) -> bool {
        self.state_index.is_some()
    }

    pub(crate) fn validate(&self) -> Result<(), SimulationError> {
        if self.is_mobile() && !(self.inv_mass > 0.0 && self.inv_mass.is_finite()) {
            return Err(SimulationError::InvalidMass(1.0 / self.inv_mass));
        }
        Ok(())
    }

    pub(crate) fn cache_state(
        &mut self,
        position: Point<Real>,
        orientation: Real,
        linvel: Vector<Real>,
        angvel: Real,
    ) {
        self.position = position;
        self.orientation = orientation;
        self.linvel = linvel;
        self.angvel = angvel;
    }

    /// Rebuilds the world-space polygon cache of a stationary body.
    pub(crate) fn refresh_features_cache(&mut self, pose: &Isometry<Real>) {
        self.features_cache = if self.is_stationary() {
            self.shape
                .as_convex_polygon()
                .map(|poly| poly.transformed(pose))
        } else {
            None
        };
    }

    /// The world-space features of this body's polygon at `pose`.
    ///
    /// Stationary bodies reuse their cache; mobile ones are recomputed.
    /// Returns `None` if the shape is not a convex polygon.
    pub fn polygon_features(&self, pose: &Isometry<Real>) -> Option<Cow<'_, PolygonFeatures>> {
        if let Some(cache) = &self.features_cache {
            return Some(Cow::Borrowed(cache));
        }

        self.shape
            .as_convex_polygon()
            .map(|poly| Cow::Owned(poly.transformed(pose)))
    }
}
