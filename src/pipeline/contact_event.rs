use crate::dynamics::{BodyHandle, CollisionResponse};
use crate::math::{Point, Real, UnitVector};

/// A contact confirmed during the last step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ContactEvent {
    /// The body with the smaller handle.
    pub body1: BodyHandle,
    /// The body with the larger handle.
    pub body2: BodyHandle,
    /// The world-space contact point.
    pub point: Point<Real>,
    /// The contact normal, pointing from `body2` toward `body1`.
    pub normal: UnitVector<Real>,
    /// The velocity of `body1` relative to `body2` along the normal, before the response.
    pub relative_velocity: Real,
    /// How the collision handlers of both bodies chose to resolve the contact.
    pub response: CollisionResponse,
}
