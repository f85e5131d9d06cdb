use crate::dynamics::BodyHandle;
use crate::math::{Point, Real, UnitVector, Vector};
use crate::utils::SortedPair;

/// A contact confirmed by the narrow-phase, waiting for its collision response.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ResolvedContact {
    /// The world-space contact point.
    pub point: Point<Real>,
    /// The contact normal, pointing from the second body toward the first one.
    pub normal: UnitVector<Real>,
    /// The contact point relative to the center of the first body.
    pub arm1: Vector<Real>,
    /// The contact point relative to the center of the second body.
    pub arm2: Vector<Real>,
    /// The velocity of the first body relative to the second along the normal.
    ///
    /// This is never positive: separating bodies are not in contact.
    pub relative_velocity: Real,
}

/// Two bodies close enough for the narrow-phase to track their closest features.
///
/// Pairs are created by the broad-phase when the extents of both bodies
/// start overlapping, and destroyed when they stop overlapping. `body1`
/// always has the smaller handle.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CollisionPair {
    /// The first body.
    pub body1: BodyHandle,
    /// The second body.
    pub body2: BodyHandle,
    /// The closest features found by the last query, used to seed the next one.
    ///
    /// For a polygon and a ball, only the first index is used and it refers
    /// to the polygon.
    pub features: (usize, usize),
    /// The contact found during this step, if any.
    pub contact: Option<ResolvedContact>,
    /// Whether the contact must be resolved without restitution.
    pub sticky: bool,
    /// Whether the narrow-phase gave up on this pair until it separates.
    pub no_collision: bool,
}

impl CollisionPair {
    /// A pair without any cached feature.
    pub fn new(body1: BodyHandle, body2: BodyHandle) -> Self {
        let (body1, body2) = *SortedPair::new(body1, body2);
        Self {
            body1,
            body2,
            features: (0, 0),
            contact: None,
            sticky: false,
            no_collision: false,
        }
    }

    /// The key identifying this pair regardless of the order of its bodies.
    #[inline]
    pub fn key(&self) -> SortedPair<BodyHandle> {
        SortedPair::new(self.body1, self.body2)
    }

    /// Forgets the cached features and the contact of this pair.
    pub fn clear(&mut self) {
        self.features = (0, 0);
        self.contact = None;
        self.sticky = false;
    }
}
