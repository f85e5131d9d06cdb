use crate::math::{Point, Real, UnitVector};

/// Geometric description of a contact between two shapes, in world-space.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct Contact {
    /// The contact point.
    pub point: Point<Real>,

    /// The contact normal, pointing from the second shape toward the first one.
    pub normal: UnitVector<Real>,

    /// Distance between the closest features of both shapes.
    ///
    /// If this is negative, this contact represents a penetration.
    pub dist: Real,
}

impl Contact {
    /// Creates a new contact.
    #[inline]
    pub fn new(point: Point<Real>, normal: UnitVector<Real>, dist: Real) -> Self {
        Contact {
            point,
            normal,
            dist,
        }
    }

    /// Reverses the normal of this contact.
    #[inline]
    pub fn flip(&mut self) {
        self.normal = -self.normal;
    }

    /// Returns a new contact with the reversed normal of `self`.
    #[inline]
    pub fn flipped(mut self) -> Self {
        self.flip();
        self
    }
}
