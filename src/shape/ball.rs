use crate::math::{Real, Rotation, Vector};
use crate::shape::{Shape, ShapeType};

/// A Ball shape, i.e., a circle centered at the local origin.
#[derive(PartialEq, Debug, Copy, Clone)]
pub struct Ball {
    /// The radius of the ball.
    pub radius: Real,
}

impl Ball {
    /// Creates a new ball with the given radius.
    #[inline]
    pub fn new(radius: Real) -> Ball {
        Ball { radius }
    }
}

impl Shape for Ball {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Ball
    }

    fn angular_inertia(&self, mass: Real) -> Real {
        mass * self.radius * self.radius / 2.0
    }

    fn bounding_radius(&self) -> Real {
        self.radius
    }

    fn half_extents(&self, _: &Rotation<Real>) -> Vector<Real> {
        Vector::repeat(self.radius)
    }
}
