use crate::math::{Real, Rotation, Vector};
use crate::shape::{Ball, ConvexPolygon};
use downcast_rs::{impl_downcast, DowncastSync};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
/// Enum representing the type of a shape.
pub enum ShapeType {
    /// A ball shape, i.e., a circle.
    Ball = 0,
    /// A convex polygon shape.
    ConvexPolygon,
    /// A shape defined outside of this crate.
    ///
    /// The narrow-phase has no contact test for custom shapes and reports
    /// them as unsupported.
    Custom,
}

/// Trait implemented by shapes attached to rigid bodies.
pub trait Shape: DowncastSync {
    /// Gets the type tag of this shape.
    fn shape_type(&self) -> ShapeType;

    /// The moment of inertia of this shape about its local origin, for the given mass.
    fn angular_inertia(&self, mass: Real) -> Real;

    /// The largest distance between the local origin and a point of this shape.
    ///
    /// Unlike [`Shape::half_extents`], this bound does not depend on the orientation.
    fn bounding_radius(&self) -> Real;

    /// The half-extents of the world-space axis-aligned box enclosing this shape
    /// once rotated by `rotation`.
    fn half_extents(&self, rotation: &Rotation<Real>) -> Vector<Real>;
}

impl_downcast!(sync Shape);

impl dyn Shape {
    /// Converts this abstract shape to the given shape, if it is one.
    pub fn as_shape<T: Shape>(&self) -> Option<&T> {
        self.downcast_ref()
    }

    /// Converts this abstract shape to a ball, if it is one.
    pub fn as_ball(&self) -> Option<&Ball> {
        self.downcast_ref()
    }

    /// Converts this abstract shape to a convex polygon, if it is one.
    pub fn as_convex_polygon(&self) -> Option<&ConvexPolygon> {
        self.downcast_ref()
    }
}
