use crate::math::{Point, Real};
use crate::shape::{Ball, ConvexPolygon, Shape};
use core::fmt;
use core::ops::Deref;
use std::sync::Arc;

/// A reference-counted, shareable shape.
///
/// Cloning a `SharedShape` only increments a reference count, so many bodies
/// can be given the same geometry.
#[derive(Clone)]
pub struct SharedShape(pub Arc<dyn Shape>);

impl Deref for SharedShape {
    type Target = dyn Shape;

    fn deref(&self) -> &dyn Shape {
        &*self.0
    }
}

impl AsRef<dyn Shape> for SharedShape {
    fn as_ref(&self) -> &dyn Shape {
        &*self.0
    }
}

impl fmt::Debug for SharedShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SharedShape({:?})", self.0.shape_type())
    }
}

impl SharedShape {
    /// Wraps the given shape.
    pub fn new(shape: impl Shape) -> Self {
        Self(Arc::new(shape))
    }

    /// Initialize a ball shape defined by its radius.
    pub fn ball(radius: Real) -> Self {
        SharedShape(Arc::new(Ball::new(radius)))
    }

    /// Initialize a rectangle centered at the origin.
    ///
    /// Returns `None` if either dimension is not strictly positive.
    pub fn rectangle(width: Real, height: Real) -> Option<Self> {
        ConvexPolygon::rectangle(width, height).map(|p| SharedShape(Arc::new(p)))
    }

    /// Initialize a convex polygon from its clockwise vertices.
    ///
    /// Returns `None` if the polyline is not convex and clockwise.
    pub fn convex_polyline(points: Vec<Point<Real>>) -> Option<Self> {
        ConvexPolygon::from_convex_polyline(points).map(|p| SharedShape(Arc::new(p)))
    }
}
