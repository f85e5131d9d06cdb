//! Shapes supported by rigid2d.

pub use self::ball::Ball;
pub use self::convex_polygon::ConvexPolygon;
pub use self::polygon_features::PolygonFeatures;
pub use self::shape::{Shape, ShapeType};
pub use self::shared_shape::SharedShape;

mod ball;
mod convex_polygon;
mod polygon_features;
mod shape;
mod shared_shape;
