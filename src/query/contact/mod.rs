//! Contact queries between balls and convex polygons.

pub use self::contact::Contact;
pub use self::contact_ball_ball::contact_ball_ball;
pub use self::contact_polygon_ball::{contact_ball_polygon, contact_polygon_ball};
pub use self::contact_polygon_polygon::contact_polygon_polygon;
pub use self::voronoi::{in_edge_region, in_vertex_region, test_voronoi_region};

mod contact;
mod contact_ball_ball;
mod contact_polygon_ball;
mod contact_polygon_polygon;
mod voronoi;
