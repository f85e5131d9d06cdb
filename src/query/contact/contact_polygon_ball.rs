use crate::math::{Point, Real, UnitVector, DEFAULT_EPSILON};
use crate::query::contact::{in_edge_region, in_vertex_region};
use crate::query::Contact;
use crate::shape::{Ball, PolygonFeatures};

/// Closest feature of a convex polygon to a ball.
///
/// The polygon features are scanned cyclically starting from `seed`.
/// Returns the contact and the index of the closest feature, or `None` if
/// the ball center lies inside the polygon.
///
/// The contact normal points from the ball toward the polygon, and the
/// contact point lies on the polygon boundary.
pub fn contact_polygon_ball(
    poly: &PolygonFeatures,
    ball_center: &Point<Real>,
    ball: &Ball,
    seed: usize,
) -> Option<(Contact, usize)> {
    let n = poly.len();

    for c in 0..n {
        let i = (seed + c) % n;
        let vertex = poly.vertex(i);

        if in_vertex_region(poly, i, ball_center) {
            let dir = vertex - ball_center;
            let normal =
                UnitVector::try_new(dir, DEFAULT_EPSILON).unwrap_or_else(|| -poly.normal(i));
            let contact = Contact::new(vertex, normal, dir.norm() - ball.radius);
            return Some((contact, i));
        }

        if in_edge_region(poly, i, ball_center) {
            let edge = poly.edge(i);
            let projected = vertex + *edge * (ball_center - vertex).dot(&*edge);
            let dist = (ball_center - projected).norm() - ball.radius;
            return Some((Contact::new(projected, -poly.normal(i), dist), i));
        }
    }

    None
}

/// Closest feature of a ball to a convex polygon.
///
/// Same as [`contact_polygon_ball`] with the normal pointing from the polygon toward the ball.
pub fn contact_ball_polygon(
    ball_center: &Point<Real>,
    ball: &Ball,
    poly: &PolygonFeatures,
    seed: usize,
) -> Option<(Contact, usize)> {
    contact_polygon_ball(poly, ball_center, ball, seed).map(|(c, i)| (c.flipped(), i))
}

#[cfg(test)]
mod test {
    use super::{contact_ball_polygon, contact_polygon_ball};
    use crate::math::{Isometry, Point, Vector};
    use crate::shape::{Ball, ConvexPolygon};

    fn floor() -> crate::shape::PolygonFeatures {
        ConvexPolygon::rectangle(10.0, 2.0)
            .unwrap()
            .transformed(&Isometry::translation(0.0, -1.0))
    }

    #[test]
    fn ball_above_a_face() {
        let (contact, feature) =
            contact_polygon_ball(&floor(), &Point::new(1.0, 1.5), &Ball::new(1.0), 0).unwrap();

        assert_eq!(feature, 1);
        assert_relative_eq!(*contact.normal, -Vector::y());
        assert_relative_eq!(contact.point, Point::new(1.0, 0.0));
        assert_relative_eq!(contact.dist, 0.5);
    }

    #[test]
    fn ball_near_a_corner() {
        let (contact, feature) =
            contact_ball_polygon(&Point::new(8.0, 4.0), &Ball::new(1.0), &floor(), 0).unwrap();

        assert_eq!(feature, 2);
        assert_relative_eq!(contact.point, Point::new(5.0, 0.0));
        assert_relative_eq!(*contact.normal, Vector::new(0.6, 0.8), epsilon = 1.0e-12);
        assert_relative_eq!(contact.dist, 4.0);
    }

    #[test]
    fn center_inside_is_a_penetration() {
        assert!(contact_polygon_ball(&floor(), &Point::new(0.0, -0.5), &Ball::new(1.0), 3).is_none());
    }
}
