use crate::math::{Point, Real, UnitVector, Vector, DEFAULT_EPSILON};
use crate::query::contact::{in_edge_region, in_vertex_region};
use crate::query::Contact;
use crate::shape::PolygonFeatures;
use na::center;

/// Closest features between two convex polygons.
///
/// The features of both polygons are scanned cyclically, starting from
/// `seed`, the features found by the previous query. Returns the contact and
/// the indices of the closest features, or `None` if no feature pair is
/// mutually closest, which happens when the polygons interpenetrate.
///
/// The contact normal points from `poly2` toward `poly1`. A negative
/// distance only arises from parallel edges.
pub fn contact_polygon_polygon(
    poly1: &PolygonFeatures,
    center1: &Point<Real>,
    poly2: &PolygonFeatures,
    center2: &Point<Real>,
    seed: (usize, usize),
    parallel_tolerance: Real,
) -> Option<(Contact, (usize, usize))> {
    let n1 = poly1.len();
    let n2 = poly2.len();
    if n1 == 0 || n2 == 0 {
        return None;
    }

    for c1 in 0..n1 {
        let i = (seed.0 + c1) % n1;
        for c2 in 0..n2 {
            let j = (seed.1 + c2) % n2;
            let contact =
                closest_features(poly1, center1, i, poly2, center2, j, parallel_tolerance);
            if let Some(contact) = contact {
                return Some((contact, (i, j)));
            }
        }
    }

    None
}

fn closest_features(
    poly1: &PolygonFeatures,
    center1: &Point<Real>,
    i: usize,
    poly2: &PolygonFeatures,
    center2: &Point<Real>,
    j: usize,
    parallel_tolerance: Real,
) -> Option<Contact> {
    let a = poly1.vertex(i);
    let a_next = poly1.vertex(poly1.next(i));
    let b = poly2.vertex(j);
    let b_next = poly2.vertex(poly2.next(j));
    let normal1 = poly1.normal(i);
    let normal2 = poly2.normal(j);

    // Edge against edge, when they face each other.
    let dot = normal1.dot(&*normal2);
    if (dot + 1.0).abs() <= parallel_tolerance {
        let left = if in_edge_region(poly1, i, &b_next) {
            Some(b_next)
        } else if in_edge_region(poly2, j, &a) {
            Some(a)
        } else {
            None
        };

        let right = left.and_then(|_| {
            if in_edge_region(poly2, j, &a_next) {
                Some(a_next)
            } else if in_edge_region(poly1, i, &b) {
                Some(b)
            } else {
                None
            }
        });

        if let (Some(left), Some(right)) = (left, right) {
            let dist = (a - b).dot(&*normal2);
            return Some(Contact::new(center(&left, &right), normal2, dist));
        }
    }

    // Vertex against vertex.
    if in_vertex_region(poly1, i, &b) && in_vertex_region(poly2, j, &a) {
        let normal = UnitVector::try_new(center1 - center2, DEFAULT_EPSILON)
            .unwrap_or_else(Vector::x_axis);
        return Some(Contact::new(a, normal, (a - b).norm()));
    }

    // Vertex of the first polygon against an edge of the second.
    let edge2 = poly2.edge(j);
    let projected = b + *edge2 * (a - b).dot(&*edge2);
    if in_vertex_region(poly1, i, &projected) && in_edge_region(poly2, j, &a) {
        return Some(Contact::new(a, normal2, (a - projected).norm()));
    }

    // Edge of the first polygon against a vertex of the second.
    let edge1 = poly1.edge(i);
    let projected = a + *edge1 * (b - a).dot(&*edge1);
    if in_vertex_region(poly2, j, &projected) && in_edge_region(poly1, i, &b) {
        return Some(Contact::new(b, -normal1, (b - projected).norm()));
    }

    None
}

#[cfg(test)]
mod test {
    use super::contact_polygon_polygon;
    use crate::math::{Isometry, Point, Vector};
    use crate::shape::ConvexPolygon;

    fn square_at(x: f64, y: f64, angle: f64) -> (crate::shape::PolygonFeatures, Point<f64>) {
        let pos = Isometry::new(Vector::new(x, y), angle);
        let square = ConvexPolygon::rectangle(2.0, 2.0).unwrap();
        (square.transformed(&pos), Point::new(x, y))
    }

    #[test]
    fn stacked_squares_touch_along_parallel_edges() {
        let (top, c1) = square_at(0.5, 2.005, 0.0);
        let (bottom, c2) = square_at(0.0, 0.0, 0.0);

        let (contact, features) =
            contact_polygon_polygon(&top, &c1, &bottom, &c2, (0, 0), 0.001).unwrap();

        assert_relative_eq!(*contact.normal, Vector::y(), epsilon = 1.0e-12);
        assert_relative_eq!(contact.dist, 0.005, epsilon = 1.0e-12);
        assert_relative_eq!(contact.point.x, 0.25, epsilon = 1.0e-12);
        // Bottom edge of the top square, top edge of the bottom one.
        assert_eq!(features, (3, 1));
    }

    #[test]
    fn corner_against_face() {
        let angle = std::f64::consts::FRAC_PI_4;
        let (diamond, c1) = square_at(0.0, 2.0f64.sqrt() + 1.1, angle);
        let (floor, c2) = square_at(0.0, 0.0, 0.0);

        let (contact, _) =
            contact_polygon_polygon(&diamond, &c1, &floor, &c2, (0, 0), 0.001).unwrap();

        assert_relative_eq!(*contact.normal, Vector::y(), epsilon = 1.0e-9);
        assert_relative_eq!(contact.dist, 0.1, epsilon = 1.0e-9);
        assert_relative_eq!(contact.point, Point::new(0.0, 1.1), epsilon = 1.0e-9);

        // Swapping the polygons reverses the normal.
        let (contact, _) =
            contact_polygon_polygon(&floor, &c2, &diamond, &c1, (0, 0), 0.001).unwrap();
        assert_relative_eq!(*contact.normal, -Vector::y(), epsilon = 1.0e-9);
        assert_relative_eq!(contact.dist, 0.1, epsilon = 1.0e-9);
    }

    #[test]
    fn corners_facing_each_other() {
        let (upper, c1) = square_at(3.0, 3.0, 0.0);
        let (lower, c2) = square_at(0.0, 0.0, 0.0);

        let (contact, features) =
            contact_polygon_polygon(&upper, &c1, &lower, &c2, (0, 0), 0.001).unwrap();

        assert_eq!(features, (0, 2));
        assert_relative_eq!(contact.dist, 2.0f64.sqrt(), epsilon = 1.0e-12);
        assert_relative_eq!(contact.point, Point::new(2.0, 2.0));
        assert_relative_eq!(contact.normal.x, contact.normal.y);
    }

    #[test]
    fn deep_overlap_is_a_penetration() {
        let (a, c1) = square_at(0.2, 0.3, 0.1);
        let (b, c2) = square_at(0.0, 0.0, 0.0);
        assert!(contact_polygon_polygon(&a, &c1, &b, &c2, (0, 0), 0.001).is_none());
    }

    #[test]
    fn seed_features_are_found_first() {
        let (top, c1) = square_at(0.0, 2.5, 0.0);
        let (bottom, c2) = square_at(0.0, 0.0, 0.0);

        let (_, from_zero) =
            contact_polygon_polygon(&top, &c1, &bottom, &c2, (0, 0), 0.001).unwrap();
        let (_, from_seed) =
            contact_polygon_polygon(&top, &c1, &bottom, &c2, from_zero, 0.001).unwrap();
        assert_eq!(from_zero, from_seed);

        // Seeds past the vertex count wrap around.
        let (_, wrapped) =
            contact_polygon_polygon(&top, &c1, &bottom, &c2, (7, 9), 0.001).unwrap();
        assert_eq!(wrapped, from_zero);
    }
}
