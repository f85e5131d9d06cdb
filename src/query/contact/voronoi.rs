use crate::math::{Point, Real, Vector};
use crate::shape::PolygonFeatures;

/// Tests whether `point` lies in the region bounded by two rays starting at `vertex`.
///
/// The point is inside if its projections on both rays are positive, or
/// non-negative if `inclusive` is `true`.
#[inline]
pub fn test_voronoi_region(
    vertex: &Point<Real>,
    ray1: &Vector<Real>,
    ray2: &Vector<Real>,
    point: &Point<Real>,
    inclusive: bool,
) -> bool {
    let connector = point - vertex;
    let proj1 = ray1.dot(&connector);
    let proj2 = ray2.dot(&connector);

    if inclusive {
        proj1 >= 0.0 && proj2 >= 0.0
    } else {
        proj1 > 0.0 && proj2 > 0.0
    }
}

/// Is `point` strictly inside the Voronoi region of the `i`-th vertex of `poly`?
///
/// The region is bounded by the normals of the two edges adjacent to the vertex.
#[inline]
pub fn in_vertex_region(poly: &PolygonFeatures, i: usize, point: &Point<Real>) -> bool {
    test_voronoi_region(
        &poly.vertex(i),
        &poly.normal(poly.prev(i)),
        &poly.normal(i),
        point,
        false,
    )
}

/// Is `point` inside, or on the boundary of, the Voronoi region of the `i`-th edge of `poly`?
///
/// The region is the half-strip swept by the edge along its normal.
#[inline]
pub fn in_edge_region(poly: &PolygonFeatures, i: usize, point: &Point<Real>) -> bool {
    let edge = poly.edge(i);
    let normal = poly.normal(i);
    test_voronoi_region(&poly.vertex(i), &normal, &edge, point, true)
        && test_voronoi_region(&poly.vertex(poly.next(i)), &-*edge, &normal, point, true)
}

#[cfg(test)]
mod test {
    use super::{in_edge_region, in_vertex_region, test_voronoi_region};
    use crate::math::{Isometry, Point, Vector};
    use crate::shape::ConvexPolygon;

    #[test]
    fn boundary_points_are_only_inclusive() {
        let v = Point::origin();
        let (x, y) = (Vector::x(), Vector::y());
        assert!(test_voronoi_region(&v, &x, &y, &Point::new(1.0, 1.0), false));
        assert!(!test_voronoi_region(&v, &x, &y, &Point::new(1.0, 0.0), false));
        assert!(test_voronoi_region(&v, &x, &y, &Point::new(1.0, 0.0), true));
        assert!(!test_voronoi_region(&v, &x, &y, &Point::new(-1.0, 1.0), true));
    }

    #[test]
    fn regions_of_a_square() {
        // Vertices (-1, -1), (-1, 1), (1, 1), (1, -1); edge 1 is the top side.
        let square = ConvexPolygon::rectangle(2.0, 2.0)
            .unwrap()
            .transformed(&Isometry::identity());

        assert!(in_edge_region(&square, 1, &Point::new(0.0, 3.0)));
        assert!(in_edge_region(&square, 1, &Point::new(1.0, 3.0)));
        assert!(!in_edge_region(&square, 1, &Point::new(0.0, 0.0)));
        assert!(in_vertex_region(&square, 2, &Point::new(2.0, 2.0)));
        assert!(!in_vertex_region(&square, 2, &Point::new(1.0, 2.0)));
    }
}
