use crate::math::{Point, Real, UnitVector, Vector, DEFAULT_EPSILON};

/// Computes the outward normal of an edge of a clockwise polygon.
///
/// This is the edge direction rotated by +90 degrees, i.e., `(-e.y, e.x)`.
/// Returns `None` if the segment is degenerate.
#[inline]
pub fn cw_face_normal(pts: [&Point<Real>; 2]) -> Option<UnitVector<Real>> {
    let ab = *pts[1] - *pts[0];
    let res = Vector::new(-ab.y, ab.x);

    UnitVector::try_new(res, DEFAULT_EPSILON)
}

#[cfg(test)]
mod test {
    use super::cw_face_normal;
    use crate::math::Point;

    #[test]
    fn left_edge_of_clockwise_square_points_left() {
        let n = cw_face_normal([&Point::new(-1.0, -1.0), &Point::new(-1.0, 1.0)]).unwrap();
        assert_relative_eq!(n.x, -1.0);
        assert_relative_eq!(n.y, 0.0);
    }

    #[test]
    fn degenerate_edge() {
        assert!(cw_face_normal([&Point::new(2.0, 3.0), &Point::new(2.0, 3.0)]).is_none());
    }
}
