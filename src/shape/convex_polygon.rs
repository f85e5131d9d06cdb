use crate::math::{Isometry, Point, Real, Rotation, UnitVector, Vector, DEFAULT_EPSILON};
use crate::shape::{PolygonFeatures, Shape, ShapeType};
use crate::utils;

/// A 2D convex polygon.
///
/// Vertices are expressed relative to the polygon's center of mass, its area
/// centroid, and wound clockwise. Edge `i` runs from vertex `i` to vertex `i + 1`, and normal `i`
/// is the outward normal of edge `i`.
#[derive(Clone, Debug)]
pub struct ConvexPolygon {
    points: Vec<Point<Real>>,
    edges: Vec<UnitVector<Real>>,
    normals: Vec<UnitVector<Real>>,
}

impl ConvexPolygon {
    /// Creates a new 2D convex polygon from a set of points assumed to describe a clockwise convex polyline.
    ///
    /// The points are translated so that their centroid lies at the origin.
    /// Returns `None` if there are less than three points, if two consecutive
    /// points coincide, if the polyline turns counter-clockwise anywhere, or
    /// if it encloses no area.
    pub fn from_convex_polyline(points: Vec<Point<Real>>) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }

        let mut edges = Vec::with_capacity(points.len());
        let mut normals = Vec::with_capacity(points.len());

        for i1 in 0..points.len() {
            let i2 = (i1 + 1) % points.len();
            let edge = UnitVector::try_new(points[i2] - points[i1], DEFAULT_EPSILON)?;
            edges.push(edge);
            normals.push(utils::cw_face_normal([&points[i1], &points[i2]])?);
        }

        let eps = DEFAULT_EPSILON.sqrt();
        for i1 in 0..edges.len() {
            let i2 = (i1 + 1) % edges.len();
            if edges[i1].perp(&*edges[i2]) > eps {
                return None;
            }
        }

        let (twice_area, moment) = (0..points.len()).fold(
            (0.0, Vector::zeros()),
            |(twice_area, moment): (Real, Vector<Real>), i| {
                let a = points[i].coords;
                let b = points[(i + 1) % points.len()].coords;
                let cross = a.perp(&b);
                (twice_area + cross, moment + (a + b) * cross)
            },
        );
        if twice_area.abs() <= eps {
            return None;
        }

        let centroid = moment / (3.0 * twice_area);
        let points = points.into_iter().map(|pt| pt - centroid).collect();

        Some(ConvexPolygon {
            points,
            edges,
            normals,
        })
    }

    /// Creates an axis-aligned rectangle centered at the origin.
    ///
    /// The vertices start at the bottom-left corner and go clockwise.
    /// Returns `None` if either dimension is not strictly positive.
    pub fn rectangle(width: Real, height: Real) -> Option<Self> {
        if !(width > 0.0 && height > 0.0) {
            return None;
        }

        let hw = width / 2.0;
        let hh = height / 2.0;
        Self::from_convex_polyline(vec![
            Point::new(-hw, -hh),
            Point::new(-hw, hh),
            Point::new(hw, hh),
            Point::new(hw, -hh),
        ])
    }

    /// The vertices of this convex polygon.
    #[inline]
    pub fn points(&self) -> &[Point<Real>] {
        &self.points
    }

    /// The unit directions of the edges of this convex polygon.
    #[inline]
    pub fn edges(&self) -> &[UnitVector<Real>] {
        &self.edges
    }

    /// The normals of the edges of this convex polygon.
    #[inline]
    pub fn normals(&self) -> &[UnitVector<Real>] {
        &self.normals
    }

    /// The area of this polygon.
    pub fn area(&self) -> Real {
        self.fan_terms().map(|(cross, _)| cross).sum::<Real>().abs() / 2.0
    }

    /// Transforms the vertices, edges and normals of this polygon by `pos`.
    pub fn transformed(&self, pos: &Isometry<Real>) -> PolygonFeatures {
        PolygonFeatures {
            vertices: self.points.iter().map(|pt| pos * pt).collect(),
            edges: self.edges.iter().map(|e| pos * e).collect(),
            normals: self.normals.iter().map(|n| pos * n).collect(),
        }
    }

    // Yields, for each triangle of the fan rooted at the origin, its doubled
    // signed area and the sum `a·a + a·b + b·b` of its two outer vertices.
    fn fan_terms(&self) -> impl Iterator<Item = (Real, Real)> + '_ {
        (0..self.points.len()).map(move |i| {
            let a = self.points[i].coords;
            let b = self.points[(i + 1) % self.points.len()].coords;
            (a.perp(&b), a.dot(&a) + a.dot(&b) + b.dot(&b))
        })
    }
}

impl Shape for ConvexPolygon {
    fn shape_type(&self) -> ShapeType {
        ShapeType::ConvexPolygon
    }

    fn angular_inertia(&self, mass: Real) -> Real {
        let (num, den) = self
            .fan_terms()
            .fold((0.0, 0.0), |(num, den), (cross, sum)| {
                (num + cross * sum, den + cross)
            });

        if den == 0.0 {
            0.0
        } else {
            mass * num / (6.0 * den)
        }
    }

    fn bounding_radius(&self) -> Real {
        self.points
            .iter()
            .map(|pt| pt.coords.norm())
            .fold(0.0, Real::max)
    }

    fn half_extents(&self, rotation: &Rotation<Real>) -> Vector<Real> {
        self.points.iter().fold(Vector::zeros(), |acc, pt| {
            let rotated = rotation * pt.coords;
            acc.sup(&rotated.abs())
        })
    }
}

#[cfg(test)]
mod test {
    use super::ConvexPolygon;
    use crate::math::{Isometry, Point, Rotation, Vector};
    use crate::shape::Shape;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn rectangle_winding_and_normals() {
        let rect = ConvexPolygon::rectangle(4.0, 2.0).unwrap();
        assert_eq!(rect.points()[0], Point::new(-2.0, -1.0));
        assert_eq!(rect.points()[1], Point::new(-2.0, 1.0));

        // Edge 0 is the left side, going up; its normal points left.
        assert_relative_eq!(rect.edges()[0].into_inner(), Vector::y());
        assert_relative_eq!(rect.normals()[0].into_inner(), -Vector::x());
        // Edge 1 is the top side; its normal points up.
        assert_relative_eq!(rect.normals()[1].into_inner(), Vector::y());

        for (e, n) in rect.edges().iter().zip(rect.normals()) {
            assert_relative_eq!(e.dot(&**n), 0.0);
        }
    }

    #[test]
    fn rectangle_inertia_and_area() {
        let rect = ConvexPolygon::rectangle(4.0, 2.0).unwrap();
        assert_relative_eq!(rect.area(), 8.0);
        assert_relative_eq!(rect.angular_inertia(3.0), 3.0 * (16.0 + 4.0) / 12.0);
    }

    #[test]
    fn rejects_counter_clockwise_and_degenerate_input() {
        let ccw = vec![
            Point::new(-1.0, -1.0),
            Point::new(1.0, -1.0),
            Point::new(1.0, 1.0),
            Point::new(-1.0, 1.0),
        ];
        assert!(ConvexPolygon::from_convex_polyline(ccw).is_none());
        assert!(ConvexPolygon::from_convex_polyline(vec![Point::origin(); 3]).is_none());
        assert!(ConvexPolygon::rectangle(0.0, 1.0).is_none());
    }

    #[test]
    fn vertices_are_centered_on_the_centroid() {
        let triangle = ConvexPolygon::from_convex_polyline(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 3.0),
            Point::new(3.0, 0.0),
        ])
        .unwrap();
        assert_relative_eq!(triangle.points()[0], Point::new(-1.0, -1.0), epsilon = 1.0e-12);
        assert_relative_eq!(triangle.points()[1], Point::new(-1.0, 2.0), epsilon = 1.0e-12);
        assert_relative_eq!(triangle.points()[2], Point::new(2.0, -1.0), epsilon = 1.0e-12);
        assert_relative_eq!(triangle.area(), 4.5, epsilon = 1.0e-12);
        // Inertia of a right triangle about its centroid: m (a² + b²) / 18.
        assert_relative_eq!(triangle.angular_inertia(1.0), 1.0, epsilon = 1.0e-12);

        let flat = vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
        assert!(ConvexPolygon::from_convex_polyline(flat).is_none());
    }

    #[test]
    fn extents_follow_rotation() {
        let rect = ConvexPolygon::rectangle(4.0, 2.0).unwrap();
        let ext = rect.half_extents(&Rotation::new(FRAC_PI_2));
        assert_relative_eq!(ext, Vector::new(1.0, 2.0), epsilon = 1.0e-12);
        assert_relative_eq!(rect.bounding_radius(), 5.0f64.sqrt());
    }

    #[test]
    fn transformed_features_stay_paired() {
        let rect = ConvexPolygon::rectangle(2.0, 2.0).unwrap();
        let features = rect.transformed(&Isometry::new(Vector::new(5.0, 0.0), FRAC_PI_2));
        assert_eq!(features.len(), 4);
        assert_relative_eq!(features.vertex(0), Point::new(6.0, -1.0), epsilon = 1.0e-12);
        for i in 0..features.len() {
            assert_relative_eq!(features.edge(i).dot(&*features.normal(i)), 0.0, epsilon = 1.0e-12);
        }
    }
}
