use crate::math::{Point, Real, UnitVector};
use smallvec::SmallVec;

/// The world-space vertices, edges and normals of a convex polygon.
///
/// Edge `i` and normal `i` both belong to the side running from vertex `i`
/// to vertex `i + 1`. Every closest-feature query relies on this pairing.
#[derive(Clone, Debug, PartialEq)]
pub struct PolygonFeatures {
    /// The polygon vertices, clockwise.
    pub vertices: SmallVec<[Point<Real>; 8]>,
    /// The unit direction of each edge.
    pub edges: SmallVec<[UnitVector<Real>; 8]>,
    /// The outward normal of each edge.
    pub normals: SmallVec<[UnitVector<Real>; 8]>,
}

impl PolygonFeatures {
    /// The number of vertices (and of edges) of the polygon.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Is this polygon empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The index of the feature preceding `i`.
    #[inline]
    pub fn prev(&self, i: usize) -> usize {
        (i + self.len() - 1) % self.len()
    }

    /// The index of the feature following `i`.
    #[inline]
    pub fn next(&self, i: usize) -> usize {
        (i + 1) % self.len()
    }

    /// The `i`-th vertex.
    #[inline]
    pub fn vertex(&self, i: usize) -> Point<Real> {
        self.vertices[i]
    }

    /// The direction of the `i`-th edge.
    #[inline]
    pub fn edge(&self, i: usize) -> UnitVector<Real> {
        self.edges[i]
    }

    /// The outward normal of the `i`-th edge.
    #[inline]
    pub fn normal(&self, i: usize) -> UnitVector<Real> {
        self.normals[i]
    }
}
