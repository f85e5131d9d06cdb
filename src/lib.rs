/*!
rigid2d
========

**rigid2d** is a 2-dimensional rigid-body simulation library written with
the rust programming language.

It advances a set of balls and convex polygons through discrete time steps:
a sweep-and-prune broad phase culls pairs, an incremental closest-feature
search tracks contacts between shapes, penetrating pairs are backtracked in
time, and a constraint engine solves for joint forces and collision impulses.

*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)]
#![allow(clippy::type_complexity)]
#![deny(unused_qualifications)]

#[cfg(test)]
#[macro_use]
extern crate approx;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod dynamics;
pub mod integrator;
pub mod linalg;
pub mod partitioning;
pub mod pipeline;
pub mod query;
pub mod shape;
pub mod utils;

mod error;

pub use crate::error::SimulationError;

mod real {
    /// The scalar type used throughout this crate.
    pub use f64 as Real;
}

/// Aliases for the mathematical types used throughout this crate.
pub mod math {
    pub use super::real::*;
    pub use na::{Isometry2, Point2, UnitComplex, UnitVector2, Vector2, Vector3};

    /// The default tolerance used for geometric operations.
    pub const DEFAULT_EPSILON: Real = Real::EPSILON;

    /// The dimension of the space.
    pub const DIM: usize = 2;

    /// The number of degrees of freedom of a single rigid body: two translations and one rotation.
    pub const BODY_DOF: usize = 3;

    /// The point type.
    pub use Point2 as Point;

    /// The vector type.
    pub use Vector2 as Vector;

    /// The unit vector type.
    pub use UnitVector2 as UnitVector;

    /// The transformation matrix type.
    pub use Isometry2 as Isometry;

    /// The rotation type.
    pub type Rotation<N> = UnitComplex<N>;

    /// The velocity or position of a single body, packed as `(x, y, angle)`.
    pub type BodyVector<N> = Vector3<N>;
}
