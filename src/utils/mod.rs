//! Various unsorted geometrical and logical operators.

pub use self::angle::normalize_angle;
pub use self::cw_face_normal::cw_face_normal;
pub use self::sorted_pair::SortedPair;

mod angle;
mod cw_face_normal;
mod sorted_pair;
