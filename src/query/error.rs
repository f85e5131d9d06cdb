use core::fmt;

/// Error indicating that a contact query is not supported between two shapes.
///
/// The narrow-phase only has contact tests between balls and convex
/// polygons. Any other shape (see [`ShapeType::Custom`]) yields this error,
/// which aborts the simulation step.
///
/// [`ShapeType::Custom`]: crate::shape::ShapeType::Custom
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Unsupported;

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("query not supported between these shapes")
    }
}

impl std::error::Error for Unsupported {}
