//! Broad-phase culling of the pairs of bodies that may be in contact.

pub use self::sweep_and_prune::{AxisOverlap, SweepAndPrune};

mod sweep_and_prune;
