//! Constraint forces, collision impulses, and the engine that solves for them.

pub use self::collision::Collision;
pub use self::constraint_engine::{ConstraintEngine, ConstraintHandle};
pub use self::force_constraint::{ForceConstraint, ForceConstraintRows};
pub use self::impulse_constraint::ImpulseConstraint;
pub use self::pin_joint::PinJoint;

mod collision;
mod constraint_engine;
mod force_constraint;
mod impulse_constraint;
mod pin_joint;
