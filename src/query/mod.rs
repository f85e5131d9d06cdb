//! Contact detection between the bodies of a world.
//!
//! The functions of the [`contact`] module compute the closest features of
//! two shapes. The [`NarrowPhase`] runs them on every pair found by the
//! broad-phase, keeping track of the features from one step to the next,
//! and searches the last timestep with [`time_of_impact()`] when two
//! bodies are found interpenetrating.

pub use self::collision_pair::{CollisionPair, ResolvedContact};
pub use self::contact::Contact;
pub use self::error::Unsupported;
pub use self::feature_status::FeatureStatus;
pub use self::narrow_phase::NarrowPhase;
pub use self::time_of_impact::{time_of_impact, ToiOptions, ToiSearch};

mod collision_pair;
pub mod contact;
mod error;
mod feature_status;
mod narrow_phase;
mod time_of_impact;
