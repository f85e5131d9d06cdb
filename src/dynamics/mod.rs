//! Rigid bodies, the global simulation state, force generators and constraints.

pub use self::body_set::{BodyHandle, BodySet};
pub use self::collision_handler::{CollisionHandler, CollisionResponse};
pub use self::force_generator::{
    ForceContext, ForceGenerator, ForceGeneratorHandle, ForceGeneratorSet,
};
pub use self::gravity::Gravity;
pub use self::integration_parameters::IntegrationParameters;
pub use self::physics_state::PhysicsState;
pub use self::rigid_body::{RigidBody, RigidBodyType};
pub use self::surface_friction::SurfaceFriction;

pub mod solver;

mod body_set;
mod collision_handler;
mod force_generator;
mod gravity;
mod integration_parameters;
mod physics_state;
mod rigid_body;
mod surface_friction;
