//! The simulation loop tying together detection, constraints and integration.

pub use self::contact_event::ContactEvent;
pub use self::physics_world::PhysicsWorld;

mod contact_event;
mod physics_world;
