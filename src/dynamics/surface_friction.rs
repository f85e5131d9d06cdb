use crate::dynamics::{ForceContext, ForceGenerator};
use crate::math::{Real, Vector};
use crate::SimulationError;

/// Friction of mobile bodies against the background surface they slide on.
///
/// The normal force of a body is `mass * normal_acceleration`. A body at
/// rest whose accumulated external force is smaller than its static
/// friction limit has that force cancelled. A moving body receives a
/// dynamic friction force `-friction * normal_force * velocity`.
///
/// Static friction reads the forces accumulated by the generators
/// registered before this one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceFriction {
    normal_acceleration: Real,
    resting_speed: Real,
}

impl Default for SurfaceFriction {
    fn default() -> Self {
        Self {
            normal_acceleration: 0.1,
            resting_speed: 1.0e-6,
        }
    }
}

impl SurfaceFriction {
    /// Friction with the default normal acceleration of `0.1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the acceleration pressing bodies onto the surface.
    pub fn with_normal_acceleration(mut self, normal_acceleration: Real) -> Self {
        self.normal_acceleration = normal_acceleration;
        self
    }

    /// Sets the speed below which a body is considered at rest.
    pub fn with_resting_speed(mut self, resting_speed: Real) -> Self {
        self.resting_speed = resting_speed;
        self
    }
}

impl ForceGenerator for SurfaceFriction {
    fn add_forces(&mut self, ctx: &mut ForceContext<'_>) -> Result<(), SimulationError> {
        let bodies: Vec<_> = ctx
            .bodies()
            .iter()
            .filter(|(_, b)| b.is_mobile() && (b.friction() > 0.0 || b.static_friction() > 0.0))
            .map(|(h, b)| (h, b.mass(), b.friction(), b.static_friction()))
            .collect();

        for (handle, mass, friction, static_friction) in bodies {
            let normal_force = mass * self.normal_acceleration;
            let velocity = ctx.linvel(handle)?;
            let speed = velocity.norm();

            if speed < self.resting_speed {
                let external = ctx.force(handle)?;
                if normal_force * static_friction > external.norm() {
                    ctx.add_force(handle, &-external)?;
                }
            }

            if speed > 0.0 {
                let dynamic: Vector<Real> = -velocity * (friction * normal_force);
                ctx.add_force(handle, &dynamic)?;
            }
        }

        Ok(())
    }
}
