use crate::dynamics::{BodyHandle, ForceContext, ForceGenerator};
use crate::math::{Real, Vector};
use crate::SimulationError;

/// A uniform gravity field.
///
/// Applies `mass * acceleration` to every mobile body, or only to an
/// explicit list of bodies.
#[derive(Clone, Debug, PartialEq)]
pub struct Gravity {
    acceleration: Vector<Real>,
    affected: Option<Vec<BodyHandle>>,
}

impl Gravity {
    /// Gravity affecting all the mobile bodies of the world.
    pub fn new(acceleration: Vector<Real>) -> Self {
        Self {
            acceleration,
            affected: None,
        }
    }

    /// Gravity affecting only the given bodies.
    pub fn affecting(acceleration: Vector<Real>, bodies: Vec<BodyHandle>) -> Self {
        Self {
            acceleration,
            affected: Some(bodies),
        }
    }

    /// Adds a body to the list of affected bodies.
    ///
    /// A generator affecting all bodies is left unchanged.
    pub fn affect(&mut self, body: BodyHandle) {
        if let Some(affected) = &mut self.affected {
            affected.push(body);
        }
    }

    /// The acceleration of this field.
    pub fn acceleration(&self) -> Vector<Real> {
        self.acceleration
    }

    /// Changes the acceleration of this field.
    pub fn set_acceleration(&mut self, acceleration: Vector<Real>) {
        self.acceleration = acceleration;
    }
}

impl ForceGenerator for Gravity {
    fn add_forces(&mut self, ctx: &mut ForceContext<'_>) -> Result<(), SimulationError> {
        let targets: Vec<BodyHandle> = match &self.affected {
            // Bodies removed from the world are skipped.
            Some(affected) => affected
                .iter()
                .copied()
                .filter(|body| ctx.bodies().contains(*body))
                .collect(),
            None => ctx.mobile_bodies().collect(),
        };

        for body in targets {
            let mass = ctx.mass(body)?;
            if mass.is_finite() {
                ctx.add_force(body, &(self.acceleration * mass))?;
            }
        }

        Ok(())
    }
}
