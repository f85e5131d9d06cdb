use crate::integrator::{Dynamics, OdeSolver};
use crate::math::Real;
use crate::SimulationError;

/// The explicit Euler scheme: `x ← x + h f(x)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Euler;

impl OdeSolver for Euler {
    fn solve(&mut self, step: Real, dynamics: &mut Dynamics<'_>) -> Result<(), SimulationError> {
        let x = dynamics.state().clone();
        let xdot = dynamics.derivative(&x)?;
        dynamics.set_state(x + xdot * step);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Euler;
    use crate::dynamics::solver::ConstraintEngine;
    use crate::dynamics::{
        BodySet, ForceGeneratorSet, Gravity, IntegrationParameters, PhysicsState, RigidBody,
    };
    use crate::integrator::{Dynamics, OdeSolver};
    use crate::math::{Point, Vector};
    use crate::shape::SharedShape;

    #[test]
    fn euler_step_under_gravity() {
        let mut bodies = BodySet::new();
        let mut state = PhysicsState::new();
        let body = RigidBody::mobile(SharedShape::ball(1.0), 2.0)
            .with_position(Point::new(0.0, 10.0))
            .with_linvel(Vector::new(1.0, 0.0));
        let _ = state.push_body(
            &body.position(),
            0.0,
            &body.linvel(),
            0.0,
            body.inv_mass(),
            body.inv_angular_inertia(),
        );
        let _ = bodies.insert(body);

        let mut generators = ForceGeneratorSet::new();
        let _ = generators.insert(Box::new(Gravity::new(Vector::new(0.0, -1.0))));
        let engine = ConstraintEngine::new();
        let params = IntegrationParameters::default();

        let mut dynamics = Dynamics::new(&bodies, &mut state, &mut generators, &engine, &params);
        Euler.solve(0.5, &mut dynamics).unwrap();

        // Positions move with the velocities from the start of the step.
        assert_relative_eq!(state.position(0), Point::new(0.5, 10.0));
        assert_relative_eq!(state.linvel(0), Vector::new(1.0, -0.5));
        assert_relative_eq!(state.force(0), Vector::new(0.0, -2.0));
    }
}
