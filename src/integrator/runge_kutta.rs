use crate::integrator::{Dynamics, OdeSolver};
use crate::math::Real;
use crate::SimulationError;

/// The classic fourth-order Runge-Kutta scheme.
///
/// Four evaluations of the derivative are weighted `1:2:2:1`. The
/// integration is exact for constant accelerations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RungeKutta4;

impl OdeSolver for RungeKutta4 {
    fn solve(&mut self, step: Real, dynamics: &mut Dynamics<'_>) -> Result<(), SimulationError> {
        let x = dynamics.state().clone();

        let k1 = dynamics.derivative(&x)? * step;
        let k2 = dynamics.derivative(&(&x + &k1 * 0.5))? * step;
        let k3 = dynamics.derivative(&(&x + &k2 * 0.5))? * step;
        let k4 = dynamics.derivative(&(&x + &k3))? * step;

        dynamics.set_state(x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) / 6.0);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::RungeKutta4;
    use crate::dynamics::solver::ConstraintEngine;
    use crate::dynamics::{
        BodySet, ForceContext, ForceGenerator, ForceGeneratorSet, Gravity, IntegrationParameters,
        PhysicsState, RigidBody,
    };
    use crate::integrator::{Dynamics, IntegratorKind, OdeSolver};
    use crate::math::{Point, Vector};
    use crate::shape::SharedShape;
    use crate::SimulationError;

    fn one_body(position: Point<f64>, linvel: Vector<f64>) -> (BodySet, PhysicsState) {
        let mut bodies = BodySet::new();
        let mut state = PhysicsState::new();
        let body = RigidBody::mobile(SharedShape::ball(1.0), 1.0)
            .with_position(position)
            .with_linvel(linvel);
        let _ = state.push_body(&position, 0.0, &linvel, 0.0, 1.0, body.inv_angular_inertia());
        let _ = bodies.insert(body);
        (bodies, state)
    }

    #[test]
    fn constant_acceleration_is_exact() {
        let (bodies, mut state) = one_body(Point::origin(), Vector::new(2.0, 3.0));
        let mut generators = ForceGeneratorSet::new();
        let _ = generators.insert(Box::new(Gravity::new(Vector::new(0.0, -1.0))));
        let engine = ConstraintEngine::new();
        let params = IntegrationParameters::default();

        let mut dynamics = Dynamics::new(&bodies, &mut state, &mut generators, &engine, &params);
        for _ in 0..4 {
            RungeKutta4.solve(0.5, &mut dynamics).unwrap();
        }

        // After t = 2: p = v t + g t² / 2.
        assert_relative_eq!(state.position(0), Point::new(4.0, 4.0), epsilon = 1.0e-12);
        assert_relative_eq!(state.linvel(0), Vector::new(2.0, 1.0), epsilon = 1.0e-12);
    }

    /// A unit spring pulling the first body toward the origin.
    struct Spring;

    impl ForceGenerator for Spring {
        fn add_forces(&mut self, ctx: &mut ForceContext<'_>) -> Result<(), SimulationError> {
            let Some((handle, _)) = ctx.bodies().iter().next() else {
                return Ok(());
            };
            let position = ctx.position(handle)?;
            ctx.add_force(handle, &-position.coords)
        }
    }

    #[test]
    fn runge_kutta_beats_euler_on_a_spring() {
        let params = IntegrationParameters::default();
        let engine = ConstraintEngine::new();
        let step = 0.1;
        let nsteps = 10;
        let exact = (step * nsteps as f64).cos();

        let mut errors = Vec::new();
        for kind in [IntegratorKind::Euler, IntegratorKind::RungeKutta4] {
            let (bodies, mut state) = one_body(Point::new(1.0, 0.0), Vector::zeros());
            let mut generators = ForceGeneratorSet::new();
            let _ = generators.insert(Box::new(Spring));
            let mut solver = kind.build();

            let mut dynamics =
                Dynamics::new(&bodies, &mut state, &mut generators, &engine, &params);
            for _ in 0..nsteps {
                solver.solve(step, &mut dynamics).unwrap();
            }
            errors.push((state.position(0).x - exact).abs());
        }

        assert!(errors[1] < 1.0e-5);
        assert!(errors[0] > 1.0e-3);
    }
}
