use crate::dynamics::solver::ConstraintEngine;
use crate::dynamics::{BodySet, ForceContext, ForceGeneratorSet, IntegrationParameters, PhysicsState};
use crate::integrator::{Euler, RungeKutta4};
use crate::math::Real;
use crate::SimulationError;
use na::DVector;

/// The first-order system `ẋ = f(x)` describing the motion of the bodies.
///
/// The state `x = [q ; q̇]` stacks the positions and the velocities of all
/// the bodies. Evaluating `f` runs the force generators and solves the
/// force constraints for the state being evaluated.
pub struct Dynamics<'a> {
    bodies: &'a BodySet,
    state: &'a mut PhysicsState,
    generators: &'a mut ForceGeneratorSet,
    engine: &'a ConstraintEngine,
    params: &'a IntegrationParameters,
}

impl<'a> Dynamics<'a> {
    /// Gathers everything needed to evaluate the motion of `bodies`.
    pub fn new(
        bodies: &'a BodySet,
        state: &'a mut PhysicsState,
        generators: &'a mut ForceGeneratorSet,
        engine: &'a ConstraintEngine,
        params: &'a IntegrationParameters,
    ) -> Self {
        Self {
            bodies,
            state,
            generators,
            engine,
            params,
        }
    }

    /// The current state vector.
    pub fn state(&self) -> &DVector<Real> {
        self.state.state_vector()
    }

    /// Replaces the current state vector.
    pub fn set_state(&mut self, state: DVector<Real>) {
        self.state.set_state_vector(state);
    }

    /// Evaluates `ẋ = [q̇ ; W (F + Fc)]` at `x`.
    ///
    /// `F` are the forces accumulated by the force generators and `Fc` the
    /// forces enforcing the force constraints. This leaves `x` as the
    /// current state.
    pub fn derivative(&mut self, x: &DVector<Real>) -> Result<DVector<Real>, SimulationError> {
        self.state.set_state_vector(x.clone());
        self.state.clear_forces();
        self.generators
            .add_forces(&mut ForceContext::new(self.bodies, self.state))?;

        let external = self.state.forces().clone();
        let constraint =
            self.engine
                .constraint_forces(self.bodies, self.state, &external, self.params)?;

        let dof = self.state.dof();
        let accelerations = self
            .state
            .inv_mass_diagonal()
            .component_mul(&(external + constraint));

        let mut xdot = DVector::zeros(2 * dof);
        xdot.rows_mut(0, dof).copy_from(&x.rows(dof, dof));
        xdot.rows_mut(dof, dof).copy_from(&accelerations);
        Ok(xdot)
    }
}

/// A numerical scheme advancing [`Dynamics`] by one step.
pub trait OdeSolver {
    /// Advances the state of `dynamics` by `step`.
    fn solve(&mut self, step: Real, dynamics: &mut Dynamics<'_>) -> Result<(), SimulationError>;
}

/// The integration schemes provided by this crate.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum IntegratorKind {
    /// The explicit Euler scheme, see [`Euler`].
    Euler,
    /// The classic fourth-order Runge-Kutta scheme, see [`RungeKutta4`].
    #[default]
    RungeKutta4,
}

impl IntegratorKind {
    /// Instantiates the scheme.
    pub fn build(self) -> Box<dyn OdeSolver> {
        match self {
            IntegratorKind::Euler => Box::new(Euler),
            IntegratorKind::RungeKutta4 => Box::new(RungeKutta4),
        }
    }
}
