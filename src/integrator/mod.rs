//! Numerical integration of the equations of motion.

pub use self::euler::Euler;
pub use self::ode::{Dynamics, IntegratorKind, OdeSolver};
pub use self::runge_kutta::RungeKutta4;

mod euler;
mod ode;
mod runge_kutta;
