use crate::dynamics::solver::ConstraintHandle;
use crate::dynamics::{BodyHandle, ForceGeneratorHandle};
use crate::linalg::SolverError;
use crate::math::Real;
use crate::query::Unsupported;

/// Errors reported by the simulation.
///
/// Penetrating pairs that cannot be resolved are not errors: they are
/// suppressed until the broad-phase separates them.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// The narrow-phase met a pair of shapes it has no contact test for.
    #[error("unsupported shape combination: {0}")]
    UnsupportedShapes(#[from] Unsupported),
    /// Every linear solver tier failed; velocities can no longer be trusted.
    #[error("the simulation state became inconsistent: {0}")]
    Solver(#[from] SolverError),
    /// The handle does not identify a body registered to this world.
    #[error("the body {0:?} is not registered")]
    UnregisteredBody(BodyHandle),
    /// Velocities of stationary bodies are always zero.
    #[error("the body {0:?} is stationary and cannot be given a velocity")]
    StationaryBody(BodyHandle),
    /// The handle does not identify a registered force generator.
    #[error("the force generator {0:?} is not registered")]
    UnknownForceGenerator(ForceGeneratorHandle),
    /// The handle does not identify a registered constraint.
    #[error("the constraint {0:?} is not registered")]
    UnknownConstraint(ConstraintHandle),
    /// Mobile bodies need a positive and finite mass.
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(Real),
    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_messages() {
        let err = SimulationError::InvalidMass(-1.0);
        assert_eq!(err.to_string(), "mass must be positive and finite, got -1");

        let err = SimulationError::from(Unsupported);
        assert!(err.to_string().contains("not supported"));

        let err = SimulationError::from(SolverError::Singular);
        assert!(err.to_string().contains("inconsistent"));
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        assert_error(&SimulationError::InvalidConfiguration("dt".to_string()));
    }
}
