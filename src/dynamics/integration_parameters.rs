use crate::integrator::IntegratorKind;
use crate::math::Real;
use crate::SimulationError;

/// Parameters of a simulation step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegrationParameters {
    /// The timestep length (default: `1.0`).
    pub dt: Real,
    /// The margin added around each body by the broad-phase (default: `0.5`).
    pub broad_phase_padding: Real,
    /// Separation below which two shapes are considered in contact (default: `0.01`).
    pub contact_tolerance: Real,
    /// Tolerance on the dot product of two edge normals for them to be
    /// considered anti-parallel (default: `0.001`).
    pub parallel_tolerance: Real,
    /// Maximum number of bisections of a time-of-impact search (default: `6`).
    pub toi_max_iterations: usize,
    /// Width of the time interval below which a time-of-impact search stops (default: `1/32`).
    pub toi_min_interval: Real,
    /// Baumgarte stabilization gain on the constraint positions (default: `0.3`).
    pub baumgarte_position_gain: Real,
    /// Baumgarte stabilization gain on the constraint velocities (default: `0.3`).
    pub baumgarte_velocity_gain: Real,
    /// Relative residual of the force constraint solve (default: `1.0e-10`).
    pub force_solver_tolerance: Real,
    /// Relative residual of the collision impulse solve (default: `1.0e-5`).
    pub impulse_solver_tolerance: Real,
    /// Relative normal speed below which a resolved contact is reported as resting (default: `1.0e-6`).
    pub resting_velocity_threshold: Real,
    /// The integration scheme (default: [`IntegratorKind::RungeKutta4`]).
    pub integrator: IntegratorKind,
}

impl Default for IntegrationParameters {
    fn default() -> Self {
        Self {
            dt: 1.0,
            broad_phase_padding: 0.5,
            contact_tolerance: 0.01,
            parallel_tolerance: 0.001,
            toi_max_iterations: 6,
            toi_min_interval: 1.0 / 32.0,
            baumgarte_position_gain: 0.3,
            baumgarte_velocity_gain: 0.3,
            force_solver_tolerance: 1.0e-10,
            impulse_solver_tolerance: 1.0e-5,
            resting_velocity_threshold: 1.0e-6,
            integrator: IntegratorKind::RungeKutta4,
        }
    }
}

impl IntegrationParameters {
    /// Sets the timestep length.
    pub fn with_dt(mut self, dt: Real) -> Self {
        self.dt = dt;
        self
    }

    /// Sets the broad-phase padding.
    pub fn with_broad_phase_padding(mut self, padding: Real) -> Self {
        self.broad_phase_padding = padding;
        self
    }

    /// Sets the contact tolerance.
    pub fn with_contact_tolerance(mut self, tolerance: Real) -> Self {
        self.contact_tolerance = tolerance;
        self
    }

    /// Sets the Baumgarte gains of the force constraint solve.
    pub fn with_baumgarte_gains(mut self, position_gain: Real, velocity_gain: Real) -> Self {
        self.baumgarte_position_gain = position_gain;
        self.baumgarte_velocity_gain = velocity_gain;
        self
    }

    /// Sets the time-of-impact search limits.
    pub fn with_toi_search(mut self, max_iterations: usize, min_interval: Real) -> Self {
        self.toi_max_iterations = max_iterations;
        self.toi_min_interval = min_interval;
        self
    }

    /// Sets the integration scheme.
    pub fn with_integrator(mut self, integrator: IntegratorKind) -> Self {
        self.integrator = integrator;
        self
    }

    /// Checks that every parameter is in its valid range.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let positive = [
            ("dt", self.dt),
            ("contact_tolerance", self.contact_tolerance),
            ("parallel_tolerance", self.parallel_tolerance),
            ("toi_min_interval", self.toi_min_interval),
            ("force_solver_tolerance", self.force_solver_tolerance),
            ("impulse_solver_tolerance", self.impulse_solver_tolerance),
        ];
        let non_negative = [
            ("broad_phase_padding", self.broad_phase_padding),
            ("baumgarte_position_gain", self.baumgarte_position_gain),
            ("baumgarte_velocity_gain", self.baumgarte_velocity_gain),
            ("resting_velocity_threshold", self.resting_velocity_threshold),
        ];

        if self.toi_max_iterations == 0 {
            return Err(SimulationError::InvalidConfiguration(
                "toi_max_iterations must be positive, got 0".to_string(),
            ));
        }

        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }

        for (name, value) in non_negative {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(SimulationError::InvalidConfiguration(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::IntegrationParameters;
    use crate::math::Real;
    use crate::SimulationError;

    #[test]
    fn defaults_are_valid() {
        assert!(IntegrationParameters::default().validate().is_ok());
    }

    #[test]
    fn non_positive_tolerances_are_rejected() {
        let params = IntegrationParameters::default().with_contact_tolerance(0.0);
        assert!(matches!(
            params.validate(),
            Err(SimulationError::InvalidConfiguration(msg)) if msg.contains("contact_tolerance")
        ));

        let params = IntegrationParameters::default().with_dt(-1.0);
        assert!(params.validate().is_err());

        let params = IntegrationParameters::default().with_broad_phase_padding(Real::NAN);
        assert!(params.validate().is_err());
    }
}
