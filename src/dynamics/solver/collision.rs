use crate::dynamics::solver::ImpulseConstraint;
use crate::dynamics::{BodyHandle, BodySet, PhysicsState};
use crate::linalg::BorderedDiagonalIdentityMatrix;
use crate::math::{Real, UnitVector, Vector, BODY_DOF};
use crate::SimulationError;
use na::{DMatrix, DVector};

/// The impulse constraint resolving a single contact between two bodies.
///
/// The impulse is solved for in the contact frame: its first unknown is the
/// component along the normal, its second the component along the tangent.
/// The first border row sets the post-impulse relative normal velocity to
/// `-relative_velocity * CF`, where `CF` is the product of both restitution
/// coefficients, or zero for sticky contacts. The second one zeroes the
/// tangential component. Both pivots of the border, `nᵗ K n` and `1`, are
/// thus non-zero whenever one of the bodies is mobile.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Collision {
    body1: BodyHandle,
    body2: BodyHandle,
    arm1: Vector<Real>,
    arm2: Vector<Real>,
    normal: UnitVector<Real>,
    relative_velocity: Real,
    sticky: bool,
}

impl Collision {
    /// A contact with normal pointing from `body2` toward `body1`.
    ///
    /// The arms go from each body center to the contact point, and
    /// `relative_velocity` is the normal velocity of `body1` relative to `body2`
    /// at that point.
    pub fn new(
        body1: BodyHandle,
        arm1: Vector<Real>,
        body2: BodyHandle,
        arm2: Vector<Real>,
        normal: UnitVector<Real>,
        relative_velocity: Real,
    ) -> Self {
        Self {
            body1,
            body2,
            arm1,
            arm2,
            normal,
            relative_velocity,
            sticky: false,
        }
    }

    /// Makes this contact perfectly inelastic.
    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }

    /// Is this contact perfectly inelastic?
    #[inline]
    pub fn is_sticky(&self) -> bool {
        self.sticky
    }

    /// The coefficient applied to the relative velocity after the impulse.
    pub fn restitution(&self, bodies: &BodySet) -> Result<Real, SimulationError> {
        if self.sticky {
            return Ok(0.0);
        }

        Ok(bodies.try_get(self.body1)?.restitution() * bodies.try_get(self.body2)?.restitution())
    }

    /// The tangent of the contact, the normal rotated by 90°.
    #[inline]
    pub fn tangent(&self) -> Vector<Real> {
        Vector::new(-self.normal.y, self.normal.x)
    }

    fn body_blocks(
        &self,
        arm: &Vector<Real>,
        inv_mass: Real,
        inv_inertia: Real,
        sign: Real,
    ) -> (DMatrix<Real>, DMatrix<Real>) {
        let n = self.normal.into_inner();
        let t = self.tangent();
        let row = DMatrix::from_row_slice(
            2,
            3,
            &[sign * n.x, sign * n.y, sign * arm.perp(&n), 0.0, 0.0, 0.0],
        );
        // Column `k` holds the velocity change caused by a unit impulse along the `k`-th axis of the frame.
        let col = DMatrix::from_row_slice(
            3,
            2,
            &[
                -sign * inv_mass * n.x,
                -sign * inv_mass * t.x,
                -sign * inv_mass * n.y,
                -sign * inv_mass * t.y,
                -sign * inv_inertia * arm.perp(&n),
                -sign * inv_inertia * arm.perp(&t),
            ],
        );
        (row, col)
    }
}

impl ImpulseConstraint for Collision {
    fn num_rows(&self) -> usize {
        2
    }

    fn assemble(
        &self,
        row: usize,
        bodies: &BodySet,
        state: &PhysicsState,
        matrix: &mut BorderedDiagonalIdentityMatrix,
        rhs: &mut DVector<Real>,
    ) -> Result<(), SimulationError> {
        let i1 = bodies.index_of(self.body1)?;
        let i2 = bodies.index_of(self.body2)?;

        let (row1, col1) =
            self.body_blocks(&self.arm1, state.inv_mass(i1), state.inv_inertia(i1), 1.0);
        let (row2, col2) =
            self.body_blocks(&self.arm2, state.inv_mass(i2), state.inv_inertia(i2), -1.0);

        matrix.set_block(row, i1 * BODY_DOF, row1);
        matrix.set_block(i1 * BODY_DOF, row, col1);
        matrix.set_block(row, i2 * BODY_DOF, row2);
        matrix.set_block(i2 * BODY_DOF, row, col2);
        matrix.set_block(row, row, DMatrix::from_row_slice(2, 2, &[0.0, 0.0, 0.0, 1.0]));

        rhs[row] = -self.relative_velocity * self.restitution(bodies)?;
        rhs[row + 1] = 0.0;
        Ok(())
    }

    fn apply_impulses(
        &self,
        row: usize,
        answers: &DVector<Real>,
        bodies: &BodySet,
        state: &mut PhysicsState,
    ) -> Result<(), SimulationError> {
        let impulse = self.normal.into_inner() * answers[row] + self.tangent() * answers[row + 1];

        for (handle, arm, sign) in [(self.body1, &self.arm1, 1.0), (self.body2, &self.arm2, -1.0)] {
            if !bodies.try_get(handle)?.is_mobile() {
                continue;
            }

            let i = bodies.index_of(handle)?;
            let linvel = state.linvel(i) + impulse * (sign * state.inv_mass(i));
            let angvel = state.angvel(i) + sign * arm.perp(&(impulse * state.inv_inertia(i)));
            state.set_linvel(i, &linvel);
            state.set_angvel(i, angvel);
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::Collision;
    use crate::dynamics::solver::ImpulseConstraint;
    use crate::dynamics::{BodyHandle, BodySet, PhysicsState, RigidBody};
    use crate::linalg::{solve_dense, BorderedDiagonalIdentityMatrix, LinearOperator};
    use crate::math::{Point, Real, UnitVector, Vector};
    use crate::shape::SharedShape;
    use na::DVector;

    fn head_on(restitution: Real) -> (BodySet, PhysicsState, BodyHandle, BodyHandle) {
        let mut bodies = BodySet::new();
        let mut state = PhysicsState::new();
        for (x, vx) in [(0.0, 1.0), (2.0, -1.0)] {
            let body = RigidBody::mobile(SharedShape::ball(1.0), 1.0)
                .with_position(Point::new(x, 0.0))
                .with_linvel(Vector::new(vx, 0.0))
                .with_restitution(restitution);
            let _ = state.push_body(
                &body.position(),
                0.0,
                &body.linvel(),
                0.0,
                body.inv_mass(),
                body.inv_angular_inertia(),
            );
            let _ = bodies.insert(body);
        }
        let a = bodies.handle_at(0).unwrap();
        let b = bodies.handle_at(1).unwrap();
        (bodies, state, a, b)
    }

    fn resolve(collision: &Collision, bodies: &BodySet, state: &mut PhysicsState) {
        let dof = state.dof();
        let mut matrix = BorderedDiagonalIdentityMatrix::new(dof + 2, 2);
        let mut rhs = DVector::zeros(dof + 2);
        rhs.rows_mut(0, dof).copy_from(&state.velocities());
        collision
            .assemble(dof, bodies, state, &mut matrix, &mut rhs)
            .unwrap();
        let answers = solve_dense(matrix.to_dense(), &rhs).unwrap();
        collision
            .apply_impulses(dof, &answers, bodies, state)
            .unwrap();
    }

    #[test]
    fn elastic_head_on_reverses_velocities() {
        let (bodies, mut state, a, b) = head_on(1.0);
        let normal = UnitVector::new_normalize(Vector::new(-1.0, 0.0));
        let collision = Collision::new(a, Vector::new(1.0, 0.0), b, Vector::new(-1.0, 0.0), normal, -2.0);

        resolve(&collision, &bodies, &mut state);

        assert_relative_eq!(state.linvel(0), Vector::new(-1.0, 0.0), epsilon = 1.0e-9);
        assert_relative_eq!(state.linvel(1), Vector::new(1.0, 0.0), epsilon = 1.0e-9);
        assert_relative_eq!(state.angvel(0), 0.0, epsilon = 1.0e-9);
        assert_relative_eq!(state.linvel(0) + state.linvel(1), Vector::zeros(), epsilon = 1.0e-9);
    }

    #[test]
    fn sticky_contact_cancels_relative_velocity() {
        let (bodies, mut state, a, b) = head_on(1.0);
        let normal = UnitVector::new_normalize(Vector::new(-1.0, 0.0));
        let collision =
            Collision::new(a, Vector::new(1.0, 0.0), b, Vector::new(-1.0, 0.0), normal, -2.0).sticky();
        assert_eq!(collision.restitution(&bodies), Ok(0.0));

        resolve(&collision, &bodies, &mut state);

        let relvel = (state.linvel(0) - state.linvel(1)).dot(&*normal);
        assert_relative_eq!(relvel, 0.0, epsilon = 1.0e-9);
    }

    #[test]
    fn restitution_is_the_product_of_both_bodies() {
        let (bodies, _, a, b) = head_on(0.5);
        let collision = Collision::new(a, Vector::zeros(), b, Vector::zeros(), Vector::x_axis(), -1.0);
        assert_relative_eq!(collision.restitution(&bodies).unwrap(), 0.25);
    }

    #[test]
    fn off_center_impulse_spins_bodies() {
        let (bodies, mut state, a, b) = head_on(1.0);
        let normal = UnitVector::new_normalize(Vector::new(-1.0, 0.0));
        let collision = Collision::new(a, Vector::new(1.0, 0.5), b, Vector::new(-1.0, 0.5), normal, -2.0);

        resolve(&collision, &bodies, &mut state);

        let relvel = (state.velocity_at_arm(0, &Vector::new(1.0, 0.5))
            - state.velocity_at_arm(1, &Vector::new(-1.0, 0.5)))
        .dot(&*normal);
        assert_relative_eq!(relvel, 2.0, epsilon = 1.0e-9);
        assert!(state.angvel(0) != 0.0);
        assert_relative_eq!(state.linvel(0) + state.linvel(1), Vector::zeros(), epsilon = 1.0e-9);
    }
}
