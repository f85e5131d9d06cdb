use crate::dynamics::solver::{ForceConstraint, ForceConstraintRows};
use crate::dynamics::{BodyHandle, BodySet, PhysicsState};
use crate::math::{Point, Real, Vector, BODY_DOF};
use crate::pipeline::PhysicsWorld;
use crate::SimulationError;
use na::DMatrix;

/// A joint keeping a point of one body coincident with a point of another.
///
/// Both bodies remain free to rotate about the shared point. Drift of the
/// two anchors is corrected by the Baumgarte feedback of the constraint engine.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PinJoint {
    body1: BodyHandle,
    body2: BodyHandle,
    local_anchor1: Vector<Real>,
    local_anchor2: Vector<Real>,
}

impl PinJoint {
    /// Joins the anchor `local_anchor1`, in the local frame of `body1`, with
    /// the anchor `local_anchor2`, in the local frame of `body2`.
    pub fn new(
        body1: BodyHandle,
        local_anchor1: Vector<Real>,
        body2: BodyHandle,
        local_anchor2: Vector<Real>,
    ) -> Self {
        Self {
            body1,
            body2,
            local_anchor1,
            local_anchor2,
        }
    }

    /// Pins two registered bodies together at the world-space `point`.
    pub fn at_world_point(
        world: &PhysicsWorld,
        point: &Point<Real>,
        body1: BodyHandle,
        body2: BodyHandle,
    ) -> Result<Self, SimulationError> {
        let local1 = world.body_pose(body1)?.inverse_transform_point(point);
        let local2 = world.body_pose(body2)?.inverse_transform_point(point);
        Ok(Self::new(body1, local1.coords, body2, local2.coords))
    }

    /// The first body attached to this joint.
    #[inline]
    pub fn body1(&self) -> BodyHandle {
        self.body1
    }

    /// The second body attached to this joint.
    #[inline]
    pub fn body2(&self) -> BodyHandle {
        self.body2
    }

    /// The world-space anchors of both bodies for the given state.
    pub fn world_anchors(
        &self,
        bodies: &BodySet,
        state: &PhysicsState,
    ) -> Result<(Point<Real>, Point<Real>), SimulationError> {
        let i1 = bodies.index_of(self.body1)?;
        let i2 = bodies.index_of(self.body2)?;
        Ok((
            state.pose(i1) * Point::from(self.local_anchor1),
            state.pose(i2) * Point::from(self.local_anchor2),
        ))
    }
}

impl ForceConstraint for PinJoint {
    fn num_rows(&self) -> usize {
        2
    }

    fn assemble(
        &self,
        row: usize,
        bodies: &BodySet,
        state: &PhysicsState,
        out: &mut ForceConstraintRows,
    ) -> Result<(), SimulationError> {
        let anchors = [
            (bodies.index_of(self.body1)?, self.local_anchor1, 1.0),
            (bodies.index_of(self.body2)?, self.local_anchor2, -1.0),
        ];

        for (i, local_anchor, sign) in anchors {
            let arm = state.pose(i).rotation * local_anchor;
            let angvel = state.angvel(i);
            let anchor = state.position(i) + arm;
            let anchor_vel = state.velocity_at_arm(i, &arm);

            out.position_error[row] += sign * anchor.x;
            out.position_error[row + 1] += sign * anchor.y;
            out.velocity_error[row] += sign * anchor_vel.x;
            out.velocity_error[row + 1] += sign * anchor_vel.y;

            out.jacobian.set_block(
                row,
                i * BODY_DOF,
                DMatrix::from_row_slice(2, 3, &[sign, 0.0, -sign * arm.y, 0.0, sign, sign * arm.x]),
            );
            out.jacobian_dot.set_block(
                row,
                i * BODY_DOF,
                DMatrix::from_row_slice(
                    2,
                    3,
                    &[
                        0.0,
                        0.0,
                        -sign * angvel * arm.x,
                        0.0,
                        0.0,
                        -sign * angvel * arm.y,
                    ],
                ),
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::PinJoint;
    use crate::dynamics::solver::{ForceConstraint, ForceConstraintRows};
    use crate::dynamics::{BodySet, PhysicsState, RigidBody};
    use crate::math::{Point, Vector};
    use crate::shape::SharedShape;

    #[test]
    fn jacobian_matches_finite_differences() {
        let mut bodies = BodySet::new();
        let mut state = PhysicsState::new();
        let configs = [
            (Point::new(0.0, 0.0), 0.3, Vector::new(0.1, 0.2), 0.5),
            (Point::new(1.5, -0.5), 1.1, Vector::new(-0.3, 0.0), -0.2),
        ];
        for (pos, angle, linvel, angvel) in configs {
            let body = RigidBody::mobile(SharedShape::ball(0.5), 1.0);
            let _ = state.push_body(&pos, angle, &linvel, angvel, 1.0, 1.0);
            let _ = bodies.insert(body);
        }
        let joint = PinJoint::new(
            bodies.handle_at(0).unwrap(),
            Vector::new(1.0, 0.0),
            bodies.handle_at(1).unwrap(),
            Vector::new(0.0, 0.5),
        );

        let mut rows = ForceConstraintRows::new(2, state.dof());
        joint.assemble(0, &bodies, &state, &mut rows).unwrap();

        let qdot = state.velocities();
        let jq = rows.jacobian.mul_vector(&qdot);
        assert_relative_eq!(jq, rows.velocity_error, epsilon = 1.0e-12);

        // Advance the positions slightly and compare the constraint change.
        let h = 1.0e-7;
        let mut advanced = state.clone();
        let mut q = advanced.state_vector().clone();
        let dof = state.dof();
        for k in 0..dof {
            q[k] += h * qdot[k];
        }
        advanced.set_state_vector(q);
        let mut rows_after = ForceConstraintRows::new(2, dof);
        joint.assemble(0, &bodies, &advanced, &mut rows_after).unwrap();
        let c_dot = (&rows_after.position_error - &rows.position_error) / h;
        assert_relative_eq!(c_dot, rows.velocity_error, epsilon = 1.0e-5);

        let j_dot = (rows_after.jacobian.to_dense() - rows.jacobian.to_dense()) / h;
        assert_relative_eq!(j_dot, rows.jacobian_dot.to_dense(), epsilon = 1.0e-5);
    }
}
