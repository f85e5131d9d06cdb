use crate::dynamics::solver::ConstraintEngine;
use crate::dynamics::{BodyHandle, BodySet, IntegrationParameters, PhysicsState, RigidBody};
use crate::math::Real;
use crate::query::contact::{contact_ball_ball, contact_polygon_ball, contact_polygon_polygon};
use crate::query::{
    time_of_impact, CollisionPair, Contact, FeatureStatus, ResolvedContact, ToiOptions,
    Unsupported,
};
use crate::shape::{Ball, ShapeType};
use crate::utils::SortedPair;
use crate::SimulationError;
use arrayvec::ArrayVec;
use indexmap::IndexMap;

/// The two bodies of a pair, with their state indices.
struct PairBodies<'a> {
    body1: &'a RigidBody,
    body2: &'a RigidBody,
    i1: usize,
    i2: usize,
}

impl PairBodies<'_> {
    fn mobile_indices(&self) -> ArrayVec<usize, 2> {
        let mut mobile = ArrayVec::new();
        if self.body1.is_mobile() {
            mobile.push(self.i1);
        }
        if self.body2.is_mobile() {
            mobile.push(self.i2);
        }
        mobile
    }
}

/// Exact contact detection between the pairs found by the broad-phase.
///
/// Balls are tested directly. Pairs involving a polygon track their closest
/// features from one step to the next; when they are found interpenetrating,
/// the last timestep is searched for the moment of impact.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NarrowPhase {
    contact_tolerance: Real,
    parallel_tolerance: Real,
    toi: ToiOptions,
}

impl NarrowPhase {
    /// Creates a narrow-phase configured by `params`.
    pub fn new(params: &IntegrationParameters) -> Self {
        Self {
            contact_tolerance: params.contact_tolerance,
            parallel_tolerance: params.parallel_tolerance,
            toi: ToiOptions {
                dt: params.dt,
                max_iterations: params.toi_max_iterations,
                min_interval: params.toi_min_interval,
            },
        }
    }

    /// Finds the pairs of `pairs` that need a collision response.
    ///
    /// Pairs flagged as no-collision, or suppressed in `engine`, are skipped.
    /// Every returned pair has its [`CollisionPair::contact`] set.
    pub fn detect(
        &self,
        pairs: &mut IndexMap<SortedPair<BodyHandle>, CollisionPair>,
        bodies: &BodySet,
        state: &mut PhysicsState,
        engine: &ConstraintEngine,
    ) -> Result<Vec<SortedPair<BodyHandle>>, SimulationError> {
        let mut colliding = Vec::new();

        for (key, pair) in pairs.iter_mut() {
            pair.contact = None;
            pair.sticky = false;

            if pair.no_collision || engine.has_no_collisions(pair.body1, pair.body2) {
                continue;
            }

            let pair_bodies = PairBodies {
                body1: bodies.try_get(pair.body1)?,
                body2: bodies.try_get(pair.body2)?,
                i1: bodies.index_of(pair.body1)?,
                i2: bodies.index_of(pair.body2)?,
            };

            if self.test_pair(pair, &pair_bodies, state)? {
                colliding.push(*key);
            }
        }

        Ok(colliding)
    }

    fn test_pair(
        &self,
        pair: &mut CollisionPair,
        bodies: &PairBodies,
        state: &mut PhysicsState,
    ) -> Result<bool, Unsupported> {
        let shape1 = bodies.body1.shape();
        let shape2 = bodies.body2.shape();

        match (shape1.shape_type(), shape2.shape_type()) {
            (ShapeType::Ball, ShapeType::Ball) => {
                let status = self.test_ball_ball(pair, bodies, state)?;
                Ok(status == FeatureStatus::AddedResponse)
            }
            (ShapeType::ConvexPolygon, ShapeType::ConvexPolygon) => {
                self.resolve_polygon_polygon(pair, bodies, state)
            }
            (ShapeType::ConvexPolygon, ShapeType::Ball) => {
                let ball = shape2.as_ball().ok_or(Unsupported)?;
                self.resolve_polygon_ball(pair, bodies, state, true, ball)
            }
            (ShapeType::Ball, ShapeType::ConvexPolygon) => {
                let ball = shape1.as_ball().ok_or(Unsupported)?;
                self.resolve_polygon_ball(pair, bodies, state, false, ball)
            }
            _ => Err(Unsupported),
        }
    }

    /// Records `contact` on the pair if the bodies are not separating at the contact point.
    fn respond(
        &self,
        pair: &mut CollisionPair,
        contact: Contact,
        bodies: &PairBodies,
        state: &PhysicsState,
    ) -> FeatureStatus {
        let arm1 = contact.point - state.position(bodies.i1);
        let arm2 = contact.point - state.position(bodies.i2);
        let relative_velocity = (state.velocity_at_arm(bodies.i1, &arm1)
            - state.velocity_at_arm(bodies.i2, &arm2))
        .dot(&*contact.normal);

        if relative_velocity <= 0.0 {
            pair.contact = Some(ResolvedContact {
                point: contact.point,
                normal: contact.normal,
                arm1,
                arm2,
                relative_velocity,
            });
            FeatureStatus::AddedResponse
        } else {
            FeatureStatus::FoundFeatures
        }
    }

    fn test_ball_ball(
        &self,
        pair: &mut CollisionPair,
        bodies: &PairBodies,
        state: &PhysicsState,
    ) -> Result<FeatureStatus, Unsupported> {
        let ball1 = bodies.body1.shape().as_ball().ok_or(Unsupported)?;
        let ball2 = bodies.body2.shape().as_ball().ok_or(Unsupported)?;
        let contact = contact_ball_ball(
            &state.position(bodies.i1),
            ball1,
            &state.position(bodies.i2),
            ball2,
            self.contact_tolerance,
        );

        Ok(match contact {
            Some(contact) => self.respond(pair, contact, bodies, state),
            None => FeatureStatus::FoundFeatures,
        })
    }

    fn test_polygon_polygon(
        &self,
        pair: &mut CollisionPair,
        bodies: &PairBodies,
        state: &PhysicsState,
    ) -> Result<FeatureStatus, Unsupported> {
        let pos1 = state.pose(bodies.i1);
        let pos2 = state.pose(bodies.i2);
        let poly1 = bodies.body1.polygon_features(&pos1).ok_or(Unsupported)?;
        let poly2 = bodies.body2.polygon_features(&pos2).ok_or(Unsupported)?;

        let result = contact_polygon_polygon(
            &poly1,
            &state.position(bodies.i1),
            &poly2,
            &state.position(bodies.i2),
            pair.features,
            self.parallel_tolerance,
        );

        let Some((contact, features)) = result else {
            return Ok(FeatureStatus::Penetration);
        };

        pair.features = features;
        if contact.dist < self.contact_tolerance {
            Ok(self.respond(pair, contact, bodies, state))
        } else {
            Ok(FeatureStatus::FoundFeatures)
        }
    }

    /// Tests a polygon against a ball, or against a polygon approximated by a ball.
    ///
    /// With `force`, the contact is recorded whatever the distance between
    /// the shapes, as long as they do not separate.
    fn test_polygon_ball(
        &self,
        pair: &mut CollisionPair,
        bodies: &PairBodies,
        state: &PhysicsState,
        polygon_is_body1: bool,
        ball: &Ball,
        force: bool,
    ) -> Result<FeatureStatus, Unsupported> {
        let (polygon_body, polygon_i, ball_i) = if polygon_is_body1 {
            (bodies.body1, bodies.i1, bodies.i2)
        } else {
            (bodies.body2, bodies.i2, bodies.i1)
        };

        let poly = polygon_body
            .polygon_features(&state.pose(polygon_i))
            .ok_or(Unsupported)?;
        let result = contact_polygon_ball(&poly, &state.position(ball_i), ball, pair.features.0);

        let Some((contact, feature)) = result else {
            return Ok(FeatureStatus::Penetration);
        };

        pair.features = (feature, 0);
        let contact = if polygon_is_body1 {
            contact
        } else {
            contact.flipped()
        };

        if force || contact.dist < self.contact_tolerance {
            Ok(self.respond(pair, contact, bodies, state))
        } else {
            Ok(FeatureStatus::FoundFeatures)
        }
    }

    fn resolve_polygon_polygon(
        &self,
        pair: &mut CollisionPair,
        bodies: &PairBodies,
        state: &mut PhysicsState,
    ) -> Result<bool, Unsupported> {
        let status = self.test_polygon_polygon(pair, bodies, state)?;
        if status != FeatureStatus::Penetration {
            return Ok(status == FeatureStatus::AddedResponse);
        }

        let search = time_of_impact(state, &bodies.mobile_indices(), &self.toi, |s| {
            self.test_polygon_polygon(pair, bodies, s)
        })?;
        log::debug!(
            "time of impact between {:?} and {:?}: {:?} after {} iterations",
            pair.body1,
            pair.body2,
            search.status,
            search.iterations
        );

        if search.status == FeatureStatus::AddedResponse {
            return Ok(true);
        }

        // Approximate the mobile polygon by its bounding circle.
        let fallback = match (bodies.body1.is_stationary(), bodies.body2.is_stationary()) {
            (true, false) => Some((true, bodies.body2.shape().bounding_radius())),
            (false, true) => Some((false, bodies.body1.shape().bounding_radius())),
            _ => None,
        };

        if let Some((polygon_is_body1, radius)) = fallback {
            let ball = Ball::new(radius);
            let status =
                self.test_polygon_ball(pair, bodies, state, polygon_is_body1, &ball, true)?;
            if status != FeatureStatus::Penetration {
                log::debug!(
                    "{:?} and {:?} resolved by their bounding circle",
                    pair.body1,
                    pair.body2
                );
                return Ok(status == FeatureStatus::AddedResponse);
            }
        }

        self.suppress(pair);
        Ok(false)
    }

    fn resolve_polygon_ball(
        &self,
        pair: &mut CollisionPair,
        bodies: &PairBodies,
        state: &mut PhysicsState,
        polygon_is_body1: bool,
        ball: &Ball,
    ) -> Result<bool, Unsupported> {
        let status = self.test_polygon_ball(pair, bodies, state, polygon_is_body1, ball, false)?;
        if status != FeatureStatus::Penetration {
            return Ok(status == FeatureStatus::AddedResponse);
        }

        let search = time_of_impact(state, &bodies.mobile_indices(), &self.toi, |s| {
            self.test_polygon_ball(pair, bodies, s, polygon_is_body1, ball, false)
        })?;
        log::debug!(
            "time of impact between {:?} and {:?}: {:?} after {} iterations",
            pair.body1,
            pair.body2,
            search.status,
            search.iterations
        );

        if search.status == FeatureStatus::AddedResponse {
            return Ok(true);
        }

        self.suppress(pair);
        Ok(false)
    }

    fn suppress(&self, pair: &mut CollisionPair) {
        log::warn!(
            "{:?} and {:?} interpenetrate too deeply, ignoring them until they separate",
            pair.body1,
            pair.body2
        );
        pair.contact = None;
        pair.no_collision = true;
    }
}
