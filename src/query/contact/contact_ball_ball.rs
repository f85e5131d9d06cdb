use crate::math::{Point, Real, Vector};
use crate::query::Contact;
use crate::shape::Ball;
use na::Unit;
use num::Zero;

/// Contact between balls.
///
/// Returns `None` if the balls are further apart than `prediction`.
#[inline]
pub fn contact_ball_ball(
    center1: &Point<Real>,
    b1: &Ball,
    center2: &Point<Real>,
    b2: &Ball,
    prediction: Real,
) -> Option<Contact> {
    let r1 = b1.radius;
    let r2 = b2.radius;
    let center2_1 = center1 - center2;
    let distance_squared = center2_1.norm_squared();
    let sum_radius = r1 + r2;
    let sum_radius_with_error = sum_radius + prediction;

    if distance_squared < sum_radius_with_error * sum_radius_with_error {
        let normal = if !distance_squared.is_zero() {
            Unit::new_normalize(center2_1)
        } else {
            Vector::x_axis()
        };

        Some(Contact::new(
            center2 + *normal * r2,
            normal,
            distance_squared.sqrt() - sum_radius,
        ))
    } else {
        None
    }
}
