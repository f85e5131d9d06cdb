use crate::dynamics::BodyHandle;
use crate::math::{Point, Real};

/// How a body wants a confirmed contact to be resolved.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CollisionResponse {
    /// No impulse is applied for this contact.
    Ignore = 0,
    /// The contact is resolved with the combined restitution of both bodies.
    #[default]
    Normal = 1,
    /// The contact is perfectly inelastic.
    Sticky = 2,
}

/// User hook notified of every confirmed contact involving a body.
///
/// The hook runs once for each of the two bodies, before the impulse
/// solve. If either body answers [`CollisionResponse::Ignore`] the contact
/// is dropped; if either answers [`CollisionResponse::Sticky`] it is
/// resolved without restitution.
pub trait CollisionHandler: Send + Sync {
    /// Called when `this` touches `other` at the world-space `contact_point`.
    fn handle_collision(
        &mut self,
        this: BodyHandle,
        other: BodyHandle,
        contact_point: &Point<Real>,
    ) -> CollisionResponse;
}

impl<F> CollisionHandler for F
where
    F: FnMut(BodyHandle, BodyHandle, &Point<Real>) -> CollisionResponse + Send + Sync,
{
    fn handle_collision(
        &mut self,
        this: BodyHandle,
        other: BodyHandle,
        contact_point: &Point<Real>,
    ) -> CollisionResponse {
        self(this, other, contact_point)
    }
}

impl CollisionResponse {
    /// Combines the answers of the two bodies of a contact.
    ///
    /// Returns `None` if the contact must be ignored.
    pub fn combine(self, other: CollisionResponse) -> Option<CollisionResponse> {
        match (self, other) {
            (CollisionResponse::Ignore, _) | (_, CollisionResponse::Ignore) => None,
            (CollisionResponse::Sticky, _) | (_, CollisionResponse::Sticky) => {
                Some(CollisionResponse::Sticky)
            }
            _ => Some(CollisionResponse::Normal),
        }
    }
}

#[cfg(test)]
mod test {
    use super::CollisionResponse::*;

    #[test]
    fn ignore_wins_then_sticky() {
        assert_eq!(Normal.combine(Normal), Some(Normal));
        assert_eq!(Normal.combine(Sticky), Some(Sticky));
        assert_eq!(Sticky.combine(Ignore), None);
        assert_eq!(Ignore as i32, 0);
        assert_eq!(Sticky as i32, 2);
    }
}
