use crate::dynamics::RigidBody;
use crate::SimulationError;
use slab::Slab;

/// The stable identifier of a body registered to a world.
///
/// A handle is a slot index paired with the generation of that slot. Slots of
/// removed bodies are reused, but with a new generation, so handles of
/// removed bodies never identify the bodies inserted after them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    /// Splits this handle into its slot index and generation.
    #[inline]
    pub fn into_raw_parts(self) -> (u32, u32) {
        (self.index, self.generation)
    }

    /// Creates a handle from a slot index and a generation.
    #[inline]
    pub fn from_raw_parts(index: u32, generation: u32) -> Self {
        BodyHandle { index, generation }
    }
}

/// The arena of the bodies registered to a world.
///
/// Bodies are addressed by stable [`BodyHandle`]s. They also have a dense
/// index, their slot in the state vectors, which only changes when removed
/// bodies are compacted away at the end of a step.
#[derive(Debug, Default)]
pub struct BodySet {
    bodies: Slab<RigidBody>,
    // The current generation of every slot ever used by `bodies`.
    generations: Vec<u32>,
    order: Vec<BodyHandle>,
}

impl BodySet {
    /// Creates an empty set of bodies.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of bodies in this set.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Is this set empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Is `handle` the handle of a body of this set?
    #[inline]
    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.slot(handle).is_some()
    }

    /// Gets the body with the given handle.
    #[inline]
    pub fn get(&self, handle: BodyHandle) -> Option<&RigidBody> {
        self.bodies.get(self.slot(handle)?)
    }

    /// Gets mutably the body with the given handle.
    #[inline]
    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut RigidBody> {
        let slot = self.slot(handle)?;
        self.bodies.get_mut(slot)
    }

    /// The slab key of `handle`, if its generation is still the current one.
    fn slot(&self, handle: BodyHandle) -> Option<usize> {
        let slot = handle.index as usize;
        (self.generations.get(slot) == Some(&handle.generation) && self.bodies.contains(slot))
            .then_some(slot)
    }

    /// Gets the body with the given handle, or fails with [`SimulationError::UnregisteredBody`].
    pub fn try_get(&self, handle: BodyHandle) -> Result<&RigidBody, SimulationError> {
        self.get(handle)
            .ok_or(SimulationError::UnregisteredBody(handle))
    }

    /// The state index of the body with the given handle.
    pub fn index_of(&self, handle: BodyHandle) -> Result<usize, SimulationError> {
        self.get(handle)
            .and_then(|body| body.state_index)
            .ok_or(SimulationError::UnregisteredBody(handle))
    }

    /// The handle of the body at the given state index.
    #[inline]
    pub fn handle_at(&self, index: usize) -> Option<BodyHandle> {
        self.order.get(index).copied()
    }

    /// Iterates through all the bodies, ordered by state index.
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &RigidBody)> {
        self.order
            .iter()
            .filter_map(move |h| self.get(*h).map(|body| (*h, body)))
    }

    /// Inserts a body that will occupy the next state index.
    pub(crate) fn insert(&mut self, mut body: RigidBody) -> BodyHandle {
        body.state_index = Some(self.order.len());
        let slot = self.bodies.insert(body);
        if slot == self.generations.len() {
            self.generations.push(0);
        }
        let handle = BodyHandle::from_raw_parts(slot as u32, self.generations[slot]);
        self.order.push(handle);
        handle
    }

    /// Removes the given bodies and compacts the state indices of the others.
    ///
    /// Returns the removed bodies, and the former state indices of the
    /// remaining ones ordered by their new index.
    pub(crate) fn remove_batch(
        &mut self,
        handles: &[BodyHandle],
    ) -> (Vec<(BodyHandle, RigidBody)>, Vec<usize>) {
        let mut removed = Vec::with_capacity(handles.len());
        for handle in handles {
            let Some(slot) = self.slot(*handle) else {
                continue;
            };
            if let Some(mut body) = self.bodies.try_remove(slot) {
                self.generations[slot] = self.generations[slot].wrapping_add(1);
                body.state_index = None;
                body.features_cache = None;
                removed.push((*handle, body));
            }
        }

        let old_order = core::mem::take(&mut self.order);
        let mut kept = Vec::with_capacity(old_order.len());
        let mut order = Vec::with_capacity(old_order.len());
        for (old_index, handle) in old_order.iter().enumerate() {
            if let Some(body) = self.get_mut(*handle) {
                body.state_index = Some(order.len());
                order.push(*handle);
                kept.push(old_index);
            }
        }
        self.order = order;

        (removed, kept)
    }
}

#[cfg(test)]
mod test {
    use super::BodySet;
    use crate::dynamics::RigidBody;
    use crate::shape::SharedShape;
    use crate::SimulationError;

    #[test]
    fn removal_compacts_indices() {
        let mut set = BodySet::new();
        let a = set.insert(RigidBody::mobile(SharedShape::ball(1.0), 1.0));
        let b = set.insert(RigidBody::mobile(SharedShape::ball(1.0), 1.0));
        let c = set.insert(RigidBody::mobile(SharedShape::ball(1.0), 1.0));
        assert_eq!(set.index_of(c), Ok(2));

        let (removed, kept) = set.remove_batch(&[b]);
        assert_eq!(removed.len(), 1);
        assert!(!removed[0].1.is_registered());
        assert_eq!(kept, vec![0, 2]);
        assert_eq!(set.index_of(a), Ok(0));
        assert_eq!(set.index_of(c), Ok(1));
        assert_eq!(set.handle_at(1), Some(c));
        assert_eq!(set.index_of(b), Err(SimulationError::UnregisteredBody(b)));
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn reused_slots_get_new_handles() {
        let mut set = BodySet::new();
        let a = set.insert(RigidBody::mobile(SharedShape::ball(1.0), 1.0));
        let _ = set.remove_batch(&[a]);

        let b = set.insert(RigidBody::mobile(SharedShape::ball(1.0), 1.0));
        assert_eq!(a.into_raw_parts().0, b.into_raw_parts().0);
        assert_ne!(a, b);
        assert!(!set.contains(a));
        assert!(set.get(a).is_none());
        assert_eq!(set.index_of(a), Err(SimulationError::UnregisteredBody(a)));
        assert_eq!(set.index_of(b), Ok(0));

        // Removing a stale handle leaves the new body alone.
        let (removed, kept) = set.remove_batch(&[a]);
        assert!(removed.is_empty());
        assert_eq!(kept, vec![0]);
        assert!(set.contains(b));
    }
}
