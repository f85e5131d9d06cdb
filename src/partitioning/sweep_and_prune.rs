use crate::dynamics::{BodyHandle, PhysicsState};
use crate::math::{Real, Vector, DIM};
use crate::query::CollisionPair;
use crate::utils::SortedPair;
use indexmap::IndexMap;

#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// The coordinate axes along which the extents of two bodies overlap.
pub struct AxisOverlap(u8);

bitflags::bitflags! {
    impl AxisOverlap: u8 {
        /// The extents overlap along the `x` axis.
        const X = 1 << 0;
        /// The extents overlap along the `y` axis.
        const Y = 1 << 1;
    }
}

impl AxisOverlap {
    /// The flag of the `axis`-th coordinate axis.
    pub fn axis(axis: usize) -> Self {
        if axis == 0 {
            Self::X
        } else {
            Self::Y
        }
    }
}

/// One end of the extent of a body along an axis.
#[derive(Copy, Clone, Debug)]
struct Endpoint {
    body: usize,
    offset: Real,
    value: Real,
    is_start: bool,
}

/// A broad-phase based on sorted endpoint lists.
///
/// The extent of every body along each axis is an interval around its
/// center, widened by a padding. Both endpoints of every interval are kept
/// in one sorted list per axis. Since bodies move little between two
/// steps, these lists are nearly sorted and an insertion sort restores
/// them cheaply. Each swap between two endpoints updates whether their
/// bodies overlap along that axis, and a pair becomes active once its
/// bodies overlap along every axis.
///
/// Pairs of stationary bodies never become active.
#[derive(Clone, Debug, Default)]
pub struct SweepAndPrune {
    padding: Real,
    axes: [Vec<Endpoint>; DIM],
    handles: Vec<BodyHandle>,
    stationary: Vec<bool>,
    // Row `i` holds the overlaps of body `i` with the bodies `0..i`.
    overlaps: Vec<Vec<AxisOverlap>>,
    pairs: IndexMap<SortedPair<BodyHandle>, CollisionPair>,
}

impl SweepAndPrune {
    /// Creates an empty broad-phase that widens every extent by `padding` on each side.
    pub fn new(padding: Real) -> Self {
        Self {
            padding,
            ..Default::default()
        }
    }

    /// The padding added on each side of the extents.
    pub fn padding(&self) -> Real {
        self.padding
    }

    /// The number of registered bodies.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Is no body registered?
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Registers the body with state index `index`.
    ///
    /// Bodies must be registered in increasing index order, starting from 0.
    /// `half_extents` bounds the distance between the body center and any
    /// point of its shape along each axis. The pairs the new body forms
    /// are activated right away, using its position in `state`.
    pub fn register(
        &mut self,
        index: usize,
        handle: BodyHandle,
        half_extents: &Vector<Real>,
        stationary: bool,
        state: &PhysicsState,
    ) {
        debug_assert_eq!(index, self.handles.len());

        let position = state.position(index);
        for (axis, endpoints) in self.axes.iter_mut().enumerate() {
            let extent = half_extents[axis] + self.padding;
            for (offset, is_start) in [(-extent, true), (extent, false)] {
                endpoints.push(Endpoint {
                    body: index,
                    offset,
                    value: position[axis] + offset,
                    is_start,
                });
            }
        }

        self.handles.push(handle);
        self.stationary.push(stationary);
        self.overlaps.push(vec![AxisOverlap::empty(); index]);

        for axis in 0..DIM {
            self.sort_axis(axis);
        }
    }

    /// Moves the endpoints to the current body positions and updates the active pairs.
    pub fn update(&mut self, state: &PhysicsState) {
        for (axis, endpoints) in self.axes.iter_mut().enumerate() {
            for endpoint in endpoints.iter_mut() {
                endpoint.value = state.position(endpoint.body)[axis] + endpoint.offset;
            }
        }

        for axis in 0..DIM {
            self.sort_axis(axis);
        }
    }

    /// Unregisters every body and forgets every pair.
    pub fn clear(&mut self) {
        for endpoints in &mut self.axes {
            endpoints.clear();
        }
        self.handles.clear();
        self.stationary.clear();
        self.overlaps.clear();
        self.pairs.clear();
    }

    /// The axes along which the extents of the bodies with indices `i` and `j` overlap.
    pub fn overlap(&self, i: usize, j: usize) -> AxisOverlap {
        let (hi, lo) = if i > j { (i, j) } else { (j, i) };
        self.overlaps
            .get(hi)
            .and_then(|row| row.get(lo))
            .copied()
            .unwrap_or_default()
    }

    /// The pairs of bodies overlapping along every axis, in activation order.
    pub fn active_pairs(&self) -> &IndexMap<SortedPair<BodyHandle>, CollisionPair> {
        &self.pairs
    }

    /// Mutable access to the active pairs, for the narrow-phase to update their features.
    pub fn active_pairs_mut(&mut self) -> &mut IndexMap<SortedPair<BodyHandle>, CollisionPair> {
        &mut self.pairs
    }

    fn sort_axis(&mut self, axis: usize) {
        let mut endpoints = core::mem::take(&mut self.axes[axis]);

        for i in 1..endpoints.len() {
            let mut j = i;
            while j > 0 && endpoints[j - 1].value > endpoints[j].value {
                self.endpoints_swapped(&endpoints[j], &endpoints[j - 1], axis);
                endpoints.swap(j - 1, j);
                j -= 1;
            }
        }

        self.axes[axis] = endpoints;
    }

    /// Updates the overlap of two bodies after `moving` went left past `passed`.
    fn endpoints_swapped(&mut self, moving: &Endpoint, passed: &Endpoint, axis: usize) {
        if moving.body == passed.body {
            return;
        }

        let (hi, lo) = if moving.body > passed.body {
            (moving.body, passed.body)
        } else {
            (passed.body, moving.body)
        };
        let (handle1, handle2) = (self.handles[hi], self.handles[lo]);
        let key = SortedPair::new(handle1, handle2);
        let overlap = &mut self.overlaps[hi][lo];

        if moving.is_start {
            overlap.insert(AxisOverlap::axis(axis));
            if overlap.is_all() && !(self.stationary[hi] && self.stationary[lo]) {
                let _ = self.pairs.entry(key).or_insert_with(|| {
                    log::trace!("pair {:?} became active", key);
                    CollisionPair::new(handle1, handle2)
                });
            }
        } else if passed.is_start {
            overlap.remove(AxisOverlap::axis(axis));
            if self.pairs.shift_remove(&key).is_some() {
                log::trace!("pair {:?} became inactive", key);
            }
        }
    }
}
