use core::cmp::PartialOrd;
use core::ops::Deref;

/// A pair of elements sorted in increasing order.
///
/// Two pairs built from the same elements compare and hash equal regardless
/// of the order the elements were given in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SortedPair<T: PartialOrd>((T, T));

impl<T: PartialOrd> SortedPair<T> {
    /// Sorts two elements in increasing order into a new pair.
    pub fn new(element1: T, element2: T) -> Self {
        if element1 > element2 {
            SortedPair((element2, element1))
        } else {
            SortedPair((element1, element2))
        }
    }

    /// Returns `true` if `element` is one of the two elements of this pair.
    pub fn contains(&self, element: &T) -> bool {
        self.0 .0 == *element || self.0 .1 == *element
    }
}

impl<T: PartialOrd + Copy> SortedPair<T> {
    /// Given one element of the pair, returns the other one.
    pub fn other(&self, element: T) -> Option<T> {
        if self.0 .0 == element {
            Some(self.0 .1)
        } else if self.0 .1 == element {
            Some(self.0 .0)
        } else {
            None
        }
    }
}

impl<T: PartialOrd> Deref for SortedPair<T> {
    type Target = (T, T);

    fn deref(&self) -> &(T, T) {
        &self.0
    }
}
