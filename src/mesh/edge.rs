//! Canonical undirected edge keys.

use std::fmt::{self, Debug};

use super::index::{MeshIndex, PointId};

/// An undirected edge between two points, stored smaller index first.
///
/// Both traversal directions of a shared edge map to the same key, so the key
/// can be used to look up everything incident to the edge.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EdgeKey<I: MeshIndex = u32> {
    lo: PointId<I>,
    hi: PointId<I>,
}

impl<I: MeshIndex> EdgeKey<I> {
    /// Create the canonical key for the edge between `a` and `b`.
    #[inline]
    pub fn new(a: PointId<I>, b: PointId<I>) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// The endpoint with the smaller index.
    #[inline]
    pub fn lo(self) -> PointId<I> {
        self.lo
    }

    /// The endpoint with the larger index.
    #[inline]
    pub fn hi(self) -> PointId<I> {
        self.hi
    }

    /// Both endpoints, smaller index first.
    #[inline]
    pub fn endpoints(self) -> (PointId<I>, PointId<I>) {
        (self.lo, self.hi)
    }

    /// Check if the edge collapses onto a single point.
    #[inline]
    pub fn is_loop(self) -> bool {
        self.lo == self.hi
    }

    /// Given one endpoint, return the other one.
    pub fn opposite(self, p: PointId<I>) -> Option<PointId<I>> {
        if p == self.lo {
            Some(self.hi)
        } else if p == self.hi {
            Some(self.lo)
        } else {
            None
        }
    }
}

impl<I: MeshIndex> Debug for EdgeKey<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E({}-{})", self.lo.index(), self.hi.index())
    }
}

/// Pair every element with its cyclic successor (the last wraps to the first).
///
/// Sequences shorter than two elements have no pairs.
pub fn cyclic_pairs<T: Copy>(items: &[T]) -> impl Iterator<Item = (T, T)> + '_ {
    let n = if items.len() < 2 { 0 } else { items.len() };
    (0..n).map(move |i| (items[i], items[(i + 1) % n]))
}
