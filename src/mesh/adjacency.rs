//! Edge adjacency tables.
//!
//! Provides lookups from an undirected edge to the elements (triangles or
//! merged faces) that have it on their boundary.

use hashbrown::HashMap;

use super::edge::EdgeKey;
use super::index::MeshIndex;
use crate::error::GeometryError;

/// Map from canonical edge to the elements incident to it.
///
/// `T` is the element id type, usually [`TriangleId`](super::TriangleId) or
/// [`FaceId`](super::FaceId). Elements are listed in insertion order and each
/// element appears at most once per edge.
#[derive(Debug, Clone)]
pub struct EdgeAdjacency<I: MeshIndex, T> {
    edge_to_elements: HashMap<EdgeKey<I>, Vec<T>>,
}

impl<I: MeshIndex, T: Copy + PartialEq> Default for EdgeAdjacency<I, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex, T: Copy + PartialEq> EdgeAdjacency<I, T> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            edge_to_elements: HashMap::new(),
        }
    }

    /// Record `element` as incident to `edge`.
    ///
    /// Returns `true` if the element was not already listed for the edge.
    pub fn insert(&mut self, edge: EdgeKey<I>, element: T) -> bool {
        let list = self.edge_to_elements.entry(edge).or_default();
        if list.contains(&element) {
            return false;
        }
        list.push(element);
        true
    }

    /// Elements incident to an edge (empty if the edge is unknown).
    #[must_use]
    pub fn incident(&self, edge: EdgeKey<I>) -> &[T] {
        self.edge_to_elements
            .get(&edge)
            .map_or(&[], Vec::as_slice)
    }

    /// The element on the other side of `edge` from `element`.
    ///
    /// Returns `None` for boundary edges (and for edges the element is not on).
    #[must_use]
    pub fn opposite(&self, edge: EdgeKey<I>, element: T) -> Option<T> {
        match self.incident(edge) {
            [x, y] if *x == element => Some(*y),
            [x, y] if *y == element => Some(*x),
            _ => None,
        }
    }

    /// Check if the edge is known.
    #[must_use]
    pub fn contains(&self, edge: EdgeKey<I>) -> bool {
        self.edge_to_elements.contains_key(&edge)
    }

    /// Total number of distinct edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_to_elements.len()
    }

    /// Iterate over all edges with their incident elements.
    pub fn iter(&self) -> impl Iterator<Item = (EdgeKey<I>, &[T])> + '_ {
        self.edge_to_elements
            .iter()
            .map(|(&edge, elements)| (edge, elements.as_slice()))
    }

    /// Iterate over boundary edges (exactly one incident element).
    pub fn boundary_edges(&self) -> impl Iterator<Item = EdgeKey<I>> + '_ {
        self.edge_to_elements
            .iter()
            .filter(|(_, elements)| elements.len() == 1)
            .map(|(&edge, _)| edge)
    }

    /// Iterate over non-manifold edges (more than two incident elements).
    pub fn non_manifold_edges(&self) -> impl Iterator<Item = EdgeKey<I>> + '_ {
        self.edge_to_elements
            .iter()
            .filter(|(_, elements)| elements.len() > 2)
            .map(|(&edge, _)| edge)
    }

    /// Check if every edge has exactly two incident elements.
    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.edge_to_elements.values().all(|elements| elements.len() == 2)
    }

    /// Fail with [`GeometryError::NonManifoldEdge`] on the first edge with
    /// more than two incident elements (smallest edge first, for stable reports).
    pub fn check_manifold(&self) -> std::result::Result<(), GeometryError> {
        let worst = self
            .edge_to_elements
            .iter()
            .filter(|(_, elements)| elements.len() > 2)
            .min_by_key(|(edge, _)| **edge);

        match worst {
            Some((edge, elements)) => Err(GeometryError::NonManifoldEdge {
                a: edge.lo().index(),
                b: edge.hi().index(),
                count: elements.len(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{PointId, TriangleId};

    fn key(a: usize, b: usize) -> EdgeKey {
        EdgeKey::new(PointId::new(a), PointId::new(b))
    }

    fn t(i: usize) -> TriangleId {
        TriangleId::new(i)
    }

    #[test]
    fn test_insert_deduplicates() {
        let mut adj: EdgeAdjacency<u32, TriangleId> = EdgeAdjacency::new();
        assert!(adj.insert(key(0, 1), t(0)));
        assert!(!adj.insert(key(1, 0), t(0)));
        assert!(adj.insert(key(1, 0), t(1)));

        assert_eq!(adj.incident(key(0, 1)), &[t(0), t(1)]);
        assert_eq!(adj.edge_count(), 1);
        assert!(adj.incident(key(5, 6)).is_empty());
    }

    #[test]
    fn test_opposite() {
        let mut adj: EdgeAdjacency<u32, TriangleId> = EdgeAdjacency::new();
        adj.insert(key(0, 1), t(0));
        adj.insert(key(0, 1), t(3));
        adj.insert(key(1, 2), t(0));

        assert_eq!(adj.opposite(key(0, 1), t(0)), Some(t(3)));
        assert_eq!(adj.opposite(key(0, 1), t(3)), Some(t(0)));
        assert_eq!(adj.opposite(key(1, 2), t(0)), None);
    }

    #[test]
    fn test_boundary_and_watertight() {
        let mut adj: EdgeAdjacency<u32, TriangleId> = EdgeAdjacency::new();
        adj.insert(key(0, 1), t(0));
        adj.insert(key(0, 1), t(1));
        adj.insert(key(1, 2), t(0));

        assert_eq!(adj.boundary_edges().count(), 1);
        assert!(!adj.is_watertight());
        assert!(adj.check_manifold().is_ok());
    }

    #[test]
    fn test_non_manifold() {
        let mut adj: EdgeAdjacency<u32, TriangleId> = EdgeAdjacency::new();
        for i in 0..3 {
            adj.insert(key(4, 2), t(i));
        }

        assert_eq!(adj.non_manifold_edges().count(), 1);
        assert_eq!(
            adj.check_manifold(),
            Err(GeometryError::NonManifoldEdge { a: 2, b: 4, count: 3 })
        );
    }
}
