//! Face adjacency and spanning forest construction.
//!
//! The faces produced by [`merge_faces`](super::merge_faces) are connected
//! through the edges they share. A spanning tree over each connected
//! component decides which shared edges stay attached (hinges) in the net;
//! every other shared edge is cut.

use tracing::debug;

use super::merge::{Face, MergedFaces};
use crate::error::Result;
use crate::mesh::{EdgeAdjacency, EdgeKey, FaceId, MeshIndex};

/// A node of an [`UnfoldTree`].
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode<I: MeshIndex = u32> {
    /// The face placed by this node.
    pub face: FaceId<I>,

    /// The edge shared with the parent face. `None` for the root.
    pub hinge: Option<EdgeKey<I>>,

    /// Index of the parent node within the tree.
    pub parent: Option<usize>,

    /// Indices of the child nodes within the tree.
    pub children: Vec<usize>,
}

/// One spanning tree over a connected component of faces.
///
/// Nodes are stored in an arena; node `0` is the root and children always
/// come after their parent.
#[derive(Debug, Clone, PartialEq)]
pub struct UnfoldTree<I: MeshIndex = u32> {
    nodes: Vec<TreeNode<I>>,
}

impl<I: MeshIndex> UnfoldTree<I> {
    pub(crate) fn with_root(face: FaceId<I>) -> Self {
        Self {
            nodes: vec![TreeNode {
                face,
                hinge: None,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub(crate) fn attach(&mut self, parent: usize, face: FaceId<I>, hinge: EdgeKey<I>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(TreeNode {
            face,
            hinge: Some(hinge),
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent].children.push(id);
        id
    }

    /// The root node.
    #[inline]
    pub fn root(&self) -> &TreeNode<I> {
        &self.nodes[0]
    }

    /// Get a node by its index.
    #[inline]
    pub fn node(&self, id: usize) -> &TreeNode<I> {
        &self.nodes[id]
    }

    /// All nodes, root first.
    #[inline]
    pub fn nodes(&self) -> &[TreeNode<I>] {
        &self.nodes
    }

    /// Number of faces in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over the faces of the tree.
    pub fn faces(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.nodes.iter().map(|n| n.face)
    }

    /// Iterate over `(parent face, child face, hinge)` triples.
    pub fn hinges(&self) -> impl Iterator<Item = (FaceId<I>, FaceId<I>, EdgeKey<I>)> + '_ {
        self.nodes.iter().filter_map(move |n| {
            let parent = n.parent?;
            let hinge = n.hinge?;
            Some((self.nodes[parent].face, n.face, hinge))
        })
    }
}

/// Spanning forest over the face adjacency graph.
#[derive(Debug, Clone)]
pub struct Forest<I: MeshIndex = u32> {
    /// One tree per connected component, ordered by smallest face index.
    pub trees: Vec<UnfoldTree<I>>,

    /// Face-level edge adjacency.
    pub face_adjacency: EdgeAdjacency<I, FaceId<I>>,
}

impl<I: MeshIndex> Forest<I> {
    /// Number of trees (connected components).
    #[inline]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Check if the forest has no trees.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Total number of faces over all trees.
    pub fn num_faces(&self) -> usize {
        self.trees.iter().map(UnfoldTree::len).sum()
    }
}

/// Build the face adjacency table.
///
/// Faces without a plane (see [`Face::has_plane`]) contribute no edges, so
/// they never join a tree and other faces route around them.
pub fn face_adjacency<I: MeshIndex>(faces: &[Face<I>]) -> EdgeAdjacency<I, FaceId<I>> {
    let mut adjacency = EdgeAdjacency::new();
    for (fi, face) in faces.iter().enumerate() {
        if !face.has_plane() {
            continue;
        }
        for edge in face.edges().filter(|e| !e.is_loop()) {
            adjacency.insert(edge, FaceId::new(fi));
        }
    }
    adjacency
}

/// Build a spanning forest over the merged faces.
///
/// Each connected component gets one tree, rooted at its smallest face index.
/// From every face, the shared edges are tried shortest first, so short
/// hinges are preferred.
///
/// # Errors
///
/// Returns [`GeometryError::NonManifoldEdge`](crate::error::GeometryError::NonManifoldEdge)
/// if an edge borders more than two faces.
pub fn build_forest<I: MeshIndex>(merged: &MergedFaces<I>) -> Result<Forest<I>> {
    let faces = &merged.faces;
    let face_adjacency = face_adjacency(faces);
    face_adjacency.check_manifold()?;

    let mut visited = vec![false; faces.len()];
    let mut trees = Vec::new();

    for start in 0..faces.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;

        let mut tree = UnfoldTree::with_root(FaceId::new(start));
        let mut stack = vec![0usize];

        while let Some(node) = stack.pop() {
            let face_id = tree.node(node).face;
            let face = &faces[face_id.index()];
            if !face.has_plane() {
                continue;
            }

            let mut edges: Vec<EdgeKey<I>> = face.edges().filter(|e| !e.is_loop()).collect();
            // Stable sort: equal lengths keep cycle order
            edges.sort_by(|a, b| {
                let la = merged.edge_length(*a).unwrap_or(f64::INFINITY);
                let lb = merged.edge_length(*b).unwrap_or(f64::INFINITY);
                la.total_cmp(&lb)
            });

            for edge in edges {
                let Some(other) = face_adjacency.opposite(edge, face_id) else {
                    continue;
                };
                if visited[other.index()] {
                    continue;
                }
                visited[other.index()] = true;
                let child = tree.attach(node, other, edge);
                stack.push(child);
            }
        }

        trees.push(tree);
    }

    debug!(
        "spanning forest: {} faces in {} trees",
        faces.len(),
        trees.len()
    );

    Ok(Forest {
        trees,
        face_adjacency,
    })
}
