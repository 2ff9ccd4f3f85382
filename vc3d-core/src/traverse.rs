//! Depth-first traversal over mesh-bearing trees.
//!
//! The walkers are free functions over the [`Hierarchy`] trait so they work
//! with any tree that can list its children and optionally carries a mesh.
//! Every call walks the tree afresh; nothing is cached between calls.

use nalgebra::Matrix4;

use crate::geometry::Mesh;

/// A tree node that owns its children and may carry a mesh
pub trait Hierarchy: Sized {
    fn children(&self) -> &[Self];

    fn mesh(&self) -> Option<&Mesh>;

    fn has_mesh(&self) -> bool {
        self.mesh().is_some()
    }
}

/// Trees whose nodes have a local transform
pub trait Transformed: Hierarchy {
    fn local_matrix(&self) -> Matrix4<f32>;
}

/// Lazy pre-order iterator over the mesh-bearing nodes of a tree
pub struct MeshNodes<'a, N> {
    stack: Vec<&'a N>,
}

impl<'a, N: Hierarchy> Iterator for MeshNodes<'a, N> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            // Reversed so the first sibling is popped first
            self.stack.extend(node.children().iter().rev());
            if node.has_mesh() {
                return Some(node);
            }
        }
        None
    }
}

/// Every node carrying a mesh, root included, parents before children and
/// siblings in insertion order
pub fn mesh_nodes<N: Hierarchy>(root: &N) -> MeshNodes<'_, N> {
    MeshNodes { stack: vec![root] }
}

/// Visit every node (mesh or not) in pre-order together with its depth
pub fn walk<N, F>(root: &N, mut visitor: F)
where
    N: Hierarchy,
    F: FnMut(&N, usize),
{
    let mut stack = vec![(root, 0)];
    while let Some((node, depth)) = stack.pop() {
        visitor(node, depth);
        stack.extend(node.children().iter().rev().map(|child| (child, depth + 1)));
    }
}

/// Lazy pre-order iterator pairing each mesh with its accumulated transform
pub struct WorldMeshes<'a, N> {
    stack: Vec<(&'a N, Matrix4<f32>)>,
}

impl<'a, N: Transformed> Iterator for WorldMeshes<'a, N> {
    type Item = (&'a Mesh, Matrix4<f32>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, parent)) = self.stack.pop() {
            let world = parent * node.local_matrix();
            self.stack
                .extend(node.children().iter().rev().map(|child| (child, world)));
            if let Some(mesh) = node.mesh() {
                return Some((mesh, world));
            }
        }
        None
    }
}

/// Meshes in traversal order with `base * ancestors * node` transforms.
///
/// Pass the identity as `base` for world space, or a partial root transform
/// to measure the tree in another frame.
pub fn world_meshes<N: Transformed>(root: &N, base: Matrix4<f32>) -> WorldMeshes<'_, N> {
    WorldMeshes {
        stack: vec![(root, base)],
    }
}

/// Trees whose meshes can be edited in place
pub trait HierarchyMut: Hierarchy {
    fn children_mut(&mut self) -> &mut [Self];

    fn mesh_mut(&mut self) -> Option<&mut Mesh>;
}

/// Mutably visit every mesh in the same order as [`mesh_nodes`]
pub fn for_each_mesh_mut<N, F>(root: &mut N, mut f: F)
where
    N: HierarchyMut,
    F: FnMut(&mut Mesh),
{
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if let Some(mesh) = node.mesh_mut() {
            f(mesh);
        }
        stack.extend(node.children_mut().iter_mut().rev());
    }
}
