/// Scene graph nodes with local transforms and optional meshes
use nalgebra::Matrix4;

use crate::geometry::Mesh;
use crate::transform::NodeTransform;
use crate::traverse::{Hierarchy, HierarchyMut, Transformed};

/// A node in the scene tree. Children are owned, so dropping a node drops
/// its whole subtree.
#[derive(Debug, Clone, Default)]
pub struct SceneNode {
    pub name: String,
    pub transform: NodeTransform,
    pub mesh: Option<Mesh>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// An empty grouping node
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh: Some(mesh),
            ..Self::default()
        }
    }

    pub fn with_transform(mut self, transform: NodeTransform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// Number of nodes in the subtree, this one included
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Depth-first search by name
    pub fn find(&self, name: &str) -> Option<&SceneNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

impl Hierarchy for SceneNode {
    fn children(&self) -> &[Self] {
        &self.children
    }

    fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }
}

impl HierarchyMut for SceneNode {
    fn children_mut(&mut self) -> &mut [Self] {
        &mut self.children
    }

    fn mesh_mut(&mut self) -> Option<&mut Mesh> {
        self.mesh.as_mut()
    }
}

impl Transformed for SceneNode {
    fn local_matrix(&self) -> Matrix4<f32> {
        self.transform.matrix()
    }
}
