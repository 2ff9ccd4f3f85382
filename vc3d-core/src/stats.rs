/// Vertex, face and edge counts over a scene hierarchy
use std::fmt;

use serde::Serialize;

use crate::edges::{edge_count_at, DEFAULT_THRESHOLD_DEG};
use crate::format::ModelFormat;
use crate::traverse::{mesh_nodes, Hierarchy};

/// Snapshot of a hierarchy's geometry counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    pub format: ModelFormat,
    pub vertex_count: usize,
    pub face_count: usize,
    pub edge_count: usize,
}

impl StatsRecord {
    pub fn empty(format: ModelFormat) -> Self {
        Self {
            format,
            vertex_count: 0,
            face_count: 0,
            edge_count: 0,
        }
    }
}

impl fmt::Display for StatsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | vertices: {} | faces: {} | edges: {}",
            self.format, self.vertex_count, self.face_count, self.edge_count
        )
    }
}

/// Sum the counts of every mesh under `root`.
///
/// Faces come from the index buffer when present, otherwise from the
/// positions read as a triangle list; partial triangles are dropped.
pub fn compute_stats<N: Hierarchy>(root: &N, format: ModelFormat) -> StatsRecord {
    compute_stats_with(root, format, DEFAULT_THRESHOLD_DEG)
}

/// [`compute_stats`] with edges counted at `threshold_deg`
pub fn compute_stats_with<N: Hierarchy>(root: &N, format: ModelFormat, threshold_deg: f32) -> StatsRecord {
    mesh_nodes(root)
        .filter_map(|node| node.mesh())
        .fold(StatsRecord::empty(format), |mut stats, mesh| {
            let geometry = &mesh.geometry;
            stats.vertex_count += geometry.vertex_count();
            stats.face_count += geometry.face_count();
            stats.edge_count += edge_count_at(geometry, threshold_deg);
            stats
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Geometry, Mesh};
    use crate::scene::SceneNode;
    use nalgebra::Point3;

    fn line_of_points(count: usize) -> Vec<Point3<f32>> {
        (0..count).map(|i| Point3::new(i as f32, (i % 2) as f32, 0.0)).collect()
    }

    #[test]
    fn test_no_meshes() {
        let root = SceneNode::group("root").with_child(SceneNode::group("child"));
        assert_eq!(compute_stats(&root, ModelFormat::Gltf), StatsRecord::empty(ModelFormat::Gltf));
    }

    #[test]
    fn test_index_buffer_drives_faces() {
        let geometry = Geometry::indexed(line_of_points(40), (0..9).collect());
        let root = SceneNode::with_mesh("mesh", Mesh::new(geometry));

        let stats = compute_stats(&root, ModelFormat::Obj);
        assert_eq!(stats.vertex_count, 40);
        assert_eq!(stats.face_count, 3);
    }

    #[test]
    fn test_triangle_list_faces() {
        let root = SceneNode::with_mesh("mesh", Mesh::new(Geometry::new(line_of_points(12))));
        assert_eq!(compute_stats(&root, ModelFormat::Stl).face_count, 4);

        let root = SceneNode::with_mesh("mesh", Mesh::new(Geometry::new(line_of_points(10))));
        let stats = compute_stats(&root, ModelFormat::Stl);
        assert_eq!(stats.vertex_count, 10);
        assert_eq!(stats.face_count, 3);
    }

    #[test]
    fn test_cube_counts() {
        let root = SceneNode::with_mesh("cube", Mesh::new(Geometry::cube(5.0)));
        let stats = compute_stats(&root, ModelFormat::Obj);
        assert_eq!(stats.vertex_count, 8);
        assert_eq!(stats.face_count, 12);
        assert_eq!(stats.edge_count, 12);
    }

    #[test]
    fn test_edge_threshold() {
        let root = SceneNode::with_mesh("cube", Mesh::new(Geometry::cube(5.0)));
        assert_eq!(compute_stats_with(&root, ModelFormat::Obj, DEFAULT_THRESHOLD_DEG), compute_stats(&root, ModelFormat::Obj));
        // A zero threshold keeps the six face diagonals
        assert_eq!(compute_stats_with(&root, ModelFormat::Obj, 0.0).edge_count, 18);
    }

    #[test]
    fn test_counts_sum_across_hierarchy() {
        let cube = || Mesh::new(Geometry::cube(1.0));
        let root = SceneNode::with_mesh("a", cube())
            .with_child(SceneNode::group("g").with_child(SceneNode::with_mesh("b", cube())));

        let stats = compute_stats(&root, ModelFormat::Gltf);
        assert_eq!(stats.vertex_count, 16);
        assert_eq!(stats.face_count, 24);
        assert_eq!(stats.edge_count, 24);
    }

    #[test]
    fn test_json_field_names() {
        let stats = StatsRecord {
            format: ModelFormat::Obj,
            vertex_count: 8,
            face_count: 12,
            edge_count: 12,
        };
        let json = serde_json::to_string(&stats).unwrap();
        assert_eq!(json, r#"{"format":"OBJ","vertexCount":8,"faceCount":12,"edgeCount":12}"#);
    }
}
