use nalgebra::{Point3, Vector3};
use vc3d_core::{
    compute_stats, fit, load_model_from_slice, mesh_nodes, normalize, scene_bounds, Geometry,
    Material, Mesh, ModelFormat, NodeTransform, NormalizeConfig, SceneNode, StatsRecord,
};

#[cfg(test)]
mod analyzer_tests {
    use super::*;

    fn cube_of_size(size: f32, offset: Vector3<f32>) -> SceneNode {
        let mut geometry = Geometry::cube(size);
        for position in &mut geometry.positions {
            *position += offset;
        }
        SceneNode::group("model").with_child(SceneNode::with_mesh("cube", Mesh::new(geometry)))
    }

    #[test]
    fn test_cube_end_to_end() {
        let mut root = cube_of_size(5.0, Vector3::new(7.0, 3.0, -2.0));

        let stats = compute_stats(&root, ModelFormat::Obj);
        assert_eq!(
            stats,
            StatsRecord {
                format: ModelFormat::Obj,
                vertex_count: 8,
                face_count: 12,
                edge_count: 12,
            }
        );

        let normalization = normalize(&mut root, &NormalizeConfig::with_target_size(2.6)).unwrap();
        assert!((normalization.scale - Vector3::repeat(0.52)).norm() < 1e-5);

        let bounds = scene_bounds(&root).unwrap();
        assert!(bounds.center().coords.norm() < 1e-5, "center at {:?}", bounds.center());
        assert!((bounds.size() - Vector3::repeat(2.6)).norm() < 1e-4);

        // Normalization never changes the counts
        assert_eq!(compute_stats(&root, ModelFormat::Obj), stats);
    }

    #[test]
    fn test_repeated_normalization_does_not_compound() {
        let mut root = cube_of_size(5.0, Vector3::zeros());
        let original = fit(&root, 1.0).unwrap();

        normalize(&mut root, &NormalizeConfig::with_target_size(2.6)).unwrap();
        normalize(&mut root, &NormalizeConfig::with_target_size(1.0)).unwrap();

        assert!((root.transform.scale - original.scale).norm() < 1e-6);
        assert!((root.transform.scale.x - 1.0 / 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_hierarchy_without_meshes() {
        let root = SceneNode::group("empty")
            .with_child(SceneNode::group("a").with_child(SceneNode::group("b")));

        assert_eq!(mesh_nodes(&root).count(), 0);
        let stats = compute_stats(&root, ModelFormat::Stl);
        assert_eq!((stats.vertex_count, stats.face_count, stats.edge_count), (0, 0, 0));
    }

    #[test]
    fn test_point_object_lands_at_origin() {
        let geometry = Geometry::new(vec![Point3::new(-4.0, 2.0, 8.0)]);
        let mut root = SceneNode::with_mesh("point", Mesh::new(geometry))
            .with_transform(NodeTransform::from_position(1.0, 1.0, 1.0));

        normalize(&mut root, &NormalizeConfig::default()).unwrap();

        assert_eq!(root.transform.scale, Vector3::repeat(1.0));
        let bounds = scene_bounds(&root).unwrap();
        assert!(bounds.min.coords.norm() < 1e-5);
        assert!(bounds.max.coords.norm() < 1e-5);
    }

    #[test]
    fn test_custom_default_material_is_used() {
        let mut root = cube_of_size(1.0, Vector3::zeros());
        let config = NormalizeConfig {
            default_material: Material::new([0.1, 0.2, 0.3]),
            cast_shadows: false,
            ..NormalizeConfig::default()
        };
        normalize(&mut root, &config).unwrap();

        let mesh = root.find("cube").and_then(|node| node.mesh.as_ref()).unwrap();
        assert_eq!(mesh.material.as_ref().map(|m| m.color), Some([0.1, 0.2, 0.3]));
        assert!(!mesh.cast_shadow);
        assert!(mesh.receive_shadow);
    }

    #[test]
    fn test_ascii_stl_model() {
        let stl = "solid tri
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 2 0 0
vertex 0 2 0
endloop
endfacet
endsolid tri
";
        let mut model = load_model_from_slice(stl.as_bytes(), ModelFormat::Stl, "tri").unwrap();
        let stats = model.stats();
        assert_eq!((stats.vertex_count, stats.face_count, stats.edge_count), (3, 1, 3));

        model.normalize(&NormalizeConfig::default()).unwrap();
        let bounds = scene_bounds(&model.root).unwrap();
        assert!((bounds.max_extent() - 2.6).abs() < 1e-4);
    }
}
