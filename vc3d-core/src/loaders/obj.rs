//! Wavefront OBJ loading with MTL material libraries.
//!
//! Each OBJ object or group becomes a child node with its own indexed mesh.
//! Faces are triangulated and positions keep their own index stream, so
//! shared corners are counted once.

use std::path::Path;

use log::{debug, warn};
use nalgebra::Point3;

use crate::error::LoadResult;
use crate::geometry::{Geometry, Mesh};
use crate::material::Material;
use crate::scene::SceneNode;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Load an OBJ file, resolving `mtllib` references next to it
pub fn load_obj(path: &Path, name: &str) -> LoadResult<SceneNode> {
    let (models, materials) = tobj::load_obj(path, &load_options())?;
    let materials = materials.unwrap_or_else(|err| {
        warn!("{}: material library unavailable ({err}), meshes keep no material", path.display());
        Vec::new()
    });

    Ok(build_scene(name, models, &materials))
}

/// Parse OBJ data from memory. `mtllib` statements cannot be resolved, so
/// meshes come back without materials.
pub fn parse_obj(data: &[u8], name: &str) -> LoadResult<SceneNode> {
    let mut reader = data;
    let (models, materials) = tobj::load_obj_buf(&mut reader, &load_options(), |library| {
        warn!("cannot resolve material library {} from memory", library.display());
        Err(tobj::LoadError::OpenFileFailed)
    })?;

    Ok(build_scene(name, models, &materials.unwrap_or_default()))
}

/// Parse OBJ data with its MTL library supplied from memory
pub fn parse_obj_with_mtl(data: &[u8], mtl: &[u8], name: &str) -> LoadResult<SceneNode> {
    let mut reader = data;
    let (models, materials) = tobj::load_obj_buf(&mut reader, &load_options(), |_| {
        let mut mtl_reader = mtl;
        tobj::load_mtl_buf(&mut mtl_reader)
    })?;

    Ok(build_scene(name, models, &materials?))
}

fn build_scene(name: &str, models: Vec<tobj::Model>, materials: &[tobj::Material]) -> SceneNode {
    let mut root = SceneNode::group(name);

    for model in models {
        let mesh = &model.mesh;
        let positions: Vec<Point3<f32>> = mesh
            .positions
            .chunks_exact(3)
            .map(|p| Point3::new(p[0], p[1], p[2]))
            .collect();
        let geometry = Geometry::indexed(positions, mesh.indices.clone());

        let material = mesh.material_id.and_then(|id| materials.get(id)).map(convert_material);
        debug!(
            "OBJ object '{}': {} positions, {} indices, material {:?}",
            model.name,
            geometry.vertex_count(),
            mesh.indices.len(),
            material.as_ref().and_then(|m| m.name.as_deref())
        );

        let mut mesh = Mesh::new(geometry);
        mesh.material = material;
        root.add_child(SceneNode::with_mesh(model.name, mesh));
    }

    root
}

fn convert_material(source: &tobj::Material) -> Material {
    let defaults = Material::default();
    Material {
        name: Some(source.name.clone()),
        color: source.diffuse.unwrap_or(defaults.color),
        emissive: source.emissive.unwrap_or(defaults.emissive),
        ..defaults
    }
}
