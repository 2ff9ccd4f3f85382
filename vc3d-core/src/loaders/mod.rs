//! Model loaders producing scene hierarchies.
//!
//! Every loader returns a root group named after the source; format-specific
//! preparation (such as re-orienting Z-up STL parts) is applied before the
//! model is handed out.

use std::fs;
use std::path::Path;

use log::info;

use crate::error::{LoadError, LoadResult, NormalizeError};
use crate::format::ModelFormat;
use crate::geometry::{Geometry, Mesh};
use crate::material::Material;
use crate::normalize::{normalize, NormalizeConfig, Normalization};
use crate::scene::SceneNode;
use crate::stats::{compute_stats, compute_stats_with, StatsRecord};
use crate::transform::RotationState;
use crate::traverse::for_each_mesh_mut;

pub mod gltf_scene;
pub mod obj;
pub mod stl;

/// A loaded model together with the format it was read from
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub root: SceneNode,
    pub format: ModelFormat,
}

impl LoadedModel {
    pub fn new(root: SceneNode, format: ModelFormat) -> Self {
        Self { root, format }
    }

    pub fn name(&self) -> &str {
        &self.root.name
    }

    pub fn stats(&self) -> StatsRecord {
        compute_stats(&self.root, self.format)
    }

    /// Stats with edges counted at a non-default angle
    pub fn stats_with(&self, edge_threshold_deg: f32) -> StatsRecord {
        compute_stats_with(&self.root, self.format, edge_threshold_deg)
    }

    pub fn normalize(&mut self, config: &NormalizeConfig) -> Result<Normalization, NormalizeError> {
        normalize(&mut self.root, config)
    }
}

/// Read a model file, picking the loader from its extension
pub fn load_model(path: impl AsRef<Path>) -> LoadResult<LoadedModel> {
    let path = path.as_ref();
    let format = ModelFormat::from_path(path)?;
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| format.label().to_lowercase());

    let io_error = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };
    fs::metadata(path).map_err(io_error)?;

    let root = match format {
        ModelFormat::Obj => obj::load_obj(path, &name)?,
        ModelFormat::Stl => {
            let data = fs::read(path).map_err(io_error)?;
            stl_scene(&name, stl::parse_stl(&data)?)
        }
        ModelFormat::Gltf => gltf_scene::load_gltf(path, &name)?,
    };

    Ok(finish(root, format))
}

/// Parse model bytes of a known format.
///
/// OBJ read this way cannot reach its MTL library.
pub fn load_model_from_slice(data: &[u8], format: ModelFormat, name: &str) -> LoadResult<LoadedModel> {
    let root = match format {
        ModelFormat::Obj => obj::parse_obj(data, name)?,
        ModelFormat::Stl => stl_scene(name, stl::parse_stl(data)?),
        ModelFormat::Gltf => gltf_scene::parse_gltf(data, name)?,
    };

    Ok(finish(root, format))
}

fn stl_scene(name: &str, geometry: Geometry) -> SceneNode {
    SceneNode::group(name).with_child(SceneNode::with_mesh(name, Mesh::new(geometry)))
}

fn finish(mut root: SceneNode, format: ModelFormat) -> LoadedModel {
    prepare(&mut root, format);

    let model = LoadedModel::new(root, format);
    let stats = model.stats();
    info!(
        "loaded '{}' ({}): {} nodes, {} vertices, {} faces",
        model.name(),
        format.description(),
        model.root.node_count(),
        stats.vertex_count,
        stats.face_count
    );
    model
}

/// Surface given to STL meshes, which carry no material of their own
pub fn stl_material() -> Material {
    Material {
        name: Some("stl".to_string()),
        roughness: 0.4,
        metalness: 0.25,
        ..Material::default()
    }
}

/// Per-format orientation and material fixes
fn prepare(root: &mut SceneNode, format: ModelFormat) {
    if format == ModelFormat::Stl {
        // STL parts are usually modelled Z-up
        root.transform.rotation = RotationState::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0);
        for_each_mesh_mut(root, |mesh| {
            mesh.material.get_or_insert_with(stl_material);
        });
    }
}
