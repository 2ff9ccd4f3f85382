//! Normalization: fit a loaded object to a common size and center it.
//!
//! [`fit`] is pure and returns the transform the root should take; applying
//! it overwrites the root's scale and position instead of composing with
//! them, so normalizing again with a different target does not compound.

use log::debug;
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

use crate::bounds::Aabb;
use crate::error::NormalizeError;
use crate::material::Material;
use crate::scene::SceneNode;
use crate::transform::Transform;
use crate::traverse::{for_each_mesh_mut, world_meshes, Hierarchy, Transformed};

pub const DEFAULT_TARGET_SIZE: f32 = 2.6;

/// Parameters for [`normalize`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Length of the largest bounding-box side after scaling
    pub target_size: f32,
    /// Given to meshes that were loaded without a material
    pub default_material: Material,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
}

impl NormalizeConfig {
    pub fn with_target_size(target_size: f32) -> Self {
        Self {
            target_size,
            ..Self::default()
        }
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            target_size: DEFAULT_TARGET_SIZE,
            default_material: Material::default(),
            cast_shadows: true,
            receive_shadows: true,
        }
    }
}

/// Root transform that brings an object to the target size at the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub scale: Vector3<f32>,
    pub translation: Vector3<f32>,
    /// Bounds of the object once normalized, `None` when it has no vertices
    pub bounds: Option<Aabb>,
}

impl Normalization {
    /// Overwrite the root's scale and position. Rotation is left alone.
    pub fn apply(&self, root: &mut SceneNode) {
        root.transform.scale = self.scale;
        root.transform.position = self.translation;
    }

    /// Factor applied along X, which is the uniform factor whenever the
    /// object had a non-zero extent
    pub fn uniform_scale(&self) -> f32 {
        self.scale.x
    }
}

/// Bounds of every mesh under `root`, measured as if the root's own local
/// transform were `root_matrix`
pub fn bounds_with_root_matrix<N: Transformed>(root: &N, root_matrix: Matrix4<f32>) -> Option<Aabb> {
    let own = root.mesh().map(|mesh| (mesh, root_matrix));
    let descendants = root
        .children()
        .iter()
        .flat_map(move |child| world_meshes(child, root_matrix));

    own.into_iter()
        .chain(descendants)
        .filter_map(|(mesh, matrix)| {
            mesh.geometry
                .bounding_box()
                .map(|bounds| bounds.transformed(&matrix))
        })
        .reduce(|acc, bounds| acc.union(&bounds))
}

/// Bounds of the whole tree in the root's parent space
pub fn scene_bounds<N: Transformed>(root: &N) -> Option<Aabb> {
    bounds_with_root_matrix(root, root.local_matrix())
}

/// Compute the normalizing transform for `root` without touching it.
///
/// A zero-size object (empty tree, or all vertices at one point) keeps its
/// current scale and is only recentered.
pub fn fit(root: &SceneNode, target_size: f32) -> Result<Normalization, NormalizeError> {
    if !target_size.is_finite() || target_size <= 0.0 {
        return Err(NormalizeError::InvalidTargetSize(target_size));
    }

    let rotation = Transform::rotation_matrix(&root.transform.rotation);
    let Some(rotated) = bounds_with_root_matrix(root, rotation) else {
        return Ok(Normalization {
            scale: root.transform.scale,
            translation: root.transform.position,
            bounds: None,
        });
    };

    let max_extent = rotated.max_extent();
    let scale = if max_extent > 0.0 {
        Vector3::repeat(target_size / max_extent)
    } else {
        root.transform.scale
    };

    let linear = rotation * Transform::scale_matrix(scale.x, scale.y, scale.z);
    let scaled = bounds_with_root_matrix(root, linear).unwrap_or(rotated);
    let translation = -scaled.center().coords;

    Ok(Normalization {
        scale,
        translation,
        bounds: Some(Aabb::new(scaled.min + translation, scaled.max + translation)),
    })
}

/// Give every material-less mesh the default material and set shadow flags
pub fn apply_render_defaults(root: &mut SceneNode, config: &NormalizeConfig) {
    for_each_mesh_mut(root, |mesh| {
        if mesh.material.is_none() {
            mesh.material = Some(config.default_material.clone());
        }
        mesh.cast_shadow = config.cast_shadows;
        mesh.receive_shadow = config.receive_shadows;
    });
}

/// Fit, apply and fill render defaults in one pass, mutating `root` in place
pub fn normalize(
    root: &mut SceneNode,
    config: &NormalizeConfig,
) -> Result<Normalization, NormalizeError> {
    let normalization = fit(root, config.target_size)?;
    normalization.apply(root);
    apply_render_defaults(root, config);

    debug!(
        "normalized '{}': scale {:.4}, translation ({:.3}, {:.3}, {:.3})",
        root.name,
        normalization.uniform_scale(),
        normalization.translation.x,
        normalization.translation.y,
        normalization.translation.z
    );

    Ok(normalization)
}
