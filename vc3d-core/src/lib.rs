/// VC3D Core Library - Mesh geometry analysis shared by the viewers
///
/// This library provides scene hierarchies, model loading (OBJ/MTL, STL,
/// glTF), normalization to a common size, geometry statistics, feature-edge
/// extraction and camera projection.

pub mod bounds;
pub mod edges;
pub mod error;
pub mod format;
pub mod geometry;
pub mod loaders;
pub mod material;
pub mod normalize;
pub mod projection;
pub mod scene;
pub mod stats;
pub mod transform;
pub mod traverse;

// Re-export commonly used types
pub use bounds::Aabb;
pub use edges::{edge_count, edge_count_at, feature_edges, DEFAULT_THRESHOLD_DEG};
pub use error::{LoadError, LoadResult, NormalizeError};
pub use format::ModelFormat;
pub use geometry::{Geometry, Mesh, Triangle};
pub use loaders::{load_model, load_model_from_slice, stl_material, LoadedModel};
pub use material::{parse_hex_color, Material, Rgb};
pub use normalize::{
    apply_render_defaults, fit, normalize, scene_bounds, NormalizeConfig, Normalization,
    DEFAULT_TARGET_SIZE,
};
pub use projection::{Camera, ProjectionMode};
pub use scene::SceneNode;
pub use stats::{compute_stats, compute_stats_with, StatsRecord};
pub use transform::{NodeTransform, RotationState, Transform};
pub use traverse::{for_each_mesh_mut, mesh_nodes, walk, world_meshes, Hierarchy, HierarchyMut, Transformed};
