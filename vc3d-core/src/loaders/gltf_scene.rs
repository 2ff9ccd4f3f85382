/// glTF / GLB import into the scene graph
use std::path::Path;

use log::{debug, warn};
use nalgebra::{Point3, Vector3};

use crate::error::LoadResult;
use crate::geometry::{Geometry, Mesh};
use crate::material::Material;
use crate::scene::SceneNode;
use crate::transform::{NodeTransform, RotationState};

/// Load a `.gltf` (with external or embedded buffers) or `.glb` file
pub fn load_gltf(path: &Path, name: &str) -> LoadResult<SceneNode> {
    let (document, buffers, _images) = gltf::import(path)?;
    Ok(build_scene(name, &document, &buffers))
}

/// Parse a GLB blob or a self-contained glTF document
pub fn parse_gltf(data: &[u8], name: &str) -> LoadResult<SceneNode> {
    let (document, buffers, _images) = gltf::import_slice(data)?;
    Ok(build_scene(name, &document, &buffers))
}

fn build_scene(name: &str, document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> SceneNode {
    let mut root = SceneNode::group(name);

    let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) else {
        warn!("glTF '{name}' has no scenes");
        return root;
    };

    debug!(
        "glTF '{}': scene {:?}, {} nodes, {} meshes",
        name,
        scene.name(),
        document.nodes().count(),
        document.meshes().count()
    );

    for node in scene.nodes() {
        root.add_child(convert_node(&node, buffers));
    }

    root
}

fn convert_node(node: &gltf::Node, buffers: &[gltf::buffer::Data]) -> SceneNode {
    let (translation, rotation, scale) = node.transform().decomposed();
    let name = node
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("node{}", node.index()));

    let mut scene_node = SceneNode::group(name).with_transform(NodeTransform {
        position: Vector3::from(translation),
        rotation: RotationState::from_quaternion(rotation),
        scale: Vector3::from(scale),
    });

    if let Some(mesh) = node.mesh() {
        let mut meshes: Vec<Mesh> = mesh
            .primitives()
            .filter_map(|primitive| convert_primitive(&primitive, buffers))
            .collect();

        if meshes.len() == 1 {
            scene_node.mesh = meshes.pop();
        } else {
            let mesh_name = mesh.name().unwrap_or("primitive");
            for (index, primitive_mesh) in meshes.into_iter().enumerate() {
                scene_node.add_child(SceneNode::with_mesh(format!("{mesh_name}.{index}"), primitive_mesh));
            }
        }
    }

    for child in node.children() {
        scene_node.add_child(convert_node(&child, buffers));
    }

    scene_node
}

fn convert_primitive(primitive: &gltf::Primitive, buffers: &[gltf::buffer::Data]) -> Option<Mesh> {
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        warn!("skipping glTF primitive {} with mode {:?}", primitive.index(), primitive.mode());
        return None;
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let Some(positions) = reader.read_positions() else {
        warn!("skipping glTF primitive {} without positions", primitive.index());
        return None;
    };

    let mut geometry = Geometry::new(positions.map(Point3::from).collect());
    geometry.indices = reader.read_indices().map(|indices| indices.into_u32().collect());
    geometry.normals = reader
        .read_normals()
        .map(|normals| normals.map(Vector3::from).collect());

    let material = primitive.material();
    let mut mesh = Mesh::new(geometry);
    if material.index().is_some() {
        mesh.material = Some(convert_material(&material));
    }

    Some(mesh)
}

fn convert_material(material: &gltf::Material) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, _alpha] = pbr.base_color_factor();

    Material {
        name: material.name().map(str::to_string),
        color: [r, g, b],
        roughness: pbr.roughness_factor(),
        metalness: pbr.metallic_factor(),
        emissive: material.emissive_factor(),
    }
}

#[cfg(test)]
pub(crate) const TEST_GLTF: &str = r#"{
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [{ "nodes": [0, 2] }],
  "nodes": [
    { "name": "Sun", "children": [1], "translation": [0, 5, 0], "rotation": [0, 0, 0.70710677, 0.70710677] },
    { "name": "Earth", "mesh": 0, "translation": [10, 0, 0] },
    { "name": "Pair", "mesh": 1, "scale": [2, 2, 2] }
  ],
  "meshes": [
    { "name": "Tri", "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 }] },
    { "name": "Pair", "primitives": [
      { "attributes": { "POSITION": 0 }, "indices": 1 },
      { "attributes": { "POSITION": 0 } }
    ] }
  ],
  "materials": [{
    "name": "Rock",
    "pbrMetallicRoughness": { "baseColorFactor": [0.5, 0.25, 1.0, 1.0], "metallicFactor": 0.3, "roughnessFactor": 0.7 }
  }],
  "accessors": [
    { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0, 0, 0], "max": [1, 1, 0] },
    { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
  ],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 36, "target": 34962 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 6, "target": 34963 }
  ],
  "buffers": [{
    "byteLength": 44,
    "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA="
  }]
}"#;
