/// Geometry primitives: vertex buffers, triangle faces and meshes
use nalgebra::{Point3, Vector3};

use crate::bounds::Aabb;
use crate::material::Material;

/// A triangle face resolved to its three corner positions
#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    pub vertices: [Point3<f32>; 3],
}

impl Triangle {
    pub fn new(v0: Point3<f32>, v1: Point3<f32>, v2: Point3<f32>) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices.
    ///
    /// Degenerate triangles yield the zero vector.
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let [v0, v1, v2] = self.vertices;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1
            .cross(&edge2)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }
}

/// Vertex positions plus optional triangle indices.
///
/// Without indices the positions are read as a plain triangle list.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    pub positions: Vec<Point3<f32>>,
    pub normals: Option<Vec<Vector3<f32>>>,
    pub indices: Option<Vec<u32>>,
}

impl Geometry {
    pub fn new(positions: Vec<Point3<f32>>) -> Self {
        Self {
            positions,
            normals: None,
            indices: None,
        }
    }

    pub fn indexed(positions: Vec<Point3<f32>>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            normals: None,
            indices: Some(indices),
        }
    }

    pub fn with_normals(mut self, normals: Vec<Vector3<f32>>) -> Self {
        self.normals = Some(normals);
        self
    }

    /// Build a non-indexed geometry from a triangle list
    pub fn from_triangles(triangles: &[Triangle]) -> Self {
        let positions = triangles
            .iter()
            .flat_map(|triangle| triangle.vertices)
            .collect();
        Self::new(positions)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> Option<usize> {
        self.indices.as_ref().map(Vec::len)
    }

    /// Number of whole triangles; a trailing partial triple is dropped
    pub fn face_count(&self) -> usize {
        self.index_count().unwrap_or(self.positions.len()) / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Corner indices of every whole triangle.
    ///
    /// Triangles referencing a vertex past the end of the position list are skipped.
    pub fn faces(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        let vertex_count = self.positions.len();
        let indexed = self.indices.as_deref().map(|indices| {
            indices
                .chunks_exact(3)
                .map(|chunk| [chunk[0] as usize, chunk[1] as usize, chunk[2] as usize])
        });
        let sequential = self
            .indices
            .is_none()
            .then(|| (0..vertex_count / 3).map(|face| [face * 3, face * 3 + 1, face * 3 + 2]));

        indexed
            .into_iter()
            .flatten()
            .chain(sequential.into_iter().flatten())
            .filter(move |face| face.iter().all(|&index| index < vertex_count))
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces().map(move |[a, b, c]| {
            Triangle::new(self.positions[a], self.positions[b], self.positions[c])
        })
    }

    /// Mean of the stored vertex normals of `face`.
    ///
    /// `None` without normals, for out-of-range corners, or when the
    /// normals cancel out (binary STL often stores zero normals).
    pub fn face_normal(&self, face: [usize; 3]) -> Option<Vector3<f32>> {
        let normals = self.normals.as_deref()?;
        let mut sum = Vector3::zeros();
        for index in face {
            sum += normals.get(index)?;
        }
        sum.try_normalize(f32::EPSILON)
    }

    /// Local-space bounds, `None` when there are no positions
    pub fn bounding_box(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }

    /// Indexed cube centered at the origin with 8 shared corners and 12 faces
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let positions = vec![
            Point3::new(-half, -half, -half),
            Point3::new(half, -half, -half),
            Point3::new(half, half, -half),
            Point3::new(-half, half, -half),
            Point3::new(-half, -half, half),
            Point3::new(half, -half, half),
            Point3::new(half, half, half),
            Point3::new(-half, half, half),
        ];

        // Counter-clockwise winding seen from outside
        let indices = vec![
            4, 5, 6, 4, 6, 7, // front (+z)
            1, 0, 3, 1, 3, 2, // back (-z)
            3, 7, 6, 3, 6, 2, // top (+y)
            0, 1, 5, 0, 5, 4, // bottom (-y)
            1, 2, 6, 1, 6, 5, // right (+x)
            0, 4, 7, 0, 7, 3, // left (-x)
        ];

        Self::indexed(positions, indices)
    }
}

/// Renderable mesh: geometry plus surface and shadow attributes
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub geometry: Geometry,
    pub material: Option<Material>,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Mesh {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            material: None,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }
}
