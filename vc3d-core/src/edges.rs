/// Feature-edge extraction for wireframe rendering and edge statistics
use std::collections::HashMap;

use nalgebra::{Point3, Vector3};

use crate::geometry::Geometry;

/// Angle between adjacent faces above which their shared edge is kept
pub const DEFAULT_THRESHOLD_DEG: f32 = 1.0;

/// Positions are merged after rounding to this many decimal places
const PRECISION: f64 = 1e4;

type VertexKey = [i64; 3];

struct EdgeRecord {
    start: Point3<f32>,
    end: Point3<f32>,
    normal: Vector3<f32>,
}

fn vertex_key(point: &Point3<f32>) -> VertexKey {
    [point.x, point.y, point.z].map(|c| (f64::from(c) * PRECISION).round() as i64)
}

/// Line segments along boundary edges and along creases sharper than
/// `threshold_deg`.
///
/// Edges shared by two faces are matched through their reversed direction,
/// so neighbouring faces need consistent winding to be recognised as
/// coplanar. Degenerate faces are ignored.
pub fn feature_edges(geometry: &Geometry, threshold_deg: f32) -> Vec<[Point3<f32>; 2]> {
    let threshold_dot = threshold_deg.to_radians().cos();

    let mut segments = Vec::new();
    let mut records: Vec<Option<EdgeRecord>> = Vec::new();
    let mut lookup: HashMap<(VertexKey, VertexKey), usize> = HashMap::new();

    for triangle in geometry.triangles() {
        let keys = triangle.vertices.map(|vertex| vertex_key(&vertex));
        if keys[0] == keys[1] || keys[1] == keys[2] || keys[2] == keys[0] {
            continue;
        }

        let normal = triangle.calculate_normal();
        for j in 0..3 {
            let next = (j + 1) % 3;
            let forward = (keys[j], keys[next]);
            let reverse = (keys[next], keys[j]);

            let twin = lookup
                .get(&reverse)
                .copied()
                .filter(|&slot| records[slot].is_some());

            match twin {
                Some(slot) => {
                    if let Some(record) = records[slot].take() {
                        if normal.dot(&record.normal) <= threshold_dot {
                            segments.push([triangle.vertices[j], triangle.vertices[next]]);
                        }
                    }
                }
                None => {
                    if !lookup.contains_key(&forward) {
                        lookup.insert(forward, records.len());
                        records.push(Some(EdgeRecord {
                            start: triangle.vertices[j],
                            end: triangle.vertices[next],
                            normal,
                        }));
                    }
                }
            }
        }
    }

    // Unmatched edges lie on a boundary
    segments.extend(records.into_iter().flatten().map(|record| [record.start, record.end]));
    segments
}

/// Number of feature edges at the default threshold
pub fn edge_count(geometry: &Geometry) -> usize {
    edge_count_at(geometry, DEFAULT_THRESHOLD_DEG)
}

pub fn edge_count_at(geometry: &Geometry, threshold_deg: f32) -> usize {
    feature_edges(geometry, threshold_deg).len()
}
