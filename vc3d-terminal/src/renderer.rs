/// ASCII rasterizer for terminal rendering
use std::fmt;
use std::io::Write;

use clap::ValueEnum;
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3};
use serde::{Deserialize, Serialize};
use vc3d_core::{Camera, Mesh, Triangle};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

const VERTEX_CHAR: char = 'o';

/// Edges are drawn slightly in front of coplanar faces
const EDGE_DEPTH_BIAS: f32 = 1e-4;

/// Which primitives of the active model are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    Vertices,
    Edges,
    #[default]
    Faces,
}

impl RenderMode {
    pub fn next(self) -> Self {
        match self {
            RenderMode::Vertices => RenderMode::Edges,
            RenderMode::Edges => RenderMode::Faces,
            RenderMode::Faces => RenderMode::Vertices,
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            RenderMode::Vertices => "vertices",
            RenderMode::Edges => "edges",
            RenderMode::Faces => "faces",
        })
    }
}

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Number of cells that hold a visible character
    pub fn lit_cells(&self) -> usize {
        self.char_buffer.iter().filter(|&&c| c != ' ').count()
    }

    /// Characters of row `y`, `None` past the last row
    pub fn row(&self, y: usize) -> Option<String> {
        (y < self.height).then(|| self.char_buffer[y * self.width..(y + 1) * self.width].iter().collect())
    }

    /// Shaded, depth-tested triangles
    pub fn render_mesh(&mut self, mesh: &Mesh, model_matrix: &Matrix4<f32>, camera: &Camera) {
        let tint = mesh
            .material
            .as_ref()
            .map_or(1.0, |material| 0.6 + 0.4 * material.luminance());
        let light_dir = (camera.position - camera.target).normalize();

        let geometry = &mesh.geometry;
        for face in geometry.faces() {
            let world = Triangle {
                vertices: face.map(|index| model_matrix.transform_point(&geometry.positions[index])),
            };
            // Prefer the normals stored with the model over the winding order
            let normal = geometry
                .face_normal(face)
                .and_then(|normal| model_matrix.transform_vector(&normal).try_normalize(f32::EPSILON))
                .unwrap_or_else(|| world.calculate_normal());
            let brightness = normal.dot(&light_dir).max(0.0) * tint;
            self.render_triangle(&world, camera, shade(brightness));
        }
    }

    /// Feature edges drawn as character lines
    pub fn render_edges(
        &mut self,
        segments: &[[Point3<f32>; 2]],
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) {
        for [start, end] in segments {
            let a = self.project(start, model_matrix, camera);
            let b = self.project(end, model_matrix, camera);
            if let (Some(a), Some(b)) = (a, b) {
                self.rasterize_line(a, b);
            }
        }
    }

    /// Every vertex position as a single point
    pub fn render_vertices(&mut self, mesh: &Mesh, model_matrix: &Matrix4<f32>, camera: &Camera) {
        for position in &mesh.geometry.positions {
            if let Some((x, y, depth)) = self.project(position, model_matrix, camera) {
                self.plot(x as i32, y as i32, depth, VERTEX_CHAR);
            }
        }
    }

    fn project(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) -> Option<(f32, f32, f32)> {
        camera.project_to_screen(point, model_matrix, self.width as u32, self.height as u32)
    }

    fn render_triangle(&mut self, triangle: &Triangle, camera: &Camera, character: char) {
        // Vertices are already in world space
        let identity = Matrix4::identity();
        let mut screen_coords = Vec::with_capacity(3);
        for vertex in &triangle.vertices {
            match self.project(vertex, &identity, camera) {
                Some(coords) => screen_coords.push(coords),
                None => return, // Triangle is clipped
            }
        }

        self.rasterize_triangle(&screen_coords, character);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32)], character: char) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, depth, character);
                    }
                }
            }
        }
    }

    fn rasterize_line(&mut self, a: (f32, f32, f32), b: (f32, f32, f32)) {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let character = line_char(dx, dy);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

        for step in 0..=steps {
            let t = step as f32 / steps as f32;
            let x = a.0 + dx * t;
            let y = a.1 + dy * t;
            let depth = a.2 + (b.2 - a.2) * t - EDGE_DEPTH_BIAS;
            self.plot(x as i32, y as i32, depth, character);
        }
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }

        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                let c = self.char_buffer[idx];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    '|' | '/' | '\\' | '_' => Color::Green,
                    VERTEX_CHAR => Color::Yellow,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map a brightness in `0.0..=1.0` to the luminosity ramp
fn shade(brightness: f32) -> char {
    let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
    // Faces turned away still get a faint mark so silhouettes stay visible
    LUMINOSITY_RAMP[char_index.clamp(1, LUMINOSITY_RAMP.len() - 1)]
}

/// Pick a line character from the screen-space direction. Terminal cells are
/// about twice as tall as wide, hence the factor on `dy`.
fn line_char(dx: f32, dy: f32) -> char {
    let (ax, ay) = (dx.abs(), dy.abs() * 2.0);
    if ay < ax * 0.5 {
        '_'
    } else if ax < ay * 0.5 {
        '|'
    } else if (dx > 0.0) == (dy > 0.0) {
        '\\'
    } else {
        '/'
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;
    use vc3d_core::{feature_edges, Geometry, DEFAULT_THRESHOLD_DEG};

    fn cube() -> Mesh {
        Mesh::new(Geometry::cube(2.0))
    }

    fn renderer_and_camera() -> (AsciiRenderer, Camera) {
        (AsciiRenderer::new(80, 40), Camera::new(80, 40))
    }

    #[test]
    fn test_faces_fill_the_center() {
        let (mut renderer, camera) = renderer_and_camera();
        renderer.render_mesh(&cube(), &Matrix4::identity(), &camera);

        assert!(renderer.lit_cells() > 100);
        let middle = renderer.row(20).unwrap();
        assert_ne!(middle.chars().nth(40), Some(' '));
    }

    #[test]
    fn test_stored_normals_drive_shading() {
        let (mut renderer, camera) = renderer_and_camera();
        let facing = Geometry::new(vec![
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]);
        let center = |renderer: &AsciiRenderer| renderer.row(20).and_then(|row| row.chars().nth(40));

        renderer.render_mesh(&Mesh::new(facing.clone()), &Matrix4::identity(), &camera);
        assert_eq!(center(&renderer), Some('@'));

        renderer.clear();
        let turned_away = facing.with_normals(vec![Vector3::new(0.0, 0.0, -1.0); 3]);
        renderer.render_mesh(&Mesh::new(turned_away), &Matrix4::identity(), &camera);
        assert_eq!(center(&renderer), Some('.'));
    }

    #[test]
    fn test_vertices_mode_plots_corners_only() {
        let (mut renderer, camera) = renderer_and_camera();
        renderer.render_vertices(&cube(), &Matrix4::identity(), &camera);

        let lit = renderer.lit_cells();
        assert!(lit > 0 && lit <= 8);
        assert!(renderer.row(20).unwrap().chars().all(|c| c == ' '));
    }

    #[test]
    fn test_edges_mode_leaves_face_interior_empty() {
        let (mut renderer, camera) = renderer_and_camera();
        let mesh = cube();
        let segments = feature_edges(&mesh.geometry, DEFAULT_THRESHOLD_DEG);
        renderer.render_edges(&segments, &Matrix4::identity(), &camera);

        assert!(renderer.lit_cells() > 0);
        assert_eq!(renderer.row(20).unwrap().chars().nth(40), Some(' '));
    }

    #[test]
    fn test_row_past_the_end() {
        let renderer = AsciiRenderer::new(4, 2);
        assert_eq!(renderer.row(1).as_deref(), Some("    "));
        assert_eq!(renderer.row(2), None);
    }

    #[test]
    fn test_clear_resets_buffers() {
        let (mut renderer, camera) = renderer_and_camera();
        renderer.render_mesh(&cube(), &Matrix4::identity(), &camera);
        renderer.clear();
        assert_eq!(renderer.lit_cells(), 0);
    }

    #[test]
    fn test_render_mode_cycle() {
        assert_eq!(RenderMode::default(), RenderMode::Faces);
        assert_eq!(RenderMode::Faces.next(), RenderMode::Vertices);
        assert_eq!(RenderMode::Vertices.next().next(), RenderMode::Faces);
    }

    #[test]
    fn test_line_char() {
        assert_eq!(line_char(10.0, 0.0), '_');
        assert_eq!(line_char(0.0, 5.0), '|');
        assert_eq!(line_char(4.0, 2.0), '\\');
        assert_eq!(line_char(4.0, -2.0), '/');
    }
}
