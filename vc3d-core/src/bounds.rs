/// Axis-aligned bounding boxes
use nalgebra::{Matrix4, Point3, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl Aabb {
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// Box containing a single point (zero volume)
    pub fn from_point(point: Point3<f32>) -> Self {
        Self {
            min: point,
            max: point,
        }
    }

    /// Smallest box enclosing all points, or `None` for an empty iterator
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f32>>,
    {
        let mut points = points.into_iter();
        let mut aabb = Self::from_point(*points.next()?);
        for point in points {
            aabb.include_point(point);
        }
        Some(aabb)
    }

    pub fn include_point(&mut self, point: &Point3<f32>) {
        self.min = Point3::from(self.min.coords.inf(&point.coords));
        self.max = Point3::from(self.max.coords.sup(&point.coords));
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: Point3::from(self.min.coords.inf(&other.min.coords)),
            max: Point3::from(self.max.coords.sup(&other.max.coords)),
        }
    }

    pub fn center(&self) -> Point3<f32> {
        Point3::from((self.min.coords + self.max.coords) * 0.5)
    }

    /// Width, height and depth along X, Y and Z
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    pub fn max_extent(&self) -> f32 {
        let size = self.size();
        size.x.max(size.y).max(size.z)
    }

    pub fn corners(&self) -> [Point3<f32>; 8] {
        let (a, b) = (self.min, self.max);
        [
            Point3::new(a.x, a.y, a.z),
            Point3::new(b.x, a.y, a.z),
            Point3::new(a.x, b.y, a.z),
            Point3::new(b.x, b.y, a.z),
            Point3::new(a.x, a.y, b.z),
            Point3::new(b.x, a.y, b.z),
            Point3::new(a.x, b.y, b.z),
            Point3::new(b.x, b.y, b.z),
        ]
    }

    /// Re-bound the eight transformed corners
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Aabb {
        let corners = self.corners().map(|corner| matrix.transform_point(&corner));
        let mut aabb = Self::from_point(corners[0]);
        for corner in &corners[1..] {
            aabb.include_point(corner);
        }
        aabb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let points = [
            Point3::new(-1.0, -2.0, -3.0),
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        let aabb = Aabb::from_points(&points).unwrap();
        assert_eq!(aabb.min, Point3::new(-1.0, -2.0, -3.0));
        assert_eq!(aabb.max, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_from_points_empty() {
        let points: [Point3<f32>; 0] = [];
        assert!(Aabb::from_points(&points).is_none());
    }

    #[test]
    fn test_center_and_size() {
        let aabb = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.center(), Point3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.size(), Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.max_extent(), 6.0);
    }

    #[test]
    fn test_union_non_overlapping() {
        let a = Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point3::new(2.0, 2.0, 2.0), Point3::new(3.0, 3.0, 3.0));
        let union = a.union(&b);
        assert_eq!(union.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(union.max, Point3::new(3.0, 3.0, 3.0));
    }

    #[test]
    fn test_union_contained() {
        let outer = Aabb::new(Point3::new(-5.0, -5.0, -5.0), Point3::new(5.0, 5.0, 5.0));
        let inner = Aabb::new(Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 2.0, 2.0));
        assert_eq!(outer.union(&inner), outer);
    }

    #[test]
    fn test_transformed_translation_and_scale() {
        let aabb = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let matrix = Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0))
            * Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 0.5));
        let moved = aabb.transformed(&matrix);
        assert!((moved.min - Point3::new(8.0, -1.0, -0.5)).norm() < 1e-5);
        assert!((moved.max - Point3::new(12.0, 1.0, 0.5)).norm() < 1e-5);
    }

    #[test]
    fn test_transformed_rotation_grows_box() {
        let aabb = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let rotation = Matrix4::new_rotation(Vector3::new(0.0, 0.0, std::f32::consts::FRAC_PI_4));
        let rotated = aabb.transformed(&rotation);
        let expected = 2.0_f32.sqrt();
        assert!((rotated.max.x - expected).abs() < 1e-5);
        assert!((rotated.max.z - 1.0).abs() < 1e-5);
    }
}
