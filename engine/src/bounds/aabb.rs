use sourcerenderer_core::Point3;

use super::Sphere;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub dim_min: Point3,
    pub dim_max: Point3,
}

impl Aabb {
    pub fn new(dim_min: Point3, dim_max: Point3) -> Self {
        Self { dim_min, dim_max }
    }

    pub fn center(&self) -> Point3 {
        (self.dim_min + self.dim_max) * 0.5
    }

    pub fn extents(&self) -> Point3 {
        (self.dim_max - self.dim_min) * 0.5
    }

    pub fn contains_point(&self, point: Point3) -> bool {
        point.x >= self.dim_min.x
            && point.x <= self.dim_max.x
            && point.y >= self.dim_min.y
            && point.y <= self.dim_max.y
            && point.z >= self.dim_min.z
            && point.z <= self.dim_max.z
    }

    /// §8.3 containment: `self` lies entirely within `other`.
    pub fn is_completely_inside(&self, other: &Aabb) -> bool {
        self.dim_min.x >= other.dim_min.x
            && self.dim_min.y >= other.dim_min.y
            && self.dim_min.z >= other.dim_min.z
            && self.dim_max.x <= other.dim_max.x
            && self.dim_max.y <= other.dim_max.y
            && self.dim_max.z <= other.dim_max.z
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.dim_min.x <= other.dim_max.x
            && self.dim_max.x >= other.dim_min.x
            && self.dim_min.y <= other.dim_max.y
            && self.dim_max.y >= other.dim_min.y
            && self.dim_min.z <= other.dim_max.z
            && self.dim_max.z >= other.dim_min.z
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.dim_min.min(other.dim_min), self.dim_max.max(other.dim_max))
    }

    pub fn bounding_sphere(&self) -> Sphere {
        let center = self.center();
        let radius = self.extents().length();
        Sphere::new(center, radius)
    }

    /// The 8 corners in the fixed winding order used by `BOX_PLANE_VERTICES`
    /// (§3a): bit 0 selects x, bit 1 selects y, bit 2 selects z, 0 = min, 1 = max.
    pub fn corners(&self) -> [Point3; 8] {
        let mut out = [Point3::ZERO; 8];
        for (i, corner) in out.iter_mut().enumerate() {
            let x = if i & 1 == 0 { self.dim_min.x } else { self.dim_max.x };
            let y = if i & 2 == 0 { self.dim_min.y } else { self.dim_max.y };
            let z = if i & 4 == 0 { self.dim_min.z } else { self.dim_max.z };
            *corner = Point3::new(x, y, z);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containment_is_transitive() {
        let a = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::new(Point3::new(-2.0, -2.0, -2.0), Point3::new(2.0, 2.0, 2.0));
        let c = Aabb::new(Point3::new(-3.0, -3.0, -3.0), Point3::new(3.0, 3.0, 3.0));
        assert!(a.is_completely_inside(&b));
        assert!(b.is_completely_inside(&c));
        assert!(a.is_completely_inside(&c));
    }

    #[test]
    fn degenerate_zero_extent_aabb_is_valid() {
        let a = Aabb::new(Point3::ZERO, Point3::ZERO);
        assert!(a.contains_point(Point3::ZERO));
        assert!(!a.contains_point(Point3::new(0.001, 0.0, 0.0)));
    }
}
