use sourcerenderer_core::{Point3, Vec3};

/// A capsule (cylinder with two hemispherical end-caps). Not present in the
/// original engine's bounding-volume set; modeled by analogy with `Cylinder`
/// for the spec's extended `BoundingVolume` union (§3).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    pub center: Point3,
    pub axis: Vec3,
    pub length: f32,
    pub radius: f32,
}

impl Capsule {
    pub fn new(center: Point3, axis: Vec3, length: f32, radius: f32) -> Self {
        Self {
            center,
            axis: axis.normalize(),
            length,
            radius,
        }
    }

    pub fn endpoint1(&self) -> Point3 {
        self.center - 0.5 * self.length * self.axis
    }

    pub fn endpoint2(&self) -> Point3 {
        self.center + 0.5 * self.length * self.axis
    }

    pub fn contains_point(&self, point: Point3) -> bool {
        let seg = self.endpoint2() - self.endpoint1();
        let seg_len_sq = seg.length_squared();
        let t = if seg_len_sq > 1e-12 {
            ((point - self.endpoint1()).dot(seg) / seg_len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let closest = self.endpoint1() + t * seg;
        (point - closest).length_squared() <= self.radius * self.radius
    }

    pub fn bounding_sphere(&self) -> super::Sphere {
        super::Sphere::new(self.center, 0.5 * self.length + self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_caps_extend_contains_past_segment_endpoints() {
        let c = Capsule::new(Point3::ZERO, Vec3::Y, 2.0, 0.5);
        assert!(c.contains_point(Point3::new(0.0, 1.4, 0.0)));
        assert!(!c.contains_point(Point3::new(0.0, 1.6, 0.0)));
    }
}
