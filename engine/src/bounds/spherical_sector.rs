use sourcerenderer_core::{Point3, Vec3};

/// A spherical sector (cone intersected with a sphere), §3
/// `SphericalSector`: the fallback shadow-volume shape for point/spot
/// lights whose silhouette test fails to find a usable pyramid cone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphericalSector {
    pub apex: Point3,
    pub axis: Vec3,
    pub radius: f32,
    /// cos(half angular size) of the cone.
    pub cos_half_angular_size: f32,
}

impl SphericalSector {
    pub fn new(apex: Point3, axis: Vec3, radius: f32, cos_half_angular_size: f32) -> Self {
        Self {
            apex,
            axis: axis.normalize(),
            radius,
            cos_half_angular_size,
        }
    }

    pub fn contains_point(&self, point: Point3) -> bool {
        let d = point - self.apex;
        let dist = d.length();
        if dist > self.radius || dist < 1e-9 {
            return dist <= self.radius;
        }
        let cos_angle = d.dot(self.axis) / dist;
        cos_angle >= self.cos_half_angular_size
    }

    /// §3a: `sin_half_angular_size` derived as `sin(acos(cos_half_angular_size))`,
    /// matching the original engine's (numerically noisier) computation
    /// rather than the equivalent `sqrt(1 - cos^2)`.
    pub fn sin_half_angular_size(&self) -> f32 {
        self.cos_half_angular_size.acos().sin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apex_on_axis_within_radius_is_contained() {
        let s = SphericalSector::new(Point3::ZERO, Vec3::Y, 10.0, 0.5);
        assert!(s.contains_point(Point3::new(0.0, 5.0, 0.0)));
        assert!(!s.contains_point(Point3::new(5.0, 0.0, 0.0)));
    }
}
