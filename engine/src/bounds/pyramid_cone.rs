use sourcerenderer_core::{Point3, Vec3};

use super::SphericalSector;

/// A pyramid intersected with an angular cone (§3 `PyramidCone`): the
/// primary point/spot-light shadow-volume shape, tighter than the plain
/// `SphericalSector` fallback because it also carries the silhouette's
/// 4 side planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PyramidCone {
    pub apex: Point3,
    pub axis: Vec3,
    pub cos_half_angular_size: f32,
    pub planes: [sourcerenderer_core::Plane; 4],
}

impl PyramidCone {
    pub fn new(
        apex: Point3,
        axis: Vec3,
        cos_half_angular_size: f32,
        planes: [sourcerenderer_core::Plane; 4],
    ) -> Self {
        Self {
            apex,
            axis: axis.normalize(),
            cos_half_angular_size,
            planes,
        }
    }

    pub fn as_spherical_sector(&self, radius: f32) -> SphericalSector {
        SphericalSector::new(self.apex, self.axis, radius, self.cos_half_angular_size)
    }

    pub fn contains_point(&self, point: Point3) -> bool {
        let d = point - self.apex;
        let dist = d.length();
        if dist < 1e-9 {
            return true;
        }
        let cos_angle = d.dot(self.axis) / dist;
        if cos_angle < self.cos_half_angular_size {
            return false;
        }
        self.planes
            .iter()
            .all(|p| sourcerenderer_core::math::plane_dot(*p, point) > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pyramid_cone_angle_invariant_holds_along_axis() {
        let planes = [sourcerenderer_core::Plane::ZERO; 4];
        let cone = PyramidCone::new(Point3::ZERO, Vec3::Y, 0.5, planes);
        let on_axis = Point3::new(0.0, 10.0, 0.0);
        let d = on_axis - cone.apex;
        let cos_angle = d.dot(cone.axis) / d.length();
        assert!((cos_angle - 1.0).abs() < 1e-5);
        assert!(cos_angle >= cone.cos_half_angular_size);
    }
}
