use sourcerenderer_core::{Point3, Vec3};

use super::obb::PcaAxis;

/// An axis-aligned-in-its-own-frame ellipsoid: `pca[i]` gives the full
/// extent vector along principal axis `i` (§3 `Ellipsoid`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub center: Point3,
    pub pca: [PcaAxis; 3],
}

impl Ellipsoid {
    pub fn new(center: Point3, pca: [PcaAxis; 3]) -> Self {
        Self { center, pca }
    }

    /// Effective radius squared along `direction` (unit vector), used by
    /// the ellipsoid-vs-convex-hull plane test (§4.1): projects the three
    /// half-extents onto `direction` through each axis's own normal.
    pub fn effective_radius_squared(&self, direction: Vec3) -> f32 {
        let mut sum = 0.0f32;
        for axis in &self.pca {
            let half_extent = 0.5 * axis.vector.length();
            let proj = axis.normal().dot(direction) * half_extent;
            sum += proj * proj;
        }
        sum
    }

    pub fn bounding_sphere(&self) -> super::Sphere {
        let radius = self
            .pca
            .iter()
            .map(|a| 0.5 * a.vector.length())
            .fold(0.0f32, f32::max);
        super::Sphere::new(self.center, radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_radius_matches_axis_half_extent_along_that_axis() {
        let e = Ellipsoid::new(
            Point3::ZERO,
            [
                PcaAxis::from_vector(Vec3::new(4.0, 0.0, 0.0)),
                PcaAxis::from_vector(Vec3::new(0.0, 2.0, 0.0)),
                PcaAxis::from_vector(Vec3::new(0.0, 0.0, 2.0)),
            ],
        );
        let r2 = e.effective_radius_squared(Vec3::X);
        assert!((r2 - 4.0).abs() < 1e-4);
    }
}
