use sourcerenderer_core::{Point3, Vec3};

/// A semi-infinite cylinder extending from `endpoint` along `axis`
/// (§3 `HalfCylinder`), used as the directional-light shadow volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HalfCylinder {
    pub endpoint: Point3,
    pub axis: Vec3,
    pub radius: f32,
}

impl HalfCylinder {
    pub fn new(endpoint: Point3, axis: Vec3, radius: f32) -> Self {
        Self {
            endpoint,
            axis: axis.normalize(),
            radius,
        }
    }

    /// Reproduces the original engine's finite-cylinder early-exit quirk
    /// (§Open Questions): distance beyond the endpoint in the negative
    /// axis direction is treated as outside even though the volume is
    /// conceptually semi-infinite in the positive direction only.
    pub fn axial_distance(&self, point: Point3) -> f32 {
        (point - self.endpoint).dot(self.axis)
    }

    pub fn contains_point(&self, point: Point3) -> bool {
        let dist = self.axial_distance(point);
        if dist < 0.0 {
            return false;
        }
        let perp = (point - self.endpoint) - dist * self.axis;
        perp.length_squared() <= self.radius * self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_behind_endpoint_is_outside() {
        let hc = HalfCylinder::new(Point3::ZERO, Vec3::Y, 1.0);
        assert!(!hc.contains_point(Point3::new(0.0, -1.0, 0.0)));
        assert!(hc.contains_point(Point3::new(0.0, 1.0, 0.0)));
    }
}
