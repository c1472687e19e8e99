use sourcerenderer_core::{Point3, Vec3};

/// A finite, possibly-oblique cylinder (§3 `Cylinder`): the axis runs from
/// `center - 0.5*length*axis` to `center + 0.5*length*axis`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    pub center: Point3,
    pub axis: Vec3,
    pub length: f32,
    pub radius: f32,
    /// `sqrt(1 - axis.{x,y,z}^2)`, precomputed for the point-in-cylinder
    /// distance test (§3a, `CalculateAxisCoefficients`).
    pub axis_coefficients: Vec3,
}

impl Cylinder {
    pub fn new(center: Point3, axis: Vec3, length: f32, radius: f32) -> Self {
        let axis = axis.normalize();
        let axis_coefficients = Vec3::new(
            (1.0 - axis.x * axis.x).max(0.0).sqrt(),
            (1.0 - axis.y * axis.y).max(0.0).sqrt(),
            (1.0 - axis.z * axis.z).max(0.0).sqrt(),
        );
        Self {
            center,
            axis,
            length,
            radius,
            axis_coefficients,
        }
    }

    pub fn endpoint1(&self) -> Point3 {
        self.center - 0.5 * self.length * self.axis
    }

    pub fn endpoint2(&self) -> Point3 {
        self.center + 0.5 * self.length * self.axis
    }

    /// Signed distance of `point` along the axis from `endpoint1`, in
    /// `[0, length]` when the point's projection lies within the cylinder's
    /// finite extent.
    pub fn axial_distance(&self, point: Point3) -> f32 {
        (point - self.endpoint1()).dot(self.axis)
    }

    pub fn bounding_sphere(&self) -> super::Sphere {
        let center = self.center;
        let radius = (0.5 * self.length).hypot(self.radius);
        super::Sphere::new(center, radius)
    }
}
