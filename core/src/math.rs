//! Linear-algebra aliases shared across the culling and shadow-geometry
//! modules, plus the plane convention used throughout: a plane is a
//! `Vec4(nx, ny, nz, d)` with `dot(plane, point) = nx*px + ny*py + nz*pz + d`
//! giving the signed distance to the point, positive on the interior side.

pub use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

/// Integer 2D vector, used for framebuffer/mouse coordinates at the back-end seam.
pub type Vec2I = glam::IVec2;
/// Unsigned 2D vector, used for window dimensions.
pub type Vec2UI = glam::UVec2;
/// Points and direction vectors share a representation; `Point3` documents intent.
pub type Point3 = Vec3;
/// A plane in `(n, d)` form, see module docs.
pub type Plane = Vec4;

/// Builds the inward-pointing plane through `point` with the given unit normal.
pub fn plane_from_normal_and_point(normal: Vec3, point: Point3) -> Plane {
    Plane::new(normal.x, normal.y, normal.z, -normal.dot(point))
}

/// Signed distance from `point` to `plane`; positive is the interior side.
pub fn plane_dot(plane: Plane, point: Point3) -> f32 {
    plane.x * point.x + plane.y * point.y + plane.z * point.z + plane.w
}

/// The plane's normal (first three components).
pub fn plane_normal(plane: Plane) -> Vec3 {
    plane.truncate()
}
