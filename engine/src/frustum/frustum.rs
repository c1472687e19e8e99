use sourcerenderer_core::math::plane_dot;
use sourcerenderer_core::{Mat4, Plane, Point3, Vec3};

use crate::bounds::{Aabb, ConvexHull, Sphere};

/// The per-frame view snapshot the culling driver consumes (§1, §9
/// "Global engine state": passed explicitly rather than through globals).
#[derive(Debug, Clone, Copy)]
pub struct ViewMatrices {
    pub view: Mat4,
    pub vertical_angle_deg: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl ViewMatrices {
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.vertical_angle_deg.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view
    }
}

/// The view frustum (§3, §4.3): a `ConvexHull` of inward-pointing planes
/// plus an enclosing `Sphere`, `Aabb`, and the 8 world-space corners. When
/// the far plane is kept, `without_far` additionally holds a 5-plane
/// specialisation used for shadow-map region derivation and shadow-caster
/// volume construction.
#[derive(Debug, Clone)]
pub struct Frustum {
    pub hull: ConvexHull,
    pub sphere: Sphere,
    pub aabb: Aabb,
    pub corners: [Point3; 8],
    pub without_far: Option<ConvexHull>,
}

/// Eye-space corner order: near/far × bottom-left, bottom-right,
/// top-right, top-left.
const NEAR_BL: usize = 0;
const NEAR_BR: usize = 1;
const NEAR_TR: usize = 2;
const NEAR_TL: usize = 3;
const FAR_BL: usize = 4;
const FAR_BR: usize = 5;
const FAR_TR: usize = 6;
const FAR_TL: usize = 7;

impl Frustum {
    /// Builds the frustum analytically in eye space (looking down `-Z`,
    /// right-handed) then transforms corners by the inverse view matrix
    /// and planes by the view matrix's transpose (§4.3).
    pub fn from_view(view: &ViewMatrices) -> Self {
        let half_height_near = (view.vertical_angle_deg.to_radians() * 0.5).tan() * view.near;
        let half_width_near = half_height_near * view.aspect;
        let half_height_far = (view.vertical_angle_deg.to_radians() * 0.5).tan() * view.far;
        let half_width_far = half_height_far * view.aspect;

        let mut corners_eye = [Point3::ZERO; 8];
        corners_eye[NEAR_BL] = Point3::new(-half_width_near, -half_height_near, -view.near);
        corners_eye[NEAR_BR] = Point3::new(half_width_near, -half_height_near, -view.near);
        corners_eye[NEAR_TR] = Point3::new(half_width_near, half_height_near, -view.near);
        corners_eye[NEAR_TL] = Point3::new(-half_width_near, half_height_near, -view.near);
        corners_eye[FAR_BL] = Point3::new(-half_width_far, -half_height_far, -view.far);
        corners_eye[FAR_BR] = Point3::new(half_width_far, -half_height_far, -view.far);
        corners_eye[FAR_TR] = Point3::new(half_width_far, half_height_far, -view.far);
        corners_eye[FAR_TL] = Point3::new(-half_width_far, half_height_far, -view.far);

        let planes_eye = eye_space_planes(&corners_eye);

        let view_inv = view.view.inverse();
        let mut corners = [Point3::ZERO; 8];
        for (i, c) in corners_eye.iter().enumerate() {
            corners[i] = view_inv.transform_point3(*c);
        }

        let view_t = view.view.transpose();
        let mut planes_world = smallvec::SmallVec::<[Plane; 6]>::new();
        for p in &planes_eye {
            planes_world.push(view_t * *p);
        }
        let hull = ConvexHull::new(planes_world.clone());

        let without_far = if view.far.is_finite() {
            let mut five = planes_world.clone();
            five.truncate(5);
            Some(ConvexHull::new(five))
        } else {
            None
        };

        let centroid = corners.iter().fold(Point3::ZERO, |a, b| a + *b) / 8.0;
        let radius = corners.iter().map(|c| (*c - centroid).length()).fold(0.0f32, f32::max);
        let sphere = Sphere::new(centroid, radius);

        let mut min = corners[0];
        let mut max = corners[0];
        for c in &corners[1..] {
            min = min.min(*c);
            max = max.max(*c);
        }

        Self {
            hull,
            sphere,
            aabb: Aabb::new(min, max),
            corners,
            without_far,
        }
    }

    pub fn contains_point(&self, point: Point3) -> bool {
        self.hull.contains_point(point)
    }

    /// The four near-plane corners, in winding order, used to build the
    /// near-clip volume's side planes (§4.3).
    pub fn near_corners(&self) -> [Point3; 4] {
        [self.corners[NEAR_BL], self.corners[NEAR_BR], self.corners[NEAR_TR], self.corners[NEAR_TL]]
    }

    /// Maximum half-angular size of the frustum as seen from the near
    /// plane's normal, used by the dark-cap visibility test (§4.1).
    pub fn max_half_angular_size(&self) -> f32 {
        let near_normal = sourcerenderer_core::math::plane_normal(self.hull.planes[4]);
        self.corners[NEAR_BL..=NEAR_TL]
            .iter()
            .chain(self.corners[FAR_BL..=FAR_TL].iter())
            .map(|c| {
                let dir = (*c - self.sphere.center).normalize_or_zero();
                dir.dot(near_normal).clamp(-1.0, 1.0).acos()
            })
            .fold(0.0f32, f32::max)
    }
}

/// Builds the six eye-space inward planes (near, far, left, right, bottom,
/// top) from the 8 eye-space corners; order: near, far, left, right,
/// bottom, top — `without_far` truncates this to the first 5, dropping far.
fn eye_space_planes(corners: &[Point3; 8]) -> [Plane; 6] {
    let near_normal = Vec3::new(0.0, 0.0, -1.0);
    let far_normal = Vec3::new(0.0, 0.0, 1.0);
    let left_normal = plane_normal_through(corners[NEAR_TL], corners[NEAR_BL], corners[FAR_BL]);
    let right_normal = plane_normal_through(corners[NEAR_BR], corners[NEAR_TR], corners[FAR_TR]);
    let bottom_normal = plane_normal_through(corners[NEAR_BL], corners[NEAR_BR], corners[FAR_BR]);
    let top_normal = plane_normal_through(corners[NEAR_TR], corners[NEAR_TL], corners[FAR_TL]);

    [
        sourcerenderer_core::math::plane_from_normal_and_point(near_normal, corners[NEAR_BL]),
        sourcerenderer_core::math::plane_from_normal_and_point(far_normal, corners[FAR_BL]),
        sourcerenderer_core::math::plane_from_normal_and_point(left_normal, corners[NEAR_BL]),
        sourcerenderer_core::math::plane_from_normal_and_point(right_normal, corners[NEAR_BR]),
        sourcerenderer_core::math::plane_from_normal_and_point(bottom_normal, corners[NEAR_BL]),
        sourcerenderer_core::math::plane_from_normal_and_point(top_normal, corners[NEAR_TR]),
    ]
}

fn plane_normal_through(a: Point3, b: Point3, c: Point3) -> Vec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

#[allow(dead_code)]
fn _unused_plane_dot_reference(plane: Plane, point: Point3) -> f32 {
    plane_dot(plane, point)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_view() -> ViewMatrices {
        ViewMatrices {
            view: Mat4::IDENTITY,
            vertical_angle_deg: 60.0,
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 1000.0,
        }
    }

    #[test]
    fn point_on_the_view_axis_is_inside_the_frustum() {
        let frustum = Frustum::from_view(&identity_view());
        assert!(frustum.contains_point(Point3::new(0.0, 0.0, -50.0)));
        assert!(!frustum.contains_point(Point3::new(0.0, 0.0, 50.0)));
    }

    #[test]
    fn without_far_hull_has_five_planes() {
        let frustum = Frustum::from_view(&identity_view());
        assert_eq!(frustum.without_far.as_ref().unwrap().planes.len(), 5);
        assert_eq!(frustum.hull.planes.len(), 6);
    }

    #[test]
    fn enclosing_sphere_contains_all_corners() {
        let frustum = Frustum::from_view(&identity_view());
        for c in &frustum.corners {
            assert!(frustum.sphere.contains_point(*c));
        }
    }
}
