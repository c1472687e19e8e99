use sourcerenderer_core::math::{plane_dot, plane_from_normal_and_point};
use sourcerenderer_core::{Plane, Point3, Vec4};

use crate::bounds::ConvexHull;

use super::frustum::Frustum;

/// §4.3 "Near-clip volume": where the light sits relative to the near
/// plane, in homogeneous light-position terms (`w = 0` for a directional
/// light's direction-at-infinity, `w = 1` for a point/spot/beam light).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightPositionType {
    InFrontOfNearPlane,
    BehindNearPlane,
    InNearPlane,
}

const CLASSIFY_EPSILON: f32 = 1e-4;

/// Builds the convex hull used to choose stencil-shadow depth-pass vs
/// depth-fail rendering (§4.3). `light_position` is homogeneous: a point
/// light passes `w = 1`, a directional light passes its direction with
/// `w = 0`. `is_point_light` controls whether the sixth plane (through the
/// light position, oriented toward the near-rectangle center) is added.
pub fn near_clip_volume(frustum: &Frustum, light_position: Vec4, is_point_light: bool) -> (ConvexHull, LightPositionType) {
    let near_plane = frustum.hull.planes[0];
    let d = near_plane.x * light_position.x
        + near_plane.y * light_position.y
        + near_plane.z * light_position.z
        + near_plane.w * light_position.w;
    let position_type = if d < -CLASSIFY_EPSILON {
        LightPositionType::BehindNearPlane
    } else if d > CLASSIFY_EPSILON {
        LightPositionType::InFrontOfNearPlane
    } else {
        LightPositionType::InNearPlane
    };

    let near_corners = frustum.near_corners();
    let near_center = near_corners.iter().fold(Point3::ZERO, |a, b| a + *b) * 0.25;

    let mut planes = smallvec::SmallVec::<[Plane; 6]>::new();
    for i in 0..4 {
        let a = near_corners[i];
        let b = near_corners[(i + 1) % 4];
        planes.push(edge_plane_toward(a, b, light_position, near_center));
    }

    planes.push(if d >= 0.0 { near_plane } else { -near_plane });

    if is_point_light && light_position.w.abs() > 1e-6 {
        let light_point = light_position.truncate() / light_position.w;
        let normal = (near_center - light_point).normalize_or_zero();
        planes.push(plane_from_normal_and_point(normal, light_point));
    }

    (ConvexHull::new(planes), position_type)
}

/// A plane through the edge `a -> b` and the (possibly infinite) light
/// position, oriented so `reference` lies on its interior side.
fn edge_plane_toward(a: Point3, b: Point3, light_position: Vec4, reference: Point3) -> Plane {
    let edge = b - a;
    let to_light = if light_position.w.abs() > 1e-6 {
        (light_position.truncate() / light_position.w) - a
    } else {
        light_position.truncate()
    };
    let normal = edge.cross(to_light).normalize_or_zero();
    let plane = plane_from_normal_and_point(normal, a);
    if plane_dot(plane, reference) < 0.0 {
        -plane
    } else {
        plane
    }
}

#[cfg(test)]
mod tests {
    use super::super::frustum::ViewMatrices;
    use super::*;
    use sourcerenderer_core::Mat4;

    fn test_view() -> ViewMatrices {
        ViewMatrices {
            view: Mat4::IDENTITY,
            vertical_angle_deg: 60.0,
            aspect: 16.0 / 9.0,
            near: 1.0,
            far: 1000.0,
        }
    }

    #[test]
    fn point_light_in_front_of_near_plane_yields_six_planes() {
        let frustum = Frustum::from_view(&test_view());
        let light = Vec4::new(0.0, 0.0, -50.0, 1.0);
        let (hull, kind) = near_clip_volume(&frustum, light, true);
        assert_eq!(kind, LightPositionType::InFrontOfNearPlane);
        assert_eq!(hull.planes.len(), 6);
    }

    #[test]
    fn directional_light_yields_five_planes() {
        let frustum = Frustum::from_view(&test_view());
        let direction = Vec4::new(0.0, 0.0, -1.0, 0.0);
        let (hull, _) = near_clip_volume(&frustum, direction, false);
        assert_eq!(hull.planes.len(), 5);
    }

    #[test]
    fn light_behind_camera_is_classified_behind_near_plane() {
        let frustum = Frustum::from_view(&test_view());
        let light = Vec4::new(0.0, 0.0, 50.0, 1.0);
        let (_, kind) = near_clip_volume(&frustum, light, true);
        assert_eq!(kind, LightPositionType::BehindNearPlane);
    }
}
