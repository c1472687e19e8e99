use sourcerenderer_core::math::{plane_dot, plane_from_normal_and_point};
use sourcerenderer_core::{Plane, Point3, Vec4};

use crate::bounds::ConvexHull;

use super::frustum::Frustum;

/// §4.3 "Shadow-caster volume": the convex hull enclosing the view
/// frustum and the light, used to reject objects that cannot possibly
/// cast a shadow into the visible frustum. `light_position` is
/// homogeneous (`w = 0` for a directional light's direction).
pub fn shadow_caster_volume(frustum: &Frustum, light_position: Vec4, is_point_light: bool) -> ConvexHull {
    // The far plane never bounds what can cast a shadow into the visible
    // frustum, so this volume is built from the 5-plane `without_far`
    // specialisation where one is available (§4.3).
    let base_hull = frustum.without_far.as_ref().unwrap_or(&frustum.hull);

    if is_point_light && light_position.w.abs() > 1e-6 {
        let light_point = light_position.truncate() / light_position.w;
        if frustum.contains_point(light_point) {
            return base_hull.clone();
        }
    }

    let planes = &base_hull.planes;
    let dots: smallvec::SmallVec<[f32; 6]> = planes
        .iter()
        .map(|p| p.x * light_position.x + p.y * light_position.y + p.z * light_position.z + p.w * light_position.w)
        .collect();

    let mut result = smallvec::SmallVec::<[Plane; 6]>::new();
    for (i, &d) in dots.iter().enumerate() {
        if d > 0.0 {
            result.push(planes[i]);
        }
    }

    let n = planes.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if (dots[i] > 0.0) != (dots[j] > 0.0) {
                if let Some(edge_plane) = edge_plane_between(frustum, base_hull, i, j, light_position) {
                    result.push(edge_plane);
                }
            }
        }
    }

    if result.is_empty() && is_point_light && light_position.w.abs() > 1e-6 && frustum.without_far.is_none() {
        let light_point = light_position.truncate() / light_position.w;
        return degenerate_behind_camera_hull(frustum, light_point);
    }

    ConvexHull::new(result)
}

/// A plane through the shared edge of frustum planes `i` and `j`, inward
/// oriented using the frustum centroid, passing through (point light) the
/// light or (directional light) parallel to the light direction.
fn edge_plane_between(frustum: &Frustum, base_hull: &ConvexHull, i: usize, j: usize, light_position: Vec4) -> Option<Plane> {
    let ni = sourcerenderer_core::math::plane_normal(base_hull.planes[i]);
    let nj = sourcerenderer_core::math::plane_normal(base_hull.planes[j]);
    let edge_dir = ni.cross(nj);
    if edge_dir.length_squared() < 1e-10 {
        return None;
    }

    // Any point on both planes: project the frustum centroid onto their
    // intersection line as a reference point.
    let reference = frustum.sphere.center;

    let to_light = if light_position.w.abs() > 1e-6 {
        (light_position.truncate() / light_position.w) - reference
    } else {
        light_position.truncate()
    };

    let normal = edge_dir.cross(to_light).normalize_or_zero();
    if normal.length_squared() < 1e-10 {
        return None;
    }
    let plane = plane_from_normal_and_point(normal, reference);
    Some(if plane_dot(plane, frustum.sphere.center) < 0.0 { -plane } else { plane })
}

/// §4.3 degenerate case: no frustum planes qualified and the light is a
/// point light behind the camera with no far plane — emit four planes
/// parallel to the frustum sides but translated to contain the light.
fn degenerate_behind_camera_hull(frustum: &Frustum, light_point: Point3) -> ConvexHull {
    let mut planes = smallvec::SmallVec::<[Plane; 6]>::new();
    for side_plane in &frustum.hull.planes[2..6.min(frustum.hull.planes.len())] {
        let normal = sourcerenderer_core::math::plane_normal(*side_plane);
        planes.push(plane_from_normal_and_point(normal, light_point));
    }
    ConvexHull::new(planes)
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
    fn point_light_inside_frustum_uses_frustum_planes_directly() {
        let frustum = Frustum::from_view(&test_view());
        let light = Vec4::new(0.0, 0.0, -50.0, 1.0);
        let hull = shadow_caster_volume(&frustum, light, true);
        assert_eq!(hull.planes.len(), frustum.without_far.as_ref().unwrap().planes.len());
    }

    #[test]
    fn light_outside_frustum_produces_a_nonempty_hull() {
        let frustum = Frustum::from_view(&test_view());
        let light = Vec4::new(500.0, 0.0, -50.0, 1.0);
        let hull = shadow_caster_volume(&frustum, light, true);
        assert!(!hull.planes.is_empty());
    }
}
