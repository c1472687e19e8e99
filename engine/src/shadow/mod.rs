//! The shadow-volume constructor (§4.4): given an object's oriented box
//! and a light, produces a bounding volume for the region of space the
//! object could cast a shadow into within the light's influence.

use sourcerenderer_core::{Point3, Vec3};

use crate::bounds::{
    BoundingVolume, Cylinder, HalfCylinder, OrientedBox, PyramidCone, Sphere, SphericalSector, BOX_PLANE_VERTICES,
};

/// The lights a shadow volume can be constructed for (§3 `Light`
/// variants, shadow-relevant subset).
#[derive(Debug, Clone, Copy)]
pub enum ShadowLight {
    Directional { direction: Vec3 },
    Beam { position: Point3, axis: Vec3, length: f32, radius: f32 },
    Point { position: Point3 },
    Spot { position: Point3, direction: Vec3, cos_half_angle: f32 },
}

/// Builds the directional-light shadow volume: a `HalfCylinder` exact for
/// spheres, conservative for non-spherical objects (§4.4).
pub fn directional_shadow_volume(object_sphere: Sphere, light_direction: Vec3) -> BoundingVolume {
    let light_direction = light_direction.normalize();
    let endpoint = object_sphere.center - object_sphere.radius * light_direction;
    BoundingVolume::HalfCylinder(HalfCylinder::new(endpoint, light_direction, object_sphere.radius))
}

/// Builds the beam-light shadow volume: `Empty` if the object sphere lies
/// entirely outside the beam's finite axial extent, otherwise a `Cylinder`
/// clipped to `[max(d-r, 0), length]` along the beam (§4.4).
pub fn beam_shadow_volume(
    object_sphere: Sphere,
    beam_position: Point3,
    beam_axis: Vec3,
    beam_length: f32,
    beam_radius: f32,
) -> BoundingVolume {
    let beam_axis = beam_axis.normalize();
    let d = (object_sphere.center - beam_position).dot(beam_axis);
    let r = object_sphere.radius;
    if d <= -r || d >= beam_length + r {
        return BoundingVolume::Empty;
    }

    let start = (d - r).max(0.0);
    let end = beam_length;
    let center = beam_position + beam_axis * (0.5 * (start + end));
    let length = end - start;
    BoundingVolume::Cylinder(Cylinder::new(center, beam_axis, length, beam_radius.max(r)))
}

/// §4.4 point/spot branch result: the silhouette's base vertices scaled
/// to the light's radius.
struct Silhouette {
    base_vertices: smallvec::SmallVec<[Point3; 8]>,
}

/// Builds the point/spot-light shadow volume (§4.4): a `PyramidCone` when
/// every silhouette edge makes an angle strictly less than 90 degrees with
/// the primary axis, otherwise a `SphericalSector` with the same axis and
/// radius; degenerate cases return `Empty` (light coplanar with a flat
/// object) or `Everywhere` (light inside the box).
pub fn point_or_spot_shadow_volume(object: &OrientedBox, light_position: Point3, light_radius: f32) -> BoundingVolume {
    if box_contains_point(object, light_position) {
        return BoundingVolume::Everywhere;
    }

    let axis = (object.center - light_position).normalize_or_zero();
    if axis == Vec3::ZERO {
        return BoundingVolume::Everywhere;
    }

    match build_silhouette(object, light_position, light_radius) {
        SilhouetteResult::FlatPlaneContainsLight => BoundingVolume::Empty,
        SilhouetteResult::Ok(silhouette) => cone_or_sector(&silhouette, light_position, light_radius, axis),
    }
}

enum SilhouetteResult {
    FlatPlaneContainsLight,
    Ok(Silhouette),
}

fn box_contains_point(object: &OrientedBox, point: Point3) -> bool {
    object.plane.iter().all(|p| sourcerenderer_core::math::plane_dot(*p, point) > 0.0)
}

/// Dot products of the light against all six box planes select the
/// silhouette: planes with `dot < 0` face the light. Each silhouette box
/// vertex's edge `light -> vertex` is rescaled to `light_radius` and
/// collected as a base vertex (§4.4).
fn build_silhouette(object: &OrientedBox, light_position: Point3, light_radius: f32) -> SilhouetteResult {
    let vertices = object.construct_vertices();
    if vertices.len() == 4 {
        // Flat box: if the light lies in its plane, no shadow is cast.
        let plane = object.plane[4];
        if sourcerenderer_core::math::plane_dot(plane, light_position).abs() < 1e-5 {
            return SilhouetteResult::FlatPlaneContainsLight;
        }
    }

    let facing_planes: smallvec::SmallVec<[usize; 6]> = object
        .plane
        .iter()
        .enumerate()
        .filter(|(_, p)| sourcerenderer_core::math::plane_dot(**p, light_position) < 0.0)
        .map(|(i, _)| i)
        .collect();

    let mut silhouette_vertices: smallvec::SmallVec<[usize; 8]> = smallvec::SmallVec::new();
    for (vi, _) in vertices.iter().enumerate() {
        if BOX_PLANE_VERTICES
            .iter()
            .enumerate()
            .any(|(plane_i, verts)| facing_planes.contains(&plane_i) && verts.contains(&vi))
        {
            silhouette_vertices.push(vi);
        }
    }

    let base_vertices = silhouette_vertices
        .iter()
        .map(|&vi| {
            let edge = vertices[vi] - light_position;
            let dist = edge.length();
            if dist < 1e-9 {
                light_position
            } else {
                light_position + edge * (light_radius / dist)
            }
        })
        .collect();

    SilhouetteResult::Ok(Silhouette { base_vertices })
}

/// Tests every silhouette edge's angle against `axis`; below 90 degrees
/// for all of them produces a `PyramidCone`, otherwise (the angle reaches
/// 90 degrees or more for some edge) this degrades directly to a
/// `SphericalSector` with the same axis and radius (§4.4).
fn cone_or_sector(silhouette: &Silhouette, light_position: Point3, light_radius: f32, axis: Vec3) -> BoundingVolume {
    if silhouette.base_vertices.is_empty() {
        return BoundingVolume::Everywhere;
    }

    let mut min_cos = 1.0f32;
    for v in &silhouette.base_vertices {
        let edge = (*v - light_position).normalize_or_zero();
        if edge == Vec3::ZERO {
            continue;
        }
        let cos_angle = edge.dot(axis);
        min_cos = min_cos.min(cos_angle);
        if min_cos <= 0.0 {
            break;
        }
    }

    if min_cos <= 0.0 {
        return degrade_to_spherical_sector(light_position, axis, light_radius, min_cos);
    }

    let planes = silhouette_side_planes(&silhouette.base_vertices, light_position, axis);
    BoundingVolume::PyramidCone(PyramidCone::new(light_position, axis, min_cos, planes))
}

/// Builds the 4 side planes of the pyramid-cone through consecutive base
/// vertices and the apex, padding with a repeat of the last plane when
/// fewer than 4 silhouette vertices exist (a corner or edge silhouette).
fn silhouette_side_planes(base_vertices: &[Point3], apex: Point3, axis: Vec3) -> [sourcerenderer_core::Plane; 4] {
    let mut planes = [sourcerenderer_core::Plane::ZERO; 4];
    let n = base_vertices.len();
    if n < 2 {
        return planes;
    }
    for i in 0..4 {
        let a = base_vertices[i % n];
        let b = base_vertices[(i + 1) % n];
        let normal = (a - apex).cross(b - apex).normalize_or_zero();
        let normal = if normal.dot(axis) < 0.0 { -normal } else { normal };
        planes[i] = sourcerenderer_core::math::plane_from_normal_and_point(normal, apex);
    }
    planes
}

/// Falls back from a `PyramidCone` to a `SphericalSector` with the same
/// axis, radius, and half-angular size (§4.4).
pub fn degrade_to_spherical_sector(apex: Point3, axis: Vec3, radius: f32, cos_half_angular_size: f32) -> BoundingVolume {
    BoundingVolume::SphericalSector(SphericalSector::new(apex, axis, radius, cos_half_angular_size))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::{Aabb, PcaAxis};

    #[test]
    fn directional_shadow_is_exact_half_cylinder_behind_sphere() {
        let sphere = Sphere::new(Point3::new(0.0, 0.0, -20.0), 1.0);
        let volume = directional_shadow_volume(sphere, Vec3::new(0.0, 0.0, -1.0));
        match volume {
            BoundingVolume::HalfCylinder(hc) => {
                assert!((hc.endpoint - Point3::new(0.0, 0.0, -19.0)).length() < 1e-5);
                assert!((hc.axis - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
                assert!((hc.radius - 1.0).abs() < 1e-5);
            }
            other => panic!("expected HalfCylinder, got {other:?}"),
        }
    }

    #[test]
    fn disjoint_beam_shadow_is_empty() {
        let sphere = Sphere::new(Point3::new(-5.0, 0.0, 0.0), 0.5);
        let volume = beam_shadow_volume(sphere, Point3::ZERO, Vec3::X, 10.0, 1.0);
        assert!(matches!(volume, BoundingVolume::Empty));
    }

    #[test]
    fn flat_box_with_light_in_its_plane_has_empty_shadow() {
        let object = OrientedBox::new(
            Point3::ZERO,
            [
                PcaAxis::from_vector(Vec3::new(2.0, 0.0, 0.0)),
                PcaAxis::from_vector(Vec3::new(0.0, 2.0, 0.0)),
                PcaAxis::from_vector(Vec3::ZERO),
            ],
            Vec3::Z,
            crate::bounds::BoxFlags::empty(),
        );
        let volume = point_or_spot_shadow_volume(&object, Point3::new(0.5, 0.5, 0.0), 1.0);
        assert!(matches!(volume, BoundingVolume::Empty));
    }

    #[test]
    fn light_inside_box_yields_everywhere() {
        let object = OrientedBox::from_aabb(&Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0)));
        let volume = point_or_spot_shadow_volume(&object, Point3::ZERO, 1.0);
        assert!(matches!(volume, BoundingVolume::Everywhere));
    }

    #[test]
    fn point_light_outside_box_yields_pyramid_cone_or_spherical_sector() {
        let object = OrientedBox::from_aabb(&Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0)));
        let volume = point_or_spot_shadow_volume(&object, Point3::new(0.0, 0.0, -10.0), 20.0);
        assert!(matches!(volume, BoundingVolume::PyramidCone(_) | BoundingVolume::SphericalSector(_)));
    }

    #[test]
    fn silhouette_edge_at_90_degrees_degrades_to_spherical_sector_directly() {
        // A light sitting on axis (0,0,1), with one silhouette edge
        // perpendicular to it, must degrade straight to a SphericalSector
        // rather than being treated as a near-miss retry case.
        let silhouette = Silhouette {
            base_vertices: {
                let mut v = smallvec::SmallVec::new();
                v.push(Point3::new(1.0, 0.0, 0.0));
                v
            },
        };
        let volume = cone_or_sector(&silhouette, Point3::ZERO, 5.0, Vec3::Z);
        match volume {
            BoundingVolume::SphericalSector(sector) => {
                assert!((sector.radius - 5.0).abs() < 1e-5);
                assert!(sector.cos_half_angular_size <= 0.0);
            }
            other => panic!("expected SphericalSector, got {other:?}"),
        }
    }

    #[test]
    fn wide_thin_wall_near_an_off_center_light_yields_spherical_sector() {
        // A wide, thin wall with a light close to its surface but offset
        // toward one edge: the near corner's silhouette edge bends past
        // 90 degrees from the light-to-center axis, which the pyramid
        // cone shape cannot represent (§4.4).
        let object = OrientedBox::from_aabb(&Aabb::new(Point3::new(-10.0, -10.0, -0.01), Point3::new(10.0, 10.0, 0.01)));
        let volume = point_or_spot_shadow_volume(&object, Point3::new(9.99, 0.0, -0.02), 5.0);
        match volume {
            BoundingVolume::SphericalSector(sector) => {
                assert!((sector.radius - 5.0).abs() < 1e-5);
            }
            other => panic!("expected SphericalSector, got {other:?}"),
        }
    }
}
