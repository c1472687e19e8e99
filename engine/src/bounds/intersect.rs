//! Pairwise intersection tests between bound shapes and a `ConvexHull`
//! (§4.1). Throughout, `dot(plane, point) <= 0` is the "outside" predicate:
//! a shape touching a plane exactly counts as intersecting, not outside.

use sourcerenderer_core::math::plane_dot;
use sourcerenderer_core::Point3;

use super::{
    Capsule, ConvexHull, ConvexHullFull, Cylinder, Ellipsoid, Hull, HalfCylinder, Pyramid, PyramidCone, Sphere,
    SphericalSector,
};

/// §4.1: a `Hull` (plain vertex list) intersects a `ConvexHull` unless some
/// plane separates them entirely — i.e. unless some plane has *every*
/// vertex on its outside. Equivalently: keep the hull only if, for every
/// plane, at least one vertex is on the inside.
pub fn hull_vs_convex_hull(hull: &Hull, convex_hull: &ConvexHull) -> bool {
    convex_hull.planes.iter().all(|plane| hull.any_vertex_inside(*plane))
}

pub fn sphere_vs_convex_hull(sphere: &Sphere, convex_hull: &ConvexHull) -> bool {
    convex_hull
        .planes
        .iter()
        .all(|plane| plane_dot(*plane, sphere.center) > -sphere.radius)
}

/// Also reports `CompletelyInside` when every plane clears the sphere by
/// at least its radius on the interior side.
pub fn query_sphere_vs_convex_hull(sphere: &Sphere, convex_hull: &ConvexHull) -> super::BoundsCheckResult {
    let mut inside_count = 0usize;
    for plane in &convex_hull.planes {
        let d = plane_dot(*plane, sphere.center);
        if d <= -sphere.radius {
            return super::BoundsCheckResult::Outside;
        }
        if d >= sphere.radius {
            inside_count += 1;
        }
    }
    if inside_count == convex_hull.planes.len() {
        super::BoundsCheckResult::CompletelyInside
    } else {
        super::BoundsCheckResult::PartiallyInside
    }
}

pub fn ellipsoid_vs_convex_hull(ellipsoid: &Ellipsoid, convex_hull: &ConvexHull) -> bool {
    convex_hull.planes.iter().all(|plane| {
        let normal = sourcerenderer_core::math::plane_normal(*plane);
        let r2 = ellipsoid.effective_radius_squared(normal);
        plane_dot(*plane, ellipsoid.center) > -r2.sqrt()
    })
}

/// `PreferBoxLineSegment`-mode test: clips the box's two end-axis segment
/// against each plane rather than projecting all three axes' radii.
pub fn box_vs_convex_hull(b: &super::OrientedBox, convex_hull: &ConvexHull) -> bool {
    if b.flags.contains(super::BoxFlags::PREFER_BOX_LINE_SEGMENT) {
        let vertices = b.construct_vertices();
        convex_hull
            .planes
            .iter()
            .all(|plane| vertices.iter().any(|v| plane_dot(*plane, *v) > 0.0))
    } else {
        convex_hull.planes.iter().all(|plane| {
            let normal = sourcerenderer_core::math::plane_normal(*plane);
            let radius = b
                .pca
                .iter()
                .map(|axis| (0.5 * axis.vector).dot(normal).abs())
                .sum::<f32>();
            plane_dot(*plane, b.center) > -radius
        })
    }
}

pub fn cylinder_vs_convex_hull(cylinder: &Cylinder, convex_hull: &ConvexHull) -> bool {
    convex_hull.planes.iter().all(|plane| {
        let normal = sourcerenderer_core::math::plane_normal(*plane);
        let axis_component = normal.dot(cylinder.axis).abs();
        let radius = 0.5 * cylinder.length * axis_component + cylinder.radius * (1.0 - axis_component * axis_component).max(0.0).sqrt();
        plane_dot(*plane, cylinder.center) > -radius
    })
}

/// §4.1: the half-cylinder starts semi-infinite from `endpoint` along
/// `axis`. Each plane either rejects outright (both ends outside with the
/// axis pointing away), passes with no new information, or clips one end
/// of the cylinder to the point where it crosses the plane — at which
/// point the cylinder becomes finite and subsequent planes clip both ends.
/// This never reports a false negative: a half-cylinder is only rejected
/// once a plane is found that excludes all of it.
pub fn half_cylinder_vs_convex_hull(hc: &HalfCylinder, convex_hull: &ConvexHull) -> bool {
    let mut q1 = hc.endpoint;
    let mut q2 = hc.endpoint;
    let mut infinite = true;
    let planes = &convex_hull.planes;
    let n = planes.len();
    for (i, plane) in planes.iter().enumerate() {
        let normal = sourcerenderer_core::math::plane_normal(*plane);
        let axis_component = normal.dot(hc.axis);
        let r_eff = hc.radius * (1.0 - axis_component * axis_component).max(0.0).sqrt();
        let dot1 = plane_dot(*plane, q1);

        if infinite {
            let dot2 = axis_component;
            if dot1 <= -r_eff && dot2 <= 0.0 {
                return false;
            }
            if dot1 >= -r_eff && dot2 >= 0.0 {
                continue;
            }
            if i == n - 1 {
                break;
            }
            let t = -(r_eff + dot1) / dot2;
            let q3 = q1 + t * hc.axis;
            if dot1 < -r_eff {
                q1 = q3;
            } else {
                q2 = q3;
                infinite = false;
            }
        } else {
            let dot2 = plane_dot(*plane, q2);
            if dot1 <= -r_eff && dot2 <= -r_eff {
                return false;
            }
            if dot1 >= -r_eff && dot2 >= -r_eff {
                continue;
            }
            if i == n - 1 {
                break;
            }
            let r = q2 - q1;
            let t = -(r_eff + dot1) / normal.dot(r);
            let q3 = q1 + t * r;
            if dot1 < -r_eff {
                q1 = q3;
            } else {
                q2 = q3;
            }
        }
    }
    true
}

pub fn spherical_sector_vs_convex_hull(sector: &SphericalSector, convex_hull: &ConvexHull) -> bool {
    convex_hull.planes.iter().all(|plane| plane_dot(*plane, sector.apex) > -sector.radius)
}

/// §4.1: `min_radius`/`max_radius` give a cheap first-pass reject before
/// falling back to the per-plane vertex test — designed for pyramid (the
/// shadow volume) against frustum (a `ConvexHullFull`'s own centroid and
/// radii are meaningless for an arbitrary external `ConvexHull`, so the
/// fast path only fires when the hull carries a centroid/radius of its own
/// relative to the *tested* convex hull's planes via `plane_radius`).
pub fn convex_hull_full_vs_convex_hull(full: &ConvexHullFull, convex_hull: &ConvexHull) -> bool {
    if convex_hull.planes.len() == full.plane_radius.len() {
        let mut all_clear = true;
        for (plane, &radius) in convex_hull.planes.iter().zip(full.plane_radius.iter()) {
            let d = plane_dot(*plane, full.centroid());
            if d <= -full.max_radius {
                return false;
            }
            if d < radius {
                all_clear = false;
            }
        }
        if all_clear {
            return true;
        }
    }
    convex_hull
        .planes
        .iter()
        .all(|plane| full.vertices.iter().any(|v| plane_dot(*plane, *v) > 0.0))
}

/// §4.1: a `Pyramid`'s planes all pass through its apex, so the apex
/// itself is the only vertex every plane shares; test it plus the base
/// ring the same way `hull_vs_convex_hull` tests an arbitrary vertex set.
pub fn pyramid_vs_convex_hull(pyramid: &Pyramid, convex_hull: &ConvexHull) -> bool {
    convex_hull
        .planes
        .iter()
        .all(|plane| plane_dot(*plane, pyramid.apex) > 0.0 || pyramid.base.iter().any(|v| plane_dot(*plane, *v) > 0.0))
}

/// §4.1: a `PyramidCone` is semi-infinite (no stored base radius), so a
/// plane rejects it only when the apex is outside *and* the cone's axis
/// points away from the plane's interior — otherwise the cone's unbounded
/// growth along the axis eventually crosses back in. The angular cone
/// only tightens the volume's cross-section, it never makes it finite.
pub fn pyramid_cone_vs_convex_hull(cone: &PyramidCone, convex_hull: &ConvexHull) -> bool {
    convex_hull.planes.iter().all(|plane| {
        if plane_dot(*plane, cone.apex) > 0.0 {
            return true;
        }
        let normal = sourcerenderer_core::math::plane_normal(*plane);
        normal.dot(cone.axis) > 0.0
    })
}

/// §4.1 "dark-cap visibility": an infinite pyramid's base plane versus the
/// four side planes of a frustum without near/far planes. First rejects
/// by comparing the angle between the base normal and the near-plane
/// normal against the frustum's maximum half-angular size, then tests
/// each apex→base-vertex edge against every side plane, short-circuiting
/// as soon as one edge's infinite ray is inside all four side planes.
pub fn infinite_pyramid_base_vs_frustum_sides(
    pyramid: &Pyramid,
    near_plane_normal: sourcerenderer_core::Vec3,
    max_half_angular_size: f32,
    side_planes: &[sourcerenderer_core::Plane],
) -> bool {
    let base_angle = pyramid.base_normal.dot(near_plane_normal).clamp(-1.0, 1.0).acos();
    if base_angle > max_half_angular_size {
        return false;
    }
    for vertex in &pyramid.base {
        let edge = *vertex - pyramid.apex;
        if side_planes.iter().all(|plane| {
            let normal = sourcerenderer_core::math::plane_normal(*plane);
            normal.dot(edge) > 0.0 || plane_dot(*plane, pyramid.apex) > 0.0
        }) {
            return true;
        }
    }
    false
}

/// Capsule modeled as a cylinder with its radius applied the same way;
/// grounded by analogy with `cylinder_vs_convex_hull` since the original
/// engine has no capsule type.
pub fn capsule_vs_convex_hull(capsule: &Capsule, convex_hull: &ConvexHull) -> bool {
    let as_cylinder = Cylinder::new(capsule.center, capsule.axis, capsule.length, capsule.radius);
    cylinder_vs_convex_hull(&as_cylinder, convex_hull)
}

pub fn point_vs_cylinder(point: Point3, cylinder: &Cylinder) -> bool {
    let to_point = point - cylinder.center;
    let axial = to_point.dot(cylinder.axis);
    if axial.abs() > 0.5 * cylinder.length {
        return false;
    }
    let perp = to_point - axial * cylinder.axis;
    perp.length_squared() <= cylinder.radius * cylinder.radius
}

pub fn point_vs_spherical_sector(point: Point3, sector: &SphericalSector) -> bool {
    sector.contains_point(point)
}
