//! Bounding-volume types and the pairwise intersection library (§3, §4.1).

mod aabb;
mod capsule;
mod convex_hull;
mod cylinder;
mod ellipsoid;
mod half_cylinder;
mod hull;
pub mod intersect;
mod obb;
mod pyramid;
mod pyramid_cone;
mod sphere;
mod spherical_sector;

pub use aabb::Aabb;
pub use capsule::Capsule;
pub use convex_hull::{ConvexHull, ConvexHullFull};
pub use cylinder::Cylinder;
pub use ellipsoid::Ellipsoid;
pub use half_cylinder::HalfCylinder;
pub use hull::Hull;
pub use obb::{BoxFlags, OrientedBox, PcaAxis, BOX_PLANE_VERTICES};
pub use pyramid::Pyramid;
pub use pyramid_cone::PyramidCone;
pub use sphere::Sphere;
pub use spherical_sector::SphericalSector;

/// The tagged union over every supported bound shape (§3 `BoundingVolume`).
/// `Empty` and `Everywhere` are degenerate cases handled before any shape
/// dispatch: `Empty` never intersects anything, `Everywhere` always does.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundingVolume {
    Empty,
    Everywhere,
    Sphere(Sphere),
    Aabb(Aabb),
    Box(OrientedBox),
    Ellipsoid(Ellipsoid),
    Cylinder(Cylinder),
    HalfCylinder(HalfCylinder),
    Capsule(Capsule),
    Hull(Hull),
    ConvexHull(ConvexHull),
    ConvexHullFull(ConvexHullFull),
    Pyramid(Pyramid),
    PyramidCone(PyramidCone),
    SphericalSector(SphericalSector),
}

/// The result of classifying a bound against a convex region (§4.1, §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsCheckResult {
    Outside,
    PartiallyInside,
    CompletelyInside,
    /// The tested shape completely contains the region it was compared
    /// against (the inverse of `CompletelyInside`); used by the octree
    /// traversal to short-circuit adding every descendant unconditionally
    /// when a frustum fully swallows a node (§4.5).
    CompletelyEncloses,
}

impl BoundingVolume {
    pub fn bounding_sphere(&self) -> Sphere {
        match self {
            BoundingVolume::Empty => Sphere::new(sourcerenderer_core::Point3::ZERO, 0.0),
            BoundingVolume::Everywhere => Sphere::new(sourcerenderer_core::Point3::ZERO, f32::MAX),
            BoundingVolume::Sphere(s) => *s,
            BoundingVolume::Aabb(a) => a.bounding_sphere(),
            BoundingVolume::Box(b) => b.bounding_sphere(),
            BoundingVolume::Ellipsoid(e) => e.bounding_sphere(),
            BoundingVolume::Cylinder(c) => c.bounding_sphere(),
            BoundingVolume::HalfCylinder(hc) => Sphere::new(hc.endpoint, f32::MAX),
            BoundingVolume::Capsule(c) => c.bounding_sphere(),
            BoundingVolume::Hull(h) => bounding_sphere_of_points(&h.vertices),
            BoundingVolume::ConvexHull(_) => Sphere::new(sourcerenderer_core::Point3::ZERO, f32::MAX),
            BoundingVolume::ConvexHullFull(c) => Sphere::new(centroid(&c.vertices), c.max_radius),
            BoundingVolume::Pyramid(p) => Sphere::new(p.apex, f32::MAX),
            BoundingVolume::PyramidCone(c) => Sphere::new(c.apex, f32::MAX),
            BoundingVolume::SphericalSector(s) => Sphere::new(s.apex, s.radius),
        }
    }

    /// Dispatches to the matching `intersect::*_vs_convex_hull` test
    /// (§4.1). `Empty` never intersects; `Everywhere` always does; an
    /// unrecognised shape defaults conservatively to `true` per §4.1's
    /// "Unknown / Undefined BV type returns conservative `true`" rule —
    /// every variant here is recognised, so that path is unreachable, but
    /// callers constructing a `BoundingVolume` indirectly (e.g. from
    /// partially-initialised scene data) inherit the same default via
    /// `Empty`/`Everywhere` at the call site.
    pub fn intersects_convex_hull(&self, hull: &ConvexHull) -> bool {
        match self {
            BoundingVolume::Empty => false,
            BoundingVolume::Everywhere => true,
            BoundingVolume::Sphere(s) => intersect::sphere_vs_convex_hull(s, hull),
            BoundingVolume::Aabb(a) => intersect::box_vs_convex_hull(&OrientedBox::from_aabb(a), hull),
            BoundingVolume::Box(b) => intersect::box_vs_convex_hull(b, hull),
            BoundingVolume::Ellipsoid(e) => intersect::ellipsoid_vs_convex_hull(e, hull),
            BoundingVolume::Cylinder(c) => intersect::cylinder_vs_convex_hull(c, hull),
            BoundingVolume::HalfCylinder(hc) => intersect::half_cylinder_vs_convex_hull(hc, hull),
            BoundingVolume::Capsule(c) => intersect::capsule_vs_convex_hull(c, hull),
            BoundingVolume::Hull(h) => intersect::hull_vs_convex_hull(h, hull),
            // A plane-only `ConvexHull` carries no vertex list to test
            // against another plane-only hull; §4.1's conservative-true
            // rule for an indeterminate test applies (false positives are
            // acceptable for this broad-phase, false negatives are not).
            BoundingVolume::ConvexHull(_) => true,
            BoundingVolume::ConvexHullFull(c) => intersect::convex_hull_full_vs_convex_hull(c, hull),
            BoundingVolume::Pyramid(p) => intersect::pyramid_vs_convex_hull(p, hull),
            BoundingVolume::PyramidCone(c) => intersect::pyramid_cone_vs_convex_hull(c, hull),
            BoundingVolume::SphericalSector(s) => intersect::spherical_sector_vs_convex_hull(s, hull),
        }
    }
}

fn centroid(points: &[sourcerenderer_core::Point3]) -> sourcerenderer_core::Point3 {
    points.iter().fold(sourcerenderer_core::Point3::ZERO, |a, b| a + *b) / points.len() as f32
}

fn bounding_sphere_of_points(points: &[sourcerenderer_core::Point3]) -> Sphere {
    let center = centroid(points);
    let radius = points
        .iter()
        .map(|p| (*p - center).length())
        .fold(0.0f32, f32::max);
    Sphere::new(center, radius)
}
