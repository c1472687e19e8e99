use sourcerenderer_core::{Plane, Point3};

/// A convex polytope defined purely by its separating planes (§3
/// `ConvexHull`), e.g. a view frustum: no vertex list, so intersection
/// tests against it work only with the plane set.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHull {
    pub planes: smallvec::SmallVec<[Plane; 6]>,
}

impl ConvexHull {
    pub fn new(planes: smallvec::SmallVec<[Plane; 6]>) -> Self {
        Self { planes }
    }

    pub fn contains_point(&self, point: Point3) -> bool {
        self.planes
            .iter()
            .all(|p| sourcerenderer_core::math::plane_dot(*p, point) > 0.0)
    }
}

/// §3 `ConvexHullFull`: a `ConvexHull` that also carries its own vertices
/// and, per plane, the radius of the largest sphere centered on that
/// plane's vertex set that still fits inside the plane (`plane_radius`),
/// plus the hull's overall `min_radius`/`max_radius` about its centroid —
/// used by the Sphere/Ellipsoid-vs-ConvexHullFull fast paths (§4.1).
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHullFull {
    pub hull: ConvexHull,
    pub vertices: smallvec::SmallVec<[Point3; 8]>,
    pub center: Point3,
    /// §3 invariant: `plane_radius[i] = |dot(plane[i], center)|`,
    /// `min_radius <= plane_radius[i] <= max_radius`.
    pub plane_radius: smallvec::SmallVec<[f32; 6]>,
    pub min_radius: f32,
    pub max_radius: f32,
}

impl ConvexHullFull {
    pub fn from_vertices_and_planes(
        vertices: smallvec::SmallVec<[Point3; 8]>,
        planes: smallvec::SmallVec<[Plane; 6]>,
    ) -> Self {
        let center = vertices.iter().fold(Point3::ZERO, |a, b| a + *b) / vertices.len() as f32;
        let mut min_radius = f32::MAX;
        let mut max_radius = 0.0f32;
        for v in &vertices {
            let d = (*v - center).length();
            min_radius = min_radius.min(d);
            max_radius = max_radius.max(d);
        }
        let plane_radius: smallvec::SmallVec<[f32; 6]> = planes
            .iter()
            .map(|p| sourcerenderer_core::math::plane_dot(*p, center).abs())
            .collect();
        for r in &plane_radius {
            min_radius = min_radius.min(*r);
            max_radius = max_radius.max(*r);
        }
        Self {
            hull: ConvexHull::new(planes),
            vertices,
            center,
            plane_radius,
            min_radius,
            max_radius,
        }
    }

    pub fn contains_point(&self, point: Point3) -> bool {
        self.hull.contains_point(point)
    }

    pub fn centroid(&self) -> Point3 {
        self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_cube_contains_its_center() {
        let mut planes = smallvec::SmallVec::new();
        planes.push(sourcerenderer_core::math::plane_from_normal_and_point(
            sourcerenderer_core::Vec3::X,
            Point3::new(-1.0, 0.0, 0.0),
        ));
        planes.push(sourcerenderer_core::math::plane_from_normal_and_point(
            -sourcerenderer_core::Vec3::X,
            Point3::new(1.0, 0.0, 0.0),
        ));
        let hull = ConvexHull::new(planes);
        assert!(hull.contains_point(Point3::ZERO));
        assert!(!hull.contains_point(Point3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn plane_radius_is_bounded_by_min_and_max_radius() {
        let mut vertices = smallvec::SmallVec::new();
        for c in super::super::Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0)).corners() {
            vertices.push(c);
        }
        let mut planes = smallvec::SmallVec::new();
        for (normal, point) in [
            (sourcerenderer_core::Vec3::X, Point3::new(1.0, 0.0, 0.0)),
            (-sourcerenderer_core::Vec3::X, Point3::new(-1.0, 0.0, 0.0)),
        ] {
            planes.push(sourcerenderer_core::math::plane_from_normal_and_point(-normal, point));
        }
        let full = ConvexHullFull::from_vertices_and_planes(vertices, planes);
        for r in &full.plane_radius {
            assert!(*r >= full.min_radius - 1e-4 && *r <= full.max_radius + 1e-4);
        }
    }
}
