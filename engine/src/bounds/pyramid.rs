use sourcerenderer_core::math::plane_from_normal_and_point;
use sourcerenderer_core::{Plane, Point3, Vec3};

/// A semi-infinite pyramid: apex `apex`, dynamic-size base ring `base`
/// (§3 `Pyramid{ vertex[0]=apex, vertex[1..n-1]=base, base_normal }`), the
/// shadow-volume shape for box-shaped shadow casters under point/spot
/// lights before it is tightened into a `PyramidCone`.
#[derive(Debug, Clone, PartialEq)]
pub struct Pyramid {
    pub apex: Point3,
    pub base: smallvec::SmallVec<[Point3; 8]>,
    pub base_normal: Vec3,
    /// Inward-pointing side planes, one per base edge.
    pub planes: smallvec::SmallVec<[Plane; 8]>,
}

impl Pyramid {
    /// Builds the side planes through `apex` and each edge of the
    /// (ordered, coplanar) base ring `base`.
    pub fn from_apex_and_base(apex: Point3, base: smallvec::SmallVec<[Point3; 8]>, base_normal: Vec3) -> Self {
        let n = base.len();
        let mut planes = smallvec::SmallVec::new();
        for i in 0..n {
            let a = base[i];
            let b = base[(i + 1) % n];
            let normal = (a - apex).cross(b - apex).normalize_or_zero();
            planes.push(plane_from_normal_and_point(normal, apex));
        }
        Self { apex, base, base_normal, planes }
    }

    pub fn contains_point(&self, point: Point3) -> bool {
        self.planes
            .iter()
            .all(|p| sourcerenderer_core::math::plane_dot(*p, point) > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apex_side_is_shared_by_all_planes() {
        let mut quad = smallvec::SmallVec::new();
        quad.push(Point3::new(-1.0, -1.0, 5.0));
        quad.push(Point3::new(1.0, -1.0, 5.0));
        quad.push(Point3::new(1.0, 1.0, 5.0));
        quad.push(Point3::new(-1.0, 1.0, 5.0));
        let p = Pyramid::from_apex_and_base(Point3::ZERO, quad, Vec3::Z);
        assert!(p.contains_point(Point3::new(0.0, 0.0, 5.0)));
    }
}
