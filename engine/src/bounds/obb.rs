use sourcerenderer_core::math::plane_from_normal_and_point;
use sourcerenderer_core::{Plane, Point3, Vec3};

bitflags::bitflags! {
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct BoxFlags: u32 {
        /// Use the `PCA[0]`-axis line-segment clip test instead of the
        /// classical radius projection in `intersects(box, convex_hull)` (§4.1).
        const PREFER_BOX_LINE_SEGMENT = 0b1;
        /// Set by the octree builder (§3 invariants) when a static,
        /// AABB-preferring object's rotation preserves axis alignment.
        const IS_AXIS_ALIGNED = 0b10;
    }
}

/// One oriented principal-component axis: `vector` spans the box's full
/// extent along that axis (not half-extent), `scale_factor` is `1/|vector|`
/// precomputed for fast normalisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PcaAxis {
    pub vector: Vec3,
    pub scale_factor: f32,
}

impl PcaAxis {
    pub fn from_vector(vector: Vec3) -> Self {
        let len = vector.length();
        let scale_factor = if len > 1e-12 { 1.0 / len } else { 0.0 };
        Self { vector, scale_factor }
    }

    pub fn size_is_zero(&self) -> bool {
        self.vector.length_squared() < 1e-12
    }

    pub fn normal(&self) -> Vec3 {
        self.vector * self.scale_factor
    }
}

/// An oriented bounding box, §3 `Box`. A "flat box" has `pca[2]` of zero
/// size and uses `t_normal` in place of `pca[2].normal()` for its two
/// T-axis planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub center: Point3,
    pub pca: [PcaAxis; 3],
    pub t_normal: Vec3,
    pub plane: [Plane; 6],
    pub flags: BoxFlags,
}

impl OrientedBox {
    /// Builds a box from its center and three PCA axis vectors (full
    /// extent, not half-extent) and computes its six inward planes.
    pub fn new(center: Point3, pca: [PcaAxis; 3], t_normal: Vec3, flags: BoxFlags) -> Self {
        let mut b = Self {
            center,
            pca,
            t_normal,
            plane: [Plane::ZERO; 6],
            flags,
        };
        b.calculate_planes();
        b
    }

    pub fn from_aabb(aabb: &super::Aabb) -> Self {
        let extents = aabb.dim_max - aabb.dim_min;
        Self::new(
            aabb.center(),
            [
                PcaAxis::from_vector(Vec3::new(extents.x, 0.0, 0.0)),
                PcaAxis::from_vector(Vec3::new(0.0, extents.y, 0.0)),
                PcaAxis::from_vector(Vec3::new(0.0, 0.0, extents.z)),
            ],
            Vec3::Z,
            BoxFlags::IS_AXIS_ALIGNED,
        )
    }

    pub fn is_flat(&self) -> bool {
        self.pca[2].size_is_zero()
    }

    /// Invariant §3: plane normals point inward, `dot(plane[i], center) > 0`.
    fn calculate_planes(&mut self) {
        let normal0 = self.pca[0].normal();
        self.plane[0] = plane_from_normal_and_point(-normal0, self.center + 0.5 * self.pca[0].vector);
        self.plane[1] = plane_from_normal_and_point(normal0, self.center - 0.5 * self.pca[0].vector);

        let normal1 = self.pca[1].normal();
        self.plane[2] = plane_from_normal_and_point(-normal1, self.center + 0.5 * self.pca[1].vector);
        self.plane[3] = plane_from_normal_and_point(normal1, self.center - 0.5 * self.pca[1].vector);

        let normal2 = if self.is_flat() { self.t_normal } else { self.pca[2].normal() };
        self.plane[4] = plane_from_normal_and_point(-normal2, self.center + 0.5 * self.pca[2].vector);
        self.plane[5] = plane_from_normal_and_point(normal2, self.center - 0.5 * self.pca[2].vector);
    }

    fn corner(&self, u: f32, v: f32, w: f32) -> Point3 {
        self.center + u * self.pca[0].vector + v * self.pca[1].vector + w * self.pca[2].vector
    }

    /// Returns the box's 8 (or 4, for a flat box) corner vertices in the
    /// fixed winding order `BOX_PLANE_VERTICES` indexes into.
    pub fn construct_vertices(&self) -> smallvec::SmallVec<[Point3; 8]> {
        let mut v = smallvec::SmallVec::new();
        v.push(self.corner(0.5, 0.5, 0.5));
        v.push(self.corner(-0.5, 0.5, 0.5));
        v.push(self.corner(-0.5, -0.5, 0.5));
        v.push(self.corner(0.5, -0.5, 0.5));
        if self.is_flat() {
            return v;
        }
        v.push(self.corner(0.5, 0.5, -0.5));
        v.push(self.corner(-0.5, 0.5, -0.5));
        v.push(self.corner(-0.5, -0.5, -0.5));
        v.push(self.corner(0.5, -0.5, -0.5));
        v
    }

    pub fn to_aabb(&self) -> super::Aabb {
        let corners = self.construct_vertices();
        let mut min = corners[0];
        let mut max = corners[0];
        for c in &corners[1..] {
            min = min.min(*c);
            max = max.max(*c);
        }
        super::Aabb::new(min, max)
    }

    pub fn bounding_sphere(&self) -> super::Sphere {
        let radius = 0.5 * (self.pca[0].vector + self.pca[1].vector + self.pca[2].vector).length();
        super::Sphere::new(self.center, radius)
    }
}

/// §3a: for each of the 6 box planes, the 4 (of 8) corner-vertex indices
/// that lie on it, in the `construct_vertices()` winding order.
pub const BOX_PLANE_VERTICES: [[usize; 4]; 6] = [
    [0, 3, 4, 7], // R positive
    [1, 2, 5, 6], // R negative
    [0, 1, 4, 5], // S positive
    [3, 2, 7, 6], // S negative
    [0, 1, 3, 2], // T positive
    [4, 5, 7, 6], // T negative
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planes_point_inward() {
        let aabb = super::super::Aabb::new(Point3::new(-1.0, -2.0, -3.0), Point3::new(1.0, 2.0, 3.0));
        let b = OrientedBox::from_aabb(&aabb);
        for plane in &b.plane {
            assert!(
                sourcerenderer_core::math::plane_dot(*plane, b.center) > 0.0,
                "plane {:?} does not point inward for center {:?}",
                plane,
                b.center
            );
        }
    }

    #[test]
    fn flat_box_has_four_vertices() {
        let b = OrientedBox::new(
            Point3::ZERO,
            [
                PcaAxis::from_vector(Vec3::new(2.0, 0.0, 0.0)),
                PcaAxis::from_vector(Vec3::new(0.0, 2.0, 0.0)),
                PcaAxis::from_vector(Vec3::ZERO),
            ],
            Vec3::Z,
            BoxFlags::empty(),
        );
        assert!(b.is_flat());
        assert_eq!(b.construct_vertices().len(), 4);
    }
}
