use crate::bounds::{Aabb, BoundingVolume, OrientedBox, Sphere};

bitflags::bitflags! {
    /// Which local-space BV the culler should prefer when testing an
    /// `Object` instantiated from this `Model` (§3 `Model.bounds_flags`).
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct BoundsFlags: u32 {
        const PREFER_SPHERE = 0b0001;
        const PREFER_AABB = 0b0010;
        const PREFER_SPECIAL = 0b0100;
        const PREFER_BOX_LINE_SEGMENT = 0b1000;
    }
}

/// A geometric template shared by reference across `Object` instances
/// (§3 `Model`): up to 3 LOD mesh slots (opaque to this crate — mesh data
/// is an out-of-scope concern per §1), plus the local-space bounds an
/// `Object` instantiates per-transform.
#[derive(Debug, Clone)]
pub struct Model {
    pub lod_count: u8,
    pub sphere: Sphere,
    pub aabb: Aabb,
    pub oriented_box: OrientedBox,
    pub special: Option<BoundingVolume>,
    pub bounds_flags: BoundsFlags,
    /// Flipped by the first `Scene::add_object` that references this model.
    pub referenced: bool,
}

impl Model {
    pub fn new(sphere: Sphere, aabb: Aabb, oriented_box: OrientedBox, bounds_flags: BoundsFlags) -> Self {
        Self {
            lod_count: 1,
            sphere,
            aabb,
            oriented_box,
            special: None,
            bounds_flags,
            referenced: false,
        }
    }
}
