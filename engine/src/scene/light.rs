use sourcerenderer_core::{Vec3, Vec4};

use crate::bounds::{Cylinder, Sphere, SphericalSector};
use crate::octree::EntityId;

bitflags::bitflags! {
    /// §3 `Light` flags.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct LightFlags: u32 {
        const DYNAMIC_POSITION = 0b0000_0001;
        const DYNAMIC_DIRECTION = 0b0000_0010;
        const DYNAMIC_LIGHT_VOLUME = 0b0000_0100;
        const WORST_CASE_BOUNDS_SPHERE = 0b0000_1000;
        const DYNAMIC_SPOT_EXPONENT = 0b0001_0000;
        const DYNAMIC_SHADOW_VOLUME = 0b0010_0000;
    }
}

/// §3 `Light` variants, with the per-variant secondary BV the shadow and
/// scissor modules consume (`cylinder` for beams, `spherical_sector` for
/// spots).
#[derive(Debug, Clone)]
pub enum LightKind {
    Directional,
    PointSource,
    Spot { spherical_sector: SphericalSector },
    Beam { cylinder: Cylinder },
}

/// §3 `Light`: `vector` is homogeneous (`w = 1` means a position, `w = 0`
/// a direction), `sphere` is the primary BV used for frustum culling.
#[derive(Debug, Clone)]
pub struct Light {
    pub kind: LightKind,
    pub vector: Vec4,
    pub color: Vec3,
    pub attenuation: Vec3,
    pub sphere: Sphere,
    pub flags: LightFlags,
    /// Populated by static-light preprocessing: the ids of the static
    /// objects this light illuminates.
    pub static_object_list: Vec<EntityId>,
}

impl Light {
    pub fn directional(direction: Vec3, color: Vec3) -> Self {
        Self {
            kind: LightKind::Directional,
            vector: Vec4::new(direction.x, direction.y, direction.z, 0.0),
            color,
            attenuation: Vec3::ZERO,
            sphere: Sphere::new(sourcerenderer_core::Point3::ZERO, f32::MAX),
            flags: LightFlags::empty(),
            static_object_list: Vec::new(),
        }
    }

    pub fn point(position: sourcerenderer_core::Point3, radius: f32, color: Vec3, attenuation: Vec3) -> Self {
        Self {
            kind: LightKind::PointSource,
            vector: Vec4::new(position.x, position.y, position.z, 1.0),
            color,
            attenuation,
            sphere: Sphere::new(position, radius),
            flags: LightFlags::empty(),
            static_object_list: Vec::new(),
        }
    }

    pub fn beam(position: sourcerenderer_core::Point3, axis: Vec3, length: f32, radius: f32, color: Vec3) -> Self {
        let axis = axis.normalize();
        let cylinder = Cylinder::new(position + 0.5 * length * axis, axis, length, radius);
        Self {
            kind: LightKind::Beam { cylinder },
            vector: Vec4::new(position.x, position.y, position.z, 1.0),
            color,
            attenuation: Vec3::ZERO,
            sphere: cylinder.bounding_sphere(),
            flags: LightFlags::empty(),
            static_object_list: Vec::new(),
        }
    }

    pub fn is_directional(&self) -> bool {
        matches!(self.kind, LightKind::Directional)
    }

    pub fn position(&self) -> sourcerenderer_core::Point3 {
        if self.vector.w.abs() > 1e-6 {
            self.vector.truncate() / self.vector.w
        } else {
            self.vector.truncate()
        }
    }
}
