use sourcerenderer_core::{Mat3, Mat4, Point3, Vec3};

use crate::bounds::{Aabb, BoundingVolume, OrientedBox, Sphere};
use crate::octree::EntityId;

use super::model::Model;

bitflags::bitflags! {
    /// §3 `Object` lifecycle flags.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct ObjectFlags: u32 {
        const EXISTS = 0b0000_0000_0001;
        const DYNAMIC_POSITION = 0b0000_0000_0010;
        const INFINITE_DISTANCE = 0b0000_0000_0100;
        const NO_PHYSICS = 0b0000_0000_1000;
        const CAST_SHADOWS = 0b0000_0001_0000;
        const HIDDEN = 0b0000_0010_0000;
        const USE_OBJECT_SHADOW_CACHE = 0b0000_0100_0000;
        const PARTICLE_SYSTEM = 0b0000_1000_0000;
        const BILLBOARD = 0b0001_0000_0000;
        const LIGHT_HALO = 0b0010_0000_0000;
    }
}

/// Per-instance material parameters (§3 `Object`); microfacet parameters
/// are optional (`roughness`/`weights` default to a single lobe, `anisotropic`
/// defaults to false) since not every object uses the microfacet model.
#[derive(Debug, Clone, Copy)]
pub struct Material {
    pub diffuse_reflection_color: Vec3,
    pub specular_reflection_color: Vec3,
    pub specular_exponent: f32,
    pub diffuse_fraction: f32,
    pub roughness: [f32; 2],
    pub weights: [f32; 2],
    pub anisotropic: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse_reflection_color: Vec3::new(0.8, 0.8, 0.8),
            specular_reflection_color: Vec3::new(0.2, 0.2, 0.2),
            specular_exponent: 30.0,
            diffuse_fraction: 1.0,
            roughness: [0.5, 0.5],
            weights: [1.0, 0.0],
            anisotropic: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LodSettings {
    pub level: u8,
    pub threshold_scaling: f32,
}

/// A precomputed per-(object, light) shadow volume (§3 `ShadowVolume`).
#[derive(Debug, Clone)]
pub struct ShadowVolumeEntry {
    pub light_id: EntityId,
    pub volume: BoundingVolume,
}

/// §3 `Object`: a scene instance of a `Model` with world transform and
/// per-instance state. World-space `sphere`/`aabb`/`oriented_box` are
/// recomputed whenever `set_transform`/`change_position`/`change_rotation*`
/// runs.
#[derive(Debug, Clone)]
pub struct Object {
    pub model: u32,
    pub position: Point3,
    pub unit_rotation: Mat3,
    pub scaling: f32,
    pub model_matrix: Mat4,
    pub model_matrix_inverse: Mat4,
    pub material: Material,
    pub flags: ObjectFlags,
    pub sphere: Sphere,
    pub aabb: Aabb,
    pub oriented_box: OrientedBox,
    pub lod: LodSettings,
    pub attached_light: Option<(EntityId, Point3)>,
    pub shadow_volumes: Vec<ShadowVolumeEntry>,
    pub most_recent_position_change: u64,
    pub most_recent_transformation_change: u64,
    pub rapid_change_flags: u32,
}

impl Object {
    pub fn new(model_index: u32, model: &Model, position: Point3, rotation: Mat3, scaling: f32) -> Self {
        let mut object = Self {
            model: model_index,
            position,
            unit_rotation: rotation,
            scaling,
            model_matrix: Mat4::IDENTITY,
            model_matrix_inverse: Mat4::IDENTITY,
            material: Material::default(),
            flags: ObjectFlags::EXISTS | ObjectFlags::CAST_SHADOWS,
            sphere: model.sphere,
            aabb: model.aabb,
            oriented_box: model.oriented_box,
            lod: LodSettings { level: 0, threshold_scaling: 1.0 },
            attached_light: None,
            shadow_volumes: Vec::new(),
            most_recent_position_change: 0,
            most_recent_transformation_change: 0,
            rapid_change_flags: 0,
        };
        object.recompute_transform(model);
        object
    }

    /// `model_matrix = T * S * R` (§3 `Object`), then recomputes the
    /// world-space bounds from the model's local-space bounds.
    fn recompute_transform(&mut self, model: &Model) {
        self.model_matrix =
            Mat4::from_translation(self.position) * Mat4::from_scale(Vec3::splat(self.scaling)) * Mat4::from_mat3(self.unit_rotation);
        self.model_matrix_inverse = self.model_matrix.inverse();

        let world_center = self.model_matrix.transform_point3(model.sphere.center);
        self.sphere = Sphere::new(world_center, model.sphere.radius * self.scaling);

        let corners = model.aabb.corners();
        let mut min = self.model_matrix.transform_point3(corners[0]);
        let mut max = min;
        for c in &corners[1..] {
            let w = self.model_matrix.transform_point3(*c);
            min = min.min(w);
            max = max.max(w);
        }
        self.aabb = Aabb::new(min, max);
        self.oriented_box = OrientedBox::from_aabb(&self.aabb);
    }

    pub fn change_position(&mut self, model: &Model, position: Point3, frame: u64) {
        self.position = position;
        self.recompute_transform(model);
        self.most_recent_position_change = frame;
        self.most_recent_transformation_change = frame;
    }

    pub fn change_rotation_matrix(&mut self, model: &Model, rotation: Mat3, frame: u64) {
        self.unit_rotation = rotation;
        self.recompute_transform(model);
        self.most_recent_transformation_change = frame;
    }

    /// §7: a non-finite transform is not fatal — the object is hidden and
    /// the caller should log a warning, matching "logged, object hidden".
    pub fn has_degenerate_transform(&self) -> bool {
        !self.model_matrix.is_finite() || !self.sphere.center.is_finite() || !self.sphere.radius.is_finite()
    }

    pub fn hide(&mut self) {
        self.flags.insert(ObjectFlags::HIDDEN);
    }

    pub fn preferred_bounding_volume(&self, model: &Model) -> BoundingVolume {
        use super::model::BoundsFlags;
        if model.bounds_flags.contains(BoundsFlags::PREFER_SPECIAL) {
            if let Some(special) = &model.special {
                return special.clone();
            }
        }
        if model.bounds_flags.contains(BoundsFlags::PREFER_AABB) {
            BoundingVolume::Aabb(self.aabb)
        } else {
            BoundingVolume::Sphere(self.sphere)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::model::{BoundsFlags, Model};
    use super::*;

    fn unit_model() -> Model {
        Model::new(
            Sphere::new(Point3::ZERO, 1.0),
            Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0)),
            OrientedBox::from_aabb(&Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0))),
            BoundsFlags::PREFER_SPHERE,
        )
    }

    #[test]
    fn moving_an_object_recenters_its_world_sphere() {
        let model = unit_model();
        let mut object = Object::new(0, &model, Point3::ZERO, Mat3::IDENTITY, 1.0);
        object.change_position(&model, Point3::new(5.0, 0.0, 0.0), 3);
        assert!((object.sphere.center - Point3::new(5.0, 0.0, 0.0)).length() < 1e-5);
        assert_eq!(object.most_recent_position_change, 3);
    }

    #[test]
    fn scaling_scales_the_world_sphere_radius() {
        let model = unit_model();
        let object = Object::new(0, &model, Point3::ZERO, Mat3::IDENTITY, 2.0);
        assert!((object.sphere.radius - 2.0).abs() < 1e-5);
    }
}
