//! The scene & entity model (§3, §4.5): object/light lifecycle, the four
//! spatial-index roots, and the per-frame culling driver that produces
//! the visible-object/visible-light/shadow-caster lists.

pub mod light;
pub mod model;
pub mod object;

use log::warn;

use crate::bounds::{BoundingVolume, BoundsCheckResult};
use crate::frustum::Frustum;
use crate::octree::builder::{build_tree, root_aabb_for, to_fast_octree};
use crate::octree::{entity_index, entity_is_light, light_entity_id, object_entity_id, FastOctree, OctreeEntity, SubdivisionMode};
use crate::shadow;

pub use light::{Light, LightFlags, LightKind};
pub use model::{BoundsFlags, Model};
pub use object::{Material, Object, ObjectFlags};

/// §4.5: scratch arrays grow on demand and never shrink within a frame.
#[derive(Debug, Default)]
struct ScratchArrays {
    visible_object: Vec<u32>,
    visible_light: Vec<u32>,
    shadow_caster_object: Vec<u32>,
    final_pass_object: Vec<u32>,
}

impl ScratchArrays {
    fn clear(&mut self) {
        self.visible_object.clear();
        self.visible_light.clear();
        self.shadow_caster_object.clear();
        self.final_pass_object.clear();
    }
}

/// §3 `Scene`: owns object/light storage with a deleted-id free list, the
/// four `FastOctree` roots, and per-frame scratch arrays.
pub struct Scene {
    pub models: Vec<Model>,
    objects: Vec<Option<Object>>,
    object_free_list: Vec<u32>,
    lights: Vec<Option<Light>>,
    light_free_list: Vec<u32>,
    pub ambient_color: sourcerenderer_core::Vec3,

    fast_octree_static: FastOctree,
    fast_octree_dynamic: FastOctree,
    fast_octree_static_infinite: FastOctree,
    fast_octree_dynamic_infinite: FastOctree,

    scratch: ScratchArrays,
    frame_number: u64,
    dirty: bool,
}

impl Scene {
    pub fn new() -> Self {
        let empty = FastOctree::empty(crate::bounds::Aabb::new(sourcerenderer_core::Point3::ZERO, sourcerenderer_core::Point3::ZERO));
        Self {
            models: Vec::new(),
            objects: Vec::new(),
            object_free_list: Vec::new(),
            lights: Vec::new(),
            light_free_list: Vec::new(),
            ambient_color: sourcerenderer_core::Vec3::new(0.05, 0.05, 0.05),
            fast_octree_static: empty.clone(),
            fast_octree_dynamic: empty.clone(),
            fast_octree_static_infinite: empty.clone(),
            fast_octree_dynamic_infinite: empty,
            scratch: ScratchArrays::default(),
            frame_number: 0,
            dirty: true,
        }
    }

    pub fn add_model(&mut self, model: Model) -> u32 {
        self.models.push(model);
        (self.models.len() - 1) as u32
    }

    /// §3 "Objects are created via `add_object`"; reuses a deleted id
    /// before growing the array.
    pub fn add_object(&mut self, model_index: u32, position: sourcerenderer_core::Point3, rotation: sourcerenderer_core::Mat3, scaling: f32) -> u32 {
        self.models[model_index as usize].referenced = true;
        let object = Object::new(model_index, &self.models[model_index as usize], position, rotation, scaling);
        self.dirty = true;
        if let Some(id) = self.object_free_list.pop() {
            self.objects[id as usize] = Some(object);
            id
        } else {
            self.objects.push(Some(object));
            (self.objects.len() - 1) as u32
        }
    }

    /// Idempotent: deleting a nonexistent id is a no-op (§7).
    pub fn delete_object(&mut self, id: u32) {
        if let Some(slot) = self.objects.get_mut(id as usize) {
            if slot.take().is_some() {
                self.object_free_list.push(id);
                self.dirty = true;
            }
        }
    }

    pub fn object(&self, id: u32) -> Option<&Object> {
        self.objects.get(id as usize).and_then(|o| o.as_ref())
    }

    pub fn change_position(&mut self, id: u32, position: sourcerenderer_core::Point3) {
        let frame = self.frame_number;
        let model_index = match self.objects.get(id as usize).and_then(|o| o.as_ref()) {
            Some(o) => o.model,
            None => return,
        };
        let model = self.models[model_index as usize].clone_shallow();
        if let Some(Some(object)) = self.objects.get_mut(id as usize) {
            object.change_position(&model, position, frame);
            if object.has_degenerate_transform() {
                warn!("object {id} has a degenerate transform after change_position; hiding it");
                object.hide();
            }
        }
        self.dirty = true;
    }

    pub fn add_light(&mut self, light: Light) -> u32 {
        self.dirty = true;
        if let Some(id) = self.light_free_list.pop() {
            self.lights[id as usize] = Some(light);
            id
        } else {
            self.lights.push(Some(light));
            (self.lights.len() - 1) as u32
        }
    }

    pub fn delete_light(&mut self, id: u32) {
        if let Some(slot) = self.lights.get_mut(id as usize) {
            if slot.take().is_some() {
                self.light_free_list.push(id);
                self.dirty = true;
            }
        }
    }

    pub fn light(&self, id: u32) -> Option<&Light> {
        self.lights.get(id as usize).and_then(|l| l.as_ref())
    }

    /// §3 "Octrees are (re)built by `create_octrees()`": rebuilds all four
    /// roots from the current object/light arrays. Static vs. dynamic is
    /// determined by `ObjectFlags::DYNAMIC_POSITION`/`LightFlags::DYNAMIC_POSITION`;
    /// infinite-distance entities (directional lights, sky objects) get
    /// their own pair of roots so their unbounded `AABB` never forces
    /// every other root to cover all of space.
    pub fn create_octrees(&mut self) {
        let mut static_entities = Vec::new();
        let mut dynamic_entities = Vec::new();
        let mut static_infinite = Vec::new();
        let mut dynamic_infinite = Vec::new();

        for (i, slot) in self.objects.iter().enumerate() {
            let Some(object) = slot else { continue };
            if !object.flags.contains(ObjectFlags::EXISTS) {
                continue;
            }
            let entity = OctreeEntity { id: object_entity_id(i as u32), aabb: object.aabb };
            let infinite = object.flags.contains(ObjectFlags::INFINITE_DISTANCE);
            let dynamic = object.flags.contains(ObjectFlags::DYNAMIC_POSITION);
            match (infinite, dynamic) {
                (true, true) => dynamic_infinite.push(entity),
                (true, false) => static_infinite.push(entity),
                (false, true) => dynamic_entities.push(entity),
                (false, false) => static_entities.push(entity),
            }
        }
        for (i, slot) in self.lights.iter().enumerate() {
            let Some(light) = slot else { continue };
            let radius = light.sphere.radius;
            let center = light.sphere.center;
            let aabb = crate::bounds::Aabb::new(
                center - sourcerenderer_core::Vec3::splat(radius),
                center + sourcerenderer_core::Vec3::splat(radius),
            );
            let entity = OctreeEntity { id: light_entity_id(i as u32), aabb };
            let infinite = light.is_directional();
            let dynamic = light.flags.contains(LightFlags::DYNAMIC_POSITION);
            match (infinite, dynamic) {
                (true, true) => dynamic_infinite.push(entity),
                (true, false) => static_infinite.push(entity),
                (false, true) => dynamic_entities.push(entity),
                (false, false) => static_entities.push(entity),
            }
        }

        self.fast_octree_static = build_octree(&static_entities);
        self.fast_octree_dynamic = build_octree(&dynamic_entities);
        self.fast_octree_static_infinite = build_octree(&static_infinite);
        self.fast_octree_dynamic_infinite = build_octree(&dynamic_infinite);
        self.dirty = false;
    }

    /// §4.5: runs the static-light preprocessing pass, attaching a
    /// precomputed `ShadowVolume` per (static object, static light) pair
    /// to `object.shadow_volumes` and recording the object in the light's
    /// `static_object_list`.
    pub fn prepare_for_rendering(&mut self) {
        if self.dirty {
            self.create_octrees();
        }

        let light_ids: Vec<u32> = self
            .lights
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.as_ref().map(|_| i as u32))
            .collect();

        for light_id in light_ids {
            let light = self.lights[light_id as usize].clone().unwrap();
            if light.flags.contains(LightFlags::DYNAMIC_POSITION) {
                continue;
            }
            let mut affected = Vec::new();
            for (object_id, slot) in self.objects.iter_mut().enumerate() {
                let Some(object) = slot else { continue };
                if object.flags.contains(ObjectFlags::DYNAMIC_POSITION) {
                    continue;
                }
                let volume = shadow_volume_for(object, &light);
                if !matches!(volume, BoundingVolume::Empty) {
                    object.shadow_volumes.push(object::ShadowVolumeEntry { light_id, volume });
                    affected.push(object_id as u32);
                }
            }
            if let Some(light) = self.lights[light_id as usize].as_mut() {
                light.static_object_list = affected;
            }
        }
    }

    /// §4.5 per-frame culling driver: computes visible objects/lights by
    /// traversing the static and dynamic octrees against the frustum, then
    /// computes shadow-caster data for each visible light.
    pub fn cull(&mut self, view: &crate::frustum::ViewMatrices) -> CullResult {
        self.frame_number += 1;
        self.scratch.clear();

        let frustum = Frustum::from_view(view);

        let trees = [&self.fast_octree_static, &self.fast_octree_dynamic];
        let mut visible_object = std::mem::take(&mut self.scratch.visible_object);
        let mut visible_light = std::mem::take(&mut self.scratch.visible_light);
        for tree in trees {
            traverse_octree(tree, &frustum, &mut visible_object, &mut visible_light, |id| {
                self.preferred_bv_for(id)
            });
        }
        self.scratch.visible_object = visible_object;
        self.scratch.visible_light = visible_light;
        // Infinite-distance entities bypass spatial culling entirely:
        // they're visible from everywhere the frustum reaches, so their
        // tiny roots are walked unconditionally rather than bounds-tested.
        for tree in [&self.fast_octree_static_infinite, &self.fast_octree_dynamic_infinite] {
            tree.for_each_node(|node, _| {
                for &raw in node.entities {
                    if entity_is_light(raw) {
                        self.scratch.visible_light.push(entity_index(raw));
                    } else {
                        self.scratch.visible_object.push(entity_index(raw));
                    }
                }
            });
        }

        for &light_id in &self.scratch.visible_light.clone() {
            let Some(light) = self.lights[light_id as usize].clone() else { continue };
            let light_position = light.vector;
            let is_point = !light.is_directional();
            let (_near_clip, _kind) = crate::frustum::near_clip_volume(&frustum, light_position, is_point);
            let shadow_caster_hull = crate::frustum::shadow_caster_volume(&frustum, light_position, is_point);

            for &raw_id in &self.scratch.visible_object.clone() {
                let Some(object) = self.objects.get(raw_id as usize).and_then(|o| o.as_ref()) else { continue };
                if !object.flags.contains(ObjectFlags::CAST_SHADOWS) {
                    continue;
                }
                if !BoundingVolume::Sphere(object.sphere).intersects_convex_hull(&shadow_caster_hull) {
                    continue;
                }
                let volume = object
                    .shadow_volumes
                    .iter()
                    .find(|sv| sv.light_id == light_id)
                    .map(|sv| sv.volume.clone())
                    .unwrap_or_else(|| shadow_volume_for(object, &light));
                if !matches!(volume, BoundingVolume::Empty) && volume.intersects_convex_hull(&frustum.hull) {
                    self.scratch.shadow_caster_object.push(raw_id);
                }
            }
        }

        CullResult {
            visible_object: self.scratch.visible_object.clone(),
            visible_light: self.scratch.visible_light.clone(),
            shadow_caster_object: self.scratch.shadow_caster_object.clone(),
        }
    }

    fn preferred_bv_for(&self, raw_id: u32) -> BoundingVolume {
        if entity_is_light(raw_id) {
            let id = entity_index(raw_id);
            match self.lights[id as usize].as_ref() {
                Some(light) => BoundingVolume::Sphere(light.sphere),
                None => BoundingVolume::Empty,
            }
        } else {
            let id = entity_index(raw_id);
            match self.objects[id as usize].as_ref() {
                Some(object) => {
                    if object.flags.contains(ObjectFlags::HIDDEN) {
                        BoundingVolume::Empty
                    } else {
                        object.preferred_bounding_volume(&self.models[object.model as usize])
                    }
                }
                None => BoundingVolume::Empty,
            }
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// The three visibility lists a frame's culling pass produces (§4.5).
/// Entity ids here are raw octree ids (light bit still set); callers use
/// `octree::entity_is_light`/`entity_index` to decode them.
#[derive(Debug, Clone, Default)]
pub struct CullResult {
    pub visible_object: Vec<u32>,
    pub visible_light: Vec<u32>,
    pub shadow_caster_object: Vec<u32>,
}

fn build_octree(entities: &[OctreeEntity]) -> FastOctree {
    if entities.is_empty() {
        return FastOctree::empty(crate::bounds::Aabb::new(sourcerenderer_core::Point3::ZERO, sourcerenderer_core::Point3::ZERO));
    }
    let mode = SubdivisionMode::MixedWithQuadtree;
    let root_aabb = root_aabb_for(entities, mode);
    let root = build_tree(entities, mode);
    let _ = root_aabb;
    to_fast_octree(&root)
}

/// §4.5 step 2: depth-first traversal dispatching on `BoundsCheckResult`.
fn traverse_octree<F: Fn(u32) -> BoundingVolume>(
    tree: &FastOctree,
    frustum: &Frustum,
    visible_object: &mut Vec<u32>,
    visible_light: &mut Vec<u32>,
    preferred_bv: F,
) {
    traverse_node(tree, 0, frustum, visible_object, visible_light, &preferred_bv, false);
}

fn traverse_node<F: Fn(u32) -> BoundingVolume>(
    tree: &FastOctree,
    offset: usize,
    frustum: &Frustum,
    visible_object: &mut Vec<u32>,
    visible_light: &mut Vec<u32>,
    preferred_bv: &F,
    force_include: bool,
) {
    let view = tree.decode(offset);
    let bounds = tree.bounds(view.node_index);

    let include_all = if force_include {
        true
    } else {
        match crate::bounds::intersect::query_sphere_vs_convex_hull(&bounds.sphere, &frustum.hull) {
            BoundsCheckResult::Outside => return,
            BoundsCheckResult::CompletelyInside | BoundsCheckResult::CompletelyEncloses => true,
            BoundsCheckResult::PartiallyInside => {
                if !BoundingVolume::Aabb(bounds.aabb).intersects_convex_hull(&frustum.hull) {
                    return;
                }
                false
            }
        }
    };

    for &raw in view.entities {
        if include_all || preferred_bv(raw).intersects_convex_hull(&frustum.hull) {
            if entity_is_light(raw) {
                visible_light.push(entity_index(raw));
            } else {
                visible_object.push(entity_index(raw));
            }
        }
    }

    for &child in view.children {
        traverse_node(tree, child as usize, frustum, visible_object, visible_light, preferred_bv, include_all);
    }
}

fn shadow_volume_for(object: &Object, light: &Light) -> BoundingVolume {
    match &light.kind {
        LightKind::Directional => {
            let direction = light.vector.truncate();
            shadow::directional_shadow_volume(object.sphere, direction)
        }
        LightKind::Beam { cylinder } => shadow::beam_shadow_volume(
            object.sphere,
            cylinder.center - 0.5 * cylinder.length * cylinder.axis,
            cylinder.axis,
            cylinder.length,
            cylinder.radius,
        ),
        LightKind::PointSource | LightKind::Spot { .. } => {
            shadow::point_or_spot_shadow_volume(&object.oriented_box, light.position(), light.sphere.radius)
        }
    }
}

impl Model {
    /// A shallow copy sufficient for passing as a by-value template into
    /// `Object::change_position`'s transform recompute without holding a
    /// borrow of `self.models` across the mutable borrow of `self.objects`.
    fn clone_shallow(&self) -> Model {
        self.clone()
    }
}
