#![allow(dead_code)]

//! The spatial culling and shadow-geometry subsystem: bounding volumes,
//! the octree spatial index, the frustum/scissor module, the
//! shadow-volume constructor, and the scene/entity model that ties them
//! together into a per-frame culling driver (§1-§5).

pub mod bounds;
pub mod frustum;
pub mod octree;
pub mod scene;
pub mod shadow;
pub mod view;
