#![allow(dead_code)]

//! Math primitives, the back-end seam, and input mapping shared by the
//! culling/shadow-geometry engine crate.

pub mod error;
pub mod input;
pub mod job;
pub mod math;
pub mod platform;

pub use math::{Mat3, Mat4, Plane, Point3, Vec2, Vec2I, Vec2UI, Vec3, Vec4};
