//! The frustum, near-clip volume, shadow-caster volume, and scissor
//! derivations (§4.3).

mod frustum;
mod near_clip;
mod scissor;
mod shadow_caster;

pub use frustum::{Frustum, ViewMatrices};
pub use near_clip::{near_clip_volume, LightPositionType};
pub use scissor::{
    geometry_scissor, light_scissor, Scissor, ScissorBounds, ScissorState,
};
pub use shadow_caster::shadow_caster_volume;
