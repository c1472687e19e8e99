//! The back-end seam (§6, §9 "Back-end polymorphism"). The GPU back-end,
//! window/context creation, shader system, and physics driver are external
//! collaborators; this module only states the thin contract the culling
//! core consumes from and hands results to them.

use crate::error::EngineError;
use crate::input::InputState;
use crate::math::Vec2I;

bitflags::bitflags! {
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    pub struct InitFlags: u32 {
        const STENCIL    = 0b1;
        const MULTISAMPLE = 0b10;
    }
}

/// `stop_signal` values polled by the main loop between frames (§5, §6).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(i32)]
pub enum StopSignal {
    Continue = 0,
    Quit = 1,
    CustomStop = 2,
}

/// Capability interface implemented by the target ecosystem's windowing
/// and GL binding. No implementation lives in this crate: rasterisation,
/// context creation and buffer uploads are explicitly out of scope (§1).
pub trait Backend {
    /// Creates the window and graphics context, returning the actual
    /// (possibly clamped) framebuffer size.
    fn initialize(&mut self, req_width: u32, req_height: u32, flags: InitFlags)
        -> Result<(u32, u32), EngineError>;
    fn swap_buffers(&mut self);
    /// Fences and presents; used for mode toggles that must not tear.
    fn sync(&mut self);
    /// Monotonic seconds, used for frame timing.
    fn current_time(&self) -> f64;
    /// Drains queued keyboard/mouse/button events into `input`.
    fn process_input_events(&mut self, input: &mut InputState);
    fn toggle_fullscreen(&mut self);
    fn hide_cursor(&mut self, hidden: bool);
    fn warp_cursor(&mut self, position: Vec2I);
}

/// Re-exported so callers wiring up a `Backend` impl only need one import
/// for the whole input surface.
pub use crate::input::{Keymap, KeymapEntry};

#[allow(unused)]
fn _assert_object_safety(_: &dyn Backend) {}
