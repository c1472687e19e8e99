//! View / camera module (§4.6, supplemented). The distillation names this
//! component's budget share but leaves its contract to the teacher's own
//! `fps_camera`/`camera` split: a fixed look-at camera, a camera that
//! tracks a scene object, and a free-flying camera, all producing the
//! `ViewMatrices` snapshot the culling driver consumes every frame.

use sourcerenderer_core::input::{apply_mouse_look, MouseSensitivity};
use sourcerenderer_core::{Mat3, Mat4, Point3, Vec2, Vec3};

use crate::frustum::ViewMatrices;

/// How a `View`'s position and orientation are derived each frame.
#[derive(Debug, Clone, Copy)]
pub enum MovementMode {
    /// Fixed eye position, always oriented toward `target`.
    LookAt { target: Point3 },
    /// Eye tracks a scene object's world position plus a local-space
    /// `offset`, oriented toward the object.
    FollowObject { object_id: u32, offset: Vec3 },
    /// Free-flying camera driven by `set_position`/`orbit`.
    Free,
}

/// A camera: position, orientation, and projection parameters, producing
/// the `ViewMatrices` the culling driver (§4.5) consumes. Owns no input
/// polling — the back-end seam (§4.7) drains raw input, and the outer
/// application calls `set_position`/`look_at`/`orbit` with the result.
#[derive(Debug, Clone, Copy)]
pub struct View {
    mode: MovementMode,
    position: Point3,
    yaw: f32,
    pitch: f32,
    vertical_fov_deg: f32,
    aspect: f32,
    near: f32,
    far: f32,
}

impl View {
    pub fn new(position: Point3, vertical_fov_deg: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            mode: MovementMode::Free,
            position,
            yaw: 0.0,
            pitch: 0.0,
            vertical_fov_deg,
            aspect,
            near,
            far,
        }
    }

    pub fn with_mode(mut self, mode: MovementMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn set_position(&mut self, position: Point3) {
        self.position = position;
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Points the camera at `target` from its current position, deriving
    /// yaw/pitch from the direction (used by `MovementMode::LookAt` and
    /// to seed `Free` mode).
    pub fn look_at(&mut self, target: Point3) {
        let direction = (target - self.position).normalize_or_zero();
        if direction == Vec3::ZERO {
            return;
        }
        self.yaw = direction.x.atan2(-direction.z);
        self.pitch = direction.y.asin();
    }

    /// Applies a raw mouse delta through the shared sensitivity/clamp
    /// logic the input layer uses for its own mouse-pan control (§6).
    pub fn orbit(&mut self, mouse_delta: Vec2, sensitivity: MouseSensitivity) {
        let (yaw, pitch) = apply_mouse_look(self.yaw, self.pitch, mouse_delta, sensitivity);
        self.yaw = yaw;
        self.pitch = pitch;
    }

    fn forward(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            -self.pitch.cos() * self.yaw.cos(),
        )
    }

    /// Resolves the effective eye position and look-at target for the
    /// current `MovementMode`, consulting `object_position` for
    /// `FollowObject` (the `View` itself holds no reference to the
    /// `Scene`; the caller supplies the looked-up world position).
    fn eye_and_target(&self, object_position: impl Fn(u32) -> Option<Point3>) -> (Point3, Point3) {
        match self.mode {
            MovementMode::LookAt { target } => (self.position, target),
            MovementMode::FollowObject { object_id, offset } => {
                let anchor = object_position(object_id).unwrap_or(self.position);
                let eye = anchor + offset;
                (eye, anchor)
            }
            MovementMode::Free => (self.position, self.position + self.forward()),
        }
    }

    /// Derives the `ViewMatrices` snapshot for this frame. `object_position`
    /// is consulted only under `MovementMode::FollowObject`.
    pub fn view_matrices(&self, object_position: impl Fn(u32) -> Option<Point3>) -> ViewMatrices {
        let (eye, target) = self.eye_and_target(object_position);
        let up = if (target - eye).normalize_or_zero().dot(Vec3::Y).abs() > 0.999 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let view = Mat4::look_at_rh(eye, target, up);
        ViewMatrices {
            view,
            vertical_angle_deg: self.vertical_fov_deg,
            aspect: self.aspect,
            near: self.near,
            far: self.far,
        }
    }

    pub fn position(&self) -> Point3 {
        self.position
    }

    /// The camera's world-space rotation, derived from yaw/pitch; exposed
    /// for callers that need to orient attached objects (e.g. a weapon
    /// model) the way the camera faces.
    pub fn rotation(&self) -> Mat3 {
        Mat3::from_axis_angle(Vec3::Y, self.yaw) * Mat3::from_axis_angle(Vec3::X, -self.pitch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn look_at_mode_always_points_at_its_target() {
        let mut view = View::new(Point3::new(0.0, 0.0, 5.0), 60.0, 16.0 / 9.0, 0.1, 100.0);
        view.mode = MovementMode::LookAt { target: Point3::ZERO };
        let matrices = view.view_matrices(|_| None);
        let view_space_origin = matrices.view.transform_point3(Point3::ZERO);
        // The target must land in front of the eye, on the view-space -Z axis.
        assert!(view_space_origin.z < 0.0);
        assert!(view_space_origin.x.abs() < 1e-4);
        assert!(view_space_origin.y.abs() < 1e-4);
    }

    #[test]
    fn follow_object_tracks_the_looked_up_position() {
        let mut view = View::new(Point3::ZERO, 60.0, 1.0, 0.1, 100.0);
        view.mode = MovementMode::FollowObject { object_id: 3, offset: Vec3::new(0.0, 2.0, 5.0) };
        let matrices = view.view_matrices(|id| if id == 3 { Some(Point3::new(10.0, 0.0, 0.0)) } else { None });
        let object_in_view_space = matrices.view.transform_point3(Point3::new(10.0, 0.0, 0.0));
        assert!(object_in_view_space.z < 0.0);
    }

    #[test]
    fn orbit_clamps_pitch_to_the_shared_mouse_look_range() {
        let mut view = View::new(Point3::ZERO, 60.0, 1.0, 0.1, 100.0);
        view.orbit(Vec2::new(0.0, 1_000_000.0), MouseSensitivity::default());
        assert!(view.pitch <= 10f32.to_radians() + 1e-4);
    }
}
