use sourcerenderer_core::math::plane_dot;
use sourcerenderer_core::{Mat4, Plane, Point3};

use crate::bounds::Sphere;

use super::ViewMatrices;

/// Screen-space extents in NDC-like units (§4.3 "Geometry scissors"):
/// `near`/`far` are the projected depth extents, the rest clamp to
/// `[-1, 1]` at the call site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScissorBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl ScissorBounds {
    fn degenerate() -> Self {
        Self {
            left: f32::MAX,
            right: f32::MIN,
            bottom: f32::MAX,
            top: f32::MIN,
            near: f32::MAX,
            far: f32::MIN,
        }
    }

    fn include(&mut self, ndc: sourcerenderer_core::Vec3) {
        self.left = self.left.min(ndc.x);
        self.right = self.right.max(ndc.x);
        self.bottom = self.bottom.min(ndc.y);
        self.top = self.top.max(ndc.y);
        self.near = self.near.min(ndc.z);
        self.far = self.far.max(ndc.z);
    }

    fn clamp_to_viewport(&mut self) {
        self.left = self.left.clamp(-1.0, 1.0);
        self.right = self.right.clamp(-1.0, 1.0);
        self.bottom = self.bottom.clamp(-1.0, 1.0);
        self.top = self.top.clamp(-1.0, 1.0);
    }
}

/// §4.3 final scissor state: `Empty` (entirely behind the near plane or no
/// contribution), `Undefined` (a conservative full-screen fallback for a
/// degenerate projection), or `Defined` with concrete bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScissorState {
    Empty,
    Undefined,
    Defined(ScissorBounds),
}

/// Accumulates scissor extents across successive
/// `update_with_world_space_bounding_hull` calls (§8 property #6,
/// "scissor monotonicity") — extents only ever grow, never shrink, until
/// a fresh `Scissor` is started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scissor {
    state: ScissorState,
}

impl Scissor {
    pub fn new() -> Self {
        Self { state: ScissorState::Empty }
    }

    pub fn state(&self) -> ScissorState {
        self.state
    }

    /// Clips `points` (an `n`-gon face, `n in {4,5,7,8}`) against the near
    /// plane, projects the retained/interpolated vertices through
    /// `view_projection`, and folds the result into the running bounds.
    pub fn update_with_world_space_bounding_hull(
        &mut self,
        points: &[Point3],
        near_plane: Plane,
        view_projection: Mat4,
    ) {
        let clipped = clip_ring_against_plane(points, near_plane);
        if clipped.is_empty() {
            return;
        }
        let mut bounds = match self.state {
            ScissorState::Defined(b) => b,
            _ => ScissorBounds::degenerate(),
        };
        for p in &clipped {
            bounds.include(project_to_ndc(*p, view_projection));
        }
        self.state = ScissorState::Defined(bounds);
    }

    /// Same as above but for a box's two 4-vertex rings plus the four
    /// connecting edges (§4.3), rather than a single cyclic polygon.
    pub fn update_with_world_space_bounding_box(
        &mut self,
        corners: &[Point3; 8],
        near_plane: Plane,
        view_projection: Mat4,
    ) {
        let edges = box_edges(corners);
        let clipped = clip_edges_against_plane(&edges, near_plane);
        if clipped.is_empty() {
            return;
        }
        let mut bounds = match self.state {
            ScissorState::Defined(b) => b,
            _ => ScissorBounds::degenerate(),
        };
        for p in &clipped {
            bounds.include(project_to_ndc(*p, view_projection));
        }
        self.state = ScissorState::Defined(bounds);
    }

    pub fn finish(mut self) -> ScissorState {
        if let ScissorState::Defined(mut b) = self.state {
            b.clamp_to_viewport();
            self.state = ScissorState::Defined(b);
        }
        self.state
    }
}

impl Default for Scissor {
    fn default() -> Self {
        Self::new()
    }
}

fn project_to_ndc(point: Point3, view_projection: Mat4) -> sourcerenderer_core::Vec3 {
    let clip = view_projection * point.extend(1.0);
    if clip.w.abs() > 1e-8 {
        clip.truncate() / clip.w
    } else {
        clip.truncate()
    }
}

/// Walks a cyclic ring of vertices and clips it against `plane`, inserting
/// an interpolated vertex wherever consecutive vertices straddle `d = 0`
/// (§4.3 "Geometry scissors").
fn clip_ring_against_plane(points: &[Point3], plane: Plane) -> Vec<Point3> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(points.len() + 1);
    let n = points.len();
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        clip_edge(a, b, plane, &mut out);
    }
    out
}

fn clip_edges_against_plane(edges: &[(Point3, Point3)], plane: Plane) -> Vec<Point3> {
    let mut out = Vec::with_capacity(edges.len() + 4);
    for (a, b) in edges {
        clip_edge(*a, *b, plane, &mut out);
    }
    out
}

fn clip_edge(a: Point3, b: Point3, plane: Plane, out: &mut Vec<Point3>) {
    let da = plane_dot(plane, a);
    let db = plane_dot(plane, b);
    if da >= 0.0 && !out.contains(&a) {
        out.push(a);
    }
    if (da >= 0.0) != (db >= 0.0) {
        let t = da / (da - db);
        out.push(a + (b - a) * t);
    }
}

/// The two 4-vertex rings plus the four connecting edges of a box in
/// `OrientedBox::construct_vertices()` winding order.
fn box_edges(c: &[Point3; 8]) -> [(Point3, Point3); 12] {
    [
        (c[0], c[1]),
        (c[1], c[2]),
        (c[2], c[3]),
        (c[3], c[0]),
        (c[4], c[5]),
        (c[5], c[6]),
        (c[6], c[7]),
        (c[7], c[4]),
        (c[0], c[4]),
        (c[1], c[5]),
        (c[2], c[6]),
        (c[3], c[7]),
    ]
}

/// §4.3 "Geometry scissors": clips a single world-space `n`-gon
/// (`n in {4,5,7,8}`) against the near plane and projects it through
/// `view_projection`, returning the resulting scissor state directly.
pub fn geometry_scissor(points: &[Point3], near_plane: Plane, view_projection: Mat4) -> ScissorState {
    let mut scissor = Scissor::new();
    scissor.update_with_world_space_bounding_hull(points, near_plane, view_projection);
    scissor.finish()
}

/// §4.3 "Light scissors", point-light branch: derives the four eye-space
/// tangent planes to the light's bounding sphere analytically and projects
/// their tangency points to NDC, rejecting any behind the camera.
pub fn light_scissor(sphere: Sphere, view: &ViewMatrices) -> ScissorState {
    let center_eye = view.view.transform_point3(sphere.center);
    if center_eye.z >= -sphere.radius {
        // Camera is inside or touching the sphere: no tight scissor possible.
        return ScissorState::Undefined;
    }

    let half_fov = view.vertical_angle_deg.to_radians() * 0.5;
    let cot_y = 1.0 / half_fov.tan();
    let cot_x = cot_y / view.aspect;

    let mut bounds = ScissorBounds::degenerate();
    let mut any = false;
    for (axis_cot, positive, is_x) in [(cot_x, true, true), (cot_x, false, true), (cot_y, true, false), (cot_y, false, false)] {
        if let Some(ndc) = tangent_plane_ndc(center_eye, sphere.radius, axis_cot, positive, is_x) {
            bounds.include(sourcerenderer_core::Vec3::new(ndc.0, ndc.1, 0.0));
            any = true;
        }
    }
    if !any {
        return ScissorState::Undefined;
    }

    let proj = view.projection_matrix();
    let near_clip = (proj * (center_eye + sourcerenderer_core::Vec3::new(0.0, 0.0, sphere.radius)).extend(1.0)).z;
    let far_clip = (proj * (center_eye - sourcerenderer_core::Vec3::new(0.0, 0.0, sphere.radius)).extend(1.0)).z;
    bounds.near = near_clip.min(far_clip);
    bounds.far = near_clip.max(far_clip);
    bounds.clamp_to_viewport();
    ScissorState::Defined(bounds)
}

/// Solves the quadratic for the tangent line from the eye through a circle
/// of radius `radius` centered at `(e, z)` in the (axis, z) plane, where
/// `e` is the relevant eye-space coordinate of `center_eye`; returns the
/// NDC (x, y) of the tangency point with the other axis at zero, or `None`
/// if the tangency point lies behind the camera.
fn tangent_plane_ndc(center_eye: sourcerenderer_core::Vec3, radius: f32, cot: f32, positive: bool, is_x: bool) -> Option<(f32, f32)> {
    let e = if is_x { center_eye.x } else { center_eye.y };
    let z = center_eye.z;
    let d2 = e * e + z * z;
    let r2 = radius * radius;
    if d2 <= r2 {
        return None;
    }
    let sign = if positive { 1.0 } else { -1.0 };
    // Tangent direction in the (e, z) plane, rotated from the line to the
    // center by the half-angle whose sine is radius / distance.
    let dist = d2.sqrt();
    let sin_t = radius / dist;
    let angle = z.atan2(e) + sign * sin_t.asin();
    let tz = angle.cos();
    let te = angle.sin();
    if tz >= 0.0 {
        return None;
    }
    let ndc = cot * te / -tz;
    if is_x {
        Some((ndc.clamp(-1.0, 1.0), 0.0))
    } else {
        Some((0.0, ndc.clamp(-1.0, 1.0)))
    }
}
