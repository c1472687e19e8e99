use sourcerenderer_core::Point3;

/// A generic vertex-based convex hull with no precomputed planes (§3
/// `Hull`), used for the geometry-scissors near-plane clip where side
/// planes aren't needed, only point membership relative to a clip plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Hull {
    pub vertices: smallvec::SmallVec<[Point3; 8]>,
}

impl Hull {
    pub fn new(vertices: smallvec::SmallVec<[Point3; 8]>) -> Self {
        Self { vertices }
    }

    /// §4.1 rejection rule shared with `ConvexHull`: a separating plane
    /// rejects the hull only if every vertex is on its outside (`dot <= 0`).
    pub fn any_vertex_inside(&self, plane: sourcerenderer_core::Plane) -> bool {
        self.vertices
            .iter()
            .any(|v| sourcerenderer_core::math::plane_dot(plane, *v) > 0.0)
    }
}
