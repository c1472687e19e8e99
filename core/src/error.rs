//! Error kinds for the subsystem's two genuinely fallible operations
//! (scene preparation and back-end initialization). Every other routine
//! in this crate is total: intersection tests, scissor computation and
//! shadow-volume construction return ordinary enum values, never `Result`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A model has no LOD meshes, or its highest LOD has zero vertices.
    /// Fatal at scene-prepare time.
    UnsupportedGeometry { model_name: String },
    /// An object's transform contains a non-finite value. The object is
    /// flagged `Hidden` rather than aborting scene mutation.
    DegenerateTransform { object_id: u32 },
    /// The graphics back-end failed to create a window/context.
    BackendInit { message: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::UnsupportedGeometry { model_name } => {
                write!(f, "model '{model_name}' has no usable LOD geometry")
            }
            EngineError::DegenerateTransform { object_id } => {
                write!(f, "object {object_id} has a non-finite transform")
            }
            EngineError::BackendInit { message } => {
                write!(f, "back-end initialization failed: {message}")
            }
        }
    }
}

impl std::error::Error for EngineError {}
