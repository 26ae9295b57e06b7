use lain_site::{NavigationError, Site};
use thiserror::Error;

use crate::resources::TextureKey;

/// Precondition failures raised inside a scene update. The driver logs them
/// and keeps the scene in place; none of them are recoverable mid-frame.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("navigation precondition failed: {0}")]
    Navigation(#[from] NavigationError),
    #[error("texture {0:?} has not been loaded")]
    TextureNotLoaded(TextureKey),
    #[error("site {0} has no layout in the loaded content")]
    MissingSite(Site),
    #[error("node {0} is not part of the loaded content")]
    UnknownNode(String),
    #[error("slot at level {level}, segment {segment}, row {row}, col {col} is empty")]
    EmptySlot {
        level: i32,
        segment: u8,
        row: u8,
        col: u8,
    },
}

pub type EngineResult<T> = Result<T, EngineError>;
