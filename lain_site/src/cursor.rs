use serde::{Deserialize, Serialize};

/// Slot inside the visible 3×4 node matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MatrixPosition {
    pub row: u8,
    pub col: u8,
}

impl MatrixPosition {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

/// Where the player's selector sits on a site: which level, which of the 8
/// rotational segments faces the camera, and the slot inside the visible
/// window. Scenes persist one of these per site through the save
/// collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CursorLocation {
    pub level: i32,
    pub site_segment: u8,
    pub node_matrix_position: MatrixPosition,
}

impl CursorLocation {
    pub const fn new(level: i32, site_segment: u8, row: u8, col: u8) -> Self {
        Self {
            level,
            site_segment,
            node_matrix_position: MatrixPosition::new(row, col),
        }
    }

    pub fn row(&self) -> u8 {
        self.node_matrix_position.row
    }

    pub fn col(&self) -> u8 {
        self.node_matrix_position.col
    }

    pub fn with_position(self, position: MatrixPosition) -> Self {
        Self {
            node_matrix_position: position,
            ..self
        }
    }
}
