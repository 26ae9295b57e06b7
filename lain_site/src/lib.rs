//! Site content and cursor navigation.
//!
//! A site is a stack of levels; every level is a ring of 8 columns by 3 rows
//! of node slots. The player only ever sees a 3×4 window of that ring, picked
//! by the current rotational segment, and the resolver in [`navigation`]
//! walks that window (and its neighbours) to find where a directional input
//! lands.

pub mod cursor;
pub mod layout;
pub mod navigation;

pub use cursor::{CursorLocation, MatrixPosition};
pub use layout::{
    matrix_columns, ContentError, Node, NodeKind, NodeMatrix, Site, SiteContent, SiteLayout,
    SiteView, LAYOUT_COLUMNS, MATRIX_COLUMNS, ROWS, SEGMENTS,
};
pub use navigation::{
    find_next_node, validate_cursor, Direction, NavigationError, NavigationResult,
    COLUMN_PRECEDENCE, ROW_PRECEDENCE,
};
