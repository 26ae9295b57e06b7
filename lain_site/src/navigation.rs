use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cursor::{CursorLocation, MatrixPosition};
use crate::layout::{matrix_columns, Node, NodeMatrix, Site, SiteView, MATRIX_COLUMNS, ROWS, SEGMENTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// Left/Right walk columns and cross segments; Up/Down walk rows and
    /// cross levels.
    pub fn is_lateral(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }
}

/// Row scan order for lateral moves, indexed by the starting row.
pub const ROW_PRECEDENCE: [[u8; ROWS]; ROWS] = [[0, 1, 2], [1, 0, 2], [2, 1, 0]];

/// Column scan order for vertical moves, indexed by the starting column.
pub const COLUMN_PRECEDENCE: [[u8; MATRIX_COLUMNS]; MATRIX_COLUMNS] =
    [[0, 1, 2, 3], [1, 0, 2, 3], [2, 1, 3, 0], [3, 2, 1, 0]];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NavigationError {
    #[error("row {0} is outside the {ROWS}-row node matrix")]
    RowOutOfRange(u8),
    #[error("column {0} is outside the {MATRIX_COLUMNS}-column node matrix")]
    ColumnOutOfRange(u8),
    #[error("segment {0} is outside 0..{SEGMENTS}")]
    SegmentOutOfRange(u8),
    #[error("level {level} is outside site {site} (0..{level_count})")]
    LevelOutOfRange {
        site: Site,
        level: i32,
        level_count: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationResult<'a> {
    pub node: &'a Node,
    pub cursor: CursorLocation,
    /// True when the hit lies in another segment or level than the start.
    pub moved: bool,
}

pub fn validate_cursor(site: &SiteView<'_>, cursor: &CursorLocation) -> Result<(), NavigationError> {
    let MatrixPosition { row, col } = cursor.node_matrix_position;
    if usize::from(row) >= ROWS {
        return Err(NavigationError::RowOutOfRange(row));
    }
    if usize::from(col) >= MATRIX_COLUMNS {
        return Err(NavigationError::ColumnOutOfRange(col));
    }
    if cursor.site_segment >= SEGMENTS {
        return Err(NavigationError::SegmentOutOfRange(cursor.site_segment));
    }
    if !site.contains_level(cursor.level) {
        return Err(NavigationError::LevelOutOfRange {
            site: site.site(),
            level: cursor.level,
            level_count: site.level_count(),
        });
    }
    Ok(())
}

/// Resolves where a directional input lands.
///
/// The remaining lines of the current matrix are scanned first. When they
/// are empty the search crosses one boundary (the next segment for lateral
/// moves, the next level for vertical ones) and scans that matrix from the
/// edge it was entered through. `allow_two_phase` allows one further
/// crossing before giving up. Lateral moves never leave an empty starting
/// slot, and vertical moves stop at the bottom and top levels.
pub fn find_next_node<'a>(
    site: SiteView<'a>,
    cursor: CursorLocation,
    direction: Direction,
    allow_two_phase: bool,
    is_visible: &dyn Fn(&Node) -> bool,
) -> Result<Option<NavigationResult<'a>>, NavigationError> {
    validate_cursor(&site, &cursor)?;
    let origin = cursor.node_matrix_position;
    let matrix = site.matrix(cursor.level, cursor.site_segment, is_visible);

    if let Some((position, node)) =
        scan_lines(&matrix, direction, origin, local_lines(direction, origin), None)
    {
        return Ok(Some(NavigationResult {
            node,
            cursor: cursor.with_position(position),
            moved: false,
        }));
    }

    if direction.is_lateral() && matrix.get(origin.row, origin.col).is_none() {
        return Ok(None);
    }

    let crossings = if allow_two_phase { 2 } else { 1 };
    let mut location = cursor;
    for _ in 0..crossings {
        location = match cross_boundary(&site, location, direction) {
            Some(next) => next,
            None => return Ok(None),
        };
        let matrix = site.matrix(location.level, location.site_segment, is_visible);
        let skip = origin_in(&cursor, &location);
        if let Some((position, node)) =
            scan_lines(&matrix, direction, origin, edge_lines(direction), skip)
        {
            return Ok(Some(NavigationResult {
                node,
                cursor: location.with_position(position),
                moved: true,
            }));
        }
    }

    Ok(None)
}

fn local_lines(direction: Direction, origin: MatrixPosition) -> Vec<u8> {
    match direction {
        Direction::Left => (0..origin.col).rev().collect(),
        Direction::Right => (origin.col + 1..MATRIX_COLUMNS as u8).collect(),
        Direction::Up => (0..origin.row).rev().collect(),
        Direction::Down => (origin.row + 1..ROWS as u8).collect(),
    }
}

fn edge_lines(direction: Direction) -> Vec<u8> {
    match direction {
        Direction::Left => (0..MATRIX_COLUMNS as u8).rev().collect(),
        Direction::Right => (0..MATRIX_COLUMNS as u8).collect(),
        Direction::Up => (0..ROWS as u8).rev().collect(),
        Direction::Down => (0..ROWS as u8).collect(),
    }
}

/// Where the starting slot shows up in the window at `location`, if at all.
/// Adjacent segments share a layout column, so a crossing can see it again.
fn origin_in(cursor: &CursorLocation, location: &CursorLocation) -> Option<MatrixPosition> {
    if location.level != cursor.level {
        return None;
    }
    let origin = cursor.node_matrix_position;
    let layout_col = matrix_columns(cursor.site_segment)[usize::from(origin.col)];
    let col = matrix_columns(location.site_segment)
        .iter()
        .position(|&col| col == layout_col)?;
    Some(MatrixPosition::new(origin.row, u8::try_from(col).ok()?))
}

/// Walks `lines` (columns for lateral moves, rows otherwise) and returns the
/// first occupied slot other than `skip`, breaking ties inside a line by
/// precedence from the starting slot.
fn scan_lines<'a>(
    matrix: &NodeMatrix<'a>,
    direction: Direction,
    origin: MatrixPosition,
    lines: Vec<u8>,
    skip: Option<MatrixPosition>,
) -> Option<(MatrixPosition, &'a Node)> {
    let candidates = lines.into_iter().flat_map(|line| {
        let slots: Vec<MatrixPosition> = if direction.is_lateral() {
            ROW_PRECEDENCE[usize::from(origin.row)]
                .iter()
                .map(|&row| MatrixPosition::new(row, line))
                .collect()
        } else {
            COLUMN_PRECEDENCE[usize::from(origin.col)]
                .iter()
                .map(|&col| MatrixPosition::new(line, col))
                .collect()
        };
        slots
    });
    candidates
        .filter(|position| Some(*position) != skip)
        .find_map(|position| {
            matrix
                .get(position.row, position.col)
                .map(|node| (position, node))
        })
}

fn cross_boundary(
    site: &SiteView<'_>,
    location: CursorLocation,
    direction: Direction,
) -> Option<CursorLocation> {
    let mut next = location;
    match direction {
        Direction::Left => next.site_segment = (location.site_segment + 1) % SEGMENTS,
        Direction::Right => next.site_segment = (location.site_segment + SEGMENTS - 1) % SEGMENTS,
        Direction::Up => next.level = location.level + 1,
        Direction::Down => next.level = location.level - 1,
    }
    site.contains_level(next.level).then_some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{NodeKind, SiteContent, SiteLayout, LAYOUT_COLUMNS};

    /// Builds a single-site content set; placements are
    /// `(level, row, layout column, id)`.
    fn content(levels: usize, placements: &[(usize, usize, usize, &str)]) -> SiteContent {
        let empty: [[Option<String>; LAYOUT_COLUMNS]; ROWS] = Default::default();
        let mut grid = vec![empty; levels];
        let mut nodes = Vec::new();
        for &(level, row, col, id) in placements {
            grid[level][row][col] = Some(id.to_string());
            nodes.push(Node {
                id: id.to_string(),
                kind: NodeKind::Media,
                title: id.to_string(),
                media: None,
                words: Vec::new(),
                required_gate_level: u8::from(id.starts_with("locked")),
                protocol_lines: Vec::new(),
            });
        }
        SiteContent::new(nodes, [SiteLayout::new(Site::A, grid)]).expect("valid content")
    }

    fn all(_: &Node) -> bool {
        true
    }

    fn id(result: Option<NavigationResult<'_>>) -> Option<(&str, CursorLocation, bool)> {
        result.map(|hit| (hit.node.id.as_str(), hit.cursor, hit.moved))
    }

    #[test]
    fn down_uses_column_precedence_inside_matrix() {
        let content = content(1, &[(0, 2, 0, "n")]);
        let site = content.site(Site::A).unwrap();
        let hit = find_next_node(site, CursorLocation::new(0, 0, 0, 0), Direction::Down, false, &all)
            .unwrap();
        assert_eq!(id(hit), Some(("n", CursorLocation::new(0, 0, 2, 0), false)));
    }

    #[test]
    fn lateral_rows_prefer_the_nearest_row() {
        // Segment 0 shows layout columns [0, 3, 4, 7]; visible column 1 is layout 3.
        let content = content(1, &[(0, 1, 4, "start"), (0, 0, 3, "top"), (0, 2, 3, "bottom")]);
        let site = content.site(Site::A).unwrap();
        let hit = find_next_node(site, CursorLocation::new(0, 0, 1, 2), Direction::Left, false, &all)
            .unwrap();
        assert_eq!(id(hit).map(|(name, _, _)| name), Some("top"));

        let content = content_with_start_row_two();
        let site = content.site(Site::A).unwrap();
        let hit = find_next_node(site, CursorLocation::new(0, 0, 2, 2), Direction::Left, false, &all)
            .unwrap();
        assert_eq!(id(hit).map(|(name, _, _)| name), Some("middle"));
    }

    fn content_with_start_row_two() -> SiteContent {
        content(1, &[(0, 2, 4, "start"), (0, 0, 3, "top"), (0, 1, 3, "middle")])
    }

    #[test]
    fn vertical_columns_prefer_the_nearest_column() {
        // From column 2 the order is [2, 1, 3, 0]; layout columns 3 and 7 sit at visible 1 and 3.
        let content = content(1, &[(0, 1, 3, "left"), (0, 1, 7, "right")]);
        let site = content.site(Site::A).unwrap();
        let hit = find_next_node(site, CursorLocation::new(0, 0, 2, 2), Direction::Up, false, &all)
            .unwrap();
        assert_eq!(id(hit), Some(("left", CursorLocation::new(0, 0, 1, 1), false)));
    }

    #[test]
    fn left_crosses_into_next_segment_from_the_right_edge() {
        let content = content(1, &[(0, 0, 3, "start"), (0, 0, 5, "beyond")]);
        let site = content.site(Site::A).unwrap();
        let hit = find_next_node(site, CursorLocation::new(0, 0, 0, 1), Direction::Left, false, &all)
            .unwrap();
        // Segment 1 shows layout columns [1, 4, 5, 0]; layout 5 is visible column 2.
        assert_eq!(id(hit), Some(("beyond", CursorLocation::new(0, 1, 0, 2), true)));
    }

    #[test]
    fn crossing_never_lands_back_on_the_starting_slot() {
        // Layout 0 is visible column 0 of segment 0 and column 3 of segment 1.
        let both = content(1, &[(0, 0, 0, "start"), (0, 0, 5, "beyond")]);
        let site = both.site(Site::A).unwrap();
        let hit = find_next_node(site, CursorLocation::new(0, 0, 0, 0), Direction::Left, false, &all)
            .unwrap();
        assert_eq!(id(hit), Some(("beyond", CursorLocation::new(0, 1, 0, 2), true)));

        let lone = content(1, &[(0, 0, 0, "start")]);
        let site = lone.site(Site::A).unwrap();
        for direction in [Direction::Left, Direction::Right] {
            let hit = find_next_node(site, CursorLocation::new(0, 0, 0, 0), direction, true, &all);
            assert_eq!(hit.unwrap(), None, "{direction:?}");
        }
    }

    #[test]
    fn two_phase_left_looks_past_one_empty_segment() {
        // Segment 1 shows [1, 4, 5, 0] and only the start; segment 2 shows [2, 5, 6, 1].
        let content = content(1, &[(0, 0, 0, "start"), (0, 0, 6, "far")]);
        let site = content.site(Site::A).unwrap();
        let start = CursorLocation::new(0, 0, 0, 0);

        let single = find_next_node(site, start, Direction::Left, false, &all).unwrap();
        assert_eq!(single, None);

        let double = find_next_node(site, start, Direction::Left, true, &all).unwrap();
        assert_eq!(id(double), Some(("far", CursorLocation::new(0, 2, 0, 2), true)));
    }

    #[test]
    fn right_wraps_from_segment_zero_to_seven() {
        let content = content(1, &[(0, 0, 0, "start"), (0, 0, 2, "wrapped")]);
        let site = content.site(Site::A).unwrap();
        let hit = find_next_node(site, CursorLocation::new(0, 0, 0, 3), Direction::Right, false, &all);
        // Visible column 3 of segment 0 is layout 7, which is empty.
        assert_eq!(hit.unwrap(), None);

        let hit = find_next_node(site, CursorLocation::new(0, 0, 0, 0), Direction::Right, false, &all)
            .unwrap();
        // Segment 7 shows layout columns [7, 2, 3, 6].
        assert_eq!(id(hit), Some(("wrapped", CursorLocation::new(0, 7, 0, 1), true)));
    }

    #[test]
    fn repeated_left_returns_to_the_starting_segment() {
        let placements: Vec<(usize, usize, usize, String)> =
            (0..LAYOUT_COLUMNS).map(|col| (0, 0, col, format!("c{col}"))).collect();
        let borrowed: Vec<(usize, usize, usize, &str)> = placements
            .iter()
            .map(|(l, r, c, name)| (*l, *r, *c, name.as_str()))
            .collect();
        let content = content(1, &borrowed);
        let site = content.site(Site::A).unwrap();

        let mut cursor = CursorLocation::new(0, 0, 0, 0);
        let mut crossings = 0;
        for _ in 0..64 {
            let hit = find_next_node(site, cursor, Direction::Left, false, &all)
                .unwrap()
                .expect("every segment is populated");
            if hit.moved {
                crossings += 1;
            }
            cursor = hit.cursor;
            if crossings == usize::from(SEGMENTS) {
                break;
            }
        }
        assert_eq!(crossings, 8);
        assert_eq!(cursor.site_segment, 0);
    }

    #[test]
    fn up_from_the_top_level_is_exhausted() {
        let content = content(2, &[(1, 0, 0, "top"), (0, 0, 0, "bottom")]);
        let site = content.site(Site::A).unwrap();
        let hit = find_next_node(site, CursorLocation::new(1, 0, 0, 0), Direction::Up, true, &all);
        assert_eq!(hit.unwrap(), None);

        let hit = find_next_node(site, CursorLocation::new(0, 0, 2, 0), Direction::Down, true, &all);
        assert_eq!(hit.unwrap(), None);
    }

    #[test]
    fn up_enters_next_level_from_the_bottom_row() {
        let content = content(2, &[(0, 0, 0, "here"), (1, 0, 0, "high"), (1, 2, 3, "low")]);
        let site = content.site(Site::A).unwrap();
        let hit = find_next_node(site, CursorLocation::new(0, 0, 0, 0), Direction::Up, false, &all)
            .unwrap();
        assert_eq!(id(hit), Some(("low", CursorLocation::new(1, 0, 2, 1), true)));
    }

    #[test]
    fn two_phase_looks_past_one_empty_level() {
        let content = content(3, &[(0, 0, 0, "start"), (2, 1, 0, "far")]);
        let site = content.site(Site::A).unwrap();
        let start = CursorLocation::new(0, 0, 0, 0);

        let single = find_next_node(site, start, Direction::Up, false, &all).unwrap();
        assert_eq!(single, None);

        let double = find_next_node(site, start, Direction::Up, true, &all).unwrap();
        assert_eq!(id(double), Some(("far", CursorLocation::new(2, 0, 1, 0), true)));
    }

    #[test]
    fn lateral_move_from_an_empty_slot_stays_put() {
        let content = content(1, &[(0, 0, 1, "elsewhere")]);
        let site = content.site(Site::A).unwrap();
        let hit = find_next_node(site, CursorLocation::new(0, 0, 0, 0), Direction::Left, true, &all);
        assert_eq!(hit.unwrap(), None);
    }

    #[test]
    fn hidden_nodes_are_skipped() {
        let content = content(1, &[(0, 0, 0, "start"), (0, 0, 3, "locked"), (0, 0, 4, "open")]);
        let site = content.site(Site::A).unwrap();
        let unlocked = |node: &Node| node.required_gate_level == 0;
        let hit = find_next_node(site, CursorLocation::new(0, 0, 0, 0), Direction::Right, false, &unlocked)
            .unwrap();
        assert_eq!(id(hit).map(|(name, _, _)| name), Some("open"));
    }

    #[test]
    fn results_are_deterministic() {
        let content = content(2, &[(0, 1, 4, "a"), (1, 2, 3, "b"), (0, 0, 7, "c")]);
        let site = content.site(Site::A).unwrap();
        let start = CursorLocation::new(0, 0, 1, 2);
        for direction in [Direction::Left, Direction::Right, Direction::Up, Direction::Down] {
            let first = find_next_node(site, start, direction, true, &all).unwrap();
            let second = find_next_node(site, start, direction, true, &all).unwrap();
            assert_eq!(first, second, "{direction:?}");
        }
    }

    #[test]
    fn invalid_cursor_is_a_precondition_error() {
        let content = content(1, &[(0, 0, 0, "a")]);
        let site = content.site(Site::A).unwrap();
        let bad_row = find_next_node(site, CursorLocation::new(0, 0, 3, 0), Direction::Up, false, &all);
        assert_eq!(bad_row, Err(NavigationError::RowOutOfRange(3)));
        let bad_level = find_next_node(site, CursorLocation::new(4, 0, 0, 0), Direction::Up, false, &all);
        assert!(matches!(bad_level, Err(NavigationError::LevelOutOfRange { level: 4, .. })));
        let bad_segment = find_next_node(site, CursorLocation::new(0, 9, 0, 0), Direction::Up, false, &all);
        assert_eq!(bad_segment, Err(NavigationError::SegmentOutOfRange(9)));
    }
}
