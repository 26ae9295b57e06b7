use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cursor::{CursorLocation, MatrixPosition};

/// Rows per level, both in the canonical layout and in the visible matrix.
pub const ROWS: usize = 3;
/// Columns around one level of the canonical layout.
pub const LAYOUT_COLUMNS: usize = 8;
/// Columns of the visible node matrix.
pub const MATRIX_COLUMNS: usize = 4;
/// Rotational segments a site can face.
pub const SEGMENTS: u8 = 8;

const DEMO_CONTENT: &str = include_str!("../data/demo_site.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Site {
    A,
    B,
}

impl Site {
    pub fn other(self) -> Site {
        match self {
            Site::A => Site::B,
            Site::B => Site::A,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Site::A => "A",
            Site::B => "B",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides which scene selecting a node opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Media,
    Movie,
    Tak,
    Sskn,
    Polytan,
    Gate,
    Final,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub kind: NodeKind,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub media: Option<String>,
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub required_gate_level: u8,
    #[serde(default)]
    pub protocol_lines: Vec<String>,
}

impl Node {
    /// Media key handed to the player; falls back to the node id.
    pub fn media_key(&self) -> &str {
        self.media.as_deref().unwrap_or(&self.id)
    }
}

type LevelLayout = [[Option<String>; LAYOUT_COLUMNS]; ROWS];

/// Canonical `level → 3 rows × 8 columns` placement of node ids for one site.
/// Level 0 is the lowest level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteLayout {
    pub site: Site,
    levels: Vec<LevelLayout>,
}

impl SiteLayout {
    pub fn new(site: Site, levels: Vec<[[Option<String>; LAYOUT_COLUMNS]; ROWS]>) -> Self {
        Self { site, levels }
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    fn slot_id(&self, level: i32, row: usize, layout_col: usize) -> Option<&str> {
        let level = usize::try_from(level).ok()?;
        self.levels
            .get(level)?
            .get(row)?
            .get(layout_col)?
            .as_deref()
    }
}

/// Layout columns facing the viewer from `segment`, in visible column order.
pub fn matrix_columns(segment: u8) -> [usize; MATRIX_COLUMNS] {
    let s = usize::from(segment);
    [s, s + 3, s + 4, s + 7].map(|col| col % LAYOUT_COLUMNS)
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("site content is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("node {0} is defined more than once")]
    DuplicateNode(String),
    #[error("site {0} is defined more than once")]
    DuplicateSite(Site),
    #[error("site {0} has no levels")]
    EmptySite(Site),
    #[error("site {site} level {level} references unknown node {id}")]
    UnknownNode { site: Site, level: usize, id: String },
}

#[derive(Debug, Deserialize)]
struct RawContent {
    nodes: Vec<Node>,
    sites: Vec<SiteLayout>,
}

/// Immutable game content: every node plus the layout of each site.
#[derive(Debug, Clone)]
pub struct SiteContent {
    layouts: BTreeMap<Site, SiteLayout>,
    nodes: BTreeMap<String, Node>,
}

impl SiteContent {
    pub fn new<N, L>(nodes: N, layouts: L) -> Result<Self, ContentError>
    where
        N: IntoIterator<Item = Node>,
        L: IntoIterator<Item = SiteLayout>,
    {
        let mut node_table = BTreeMap::new();
        for node in nodes {
            if node_table.contains_key(&node.id) {
                return Err(ContentError::DuplicateNode(node.id));
            }
            node_table.insert(node.id.clone(), node);
        }

        let mut layout_table = BTreeMap::new();
        for layout in layouts {
            if layout.levels.is_empty() {
                return Err(ContentError::EmptySite(layout.site));
            }
            for (level, rows) in layout.levels.iter().enumerate() {
                for id in rows.iter().flatten().flatten() {
                    if !node_table.contains_key(id) {
                        return Err(ContentError::UnknownNode {
                            site: layout.site,
                            level,
                            id: id.clone(),
                        });
                    }
                }
            }
            if layout_table.contains_key(&layout.site) {
                return Err(ContentError::DuplicateSite(layout.site));
            }
            layout_table.insert(layout.site, layout);
        }

        Ok(Self {
            layouts: layout_table,
            nodes: node_table,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ContentError> {
        let raw: RawContent = serde_json::from_str(raw)?;
        Self::new(raw.nodes, raw.sites)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading site content {}", path.display()))?;
        let content = Self::from_json_str(&raw)
            .with_context(|| format!("parsing site content {}", path.display()))?;
        log::debug!(
            "loaded {} nodes across {} sites from {}",
            content.nodes.len(),
            content.layouts.len(),
            path.display()
        );
        Ok(content)
    }

    /// Small two-site content set bundled with the crate.
    pub fn demo() -> Result<Self, ContentError> {
        Self::from_json_str(DEMO_CONTENT)
    }

    pub fn site(&self, site: Site) -> Option<SiteView<'_>> {
        self.layouts.get(&site).map(|layout| SiteView {
            layout,
            nodes: &self.nodes,
        })
    }

    pub fn sites(&self) -> impl Iterator<Item = Site> + '_ {
        self.layouts.keys().copied()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

/// Borrowed view of one site's layout together with the node table.
#[derive(Debug, Clone, Copy)]
pub struct SiteView<'a> {
    layout: &'a SiteLayout,
    nodes: &'a BTreeMap<String, Node>,
}

impl<'a> SiteView<'a> {
    pub fn site(&self) -> Site {
        self.layout.site
    }

    pub fn level_count(&self) -> usize {
        self.layout.level_count()
    }

    pub fn contains_level(&self, level: i32) -> bool {
        usize::try_from(level).is_ok_and(|level| level < self.level_count())
    }

    pub fn slot(&self, level: i32, row: usize, layout_col: usize) -> Option<&'a Node> {
        let id = self.layout.slot_id(level, row, layout_col)?;
        self.nodes.get(id)
    }

    /// Projects the 3×4 window facing the viewer from `segment` on `level`.
    /// Levels outside the site project to an empty matrix.
    pub fn matrix(
        &self,
        level: i32,
        segment: u8,
        is_visible: &dyn Fn(&Node) -> bool,
    ) -> NodeMatrix<'a> {
        let columns = matrix_columns(segment);
        let mut slots = [[None; MATRIX_COLUMNS]; ROWS];
        for (row, line) in slots.iter_mut().enumerate() {
            for (col, slot) in line.iter_mut().enumerate() {
                *slot = self
                    .slot(level, row, columns[col])
                    .filter(|node| is_visible(node));
            }
        }
        NodeMatrix {
            level,
            segment,
            slots,
        }
    }

    /// Node under the cursor, ignoring visibility.
    pub fn node_at(&self, cursor: &CursorLocation) -> Option<&'a Node> {
        let col = usize::from(cursor.col());
        if col >= MATRIX_COLUMNS || cursor.site_segment >= SEGMENTS {
            return None;
        }
        let layout_col = matrix_columns(cursor.site_segment)[col];
        self.slot(cursor.level, usize::from(cursor.row()), layout_col)
    }

    /// Cursor that shows `id` in the leftmost visible column.
    pub fn locate(&self, id: &str) -> Option<CursorLocation> {
        for (level, rows) in self.layout.levels.iter().enumerate() {
            for (row, columns) in rows.iter().enumerate() {
                for (layout_col, slot) in columns.iter().enumerate() {
                    if slot.as_deref() == Some(id) {
                        return Some(CursorLocation {
                            level: i32::try_from(level).ok()?,
                            site_segment: u8::try_from(layout_col).ok()?,
                            node_matrix_position: MatrixPosition::new(u8::try_from(row).ok()?, 0),
                        });
                    }
                }
            }
        }
        None
    }

    /// Every node placed on this site, lowest level first.
    pub fn nodes(&self) -> Vec<&'a Node> {
        self.layout
            .levels
            .iter()
            .flat_map(|rows| rows.iter().flatten().flatten())
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }

    pub fn first_cursor(&self, is_visible: &dyn Fn(&Node) -> bool) -> Option<CursorLocation> {
        self.nodes()
            .into_iter()
            .filter(|node| is_visible(node))
            .find_map(|node| self.locate(&node.id))
    }
}

/// The 3×4 window of a level as seen from one segment.
#[derive(Debug, Clone, Copy)]
pub struct NodeMatrix<'a> {
    pub level: i32,
    pub segment: u8,
    slots: [[Option<&'a Node>; MATRIX_COLUMNS]; ROWS],
}

impl<'a> NodeMatrix<'a> {
    pub fn get(&self, row: u8, col: u8) -> Option<&'a Node> {
        *self
            .slots
            .get(usize::from(row))?
            .get(usize::from(col))?
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().flatten().all(Option::is_none)
    }

    pub fn occupied(&self) -> impl Iterator<Item = (MatrixPosition, &'a Node)> + '_ {
        self.slots.iter().enumerate().flat_map(|(row, line)| {
            line.iter().enumerate().filter_map(move |(col, slot)| {
                slot.map(|node| (MatrixPosition::new(row as u8, col as u8), node))
            })
        })
    }
}
