use std::collections::{BTreeMap, BTreeSet};

use lain_site::{CursorLocation, Node, Site, SiteContent};
use serde::{Deserialize, Serialize};

pub const MAX_GATE_LEVEL: u8 = 4;
pub const MAX_SSKN_LEVEL: u8 = 9;
/// Gate level at which the pause menu allows switching sites.
pub const CHANGE_SITE_GATE_LEVEL: u8 = 4;
pub const MAX_NAME_LEN: usize = 8;

/// Body pieces assembled across the Polytan minigame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PolytanPart {
    Body,
    Head,
    LeftArm,
    RightArm,
    LeftLeg,
    RightLeg,
}

impl PolytanPart {
    pub const ALL: [PolytanPart; 6] = [
        PolytanPart::Body,
        PolytanPart::Head,
        PolytanPart::LeftArm,
        PolytanPart::RightArm,
        PolytanPart::LeftLeg,
        PolytanPart::RightLeg,
    ];
}

/// Player progress shared by every scene. Owned by the driver, mutated
/// only inside the active scene's update, persisted by the save store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub site: Site,
    pub cursors: BTreeMap<Site, CursorLocation>,
    pub player_name: String,
    pub gate_level: u8,
    pub sskn_level: u8,
    pub polytan_parts: BTreeSet<PolytanPart>,
    pub viewed_nodes: BTreeSet<String>,
    pub final_video_viewed: bool,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game("")
    }
}

impl GameState {
    pub fn new_game(player_name: &str) -> Self {
        Self {
            site: Site::A,
            cursors: BTreeMap::new(),
            player_name: player_name.to_string(),
            gate_level: 0,
            sskn_level: 0,
            polytan_parts: BTreeSet::new(),
            viewed_nodes: BTreeSet::new(),
            final_video_viewed: false,
        }
    }

    /// Cursor for the current site; a fresh site starts on its first
    /// visible node.
    pub fn cursor(&self) -> CursorLocation {
        self.cursor_for(self.site)
    }

    pub fn cursor_for(&self, site: Site) -> CursorLocation {
        self.cursors.get(&site).copied().unwrap_or_default()
    }

    pub fn set_cursor(&mut self, cursor: CursorLocation) {
        self.cursors.insert(self.site, cursor);
    }

    /// Seeds missing per-site cursors from the content.
    pub fn place_cursors(&mut self, content: &SiteContent) {
        for site in content.sites() {
            if self.cursors.contains_key(&site) {
                continue;
            }
            let Some(view) = content.site(site) else {
                continue;
            };
            let gate_level = self.gate_level;
            let start = view
                .first_cursor(&|node: &Node| node.required_gate_level <= gate_level)
                .unwrap_or_default();
            self.cursors.insert(site, start);
        }
    }

    pub fn is_visible(&self, node: &Node) -> bool {
        node.required_gate_level <= self.gate_level
    }

    pub fn mark_viewed(&mut self, node: &Node) -> bool {
        self.viewed_nodes.insert(node.id.clone())
    }

    pub fn raise_gate(&mut self) -> u8 {
        self.gate_level = (self.gate_level + 1).min(MAX_GATE_LEVEL);
        self.gate_level
    }

    pub fn raise_sskn(&mut self) -> u8 {
        self.sskn_level = (self.sskn_level + 1).min(MAX_SSKN_LEVEL);
        self.sskn_level
    }

    /// Unlocks the next missing Polytan piece, if any remain.
    pub fn unlock_next_part(&mut self) -> Option<PolytanPart> {
        let part = PolytanPart::ALL
            .into_iter()
            .find(|part| !self.polytan_parts.contains(part))?;
        self.polytan_parts.insert(part);
        Some(part)
    }

    pub fn can_change_site(&self) -> bool {
        self.gate_level >= CHANGE_SITE_GATE_LEVEL
    }
}
