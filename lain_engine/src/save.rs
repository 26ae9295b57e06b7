use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::state::GameState;

/// Persistence collaborator. Scenes only see the outcome: a loaded state or
/// nothing, and whether a save went through.
pub trait SaveStore {
    fn has_save(&self) -> bool;
    fn load(&mut self) -> Option<GameState>;
    fn save(&mut self, state: &GameState) -> bool;
}

/// In-memory slot, used by tests and runs without a save path.
#[derive(Debug, Default, Clone)]
pub struct MemorySaveStore {
    slot: Option<GameState>,
}

impl MemorySaveStore {
    pub fn with_state(state: GameState) -> Self {
        Self { slot: Some(state) }
    }
}

impl SaveStore for MemorySaveStore {
    fn has_save(&self) -> bool {
        self.slot.is_some()
    }

    fn load(&mut self) -> Option<GameState> {
        self.slot.clone()
    }

    fn save(&mut self, state: &GameState) -> bool {
        self.slot = Some(state.clone());
        true
    }
}

/// Single JSON save file.
#[derive(Debug, Clone)]
pub struct JsonSaveStore {
    path: PathBuf,
}

impl JsonSaveStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<GameState> {
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("reading save file {}", self.path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing save file {}", self.path.display()))
    }

    fn write(&self, state: &GameState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("creating save directory {}", parent.display())
                })?;
            }
        }
        let json = serde_json::to_string_pretty(state).context("serializing game state")?;
        fs::write(&self.path, json)
            .with_context(|| format!("writing save file {}", self.path.display()))
    }
}

impl SaveStore for JsonSaveStore {
    fn has_save(&self) -> bool {
        self.path.is_file()
    }

    fn load(&mut self) -> Option<GameState> {
        match self.read() {
            Ok(state) => Some(state),
            Err(err) => {
                log::warn!("load failed: {err:#}");
                None
            }
        }
    }

    fn save(&mut self, state: &GameState) -> bool {
        match self.write(state) {
            Ok(()) => true,
            Err(err) => {
                log::error!("save failed: {err:#}");
                false
            }
        }
    }
}
