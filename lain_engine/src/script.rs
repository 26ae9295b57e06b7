use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Keys pressed on one frame of a scripted run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptEntry {
    pub frame: u64,
    #[serde(default)]
    pub keys: Vec<String>,
}

/// Frame-indexed key presses for headless runs. Keys are physical names or
/// logical button names, resolved through the configured bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputScript {
    entries: Vec<ScriptEntry>,
}

impl InputScript {
    pub fn new(mut entries: Vec<ScriptEntry>) -> Self {
        entries.sort_by_key(|entry| entry.frame);
        Self { entries }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        let entries: Vec<ScriptEntry> = serde_json::from_str(raw).context("parsing input script")?;
        Ok(Self::new(entries))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading input script {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("loading {}", path.display()))
    }

    pub fn entries(&self) -> &[ScriptEntry] {
        &self.entries
    }

    /// Every key listed for `frame`, across repeated entries.
    pub fn keys_for(&self, frame: u64) -> impl Iterator<Item = &str> + '_ {
        let start = self.entries.partition_point(|entry| entry.frame < frame);
        self.entries[start..]
            .iter()
            .take_while(move |entry| entry.frame == frame)
            .flat_map(|entry| entry.keys.iter().map(String::as_str))
    }

    pub fn last_frame(&self) -> Option<u64> {
        self.entries.last().map(|entry| entry.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn entries_are_ordered_and_merged_per_frame() -> Result<()> {
        let script = InputScript::from_json_str(
            r#"[
                { "frame": 5, "keys": ["KeyX"] },
                { "frame": 1, "keys": ["Start"] },
                { "frame": 5, "keys": ["ArrowUp"] },
                { "frame": 9 }
            ]"#,
        )?;
        assert_eq!(script.keys_for(1).collect::<Vec<_>>(), vec!["Start"]);
        assert_eq!(script.keys_for(5).collect::<Vec<_>>(), vec!["KeyX", "ArrowUp"]);
        assert_eq!(script.keys_for(2).count(), 0);
        assert_eq!(script.keys_for(9).count(), 0);
        assert_eq!(script.last_frame(), Some(9));
        Ok(())
    }

    #[test]
    fn missing_file_names_the_path() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("absent.json");
        let err = InputScript::from_json_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("absent.json"));
        Ok(())
    }
}
