use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lain_site::Site;
use serde::{Deserialize, Serialize};

use crate::input::{Button, InputState};

/// Runtime knobs read from an optional JSON file; anything absent keeps its
/// default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub fps: u32,
    /// Debug multiplier applied to every frame delta.
    pub time_multiplier: f32,
    /// Seconds without input on the site before the idle scene takes over.
    pub idle_timeout_secs: f32,
    pub starting_site: Site,
    /// Default clip length for the headless media player.
    pub media_duration_secs: f32,
    pub key_bindings: KeyBindings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            time_multiplier: 1.0,
            idle_timeout_secs: 30.0,
            starting_site: Site::A,
            media_duration_secs: 3.0,
            key_bindings: KeyBindings::default(),
        }
    }
}

impl EngineConfig {
    /// Loads `path` when given and present; otherwise returns the defaults.
    pub fn from_json_file(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            log::info!("config {} not found; using defaults", path.display());
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn frame_delta(&self) -> f32 {
        1.0 / self.fps.max(1) as f32
    }
}

/// Physical key name → logical button table. Only writes into the input
/// array; the scenes never see key names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    bindings: BTreeMap<String, Button>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let pairs = [
            ("ArrowLeft", Button::Left),
            ("ArrowRight", Button::Right),
            ("ArrowUp", Button::Up),
            ("ArrowDown", Button::Down),
            ("KeyQ", Button::L1),
            ("KeyW", Button::L2),
            ("KeyE", Button::R1),
            ("KeyR", Button::R2),
            ("KeyX", Button::Circle),
            ("KeyD", Button::Triangle),
            ("KeyZ", Button::Cross),
            ("KeyS", Button::Square),
            ("KeyC", Button::Select),
            ("KeyV", Button::Start),
        ];
        Self {
            bindings: pairs
                .into_iter()
                .map(|(key, button)| (key.to_string(), button))
                .collect(),
        }
    }
}

impl KeyBindings {
    /// Resolves a physical key; logical button names pass through so
    /// scripts can use either.
    pub fn resolve(&self, key: &str) -> Option<Button> {
        self.bindings.get(key).copied().or_else(|| {
            Button::ALL
                .into_iter()
                .find(|button| format!("{button:?}").eq_ignore_ascii_case(key))
        })
    }

    /// Presses every resolvable key; returns the names that did not resolve.
    pub fn apply<'a, I>(&self, keys: I, input: &mut InputState) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut unknown = Vec::new();
        for key in keys {
            match self.resolve(key) {
                Some(button) => input.press(button),
                None => unknown.push(key),
            }
        }
        unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = EngineConfig::from_json_file(Some(&dir.path().join("absent.json")))?;
        assert_eq!(config, EngineConfig::default());
        assert_eq!(EngineConfig::from_json_file(None)?, EngineConfig::default());
        Ok(())
    }

    #[test]
    fn partial_file_overrides_only_given_fields() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "fps": 30, "starting_site": "B", "key_bindings": { "Space": "Circle" } }"#,
        )?;
        let config = EngineConfig::from_json_file(Some(&path))?;
        assert_eq!(config.fps, 30);
        assert_eq!(config.starting_site, Site::B);
        assert_eq!(config.time_multiplier, 1.0);
        assert_eq!(config.key_bindings.resolve("Space"), Some(Button::Circle));
        assert_eq!(config.key_bindings.resolve("ArrowLeft"), None);
        Ok(())
    }

    #[test]
    fn bindings_accept_button_names_and_report_unknown_keys() {
        let bindings = KeyBindings::default();
        let mut input = InputState::default();
        let unknown = bindings.apply(["ArrowUp", "circle", "F13"], &mut input);
        assert!(input.is_pressed(Button::Up));
        assert!(input.is_pressed(Button::Circle));
        assert_eq!(unknown, vec!["F13"]);
    }
}
