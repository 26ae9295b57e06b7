//! JSON frame trace for headless runs: one record per rendered frame.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use lain_site::{CursorLocation, Site};
use serde::Serialize;

use crate::animation::{Sprite, Transform};
use crate::driver::{FrameView, Renderer};
use crate::scene::SceneKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpriteTrace {
    pub name: String,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub opacity: f32,
}

impl SpriteTrace {
    fn capture(name: &str, transform: &Transform) -> Self {
        Self {
            name: name.to_string(),
            position: transform.position.to_array(),
            rotation: transform.rotation.to_array(),
            scale: transform.scale.to_array(),
            opacity: transform.opacity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameTrace {
    pub frame: u64,
    pub time: f64,
    pub scene: SceneKind,
    pub mode: &'static str,
    pub site: Site,
    pub cursor: CursorLocation,
    pub camera: SpriteTrace,
    pub sprites: Vec<SpriteTrace>,
}

/// Renderer that records frames instead of drawing them.
#[derive(Debug, Default)]
pub struct TraceRecorder {
    frames: Vec<FrameTrace>,
    current: Option<FrameTrace>,
}

impl TraceRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> &[FrameTrace] {
        &self.frames
    }

    /// Scene kinds in the order they were first shown, collapsing repeats.
    pub fn scene_sequence(&self) -> Vec<SceneKind> {
        let mut sequence: Vec<SceneKind> = Vec::new();
        for frame in &self.frames {
            if sequence.last() != Some(&frame.scene) {
                sequence.push(frame.scene);
            }
        }
        sequence
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.frames).context("serializing frame trace")?;
        fs::write(path, json).with_context(|| format!("writing trace {}", path.display()))
    }
}

impl Renderer for TraceRecorder {
    fn begin_frame(&mut self, view: &FrameView<'_>) {
        self.current = Some(FrameTrace {
            frame: view.frame,
            time: view.time,
            scene: view.scene,
            mode: view.mode,
            site: view.game.site,
            cursor: view.game.cursor(),
            camera: SpriteTrace::capture("camera", view.camera),
            sprites: Vec::new(),
        });
    }

    fn draw(&mut self, sprite: &Sprite) {
        if let Some(frame) = self.current.as_mut() {
            frame
                .sprites
                .push(SpriteTrace::capture(sprite.name, &sprite.transform));
        }
    }

    fn end_frame(&mut self) {
        if let Some(frame) = self.current.take() {
            self.frames.push(frame);
        }
    }
}
