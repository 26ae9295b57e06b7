//! Frame driver: owns the live scene and every collaborator, and turns the
//! host's `(time, delta)` ticks into scene updates.

use lain_site::SiteContent;

use crate::animation::{Sprite, Transform};
use crate::config::EngineConfig;
use crate::input::{Button, InputState};
use crate::media::{ClockedMediaPlayer, MediaPlayer};
use crate::resources::ResourceRegistry;
use crate::save::{MemorySaveStore, SaveStore};
use crate::scene::{BootScene, FrameContext, Scene, SceneKind};
use crate::script::InputScript;
use crate::state::GameState;
use crate::time::TimeContext;

/// What a renderer learns about the frame before the sprites arrive.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub frame: u64,
    pub time: f64,
    pub scene: SceneKind,
    pub mode: &'static str,
    pub game: &'a GameState,
    pub camera: &'a Transform,
}

/// Rendering collaborator. The engine hands it plain transforms only.
pub trait Renderer {
    fn begin_frame(&mut self, view: &FrameView<'_>);
    fn draw(&mut self, sprite: &Sprite);
    fn end_frame(&mut self) {}
}

/// Totals reported by a headless run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub scene_changes: usize,
    pub errors: usize,
    pub final_scene: Option<SceneKind>,
}

pub struct Engine {
    scene: Scene,
    pending: Option<Scene>,
    game: GameState,
    camera: Sprite,
    content: SiteContent,
    resources: ResourceRegistry,
    media: Box<dyn MediaPlayer>,
    saves: Box<dyn SaveStore>,
    config: EngineConfig,
    input: InputState,
    frame: u64,
    time: f64,
    scene_changes: usize,
    errors: usize,
    last_error: Option<String>,
}

impl Engine {
    pub fn new(
        content: SiteContent,
        config: EngineConfig,
        media: Box<dyn MediaPlayer>,
        saves: Box<dyn SaveStore>,
    ) -> Self {
        let mut game = GameState::new_game("");
        game.site = config.starting_site;
        game.place_cursors(&content);
        let scene = Scene::Boot(BootScene::new(0.0, saves.has_save()));
        Self {
            scene,
            pending: None,
            game,
            camera: Sprite::new("camera", Transform::default()),
            content,
            resources: ResourceRegistry::headless(),
            media,
            saves,
            config,
            input: InputState::default(),
            frame: 0,
            time: 0.0,
            scene_changes: 0,
            errors: 0,
            last_error: None,
        }
    }

    /// Engine with the clocked media player and an in-memory save slot.
    pub fn headless(content: SiteContent, config: EngineConfig) -> Self {
        let media = ClockedMediaPlayer::new(config.media_duration_secs);
        Self::new(
            content,
            config,
            Box::new(media),
            Box::<MemorySaveStore>::default(),
        )
    }

    pub fn with_resources(mut self, resources: ResourceRegistry) -> Self {
        self.resources = resources;
        self
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_kind(&self) -> SceneKind {
        self.scene.kind()
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    pub fn camera(&self) -> &Sprite {
        &self.camera
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Input for the coming frame; cleared once that frame has run.
    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    pub fn press(&mut self, button: Button) {
        self.input.press(button);
    }

    /// Runs one frame. A scene requested by the previous frame is swapped in
    /// first, then media is ticked, the scene updated and the camera animated.
    /// Scene errors are logged and leave the scene in place.
    pub fn update(&mut self, time_ms: f64, delta_s: f32) {
        if let Some(next) = self.pending.take() {
            log::info!("scene {:?} -> {:?}", self.scene.kind(), next.kind());
            self.scene = next;
            self.scene_changes += 1;
            self.camera.cancel();
            self.camera.transform = Transform::default();
        }

        let time = TimeContext::from_driver(time_ms, delta_s, self.config.time_multiplier);
        self.time = time.time;
        self.media.tick(time.delta);

        let mut ctx = FrameContext {
            time,
            input: &self.input,
            game: &mut self.game,
            camera: &mut self.camera,
            content: &self.content,
            resources: &self.resources,
            media: &mut *self.media,
            saves: &mut *self.saves,
            config: &self.config,
        };
        match self.scene.update(&mut ctx) {
            Ok(next) => self.pending = next,
            Err(err) => {
                log::error!("{:?} update failed: {err}", self.scene.kind());
                self.errors += 1;
                self.last_error = Some(err.to_string());
            }
        }

        self.camera.animate(&time);
        self.input.reset();
        self.frame += 1;
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        let view = FrameView {
            frame: self.frame,
            time: self.time,
            scene: self.scene.kind(),
            mode: self.scene.mode_label(),
            game: &self.game,
            camera: &self.camera.transform,
        };
        renderer.begin_frame(&view);
        for sprite in self.scene.sprites() {
            if sprite.transform.visible {
                renderer.draw(sprite);
            }
        }
        renderer.end_frame();
    }

    /// Drives `frames` fixed-length frames, feeding `script` and rendering
    /// after each one.
    pub fn run_script(
        &mut self,
        script: &InputScript,
        frames: u64,
        renderer: &mut dyn Renderer,
    ) -> RunSummary {
        let delta = self.config.frame_delta();
        let start_changes = self.scene_changes;
        let start_errors = self.errors;
        for frame in 0..frames {
            let unknown = self
                .config
                .key_bindings
                .apply(script.keys_for(frame), &mut self.input);
            for key in unknown {
                log::warn!("frame {frame}: unbound key {key:?}");
            }
            let time_ms = frame as f64 * f64::from(delta) * 1000.0;
            self.update(time_ms, delta);
            self.render(renderer);
        }
        RunSummary {
            frames,
            scene_changes: self.scene_changes - start_changes,
            errors: self.errors - start_errors,
            final_scene: Some(self.scene.kind()),
        }
    }
}
