use glam::Vec3;
use lain_site::Node;

use super::{BootScene, FrameContext, Scene};
use crate::animation::{AnimationStep, CubicBezier, CurveMotion, Motion, Sprite, Transform};
use crate::error::EngineResult;
use crate::input::Button;
use crate::resources::TextureKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndPhase {
    Starting,
    Playing,
    /// "Continue?" with Yes/No.
    Prompt,
    /// The player declined; the final screen stays up.
    Exited,
}

/// Ending sequence reached through the final node.
#[derive(Debug)]
pub struct EndScene {
    media_key: String,
    phase: EndPhase,
    yes_selected: bool,
    lain: Sprite,
}

impl EndScene {
    pub fn new(entered_at: f64, node: &Node) -> Self {
        log::info!("ending reached through {} at {entered_at:.2}s", node.id);
        let mut lain = Sprite::new("end_lain", Transform::at(Vec3::new(0.0, -3.0, 0.0)));
        let path = CubicBezier::new(
            Vec3::new(0.0, -3.0, 0.0),
            Vec3::new(1.5, -2.0, 0.0),
            Vec3::new(-1.5, -1.0, 0.0),
            Vec3::ZERO,
        );
        lain.push(
            AnimationStep::new()
                .label("rise")
                .curve(CurveMotion::new(path, 0.5)),
        );
        Self {
            media_key: node.media_key().to_string(),
            phase: EndPhase::Starting,
            yes_selected: true,
            lain,
        }
    }

    pub fn phase(&self) -> EndPhase {
        self.phase
    }

    pub fn mode_label(&self) -> &'static str {
        match self.phase {
            EndPhase::Starting => "starting",
            EndPhase::Playing => "playing",
            EndPhase::Prompt => "prompt",
            EndPhase::Exited => "exited",
        }
    }

    pub fn yes_selected(&self) -> bool {
        self.yes_selected
    }

    pub fn sprites(&self) -> Vec<&Sprite> {
        vec![&self.lain]
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<Scene>> {
        ctx.resources.texture(TextureKey::EndScreen)?;
        match self.phase {
            EndPhase::Starting => {
                ctx.game.final_video_viewed = true;
                self.phase = if ctx.media.play(&self.media_key) {
                    EndPhase::Playing
                } else {
                    log::warn!("ending clip {} unavailable", self.media_key);
                    EndPhase::Prompt
                };
            }
            EndPhase::Playing => {
                if ctx.media.is_finished() && self.lain.is_idle() {
                    ctx.media.stop();
                    self.phase = EndPhase::Prompt;
                }
            }
            EndPhase::Prompt => {
                if ctx.pressed(Button::Left) || ctx.pressed(Button::Right) {
                    self.yes_selected = !self.yes_selected;
                }
                if ctx.pressed(Button::Circle) {
                    if self.yes_selected {
                        let has_save = ctx.saves.has_save();
                        return Ok(Some(Scene::Boot(BootScene::new(ctx.now(), has_save))));
                    }
                    self.phase = EndPhase::Exited;
                    self.lain.push(
                        AnimationStep::new()
                            .label("fade")
                            .opacity(Motion::new(0.0, 1.0)),
                    );
                }
            }
            EndPhase::Exited => {}
        }
        self.lain.animate(&ctx.time);
        Ok(None)
    }
}
