use glam::Vec3;
use lain_site::Node;

use super::{FrameContext, Scene};
use crate::animation::{AnimationStep, Motion, Sprite, Transform};
use crate::error::EngineResult;
use crate::input::Button;
use crate::resources::TextureKey;

const FADE_SPEED: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TakPhase {
    Intro,
    Talking,
    Outro,
}

/// Lain talks through a TaK clip, then walks off.
#[derive(Debug)]
pub struct TakScene {
    node_id: String,
    media_key: String,
    phase: TakPhase,
    lain: Sprite,
}

impl TakScene {
    pub fn new(entered_at: f64, node: &Node) -> Self {
        log::debug!("tak {} at {entered_at:.2}s", node.id);
        let mut lain = Sprite::new(
            "tak_lain",
            Transform::at(Vec3::new(0.0, -0.5, 1.0)).with_opacity(0.0),
        );
        lain.push(
            AnimationStep::new()
                .label("enter")
                .opacity(Motion::new(1.0, FADE_SPEED)),
        );
        Self {
            node_id: node.id.clone(),
            media_key: node.media_key().to_string(),
            phase: TakPhase::Intro,
            lain,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn mode_label(&self) -> &'static str {
        match self.phase {
            TakPhase::Intro => "intro",
            TakPhase::Talking => "talking",
            TakPhase::Outro => "outro",
        }
    }

    pub fn sprites(&self) -> Vec<&Sprite> {
        vec![&self.lain]
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<Scene>> {
        ctx.resources.texture(TextureKey::NodeIcons)?;
        if self.phase == TakPhase::Talking
            && (ctx.media.is_finished() || ctx.pressed(Button::Cross) || ctx.pressed(Button::Start))
        {
            ctx.media.stop();
            self.leave();
        }

        self.lain.animate(&ctx.time);
        if !self.lain.is_idle() {
            return Ok(None);
        }
        match self.phase {
            TakPhase::Intro => {
                if ctx.media.play(&self.media_key) {
                    self.phase = TakPhase::Talking;
                } else {
                    log::warn!("tak {} has no playable clip", self.node_id);
                    self.leave();
                }
                Ok(None)
            }
            TakPhase::Talking => Ok(None),
            TakPhase::Outro => ctx.site_scene().map(Some),
        }
    }

    fn leave(&mut self) {
        self.phase = TakPhase::Outro;
        self.lain.push(
            AnimationStep::new()
                .label("exit")
                .opacity(Motion::new(0.0, FADE_SPEED)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::ClockedMediaPlayer;
    use crate::scene::testing::Harness;
    use crate::scene::SceneKind;

    #[test]
    fn plays_the_clip_then_returns_to_the_site() {
        let mut harness = Harness::new();
        let mut scene = TakScene::new(0.0, harness.content.node("Tak008").expect("demo node"));
        let mut saw_talking = false;
        let next = harness.run_until_transition(60, |ctx| {
            let next = scene.update(ctx);
            saw_talking |= scene.mode_label() == "talking";
            next
        });
        assert!(saw_talking);
        assert_eq!(next.map(|scene| scene.kind()), Some(SceneKind::Site));
        assert_eq!(harness.media.current(), None);
    }

    #[test]
    fn missing_clip_skips_straight_to_the_outro() {
        let mut harness = Harness::new();
        harness.media = ClockedMediaPlayer::new(1.0).with_missing("tak008");
        let mut scene = TakScene::new(0.0, harness.content.node("Tak008").expect("demo node"));
        let next = harness.run_until_transition(20, |ctx| scene.update(ctx));
        assert_eq!(next.map(|scene| scene.kind()), Some(SceneKind::Site));
    }
}
