use glam::Vec3;
use lain_site::Node;

use super::{FrameContext, Scene};
use crate::animation::{AnimationStep, Motion, Sprite, Transform};
use crate::error::EngineResult;
use crate::input::Button;
use crate::resources::TextureKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SsknPhase {
    Confirm,
    Upgrading,
}

/// Ok/Cancel prompt that raises the SSkn level.
#[derive(Debug)]
pub struct SsknScene {
    node_id: String,
    ok_selected: bool,
    phase: SsknPhase,
    new_level: Option<u8>,
    icon: Sprite,
}

impl SsknScene {
    pub fn new(entered_at: f64, node: &Node) -> Self {
        log::debug!("sskn {} at {entered_at:.2}s", node.id);
        Self {
            node_id: node.id.clone(),
            ok_selected: true,
            phase: SsknPhase::Confirm,
            new_level: None,
            icon: Sprite::new("sskn_icon", Transform::default()),
        }
    }

    pub fn mode_label(&self) -> &'static str {
        match self.phase {
            SsknPhase::Confirm => "confirm",
            SsknPhase::Upgrading => "upgrading",
        }
    }

    pub fn ok_selected(&self) -> bool {
        self.ok_selected
    }

    pub fn new_level(&self) -> Option<u8> {
        self.new_level
    }

    pub fn sprites(&self) -> Vec<&Sprite> {
        vec![&self.icon]
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<Scene>> {
        ctx.resources.texture(TextureKey::SsknIcon)?;
        if self.phase == SsknPhase::Confirm {
            if ctx.pressed(Button::Left) || ctx.pressed(Button::Right) {
                self.ok_selected = !self.ok_selected;
            }
            if ctx.pressed(Button::Cross) || (ctx.pressed(Button::Circle) && !self.ok_selected) {
                return ctx.site_scene().map(Some);
            }
            if ctx.pressed(Button::Circle) {
                let level = ctx.game.raise_sskn();
                log::info!("{} raised sskn to {level}", self.node_id);
                self.new_level = Some(level);
                self.phase = SsknPhase::Upgrading;
                self.icon.push(
                    AnimationStep::new()
                        .label("pulse")
                        .scale(Motion::new(Vec3::splat(1.5), 4.0))
                        .uniform("glow", Motion::new(1.0, 4.0)),
                );
                self.icon.push(
                    AnimationStep::new()
                        .label("rest")
                        .scale(Motion::new(Vec3::ONE, 4.0))
                        .uniform("glow", Motion::new(0.0, 2.0)),
                );
            }
        }

        self.icon.animate(&ctx.time);
        if self.phase == SsknPhase::Upgrading && self.icon.is_idle() {
            return ctx.site_scene().map(Some);
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::testing::Harness;
    use crate::scene::SceneKind;

    #[test]
    fn ok_raises_the_level_after_the_pulse() {
        let mut harness = Harness::new();
        let mut scene = SsknScene::new(0.0, harness.content.node("Sskn005").expect("demo node"));
        let next = harness
            .frame(&[Button::Circle], |ctx| scene.update(ctx))
            .expect("sskn update");
        assert!(next.is_none());
        assert_eq!(harness.game.sskn_level, 1);
        assert_eq!(scene.new_level(), Some(1));
        let next = harness.run_until_transition(20, |ctx| scene.update(ctx));
        assert_eq!(next.map(|scene| scene.kind()), Some(SceneKind::Site));
    }

    #[test]
    fn cancel_leaves_the_level_alone() {
        let mut harness = Harness::new();
        let mut scene = SsknScene::new(0.0, harness.content.node("Sskn005").expect("demo node"));
        harness
            .frame(&[Button::Right], |ctx| scene.update(ctx))
            .expect("sskn update");
        assert!(!scene.ok_selected());
        let next = harness
            .frame(&[Button::Circle], |ctx| scene.update(ctx))
            .expect("sskn update");
        assert_eq!(next.map(|scene| scene.kind()), Some(SceneKind::Site));
        assert_eq!(harness.game.sskn_level, 0);
    }
}
