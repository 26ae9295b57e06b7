use glam::Vec3;
use lain_site::Node;

use super::{FrameContext, Scene};
use crate::animation::{animate_all, AnimationStep, Motion, Sprite, Transform};
use crate::error::EngineResult;
use crate::resources::TextureKey;

const MIRROR_COUNT: usize = 4;
const MIRROR_STAGGER: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GatePhase {
    Raising,
    Opening,
    Open,
}

/// Opens the next gate level behind a row of glowing mirrors.
#[derive(Debug)]
pub struct GateScene {
    node_id: String,
    phase: GatePhase,
    new_level: Option<u8>,
    mirrors: Vec<Sprite>,
}

impl GateScene {
    pub fn new(entered_at: f64, node: &Node) -> Self {
        log::debug!("gate {} at {entered_at:.2}s", node.id);
        let mirrors = (0..MIRROR_COUNT)
            .map(|index| {
                let x = index as f32 - (MIRROR_COUNT as f32 - 1.0) / 2.0;
                Sprite::new(
                    "gate_mirror",
                    Transform::at(Vec3::new(x, 0.0, 0.0))
                        .with_opacity(0.0)
                        .with_uniform("glow", 0.0),
                )
            })
            .collect();
        Self {
            node_id: node.id.clone(),
            phase: GatePhase::Raising,
            new_level: None,
            mirrors,
        }
    }

    pub fn new_level(&self) -> Option<u8> {
        self.new_level
    }

    pub fn mode_label(&self) -> &'static str {
        match self.phase {
            GatePhase::Raising => "raising",
            GatePhase::Opening => "opening",
            GatePhase::Open => "open",
        }
    }

    pub fn sprites(&self) -> Vec<&Sprite> {
        self.mirrors.iter().collect()
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<Scene>> {
        ctx.resources.texture(TextureKey::GateMirror)?;
        match self.phase {
            GatePhase::Raising => {
                let level = ctx.game.raise_gate();
                log::info!("{} raised the gate to {level}", self.node_id);
                self.new_level = Some(level);
                for (index, mirror) in self.mirrors.iter_mut().enumerate() {
                    let delay = index as f32 * MIRROR_STAGGER;
                    mirror.push(
                        AnimationStep::new()
                            .label("mirror_in")
                            .opacity(Motion::new(1.0, 4.0).delayed(delay))
                            .uniform("glow", Motion::new(1.0, 2.0).delayed(delay)),
                    );
                }
                self.phase = GatePhase::Opening;
            }
            GatePhase::Opening => {}
            GatePhase::Open => {
                if ctx.input.any_pressed() {
                    return ctx.site_scene().map(Some);
                }
            }
        }

        let idle = animate_all(self.mirrors.iter_mut(), &ctx.time);
        if self.phase == GatePhase::Opening && idle {
            self.phase = GatePhase::Open;
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationTarget;
    use crate::input::Button;
    use crate::scene::testing::Harness;
    use crate::scene::SceneKind;
    use crate::state::MAX_GATE_LEVEL;

    #[test]
    fn raises_the_gate_once_and_lights_every_mirror() {
        let mut harness = Harness::new();
        let mut scene = GateScene::new(0.0, harness.content.node("Gate007").expect("demo node"));
        harness
            .frame(&[Button::Circle], |ctx| scene.update(ctx))
            .expect("gate update");
        assert_eq!(harness.game.gate_level, 1);
        for _ in 0..20 {
            let next = harness
                .frame(&[], |ctx| scene.update(ctx))
                .expect("gate update");
            assert!(next.is_none());
        }
        assert_eq!(harness.game.gate_level, 1);
        assert_eq!(scene.mode_label(), "open");
        assert!(scene
            .sprites()
            .iter()
            .all(|mirror| mirror.transform.uniform("glow") == Some(1.0)));

        let next = harness
            .frame(&[Button::Cross], |ctx| scene.update(ctx))
            .expect("gate update");
        assert_eq!(next.map(|scene| scene.kind()), Some(SceneKind::Site));
    }

    #[test]
    fn gate_level_saturates() {
        let mut harness = Harness::new();
        harness.game.gate_level = MAX_GATE_LEVEL;
        let mut scene = GateScene::new(0.0, harness.content.node("Gate007").expect("demo node"));
        harness
            .frame(&[], |ctx| scene.update(ctx))
            .expect("gate update");
        assert_eq!(scene.new_level(), Some(MAX_GATE_LEVEL));
    }
}
