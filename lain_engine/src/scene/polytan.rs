use glam::Vec3;
use lain_site::Node;

use super::{FrameContext, Scene};
use crate::animation::{AnimationStep, CubicBezier, CurveMotion, Motion, Sprite, Transform};
use crate::error::EngineResult;
use crate::resources::TextureKey;
use crate::state::PolytanPart;

const PIECE_SPEED: f32 = 1.0;
const PIECE_START: Vec3 = Vec3::new(-4.0, 3.0, 0.0);

/// Where each piece sits on the assembled body.
fn part_slot(part: PolytanPart) -> Vec3 {
    match part {
        PolytanPart::Body => Vec3::new(0.0, 0.0, 0.0),
        PolytanPart::Head => Vec3::new(0.0, 1.2, 0.0),
        PolytanPart::LeftArm => Vec3::new(-0.8, 0.3, 0.0),
        PolytanPart::RightArm => Vec3::new(0.8, 0.3, 0.0),
        PolytanPart::LeftLeg => Vec3::new(-0.4, -1.2, 0.0),
        PolytanPart::RightLeg => Vec3::new(0.4, -1.2, 0.0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PolytanPhase {
    Unlocking,
    Assembling,
    Done,
}

/// Flies the next body piece onto the doll, then waits for any button.
#[derive(Debug)]
pub struct PolytanScene {
    node_id: String,
    phase: PolytanPhase,
    unlocked: Option<PolytanPart>,
    body: Sprite,
    piece: Sprite,
}

impl PolytanScene {
    pub fn new(entered_at: f64, node: &Node) -> Self {
        log::debug!("polytan {} at {entered_at:.2}s", node.id);
        Self {
            node_id: node.id.clone(),
            phase: PolytanPhase::Unlocking,
            unlocked: None,
            body: Sprite::new("polytan_body", Transform::default()),
            piece: Sprite::new("polytan_piece", Transform::at(PIECE_START).with_opacity(0.0)),
        }
    }

    pub fn unlocked(&self) -> Option<PolytanPart> {
        self.unlocked
    }

    pub fn mode_label(&self) -> &'static str {
        match self.phase {
            PolytanPhase::Unlocking => "unlocking",
            PolytanPhase::Assembling => "assembling",
            PolytanPhase::Done => "done",
        }
    }

    pub fn piece(&self) -> &Sprite {
        &self.piece
    }

    pub fn sprites(&self) -> Vec<&Sprite> {
        vec![&self.body, &self.piece]
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<Scene>> {
        ctx.resources.texture(TextureKey::PolytanBody)?;
        match self.phase {
            PolytanPhase::Unlocking => {
                self.unlocked = ctx.game.unlock_next_part();
                match self.unlocked {
                    Some(part) => {
                        log::info!("{} unlocked {part:?}", self.node_id);
                        let slot = part_slot(part);
                        let curve = CubicBezier::new(
                            PIECE_START,
                            Vec3::new(-2.0, 4.0, 0.0),
                            slot + Vec3::new(0.0, 2.0, 0.0),
                            slot,
                        );
                        self.piece.push(
                            AnimationStep::new()
                                .label("fly_in")
                                .curve(CurveMotion::new(curve, PIECE_SPEED))
                                .opacity(Motion::new(1.0, 4.0)),
                        );
                        self.phase = PolytanPhase::Assembling;
                    }
                    None => {
                        log::info!("{}: polytan already complete", self.node_id);
                        self.phase = PolytanPhase::Done;
                    }
                }
            }
            PolytanPhase::Assembling => {
                if self.piece.is_idle() {
                    self.phase = PolytanPhase::Done;
                }
            }
            PolytanPhase::Done => {
                if ctx.input.any_pressed() {
                    return ctx.site_scene().map(Some);
                }
            }
        }
        self.body.animate(&ctx.time);
        self.piece.animate(&ctx.time);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Button;
    use crate::scene::testing::Harness;
    use crate::scene::SceneKind;

    #[test]
    fn piece_follows_the_curve_onto_its_slot() {
        let mut harness = Harness::new();
        let mut scene = PolytanScene::new(0.0, harness.content.node("Poly009").expect("demo node"));
        for _ in 0..12 {
            let next = harness
                .frame(&[], |ctx| scene.update(ctx))
                .expect("polytan update");
            assert!(next.is_none());
        }
        assert_eq!(scene.unlocked(), Some(PolytanPart::Body));
        assert_eq!(scene.mode_label(), "done");
        assert_eq!(scene.piece().transform.position, part_slot(PolytanPart::Body));

        let next = harness
            .frame(&[Button::Circle], |ctx| scene.update(ctx))
            .expect("polytan update");
        assert_eq!(next.map(|scene| scene.kind()), Some(SceneKind::Site));
    }

    #[test]
    fn complete_doll_goes_straight_to_done() {
        let mut harness = Harness::new();
        harness.game.polytan_parts = PolytanPart::ALL.into_iter().collect();
        let mut scene = PolytanScene::new(0.0, harness.content.node("Poly009").expect("demo node"));
        harness
            .frame(&[], |ctx| scene.update(ctx))
            .expect("polytan update");
        assert_eq!(scene.unlocked(), None);
        assert_eq!(scene.mode_label(), "done");
    }
}
