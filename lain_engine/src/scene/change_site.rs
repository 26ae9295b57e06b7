use std::f32::consts::{PI, TAU};

use lain_site::Site;

use super::{FrameContext, Scene};
use crate::animation::{AnimationStep, Axis, Motion, RotationTarget, Sprite, Transform};
use crate::error::EngineResult;
use crate::resources::TextureKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChangePhase {
    SpinOut,
    SpinIn,
}

/// Spins the current site away and the other one in.
#[derive(Debug)]
pub struct ChangeSiteScene {
    from: Site,
    to: Site,
    phase: ChangePhase,
    rig: Sprite,
}

impl ChangeSiteScene {
    pub fn new(entered_at: f64, from: Site) -> Self {
        let to = from.other();
        log::info!("changing site {from} -> {to} at {entered_at:.2}s");
        let mut rig = Sprite::new("site_rig", Transform::default());
        rig.push(
            AnimationStep::new()
                .label("spin_out")
                .rotation(Motion::new(RotationTarget::Axis(Axis::Y, TAU), 2.0 * PI))
                .opacity(Motion::new(0.0, 1.0)),
        );
        Self {
            from,
            to,
            phase: ChangePhase::SpinOut,
            rig,
        }
    }

    pub fn from(&self) -> Site {
        self.from
    }

    pub fn to(&self) -> Site {
        self.to
    }

    pub fn mode_label(&self) -> &'static str {
        match self.phase {
            ChangePhase::SpinOut => "spin_out",
            ChangePhase::SpinIn => "spin_in",
        }
    }

    pub fn sprites(&self) -> Vec<&Sprite> {
        vec![&self.rig]
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<Scene>> {
        ctx.resources.texture(TextureKey::SiteBackground)?;
        self.rig.animate(&ctx.time);
        if !self.rig.is_idle() {
            return Ok(None);
        }
        match self.phase {
            ChangePhase::SpinOut => {
                ctx.game.site = self.to;
                ctx.game.place_cursors(ctx.content);
                self.phase = ChangePhase::SpinIn;
                self.rig.transform = Transform::default().with_opacity(0.0);
                self.rig.push(
                    AnimationStep::new()
                        .label("spin_in")
                        .opacity(Motion::new(1.0, 2.0)),
                );
                Ok(None)
            }
            ChangePhase::SpinIn => ctx.site_scene().map(Some),
        }
    }
}
