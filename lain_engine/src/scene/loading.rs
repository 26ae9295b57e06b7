use std::f32::consts::TAU;

use super::{FrameContext, Scene};
use crate::animation::{AnimationStep, Axis, Motion, RotationTarget, Sprite, Transform};
use crate::error::EngineResult;
use crate::events::{process_events, DeferredQueue, EventOwner};
use crate::resources::TextureKey;

/// Seconds the loading screen stays up.
const LOADING_SECS: f64 = 1.5;

/// Spinner shown between boot and the site.
#[derive(Debug)]
pub struct LoadingScene {
    ready: bool,
    spinner: Sprite,
    events: DeferredQueue<LoadingScene>,
}

impl EventOwner for LoadingScene {
    fn deferred(&mut self) -> &mut DeferredQueue<Self> {
        &mut self.events
    }
}

impl LoadingScene {
    pub fn new(entered_at: f64) -> Self {
        let mut spinner = Sprite::new("loading_spinner", Transform::default());
        spinner.push(
            AnimationStep::new()
                .label("spin")
                .rotation(Motion::new(RotationTarget::Axis(Axis::Z, 2.0 * TAU), TAU)),
        );
        let mut events = DeferredQueue::default();
        events.push(entered_at + LOADING_SECS, |scene: &mut LoadingScene, _| {
            scene.ready = true;
        });
        Self {
            ready: false,
            spinner,
            events,
        }
    }

    pub fn mode_label(&self) -> &'static str {
        if self.ready {
            "ready"
        } else {
            "loading"
        }
    }

    pub fn sprites(&self) -> Vec<&Sprite> {
        vec![&self.spinner]
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<Scene>> {
        ctx.resources.texture(TextureKey::LoadingSpinner)?;
        self.spinner.animate(&ctx.time);
        process_events(self, ctx.now());
        if self.ready {
            return ctx.site_scene().map(Some);
        }
        Ok(None)
    }
}
