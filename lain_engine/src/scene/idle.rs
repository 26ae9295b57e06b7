use super::{FrameContext, Scene};
use crate::animation::{AnimationStep, Motion, Sprite, Transform};
use crate::error::EngineResult;
use crate::state::GameState;

/// Clips cycled through while the player is away.
pub const IDLE_MEDIA: [&str; 3] = ["idle_lain_room", "idle_city", "idle_wired"];

/// Plays an idle clip until any input or the clip ends.
#[derive(Debug)]
pub struct IdleScene {
    media_key: &'static str,
    started: bool,
    curtain: Sprite,
}

impl IdleScene {
    /// The clip rotates with the number of nodes seen so far.
    pub fn new(entered_at: f64, game: &GameState) -> Self {
        let media_key = IDLE_MEDIA[game.viewed_nodes.len() % IDLE_MEDIA.len()];
        log::debug!("idle clip {media_key} at {entered_at:.2}s");
        let mut curtain = Sprite::new("idle_curtain", Transform::default());
        curtain.push(
            AnimationStep::new()
                .label("curtain_up")
                .opacity(Motion::new(0.0, 2.0)),
        );
        Self {
            media_key,
            started: false,
            curtain,
        }
    }

    pub fn media_key(&self) -> &'static str {
        self.media_key
    }

    pub fn mode_label(&self) -> &'static str {
        if self.started {
            "playing"
        } else {
            "starting"
        }
    }

    pub fn sprites(&self) -> Vec<&Sprite> {
        vec![&self.curtain]
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<Scene>> {
        if !self.started {
            self.started = true;
            if !ctx.media.play(self.media_key) {
                return ctx.site_scene().map(Some);
            }
        } else if ctx.input.any_pressed() || ctx.media.is_finished() {
            ctx.media.stop();
            return ctx.site_scene().map(Some);
        }
        self.curtain.animate(&ctx.time);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Button;
    use crate::media::ClockedMediaPlayer;
    use crate::scene::testing::Harness;
    use crate::scene::SceneKind;

    #[test]
    fn any_button_returns_to_the_site() {
        let mut harness = Harness::new();
        let mut scene = IdleScene::new(0.0, &harness.game);
        assert_eq!(scene.media_key(), IDLE_MEDIA[0]);
        harness
            .frame(&[], |ctx| scene.update(ctx))
            .expect("idle update");
        assert_eq!(harness.media.current(), Some(IDLE_MEDIA[0]));
        let next = harness
            .frame(&[Button::Square], |ctx| scene.update(ctx))
            .expect("idle update");
        assert_eq!(next.map(|scene| scene.kind()), Some(SceneKind::Site));
        assert_eq!(harness.media.current(), None);
    }

    #[test]
    fn clip_end_returns_to_the_site() {
        let mut harness = Harness::new();
        harness.game.viewed_nodes.insert("Lda001".to_string());
        let mut scene = IdleScene::new(0.0, &harness.game);
        assert_eq!(scene.media_key(), IDLE_MEDIA[1]);
        let next = harness.run_until_transition(20, |ctx| scene.update(ctx));
        assert_eq!(next.map(|scene| scene.kind()), Some(SceneKind::Site));
    }

    #[test]
    fn unplayable_clip_returns_immediately() {
        let mut harness = Harness::new();
        harness.media = ClockedMediaPlayer::new(1.0).with_missing(IDLE_MEDIA[0]);
        let mut scene = IdleScene::new(0.0, &harness.game);
        let next = harness
            .frame(&[], |ctx| scene.update(ctx))
            .expect("idle update");
        assert_eq!(next.map(|scene| scene.kind()), Some(SceneKind::Site));
    }
}
