use lain_site::{Site, SiteContent};

use super::{FrameContext, Scene};
use crate::error::{EngineError, EngineResult};
use crate::input::Button;
use crate::resources::{Glyph, TextureKey};
use crate::state::GameState;

const PAGE: usize = 8;

/// Node list for the current site; Circle teleports the cursor there,
/// ignoring visibility.
#[derive(Debug)]
pub struct DebugScene {
    site: Site,
    entries: Vec<String>,
    selected: usize,
    label: Vec<Glyph>,
}

impl DebugScene {
    pub fn new(entered_at: f64, game: &GameState, content: &SiteContent) -> EngineResult<Self> {
        let view = content
            .site(game.site)
            .ok_or(EngineError::MissingSite(game.site))?;
        let entries: Vec<String> = view.nodes().iter().map(|node| node.id.clone()).collect();
        log::debug!(
            "debug list for site {} with {} nodes at {entered_at:.2}s",
            game.site,
            entries.len()
        );
        Ok(Self {
            site: game.site,
            entries,
            selected: 0,
            label: Vec::new(),
        })
    }

    pub fn mode_label(&self) -> &'static str {
        "list"
    }

    pub fn selected(&self) -> Option<&str> {
        self.entries.get(self.selected).map(String::as_str)
    }

    pub fn label(&self) -> &[Glyph] {
        &self.label
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<Scene>> {
        ctx.resources.texture(TextureKey::DebugFont)?;
        if ctx.pressed(Button::Cross) || self.entries.is_empty() {
            return ctx.site_scene().map(Some);
        }

        let count = self.entries.len();
        if ctx.pressed(Button::Up) {
            self.selected = (self.selected + count - 1) % count;
        } else if ctx.pressed(Button::Down) {
            self.selected = (self.selected + 1) % count;
        } else if ctx.pressed(Button::Left) {
            self.selected = self.selected.saturating_sub(PAGE);
        } else if ctx.pressed(Button::Right) {
            self.selected = (self.selected + PAGE).min(count - 1);
        }
        let id = &self.entries[self.selected];
        self.label = ctx.resources.layout_text(id);

        if ctx.pressed(Button::Circle) {
            let view = ctx
                .content
                .site(self.site)
                .ok_or(EngineError::MissingSite(self.site))?;
            let cursor = view
                .locate(id)
                .ok_or_else(|| EngineError::UnknownNode(id.clone()))?;
            log::info!("debug teleport to {id} at {cursor:?}");
            ctx.game.site = self.site;
            ctx.game.set_cursor(cursor);
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
    use lain_site::CursorLocation;

    #[test]
    fn teleports_even_to_locked_nodes() {
        let mut harness = Harness::new();
        let mut scene = DebugScene::new(0.0, &harness.game, &harness.content).expect("debug scene");
        assert_eq!(scene.selected(), Some("Lda001"));

        while scene.selected() != Some("End013") {
            harness
                .frame(&[Button::Down], |ctx| scene.update(ctx))
                .expect("debug update");
        }
        assert_eq!(scene.label().len(), "End013".len());
        let next = harness
            .frame(&[Button::Circle], |ctx| scene.update(ctx))
            .expect("debug update");
        assert_eq!(next.map(|scene| scene.kind()), Some(SceneKind::Site));
        assert_eq!(harness.game.cursor(), CursorLocation::new(2, 4, 2, 0));
    }

    #[test]
    fn up_wraps_to_the_last_entry() {
        let mut harness = Harness::new();
        let mut scene = DebugScene::new(0.0, &harness.game, &harness.content).expect("debug scene");
        harness
            .frame(&[Button::Up], |ctx| scene.update(ctx))
            .expect("debug update");
        assert_eq!(scene.selected(), Some("End013"));
    }
}
