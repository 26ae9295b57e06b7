//! Scene state machine.
//!
//! Exactly one [`Scene`] is live. The driver calls [`Scene::update`] once per
//! frame; a returned scene replaces the current one on the next frame. Every
//! scene owns its sprites and deferred events and drains both inside its own
//! update, so nothing outlives the scene that created it.

mod boot;
mod change_site;
mod debug;
mod end;
mod gate;
mod idle;
mod loading;
mod media;
mod pause;
mod polytan;
mod site;
mod sskn;
mod tak;

use lain_site::{Node, NodeKind, SiteContent, SiteView};
use serde::Serialize;

pub use boot::{BootMenuItem, BootMode, BootScene, BootStatus};
pub use change_site::ChangeSiteScene;
pub use debug::DebugScene;
pub use end::{EndPhase, EndScene};
pub use gate::GateScene;
pub use idle::{IdleScene, IDLE_MEDIA};
pub use loading::LoadingScene;
pub use media::{MediaItem, MediaMode, MediaScene, MediaStatus};
pub use pause::{PauseItem, PauseMenu, PauseOutcome, PausePhase, PauseStatus};
pub use polytan::PolytanScene;
pub use site::{SiteMode, SiteScene};
pub use sskn::SsknScene;
pub use tak::TakScene;

use crate::animation::Sprite;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::input::{Button, InputState};
use crate::media::MediaPlayer;
use crate::resources::ResourceRegistry;
use crate::save::SaveStore;
use crate::state::GameState;
use crate::time::TimeContext;

/// Everything a scene may read or touch during one frame.
pub struct FrameContext<'a> {
    pub time: TimeContext,
    pub input: &'a InputState,
    pub game: &'a mut GameState,
    pub camera: &'a mut Sprite,
    pub content: &'a SiteContent,
    pub resources: &'a ResourceRegistry,
    pub media: &'a mut dyn MediaPlayer,
    pub saves: &'a mut dyn SaveStore,
    pub config: &'a EngineConfig,
}

impl<'a> FrameContext<'a> {
    pub fn now(&self) -> f64 {
        self.time.time
    }

    pub fn pressed(&self, button: Button) -> bool {
        self.input.is_pressed(button)
    }

    pub fn site(&self) -> EngineResult<SiteView<'a>> {
        let site = self.game.site;
        self.content.site(site).ok_or(EngineError::MissingSite(site))
    }

    pub fn node(&self, id: &str) -> EngineResult<&'a Node> {
        self.content
            .node(id)
            .ok_or_else(|| EngineError::UnknownNode(id.to_string()))
    }

    /// Visible node under the player's cursor. The resolver only ever lands
    /// on occupied slots, so an empty one here means the cursor is stale.
    pub fn cursor_node(&self) -> EngineResult<&'a Node> {
        let cursor = self.game.cursor();
        self.site()?
            .node_at(&cursor)
            .filter(|node| self.game.is_visible(node))
            .ok_or(EngineError::EmptySlot {
                level: cursor.level,
                segment: cursor.site_segment,
                row: cursor.row(),
                col: cursor.col(),
            })
    }

    /// Fresh site scene at the player's current cursor.
    pub fn site_scene(&self) -> EngineResult<Scene> {
        SiteScene::new(self.now(), self.game, self.content).map(Scene::Site)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SceneKind {
    Boot,
    Site,
    Gate,
    Media,
    Sskn,
    Polytan,
    ChangeSite,
    End,
    Idle,
    Tak,
    Loading,
    Debug,
}

#[derive(Debug)]
pub enum Scene {
    Boot(BootScene),
    Site(SiteScene),
    Gate(GateScene),
    Media(MediaScene),
    Sskn(SsknScene),
    Polytan(PolytanScene),
    ChangeSite(ChangeSiteScene),
    End(EndScene),
    Idle(IdleScene),
    Tak(TakScene),
    Loading(LoadingScene),
    Debug(DebugScene),
}

impl Scene {
    pub fn kind(&self) -> SceneKind {
        match self {
            Scene::Boot(_) => SceneKind::Boot,
            Scene::Site(_) => SceneKind::Site,
            Scene::Gate(_) => SceneKind::Gate,
            Scene::Media(_) => SceneKind::Media,
            Scene::Sskn(_) => SceneKind::Sskn,
            Scene::Polytan(_) => SceneKind::Polytan,
            Scene::ChangeSite(_) => SceneKind::ChangeSite,
            Scene::End(_) => SceneKind::End,
            Scene::Idle(_) => SceneKind::Idle,
            Scene::Tak(_) => SceneKind::Tak,
            Scene::Loading(_) => SceneKind::Loading,
            Scene::Debug(_) => SceneKind::Debug,
        }
    }

    /// Runs one frame of the active scene. `Ok(Some(next))` asks the driver
    /// to swap scenes before the following frame.
    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<Scene>> {
        match self {
            Scene::Boot(scene) => scene.update(ctx),
            Scene::Site(scene) => scene.update(ctx),
            Scene::Gate(scene) => scene.update(ctx),
            Scene::Media(scene) => scene.update(ctx),
            Scene::Sskn(scene) => scene.update(ctx),
            Scene::Polytan(scene) => scene.update(ctx),
            Scene::ChangeSite(scene) => scene.update(ctx),
            Scene::End(scene) => scene.update(ctx),
            Scene::Idle(scene) => scene.update(ctx),
            Scene::Tak(scene) => scene.update(ctx),
            Scene::Loading(scene) => scene.update(ctx),
            Scene::Debug(scene) => scene.update(ctx),
        }
    }

    /// Short name of the scene's internal sub-state, for traces and HUDs.
    pub fn mode_label(&self) -> &'static str {
        match self {
            Scene::Boot(scene) => scene.mode_label(),
            Scene::Site(scene) => scene.mode_label(),
            Scene::Gate(scene) => scene.mode_label(),
            Scene::Media(scene) => scene.mode_label(),
            Scene::Sskn(scene) => scene.mode_label(),
            Scene::Polytan(scene) => scene.mode_label(),
            Scene::ChangeSite(scene) => scene.mode_label(),
            Scene::End(scene) => scene.mode_label(),
            Scene::Idle(scene) => scene.mode_label(),
            Scene::Tak(scene) => scene.mode_label(),
            Scene::Loading(scene) => scene.mode_label(),
            Scene::Debug(scene) => scene.mode_label(),
        }
    }

    /// Renderables owned by the scene, in draw order.
    pub fn sprites(&self) -> Vec<&Sprite> {
        match self {
            Scene::Boot(scene) => scene.sprites(),
            Scene::Site(scene) => scene.sprites(),
            Scene::Gate(scene) => scene.sprites(),
            Scene::Media(scene) => scene.sprites(),
            Scene::Sskn(scene) => scene.sprites(),
            Scene::Polytan(scene) => scene.sprites(),
            Scene::ChangeSite(scene) => scene.sprites(),
            Scene::End(scene) => scene.sprites(),
            Scene::Idle(scene) => scene.sprites(),
            Scene::Tak(scene) => scene.sprites(),
            Scene::Loading(scene) => scene.sprites(),
            Scene::Debug(_) => Vec::new(),
        }
    }

    /// Scene opened by selecting `node` on the site.
    pub fn for_node(node: &Node, entered_at: f64) -> Scene {
        match node.kind {
            NodeKind::Media | NodeKind::Movie => Scene::Media(MediaScene::new(entered_at, node)),
            NodeKind::Tak => Scene::Tak(TakScene::new(entered_at, node)),
            NodeKind::Sskn => Scene::Sskn(SsknScene::new(entered_at, node)),
            NodeKind::Polytan => Scene::Polytan(PolytanScene::new(entered_at, node)),
            NodeKind::Gate => Scene::Gate(GateScene::new(entered_at, node)),
            NodeKind::Final => Scene::End(EndScene::new(entered_at, node)),
        }
    }
}
