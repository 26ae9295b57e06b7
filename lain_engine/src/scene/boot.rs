use glam::Vec3;

use super::{FrameContext, LoadingScene, Scene};
use crate::animation::{animate_all, AnimationStep, Motion, Sprite, Transform};
use crate::error::EngineResult;
use crate::events::{process_events, DeferredQueue, EventOwner};
use crate::input::Button;
use crate::resources::{Glyph, TextureKey};
use crate::state::{GameState, MAX_NAME_LEN};

/// Characters offered on the name entry board, laid out row by row.
const BOARD: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    '-', '.',
];
const BOARD_COLUMNS: usize = 10;
const LOGO_SPEED: f32 = 1.0;
/// Seconds a boot status message stays up.
const STATUS_SECS: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMode {
    Intro,
    MainMenu,
    AuthorizeUser,
    LoadData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootMenuItem {
    AuthorizeUser,
    LoadData,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootStatus {
    NoSave,
    LoadFailed,
}

/// Title screen: intro logo, main menu, name entry and load confirmation.
#[derive(Debug)]
pub struct BootScene {
    mode: BootMode,
    menu_item: BootMenuItem,
    board_index: usize,
    name: String,
    name_glyphs: Vec<Glyph>,
    confirm_yes: bool,
    has_save: bool,
    status: Option<BootStatus>,
    logo: Sprite,
    menu: Sprite,
    events: DeferredQueue<BootScene>,
}

impl EventOwner for BootScene {
    fn deferred(&mut self) -> &mut DeferredQueue<Self> {
        &mut self.events
    }
}

impl BootScene {
    pub fn new(entered_at: f64, has_save: bool) -> Self {
        log::debug!("boot at {entered_at:.2}s (save present: {has_save})");
        let mut logo = Sprite::new("boot_logo", Transform::default().with_opacity(0.0));
        logo.push(
            AnimationStep::new()
                .label("logo_in")
                .opacity(Motion::new(1.0, LOGO_SPEED)),
        );
        Self {
            mode: BootMode::Intro,
            menu_item: BootMenuItem::AuthorizeUser,
            board_index: 0,
            name: String::new(),
            name_glyphs: Vec::new(),
            confirm_yes: true,
            has_save,
            status: None,
            logo,
            menu: Sprite::new(
                "boot_menu",
                Transform::at(Vec3::new(0.0, -1.0, 0.0)).with_opacity(0.0),
            ),
            events: DeferredQueue::default(),
        }
    }

    pub fn mode(&self) -> BootMode {
        self.mode
    }

    pub fn mode_label(&self) -> &'static str {
        match self.mode {
            BootMode::Intro => "intro",
            BootMode::MainMenu => "main_menu",
            BootMode::AuthorizeUser => "authorize_user",
            BootMode::LoadData => "load_data",
        }
    }

    pub fn menu_item(&self) -> BootMenuItem {
        self.menu_item
    }

    pub fn status(&self) -> Option<BootStatus> {
        self.status
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_glyphs(&self) -> &[Glyph] {
        &self.name_glyphs
    }

    pub fn board_char(&self) -> char {
        BOARD[self.board_index]
    }

    pub fn sprites(&self) -> Vec<&Sprite> {
        vec![&self.logo, &self.menu]
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<Scene>> {
        ctx.resources.texture(TextureKey::BootBackground)?;
        let now = ctx.now();

        let next = match self.mode {
            BootMode::Intro => {
                if ctx.pressed(Button::Start) || ctx.pressed(Button::Circle) {
                    self.logo.cancel();
                    self.logo.transform.opacity = 1.0;
                    self.show_menu();
                }
                None
            }
            BootMode::MainMenu => {
                self.main_menu(ctx, now);
                None
            }
            BootMode::AuthorizeUser => self.authorize_user(ctx)?,
            BootMode::LoadData => self.load_data(ctx, now)?,
        };

        let idle = animate_all([&mut self.logo, &mut self.menu], &ctx.time);
        if self.mode == BootMode::Intro && idle {
            self.show_menu();
        }
        process_events(self, now);
        Ok(next)
    }

    fn show_menu(&mut self) {
        self.mode = BootMode::MainMenu;
        self.menu.push(
            AnimationStep::new()
                .label("menu_in")
                .position(Motion::new(Vec3::ZERO, 4.0))
                .opacity(Motion::new(1.0, 4.0)),
        );
    }

    fn main_menu(&mut self, ctx: &FrameContext<'_>, now: f64) {
        if ctx.pressed(Button::Up) || ctx.pressed(Button::Down) {
            self.menu_item = match self.menu_item {
                BootMenuItem::AuthorizeUser => BootMenuItem::LoadData,
                BootMenuItem::LoadData => BootMenuItem::AuthorizeUser,
            };
        }
        if !ctx.pressed(Button::Circle) {
            return;
        }
        match self.menu_item {
            BootMenuItem::AuthorizeUser => {
                self.mode = BootMode::AuthorizeUser;
                self.name.clear();
                self.name_glyphs.clear();
                self.board_index = 0;
            }
            BootMenuItem::LoadData if self.has_save => {
                self.mode = BootMode::LoadData;
                self.confirm_yes = true;
            }
            BootMenuItem::LoadData => self.show_status(BootStatus::NoSave, now),
        }
    }

    fn authorize_user(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<Scene>> {
        let last = BOARD.len() - 1;
        if ctx.pressed(Button::Left) {
            self.board_index = self.board_index.saturating_sub(1);
        } else if ctx.pressed(Button::Right) {
            self.board_index = (self.board_index + 1).min(last);
        } else if ctx.pressed(Button::Up) {
            self.board_index = self.board_index.saturating_sub(BOARD_COLUMNS);
        } else if ctx.pressed(Button::Down) {
            self.board_index = (self.board_index + BOARD_COLUMNS).min(last);
        }

        if ctx.pressed(Button::Start) && !self.name.is_empty() {
            log::info!("new game for {}", self.name);
            let mut game = GameState::new_game(&self.name);
            game.site = ctx.config.starting_site;
            game.place_cursors(ctx.content);
            *ctx.game = game;
            return Ok(Some(Scene::Loading(LoadingScene::new(ctx.now()))));
        }

        if ctx.pressed(Button::Circle) && self.name.chars().count() < MAX_NAME_LEN {
            self.name.push(BOARD[self.board_index]);
        } else if ctx.pressed(Button::Cross) && self.name.pop().is_none() {
            self.mode = BootMode::MainMenu;
        }
        self.name_glyphs = ctx.resources.layout_text(&self.name);
        Ok(None)
    }

    fn load_data(&mut self, ctx: &mut FrameContext<'_>, now: f64) -> EngineResult<Option<Scene>> {
        if ctx.pressed(Button::Left) || ctx.pressed(Button::Right) {
            self.confirm_yes = !self.confirm_yes;
        }
        if ctx.pressed(Button::Cross) || (ctx.pressed(Button::Circle) && !self.confirm_yes) {
            self.mode = BootMode::MainMenu;
            return Ok(None);
        }
        if !ctx.pressed(Button::Circle) {
            return Ok(None);
        }

        match ctx.saves.load() {
            Some(mut game) => {
                log::info!("resuming {}", game.player_name);
                game.place_cursors(ctx.content);
                *ctx.game = game;
                Ok(Some(Scene::Loading(LoadingScene::new(now))))
            }
            None => {
                self.show_status(BootStatus::LoadFailed, now);
                self.events.push(now + STATUS_SECS, |scene: &mut BootScene, _| {
                    scene.mode = BootMode::MainMenu;
                });
                Ok(None)
            }
        }
    }

    /// Shows `status` until it expires or another message replaces it.
    fn show_status(&mut self, status: BootStatus, now: f64) {
        self.status = Some(status);
        self.events.push(now + STATUS_SECS, move |scene: &mut BootScene, _| {
            if scene.status == Some(status) {
                scene.status = None;
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::MemorySaveStore;
    use crate::scene::testing::Harness;
    use crate::scene::SceneKind;
    use lain_site::Site;

    fn press(harness: &mut Harness, scene: &mut BootScene, buttons: &[Button]) -> Option<Scene> {
        harness
            .frame(buttons, |ctx| scene.update(ctx))
            .expect("boot update")
    }

    #[test]
    fn intro_fades_into_the_main_menu() {
        let mut harness = Harness::new();
        let mut scene = BootScene::new(0.0, false);
        for _ in 0..10 {
            press(&mut harness, &mut scene, &[]);
        }
        assert_eq!(scene.mode(), BootMode::MainMenu);
        assert_eq!(scene.sprites()[0].transform.opacity, 1.0);
    }

    #[test]
    fn start_skips_the_intro() {
        let mut harness = Harness::new();
        let mut scene = BootScene::new(0.0, false);
        press(&mut harness, &mut scene, &[Button::Start]);
        assert_eq!(scene.mode(), BootMode::MainMenu);
    }

    #[test]
    fn name_entry_starts_a_new_game() {
        let mut harness = Harness::new();
        harness.config.starting_site = Site::B;
        harness.game.gate_level = 3;
        let mut scene = BootScene::new(0.0, false);
        press(&mut harness, &mut scene, &[Button::Start]);
        press(&mut harness, &mut scene, &[Button::Circle]);
        assert_eq!(scene.mode(), BootMode::AuthorizeUser);

        // L, A, I, N
        for _ in 0..11 {
            press(&mut harness, &mut scene, &[Button::Right]);
        }
        press(&mut harness, &mut scene, &[Button::Circle]);
        press(&mut harness, &mut scene, &[Button::Up]);
        press(&mut harness, &mut scene, &[Button::Left]);
        assert_eq!(scene.board_char(), 'A');
        press(&mut harness, &mut scene, &[Button::Circle]);
        for _ in 0..8 {
            press(&mut harness, &mut scene, &[Button::Right]);
        }
        press(&mut harness, &mut scene, &[Button::Circle]);
        press(&mut harness, &mut scene, &[Button::Down]);
        assert_eq!(scene.board_char(), 'S');
        for _ in 0..5 {
            press(&mut harness, &mut scene, &[Button::Left]);
        }
        assert_eq!(scene.board_char(), 'N');
        press(&mut harness, &mut scene, &[Button::Circle]);
        assert_eq!(scene.name(), "LAIN");
        assert_eq!(scene.name_glyphs().len(), 4);

        let next = press(&mut harness, &mut scene, &[Button::Start]).expect("loading");
        assert_eq!(next.kind(), SceneKind::Loading);
        assert_eq!(harness.game.player_name, "LAIN");
        assert_eq!(harness.game.gate_level, 0);
        assert_eq!(harness.game.site, Site::B);
    }

    #[test]
    fn cross_on_an_empty_name_backs_out() {
        let mut harness = Harness::new();
        let mut scene = BootScene::new(0.0, false);
        press(&mut harness, &mut scene, &[Button::Start]);
        press(&mut harness, &mut scene, &[Button::Circle]);
        press(&mut harness, &mut scene, &[Button::Circle]);
        press(&mut harness, &mut scene, &[Button::Cross]);
        assert_eq!(scene.mode(), BootMode::AuthorizeUser);
        assert_eq!(scene.name(), "");
        press(&mut harness, &mut scene, &[Button::Cross]);
        assert_eq!(scene.mode(), BootMode::MainMenu);
    }

    #[test]
    fn load_without_a_save_shows_a_passing_status() {
        let mut harness = Harness::new();
        let mut scene = BootScene::new(0.0, false);
        press(&mut harness, &mut scene, &[Button::Start]);
        press(&mut harness, &mut scene, &[Button::Down]);
        assert_eq!(scene.menu_item(), BootMenuItem::LoadData);
        press(&mut harness, &mut scene, &[Button::Circle]);
        assert_eq!(scene.status(), Some(BootStatus::NoSave));
        assert_eq!(scene.mode(), BootMode::MainMenu);
        for _ in 0..20 {
            press(&mut harness, &mut scene, &[]);
        }
        assert_eq!(scene.status(), None);
    }

    #[test]
    fn load_data_restores_the_saved_game() {
        let mut harness = Harness::new();
        let mut saved = GameState::new_game("eiri");
        saved.gate_level = 2;
        harness.saves = MemorySaveStore::with_state(saved);

        let mut scene = BootScene::new(0.0, true);
        press(&mut harness, &mut scene, &[Button::Start]);
        press(&mut harness, &mut scene, &[Button::Down]);
        press(&mut harness, &mut scene, &[Button::Circle]);
        assert_eq!(scene.mode(), BootMode::LoadData);
        let next = press(&mut harness, &mut scene, &[Button::Circle]).expect("loading");
        assert_eq!(next.kind(), SceneKind::Loading);
        assert_eq!(harness.game.player_name, "eiri");
        assert_eq!(harness.game.gate_level, 2);
        assert!(!harness.game.cursors.is_empty());
    }

    #[test]
    fn failed_load_returns_to_the_menu() {
        let mut harness = Harness::new();
        let mut scene = BootScene::new(0.0, true);
        press(&mut harness, &mut scene, &[Button::Start]);
        press(&mut harness, &mut scene, &[Button::Down]);
        press(&mut harness, &mut scene, &[Button::Circle]);
        assert!(press(&mut harness, &mut scene, &[Button::Circle]).is_none());
        assert_eq!(scene.status(), Some(BootStatus::LoadFailed));
        for _ in 0..20 {
            press(&mut harness, &mut scene, &[]);
        }
        assert_eq!(scene.mode(), BootMode::MainMenu);
        assert_eq!(scene.status(), None);
    }
}
