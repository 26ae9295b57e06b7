use lain_site::{CursorLocation, Node, NodeKind};

use super::{FrameContext, Scene};
use crate::animation::{AnimationStep, Motion, Sprite, Transform};
use crate::error::EngineResult;
use crate::events::{process_events, DeferredQueue, EventOwner};
use crate::input::Button;
use crate::resources::TextureKey;

const STATUS_SECS: f64 = 2.0;
const OVERLAY_SPEED: f32 = 4.0;
const PLAYING_OPACITY: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaMode {
    Menu,
    Playing,
    Words,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaItem {
    Play,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaStatus {
    Unavailable,
    WordNotFound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MediaExit {
    Site,
    Jump(CursorLocation),
}

/// Media node screen: a play/exit menu, the playback itself, and the word
/// list that jumps to related nodes.
#[derive(Debug)]
pub struct MediaScene {
    node_id: String,
    media_key: String,
    words: Vec<String>,
    autoplay: bool,
    mode: MediaMode,
    item: MediaItem,
    word_index: usize,
    status: Option<MediaStatus>,
    exit: Option<MediaExit>,
    overlay: Sprite,
    events: DeferredQueue<MediaScene>,
}

impl EventOwner for MediaScene {
    fn deferred(&mut self) -> &mut DeferredQueue<Self> {
        &mut self.events
    }
}

impl MediaScene {
    pub fn new(entered_at: f64, node: &Node) -> Self {
        log::debug!("media scene for {} at {entered_at:.2}s", node.id);
        let mut overlay = Sprite::new("media_overlay", Transform::default().with_opacity(0.0));
        overlay.push(
            AnimationStep::new()
                .label("overlay_in")
                .opacity(Motion::new(1.0, OVERLAY_SPEED)),
        );
        Self {
            node_id: node.id.clone(),
            media_key: node.media_key().to_string(),
            words: node.words.clone(),
            autoplay: node.kind == NodeKind::Movie,
            mode: MediaMode::Menu,
            item: MediaItem::Play,
            word_index: 0,
            status: None,
            exit: None,
            overlay,
            events: DeferredQueue::default(),
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    pub fn mode(&self) -> MediaMode {
        self.mode
    }

    pub fn mode_label(&self) -> &'static str {
        match self.mode {
            MediaMode::Menu => "menu",
            MediaMode::Playing => "playing",
            MediaMode::Words => "words",
        }
    }

    pub fn status(&self) -> Option<MediaStatus> {
        self.status
    }

    pub fn selected_word(&self) -> Option<&str> {
        self.words.get(self.word_index).map(String::as_str)
    }

    pub fn sprites(&self) -> Vec<&Sprite> {
        vec![&self.overlay]
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<Scene>> {
        ctx.resources.texture(TextureKey::MediaOverlay)?;
        let now = ctx.now();

        match self.mode {
            MediaMode::Menu => self.menu(ctx, now),
            MediaMode::Playing => self.playing(ctx),
            MediaMode::Words => self.word_list(ctx, now)?,
        }

        self.overlay.animate(&ctx.time);
        process_events(self, now);

        match self.exit.take() {
            Some(MediaExit::Site) => ctx.site_scene().map(Some),
            Some(MediaExit::Jump(cursor)) => {
                log::info!("word jump from {} to {cursor:?}", self.node_id);
                ctx.game.set_cursor(cursor);
                ctx.site_scene().map(Some)
            }
            None => Ok(None),
        }
    }

    fn menu(&mut self, ctx: &mut FrameContext<'_>, now: f64) {
        if self.autoplay {
            self.autoplay = false;
            self.start_playback(ctx, now);
            return;
        }
        if ctx.pressed(Button::Up) || ctx.pressed(Button::Down) {
            self.item = match self.item {
                MediaItem::Play => MediaItem::Exit,
                MediaItem::Exit => MediaItem::Play,
            };
        }
        if ctx.pressed(Button::Right) && !self.words.is_empty() {
            self.mode = MediaMode::Words;
            self.word_index = 0;
        } else if ctx.pressed(Button::Cross) {
            self.exit = Some(MediaExit::Site);
        } else if ctx.pressed(Button::Circle) {
            match self.item {
                MediaItem::Play => self.start_playback(ctx, now),
                MediaItem::Exit => self.exit = Some(MediaExit::Site),
            }
        }
    }

    fn start_playback(&mut self, ctx: &mut FrameContext<'_>, now: f64) {
        if !ctx.media.play(&self.media_key) {
            self.show_status(MediaStatus::Unavailable, now);
            return;
        }
        self.mode = MediaMode::Playing;
        self.overlay.push(
            AnimationStep::new()
                .label("overlay_dim")
                .opacity(Motion::new(PLAYING_OPACITY, OVERLAY_SPEED)),
        );
    }

    /// A finished clip returns to the site; Cross only stops it.
    fn playing(&mut self, ctx: &mut FrameContext<'_>) {
        if ctx.media.is_finished() {
            log::debug!("{} finished playing", self.media_key);
            ctx.media.stop();
            self.exit = Some(MediaExit::Site);
            return;
        }
        if !ctx.pressed(Button::Cross) {
            return;
        }
        ctx.media.stop();
        self.mode = MediaMode::Menu;
        self.overlay.push(
            AnimationStep::new()
                .label("overlay_restore")
                .opacity(Motion::new(1.0, OVERLAY_SPEED)),
        );
    }

    fn word_list(&mut self, ctx: &mut FrameContext<'_>, now: f64) -> EngineResult<()> {
        let count = self.words.len();
        if ctx.pressed(Button::Left) || ctx.pressed(Button::Cross) || count == 0 {
            self.mode = MediaMode::Menu;
            return Ok(());
        }
        if ctx.pressed(Button::Up) {
            self.word_index = (self.word_index + count - 1) % count;
        } else if ctx.pressed(Button::Down) {
            self.word_index = (self.word_index + 1) % count;
        }
        if !ctx.pressed(Button::Circle) {
            return Ok(());
        }

        let word = &self.words[self.word_index];
        let view = ctx.site()?;
        let target = view
            .nodes()
            .into_iter()
            .filter(|node| node.id != self.node_id && ctx.game.is_visible(node))
            .find(|node| node.id.eq_ignore_ascii_case(word) || node.title.eq_ignore_ascii_case(word))
            .and_then(|node| view.locate(&node.id));
        match target {
            Some(cursor) => self.exit = Some(MediaExit::Jump(cursor)),
            None => {
                log::debug!("word {word} matches no visible node");
                self.show_status(MediaStatus::WordNotFound, now);
            }
        }
        Ok(())
    }

    fn show_status(&mut self, status: MediaStatus, now: f64) {
        self.status = Some(status);
        self.events.push(now + STATUS_SECS, move |scene: &mut MediaScene, _| {
            if scene.status == Some(status) {
                scene.status = None;
            }
        });
    }
}
