use std::f32::consts::FRAC_PI_4;

use glam::Vec3;
use lain_site::{
    find_next_node, validate_cursor, CursorLocation, Direction, MatrixPosition, Node, SiteContent,
    SEGMENTS,
};

use super::{
    BootScene, ChangeSiteScene, DebugScene, FrameContext, IdleScene, LoadingScene, PauseMenu,
    PauseOutcome, Scene,
};
use crate::animation::{animate_all, AnimationStep, Axis, Motion, RotationTarget, Sprite, Transform};
use crate::error::{EngineError, EngineResult};
use crate::events::{process_events, DeferredQueue, EventOwner};
use crate::input::Button;
use crate::resources::TextureKey;
use crate::state::GameState;

/// Rig rotation per segment.
const SEGMENT_ANGLE: f32 = FRAC_PI_4;
const LEVEL_HEIGHT: f32 = 1.5;
const ROTATE_SPEED: f32 = 2.0;
const CLIMB_SPEED: f32 = 4.0;
const SELECTOR_SPEED: f32 = 8.0;
/// Seconds between confirming a node and the scene change.
const SELECT_DELAY: f64 = 0.5;

/// Shoulder buttons move like the d-pad but may cross two boundaries.
const SHOULDER_MOVES: [(Button, Direction); 4] = [
    (Button::L1, Direction::Left),
    (Button::R1, Direction::Right),
    (Button::L2, Direction::Up),
    (Button::R2, Direction::Down),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteMode {
    Navigating,
    /// Rig turning or climbing; input waits until every site sprite is idle.
    Moving,
    /// A node was confirmed; the scene change is pending.
    Selecting,
    Paused,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SiteExit {
    Node(String),
    ChangeSite,
    Loaded,
    Quit,
    Idle,
    Debug,
}

/// The 3D node browser.
#[derive(Debug)]
pub struct SiteScene {
    mode: SiteMode,
    /// Site geometry: `rotation.y` follows the segment, `position.y` the level.
    rig: Sprite,
    selector: Sprite,
    lain: Sprite,
    pause: PauseMenu,
    rig_angle: f32,
    last_input_at: f64,
    exit: Option<SiteExit>,
    events: DeferredQueue<SiteScene>,
}

impl EventOwner for SiteScene {
    fn deferred(&mut self) -> &mut DeferredQueue<Self> {
        &mut self.events
    }
}

fn level_offset(level: i32) -> Vec3 {
    Vec3::new(0.0, -(level as f32) * LEVEL_HEIGHT, 0.0)
}

fn slot_position(position: MatrixPosition) -> Vec3 {
    Vec3::new(
        f32::from(position.col) - 1.5,
        1.0 - f32::from(position.row),
        0.5,
    )
}

impl SiteScene {
    pub fn new(entered_at: f64, game: &GameState, content: &SiteContent) -> EngineResult<Self> {
        let view = content
            .site(game.site)
            .ok_or(EngineError::MissingSite(game.site))?;
        let cursor = game.cursor();
        validate_cursor(&view, &cursor)?;
        log::debug!("entering site {} at {cursor:?}", game.site);

        let rig_angle = f32::from(cursor.site_segment) * SEGMENT_ANGLE;
        let mut rig = Transform::at(level_offset(cursor.level));
        rig.rotation.y = rig_angle;

        Ok(Self {
            mode: SiteMode::Navigating,
            rig: Sprite::new("site_rig", rig),
            selector: Sprite::new(
                "selector",
                Transform::at(slot_position(cursor.node_matrix_position)),
            ),
            lain: Sprite::new("lain", Transform::at(Vec3::new(0.0, -0.5, 1.0))),
            pause: PauseMenu::new(),
            rig_angle,
            last_input_at: entered_at,
            exit: None,
            events: DeferredQueue::default(),
        })
    }

    pub fn mode(&self) -> SiteMode {
        self.mode
    }

    pub fn mode_label(&self) -> &'static str {
        match self.mode {
            SiteMode::Navigating => "navigating",
            SiteMode::Moving => "moving",
            SiteMode::Selecting => "selecting",
            SiteMode::Paused => "paused",
        }
    }

    pub fn pause_menu(&self) -> &PauseMenu {
        &self.pause
    }

    pub fn rig(&self) -> &Sprite {
        &self.rig
    }

    pub fn sprites(&self) -> Vec<&Sprite> {
        let mut sprites = vec![&self.rig, &self.selector, &self.lain];
        if self.mode == SiteMode::Paused {
            sprites.extend(self.pause.sprites());
        }
        sprites
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<Scene>> {
        ctx.resources.texture(TextureKey::SiteBackground)?;
        ctx.resources.texture(TextureKey::NodeIcons)?;
        let now = ctx.now();
        if ctx.input.any_pressed() {
            self.last_input_at = now;
        }

        match self.mode {
            SiteMode::Navigating => self.handle_input(ctx)?,
            SiteMode::Paused => {
                if let Some(outcome) = self.pause.update(ctx)? {
                    self.resume(outcome);
                }
            }
            SiteMode::Moving | SiteMode::Selecting => {}
        }

        let idle = animate_all(
            [&mut self.rig, &mut self.selector, &mut self.lain],
            &ctx.time,
        );
        if self.mode == SiteMode::Moving && idle {
            self.mode = SiteMode::Navigating;
        }
        process_events(self, now);

        let idle_timeout = f64::from(ctx.config.idle_timeout_secs);
        if self.mode == SiteMode::Navigating
            && self.exit.is_none()
            && now - self.last_input_at >= idle_timeout
        {
            log::info!("no input for {idle_timeout}s; switching to idle media");
            self.exit = Some(SiteExit::Idle);
        }

        match self.exit.take() {
            Some(exit) => self.leave(exit, ctx).map(Some),
            None => Ok(None),
        }
    }

    fn handle_input(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<()> {
        if ctx.pressed(Button::Select) && ctx.pressed(Button::Start) {
            self.exit = Some(SiteExit::Debug);
            return Ok(());
        }
        if ctx.pressed(Button::Triangle) {
            self.pause.open(ctx.camera);
            self.mode = SiteMode::Paused;
            return Ok(());
        }
        if ctx.pressed(Button::Circle) {
            return self.select(ctx);
        }

        let shoulder = SHOULDER_MOVES
            .into_iter()
            .find(|(button, _)| ctx.pressed(*button))
            .map(|(_, direction)| (direction, true));
        match shoulder.or_else(|| ctx.input.direction().map(|direction| (direction, false))) {
            Some((direction, two_phase)) => self.navigate(ctx, direction, two_phase),
            None => Ok(()),
        }
    }

    fn navigate(
        &mut self,
        ctx: &mut FrameContext<'_>,
        direction: Direction,
        two_phase: bool,
    ) -> EngineResult<()> {
        let view = ctx.site()?;
        let start = ctx.game.cursor();
        let game = &*ctx.game;
        let hit = find_next_node(view, start, direction, two_phase, &|node: &Node| {
            game.is_visible(node)
        })?;

        let Some(hit) = hit else {
            log::debug!("nothing {direction:?} of {start:?}");
            return Ok(());
        };
        log::debug!("{direction:?} -> {} at {:?}", hit.node.id, hit.cursor);

        let target = hit.cursor;
        ctx.game.set_cursor(target);
        self.selector.cancel();
        self.selector.push(
            AnimationStep::new()
                .label("selector")
                .position(Motion::new(slot_position(target.node_matrix_position), SELECTOR_SPEED)),
        );
        if hit.moved {
            if target.level != start.level {
                self.climb(target.level);
            } else {
                self.turn(direction, start.site_segment, target.site_segment);
            }
            self.mode = SiteMode::Moving;
        }
        Ok(())
    }

    /// Left crossings advance the segment, right ones go back.
    fn turn(&mut self, direction: Direction, from: u8, to: u8) {
        let turns = match direction {
            Direction::Left => f32::from((to + SEGMENTS - from) % SEGMENTS),
            _ => -f32::from((from + SEGMENTS - to) % SEGMENTS),
        };
        self.rig_angle += turns * SEGMENT_ANGLE;
        self.rig.push(
            AnimationStep::new()
                .label("rotate")
                .rotation(Motion::new(RotationTarget::Axis(Axis::Y, self.rig_angle), ROTATE_SPEED)),
        );

        let lean = 0.2 * turns.signum();
        self.lain.push(
            AnimationStep::new()
                .label("lean")
                .rotation(Motion::new(RotationTarget::Axis(Axis::Z, lean), 4.0)),
        );
        self.lain.push(
            AnimationStep::new()
                .label("stand")
                .rotation(Motion::new(RotationTarget::Axis(Axis::Z, 0.0), 4.0)),
        );
    }

    fn climb(&mut self, level: i32) {
        self.rig.push(
            AnimationStep::new()
                .label("climb")
                .position(Motion::new(level_offset(level), CLIMB_SPEED)),
        );
        self.lain.push(
            AnimationStep::new()
                .label("crouch")
                .scale(Motion::new(Vec3::new(1.1, 0.8, 1.0), 2.0)),
        );
        self.lain.push(
            AnimationStep::new()
                .label("stand")
                .scale(Motion::new(Vec3::ONE, 2.0)),
        );
    }

    fn select(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<()> {
        let node = ctx.cursor_node()?;
        log::info!("selected {} ({:?})", node.id, node.kind);
        ctx.game.mark_viewed(node);
        self.mode = SiteMode::Selecting;
        self.lain.push(
            AnimationStep::new()
                .label("reach")
                .scale(Motion::new(Vec3::splat(1.15), 2.0)),
        );
        self.lain.push(
            AnimationStep::new()
                .label("settle")
                .scale(Motion::new(Vec3::ONE, 2.0)),
        );
        let id = node.id.clone();
        self.events
            .push(ctx.now() + SELECT_DELAY, move |scene: &mut SiteScene, _| {
                scene.exit = Some(SiteExit::Node(id));
            });
        Ok(())
    }

    fn resume(&mut self, outcome: PauseOutcome) {
        match outcome {
            PauseOutcome::Closed => self.mode = SiteMode::Navigating,
            PauseOutcome::Loaded => self.exit = Some(SiteExit::Loaded),
            PauseOutcome::ChangeSite => self.exit = Some(SiteExit::ChangeSite),
            PauseOutcome::Exit => self.exit = Some(SiteExit::Quit),
        }
    }

    fn leave(&self, exit: SiteExit, ctx: &mut FrameContext<'_>) -> EngineResult<Scene> {
        let now = ctx.now();
        log::debug!("leaving site: {exit:?}");
        Ok(match exit {
            SiteExit::Node(id) => Scene::for_node(ctx.node(&id)?, now),
            SiteExit::ChangeSite => Scene::ChangeSite(ChangeSiteScene::new(now, ctx.game.site)),
            SiteExit::Loaded => Scene::Loading(LoadingScene::new(now)),
            SiteExit::Quit => Scene::Boot(BootScene::new(now, ctx.saves.has_save())),
            SiteExit::Idle => Scene::Idle(IdleScene::new(now, ctx.game)),
            SiteExit::Debug => Scene::Debug(DebugScene::new(now, ctx.game, ctx.content)?),
        })
    }
}
