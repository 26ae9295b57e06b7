use glam::Vec3;

use super::FrameContext;
use crate::animation::{animate_all, AnimationStep, Motion, Sprite, Transform};
use crate::error::EngineResult;
use crate::input::Button;
use crate::resources::TextureKey;

const CAMERA_RAISED: Vec3 = Vec3::new(0.0, 0.5, 0.0);
const CAMERA_SPEED: f32 = 2.0;
const BACKDROP_OPACITY: f32 = 0.8;
const BACKDROP_SPEED: f32 = 4.0;
const LETTER_SPEED: f32 = 12.0;
const LETTER_STAGGER: f32 = 0.05;
const HIGHLIGHT_SCALE: f32 = 1.25;

/// Opening and closing each run in two stages: the backdrop and camera
/// first, then the letters (reversed when closing). Each stage waits for
/// the previous one's sprites to go idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PausePhase {
    Opening1,
    Opening2,
    Open,
    Closing1,
    Closing2,
    Closed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseItem {
    Load,
    About,
    Change,
    Save,
    Exit,
}

impl PauseItem {
    pub const ALL: [PauseItem; 5] = [
        PauseItem::Load,
        PauseItem::About,
        PauseItem::Change,
        PauseItem::Save,
        PauseItem::Exit,
    ];
}

/// Message shown under the menu after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseStatus {
    Saved,
    SaveFailed,
    LoadFailed,
    ChangeLocked,
}

/// What the site should do once the menu hands control back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseOutcome {
    Closed,
    Loaded,
    ChangeSite,
    Exit,
}

/// Pause overlay owned by the site scene.
#[derive(Debug)]
pub struct PauseMenu {
    phase: PausePhase,
    selected: usize,
    about_open: bool,
    status: Option<PauseStatus>,
    backdrop: Sprite,
    letters: Vec<Sprite>,
}

impl Default for PauseMenu {
    fn default() -> Self {
        Self::new()
    }
}

fn letter_home(index: usize) -> Vec3 {
    Vec3::new(0.0, 1.0 - index as f32 * 0.5, 1.0)
}

fn letter_offscreen(index: usize) -> Vec3 {
    letter_home(index) + Vec3::new(3.0, 0.0, 0.0)
}

impl PauseMenu {
    pub fn new() -> Self {
        Self {
            phase: PausePhase::Closed,
            selected: 0,
            about_open: false,
            status: None,
            backdrop: Sprite::new("pause_backdrop", Transform::default().with_opacity(0.0)),
            letters: (0..PauseItem::ALL.len())
                .map(|index| {
                    Sprite::new(
                        "pause_letter",
                        Transform::at(letter_offscreen(index)).with_opacity(0.0),
                    )
                })
                .collect(),
        }
    }

    pub fn phase(&self) -> PausePhase {
        self.phase
    }

    pub fn selected(&self) -> PauseItem {
        PauseItem::ALL[self.selected]
    }

    pub fn status(&self) -> Option<PauseStatus> {
        self.status
    }

    pub fn is_about_open(&self) -> bool {
        self.about_open
    }

    pub fn sprites(&self) -> impl Iterator<Item = &Sprite> {
        std::iter::once(&self.backdrop).chain(self.letters.iter())
    }

    pub fn open(&mut self, camera: &mut Sprite) {
        log::debug!("pause menu opening");
        self.phase = PausePhase::Opening1;
        self.selected = 0;
        self.about_open = false;
        self.status = None;

        self.backdrop.cancel();
        self.backdrop.push(
            AnimationStep::new()
                .label("backdrop_in")
                .opacity(Motion::new(BACKDROP_OPACITY, BACKDROP_SPEED)),
        );
        for (index, letter) in self.letters.iter_mut().enumerate() {
            letter.cancel();
            letter.transform = Transform::at(letter_offscreen(index)).with_opacity(0.0);
        }
        camera.cancel();
        camera.push(
            AnimationStep::new()
                .label("camera_rise")
                .position(Motion::new(CAMERA_RAISED, CAMERA_SPEED)),
        );
    }

    pub fn update(&mut self, ctx: &mut FrameContext<'_>) -> EngineResult<Option<PauseOutcome>> {
        ctx.resources.texture(TextureKey::PauseLetters)?;

        let mut outcome = None;
        if self.phase == PausePhase::Open {
            outcome = self.handle_input(ctx);
        }

        let letters_idle = animate_all(self.letters.iter_mut(), &ctx.time);
        self.backdrop.animate(&ctx.time);
        let backdrop_idle = self.backdrop.is_idle();
        let camera_idle = ctx.camera.is_idle();

        match self.phase {
            PausePhase::Opening1 if backdrop_idle && camera_idle => {
                self.phase = PausePhase::Opening2;
                self.slide_letters_in();
            }
            PausePhase::Opening2 if letters_idle => {
                self.phase = PausePhase::Open;
                self.highlight();
            }
            PausePhase::Closing1 if letters_idle => {
                self.phase = PausePhase::Closing2;
                self.backdrop.push(
                    AnimationStep::new()
                        .label("backdrop_out")
                        .opacity(Motion::new(0.0, BACKDROP_SPEED)),
                );
                ctx.camera.push(
                    AnimationStep::new()
                        .label("camera_lower")
                        .position(Motion::new(Vec3::ZERO, CAMERA_SPEED)),
                );
            }
            PausePhase::Closing2 if backdrop_idle && camera_idle => {
                log::debug!("pause menu closed");
                self.phase = PausePhase::Closed;
                outcome = Some(PauseOutcome::Closed);
            }
            _ => {}
        }
        Ok(outcome)
    }

    fn handle_input(&mut self, ctx: &mut FrameContext<'_>) -> Option<PauseOutcome> {
        let count = PauseItem::ALL.len();
        if ctx.pressed(Button::Up) {
            self.selected = (self.selected + count - 1) % count;
            self.highlight();
        } else if ctx.pressed(Button::Down) {
            self.selected = (self.selected + 1) % count;
            self.highlight();
        }

        if ctx.pressed(Button::Triangle) || ctx.pressed(Button::Cross) {
            if self.about_open {
                self.about_open = false;
            } else {
                self.close();
            }
            return None;
        }
        if !ctx.pressed(Button::Circle) {
            return None;
        }

        self.status = None;
        match self.selected() {
            PauseItem::Load => match ctx.saves.load() {
                Some(state) => {
                    log::info!("loaded save for {:?}", state.player_name);
                    *ctx.game = state;
                    ctx.game.place_cursors(ctx.content);
                    return Some(self.dismiss(PauseOutcome::Loaded));
                }
                None => self.status = Some(PauseStatus::LoadFailed),
            },
            PauseItem::About => self.about_open = !self.about_open,
            PauseItem::Change => {
                if ctx.game.can_change_site() {
                    return Some(self.dismiss(PauseOutcome::ChangeSite));
                }
                self.status = Some(PauseStatus::ChangeLocked);
            }
            PauseItem::Save => {
                self.status = Some(if ctx.saves.save(ctx.game) {
                    PauseStatus::Saved
                } else {
                    PauseStatus::SaveFailed
                });
            }
            PauseItem::Exit => return Some(self.dismiss(PauseOutcome::Exit)),
        }
        None
    }

    /// Leaves without the closing animation; the site is being replaced.
    fn dismiss(&mut self, outcome: PauseOutcome) -> PauseOutcome {
        self.phase = PausePhase::Closed;
        outcome
    }

    fn close(&mut self) {
        log::debug!("pause menu closing");
        self.phase = PausePhase::Closing1;
        let last = self.letters.len().saturating_sub(1);
        for (index, letter) in self.letters.iter_mut().enumerate() {
            let stagger = (last - index) as f32 * LETTER_STAGGER;
            letter.cancel();
            letter.push(
                AnimationStep::new()
                    .label("letter_out")
                    .position(Motion::new(letter_offscreen(index), LETTER_SPEED).delayed(stagger))
                    .scale(Motion::new(Vec3::ONE, LETTER_SPEED))
                    .opacity(Motion::new(0.0, LETTER_SPEED).delayed(stagger)),
            );
        }
    }

    fn slide_letters_in(&mut self) {
        for (index, letter) in self.letters.iter_mut().enumerate() {
            let stagger = index as f32 * LETTER_STAGGER;
            letter.push(
                AnimationStep::new()
                    .label("letter_in")
                    .position(Motion::new(letter_home(index), LETTER_SPEED).delayed(stagger))
                    .opacity(Motion::new(1.0, LETTER_SPEED).delayed(stagger)),
            );
        }
    }

    fn highlight(&mut self) {
        for (index, letter) in self.letters.iter_mut().enumerate() {
            let size = if index == self.selected { HIGHLIGHT_SCALE } else { 1.0 };
            letter.push(AnimationStep::new().scale(Motion::new(Vec3::splat(size), 8.0)));
        }
    }
}
