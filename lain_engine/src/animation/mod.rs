//! Queued property animations.
//!
//! Every renderable owns an [`AnimationQueue`] of [`AnimationStep`]s. A step
//! bundles independent property moves (position, scale, rotation, opacity,
//! a Bézier path and named shader uniforms) that all run at once; the step
//! finishes when the last of them lands on its target. Steps run strictly
//! one after another, and the engine only touches the object through the
//! narrow [`AnimationTarget`] slots, so it never needs a renderer.

mod curve;
mod queue;
mod step;

use std::collections::BTreeMap;

use glam::Vec3;

pub use curve::CubicBezier;
pub use queue::{AnimationQueue, CompletedStep, StepReport};
pub use step::{AnimationStep, Axis, CurveMotion, Motion, RotationTarget, StepCallback};

use crate::time::TimeContext;

/// Slots the animation engine reads and writes on a renderable.
pub trait AnimationTarget {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, value: Vec3);
    fn rotation(&self) -> Vec3;
    fn set_rotation(&mut self, value: Vec3);
    fn scale(&self) -> Vec3;
    fn set_scale(&mut self, value: Vec3);
    fn opacity(&self) -> f32;
    fn set_opacity(&mut self, value: f32);
    fn uniform(&self, key: &str) -> Option<f32>;
    fn set_uniform(&mut self, key: &str, value: f32);
}

/// Plain transform record handed to the rendering collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub opacity: f32,
    pub visible: bool,
    uniforms: BTreeMap<String, f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            opacity: 1.0,
            visible: true,
            uniforms: BTreeMap::new(),
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_uniform(mut self, key: &str, value: f32) -> Self {
        self.uniforms.insert(key.to_string(), value);
        self
    }

    pub fn uniforms(&self) -> impl Iterator<Item = (&str, f32)> {
        self.uniforms.iter().map(|(key, value)| (key.as_str(), *value))
    }
}

impl AnimationTarget for Transform {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, value: Vec3) {
        self.position = value;
    }

    fn rotation(&self) -> Vec3 {
        self.rotation
    }

    fn set_rotation(&mut self, value: Vec3) {
        self.rotation = value;
    }

    fn scale(&self) -> Vec3 {
        self.scale
    }

    fn set_scale(&mut self, value: Vec3) {
        self.scale = value;
    }

    fn opacity(&self) -> f32 {
        self.opacity
    }

    fn set_opacity(&mut self, value: f32) {
        self.opacity = value;
    }

    fn uniform(&self, key: &str) -> Option<f32> {
        self.uniforms.get(key).copied()
    }

    fn set_uniform(&mut self, key: &str, value: f32) {
        self.uniforms.insert(key.to_string(), value);
    }
}

/// A renderable: its transform plus the queue that animates it.
#[derive(Debug, Default)]
pub struct Sprite {
    pub name: &'static str,
    pub transform: Transform,
    pub queue: AnimationQueue,
}

impl Sprite {
    pub fn new(name: &'static str, transform: Transform) -> Self {
        Self {
            name,
            transform,
            queue: AnimationQueue::default(),
        }
    }

    pub fn push(&mut self, step: AnimationStep) {
        self.queue.push(step);
    }

    /// Drops every pending step and starts over from the current transform.
    pub fn cancel(&mut self) {
        self.queue.clear();
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn animate(&mut self, time: &TimeContext) -> StepReport {
        self.queue.advance(&mut self.transform, time.time, time.delta)
    }
}

/// Advances each sprite once; returns true when all of them are idle.
pub fn animate_all<'a, I>(sprites: I, time: &TimeContext) -> bool
where
    I: IntoIterator<Item = &'a mut Sprite>,
{
    let mut idle = true;
    for sprite in sprites {
        sprite.animate(time);
        idle &= sprite.is_idle();
    }
    idle
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_runs_its_queue_against_its_transform() {
        let mut sprite = Sprite::new("logo", Transform::default().with_opacity(0.0));
        sprite.push(AnimationStep::new().opacity(Motion::new(1.0, 4.0)));
        let time = TimeContext::new(0.0, 0.25);
        let report = sprite.animate(&time);
        assert!(report.done);
        assert_eq!(sprite.transform.opacity, 1.0);
        assert!(sprite.is_idle());
    }

    #[test]
    fn animate_all_reports_busy_until_every_queue_drains() {
        let mut fast = Sprite::new("fast", Transform::default());
        let mut slow = Sprite::new("slow", Transform::default());
        fast.push(AnimationStep::new().position(Motion::new(Vec3::X, 10.0)));
        slow.push(AnimationStep::new().position(Motion::new(Vec3::X, 1.0)));

        let frame = TimeContext::new(0.0, 0.5);
        assert!(!animate_all([&mut fast, &mut slow], &frame));
        assert!(fast.is_idle());
        let frame = TimeContext::new(0.5, 0.5);
        assert!(animate_all([&mut fast, &mut slow], &frame));
        assert_eq!(slow.transform.position, Vec3::X);
    }

    #[test]
    fn missing_uniform_reads_as_none() {
        let transform = Transform::default().with_uniform("glow", 0.5);
        assert_eq!(transform.uniform("glow"), Some(0.5));
        assert_eq!(transform.uniform("tint"), None);
    }
}
