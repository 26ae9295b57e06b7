use std::fmt;

use glam::Vec3;

use super::curve::CubicBezier;
use super::AnimationTarget;

/// Start/end hook run synchronously inside the frame that triggers it.
pub type StepCallback = Box<dyn FnOnce(&mut dyn AnimationTarget)>;

/// Remaining distances at or below this snap onto the target so float drift
/// cannot leave a property one frame short of done.
const SNAP_EPSILON: f32 = 1e-5;

/// Move toward `target` at `speed` units per second, optionally held back by
/// `delay` seconds after the step becomes eligible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion<T> {
    pub target: T,
    pub speed: f32,
    pub delay: f32,
}

impl<T> Motion<T> {
    pub fn new(target: T, speed: f32) -> Self {
        Self {
            target,
            speed,
            delay: 0.0,
        }
    }

    pub fn delayed(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationTarget {
    /// Rotate a single axis; the other two are left alone.
    Axis(Axis, f32),
    /// Rotate all three axes, each clamped independently.
    Euler(Vec3),
}

/// Follow a Bézier path by advancing a `[0, 1]` progress value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveMotion {
    pub curve: CubicBezier,
    pub speed: f32,
    pub delay: f32,
    pub reversed: bool,
}

impl CurveMotion {
    pub fn new(curve: CubicBezier, speed: f32) -> Self {
        Self {
            curve,
            speed,
            delay: 0.0,
            reversed: false,
        }
    }

    pub fn delayed(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Walk the path from its end back to its start.
    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Property {
    Position(Motion<Vec3>),
    Scale(Motion<Vec3>),
    Rotation(Motion<RotationTarget>),
    Opacity(Motion<f32>),
    Curve { motion: CurveMotion, progress: f32 },
    Uniform { key: String, motion: Motion<f32> },
}

impl Property {
    fn delay(&self) -> f32 {
        match self {
            Property::Position(motion) | Property::Scale(motion) => motion.delay,
            Property::Rotation(motion) => motion.delay,
            Property::Opacity(motion) | Property::Uniform { motion, .. } => motion.delay,
            Property::Curve { motion, .. } => motion.delay,
        }
    }

    /// Position and curve both drive the position slot, so they share a key.
    fn same_slot(&self, other: &Property) -> bool {
        match (self, other) {
            (
                Property::Position(_) | Property::Curve { .. },
                Property::Position(_) | Property::Curve { .. },
            ) => true,
            (Property::Scale(_), Property::Scale(_))
            | (Property::Rotation(_), Property::Rotation(_))
            | (Property::Opacity(_), Property::Opacity(_)) => true,
            (Property::Uniform { key: a, .. }, Property::Uniform { key: b, .. }) => a == b,
            _ => false,
        }
    }

    fn advance(&mut self, target: &mut dyn AnimationTarget, delta: f32) -> bool {
        match self {
            Property::Position(motion) => {
                let next = step_vector(target.position(), motion.target, motion.speed * delta);
                target.set_position(next);
                next == motion.target
            }
            Property::Scale(motion) => {
                let next = step_vector(target.scale(), motion.target, motion.speed * delta);
                target.set_scale(next);
                next == motion.target
            }
            Property::Rotation(motion) => {
                let amount = motion.speed * delta;
                let current = target.rotation();
                let (next, goal) = match motion.target {
                    RotationTarget::Axis(axis, angle) => {
                        let mut goal = current;
                        match axis {
                            Axis::X => goal.x = angle,
                            Axis::Y => goal.y = angle,
                            Axis::Z => goal.z = angle,
                        }
                        (step_axes(current, goal, amount), goal)
                    }
                    RotationTarget::Euler(goal) => (step_axes(current, goal, amount), goal),
                };
                target.set_rotation(next);
                next == goal
            }
            Property::Opacity(motion) => {
                let next = step_scalar(target.opacity(), motion.target, motion.speed * delta);
                target.set_opacity(next);
                next == motion.target
            }
            Property::Curve { motion, progress } => {
                let amount = motion.speed * delta;
                let (next, goal) = if motion.reversed {
                    (*progress - amount, 0.0)
                } else {
                    (*progress + amount, 1.0)
                };
                *progress = if (goal - next).abs() <= SNAP_EPSILON {
                    goal
                } else {
                    next.clamp(0.0, 1.0)
                };
                target.set_position(motion.curve.sample(*progress));
                *progress == goal
            }
            Property::Uniform { key, motion } => {
                let current = target.uniform(key).unwrap_or_else(|| {
                    log::debug!("uniform {key} unset; animating from 0");
                    0.0
                });
                let next = step_scalar(current, motion.target, motion.speed * delta);
                target.set_uniform(key, next);
                next == motion.target
            }
        }
    }
}

/// Moves `current` toward `target` by at most `amount`, never overshooting.
pub(crate) fn step_scalar(current: f32, target: f32, amount: f32) -> f32 {
    let remaining = target - current;
    if remaining.abs() <= amount + SNAP_EPSILON {
        target
    } else {
        current + amount * remaining.signum()
    }
}

/// Straight-line move of at most `amount` toward `target`.
pub(crate) fn step_vector(current: Vec3, target: Vec3, amount: f32) -> Vec3 {
    let offset = target - current;
    let distance = offset.length();
    if distance <= amount + SNAP_EPSILON {
        target
    } else {
        current + offset / distance * amount
    }
}

/// Per-axis clamp used for rotations; each axis moves at the full `amount`,
/// so a diagonal rotation finishes its shorter axes first.
pub(crate) fn step_axes(current: Vec3, target: Vec3, amount: f32) -> Vec3 {
    Vec3::new(
        step_scalar(current.x, target.x, amount),
        step_scalar(current.y, target.y, amount),
        step_scalar(current.z, target.z, amount),
    )
}

/// One queued unit of concurrent property animations.
#[derive(Default)]
pub struct AnimationStep {
    properties: Vec<Property>,
    pub(crate) delay: f32,
    pub(crate) label: Option<&'static str>,
    pub(crate) on_start: Option<StepCallback>,
    pub(crate) on_end: Option<StepCallback>,
}

impl fmt::Debug for AnimationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationStep")
            .field("label", &self.label)
            .field("delay", &self.delay)
            .field("properties", &self.properties)
            .field("on_start", &self.on_start.is_some())
            .field("on_end", &self.on_end.is_some())
            .finish()
    }
}

impl AnimationStep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold the whole step, start callback included, for `seconds`.
    pub fn delay(mut self, seconds: f32) -> Self {
        self.delay = seconds;
        self
    }

    /// Name reported back when the step completes.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn position(self, motion: Motion<Vec3>) -> Self {
        self.with_property(Property::Position(motion))
    }

    pub fn scale(self, motion: Motion<Vec3>) -> Self {
        self.with_property(Property::Scale(motion))
    }

    pub fn rotation(self, motion: Motion<RotationTarget>) -> Self {
        self.with_property(Property::Rotation(motion))
    }

    pub fn opacity(self, motion: Motion<f32>) -> Self {
        self.with_property(Property::Opacity(motion))
    }

    pub fn curve(self, motion: CurveMotion) -> Self {
        let progress = if motion.reversed { 1.0 } else { 0.0 };
        self.with_property(Property::Curve { motion, progress })
    }

    pub fn uniform(self, key: &str, motion: Motion<f32>) -> Self {
        self.with_property(Property::Uniform {
            key: key.to_string(),
            motion,
        })
    }

    pub fn on_start<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&mut dyn AnimationTarget) + 'static,
    {
        self.on_start = Some(Box::new(callback));
        self
    }

    pub fn on_end<F>(mut self, callback: F) -> Self
    where
        F: FnOnce(&mut dyn AnimationTarget) + 'static,
    {
        self.on_end = Some(Box::new(callback));
        self
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    fn with_property(mut self, property: Property) -> Self {
        self.properties.retain(|existing| !existing.same_slot(&property));
        self.properties.push(property);
        self
    }

    /// Advances every property whose own delay has elapsed; `elapsed` counts
    /// from the moment the step became eligible. True once all are on target.
    pub(crate) fn advance_properties(
        &mut self,
        target: &mut dyn AnimationTarget,
        elapsed: f64,
        delta: f32,
    ) -> bool {
        let mut finished = true;
        for property in &mut self.properties {
            if elapsed < f64::from(property.delay()) {
                finished = false;
                continue;
            }
            finished &= property.advance(target, delta);
        }
        finished
    }
}
