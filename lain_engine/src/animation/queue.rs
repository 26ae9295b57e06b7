use std::collections::VecDeque;

use super::step::AnimationStep;
use super::AnimationTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletedStep {
    pub label: Option<&'static str>,
}

/// Outcome of one [`AnimationQueue::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    /// The active step finished this frame, or nothing was queued.
    pub done: bool,
    /// The step popped this frame, if any.
    pub completed: Option<CompletedStep>,
}

/// FIFO of steps for one object. Only the front step runs; it records its
/// start time the first frame it is advanced, and every later step is
/// anchored to the frame its predecessor finished on.
#[derive(Debug, Default)]
pub struct AnimationQueue {
    steps: VecDeque<AnimationStep>,
    started_at: Option<f64>,
}

impl AnimationQueue {
    pub fn push(&mut self, step: AnimationStep) {
        self.steps.push_back(step);
    }

    /// Cancels everything, including the in-progress step.
    pub fn clear(&mut self) {
        self.steps.clear();
        self.started_at = None;
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn in_progress(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn current_label(&self) -> Option<&'static str> {
        self.steps.front().and_then(|step| step.label)
    }

    pub fn advance(&mut self, target: &mut dyn AnimationTarget, now: f64, delta: f32) -> StepReport {
        let Some(step) = self.steps.front_mut() else {
            return StepReport {
                done: true,
                completed: None,
            };
        };

        let anchor = *self.started_at.get_or_insert(now);
        let eligible_at = anchor + f64::from(step.delay);
        if now < eligible_at {
            return StepReport::default();
        }

        if let Some(on_start) = step.on_start.take() {
            on_start(target);
        }

        if !step.advance_properties(target, now - eligible_at, delta) {
            return StepReport::default();
        }

        let Some(mut finished) = self.steps.pop_front() else {
            return StepReport::default();
        };
        self.started_at = if self.steps.is_empty() { None } else { Some(now) };
        if let Some(on_end) = finished.on_end.take() {
            on_end(target);
        }

        StepReport {
            done: true,
            completed: Some(CompletedStep {
                label: finished.label,
            }),
        }
    }
}
