use std::fmt;

/// Callback run once its apply time has passed.
pub type EventFn<S> = Box<dyn FnOnce(&mut S, f64)>;

pub struct DeferredEvent<S> {
    apply: EventFn<S>,
    pub apply_time: f64,
}

impl<S> fmt::Debug for DeferredEvent<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredEvent")
            .field("apply_time", &self.apply_time)
            .finish_non_exhaustive()
    }
}

/// Time-keyed callbacks owned by one scene, kept in arrival order.
pub struct DeferredQueue<S> {
    events: Vec<DeferredEvent<S>>,
}

impl<S> Default for DeferredQueue<S> {
    fn default() -> Self {
        Self { events: Vec::new() }
    }
}

impl<S> fmt::Debug for DeferredQueue<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.events.iter()).finish()
    }
}

impl<S> DeferredQueue<S> {
    pub fn push<F>(&mut self, apply_time: f64, apply: F)
    where
        F: FnOnce(&mut S, f64) + 'static,
    {
        self.events.push(DeferredEvent {
            apply: Box::new(apply),
            apply_time,
        });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn next_due(&self) -> Option<f64> {
        self.events
            .iter()
            .map(|event| event.apply_time)
            .min_by(f64::total_cmp)
    }
}

/// Scenes that own a deferred queue.
pub trait EventOwner: Sized {
    fn deferred(&mut self) -> &mut DeferredQueue<Self>;
}

/// Runs every event due at `now` against its owner, in insertion order, and
/// keeps the rest. Events queued by a running callback wait for a later call
/// even when already due. Returns how many events ran.
pub fn process_events<S: EventOwner>(owner: &mut S, now: f64) -> usize {
    let pending = std::mem::take(&mut owner.deferred().events);
    let (due, waiting): (Vec<_>, Vec<_>) = pending
        .into_iter()
        .partition(|event| event.apply_time <= now);
    owner.deferred().events = waiting;

    let count = due.len();
    if count > 0 {
        log::debug!("{count} deferred event(s) due at {now:.3}, {} waiting", owner.deferred().len());
    }
    for event in due {
        (event.apply)(owner, now);
    }
    count
}
