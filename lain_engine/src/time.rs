/// Clock handed to every scene update.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeContext {
    /// Monotonic seconds since the driver started.
    pub time: f64,
    /// Seconds covered by this frame, already scaled by the time multiplier.
    pub delta: f32,
}

impl TimeContext {
    pub fn new(time: f64, delta: f32) -> Self {
        Self { time, delta }
    }

    /// Converts the driver's `(milliseconds, seconds)` pair. The multiplier
    /// only scales `delta`, so animation speed follows it while deferred
    /// events stay on the wall clock.
    pub fn from_driver(time_ms: f64, delta_s: f32, multiplier: f32) -> Self {
        Self {
            time: time_ms / 1000.0,
            delta: delta_s * multiplier,
        }
    }

    pub fn since(&self, start: f64) -> f64 {
        self.time - start
    }
}
