use std::collections::BTreeMap;

/// Audio/video playback collaborator. Failures come back as `false` so the
/// owning scene can show its own fallback.
pub trait MediaPlayer {
    fn play(&mut self, key: &str) -> bool;
    fn stop(&mut self);
    fn is_playing(&self) -> bool;
    fn is_finished(&self) -> bool;
    /// Lets clock-driven players advance; real decoders can ignore it.
    fn tick(&mut self, _delta: f32) {}
}

/// Headless player that "plays" each clip for a fixed duration.
#[derive(Debug, Clone)]
pub struct ClockedMediaPlayer {
    default_duration: f32,
    durations: BTreeMap<String, f32>,
    missing: Vec<String>,
    current: Option<String>,
    elapsed: f32,
    finished: bool,
}

impl ClockedMediaPlayer {
    pub fn new(default_duration: f32) -> Self {
        Self {
            default_duration,
            durations: BTreeMap::new(),
            missing: Vec::new(),
            current: None,
            elapsed: 0.0,
            finished: false,
        }
    }

    pub fn with_duration(mut self, key: &str, seconds: f32) -> Self {
        self.durations.insert(key.to_string(), seconds);
        self
    }

    /// Marks a clip as unavailable; playing it fails.
    pub fn with_missing(mut self, key: &str) -> Self {
        self.missing.push(key.to_string());
        self
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    fn duration_of(&self, key: &str) -> f32 {
        self.durations
            .get(key)
            .copied()
            .unwrap_or(self.default_duration)
    }
}

impl MediaPlayer for ClockedMediaPlayer {
    fn play(&mut self, key: &str) -> bool {
        if self.missing.iter().any(|missing| missing == key) {
            log::warn!("media {key} unavailable");
            self.current = None;
            return false;
        }
        log::debug!("media play {key}");
        self.current = Some(key.to_string());
        self.elapsed = 0.0;
        self.finished = false;
        true
    }

    fn stop(&mut self) {
        self.current = None;
        self.elapsed = 0.0;
        self.finished = false;
    }

    fn is_playing(&self) -> bool {
        self.current.is_some() && !self.finished
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn tick(&mut self, delta: f32) {
        let Some(key) = self.current.as_deref() else {
            return;
        };
        if self.finished {
            return;
        }
        let duration = self.duration_of(key);
        self.elapsed += delta;
        if self.elapsed >= duration {
            self.finished = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_finishes_after_its_duration() {
        let mut player = ClockedMediaPlayer::new(10.0).with_duration("lda001", 1.0);
        assert!(player.play("lda001"));
        player.tick(0.5);
        assert!(player.is_playing());
        player.tick(0.5);
        assert!(player.is_finished());
        assert!(!player.is_playing());
    }

    #[test]
    fn missing_clip_fails_to_play() {
        let mut player = ClockedMediaPlayer::new(1.0).with_missing("broken");
        assert!(!player.play("broken"));
        assert!(!player.is_playing());
        assert_eq!(player.current(), None);
    }
}
