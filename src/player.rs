use std::time::Duration;

use crate::trace::{Step, Trace};

/// Default auto-advance interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
/// Fastest allowed auto-advance interval.
pub const MIN_INTERVAL: Duration = Duration::from_millis(50);
/// Slowest allowed auto-advance interval.
pub const MAX_INTERVAL: Duration = Duration::from_millis(2000);
/// Amount by which speed-up/slow-down shift the interval.
const INTERVAL_STEP: Duration = Duration::from_millis(50);

/// Generic, algorithm-agnostic playback over a frozen trace.
///
/// The player owns the trace and a cursor; `None` cursor means nothing is
/// displayed yet. It never runs its own timer: the playback loop calls
/// [`Player::tick`] at `interval` while playing, which keeps the whole
/// crate at exactly one cooperative timer per player.
pub struct Player<S> {
    trace: Trace<S>,
    cursor: Option<usize>,
    playing: bool,
    interval: Duration,
}

impl<S: Step> Player<S> {
    pub fn new(trace: Trace<S>) -> Self {
        Player {
            trace,
            cursor: None,
            playing: false,
            interval: DEFAULT_INTERVAL,
        }
    }

    /// The step under the cursor, or `None` before the first advance.
    pub fn current(&self) -> Option<&S> {
        self.cursor.and_then(|i| self.trace.get(i))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.trace.len()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether the cursor sits on the last step.
    pub fn at_end(&self) -> bool {
        match self.cursor {
            Some(i) => i + 1 >= self.trace.len(),
            None => self.trace.is_empty(),
        }
    }

    /// Starts auto-advance. No-op when already at the last step; idempotent
    /// when already playing.
    pub fn play(&mut self) {
        if self.at_end() {
            return;
        }
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Advances the cursor by one. No-op at the last step.
    pub fn step_forward(&mut self) {
        if !self.at_end() {
            self.cursor = Some(self.cursor.map_or(0, |i| i + 1));
        }
    }

    /// Stops playback and returns the cursor to the unstarted position.
    pub fn reset(&mut self) {
        self.playing = false;
        self.cursor = None;
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
    }

    pub fn speed_up(&mut self) {
        self.set_interval(self.interval.saturating_sub(INTERVAL_STEP));
    }

    pub fn slow_down(&mut self) {
        self.set_interval(self.interval.saturating_add(INTERVAL_STEP));
    }

    /// One timer tick. While playing, advances the cursor by exactly one
    /// step; a tick that arrives with the cursor already on the last step
    /// stops playback instead of wrapping. Returns whether the cursor moved.
    pub fn tick(&mut self) -> bool {
        if !self.playing {
            return false;
        }
        if self.at_end() {
            self.playing = false;
            return false;
        }
        self.step_forward();
        true
    }
}
