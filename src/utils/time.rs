use std::time::{Duration, Instant};

/// Largest frame delta handed to animations. Longer stalls (a window
/// dragged, a breakpoint) would otherwise finish every tween in one jump.
pub const DEFAULT_MAX_DELTA: Duration = Duration::from_millis(100);

/// Frame clock for callers driving [`Viewer::tick`](crate::viewer::Viewer::tick).
#[derive(Debug, Clone)]
pub struct Timer {
    start_time: Instant,
    last_update: Instant,
    max_delta: Duration,
    /// Time since last tick, clamped to `max_delta`
    pub delta: Duration,
    /// Total elapsed time since creation
    pub elapsed: Duration,
    /// Total number of ticks
    pub frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Creates a new timer starting from now.
    #[must_use]
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start_time: now,
            last_update: now,
            max_delta: DEFAULT_MAX_DELTA,
            delta: Duration::ZERO,
            elapsed: Duration::ZERO,
            frame_count: 0,
        }
    }

    #[must_use]
    pub fn with_max_delta(mut self, max_delta: Duration) -> Self {
        self.max_delta = max_delta;
        self
    }

    /// Advances the clock and returns the clamped delta in seconds.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta = (now - self.last_update).min(self.max_delta);
        self.elapsed = now - self.start_time;
        self.last_update = now;
        self.frame_count += 1;
        self.dt_seconds()
    }

    #[must_use]
    pub fn dt_seconds(&self) -> f32 {
        self.delta.as_secs_f32()
    }
}
