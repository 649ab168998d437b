use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Monotonic time since the session started. Never clamped or reset.
    pub elapsed: Duration,

    /// Seconds since the previous tick, clamped to `[0, dt_max]`.
    pub dt: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

impl FrameTime {
    /// Snapshot at a fixed session time. Used by tests and replay tooling.
    pub fn at(elapsed: Duration, frame_index: u64) -> Self {
        Self {
            elapsed,
            dt: 0.0,
            frame_index,
        }
    }

    /// Session time in milliseconds.
    ///
    /// Kept in `f64`; narrowing to `f32` happens only once the angle is known.
    #[inline]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Session clock producing `FrameTime` snapshots.
///
/// `elapsed` is measured from construction, so transforms derived from it are
/// frame-rate independent. Only `dt` is clamped, to keep per-frame consumers
/// stable after stalls (debugger, minimized window).
#[derive(Debug, Clone)]
pub struct SessionClock {
    start: Instant,
    last: Instant,
    frame_index: u64,
    dt_max: Duration,
}

impl SessionClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Creates a clock whose session began at `start`.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            last: start,
            frame_index: 0,
            dt_max: Duration::from_millis(250),
        }
    }

    /// Advances the clock to now.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    /// Advances the clock to `now`.
    pub fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now.saturating_duration_since(self.last).min(self.dt_max);
        self.last = now;

        let ft = FrameTime {
            elapsed: now.saturating_duration_since(self.start),
            dt: dt.as_secs_f32(),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_is_measured_from_session_start() {
        let start = Instant::now();
        let mut clock = SessionClock::starting_at(start);

        clock.tick_at(start + Duration::from_millis(16));
        let ft = clock.tick_at(start + Duration::from_millis(1500));

        assert_eq!(ft.elapsed, Duration::from_millis(1500));
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn dt_is_clamped_but_elapsed_is_not() {
        let start = Instant::now();
        let mut clock = SessionClock::starting_at(start);

        let ft = clock.tick_at(start + Duration::from_secs(10));
        assert_eq!(ft.dt, 0.25);
        assert_eq!(ft.elapsed, Duration::from_secs(10));
    }

    #[test]
    fn time_before_last_tick_saturates() {
        let start = Instant::now();
        let mut clock = SessionClock::starting_at(start + Duration::from_secs(1));

        let ft = clock.tick_at(start);
        assert_eq!(ft.dt, 0.0);
        assert_eq!(ft.elapsed, Duration::ZERO);
    }

    #[test]
    fn elapsed_ms_keeps_sub_millisecond_precision() {
        let ft = FrameTime::at(Duration::from_micros(1_500), 0);
        assert!((ft.elapsed_ms() - 1.5).abs() < 1e-12);
    }
}
