use std::time::Duration;

pub use instant::Instant;

/// Wall-clock source for motion time and frame deltas.
///
/// Elapsed time is measured from `start()`, so every controller sees the same
/// `t` within a tick.
#[derive(Debug, Clone, Copy)]
pub struct AnimationClock {
    start: Instant,
    last_frame: Instant,
}

/// Time values for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    pub elapsed: f64,
    pub delta: f64,
}

impl AnimationClock {
    pub fn start() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last_frame: now,
        }
    }

    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;
        FrameTime {
            elapsed: now.duration_since(self.start).as_secs_f64(),
            delta: delta.min(Duration::from_millis(250)).as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elapsed_accumulates_and_delta_is_per_tick() {
        let mut clock = AnimationClock::start();
        let base = clock.start;
        let first = clock.tick_at(base + Duration::from_millis(100));
        let second = clock.tick_at(base + Duration::from_millis(150));
        assert!((first.elapsed - 0.1).abs() < 1e-9);
        assert!((second.elapsed - 0.15).abs() < 1e-9);
        assert!((second.delta - 0.05).abs() < 1e-9);
    }

    #[test]
    fn long_stalls_are_capped_in_delta_only() {
        let mut clock = AnimationClock::start();
        let base = clock.start;
        let frame = clock.tick_at(base + Duration::from_secs(3));
        assert!((frame.elapsed - 3.0).abs() < 1e-9);
        assert!((frame.delta - 0.25).abs() < 1e-9);
    }
}
