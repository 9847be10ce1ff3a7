use std::time::Instant;

/// One reading of the scene clock, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockSample {
    /// Since the clock started. Never decreases.
    pub elapsed: f32,
    /// Since the previous sample.
    pub delta: f32,
}

/// Monotonic scene clock. The base camera motion is a function of
/// `elapsed`; nothing else in the scene keeps time.
#[derive(Debug)]
pub struct Clock {
    start: Instant,
    previous: f32,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            previous: 0.0,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    /// Reads the clock and advances the delta reference.
    pub fn sample(&mut self) -> ClockSample {
        let elapsed = self.elapsed().max(self.previous);
        let delta = elapsed - self.previous;
        self.previous = elapsed;
        ClockSample { elapsed, delta }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn clock_samples_are_monotonic() {
        let mut clock = Clock::new();
        let first = clock.sample();
        thread::sleep(Duration::from_millis(10));
        let second = clock.sample();

        assert!(first.elapsed >= 0.0);
        assert!(second.elapsed >= first.elapsed + 0.009);
        assert!((second.delta - (second.elapsed - first.elapsed)).abs() < 1e-6);
    }

    #[test]
    fn first_delta_counts_from_start() {
        let mut clock = Clock::new();
        thread::sleep(Duration::from_millis(5));
        let sample = clock.sample();
        assert!((sample.delta - sample.elapsed).abs() < 1e-6);
    }
}
