use std::time::{Duration, Instant};

/// Throttles the loop to a fixed frame rate. A late frame is not made up
/// for: the next frame is measured from when the late one finished.
pub struct FrameClock {
    period: Duration,
    last: Instant,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / fps.max(1),
            last: Instant::now(),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time left in the current frame after `elapsed` has been spent.
    pub fn remaining(&self, elapsed: Duration) -> Duration {
        self.period.saturating_sub(elapsed)
    }

    /// Sleeps out the rest of the frame and starts the next one.
    pub fn tick(&mut self) {
        let wait = self.remaining(self.last.elapsed());
        if !wait.is_zero() {
            std::thread::sleep(wait);
        }
        self.last = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixty_fps_period() {
        let clock = FrameClock::new(60);
        assert_eq!(clock.period(), Duration::from_nanos(16_666_666));
    }

    #[test]
    fn late_frames_do_not_accumulate_debt() {
        let clock = FrameClock::new(60);
        assert_eq!(clock.remaining(Duration::from_millis(50)), Duration::ZERO);
        assert_eq!(clock.remaining(Duration::ZERO), clock.period());
        assert!(clock.remaining(Duration::from_millis(10)) < Duration::from_millis(7));
    }

    #[test]
    fn tick_waits_out_the_frame() {
        let mut clock = FrameClock::new(100);
        clock.tick();
        let start = Instant::now();
        clock.tick();
        assert!(start.elapsed() >= Duration::from_millis(9));
    }
}
