/// Fixed-period frame pacing.
///
/// Each call to `wait` sleeps for whatever is left of the period since the
/// previous call. A frame that overran gets no sleep, so the next tick runs
/// immediately; ticks are never dropped or merged.

use std::time::{Duration, Instant};

use tracing::trace;

pub struct FramePacer {
    period: Duration,
    frame_start: Instant,
    overruns: u64,
}

impl FramePacer {
    pub fn new(period: Duration) -> Self {
        FramePacer { period, frame_start: Instant::now(), overruns: 0 }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Frames that took longer than the period.
    pub fn overruns(&self) -> u64 {
        self.overruns
    }

    /// Sleep still owed for a frame that took `frame_time`.
    pub fn remaining(&self, frame_time: Duration) -> Duration {
        self.period.saturating_sub(frame_time)
    }

    /// Block until the current period ends, then start the next frame.
    pub fn wait(&mut self) {
        let spent = self.frame_start.elapsed();
        let rest = self.remaining(spent);
        if rest.is_zero() {
            self.overruns += 1;
            trace!(?spent, period = ?self.period, "frame overran");
        } else {
            std::thread::sleep(rest);
        }
        self.frame_start = Instant::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remaining_is_the_rest_of_the_period() {
        let p = FramePacer::new(Duration::from_millis(33));
        assert_eq!(p.remaining(Duration::from_millis(10)), Duration::from_millis(23));
        assert_eq!(p.remaining(Duration::ZERO), Duration::from_millis(33));
    }

    #[test]
    fn overrun_owes_nothing() {
        let p = FramePacer::new(Duration::from_millis(33));
        assert_eq!(p.remaining(Duration::from_millis(50)), Duration::ZERO);
    }

    #[test]
    fn wait_counts_overruns() {
        let mut p = FramePacer::new(Duration::ZERO);
        p.wait();
        p.wait();
        assert_eq!(p.overruns(), 2);
    }

    #[test]
    fn wait_sleeps_out_the_period() {
        let mut p = FramePacer::new(Duration::from_millis(50));
        let start = Instant::now();
        p.wait();
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(p.overruns(), 0);
    }
}
