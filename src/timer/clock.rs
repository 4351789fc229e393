//! Frame-sampled one-second tick source

/// Milliseconds that must elapse between two ticks
pub const TICK_INTERVAL_MS: u64 = 1000;

/// Turns a stream of monotonic clock samples into discrete one-second ticks.
///
/// At most one tick is emitted per sample. When a sample arrives long after
/// the previous tick, the surplus is dropped rather than queued, so a
/// suspended process resumes with a single decrement.
#[derive(Debug, Default, Clone)]
pub struct ClockDriver {
    reference_ms: Option<u64>,
}

impl ClockDriver {
    pub fn new() -> Self {
        Self { reference_ms: None }
    }

    /// Feed one clock sample. Returns `true` when a tick should be delivered.
    pub fn sample(&mut self, now_ms: u64, is_active: bool) -> bool {
        let Some(reference) = self.reference_ms else {
            self.reference_ms = Some(now_ms);
            return false;
        };

        if !is_active {
            // Keep the reference fresh so resuming does not count idle time
            self.reference_ms = Some(now_ms);
            return false;
        }

        if now_ms.saturating_sub(reference) >= TICK_INTERVAL_MS {
            self.reference_ms = Some(now_ms);
            true
        } else {
            false
        }
    }

    /// Forget the reference sample; the next sample re-establishes it
    pub fn reset(&mut self) {
        self.reference_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed samples given as deltas between consecutive samples
    fn run(driver: &mut ClockDriver, start: u64, deltas: &[u64], active: bool) -> usize {
        let mut now = start;
        let mut ticks = 0;
        for delta in deltas {
            now += delta;
            if driver.sample(now, active) {
                ticks += 1;
            }
        }
        ticks
    }

    #[test]
    fn first_sample_only_sets_reference() {
        let mut driver = ClockDriver::new();
        assert!(!driver.sample(5_000, true));
        assert!(driver.sample(6_000, true));
    }

    #[test]
    fn coalesces_sub_second_samples() {
        let mut driver = ClockDriver::new();
        driver.sample(0, true);
        assert_eq!(run(&mut driver, 0, &[0, 400, 1200, 100], true), 1);
    }

    #[test]
    fn long_gap_yields_single_tick() {
        let mut driver = ClockDriver::new();
        driver.sample(0, true);
        assert!(driver.sample(10_000, true));
        assert!(!driver.sample(10_500, true));
        assert!(driver.sample(11_000, true));
    }

    #[test]
    fn inactive_samples_refresh_reference() {
        let mut driver = ClockDriver::new();
        driver.sample(0, false);
        assert_eq!(run(&mut driver, 0, &[800, 5_000, 3_000], false), 0);
        // Resume at 8_800: idle time must not produce a tick
        assert!(!driver.sample(9_000, true));
        assert!(driver.sample(9_800, true));
    }

    #[test]
    fn steady_frames_tick_once_per_second() {
        let mut driver = ClockDriver::new();
        driver.sample(0, true);
        let frames = vec![16; 63 * 5];
        assert_eq!(run(&mut driver, 0, &frames, true), 5);
    }

    #[test]
    fn backwards_sample_does_not_tick() {
        let mut driver = ClockDriver::new();
        driver.sample(2_000, true);
        assert!(!driver.sample(1_000, true));
        assert!(driver.sample(3_000, true));
    }

    #[test]
    fn reset_forgets_reference() {
        let mut driver = ClockDriver::new();
        driver.sample(0, true);
        driver.reset();
        assert!(!driver.sample(5_000, true));
    }
}
