//! Fixed-timestep accumulator
//!
//! Frame time is accumulated and spent in whole ticks. A long stall is capped
//! so the host never tries to catch up on seconds of missed simulation.

/// Upper bound on ticks run for a single frame
pub const MAX_SUBSTEPS: u32 = 8;
/// Frame time above this is treated as a stall and clamped
const MAX_FRAME_SECS: f32 = 0.1;

#[derive(Debug, Clone)]
pub struct FixedClock {
    tick_secs: f32,
    accumulator: f32,
    running: bool,
}

impl FixedClock {
    pub fn new(tick_rate_hz: u32) -> Self {
        Self {
            tick_secs: 1.0 / tick_rate_hz.max(1) as f32,
            accumulator: 0.0,
            running: true,
        }
    }

    /// Length of one tick in seconds
    pub fn tick_secs(&self) -> f32 {
        self.tick_secs
    }

    /// Feed elapsed frame time; returns how many ticks to run now
    pub fn advance(&mut self, dt_secs: f32) -> u32 {
        if !self.running {
            return 0;
        }
        self.accumulator += dt_secs.clamp(0.0, MAX_FRAME_SECS);

        let mut substeps = 0;
        while self.accumulator >= self.tick_secs && substeps < MAX_SUBSTEPS {
            self.accumulator -= self.tick_secs;
            substeps += 1;
        }
        substeps
    }

    /// Halt the clock for good (game over or victory)
    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut clock = FixedClock::new(50);
        assert_eq!(clock.advance(0.012), 0);
        assert_eq!(clock.advance(0.012), 1);
        assert_eq!(clock.advance(0.012), 0);
        assert_eq!(clock.advance(0.012), 1);
    }

    #[test]
    fn test_stall_is_capped() {
        let mut clock = FixedClock::new(45);
        // Clamped to 100 ms, 4.5 ticks at 45 Hz
        assert_eq!(clock.advance(3.0), 4);

        let mut fast = FixedClock::new(200);
        assert_eq!(fast.advance(3.0), MAX_SUBSTEPS);
    }

    #[test]
    fn test_stopped_clock_never_ticks() {
        let mut clock = FixedClock::new(50);
        clock.stop();
        assert!(!clock.is_running());
        assert_eq!(clock.advance(0.05), 0);
    }
}
