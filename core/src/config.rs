use crate::constants::{CLOCK_SPEED_HZ, TIMER_HZ};
use crate::quirks::Quirks;

/// Knobs that change how a program runs without changing the machine itself.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub quirks: Quirks,
    /// Instructions executed per second of emulated time.
    pub clock_speed_hz: u32,
    /// Timer decrements per second of emulated time.
    pub timer_hz: u32,
    /// Treat unrecognized opcodes as errors instead of skipping them.
    pub strict: bool,
    /// Seed for the random number instruction; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Config {
    /// How many instructions run between two timer ticks.
    pub fn cycles_per_frame(&self) -> u32 {
        (self.clock_speed_hz / self.timer_hz.max(1)).max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            quirks: Quirks::default(),
            clock_speed_hz: CLOCK_SPEED_HZ,
            timer_hz: TIMER_HZ,
            strict: false,
            seed: None,
        }
    }
}
