//! Scheduler ticks
//!
//! Exploration advances in discrete ticks; nothing in the core reads the
//! wall clock.

/// Counts scheduler ticks for one exploration session
#[derive(Debug, Clone, Default)]
pub struct TickClock {
    /// Ticks elapsed since creation or the last reset
    tick: u64,
}

impl TickClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one tick and return the new tick index
    pub fn advance(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    /// Current tick index
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Reset the clock
    pub fn reset(&mut self) {
        self.tick = 0;
    }
}
