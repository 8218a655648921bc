//! # Tick Clock for Simulation
//!
//! Virtual time for the control loop: a tick counter and the fixed period
//! between ticks. Elapsed time is derived, never measured.

use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TickClock {
    tick: u64,
    period: Duration,
}

impl TickClock {
    pub fn new(period: Duration) -> Self {
        Self { tick: 0, period }
    }

    /// Index of the current tick, starting at zero.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Virtual time at the start of the current tick.
    #[inline]
    pub fn elapsed(&self) -> Duration {
        let ticks = u32::try_from(self.tick).unwrap_or(u32::MAX);
        self.period.saturating_mul(ticks)
    }

    #[inline]
    pub fn advance(&mut self) {
        self.tick += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        let clock = TickClock::new(Duration::from_millis(10));
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.elapsed(), Duration::ZERO);
    }

    #[test]
    fn advance_accumulates_periods() {
        let mut clock = TickClock::new(Duration::from_millis(10));
        for _ in 0..30 {
            clock.advance();
        }
        assert_eq!(clock.tick(), 30);
        assert_eq!(clock.elapsed(), Duration::from_millis(300));
    }
}
