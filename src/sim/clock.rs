//! Session countdown

use serde::{Deserialize, Serialize};

/// Whole-second countdown. Real time is fed in with [`SessionClock::advance`];
/// the clock converts it into one-second ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClock {
    remaining: u32,
    active: bool,
    /// Real time not yet turned into a tick
    carry: f64,
}

impl SessionClock {
    pub fn new(duration_secs: u32) -> Self {
        Self {
            remaining: duration_secs,
            active: true,
            carry: 0.0,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// One interval tick. Returns the new remaining time, or `None` when
    /// stopped or already at zero.
    pub fn tick_second(&mut self) -> Option<u32> {
        if !self.active || self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.remaining)
    }

    /// Feed `dt` seconds of real time; returns how many ticks fired
    pub fn advance(&mut self, dt: f32) -> u32 {
        if !self.active {
            return 0;
        }
        self.carry += f64::from(dt.max(0.0));
        let mut fired = 0;
        while self.carry >= 1.0 {
            self.carry -= 1.0;
            if self.tick_second().is_none() {
                self.carry = 0.0;
                break;
            }
            fired += 1;
        }
        fired
    }

    /// Freeze permanently
    pub fn stop(&mut self) {
        self.active = false;
        self.carry = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticks_once_per_second() {
        let mut clock = SessionClock::new(10);
        assert_eq!(clock.advance(0.5), 0);
        assert_eq!(clock.remaining(), 10);
        assert_eq!(clock.advance(0.5), 1);
        assert_eq!(clock.remaining(), 9);
        assert_eq!(clock.advance(2.25), 2);
        assert_eq!(clock.remaining(), 7);
    }

    #[test]
    fn test_frame_sized_steps() {
        let mut clock = SessionClock::new(5);
        for _ in 0..120 {
            clock.advance(1.0 / 60.0);
        }
        // Accumulated float error may leave the second tick one frame late
        assert!(clock.remaining() == 3 || clock.remaining() == 4);
        clock.advance(1.0 / 60.0);
        assert_eq!(clock.remaining(), 3);
    }

    #[test]
    fn test_clamped_at_zero() {
        let mut clock = SessionClock::new(2);
        assert_eq!(clock.advance(10.0), 2);
        assert_eq!(clock.remaining(), 0);
        assert!(clock.is_expired());
        assert_eq!(clock.tick_second(), None);
        assert_eq!(clock.advance(5.0), 0);
        assert_eq!(clock.remaining(), 0);
    }

    #[test]
    fn test_stopped_clock_is_frozen() {
        let mut clock = SessionClock::new(30);
        clock.advance(3.0);
        clock.stop();
        assert!(!clock.is_active());
        assert_eq!(clock.advance(10.0), 0);
        assert_eq!(clock.tick_second(), None);
        assert_eq!(clock.remaining(), 27);
    }

    #[test]
    fn test_zero_duration_is_expired_immediately() {
        let clock = SessionClock::new(0);
        assert!(clock.is_expired());
    }
}
