//! Playback speed and the simulation clock.
//!
//! Stopping doesn't halt the frame loop, it sets the per-frame increment to
//! zero. The increment in effect when stopped is kept so resuming restores it.

use derive_more::Display;
use tracing::debug;

use crate::units::SimTime;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaybackError {
    #[error("Speed can't be changed while playback is stopped")]
    Paused,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
pub enum PlaybackState {
    Running,
    Paused,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Playback {
    base_increment: SimTime,
    multiplier: u32,
    increment: SimTime,
    /// Increment to restore on resume, set while paused
    paused_increment: Option<SimTime>,
}

impl Playback {
    pub fn new(base_increment: SimTime, multiplier: u32) -> Self {
        Self {
            base_increment,
            multiplier,
            increment: base_increment * multiplier,
            paused_increment: None,
        }
    }

    pub fn increment(&self) -> SimTime {
        self.increment
    }

    pub fn base_increment(&self) -> SimTime {
        self.base_increment
    }

    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    pub fn state(&self) -> PlaybackState {
        if self.paused_increment.is_some() {
            PlaybackState::Paused
        } else {
            PlaybackState::Running
        }
    }

    pub fn is_paused(&self) -> bool {
        self.state() == PlaybackState::Paused
    }

    /// Stop the animation. Stopping twice keeps the increment from the first stop.
    pub fn pause(&mut self) {
        if self.paused_increment.is_none() {
            debug!(increment = ?self.increment, "Pausing playback");
            self.paused_increment = Some(self.increment);
            self.increment = SimTime::zero();
        }
    }

    pub fn resume(&mut self) {
        if let Some(inc) = self.paused_increment.take() {
            debug!(increment = ?inc, "Resuming playback");
            self.increment = inc;
        }
    }

    pub fn toggle(&mut self) -> PlaybackState {
        match self.state() {
            PlaybackState::Running => self.pause(),
            PlaybackState::Paused => self.resume(),
        }
        self.state()
    }

    pub fn set_speed_multiplier(&mut self, multiplier: u32) -> Result<SimTime, PlaybackError> {
        if self.is_paused() {
            return Err(PlaybackError::Paused);
        }
        self.multiplier = multiplier;
        self.increment = self.base_increment * multiplier;
        debug!(multiplier, increment = ?self.increment, "Speed multiplier set");
        Ok(self.increment)
    }
}

/// Monotonically non-decreasing simulated time
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct SimulationClock {
    time_step: SimTime,
}

impl SimulationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time_step(&self) -> SimTime {
        self.time_step
    }

    pub fn advance(&mut self, increment: SimTime) -> SimTime {
        debug_assert!(increment.as_f64() >= 0.0);
        self.time_step += increment;
        self.time_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base() -> SimTime {
        SimTime::from_f64(0.0001)
    }

    #[test]
    fn pause_twice_then_resume() {
        let mut p = Playback::new(base(), 3);
        let before = p.increment();
        p.pause();
        assert_eq!(p.increment(), SimTime::zero());
        p.pause();
        assert_eq!(p.increment(), SimTime::zero());
        p.resume();
        assert_eq!(p.increment(), before);
        assert_eq!(p.state(), PlaybackState::Running);

        // No-op while running
        p.resume();
        assert_eq!(p.increment(), before);
    }

    #[test]
    fn toggle() {
        let mut p = Playback::new(base(), 1);
        assert_eq!(p.toggle(), PlaybackState::Paused);
        assert_eq!(p.increment(), SimTime::zero());
        assert_eq!(p.toggle(), PlaybackState::Running);
        assert_eq!(p.increment(), base());
    }

    #[test]
    fn speed_multiplier() {
        let mut p = Playback::new(base(), 1);
        assert_eq!(p.set_speed_multiplier(0), Ok(SimTime::zero()));
        assert!(!p.is_paused());
        let inc = p.set_speed_multiplier(2).unwrap();
        assert_eq!(inc.as_f64(), 2.0 * base().as_f64());
        assert_eq!(p.multiplier(), 2);
    }

    #[test]
    fn speed_is_locked_while_paused() {
        let mut p = Playback::new(base(), 2);
        p.pause();
        assert_eq!(p.set_speed_multiplier(5), Err(PlaybackError::Paused));
        assert_eq!(p.multiplier(), 2);
        p.resume();
        assert_relative_eq!(p.increment().as_f64(), 0.0002);
    }

    #[test]
    fn clock_accumulates() {
        let mut c = SimulationClock::new();
        for _ in 0..10 {
            c.advance(base());
        }
        c.advance(SimTime::zero());
        assert_relative_eq!(c.time_step().as_f64(), 0.001, max_relative = 1e-12);
    }
}
