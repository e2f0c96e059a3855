use crate::units::SimTime;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct SimulationInfo {
    pub frame: u64,
    pub time_step: SimTime,
    pub real_time_start: Instant,
    pub real_time: Duration,
}

impl Default for SimulationInfo {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationInfo {
    pub fn new() -> Self {
        SimulationInfo {
            frame: 0,
            time_step: SimTime::zero(),
            real_time_start: Instant::now(),
            real_time: Duration::ZERO,
        }
    }

    pub fn frame_step(&mut self, time_step: SimTime) {
        self.frame += 1;
        self.time_step = time_step;
        self.real_time = Instant::now().duration_since(self.real_time_start);
    }

    /// Frames per wall-clock second since start
    pub fn frame_rate(&self) -> f64 {
        let secs = self.real_time.as_secs_f64();
        if secs > 0.0 {
            self.frame as f64 / secs
        } else {
            0.0
        }
    }
}
