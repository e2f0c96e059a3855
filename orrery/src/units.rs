//! A lightweight uom-ish set of quantities for the scaled scene.

use std::ops::{Add, AddAssign, Mul, Sub};

/// Simulated time, the scalar the orbit model is parameterized by.
///
/// Unitless: it only advances by the playback increment once per frame.
#[derive(Copy, Clone, PartialEq, PartialOrd, Default)]
pub struct SimTime {
    t: f64,
}

impl std::fmt::Debug for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} t", self.t)
    }
}

impl std::fmt::Display for SimTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.t)
    }
}

impl SimTime {
    pub fn zero() -> SimTime {
        SimTime { t: 0.0 }
    }

    pub fn from_f64(t: f64) -> SimTime {
        SimTime { t }
    }

    pub fn as_f64(&self) -> f64 {
        self.t
    }
}

impl Add<SimTime> for SimTime {
    type Output = SimTime;

    fn add(self, rhs: SimTime) -> Self::Output {
        SimTime::from_f64(self.t + rhs.t)
    }
}

impl AddAssign<SimTime> for SimTime {
    fn add_assign(&mut self, rhs: SimTime) {
        self.t += rhs.t
    }
}

impl Sub<SimTime> for SimTime {
    type Output = SimTime;

    fn sub(self, rhs: SimTime) -> Self::Output {
        SimTime::from_f64(self.t - rhs.t)
    }
}

impl Mul<f64> for SimTime {
    type Output = SimTime;

    fn mul(self, rhs: f64) -> Self::Output {
        SimTime::from_f64(self.t * rhs)
    }
}

impl Mul<u32> for SimTime {
    type Output = SimTime;

    fn mul(self, rhs: u32) -> Self::Output {
        SimTime::from_f64(self.t * f64::from(rhs))
    }
}

#[derive(Copy, Clone, PartialEq, PartialOrd)]
pub struct Angle {
    radians: f64,
}

impl std::fmt::Debug for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.as_degrees())
    }
}

impl Angle {
    pub fn from_degrees(degrees: f64) -> Angle {
        Angle {
            radians: degrees.to_radians(),
        }
    }

    pub fn from_radians(radians: f64) -> Angle {
        Angle { radians }
    }

    pub fn as_degrees(&self) -> f64 {
        self.radians.to_degrees()
    }

    pub fn as_radians(&self) -> f64 {
        self.radians
    }
}

impl Add<Angle> for Angle {
    type Output = Angle;

    fn add(self, rhs: Angle) -> Self::Output {
        Angle::from_radians(self.radians + rhs.radians)
    }
}
