//! Closed-form circular orbits and orbit outline sampling.
//!
//! All orbits lie in the XY plane (z = 0). The angular position is
//! `θ = t × (k / d)`, so bodies further out move slower. This is a visual
//! stylization of orbital periods, not Kepler's third law.

use na::{Point3, Vector3};
use std::f64::consts::TAU;

use crate::units::{Angle, SimTime};

/// The `k` in `θ = t × (k / d)`
pub const ANGULAR_SPEED_CONSTANT: f64 = 1000.0;

/// Number of points sampled per orbit outline
pub const OUTLINE_SEGMENTS: usize = 250;

pub const MIN_OUTLINE_SEGMENTS: usize = 3;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OrbitError {
    #[error("Invalid orbit configuration: {0}")]
    InvalidConfiguration(String),
}

/// A circular orbit of a fixed, strictly positive radius.
///
/// The radius is checked on construction so a zero distance (reserved for the
/// central body) can never reach the angular speed term.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Orbit {
    distance: f64,
    angular_speed: f64,
}

impl Orbit {
    pub fn new(distance: f64) -> Result<Self, OrbitError> {
        Self::with_angular_speed(distance, ANGULAR_SPEED_CONSTANT)
    }

    pub fn with_angular_speed(distance: f64, angular_speed: f64) -> Result<Self, OrbitError> {
        if !distance.is_finite() || distance <= 0.0 {
            return Err(OrbitError::InvalidConfiguration(format!(
                "orbital distance must be finite and greater than zero, got {distance}"
            )));
        }
        if !angular_speed.is_finite() || angular_speed <= 0.0 {
            return Err(OrbitError::InvalidConfiguration(format!(
                "angular speed must be finite and greater than zero, got {angular_speed}"
            )));
        }
        Ok(Self {
            distance,
            angular_speed,
        })
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn angle_at(&self, t: SimTime) -> Angle {
        Angle::from_radians(t.as_f64() * (self.angular_speed / self.distance))
    }

    /// Position on the orbit around the origin
    pub fn position_at(&self, t: SimTime) -> Vector3<f64> {
        self.offset_at(t)
    }

    /// Position on the orbit around a (possibly moving) center.
    ///
    /// The satellite convention places the body opposite the offset used for
    /// [`Orbit::position_at`].
    pub fn position_around(&self, center: &Vector3<f64>, t: SimTime) -> Vector3<f64> {
        center - self.offset_at(t)
    }

    pub fn outline_around(
        &self,
        center: &Vector3<f64>,
        segments: usize,
    ) -> Result<OrbitOutline, OrbitError> {
        sample_outline(center, self.distance, self.distance, segments)
    }

    fn offset_at(&self, t: SimTime) -> Vector3<f64> {
        let theta = self.angle_at(t).as_radians();
        Vector3::new(theta.cos(), theta.sin(), 0.0).scale(self.distance)
    }
}

/// Position of a body orbiting the origin at `distance` at time `t`
pub fn position_at(distance: f64, t: SimTime) -> Result<Vector3<f64>, OrbitError> {
    Ok(Orbit::new(distance)?.position_at(t))
}

/// Closed curve of evenly spaced points on an ellipse in the orbital plane
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitOutline {
    center: Vector3<f64>,
    points: Vec<Point3<f64>>,
}

impl OrbitOutline {
    pub fn center(&self) -> &Vector3<f64> {
        &self.center
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Line segments closing the loop, last point joins the first
    pub fn segments(&self) -> impl Iterator<Item = (&Point3<f64>, &Point3<f64>)> + '_ {
        self.points
            .iter()
            .zip(self.points.iter().cycle().skip(1))
    }
}

pub fn sample_outline(
    center: &Vector3<f64>,
    radius_x: f64,
    radius_y: f64,
    segments: usize,
) -> Result<OrbitOutline, OrbitError> {
    if segments < MIN_OUTLINE_SEGMENTS {
        return Err(OrbitError::InvalidConfiguration(format!(
            "an outline needs at least {MIN_OUTLINE_SEGMENTS} segments, got {segments}"
        )));
    }
    for r in [radius_x, radius_y] {
        if !r.is_finite() || r <= 0.0 {
            return Err(OrbitError::InvalidConfiguration(format!(
                "outline radius must be finite and greater than zero, got {r}"
            )));
        }
    }

    let points = (0..segments)
        .map(|i| {
            let a = TAU * (i as f64) / (segments as f64);
            Point3::new(
                center.x + radius_x * a.cos(),
                center.y + radius_y * a.sin(),
                center.z,
            )
        })
        .collect();

    Ok(OrbitOutline {
        center: *center,
        points,
    })
}
