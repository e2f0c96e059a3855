use bodies::prelude::{BodyKind, BodyRegistry};
use na::Vector3;
use std::f64::consts::PI;

use crate::{
    orbit::{ANGULAR_SPEED_CONSTANT, OUTLINE_SEGMENTS},
    scenario::{BodySpec, CameraConfig, Decoration, OrbitConfig, PlaybackConfig},
    scene::{Appearance, Color},
    units::{Angle, SimTime},
};

/// Simulated time advanced per frame at a 1x multiplier
pub const BASE_INCREMENT: f64 = 0.0001;

/// The Moon's scaled real distance sits inside the Earth, so it's drawn
/// further out
pub const MOON_ORBIT_DISTANCE: f64 = 75.0;

pub const CAMERA_OFFSET: [f64; 3] = [0.0, 0.0, 100.0];
pub const CAMERA_FOV_DEGREES: f64 = 75.0;
pub const CAMERA_NEAR: f64 = 0.1;
pub const CAMERA_FAR: f64 = 100_000_000.0;

pub const RING_INNER_MARGIN: f64 = 60.0;
pub const RING_OUTER_MARGIN: f64 = 110.0;

pub fn playback_config() -> PlaybackConfig {
    PlaybackConfig {
        base_increment: SimTime::from_f64(BASE_INCREMENT),
        speed_multiplier: 1,
        start_paused: false,
    }
}

pub fn camera_config() -> CameraConfig {
    CameraConfig {
        offset: Vector3::from(CAMERA_OFFSET),
        initial_focus: BodyKind::Sun,
        fov: Angle::from_degrees(CAMERA_FOV_DEGREES),
        near: CAMERA_NEAR,
        far: CAMERA_FAR,
    }
}

pub fn orbit_config() -> OrbitConfig {
    OrbitConfig {
        angular_speed: ANGULAR_SPEED_CONSTANT,
        outline_segments: OUTLINE_SEGMENTS,
        planet_outline_color: Color::RED,
        satellite_outline_color: Color::MAGENTA,
    }
}

pub fn color(kind: BodyKind) -> Color {
    use BodyKind::*;
    match kind {
        Sun => Color::YELLOW,
        Mercury => Color::GREY,
        Venus => Color::TAN,
        Earth => Color::GREEN,
        Moon => Color::GREY,
        Mars => Color::from_rgb_u8(0xb3, 0x72, 0x55),
        Jupiter => Color::from_rgb_u8(0xe6, 0xaa, 0x5c),
        Saturn => Color::TAN,
        Uranus => Color::AQUA,
        Neptune => Color::BLUE,
    }
}

pub fn body_spec(registry: &BodyRegistry, kind: BodyKind) -> BodySpec {
    let cfg = registry.config(kind);

    let orbit_distance = if kind == BodyKind::Moon {
        MOON_ORBIT_DISTANCE
    } else {
        cfg.distance
    };

    let (appearance, decorations) = match kind {
        BodyKind::Sun => (Appearance::emissive(color(kind)), vec![Decoration::PointLight]),
        BodyKind::Saturn => (
            Appearance::lit(color(kind)),
            vec![Decoration::Ring {
                inner_radius: cfg.radius + RING_INNER_MARGIN,
                outer_radius: cfg.radius + RING_OUTER_MARGIN,
                tilt: Angle::from_radians(PI * 0.05),
                color: Color::GREY,
            }],
        ),
        _ => (Appearance::lit(color(kind)), Vec::new()),
    };

    BodySpec {
        kind,
        radius: cfg.radius,
        orbit_distance,
        appearance,
        decorations,
    }
}

pub fn bodies(registry: &BodyRegistry) -> Vec<BodySpec> {
    registry
        .iter()
        .map(|(kind, _)| body_spec(registry, kind))
        .collect()
}
