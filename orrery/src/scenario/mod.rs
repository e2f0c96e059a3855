use bodies::prelude::{BodyKind, BodyRegistry};
use na::Vector3;
use std::path::Path;
use tracing::info;

use self::config::Config;
use crate::{
    scene::{Appearance, Color},
    units::{Angle, SimTime},
};

pub use self::config::ConfigError;

pub mod config;
pub mod nominal;

#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub registry: BodyRegistry,
    /// Construction order, every parent precedes its satellites
    pub bodies: Vec<BodySpec>,
    pub focus_order: Vec<BodyKind>,
    pub playback: PlaybackConfig,
    pub camera: CameraConfig,
    pub orbits: OrbitConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    pub kind: BodyKind,
    pub radius: f64,
    /// Distance from the parent as drawn, zero for the central body
    pub orbit_distance: f64,
    pub appearance: Appearance,
    pub decorations: Vec<Decoration>,
}

/// Visuals that follow a body
#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    Ring {
        inner_radius: f64,
        outer_radius: f64,
        tilt: Angle,
        color: Color,
    },
    PointLight,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PlaybackConfig {
    pub base_increment: SimTime,
    pub speed_multiplier: u32,
    pub start_paused: bool,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraConfig {
    pub offset: Vector3<f64>,
    pub initial_focus: BodyKind,
    pub fov: Angle,
    pub near: f64,
    pub far: f64,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitConfig {
    pub angular_speed: f64,
    pub outline_segments: usize,
    pub planet_outline_color: Color,
    pub satellite_outline_color: Color,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::nominal()
    }
}

impl Scenario {
    pub fn nominal() -> Self {
        let registry = BodyRegistry::solar_system();
        Self {
            name: "nominal".to_owned(),
            bodies: nominal::bodies(&registry),
            registry,
            focus_order: BodyKind::FOCUS_ORDER.to_vec(),
            playback: nominal::playback_config(),
            camera: nominal::camera_config(),
            orbits: nominal::orbit_config(),
        }
    }

    pub fn load<P: AsRef<Path>>(config: Option<P>) -> Result<Self, ConfigError> {
        let mut scenario = Self::nominal();

        if let Some(cfg_path) = config.as_ref() {
            info!(
                config = %cfg_path.as_ref().display(),
                "Loading scenario from config file",
            );
            let cfg = Config::load(cfg_path)?;
            scenario.apply(&cfg)?;
        } else {
            info!("Loading default nominal scenario");
        }

        Ok(scenario)
    }

    /// Apply a checked config on top of this scenario
    pub fn apply(&mut self, cfg: &Config) -> Result<(), ConfigError> {
        if let Some(name) = cfg.name.as_ref() {
            self.name = name.clone();
        }

        if let Some(p) = cfg.playback.as_ref() {
            if let Some(inc) = p.base_increment {
                self.playback.base_increment = SimTime::from_f64(inc);
            }
            if let Some(m) = p.speed_multiplier {
                self.playback.speed_multiplier = m;
            }
            if let Some(paused) = p.start_paused {
                self.playback.start_paused = paused;
            }
        }

        if let Some(c) = cfg.camera.as_ref() {
            if let Some(offset) = c.offset {
                self.camera.offset = Vector3::from(offset);
            }
            if let Some(name) = c.initial_focus.as_ref() {
                self.camera.initial_focus = name.parse()?;
            }
            if let Some(fov) = c.fov {
                self.camera.fov = Angle::from_degrees(fov);
            }
            if let Some(near) = c.near {
                self.camera.near = near;
            }
            if let Some(far) = c.far {
                self.camera.far = far;
            }
        }

        if let Some(o) = cfg.orbits.as_ref() {
            if let Some(k) = o.angular_speed {
                self.orbits.angular_speed = k;
            }
            if let Some(n) = o.outline_segments {
                self.orbits.outline_segments = n;
            }
            if let Some(c) = o.planet_outline_color.as_ref() {
                self.orbits.planet_outline_color = config::parse_color(c)?;
            }
            if let Some(c) = o.satellite_outline_color.as_ref() {
                self.orbits.satellite_outline_color = config::parse_color(c)?;
            }
        }

        if let Some(order) = cfg.focus_order.as_ref() {
            self.focus_order = order
                .iter()
                .map(|n| n.parse())
                .collect::<Result<Vec<BodyKind>, _>>()?;
        }

        // Later entries win
        for spec in self.bodies.iter_mut() {
            for entry in cfg.body_entries(spec.kind) {
                if let Some(c) = entry.color.as_ref() {
                    spec.appearance.color = config::parse_color(c)?;
                }
                if let Some(d) = entry.orbit_distance {
                    spec.orbit_distance = d;
                }
            }
        }

        if !self.focus_order.contains(&self.camera.initial_focus) {
            return Err(ConfigError::Value {
                key: "camera.initial-focus",
                reason: format!("'{}' is not in the focus order", self.camera.initial_focus),
            });
        }

        Ok(())
    }

    pub fn body(&self, kind: BodyKind) -> Option<&BodySpec> {
        self.bodies.iter().find(|b| b.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use indoc::indoc;

    #[test]
    fn nominal_scenario() {
        let s = Scenario::nominal();
        assert_eq!(s.bodies.len(), 10);
        assert_eq!(s.focus_order, BodyKind::FOCUS_ORDER.to_vec());
        assert_eq!(s.camera.initial_focus, BodyKind::Sun);
        assert_relative_eq!(s.playback.base_increment.as_f64(), 0.0001);

        let sun = s.body(BodyKind::Sun).unwrap();
        assert_eq!(sun.orbit_distance, 0.0);
        assert!(!sun.appearance.lit);
        assert_eq!(sun.decorations, vec![Decoration::PointLight]);

        let moon = s.body(BodyKind::Moon).unwrap();
        assert_eq!(moon.orbit_distance, nominal::MOON_ORBIT_DISTANCE);
        assert_relative_eq!(s.registry.config(BodyKind::Moon).distance, 3.835);

        let saturn = s.body(BodyKind::Saturn).unwrap();
        match saturn.decorations.as_slice() {
            [Decoration::Ring {
                inner_radius,
                outer_radius,
                ..
            }] => {
                assert_relative_eq!(*inner_radius, saturn.radius + 60.0);
                assert_relative_eq!(*outer_radius, saturn.radius + 110.0);
            }
            d => panic!("unexpected decorations {d:?}"),
        }

        let earth = s.body(BodyKind::Earth).unwrap();
        assert_relative_eq!(earth.radius, 12.756);
        assert_relative_eq!(earth.orbit_distance, 1496.0);
    }

    #[test]
    fn apply_overrides() {
        const TOML: &str = indoc! {r#"
            name = 'overrides'
            focus-order = ['earth', 'moon', 'mars']

            [playback]
            speed-multiplier = 4

            [camera]
            initial-focus = 'moon'

            [orbits]
            satellite-outline-color = 'aqua'

            [[body]]
            matches = '^m'
            color = '#010203'

            [[body]]
            name = 'mars'
            color = 'red'

            [[body]]
            name = 'moon'
            orbit-distance = 40.0
        "#};
        let cfg = Config::from_str_checked(TOML).unwrap();
        let mut s = Scenario::nominal();
        s.apply(&cfg).unwrap();

        assert_eq!(s.name, "overrides");
        assert_eq!(s.playback.speed_multiplier, 4);
        assert_eq!(s.camera.initial_focus, BodyKind::Moon);
        assert_eq!(s.orbits.satellite_outline_color, Color::AQUA);
        assert_eq!(
            s.focus_order,
            vec![BodyKind::Earth, BodyKind::Moon, BodyKind::Mars]
        );

        let dim = Color::from_rgb_u8(1, 2, 3);
        assert_eq!(s.body(BodyKind::Mercury).unwrap().appearance.color, dim);
        assert_eq!(s.body(BodyKind::Moon).unwrap().appearance.color, dim);
        assert_eq!(s.body(BodyKind::Mars).unwrap().appearance.color, Color::RED);
        assert_eq!(s.body(BodyKind::Moon).unwrap().orbit_distance, 40.0);
        assert_eq!(
            s.body(BodyKind::Venus).unwrap().appearance.color,
            nominal::color(BodyKind::Venus)
        );
    }

    #[test]
    fn initial_focus_must_be_focusable() {
        let cfg = Config::from_str_checked("focus-order = ['earth']").unwrap();
        let mut s = Scenario::nominal();
        assert!(matches!(
            s.apply(&cfg),
            Err(ConfigError::Value {
                key: "camera.initial-focus",
                ..
            })
        ));
    }

    #[test]
    fn load_missing_file() {
        assert!(matches!(
            Scenario::load(Some("does/not/exist.toml")),
            Err(ConfigError::Io { .. })
        ));
        assert!(Scenario::load(None::<&str>).is_ok());
    }
}
