use bodies::prelude::{BodyKind, ParseBodyKindError};
use regex::Regex;
use serde::Deserialize;
use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use crate::{orbit::MIN_OUTLINE_SEGMENTS, scene::Color};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file")]
    Toml(#[from] toml::de::Error),
    #[error(transparent)]
    UnknownBody(#[from] ParseBodyKindError),
    #[error("Configuration entry for body #{0} must have exactly one of 'name' or 'matches'")]
    BodySelector(usize),
    #[error("Configuration entry for body #{index} contains an invalid 'matches' regex")]
    Regex {
        index: usize,
        #[source]
        source: regex::Error,
    },
    #[error("Duplicate configuration entry for body '{0}'")]
    DuplicateBody(BodyKind),
    #[error("Configuration entry for body (matches='{0}') doesn't match any body")]
    NoMatch(String),
    #[error("Invalid color '{0}', expected '#rrggbb' or a color name")]
    Color(String),
    #[error("Invalid value for '{key}': {reason}")]
    Value { key: &'static str, reason: String },
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub name: Option<String>,
    pub playback: Option<Playback>,
    pub camera: Option<Camera>,
    pub orbits: Option<Orbits>,
    pub focus_order: Option<Vec<String>>,
    #[serde(alias = "body")]
    pub bodies: Vec<Body>,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_str_checked(&content)
    }

    pub fn from_str_checked(s: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(s)?;

        if let Some(p) = cfg.playback.as_ref() {
            if let Some(inc) = p.base_increment {
                positive("playback.base-increment", inc)?;
            }
        }

        if let Some(c) = cfg.camera.as_ref() {
            if let Some(offset) = c.offset {
                if offset.iter().any(|v| !v.is_finite()) {
                    return Err(value_err("camera.offset", "components must be finite"));
                }
                if offset.iter().all(|v| *v == 0.0) {
                    return Err(value_err("camera.offset", "must not be zero"));
                }
            }
            if let Some(name) = c.initial_focus.as_ref() {
                name.parse::<BodyKind>()?;
            }
            if let Some(fov) = c.fov {
                if !fov.is_finite() || fov <= 0.0 || fov >= 180.0 {
                    return Err(value_err(
                        "camera.fov",
                        "must be between 0 and 180 degrees",
                    ));
                }
            }
            if let Some(near) = c.near {
                positive("camera.near", near)?;
            }
            if let Some(far) = c.far {
                positive("camera.far", far)?;
            }
            if let (Some(near), Some(far)) = (c.near, c.far) {
                if far <= near {
                    return Err(value_err("camera.far", "must be greater than camera.near"));
                }
            }
        }

        if let Some(o) = cfg.orbits.as_ref() {
            if let Some(k) = o.angular_speed {
                positive("orbits.angular-speed", k)?;
            }
            if let Some(n) = o.outline_segments {
                if n < MIN_OUTLINE_SEGMENTS {
                    return Err(value_err(
                        "orbits.outline-segments",
                        &format!("must be at least {MIN_OUTLINE_SEGMENTS}"),
                    ));
                }
            }
            for c in [&o.planet_outline_color, &o.satellite_outline_color]
                .into_iter()
                .flatten()
            {
                parse_color(c)?;
            }
        }

        if let Some(order) = cfg.focus_order.as_ref() {
            if order.is_empty() {
                return Err(value_err("focus-order", "must name at least one body"));
            }
            let mut seen = HashSet::new();
            for name in order.iter() {
                let kind = name.parse::<BodyKind>()?;
                if !seen.insert(kind) {
                    return Err(value_err(
                        "focus-order",
                        &format!("'{kind}' is listed more than once"),
                    ));
                }
            }
        }

        let mut names = HashSet::new();
        for (index, body) in cfg.bodies.iter().enumerate() {
            match (body.name.as_ref(), body.matches.as_ref()) {
                (Some(name), None) => {
                    let kind = name.parse::<BodyKind>()?;
                    if !names.insert(kind) {
                        return Err(ConfigError::DuplicateBody(kind));
                    }
                }
                (None, Some(re)) => {
                    let re = Regex::new(re).map_err(|source| ConfigError::Regex { index, source })?;
                    if !BodyKind::ALL.iter().any(|k| re.is_match(k.name())) {
                        return Err(ConfigError::NoMatch(re.as_str().to_owned()));
                    }
                }
                _ => return Err(ConfigError::BodySelector(index)),
            }

            if let Some(c) = body.color.as_ref() {
                parse_color(c)?;
            }
            if let Some(d) = body.orbit_distance {
                positive("body.orbit-distance", d)?;
                if BodyKind::ALL
                    .iter()
                    .any(|k| k.is_central() && body.matches_body(*k))
                {
                    return Err(value_err(
                        "body.orbit-distance",
                        "the central body doesn't orbit anything",
                    ));
                }
            }
        }

        Ok(cfg)
    }

    /// Every entry selecting `kind`, in file order
    pub(crate) fn body_entries(&self, kind: BodyKind) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter().filter(move |b| b.matches_body(kind))
    }
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Playback {
    pub base_increment: Option<f64>,
    pub speed_multiplier: Option<u32>,
    pub start_paused: Option<bool>,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Camera {
    pub offset: Option<[f64; 3]>,
    pub initial_focus: Option<String>,
    /// Vertical field of view [deg]
    pub fov: Option<f64>,
    pub near: Option<f64>,
    pub far: Option<f64>,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Orbits {
    pub angular_speed: Option<f64>,
    pub outline_segments: Option<usize>,
    pub planet_outline_color: Option<String>,
    pub satellite_outline_color: Option<String>,
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Body {
    pub name: Option<String>,
    pub matches: Option<String>,
    pub color: Option<String>,
    pub orbit_distance: Option<f64>,
}

impl Body {
    pub(crate) fn matches_body(&self, kind: BodyKind) -> bool {
        if let Some(name) = self.name.as_ref() {
            name.parse::<BodyKind>().map(|k| k == kind).unwrap_or(false)
        } else if let Some(regex) = self.matches.as_ref() {
            Regex::new(regex)
                .map(|re| re.is_match(kind.name()))
                .unwrap_or(false)
        } else {
            false
        }
    }
}

/// Parse `#rrggbb` or a CSS color name
pub fn parse_color(s: &str) -> Result<Color, ConfigError> {
    let s = s.trim();
    if let Some(c) = Color::from_name(s) {
        return Ok(c);
    }
    let re = Regex::new(r"^#([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$")
        .map_err(|_| ConfigError::Color(s.to_owned()))?;
    let caps = re
        .captures(s)
        .ok_or_else(|| ConfigError::Color(s.to_owned()))?;
    let mut rgb = [0_u8; 3];
    for (i, c) in rgb.iter_mut().enumerate() {
        *c = u8::from_str_radix(&caps[i + 1], 16).map_err(|_| ConfigError::Color(s.to_owned()))?;
    }
    Ok(Color::from_rgb_u8(rgb[0], rgb[1], rgb[2]))
}

fn positive(key: &'static str, v: f64) -> Result<(), ConfigError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(value_err(key, &format!("must be finite and greater than zero, got {v}")))
    }
}

fn value_err(key: &'static str, reason: &str) -> ConfigError {
    ConfigError::Value {
        key,
        reason: reason.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn full_config() {
        const TOML: &str = indoc! {r#"
            name = 'full'
            focus-order = ['earth', 'moon']

            [playback]
            base-increment = 0.001
            speed-multiplier = 3
            start-paused = true

            [camera]
            offset = [0.0, 50.0, 200.0]
            initial-focus = 'Earth'
            fov = 60.0
            near = 1.0
            far = 1000000.0

            [orbits]
            angular-speed = 500.0
            outline-segments = 64
            planet-outline-color = 'white'
            satellite-outline-color = '#00ff00'

            [[body]]
            name = 'mars'
            color = '#b37255'

            [[body]]
            matches = '^(uranus|neptune)$'
            color = 'blue'

            [[body]]
            name = 'moon'
            orbit-distance = 40.0
        "#};
        let cfg = Config::from_str_checked(TOML).unwrap();
        assert_eq!(cfg.name.as_deref(), Some("full"));
        assert_eq!(cfg.bodies.len(), 3);

        let p = cfg.playback.as_ref().unwrap();
        assert_eq!(p.base_increment, Some(0.001));
        assert_eq!(p.speed_multiplier, Some(3));
        assert_eq!(p.start_paused, Some(true));

        let c = cfg.camera.as_ref().unwrap();
        assert_eq!(c.offset, Some([0.0, 50.0, 200.0]));
        assert_eq!(c.initial_focus.as_deref(), Some("Earth"));

        let o = cfg.orbits.as_ref().unwrap();
        assert_eq!(o.outline_segments, Some(64));

        assert!(cfg.bodies[0].matches_body(BodyKind::Mars));
        assert!(!cfg.bodies[0].matches_body(BodyKind::Earth));
        for kind in BodyKind::ALL {
            let expected = matches!(kind, BodyKind::Uranus | BodyKind::Neptune);
            assert_eq!(cfg.bodies[1].matches_body(kind), expected, "{kind}");
        }
        assert_eq!(cfg.body_entries(BodyKind::Moon).count(), 1);
        assert_eq!(cfg.body_entries(BodyKind::Sun).count(), 0);
    }

    #[test]
    fn empty_config() {
        let cfg = Config::from_str_checked("").unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn colors() {
        assert_eq!(parse_color("#ff0000").unwrap(), Color::RED);
        assert_eq!(parse_color(" Magenta ").unwrap(), Color::MAGENTA);
        assert_eq!(
            parse_color("#B37255").unwrap(),
            Color::from_rgb_u8(0xb3, 0x72, 0x55)
        );
        for bad in ["", "#fff", "ff0000", "#gg0000", "#ff00000", "chartreuse"] {
            assert!(
                matches!(parse_color(bad), Err(ConfigError::Color(_))),
                "accepted '{bad}'"
            );
        }
    }

    #[test]
    fn rejects_invalid_configs() {
        let check = |toml: &str| Config::from_str_checked(toml).err().unwrap();

        assert!(matches!(check("name = "), ConfigError::Toml(_)));
        assert!(matches!(
            check("[[body]]\nname = 'pluto'"),
            ConfigError::UnknownBody(_)
        ));
        assert!(matches!(
            check("[[body]]\ncolor = 'red'"),
            ConfigError::BodySelector(0)
        ));
        assert!(matches!(
            check("[[body]]\nname = 'mars'\nmatches = 'mars'"),
            ConfigError::BodySelector(0)
        ));
        assert!(matches!(
            check("[[body]]\nmatches = '(mars'"),
            ConfigError::Regex { index: 0, .. }
        ));
        assert!(matches!(
            check("[[body]]\nmatches = '^pluto$'"),
            ConfigError::NoMatch(_)
        ));
        assert!(matches!(
            check("[[body]]\nname = 'mars'\n[[body]]\nname = 'Mars'"),
            ConfigError::DuplicateBody(BodyKind::Mars)
        ));
        assert!(matches!(
            check("[[body]]\nname = 'mars'\ncolor = 'mauve'"),
            ConfigError::Color(_)
        ));
        assert!(matches!(
            check("[[body]]\nname = 'sun'\norbit-distance = 10.0"),
            ConfigError::Value { .. }
        ));
        assert!(matches!(
            check("[playback]\nbase-increment = 0.0"),
            ConfigError::Value {
                key: "playback.base-increment",
                ..
            }
        ));
        assert!(matches!(
            check("[playback]\nspeed-multiplier = -1"),
            ConfigError::Toml(_)
        ));
        assert!(matches!(
            check("[orbits]\nangular-speed = -5.0"),
            ConfigError::Value { .. }
        ));
        assert!(matches!(
            check("[orbits]\noutline-segments = 2"),
            ConfigError::Value { .. }
        ));
        assert!(matches!(
            check("[camera]\noffset = [0.0, 0.0, 0.0]"),
            ConfigError::Value { .. }
        ));
        assert!(matches!(
            check("[camera]\nnear = 10.0\nfar = 1.0"),
            ConfigError::Value { .. }
        ));
        assert!(matches!(check("focus-order = []"), ConfigError::Value { .. }));
        assert!(matches!(
            check("focus-order = ['sun', 'sun']"),
            ConfigError::Value { .. }
        ));
    }
}
