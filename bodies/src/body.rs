use derive_more::Display;
use std::str::FromStr;

/// Scales real radii [km] into scene units.
///
/// See <https://www.jpl.nasa.gov/_edu/pdfs/scaless_reference.pdf>
pub const SIZE_SCALAR: f64 = 0.0005;

/// Scales real orbital distances [km] into scene units.
pub const DISTANCE_SCALAR: f64 = 0.00001;

/// Extra magnification applied to planet and moon diameters so they stay
/// visible next to the Sun.
pub const PLANET_SCALAR: f64 = 4.0;

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
pub enum BodyKind {
    Sun,
    Mercury,
    Venus,
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

impl BodyKind {
    /// Construction order, every parent precedes its satellites
    pub const ALL: [BodyKind; 10] = [
        BodyKind::Sun,
        BodyKind::Mercury,
        BodyKind::Venus,
        BodyKind::Earth,
        BodyKind::Mars,
        BodyKind::Jupiter,
        BodyKind::Saturn,
        BodyKind::Uranus,
        BodyKind::Neptune,
        BodyKind::Moon,
    ];

    /// Order the camera cycles through, satellites follow their parent
    pub const FOCUS_ORDER: [BodyKind; 10] = [
        BodyKind::Sun,
        BodyKind::Mercury,
        BodyKind::Venus,
        BodyKind::Earth,
        BodyKind::Moon,
        BodyKind::Mars,
        BodyKind::Jupiter,
        BodyKind::Saturn,
        BodyKind::Uranus,
        BodyKind::Neptune,
    ];

    pub const fn name(self) -> &'static str {
        use BodyKind::*;
        match self {
            Sun => "sun",
            Mercury => "mercury",
            Venus => "venus",
            Earth => "earth",
            Moon => "moon",
            Mars => "mars",
            Jupiter => "jupiter",
            Saturn => "saturn",
            Uranus => "uranus",
            Neptune => "neptune",
        }
    }

    /// The body this one orbits, `None` for the central body
    pub const fn parent(self) -> Option<BodyKind> {
        use BodyKind::*;
        match self {
            Sun => None,
            Moon => Some(Earth),
            _ => Some(Sun),
        }
    }

    pub const fn is_central(self) -> bool {
        self.parent().is_none()
    }

    /// True for bodies orbiting something other than the central body
    pub const fn is_satellite(self) -> bool {
        matches!(self.parent(), Some(p) if !p.is_central())
    }

    /// Mean diameter [km]
    pub const fn diameter(self) -> f64 {
        use BodyKind::*;
        match self {
            Sun => 1_391_400.0,
            Mercury => 4_879.0,
            Venus => 12_104.0,
            Earth => 12_756.0,
            Moon => 3_475.0,
            Mars => 6_792.0,
            Jupiter => 142_984.0,
            Saturn => 120_536.0,
            Uranus => 51_118.0,
            Neptune => 49_528.0,
        }
    }

    /// Mean distance from the parent body [km]
    pub const fn distance(self) -> f64 {
        use BodyKind::*;
        match self {
            Sun => 0.0,
            Mercury => 57_900_000.0,
            Venus => 108_200_000.0,
            Earth => 149_600_000.0,
            Moon => 383_500.0,
            Mars => 227_900_000.0,
            Jupiter => 778_600_000.0,
            Saturn => 1_433_500_000.0,
            Uranus => 2_872_500_000.0,
            Neptune => 4_495_100_000.0,
        }
    }

    /// Diameter [km] as drawn, before the size scalar is applied
    pub fn display_diameter(self) -> f64 {
        if self.is_central() {
            self.diameter()
        } else {
            self.diameter() * PLANET_SCALAR
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown body '{0}'")]
pub struct ParseBodyKindError(pub String);

impl FromStr for BodyKind {
    type Err = ParseBodyKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        BodyKind::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| ParseBodyKindError(name.to_owned()))
    }
}

/// Scaled physical configuration of a body, in scene units
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Display)]
#[display(fmt = "{{radius: {}, distance: {}}}", "radius", "distance")]
pub struct BodyConfig {
    pub radius: f64,
    /// Zero only for the central body
    pub distance: f64,
}

/// Derive a body's scene configuration from its diameter and distance [km]
pub fn make_config(diameter: f64, distance: f64) -> BodyConfig {
    let cfg = BodyConfig {
        radius: diameter / 2.0 * SIZE_SCALAR,
        distance: distance * DISTANCE_SCALAR,
    };
    debug_assert!(cfg.radius > 0.0);
    debug_assert!(cfg.distance >= 0.0);
    cfg
}
