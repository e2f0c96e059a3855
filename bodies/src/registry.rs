use crate::body::{make_config, BodyConfig, BodyKind};

/// Scaled configuration for every body, derived once at startup.
#[derive(Clone, PartialEq, Debug)]
pub struct BodyRegistry {
    configs: Vec<(BodyKind, BodyConfig)>,
}

impl Default for BodyRegistry {
    fn default() -> Self {
        Self::solar_system()
    }
}

impl BodyRegistry {
    pub fn solar_system() -> Self {
        let configs = BodyKind::ALL
            .iter()
            .map(|kind| (*kind, make_config(kind.display_diameter(), kind.distance())))
            .collect();
        Self { configs }
    }

    pub fn config(&self, kind: BodyKind) -> BodyConfig {
        self.configs
            .iter()
            .find_map(|(k, cfg)| if *k == kind { Some(*cfg) } else { None })
            // Every kind is populated in solar_system()
            .unwrap_or_else(|| make_config(kind.display_diameter(), kind.distance()))
    }

    /// Configs in construction order
    pub fn iter(&self) -> impl Iterator<Item = (BodyKind, BodyConfig)> + '_ {
        self.configs.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{DISTANCE_SCALAR, SIZE_SCALAR};

    #[test]
    fn one_config_per_body() {
        let reg = BodyRegistry::solar_system();
        assert_eq!(reg.len(), 10);
        let kinds: Vec<BodyKind> = reg.iter().map(|(k, _)| k).collect();
        assert_eq!(kinds, BodyKind::ALL.to_vec());
    }

    #[test]
    fn only_the_central_body_has_zero_distance() {
        let reg = BodyRegistry::solar_system();
        for (kind, cfg) in reg.iter() {
            assert!(cfg.radius > 0.0, "{kind} has a non-positive radius");
            if kind.is_central() {
                assert_eq!(cfg.distance, 0.0);
            } else {
                assert!(cfg.distance > 0.0, "{kind} has a zero distance");
            }
        }
    }

    #[test]
    fn known_values() {
        let reg = BodyRegistry::solar_system();

        let sun = reg.config(BodyKind::Sun);
        assert_eq!(sun.radius, 695_700.0 * SIZE_SCALAR);

        let earth = reg.config(BodyKind::Earth);
        assert_eq!(earth.radius, 12_756.0 * 2.0 * SIZE_SCALAR);
        assert_eq!(earth.distance, 149_600_000.0 * DISTANCE_SCALAR);

        let moon = reg.config(BodyKind::Moon);
        assert_eq!(moon.distance, 383_500.0 * DISTANCE_SCALAR);
    }

    #[test]
    fn deterministic() {
        assert_eq!(BodyRegistry::solar_system(), BodyRegistry::solar_system());
    }
}
