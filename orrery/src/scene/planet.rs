use crate::{
    orbit::{Orbit, OrbitError},
    scenario::{BodySpec, OrbitConfig},
    scene::{BodyId, OutlineHandle, Scene},
    units::SimTime,
    Updatable,
};

/// A body on a fixed-center orbit around the central body.
///
/// The outline never moves so it's drawn once and held until the planet is
/// dropped.
#[derive(Debug)]
pub struct Planet {
    body: BodyId,
    orbit: Orbit,
    outline: OutlineHandle,
}

impl Planet {
    pub fn spawn(
        scene: &mut Scene,
        spec: &BodySpec,
        parent: BodyId,
        orbit: Orbit,
        orbits: &OrbitConfig,
    ) -> Result<Self, OrbitError> {
        let center = scene.position(parent);
        let outline = orbit.outline_around(&center, orbits.outline_segments)?;
        let outline = scene
            .canvas_mut()
            .add_outline(outline, orbits.planet_outline_color);

        let body = scene.add_body(
            spec.kind,
            spec.radius,
            spec.appearance,
            Some(parent),
            orbit.position_at(SimTime::zero()),
        );

        Ok(Self {
            body,
            orbit,
            outline,
        })
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn orbit(&self) -> &Orbit {
        &self.orbit
    }

    pub fn outline(&self) -> &OutlineHandle {
        &self.outline
    }
}

impl Updatable for Planet {
    fn drives(&self) -> Option<BodyId> {
        Some(self.body)
    }

    fn update(&mut self, t: SimTime, scene: &mut Scene) {
        scene.set_position(self.body, self.orbit.position_at(t));
    }
}
