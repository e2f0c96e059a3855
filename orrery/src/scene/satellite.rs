use crate::{
    orbit::{Orbit, OrbitError},
    scenario::{BodySpec, OrbitConfig},
    scene::{BodyId, Color, OutlineHandle, Scene},
    units::SimTime,
    Updatable,
};
use tracing::warn;

/// A body orbiting a moving parent.
///
/// Its outline is centered on the parent's current position, so it is
/// replaced every update: the previous handle is released before the next one
/// is created.
#[derive(Debug)]
pub struct Satellite {
    body: BodyId,
    parent: BodyId,
    orbit: Orbit,
    segments: usize,
    outline_color: Color,
    outline: Option<OutlineHandle>,
}

impl Satellite {
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
            .add_outline(outline, orbits.satellite_outline_color);

        let body = scene.add_body(
            spec.kind,
            spec.radius,
            spec.appearance,
            Some(parent),
            orbit.position_around(&center, SimTime::zero()),
        );

        Ok(Self {
            body,
            parent,
            orbit,
            segments: orbits.outline_segments,
            outline_color: orbits.satellite_outline_color,
            outline: Some(outline),
        })
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn parent(&self) -> BodyId {
        self.parent
    }

    pub fn orbit(&self) -> &Orbit {
        &self.orbit
    }
}

impl Updatable for Satellite {
    fn drives(&self) -> Option<BodyId> {
        Some(self.body)
    }

    fn reads(&self) -> Option<BodyId> {
        Some(self.parent)
    }

    fn update(&mut self, t: SimTime, scene: &mut Scene) {
        let center = scene.position(self.parent);

        if let Some(previous) = self.outline.take() {
            scene.canvas_mut().remove_outline(previous);
        }
        // Segments and radius were validated on spawn
        match self.orbit.outline_around(&center, self.segments) {
            Ok(outline) => {
                self.outline = Some(scene.canvas_mut().add_outline(outline, self.outline_color));
            }
            Err(e) => warn!(err = %e, "Failed to sample satellite outline"),
        }

        scene.set_position(self.body, self.orbit.position_around(&center, t));
    }
}
