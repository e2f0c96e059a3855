use bodies::prelude::BodyKind;
use na::Vector3;
use std::collections::HashMap;
use tracing::debug;

pub use canvas::{
    Appearance, Canvas, Color, HeadlessCanvas, HeadlessNode, HeadlessNodeKind, NodeId, OutlineHandle,
};
pub use decoration::Tracker;
pub use planet::Planet;
pub use satellite::Satellite;

use crate::{
    orbit::{Orbit, OrbitError},
    scenario::{Decoration, Scenario},
    Updatable,
};

pub mod canvas;
pub mod decoration;
pub mod planet;
pub mod satellite;

/// Index of a body in its [`Scene`]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct BodyId(usize);

impl BodyId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CelestialBody {
    pub kind: BodyKind,
    pub radius: f64,
    pub position: Vector3<f64>,
    pub node: NodeId,
    pub parent: Option<BodyId>,
}

/// The bodies and the canvas they're drawn on
pub struct Scene {
    bodies: Vec<CelestialBody>,
    canvas: Box<dyn Canvas>,
}

impl Scene {
    pub fn new(canvas: Box<dyn Canvas>) -> Self {
        Self {
            bodies: Vec::new(),
            canvas,
        }
    }

    pub fn add_body(
        &mut self,
        kind: BodyKind,
        radius: f64,
        appearance: Appearance,
        parent: Option<BodyId>,
        position: Vector3<f64>,
    ) -> BodyId {
        let node = self.canvas.add_sphere(radius, appearance);
        self.canvas.set_position(node, &position);
        let id = BodyId(self.bodies.len());
        self.bodies.push(CelestialBody {
            kind,
            radius,
            position,
            node,
            parent,
        });
        id
    }

    pub fn body(&self, id: BodyId) -> &CelestialBody {
        &self.bodies[id.0]
    }

    pub fn position(&self, id: BodyId) -> Vector3<f64> {
        self.bodies[id.0].position
    }

    /// Moves the body and its visual
    pub fn set_position(&mut self, id: BodyId, position: Vector3<f64>) {
        let body = &mut self.bodies[id.0];
        body.position = position;
        self.canvas.set_position(body.node, &position);
    }

    pub fn find(&self, kind: BodyKind) -> Option<BodyId> {
        self.bodies.iter().position(|b| b.kind == kind).map(BodyId)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &CelestialBody)> + '_ {
        self.bodies.iter().enumerate().map(|(i, b)| (BodyId(i), b))
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn canvas_mut(&mut self) -> &mut dyn Canvas {
        self.canvas.as_mut()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComposeError {
    #[error("Body '{body}' is composed before its parent '{parent}'")]
    MissingParent { body: BodyKind, parent: BodyKind },
    #[error("Body '{0}' is composed more than once")]
    Duplicate(BodyKind),
    #[error("Focus list names '{0}' which isn't part of the scene")]
    UnknownFocus(BodyKind),
    #[error("Orbit of '{body}' is invalid")]
    Orbit {
        body: BodyKind,
        #[source]
        source: OrbitError,
    },
}

/// A composed scene, ready to be driven
pub struct ComposedScene {
    pub scene: Scene,
    /// In registration order, each parent before its satellites
    pub updatables: Vec<Box<dyn Updatable>>,
    /// Bodies in the order the camera cycles through them
    pub focus_order: Vec<BodyId>,
}

/// Create one visual per body of the scenario and the entities that move them
pub fn compose(scenario: &Scenario, canvas: Box<dyn Canvas>) -> Result<ComposedScene, ComposeError> {
    let mut scene = Scene::new(canvas);
    let mut updatables: Vec<Box<dyn Updatable>> = Vec::new();
    let mut ids: HashMap<BodyKind, BodyId> = HashMap::new();
    let orbits = &scenario.orbits;

    for spec in scenario.bodies.iter() {
        if ids.contains_key(&spec.kind) {
            return Err(ComposeError::Duplicate(spec.kind));
        }

        let id = match spec.kind.parent() {
            None => {
                debug!(body = %spec.kind, "Composing central body");
                scene.add_body(spec.kind, spec.radius, spec.appearance, None, Vector3::zeros())
            }
            Some(parent_kind) => {
                let parent = *ids.get(&parent_kind).ok_or(ComposeError::MissingParent {
                    body: spec.kind,
                    parent: parent_kind,
                })?;
                let orbit = Orbit::with_angular_speed(spec.orbit_distance, orbits.angular_speed)
                    .map_err(|source| ComposeError::Orbit {
                        body: spec.kind,
                        source,
                    })?;

                if parent_kind.is_central() {
                    debug!(body = %spec.kind, distance = orbit.distance(), "Composing planet");
                    let planet = Planet::spawn(&mut scene, spec, parent, orbit, orbits)
                        .map_err(|source| ComposeError::Orbit {
                            body: spec.kind,
                            source,
                        })?;
                    let id = planet.body();
                    updatables.push(Box::new(planet));
                    id
                } else {
                    debug!(body = %spec.kind, parent = %parent_kind, distance = orbit.distance(), "Composing satellite");
                    let satellite = Satellite::spawn(&mut scene, spec, parent, orbit, orbits)
                        .map_err(|source| ComposeError::Orbit {
                            body: spec.kind,
                            source,
                        })?;
                    let id = satellite.body();
                    updatables.push(Box::new(satellite));
                    id
                }
            }
        };
        ids.insert(spec.kind, id);

        for decoration in spec.decorations.iter() {
            let tracker = match decoration {
                Decoration::Ring {
                    inner_radius,
                    outer_radius,
                    tilt,
                    color,
                } => Tracker::ring(&mut scene, id, *inner_radius, *outer_radius, *tilt, *color),
                Decoration::PointLight => Tracker::point_light(&mut scene, id),
            };
            updatables.push(Box::new(tracker));
        }
    }

    let focus_order = scenario
        .focus_order
        .iter()
        .map(|kind| ids.get(kind).copied().ok_or(ComposeError::UnknownFocus(*kind)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ComposedScene {
        scene,
        updatables,
        focus_order,
    })
}
