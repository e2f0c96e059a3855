use crate::{
    scene::{BodyId, Color, NodeId, Scene},
    units::{Angle, SimTime},
    Updatable,
};

/// A visual that follows a body around: Saturn's ring, the Sun's light
#[derive(Debug)]
pub struct Tracker {
    node: NodeId,
    target: BodyId,
}

impl Tracker {
    pub fn ring(
        scene: &mut Scene,
        target: BodyId,
        inner_radius: f64,
        outer_radius: f64,
        tilt: Angle,
        color: Color,
    ) -> Self {
        let node = scene
            .canvas_mut()
            .add_ring(inner_radius, outer_radius, tilt, color);
        Self::follow(scene, node, target)
    }

    pub fn point_light(scene: &mut Scene, target: BodyId) -> Self {
        let node = scene.canvas_mut().add_point_light();
        Self::follow(scene, node, target)
    }

    fn follow(scene: &mut Scene, node: NodeId, target: BodyId) -> Self {
        let position = scene.position(target);
        scene.canvas_mut().set_position(node, &position);
        Self { node, target }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn target(&self) -> BodyId {
        self.target
    }
}

impl Updatable for Tracker {
    fn reads(&self) -> Option<BodyId> {
        Some(self.target)
    }

    fn update(&mut self, _t: SimTime, scene: &mut Scene) {
        let position = scene.position(self.target);
        scene.canvas_mut().set_position(self.node, &position);
    }
}
