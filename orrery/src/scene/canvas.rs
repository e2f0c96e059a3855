use na::Vector3;
use std::{cell::RefCell, collections::HashMap, rc::Rc};

use crate::{orbit::OrbitOutline, units::Angle};

/// Identifies a visual node created by a [`Canvas`]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct NodeId(u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        NodeId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Owned handle to an orbit outline living on a [`Canvas`].
///
/// There is exactly one owner per outline: the handle can't be cloned and
/// releasing it with [`Canvas::remove_outline`] consumes it.
#[derive(Eq, PartialEq, Hash, Debug)]
pub struct OutlineHandle(u64);

impl OutlineHandle {
    /// Only canvas implementations should mint handles
    pub fn new(id: u64) -> Self {
        OutlineHandle(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 128.0 / 255.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const YELLOW: Color = Color::rgb(1.0, 1.0, 0.0);
    pub const MAGENTA: Color = Color::rgb(1.0, 0.0, 1.0);
    pub const AQUA: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const GREY: Color = Color::rgb(128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0);
    pub const TAN: Color = Color::rgb(210.0 / 255.0, 180.0 / 255.0, 140.0 / 255.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Color { r, g, b }
    }

    pub fn from_rgb_u8(r: u8, g: u8, b: u8) -> Self {
        Color::rgb(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
        )
    }

    /// CSS-style color names
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.trim().to_ascii_lowercase().as_str() {
            "white" => Self::WHITE,
            "red" => Self::RED,
            "green" => Self::GREEN,
            "blue" => Self::BLUE,
            "yellow" => Self::YELLOW,
            "magenta" | "fuchsia" => Self::MAGENTA,
            "aqua" | "cyan" => Self::AQUA,
            "grey" | "gray" => Self::GREY,
            "tan" => Self::TAN,
            _ => return None,
        })
    }
}

/// Opaque visual attributes of a body
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Appearance {
    pub color: Color,
    /// Whether the body is shaded by the scene lights, light sources are not
    pub lit: bool,
}

impl Appearance {
    pub fn lit(color: Color) -> Self {
        Appearance { color, lit: true }
    }

    pub fn emissive(color: Color) -> Self {
        Appearance { color, lit: false }
    }
}

/// The rendering collaborator the scene composer creates visuals on.
///
/// Texture and material choices are left to the implementation, the scene
/// only supplies geometry, colors and positions.
pub trait Canvas {
    fn add_sphere(&mut self, radius: f64, appearance: Appearance) -> NodeId;

    /// Flat ring in the orbital plane, tilted about the X axis
    fn add_ring(&mut self, inner_radius: f64, outer_radius: f64, tilt: Angle, color: Color)
        -> NodeId;

    fn add_point_light(&mut self) -> NodeId;

    fn set_position(&mut self, node: NodeId, position: &Vector3<f64>);

    fn add_outline(&mut self, outline: OrbitOutline, color: Color) -> OutlineHandle;

    fn remove_outline(&mut self, handle: OutlineHandle);
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum HeadlessNodeKind {
    Sphere,
    Ring,
    PointLight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessNode {
    pub kind: HeadlessNodeKind,
    pub color: Option<Color>,
    pub lit: bool,
    pub position: Vector3<f64>,
}

#[derive(Debug, Default)]
struct HeadlessState {
    next_id: u64,
    nodes: HashMap<NodeId, HeadlessNode>,
    outlines: HashMap<u64, (OrbitOutline, Color)>,
    outlines_created: u64,
}

impl HeadlessState {
    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn add_node(&mut self, kind: HeadlessNodeKind, color: Option<Color>, lit: bool) -> NodeId {
        let id = NodeId::new(self.next_id());
        self.nodes.insert(
            id,
            HeadlessNode {
                kind,
                color,
                lit,
                position: Vector3::zeros(),
            },
        );
        id
    }
}

/// An in-memory canvas with nothing on screen.
///
/// Clones share the same state, keep one around to inspect what the scene did.
#[derive(Debug, Clone, Default)]
pub struct HeadlessCanvas(Rc<RefCell<HeadlessState>>);

impl HeadlessCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, id: NodeId) -> Option<HeadlessNode> {
        self.0.borrow().nodes.get(&id).cloned()
    }

    pub fn node_count(&self) -> usize {
        self.0.borrow().nodes.len()
    }

    pub fn live_outlines(&self) -> usize {
        self.0.borrow().outlines.len()
    }

    pub fn outlines_created(&self) -> u64 {
        self.0.borrow().outlines_created
    }

    /// Live outlines drawn in `color`, as (center, point count)
    pub fn outlines_with_color(&self, color: Color) -> Vec<(Vector3<f64>, usize)> {
        self.0
            .borrow()
            .outlines
            .values()
            .filter(|(_, c)| *c == color)
            .map(|(o, _)| (*o.center(), o.len()))
            .collect()
    }
}

impl Canvas for HeadlessCanvas {
    fn add_sphere(&mut self, _radius: f64, appearance: Appearance) -> NodeId {
        self.0.borrow_mut().add_node(
            HeadlessNodeKind::Sphere,
            Some(appearance.color),
            appearance.lit,
        )
    }

    fn add_ring(
        &mut self,
        _inner_radius: f64,
        _outer_radius: f64,
        _tilt: Angle,
        color: Color,
    ) -> NodeId {
        self.0
            .borrow_mut()
            .add_node(HeadlessNodeKind::Ring, Some(color), true)
    }

    fn add_point_light(&mut self) -> NodeId {
        self.0
            .borrow_mut()
            .add_node(HeadlessNodeKind::PointLight, None, false)
    }

    fn set_position(&mut self, node: NodeId, position: &Vector3<f64>) {
        if let Some(n) = self.0.borrow_mut().nodes.get_mut(&node) {
            n.position = *position;
        }
    }

    fn add_outline(&mut self, outline: OrbitOutline, color: Color) -> OutlineHandle {
        let mut state = self.0.borrow_mut();
        let id = state.next_id();
        state.outlines.insert(id, (outline, color));
        state.outlines_created += 1;
        OutlineHandle::new(id)
    }

    fn remove_outline(&mut self, handle: OutlineHandle) {
        self.0.borrow_mut().outlines.remove(&handle.id());
    }
}
