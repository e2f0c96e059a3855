use controls::{parse_speed_multiplier, ControlCommand};
use kiss3d::{
    camera::{ArcBall, Camera},
    event::{Action, Key, WindowEvent},
    light::Light,
    scene::SceneNode,
    text::Font,
    window::Window,
};
use na::{Point2, Point3, Translation3, UnitQuaternion, Vector3};
use std::{cell::RefCell, collections::HashMap, f64::consts::TAU, fmt::Write, rc::Rc};
use tracing::{debug, warn};

use crate::{
    focus::CameraRig,
    orbit::OrbitOutline,
    scenario::CameraConfig,
    scene::{Appearance, Canvas, Color, NodeId, OutlineHandle},
    system::{System, ViewControl},
    units::Angle,
};

pub const HUD_TEXT_SCALE: f32 = 40.0;

/// Concentric circles used to fill a ring
const RING_BANDS: usize = 16;
const RING_SEGMENTS: usize = 128;

pub type SharedGuiState = Rc<RefCell<GuiState>>;

enum GuiNode {
    Mesh(SceneNode),
    Ring(LineRing),
    Light,
}

/// Flat annulus drawn with lines every frame
struct LineRing {
    inner_radius: f32,
    outer_radius: f32,
    rotation: UnitQuaternion<f32>,
    color: Point3<f32>,
    position: Point3<f32>,
}

pub struct GuiState {
    window: Window,
    cam: ArcBall,
    font: Rc<Font>,
    text_origin: Point2<f32>,
    text_color: Point3<f32>,
    text_buf: String,

    hud_visibility: bool,
    outline_visibility: bool,
    speed_input: String,
    commands: Vec<ControlCommand>,

    next_id: u64,
    nodes: HashMap<NodeId, GuiNode>,
    outlines: HashMap<u64, (Vec<Point3<f32>>, Point3<f32>)>,
}

impl GuiState {
    pub fn new_shared(win_title: &str, camera: &CameraConfig) -> SharedGuiState {
        Rc::new(RefCell::new(Self::new(win_title, camera)))
    }

    pub fn new(win_title: &str, camera: &CameraConfig) -> Self {
        let eye = p3_f32(&camera.offset);
        let at = Point3::origin();
        let mut cam = ArcBall::new_with_frustrum(
            camera.fov.as_radians() as f32,
            camera.near as f32,
            camera.far as f32,
            eye,
            at,
        );
        cam.set_max_dist((camera.far / 2.0) as f32);

        let mut window = Window::new(win_title);
        window.set_light(Light::StickToCamera);
        window.set_background_color(0.0, 0.0, 0.0);

        println!("----------------------------------------------");
        println!("|                 GUI key map                |");
        println!("----------------------------------------------");
        println!("RIGHT     : focus the next body");
        println!("LEFT      : focus the previous body");
        println!("SPACE     : stop / resume");
        println!("'s'       : stop");
        println!("'r'       : resume");
        println!("0-9 ENTER : set the speed multiplier");
        println!("BACKSPACE : edit the speed multiplier");
        println!("'i'       : toggle info visibility");
        println!("'o'       : toggle orbit outline visibility");
        println!("ESC       : exit");
        println!("----------------------------------------------");

        Self {
            window,
            cam,
            font: Font::default(),
            text_origin: Point2::origin(),
            text_color: Point3::new(1.0, 1.0, 1.0),
            text_buf: String::with_capacity(256),
            hud_visibility: true,
            outline_visibility: true,
            speed_input: String::new(),
            commands: Vec::new(),
            next_id: 0,
            nodes: HashMap::new(),
            outlines: HashMap::new(),
        }
    }

    /// Commands from keyboard input since the last call
    pub fn take_commands(&mut self) -> Vec<ControlCommand> {
        std::mem::take(&mut self.commands)
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn draw_outlines(&mut self) {
        for (points, color) in self.outlines.values() {
            for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
                self.window.draw_line(a, b, color);
            }
        }
    }

    fn draw_rings(&mut self) {
        for node in self.nodes.values() {
            let GuiNode::Ring(ring) = node else {
                continue;
            };
            for band in 0..RING_BANDS {
                let f = band as f32 / (RING_BANDS - 1) as f32;
                let r = ring.inner_radius + (ring.outer_radius - ring.inner_radius) * f;
                let point = |i: usize| {
                    let a = (TAU * i as f64 / RING_SEGMENTS as f64) as f32;
                    let local = Vector3::new(r * a.cos(), r * a.sin(), 0.0);
                    ring.position + ring.rotation * local
                };
                for i in 0..RING_SEGMENTS {
                    self.window.draw_line(&point(i), &point(i + 1), &ring.color);
                }
            }
        }
    }

    fn draw_text_line(&mut self) {
        self.window.draw_text(
            &self.text_buf,
            &self.text_origin,
            HUD_TEXT_SCALE,
            &self.font,
            &self.text_color,
        );
        self.text_origin.y += HUD_TEXT_SCALE;
    }

    fn draw_hud(&mut self, system: &System) {
        self.text_origin.y = 0.0;

        self.text_buf.clear();
        let _ = write!(&mut self.text_buf, "Focus: {}", system.focused_kind());
        self.draw_text_line();

        self.text_buf.clear();
        let _ = write!(&mut self.text_buf, "Time: {}", system.time_step());
        self.draw_text_line();

        self.text_buf.clear();
        let playback = system.playback();
        if playback.is_paused() {
            let _ = write!(&mut self.text_buf, "Speed: stopped");
        } else {
            let _ = write!(&mut self.text_buf, "Speed: {}x", playback.multiplier());
        }
        self.draw_text_line();

        if !self.speed_input.is_empty() {
            self.text_buf.clear();
            let _ = write!(&mut self.text_buf, "New speed: {}_", self.speed_input);
            self.draw_text_line();
        }

        self.text_buf.clear();
        let _ = write!(&mut self.text_buf, "Frame: {}", system.sim_info().frame);
        self.draw_text_line();
    }

    fn commit_speed_input(&mut self) {
        let input = std::mem::take(&mut self.speed_input);
        match parse_speed_multiplier(&input) {
            Ok(m) => self.commands.push(ControlCommand::Speed(m)),
            Err(e) => warn!(err = %e, "Discarding speed input"),
        }
    }

    /// Returns false if the window should be closed
    pub fn render(&mut self, system: &System) -> bool {
        if self.outline_visibility {
            self.draw_outlines();
        }
        self.draw_rings();
        if self.hud_visibility {
            self.draw_hud(system);
        }

        let open = self.window.render_with_camera(&mut self.cam);

        for event in self.window.events().iter() {
            match event.value {
                WindowEvent::Key(key, Action::Press, _) => match key {
                    Key::Right => self.commands.push(ControlCommand::FocusNext),
                    Key::Left => self.commands.push(ControlCommand::FocusPrevious),
                    Key::Space => self.commands.push(ControlCommand::TogglePlayback),
                    Key::S => self.commands.push(ControlCommand::Stop),
                    Key::R => self.commands.push(ControlCommand::Resume),
                    Key::Return | Key::NumpadEnter => self.commit_speed_input(),
                    Key::Back => {
                        self.speed_input.pop();
                    }
                    Key::I => self.hud_visibility = !self.hud_visibility,
                    Key::O => self.outline_visibility = !self.outline_visibility,
                    _ => (),
                },
                WindowEvent::Char(c) if c.is_ascii_digit() => self.speed_input.push(c),
                WindowEvent::FramebufferSize(width, height) => {
                    self.commands.push(ControlCommand::Resize { width, height })
                }
                _ => (),
            }
        }

        open
    }
}

/// A [`Canvas`] backed by the kiss3d window
#[derive(Clone)]
pub struct KissCanvas(SharedGuiState);

impl KissCanvas {
    pub fn new(gui: SharedGuiState) -> Self {
        KissCanvas(gui)
    }
}

impl Canvas for KissCanvas {
    fn add_sphere(&mut self, radius: f64, appearance: Appearance) -> NodeId {
        let mut gui = self.0.borrow_mut();
        let mut n = gui.window.add_sphere(radius as f32);
        let Color { r, g, b } = appearance.color;
        n.set_color(r, g, b);
        let id = NodeId::new(gui.next_id());
        gui.nodes.insert(id, GuiNode::Mesh(n));
        id
    }

    fn add_ring(
        &mut self,
        inner_radius: f64,
        outer_radius: f64,
        tilt: Angle,
        color: Color,
    ) -> NodeId {
        let mut gui = self.0.borrow_mut();
        let ring = LineRing {
            inner_radius: inner_radius as f32,
            outer_radius: outer_radius as f32,
            rotation: UnitQuaternion::from_axis_angle(&Vector3::x_axis(), tilt.as_radians() as f32),
            color: color_f32(color),
            position: Point3::origin(),
        };
        let id = NodeId::new(gui.next_id());
        gui.nodes.insert(id, GuiNode::Ring(ring));
        id
    }

    fn add_point_light(&mut self) -> NodeId {
        let mut gui = self.0.borrow_mut();
        gui.window.set_light(Light::Absolute(Point3::origin()));
        let id = NodeId::new(gui.next_id());
        gui.nodes.insert(id, GuiNode::Light);
        id
    }

    fn set_position(&mut self, node: NodeId, position: &Vector3<f64>) {
        let mut guard = self.0.borrow_mut();
        let gui = &mut *guard;
        let p = p3_f32(position);
        match gui.nodes.get_mut(&node) {
            Some(GuiNode::Mesh(n)) => n.set_local_translation(Translation3::from(p.coords)),
            Some(GuiNode::Ring(r)) => r.position = p,
            Some(GuiNode::Light) => gui.window.set_light(Light::Absolute(p)),
            None => debug!(node = node.as_u64(), "Moving unknown node"),
        }
    }

    fn add_outline(&mut self, outline: OrbitOutline, color: Color) -> OutlineHandle {
        let mut gui = self.0.borrow_mut();
        let points = outline
            .points()
            .iter()
            .map(|p| p3_f32(&p.coords))
            .collect();
        let id = gui.next_id();
        gui.outlines.insert(id, (points, color_f32(color)));
        OutlineHandle::new(id)
    }

    fn remove_outline(&mut self, handle: OutlineHandle) {
        self.0.borrow_mut().outlines.remove(&handle.id());
    }
}

/// Mouse driven ArcBall view, synced with the system's camera every frame
pub struct GuiViewControl(SharedGuiState);

impl GuiViewControl {
    pub fn new(gui: SharedGuiState) -> Self {
        GuiViewControl(gui)
    }
}

impl ViewControl for GuiViewControl {
    fn update(&mut self, camera: &mut CameraRig) {
        let mut gui = self.0.borrow_mut();

        // Whatever the user did to the view since the last frame
        let offset = gui.cam.eye() - gui.cam.at();
        camera.position = camera.target + v3_f64(&offset);

        let (eye, at) = (p3_f32(&camera.position), p3_f32(&camera.target));
        gui.cam.look_at(eye, at);

        let size = gui.window.size();
        if size.x > 0 && size.y > 0 {
            camera.aspect = f64::from(size.x) / f64::from(size.y);
        }
    }
}

fn color_f32(c: Color) -> Point3<f32> {
    Point3::new(c.r, c.g, c.b)
}

fn p3_f32(inp: &Vector3<f64>) -> Point3<f32> {
    Point3::new(inp.x as _, inp.y as _, inp.z as _)
}

fn v3_f64(inp: &Vector3<f32>) -> Vector3<f64> {
    Vector3::new(inp.x.into(), inp.y.into(), inp.z.into())
}
