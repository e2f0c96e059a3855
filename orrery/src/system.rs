use bodies::prelude::BodyKind;
use controls::ControlCommand;
use derive_more::Display;
use std::collections::HashSet;
use tracing::{debug, info, warn};

use crate::{
    focus::{CameraRig, FocusState},
    playback::{Playback, PlaybackError, PlaybackState, SimulationClock},
    scenario::Scenario,
    scene::{compose, BodyId, Canvas, ComposeError, ComposedScene, Scene},
    sim_info::SimulationInfo,
    units::SimTime,
    Updatable,
};

/// External view control, e.g. a mouse driven orbit camera.
///
/// Runs after the camera was placed on the focused body; whatever it does to
/// the camera is captured as the new focus offset.
pub trait ViewControl {
    fn update(&mut self, camera: &mut CameraRig);
}

/// A view nobody moves
#[derive(Debug, Copy, Clone, Default)]
pub struct FixedView;

impl ViewControl for FixedView {
    fn update(&mut self, _camera: &mut CameraRig) {}
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SystemError {
    #[error("Updatable driving '{body}' was registered after an updatable reading it")]
    OutOfOrder { body: BodyKind },
    #[error("Body '{0}' isn't in the focus list")]
    UnknownBody(BodyKind),
    #[error("The focus list is empty")]
    NoFocusTargets,
    #[error(transparent)]
    Compose(#[from] ComposeError),
    #[error(transparent)]
    Playback(#[from] PlaybackError),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Display)]
pub enum SystemState {
    Idle,
    Running,
    Paused,
}

/// The whole simulation: the scene, what moves it, the clock and the camera.
pub struct System {
    scene: Scene,
    updatables: Vec<Box<dyn Updatable>>,
    read: HashSet<BodyId>,

    playback: Playback,
    clock: SimulationClock,
    focus: FocusState,
    camera: CameraRig,
    sim_info: SimulationInfo,
}

impl System {
    pub fn new(scenario: &Scenario, canvas: Box<dyn Canvas>) -> Result<Self, SystemError> {
        let composed = compose(scenario, canvas)?;
        Self::with_scene(scenario, composed)
    }

    pub fn with_scene(scenario: &Scenario, composed: ComposedScene) -> Result<Self, SystemError> {
        let ComposedScene {
            scene,
            updatables,
            focus_order,
        } = composed;

        let focus = FocusState::new(focus_order, scenario.camera.offset)
            .ok_or(SystemError::NoFocusTargets)?;

        let mut system = Self {
            scene,
            updatables: Vec::with_capacity(updatables.len()),
            read: HashSet::new(),
            playback: Playback::new(
                scenario.playback.base_increment,
                scenario.playback.speed_multiplier,
            ),
            clock: SimulationClock::new(),
            focus,
            camera: CameraRig::new(scenario.camera.offset),
            sim_info: SimulationInfo::new(),
        };

        for u in updatables.into_iter() {
            system.register(u)?;
        }

        system.focus_on(scenario.camera.initial_focus)?;
        system.retarget();

        if scenario.playback.start_paused {
            system.pause();
        }

        info!(
            scenario = %scenario.name,
            bodies = system.scene.len(),
            updatables = system.updatables.len(),
            focus = %system.focused_kind(),
            playback = %system.playback.state(),
            "System ready"
        );

        Ok(system)
    }

    /// Append an updatable to the frame.
    ///
    /// A driver for a body some earlier updatable already reads would run
    /// after its reader, leaving it a frame behind, so it's rejected.
    pub fn register(&mut self, updatable: Box<dyn Updatable>) -> Result<(), SystemError> {
        if let Some(body) = updatable.drives() {
            if self.read.contains(&body) {
                return Err(SystemError::OutOfOrder {
                    body: self.scene.body(body).kind,
                });
            }
        }
        if let Some(body) = updatable.reads() {
            self.read.insert(body);
        }
        self.updatables.push(updatable);
        Ok(())
    }

    /// Advance the simulation by one frame. Rendering is up to the caller.
    pub fn frame(&mut self, view: &mut dyn ViewControl) -> SimTime {
        let t = self.clock.advance(self.playback.increment());

        for u in self.updatables.iter_mut() {
            u.update(t, &mut self.scene);
        }

        self.retarget();
        view.update(&mut self.camera);
        self.focus.recapture(&self.camera);

        self.sim_info.frame_step(t);
        t
    }

    pub fn focus_next(&mut self) -> bool {
        let changed = self.focus.next(&self.camera);
        if changed {
            self.retarget();
        }
        changed
    }

    pub fn focus_previous(&mut self) -> bool {
        let changed = self.focus.previous(&self.camera);
        if changed {
            self.retarget();
        }
        changed
    }

    pub fn focus_on(&mut self, kind: BodyKind) -> Result<bool, SystemError> {
        let index = self
            .scene
            .find(kind)
            .and_then(|id| self.focus.position_of(id))
            .ok_or(SystemError::UnknownBody(kind))?;
        let changed = self.focus.select(index, &self.camera);
        if changed {
            self.retarget();
        }
        Ok(changed)
    }

    pub fn pause(&mut self) {
        self.playback.pause();
    }

    pub fn resume(&mut self) {
        self.playback.resume();
    }

    pub fn toggle_playback(&mut self) -> PlaybackState {
        self.playback.toggle()
    }

    pub fn set_speed_multiplier(&mut self, multiplier: u32) -> Result<SimTime, SystemError> {
        Ok(self.playback.set_speed_multiplier(multiplier)?)
    }

    /// Returns false when the new size was ignored
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            warn!(width, height, "Ignoring resize to an empty viewport");
            return false;
        }
        self.camera.aspect = f64::from(width) / f64::from(height);
        debug!(width, height, aspect = self.camera.aspect, "Viewport resized");
        true
    }

    pub fn apply(&mut self, command: ControlCommand) -> Result<(), SystemError> {
        debug!(command = command.name(), "Applying control command");
        match command {
            ControlCommand::FocusNext => {
                self.focus_next();
            }
            ControlCommand::FocusPrevious => {
                self.focus_previous();
            }
            ControlCommand::Focus(kind) => {
                self.focus_on(kind)?;
            }
            ControlCommand::TogglePlayback => {
                self.toggle_playback();
            }
            ControlCommand::Stop => self.pause(),
            ControlCommand::Resume => self.resume(),
            ControlCommand::Speed(m) => {
                self.set_speed_multiplier(m)?;
            }
            ControlCommand::Resize { width, height } => {
                self.resize(width, height);
            }
        }
        Ok(())
    }

    pub fn state(&self) -> SystemState {
        if self.sim_info.frame == 0 {
            SystemState::Idle
        } else if self.playback.is_paused() {
            SystemState::Paused
        } else {
            SystemState::Running
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn focus(&self) -> &FocusState {
        &self.focus
    }

    pub fn focused_kind(&self) -> BodyKind {
        self.scene.body(self.focus.focused()).kind
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn time_step(&self) -> SimTime {
        self.clock.time_step()
    }

    pub fn sim_info(&self) -> &SimulationInfo {
        &self.sim_info
    }

    pub fn position(&self, kind: BodyKind) -> Option<na::Vector3<f64>> {
        self.scene.find(kind).map(|id| self.scene.position(id))
    }

    fn retarget(&mut self) {
        let target = self.scene.position(self.focus.focused());
        self.camera.track(target, self.focus.offset());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::nominal::MOON_ORBIT_DISTANCE;
    use crate::scene::{Color, HeadlessCanvas};
    use approx::assert_relative_eq;
    use na::Vector3;

    struct Driver(BodyId);

    impl Updatable for Driver {
        fn drives(&self) -> Option<BodyId> {
            Some(self.0)
        }

        fn update(&mut self, _t: SimTime, _scene: &mut Scene) {}
    }

    /// Moves the eye to a fixed offset from the target, like a user zooming
    struct Zoom(Vector3<f64>);

    impl ViewControl for Zoom {
        fn update(&mut self, camera: &mut CameraRig) {
            camera.position = camera.target + self.0;
        }
    }

    fn nominal_system() -> (System, HeadlessCanvas) {
        let canvas = HeadlessCanvas::new();
        let system = System::new(&Scenario::nominal(), Box::new(canvas.clone())).unwrap();
        (system, canvas)
    }

    #[test]
    fn satellite_keeps_its_distance() {
        let (mut system, canvas) = nominal_system();
        system.set_speed_multiplier(50).unwrap();

        for _ in 0..500 {
            system.frame(&mut FixedView);
            let earth = system.position(BodyKind::Earth).unwrap();
            let moon = system.position(BodyKind::Moon).unwrap();
            assert_relative_eq!(
                (moon - earth).norm(),
                MOON_ORBIT_DISTANCE,
                max_relative = 1e-9
            );

            // The moon's outline follows the earth
            let outlines = canvas.outlines_with_color(Color::MAGENTA);
            assert_eq!(outlines.len(), 1);
            assert_eq!(outlines[0].0, earth);
        }
    }

    #[test]
    fn satellite_outline_is_replaced() {
        let (mut system, canvas) = nominal_system();
        let created = canvas.outlines_created();
        let live = canvas.live_outlines();

        for n in 1..=20 {
            system.frame(&mut FixedView);
            assert_eq!(canvas.outlines_created(), created + n);
            assert_eq!(canvas.live_outlines(), live);
            assert_eq!(canvas.outlines_with_color(Color::MAGENTA).len(), 1);
            assert_eq!(canvas.outlines_with_color(Color::RED).len(), 8);
        }
    }

    #[test]
    fn planets_follow_the_orbit_model() {
        let (mut system, _) = nominal_system();
        for _ in 0..10 {
            system.frame(&mut FixedView);
        }
        let t = system.time_step();
        assert_relative_eq!(t.as_f64(), 0.001, max_relative = 1e-12);

        let mars = system.position(BodyKind::Mars).unwrap();
        let expected = crate::orbit::position_at(2279.0, t).unwrap();
        assert_relative_eq!(mars, expected, max_relative = 1e-9);
        assert_eq!(system.position(BodyKind::Sun), Some(Vector3::zeros()));
    }

    #[test]
    fn registration_order_is_enforced() {
        let scenario = Scenario::nominal();
        let mut composed = compose(&scenario, Box::new(HeadlessCanvas::new())).unwrap();
        composed.updatables.reverse();
        let err = System::with_scene(&scenario, composed).err().unwrap();
        assert_eq!(
            err,
            SystemError::OutOfOrder {
                body: BodyKind::Saturn
            }
        );

        let (mut system, _) = nominal_system();
        let earth = system.scene().find(BodyKind::Earth).unwrap();
        let mars = system.scene().find(BodyKind::Mars).unwrap();
        assert_eq!(
            system.register(Box::new(Driver(earth))),
            Err(SystemError::OutOfOrder {
                body: BodyKind::Earth
            })
        );
        assert_eq!(system.register(Box::new(Driver(mars))), Ok(()));
    }

    #[test]
    fn focus_cycles_without_wrapping() {
        let (mut system, _) = nominal_system();
        assert_eq!(system.focused_kind(), BodyKind::Sun);
        assert!(!system.focus_previous());
        assert_eq!(system.focused_kind(), BodyKind::Sun);

        let mut visited = vec![system.focused_kind()];
        while system.focus_next() {
            system.frame(&mut FixedView);
            visited.push(system.focused_kind());
        }
        assert_eq!(visited, BodyKind::FOCUS_ORDER.to_vec());
        assert_eq!(system.focus().index(), system.focus().len() - 1);

        system.apply(ControlCommand::FocusNext).unwrap();
        assert_eq!(system.focused_kind(), BodyKind::Neptune);
    }

    #[test]
    fn zoom_is_kept_across_focus_changes() {
        let (mut system, _) = nominal_system();
        let zoom = Vector3::new(0.0, 30.0, 40.0);

        system.frame(&mut Zoom(zoom));
        assert_relative_eq!(system.camera().offset(), zoom, epsilon = 1e-9);

        assert!(system.focus_next());
        let mercury = system.position(BodyKind::Mercury).unwrap();
        assert_eq!(system.camera().target, mercury);
        assert_relative_eq!(system.camera().offset().norm(), 50.0, epsilon = 1e-9);

        system.frame(&mut FixedView);
        let mercury = system.position(BodyKind::Mercury).unwrap();
        assert_eq!(system.camera().target, mercury);
        assert_relative_eq!(system.camera().position, mercury + zoom, epsilon = 1e-9);
    }

    #[test]
    fn playback_transitions() {
        let (mut system, _) = nominal_system();
        assert_eq!(system.state(), SystemState::Idle);

        system.frame(&mut FixedView);
        assert_eq!(system.state(), SystemState::Running);

        system.apply(ControlCommand::Stop).unwrap();
        system.apply(ControlCommand::Stop).unwrap();
        assert_eq!(system.state(), SystemState::Paused);
        assert_eq!(
            system.apply(ControlCommand::Speed(4)),
            Err(SystemError::Playback(PlaybackError::Paused))
        );

        let t = system.time_step();
        let moon = system.position(BodyKind::Moon).unwrap();
        system.frame(&mut FixedView);
        assert_eq!(system.time_step(), t);
        assert_eq!(system.position(BodyKind::Moon).unwrap(), moon);

        system.apply(ControlCommand::Resume).unwrap();
        assert_eq!(system.playback().increment(), system.playback().base_increment());

        system.apply(ControlCommand::Speed(0)).unwrap();
        system.frame(&mut FixedView);
        assert_eq!(system.time_step(), t);
        assert_eq!(system.state(), SystemState::Running);

        system.apply(ControlCommand::TogglePlayback).unwrap();
        assert_eq!(system.state(), SystemState::Paused);
    }

    #[test]
    fn scenario_focus_and_playback() {
        let mut scenario = Scenario::nominal();
        scenario.focus_order = vec![BodyKind::Earth, BodyKind::Moon];
        scenario.camera.initial_focus = BodyKind::Moon;
        scenario.playback.start_paused = true;

        let mut system = System::new(&scenario, Box::new(HeadlessCanvas::new())).unwrap();
        assert_eq!(system.focused_kind(), BodyKind::Moon);
        assert!(system.playback().is_paused());
        assert_eq!(
            system.camera().target,
            system.position(BodyKind::Moon).unwrap()
        );

        assert_eq!(
            system.apply(ControlCommand::Focus(BodyKind::Mars)),
            Err(SystemError::UnknownBody(BodyKind::Mars))
        );
        assert_eq!(system.focus_on(BodyKind::Earth), Ok(true));
        assert_eq!(system.focus_on(BodyKind::Earth), Ok(false));

        scenario.focus_order.clear();
        assert!(matches!(
            System::new(&scenario, Box::new(HeadlessCanvas::new())),
            Err(SystemError::NoFocusTargets)
        ));
    }

    #[test]
    fn resize_updates_the_aspect() {
        let (mut system, _) = nominal_system();
        assert!(system.resize(1600, 800));
        assert_eq!(system.camera().aspect, 2.0);
        assert!(!system.resize(0, 800));
        system
            .apply(ControlCommand::Resize {
                width: 800,
                height: 0,
            })
            .unwrap();
        assert_eq!(system.camera().aspect, 2.0);
    }
}
