pub extern crate nalgebra as na;

pub mod focus;
pub mod gui;
pub mod orbit;
pub mod playback;
pub mod scenario;
pub mod scene;
pub mod sim_info;
pub mod system;
pub mod units;

/// An entity driven once per frame by the [`system::System`].
///
/// Updatables run in registration order. An updatable that reads another
/// body's position must be registered after the updatable driving that body.
pub trait Updatable {
    /// The body whose position this updatable writes
    fn drives(&self) -> Option<scene::BodyId> {
        None
    }

    /// The body whose current position this updatable depends on
    fn reads(&self) -> Option<scene::BodyId> {
        None
    }

    fn update(&mut self, time_step: units::SimTime, scene: &mut scene::Scene);
}
