//! Camera focus cycling.
//!
//! The camera keeps a fixed offset from the focused body. The offset is
//! re-derived every frame from the actual camera, so zooming or orbiting the
//! view carries over when the focus moves to another body.

use na::Vector3;
use tracing::debug;

use crate::scene::BodyId;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraRig {
    pub position: Vector3<f64>,
    pub target: Vector3<f64>,
    /// Width over height
    pub aspect: f64,
}

impl CameraRig {
    pub fn new(offset: Vector3<f64>) -> Self {
        Self {
            position: offset,
            target: Vector3::zeros(),
            aspect: 1.0,
        }
    }

    pub fn offset(&self) -> Vector3<f64> {
        self.position - self.target
    }

    /// Point at `target`, keeping `offset` between the eye and the target
    pub fn track(&mut self, target: Vector3<f64>, offset: Vector3<f64>) {
        self.target = target;
        self.position = target + offset;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FocusState {
    targets: Vec<BodyId>,
    index: usize,
    offset: Vector3<f64>,
}

impl FocusState {
    /// Returns `None` when there's nothing to focus on
    pub fn new(targets: Vec<BodyId>, offset: Vector3<f64>) -> Option<Self> {
        if targets.is_empty() {
            return None;
        }
        Some(Self {
            targets,
            index: 0,
            offset,
        })
    }

    pub fn focused(&self) -> BodyId {
        self.targets[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn targets(&self) -> &[BodyId] {
        &self.targets
    }

    pub fn offset(&self) -> Vector3<f64> {
        self.offset
    }

    pub fn recapture(&mut self, camera: &CameraRig) {
        self.offset = camera.offset();
    }

    /// Move one body forward, no wraparound. Returns whether the focus changed.
    pub fn next(&mut self, camera: &CameraRig) -> bool {
        if self.index + 1 < self.targets.len() {
            self.select(self.index + 1, camera)
        } else {
            false
        }
    }

    /// Move one body back, no wraparound. Returns whether the focus changed.
    pub fn previous(&mut self, camera: &CameraRig) -> bool {
        if self.index > 0 {
            self.select(self.index - 1, camera)
        } else {
            false
        }
    }

    /// Jump to the body at `index` of the focus list
    pub fn select(&mut self, index: usize, camera: &CameraRig) -> bool {
        if index >= self.targets.len() || index == self.index {
            return false;
        }
        self.recapture(camera);
        debug!(from = self.index, to = index, "Focus changed");
        self.index = index;
        true
    }

    pub fn position_of(&self, body: BodyId) -> Option<usize> {
        self.targets.iter().position(|b| *b == body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Appearance, Color, HeadlessCanvas, Scene};
    use bodies::prelude::BodyKind;

    fn targets(n: usize) -> Vec<BodyId> {
        let mut scene = Scene::new(Box::new(HeadlessCanvas::new()));
        (0..n)
            .map(|_| {
                scene.add_body(
                    BodyKind::Mercury,
                    1.0,
                    Appearance::lit(Color::WHITE),
                    None,
                    Vector3::zeros(),
                )
            })
            .collect()
    }

    #[test]
    fn empty_focus_list() {
        assert!(FocusState::new(Vec::new(), Vector3::z()).is_none());
    }

    #[test]
    fn index_is_clamped() {
        let cam = CameraRig::new(Vector3::new(0.0, 0.0, 100.0));
        let mut f = FocusState::new(targets(3), cam.offset()).unwrap();

        assert!(!f.previous(&cam));
        assert_eq!(f.index(), 0);

        assert!(f.next(&cam));
        assert!(f.next(&cam));
        assert!(!f.next(&cam));
        assert!(!f.next(&cam));
        assert_eq!(f.index(), 2);

        assert!(f.previous(&cam));
        assert_eq!(f.index(), 1);
        assert!(!f.select(7, &cam));
        assert_eq!(f.index(), 1);
    }

    #[test]
    fn focus_change_recaptures_the_offset() {
        let mut cam = CameraRig::new(Vector3::new(0.0, 0.0, 100.0));
        let mut f = FocusState::new(targets(2), cam.offset()).unwrap();

        // User zoomed in on the first body
        cam.track(Vector3::new(10.0, 0.0, 0.0), Vector3::new(0.0, 30.0, 40.0));
        assert!(f.next(&cam));
        assert_eq!(f.offset(), Vector3::new(0.0, 30.0, 40.0));
        assert_eq!(f.offset().norm(), 50.0);

        // No change, no recapture
        cam.position = Vector3::zeros();
        assert!(!f.next(&cam));
        assert_eq!(f.offset(), Vector3::new(0.0, 30.0, 40.0));
    }
}
