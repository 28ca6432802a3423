// Active-pointer bookkeeping that turns pointer events into orbit-control
// input: one pointer rotates, two pointers pinch.

use glam::Vec2;

use super::controls::OrbitControls;

#[derive(Clone, Debug, Default)]
pub struct PointerTracker {
    active: Vec<(i32, Vec2)>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// A third finger is ignored until one of the first two lifts.
    pub fn down(&mut self, id: i32, pos: Vec2, controls: &mut OrbitControls) {
        if self.active.len() >= 2 || self.active.iter().any(|(p, _)| *p == id) {
            return;
        }
        self.active.push((id, pos));
        match self.active.len() {
            1 => controls.begin_rotate(pos.x, pos.y),
            _ => controls.begin_pinch(self.spread()),
        }
    }

    pub fn move_to(&mut self, id: i32, pos: Vec2, element_height: f32, controls: &mut OrbitControls) {
        let Some(slot) = self.active.iter_mut().find(|(p, _)| *p == id) else {
            return;
        };
        slot.1 = pos;
        match self.active.len() {
            1 => controls.rotate_to(pos.x, pos.y, element_height),
            _ => controls.pinch_to(self.spread()),
        }
    }

    /// Returns false for pointers that were never tracked.
    pub fn up(&mut self, id: i32, controls: &mut OrbitControls) -> bool {
        let before = self.active.len();
        self.active.retain(|(p, _)| *p != id);
        if self.active.len() == before {
            return false;
        }
        controls.end_pinch();
        match self.active.first() {
            // Lifting one finger of a pinch hands over to rotation.
            Some(&(_, rest)) => controls.begin_rotate(rest.x, rest.y),
            None => controls.end_rotate(),
        }
        true
    }

    fn spread(&self) -> f32 {
        match self.active.as_slice() {
            [(_, a), (_, b), ..] => a.distance(*b),
            _ => 0.0,
        }
    }
}
