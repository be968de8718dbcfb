//! Keyboard and mouse sampling.
//!
//! [`InputSampler`] turns "which keys are down right now" into an
//! [`InputSnapshot`], detecting the jump rising edge itself so a held key
//! never produces a second press.  The window is only consulted through a
//! predicate, which keeps the edge logic testable without a display.

use minifb::{Key, MouseButton, MouseMode, Window};

use crate::sim::{InputFlags, InputSnapshot};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Backward,
    Left,
    Right,
    Run,
    Jump,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Forward,
        Action::Backward,
        Action::Left,
        Action::Right,
        Action::Run,
        Action::Jump,
    ];

    #[inline]
    pub fn flag(self) -> InputFlags {
        match self {
            Action::Forward => InputFlags::FORWARD,
            Action::Backward => InputFlags::BACKWARD,
            Action::Left => InputFlags::LEFT,
            Action::Right => InputFlags::RIGHT,
            Action::Run => InputFlags::RUN,
            Action::Jump => InputFlags::JUMP,
        }
    }

    pub fn keys(self) -> &'static [Key] {
        match self {
            Action::Forward => &[Key::W, Key::Up],
            Action::Backward => &[Key::S, Key::Down],
            Action::Left => &[Key::A, Key::Left],
            Action::Right => &[Key::D, Key::Right],
            Action::Run => &[Key::LeftShift, Key::RightShift],
            Action::Jump => &[Key::Space],
        }
    }
}

#[derive(Default)]
pub struct InputSampler {
    jump_was_down: bool,
}

impl InputSampler {
    pub fn sample_with(&mut self, mut is_down: impl FnMut(Action) -> bool) -> InputSnapshot {
        let held = Action::ALL
            .into_iter()
            .filter(|&a| is_down(a))
            .fold(InputFlags::empty(), |acc, a| acc | a.flag());

        let jump_down = held.contains(InputFlags::JUMP);
        let jump_pressed = jump_down && !self.jump_was_down;
        self.jump_was_down = jump_down;

        InputSnapshot { held, jump_pressed }
    }

    pub fn sample(&mut self, window: &Window) -> InputSnapshot {
        self.sample_with(|a| a.keys().iter().any(|&k| window.is_key_down(k)))
    }
}

/*──────────────────────── mouse look ─────────────────────────────*/

/// Pointer-capture stand-in: a click engages look mode, after which every
/// frame yields the cursor travel since the previous frame.
#[derive(Default)]
pub struct MouseLook {
    engaged: bool,
    last: Option<(f32, f32)>,
}

impl MouseLook {
    #[inline]
    pub fn engaged(&self) -> bool {
        self.engaged
    }

    /// Returns `true` when this call engaged look mode.
    pub fn engage(&mut self) -> bool {
        let newly = !self.engaged;
        self.engaged = true;
        newly
    }

    pub fn release(&mut self) {
        self.engaged = false;
        self.last = None;
    }

    /// Cursor travel since the last call, `(0, 0)` while released or on
    /// the first sample after engaging.
    pub fn delta(&mut self, pos: Option<(f32, f32)>) -> (f32, f32) {
        if !self.engaged {
            return (0.0, 0.0);
        }
        let d = match (self.last, pos) {
            (Some((lx, ly)), Some((x, y))) => (x - lx, y - ly),
            _ => (0.0, 0.0),
        };
        self.last = pos;
        d
    }

    /// Poll `window`: left click engages, then returns this frame's delta.
    pub fn poll(&mut self, window: &Window) -> (bool, (f32, f32)) {
        let newly = window.get_mouse_down(MouseButton::Left) && self.engage();
        let d = self.delta(window.get_mouse_pos(MouseMode::Pass));
        (newly, d)
    }
}
