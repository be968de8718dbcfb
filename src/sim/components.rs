use bitflags::bitflags;
use glam::Vec3;

/// Coarse locomotion mode.  Derived from `(grounded, horizontal speed)`
/// every tick; never set from input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MovementState {
    #[default]
    Idle,
    Running,
    Airborne,
}

impl MovementState {
    /// The classification rule: airborne wins, then the speed dead zone.
    #[inline]
    pub fn classify(grounded: bool, horizontal_speed: f32, threshold: f32) -> Self {
        if !grounded {
            MovementState::Airborne
        } else if horizontal_speed > threshold {
            MovementState::Running
        } else {
            MovementState::Idle
        }
    }
}

/// Everything the controller remembers about the agent between ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentState {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Facing around +Y, radians; 0 looks down +Z.
    pub yaw: f32,
    pub grounded: bool,
    pub movement: MovementState,
    /// Seconds until the next vault is allowed; never negative.
    pub vault_cooldown: f32,
}

impl Default for AgentState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            grounded: false,
            movement: MovementState::Idle,
            vault_cooldown: 0.0,
        }
    }
}

impl AgentState {
    #[inline]
    pub fn horizontal_speed(&self) -> f32 {
        self.velocity.x.hypot(self.velocity.z)
    }
}

bitflags! {
    /// Held intents for one tick.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
    pub struct InputFlags: u8 {
        const FORWARD  = 0x01;
        const BACKWARD = 0x02;
        const LEFT     = 0x04;
        const RIGHT    = 0x08;
        const RUN      = 0x10;
        const JUMP     = 0x20;
    }
}

/// Immutable per-tick input: what is held, plus whether jump went down
/// this tick (rising edge).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub held: InputFlags,
    pub jump_pressed: bool,
}

impl InputSnapshot {
    #[inline]
    pub fn held(held: InputFlags) -> Self {
        Self {
            held,
            jump_pressed: false,
        }
    }

    /// Jump pressed this tick (and therefore also held).
    #[inline]
    pub fn with_jump_press(mut self) -> Self {
        self.held |= InputFlags::JUMP;
        self.jump_pressed = true;
        self
    }

    #[inline]
    pub fn is_held(&self, flag: InputFlags) -> bool {
        self.held.contains(flag)
    }
}

/// Edge-triggered movement-state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: MovementState,
    pub to: MovementState,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_truth_table() {
        use MovementState::*;
        let t = 0.1;
        assert_eq!(MovementState::classify(false, 0.0, t), Airborne);
        assert_eq!(MovementState::classify(false, 50.0, t), Airborne);
        assert_eq!(MovementState::classify(true, 0.5, t), Running);
        assert_eq!(MovementState::classify(true, 0.1, t), Idle);
        assert_eq!(MovementState::classify(true, 0.0, t), Idle);
    }

    #[test]
    fn jump_press_implies_held() {
        let snap = InputSnapshot::held(InputFlags::FORWARD).with_jump_press();
        assert!(snap.is_held(InputFlags::JUMP));
        assert!(snap.is_held(InputFlags::FORWARD));
        assert!(snap.jump_pressed);
    }
}
