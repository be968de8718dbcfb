//! Kinematic-style locomotion on top of a dynamic rigid body.
//!
//! Every tick the horizontal velocity is *overwritten* with the input
//! direction times walk/run speed; gravity keeps owning the vertical
//! component.  Jumps and vaults are one-shot impulses added on top.
//!
//! Tick order:
//! 1. decay vault cooldown
//! 2. camera-relative input direction (normalised, so diagonals are not faster)
//! 3. write desired horizontal velocity, turn to face it
//! 4. probe ground (+ ledge ahead when a vault is possible)
//! 5. consume a latched jump request while grounded
//! 6. vault impulse on a valid candidate
//! 7. classify Idle / Running / Airborne from the post-impulse velocity

use glam::Vec3;
use log::debug;

use super::components::{AgentState, InputFlags, InputSnapshot, MovementState, Transition};
use super::probe::{Probe, ProbeResult, VaultCandidate};
use crate::config::{GameConfig, LocomotionConfig};
use crate::physics::{PhysicsError, PhysicsWorld};
use crate::world::CameraBasis;

/// What happened during one [`LocomotionController::tick`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TickReport {
    pub state: AgentState,
    pub probe: ProbeResult,
    /// Present only when the movement state differs from last tick.
    pub transition: Option<Transition>,
    pub jumped: bool,
    pub vaulted: Option<VaultCandidate>,
}

pub struct LocomotionController {
    cfg: LocomotionConfig,
    /// Centre-to-bottom distance of the agent capsule.
    base_offset: f32,
    probe: Probe,
    state: AgentState,
    /// Latched on the jump rising edge; dropped on use or release.
    jump_request: bool,
}

impl LocomotionController {
    pub fn new(cfg: &GameConfig) -> Self {
        Self {
            cfg: cfg.locomotion,
            base_offset: cfg.body.base_offset(),
            probe: Probe::new(cfg.probe),
            state: AgentState::default(),
            jump_request: false,
        }
    }

    #[inline]
    pub fn state(&self) -> &AgentState {
        &self.state
    }

    #[inline]
    pub fn jump_pending(&self) -> bool {
        self.jump_request
    }

    /// Sum of the held directional intents in camera space, normalised when
    /// non-zero.  Opposite keys cancel out.
    pub fn move_direction(held: InputFlags, basis: &CameraBasis) -> Vec3 {
        let mut dir = Vec3::ZERO;
        if held.contains(InputFlags::FORWARD) {
            dir += basis.forward;
        }
        if held.contains(InputFlags::BACKWARD) {
            dir -= basis.forward;
        }
        if held.contains(InputFlags::LEFT) {
            dir -= basis.right;
        }
        if held.contains(InputFlags::RIGHT) {
            dir += basis.right;
        }
        dir.normalize_or_zero()
    }

    pub fn tick<W: PhysicsWorld>(
        &mut self,
        world: &mut W,
        body: W::Body,
        input: &InputSnapshot,
        basis: &CameraBasis,
        dt: f32,
    ) -> Result<TickReport, PhysicsError> {
        let cfg = self.cfg;
        self.state.vault_cooldown = (self.state.vault_cooldown - dt).max(0.0);

        let position = world.transform(body)?.position;
        let current = world.linear_velocity(body)?;

        /* -- desired horizontal velocity ------------------------------ */
        let dir = Self::move_direction(input.held, basis);
        let speed = if input.is_held(InputFlags::RUN) {
            cfg.run_speed
        } else {
            cfg.walk_speed
        };
        let desired = dir * speed;
        world.set_linear_velocity(body, Vec3::new(desired.x, current.y, desired.z))?;

        // face where the input points, even when a wall stops us
        let intent_sq = dir.length_squared();
        if intent_sq > cfg.facing_epsilon_sq {
            self.state.yaw = desired.x.atan2(desired.z);
        }

        /* -- probes --------------------------------------------------- */
        if input.jump_pressed {
            self.jump_request = true;
        }
        let base = position - Vec3::Y * self.base_offset;
        let vault_dir = (self.state.vault_cooldown == 0.0 && intent_sq > cfg.vault_input_epsilon_sq)
            .then_some(dir);
        let probe = self.probe.sample(&*world, body, base, vault_dir);

        /* -- jump ----------------------------------------------------- */
        let mut jumped = false;
        if self.jump_request && probe.grounded {
            world.apply_impulse(body, Vec3::Y * cfg.jump_impulse)?;
            self.jump_request = false;
            jumped = true;
            debug!("jump from y={:.2}", base.y);
        }
        if !input.is_held(InputFlags::JUMP) {
            self.jump_request = false;
        }

        /* -- vault ---------------------------------------------------- */
        if let Some(candidate) = probe.vault {
            let impulse = Vec3::new(
                dir.x * cfg.vault_forward_impulse,
                cfg.vault_up_impulse,
                dir.z * cfg.vault_forward_impulse,
            );
            world.apply_impulse(body, impulse)?;
            self.state.vault_cooldown = cfg.vault_cooldown;
            debug!(
                "vault over ledge h={:.2} at {:.2}m",
                candidate.height, candidate.distance
            );
        }

        /* -- classify ------------------------------------------------- */
        let velocity = world.linear_velocity(body)?;
        let movement = MovementState::classify(
            probe.grounded,
            velocity.x.hypot(velocity.z),
            cfg.running_threshold,
        );
        let transition = (movement != self.state.movement).then_some(Transition {
            from: self.state.movement,
            to: movement,
        });
        if let Some(t) = transition {
            debug!("movement {:?} -> {:?}", t.from, t.to);
        }

        self.state.position = position;
        self.state.velocity = velocity;
        self.state.grounded = probe.grounded;
        self.state.movement = movement;

        Ok(TickReport {
            state: self.state,
            probe,
            transition,
            jumped,
            vaulted: probe.vault,
        })
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
