use glam::Vec3;
use log::info;
use rapier3d::prelude::RigidBodyHandle;
use thiserror::Error;

use super::components::{AgentState, InputSnapshot};
use super::controller::{LocomotionController, TickReport};
use crate::anim::{AnimationStateMachine, ClipLibrary};
use crate::config::{ConfigError, GameConfig};
use crate::physics::{PhysicsError, PhysicsWorld, RapierWorld};
use crate::world::office::{build_office, spawn_point};
use crate::world::{Camera, FollowCamera, LayoutError, LayoutSpec, Placement};

/// Longest frame the simulation will integrate in one go.  Slower frames
/// (window drags, breakpoints) are slowed down instead of tunnelling.
pub const MAX_FRAME_DT: f32 = 0.1;

/// Step used once at start-up so the query pipeline knows the scene.
const WARMUP_DT: f32 = 1.0 / 60.0;

#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error(transparent)]
    Physics(#[from] PhysicsError),
}

/// How the agent should be drawn this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AvatarView {
    Placeholder,
    Animated,
}

/// Owns the physics world, the office scene, the agent and everything that
/// reacts to it, and runs one tick per rendered frame.
pub struct Simulation {
    cfg: GameConfig,
    physics: RapierWorld,
    scene: hecs::World,
    placement: Placement,
    agent: RigidBodyHandle,
    controller: LocomotionController,
    animator: Option<AnimationStateMachine>,
    camera: Camera,
    follow: FollowCamera,
}

impl Simulation {
    pub fn new(cfg: GameConfig, layout: &LayoutSpec) -> Result<Self, SimError> {
        cfg.validate()?;

        let mut physics = RapierWorld::new(cfg.body.gravity);
        let mut scene = hecs::World::new();
        let placement = build_office(layout, &mut physics, &mut scene)?;

        let agent = physics.spawn_agent(&cfg.body, spawn_point());
        physics.step(WARMUP_DT);

        let follow = FollowCamera::new(&cfg.camera);
        let start = physics.transform(agent)?.position;
        let camera = Camera::new(follow.target(start), 0.0, 75f32.to_radians());

        info!("agent spawned at ({:.2}, {:.2}, {:.2})", start.x, start.y, start.z);
        Ok(Self {
            controller: LocomotionController::new(&cfg),
            cfg,
            physics,
            scene,
            placement,
            agent,
            animator: None,
            camera,
            follow,
        })
    }

    /* ---------------------------------------------------------------- */
    /* accessors                                                         */
    /* ---------------------------------------------------------------- */

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    #[inline]
    pub fn scene(&self) -> &hecs::World {
        &self.scene
    }

    #[inline]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    #[inline]
    pub fn agent_state(&self) -> &AgentState {
        self.controller.state()
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    #[inline]
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    #[inline]
    pub fn animator(&self) -> Option<&AnimationStateMachine> {
        self.animator.as_ref()
    }

    #[inline]
    pub fn avatar_view(&self) -> AvatarView {
        match &self.animator {
            Some(a) if a.active_clip().is_some() => AvatarView::Animated,
            _ => AvatarView::Placeholder,
        }
    }

    /// Current world position of the agent body (after the last step).
    pub fn agent_position(&self) -> Result<Vec3, PhysicsError> {
        Ok(self.physics.transform(self.agent)?.position)
    }

    /* ---------------------------------------------------------------- */
    /* lifecycle                                                         */
    /* ---------------------------------------------------------------- */

    /// Swap the placeholder for an animated avatar.  The new state machine
    /// starts in the agent's current movement state.
    pub fn attach_clips(&mut self, library: ClipLibrary) {
        let mut animator = AnimationStateMachine::new(library, &self.cfg.anim);
        animator.enter(self.controller.state().movement);
        self.animator = Some(animator);
    }

    /// One frame: controller, physics step, then animation and camera on
    /// the stepped transform.
    pub fn tick(&mut self, frame_dt: f32, input: &InputSnapshot) -> Result<TickReport, PhysicsError> {
        let dt = if frame_dt > 0.0 {
            frame_dt.min(MAX_FRAME_DT)
        } else {
            0.0
        };

        let basis = self.camera.basis();
        let report = self
            .controller
            .tick(&mut self.physics, self.agent, input, &basis, dt)?;
        self.physics.step(dt);

        if let Some(animator) = &mut self.animator {
            if let Some(t) = report.transition {
                animator.enter(t.to);
            }
            animator.update(dt);
        }

        let position = self.physics.transform(self.agent)?.position;
        self.follow.update(&mut self.camera, position, dt);
        Ok(report)
    }

    /// Stop every animation layer.  Further ticks keep the avatar frozen.
    pub fn shutdown(&mut self) {
        if let Some(animator) = &mut self.animator {
            animator.stop();
        }
        info!("simulation stopped");
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
