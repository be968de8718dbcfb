//! Boundary to the physics engine.
//!
//! The locomotion code never integrates or resolves collisions itself; it
//! only asks the world to cast rays and reads / writes one rigid body
//! through [`PhysicsWorld`].  Handles are explicit: the caller owns the body
//! handle and passes it into every call.

use glam::{Quat, Vec3};
use thiserror::Error;

pub mod rapier;

pub use rapier::RapierWorld;

/// Closest intersection reported by [`PhysicsWorld::raycast`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Distance along the (unit) ray direction.
    pub distance: f32,
    pub point: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhysicsError {
    #[error("rigid body handle does not refer to a live body")]
    MissingBody,
}

/// Raycast, read and impulse service consumed by the simulation core.
pub trait PhysicsWorld {
    /// Opaque rigid-body handle.
    type Body: Copy;

    /// Closest hit along `direction` within `max_distance`, ignoring every
    /// collider attached to `exclude`.  Read-only.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<Self::Body>,
    ) -> Option<RayHit>;

    fn transform(&self, body: Self::Body) -> Result<BodyTransform, PhysicsError>;

    fn linear_velocity(&self, body: Self::Body) -> Result<Vec3, PhysicsError>;

    fn set_linear_velocity(&mut self, body: Self::Body, velocity: Vec3) -> Result<(), PhysicsError>;

    /// Instantaneous change of momentum; visible in `linear_velocity` at once.
    fn apply_impulse(&mut self, body: Self::Body, impulse: Vec3) -> Result<(), PhysicsError>;
}
