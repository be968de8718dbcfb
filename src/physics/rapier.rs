//! [`PhysicsWorld`] backed by rapier3d.
//!
//! Owns every rapier set plus the query pipeline.  Static geometry is
//! inserted as parent-less colliders; the agent is a rotation-locked dynamic
//! capsule.  `step` advances the simulation and refreshes the query
//! pipeline, so raycasts always see the state after the last step.

use glam::{Quat, Vec3};
use rapier3d::prelude::*;

use super::{BodyTransform, PhysicsError, PhysicsWorld, RayHit};
use crate::config::BodyConfig;

#[inline]
fn to_na(v: Vec3) -> Vector<Real> {
    vector![v.x, v.y, v.z]
}

#[inline]
fn from_na(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub struct RapierWorld {
    gravity: Vector<Real>,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    queries: QueryPipeline,
}

impl RapierWorld {
    pub fn new(gravity: Vec3) -> Self {
        Self {
            gravity: to_na(gravity),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            queries: QueryPipeline::new(),
        }
    }

    /// Advance by `dt` seconds.  Non-positive steps are ignored.
    pub fn step(&mut self, dt: f32) {
        if !(dt > 0.0) {
            return;
        }
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            Some(&mut self.queries),
            &(),
            &(),
        );
    }

    /// Immovable box collider centred on `center`.
    pub fn add_fixed_box(&mut self, center: Vec3, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(to_na(center))
            .build();
        self.colliders.insert(collider)
    }

    /// Spawn the agent capsule with its bottom `spawn_clearance` above `floor`.
    pub fn spawn_agent(&mut self, cfg: &BodyConfig, floor: Vec3) -> RigidBodyHandle {
        let centre = floor + Vec3::Y * (cfg.base_offset() + cfg.spawn_clearance);
        let body = RigidBodyBuilder::dynamic()
            .translation(to_na(centre))
            .linear_damping(cfg.linear_damping)
            .angular_damping(cfg.angular_damping)
            .lock_rotations()
            .can_sleep(false)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::capsule_y(cfg.half_height, cfg.radius)
            .mass(cfg.mass)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    #[inline]
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    fn body(&self, handle: RigidBodyHandle) -> Result<&RigidBody, PhysicsError> {
        self.bodies.get(handle).ok_or(PhysicsError::MissingBody)
    }

    fn body_mut(&mut self, handle: RigidBodyHandle) -> Result<&mut RigidBody, PhysicsError> {
        self.bodies.get_mut(handle).ok_or(PhysicsError::MissingBody)
    }
}

impl PhysicsWorld for RapierWorld {
    type Body = RigidBodyHandle;

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        exclude: Option<RigidBodyHandle>,
    ) -> Option<RayHit> {
        let dir = direction.try_normalize()?;
        let ray = Ray::new(point![origin.x, origin.y, origin.z], to_na(dir));

        let filter = match exclude {
            Some(handle) => QueryFilter::default().exclude_rigid_body(handle),
            None => QueryFilter::default(),
        };

        let (_, toi) = self.queries.cast_ray(
            &self.bodies,
            &self.colliders,
            &ray,
            max_distance,
            true, // solid: a ray starting inside a shape hits at 0
            filter,
        )?;
        let p = ray.point_at(toi);
        Some(RayHit {
            distance: toi,
            point: Vec3::new(p.x, p.y, p.z),
        })
    }

    fn transform(&self, body: RigidBodyHandle) -> Result<BodyTransform, PhysicsError> {
        let b = self.body(body)?;
        let r = b.rotation();
        Ok(BodyTransform {
            position: from_na(b.translation()),
            rotation: Quat::from_xyzw(r.i, r.j, r.k, r.w),
        })
    }

    fn linear_velocity(&self, body: RigidBodyHandle) -> Result<Vec3, PhysicsError> {
        Ok(from_na(self.body(body)?.linvel()))
    }

    fn set_linear_velocity(
        &mut self,
        body: RigidBodyHandle,
        velocity: Vec3,
    ) -> Result<(), PhysicsError> {
        self.body_mut(body)?.set_linvel(to_na(velocity), true);
        Ok(())
    }

    fn apply_impulse(&mut self, body: RigidBodyHandle, impulse: Vec3) -> Result<(), PhysicsError> {
        self.body_mut(body)?.apply_impulse(to_na(impulse), true);
        Ok(())
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
