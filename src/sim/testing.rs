//! Analytic stand-in for the physics world used by the sim unit tests:
//! an optional floor plane, axis-aligned boxes and one point-mass body.
//! Nothing integrates; tests move the body by hand.

use glam::{Quat, Vec3};

use crate::physics::{BodyTransform, PhysicsError, PhysicsWorld, RayHit};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TestBody {
    pub position: Vec3,
    pub velocity: Vec3,
}

pub struct BoxWorld {
    pub floor_y: Option<f32>,
    /// `(min, max)` corners.
    pub boxes: Vec<(Vec3, Vec3)>,
    pub body: TestBody,
    pub impulses: Vec<Vec3>,
}

impl BoxWorld {
    pub fn empty() -> Self {
        Self {
            floor_y: None,
            boxes: Vec::new(),
            body: TestBody {
                position: Vec3::ZERO,
                velocity: Vec3::ZERO,
            },
            impulses: Vec::new(),
        }
    }

    pub fn floor() -> Self {
        Self {
            floor_y: Some(0.0),
            ..Self::empty()
        }
    }

    pub fn with_box(mut self, min: Vec3, max: Vec3) -> Self {
        self.boxes.push((min, max));
        self
    }

    /// Put the body centre at `centre` with zero velocity.
    pub fn place(&mut self, centre: Vec3) {
        self.body.position = centre;
        self.body.velocity = Vec3::ZERO;
    }

    fn ray_plane(&self, origin: Vec3, dir: Vec3, max: f32) -> Option<RayHit> {
        let y = self.floor_y?;
        if dir.y >= 0.0 || origin.y < y {
            return None;
        }
        let t = (y - origin.y) / dir.y;
        (t <= max).then(|| RayHit {
            distance: t,
            point: Vec3::new(origin.x + dir.x * t, y, origin.z + dir.z * t),
        })
    }

    fn ray_box(origin: Vec3, dir: Vec3, max: f32, (lo, hi): (Vec3, Vec3)) -> Option<RayHit> {
        let mut t_min = 0.0f32;
        let mut t_max = max;
        for axis in 0..3 {
            let (o, d, a, b) = (origin[axis], dir[axis], lo[axis], hi[axis]);
            if d.abs() < 1e-9 {
                if o < a || o > b {
                    return None;
                }
                continue;
            }
            let (mut t0, mut t1) = ((a - o) / d, (b - o) / d);
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_min = t_min.max(t0);
            t_max = t_max.min(t1);
            if t_min > t_max {
                return None;
            }
        }
        Some(RayHit {
            distance: t_min,
            point: origin + dir * t_min,
        })
    }
}

impl PhysicsWorld for BoxWorld {
    type Body = ();

    fn raycast(&self, origin: Vec3, direction: Vec3, max: f32, _exclude: Option<()>) -> Option<RayHit> {
        let dir = direction.try_normalize()?;
        let plane = self.ray_plane(origin, dir, max);
        self.boxes
            .iter()
            .filter_map(|&b| Self::ray_box(origin, dir, max, b))
            .chain(plane)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn transform(&self, _: ()) -> Result<BodyTransform, PhysicsError> {
        Ok(BodyTransform {
            position: self.body.position,
            rotation: Quat::IDENTITY,
        })
    }

    fn linear_velocity(&self, _: ()) -> Result<Vec3, PhysicsError> {
        Ok(self.body.velocity)
    }

    fn set_linear_velocity(&mut self, _: (), velocity: Vec3) -> Result<(), PhysicsError> {
        self.body.velocity = velocity;
        Ok(())
    }

    fn apply_impulse(&mut self, _: (), impulse: Vec3) -> Result<(), PhysicsError> {
        // unit mass
        self.body.velocity += impulse;
        self.impulses.push(impulse);
        Ok(())
    }
}
