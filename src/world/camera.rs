use glam::{EulerRot, Quat, Vec3};
use std::f32::consts::FRAC_PI_2;

use crate::config::CameraConfig;

/// Pitch stays just short of straight up/down so yaw remains meaningful.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Mouse-look viewpoint in world space.
///
/// * yaw 0 looks down **-Z**, positive yaw turns left (counter-clockwise
///   seen from above).
/// * pitch 0 is level, positive looks up.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pos: Vec3,
    yaw: f32,
    pitch: f32,
    fov: f32, // vertical FoV, radians
}

/// Movement axes derived from the camera, flattened onto the XZ plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl CameraBasis {
    /// Project the rotated -Z / +X axes onto the ground plane.
    pub fn from_rotation(rotation: Quat) -> Self {
        let flatten = |v: Vec3| Vec3::new(v.x, 0.0, v.z).normalize_or_zero();
        Self {
            forward: flatten(rotation * Vec3::NEG_Z),
            right: flatten(rotation * Vec3::X),
        }
    }
}

impl Camera {
    pub fn new(pos: Vec3, yaw: f32, fov: f32) -> Self {
        Self {
            pos,
            yaw,
            pitch: 0.0,
            fov,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec3 {
        self.pos
    }

    #[inline]
    pub fn set_pos(&mut self, pos: Vec3) {
        self.pos = pos;
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    #[inline]
    pub fn fov(&self) -> f32 {
        self.fov
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    #[inline]
    pub fn basis(&self) -> CameraBasis {
        CameraBasis::from_rotation(self.rotation())
    }

    /// Apply a mouse delta in pixels (right / down positive).
    pub fn look(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw = (self.yaw - dx * sensitivity).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch - dy * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }
}

/*──────────────────────── follow smoothing ───────────────────────*/

/// Eases the camera toward the agent's head.
///
/// `pos = lerp(pos, target, 1 - e^(-k·dt))` gives the same half-life at any
/// frame rate.
#[derive(Clone, Copy, Debug)]
pub struct FollowCamera {
    height_offset: f32,
    smoothing: f32,
}

impl FollowCamera {
    pub fn new(cfg: &CameraConfig) -> Self {
        Self {
            height_offset: cfg.height_offset,
            smoothing: cfg.smoothing,
        }
    }

    #[inline]
    pub fn target(&self, agent: Vec3) -> Vec3 {
        agent + Vec3::Y * self.height_offset
    }

    /// Fraction of the remaining gap closed during `dt`.
    #[inline]
    pub fn blend(&self, dt: f32) -> f32 {
        1.0 - (-self.smoothing * dt).exp()
    }

    pub fn update(&self, camera: &mut Camera, agent: Vec3, dt: f32) {
        let target = self.target(agent);
        camera.pos = camera.pos.lerp(target, self.blend(dt));
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
