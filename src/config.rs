//! Tunable constants for the agent, its probes, the follow camera and the
//! animation blender.
//!
//! Everything here is plain data with a `Default` carrying the tuned values.
//! The binaries override a few fields from the command line and call
//! [`GameConfig::validate`] before building a simulation.

use glam::Vec3;
use thiserror::Error;

/*──────────────────────────── Error type ───────────────────────────*/

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("run speed {run} must exceed walk speed {walk}")]
    RunNotFaster { walk: f32, run: f32 },

    #[error("`{name}` must be a positive finite number, got {value}")]
    NotPositive { name: &'static str, value: f32 },

    #[error("vault height window ({low}, {high}) is empty")]
    EmptyVaultWindow { low: f32, high: f32 },
}

/*──────────────────────────── Sections ─────────────────────────────*/

/// Rigid body backing the agent: an upright capsule that never rotates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyConfig {
    /// Half length of the capsule's cylinder segment.
    pub half_height: f32,
    pub radius: f32,
    pub mass: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Gap between the capsule bottom and the floor at spawn.
    pub spawn_clearance: f32,
    pub gravity: Vec3,
}

impl BodyConfig {
    /// Distance from the body centre down to the bottom of the capsule.
    #[inline]
    pub fn base_offset(&self) -> f32 {
        self.half_height + self.radius
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            half_height: 0.6,
            radius: 0.3,
            mass: 1.0,
            linear_damping: 0.9,
            angular_damping: 1.0,
            spawn_clearance: 0.1,
            gravity: Vec3::new(0.0, -9.81, 0.0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocomotionConfig {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_impulse: f32,
    pub vault_forward_impulse: f32,
    pub vault_up_impulse: f32,
    /// Seconds before another vault may trigger.
    pub vault_cooldown: f32,
    /// Squared input length above which the agent turns to face its motion.
    pub facing_epsilon_sq: f32,
    /// Squared input length above which a vault probe is attempted.
    pub vault_input_epsilon_sq: f32,
    /// Horizontal speed dead zone separating Idle from Running.
    pub running_threshold: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            walk_speed: 4.25,
            run_speed: 7.5,
            jump_impulse: 4.5,
            vault_forward_impulse: 3.0,
            vault_up_impulse: 3.5,
            vault_cooldown: 0.5,
            facing_epsilon_sq: 0.01,
            vault_input_epsilon_sq: 0.1,
            running_threshold: 0.1,
        }
    }
}

/// Ray lengths and heights, all measured from the capsule bottom.
///
/// These are tuned by hand; none of them is derived from the capsule size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeConfig {
    pub ground_origin_lift: f32,
    pub ground_max_distance: f32,
    pub vault_origin_height: f32,
    pub vault_max_distance: f32,
    /// Exclusive lower bound on a vaultable hit height.
    pub vault_min_height: f32,
    /// Exclusive upper bound on a vaultable hit height.
    pub vault_max_height: f32,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            ground_origin_lift: 0.05,
            ground_max_distance: 0.15,
            vault_origin_height: 0.9,
            vault_max_distance: 0.8,
            vault_min_height: 0.1,
            vault_max_height: 1.2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraConfig {
    pub height_offset: f32,
    /// Exponential smoothing rate `k` in `1 - e^(-k·dt)`.
    pub smoothing: f32,
    /// Radians of yaw/pitch per pixel of mouse travel.
    pub mouse_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            height_offset: 0.4,
            smoothing: 12.0,
            mouse_sensitivity: 0.004,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimConfig {
    pub crossfade: f32,
}

impl Default for AnimConfig {
    fn default() -> Self {
        Self { crossfade: 0.2 }
    }
}

/*──────────────────────────── Aggregate ────────────────────────────*/

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GameConfig {
    pub body: BodyConfig,
    pub locomotion: LocomotionConfig,
    pub probe: ProbeConfig,
    pub camera: CameraConfig,
    pub anim: AnimConfig,
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positives = [
            ("body.half_height", self.body.half_height),
            ("body.radius", self.body.radius),
            ("body.mass", self.body.mass),
            ("locomotion.walk_speed", self.locomotion.walk_speed),
            ("locomotion.jump_impulse", self.locomotion.jump_impulse),
            ("probe.ground_max_distance", self.probe.ground_max_distance),
            ("probe.vault_max_distance", self.probe.vault_max_distance),
            ("camera.smoothing", self.camera.smoothing),
            ("anim.crossfade", self.anim.crossfade),
        ];
        for (name, value) in positives {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { name, value });
            }
        }

        let loco = &self.locomotion;
        if !(loco.run_speed > loco.walk_speed) {
            return Err(ConfigError::RunNotFaster {
                walk: loco.walk_speed,
                run: loco.run_speed,
            });
        }

        let probe = &self.probe;
        if !(probe.vault_min_height >= 0.0 && probe.vault_min_height < probe.vault_max_height) {
            return Err(ConfigError::EmptyVaultWindow {
                low: probe.vault_min_height,
                high: probe.vault_max_height,
            });
        }
        Ok(())
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(GameConfig::default().validate(), Ok(()));
    }

    #[test]
    fn run_must_beat_walk() {
        let mut cfg = GameConfig::default();
        cfg.locomotion.run_speed = cfg.locomotion.walk_speed;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::RunNotFaster { .. })
        ));
    }

    #[test]
    fn inverted_vault_window_is_rejected() {
        let mut cfg = GameConfig::default();
        cfg.probe.vault_min_height = 1.5;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::EmptyVaultWindow { .. })
        ));
    }

    #[test]
    fn nan_smoothing_is_rejected() {
        let mut cfg = GameConfig::default();
        cfg.camera.smoothing = f32::NAN;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::NotPositive { name: "camera.smoothing", .. })
        ));
    }

    #[test]
    fn base_offset_is_capsule_half_extent() {
        let body = BodyConfig::default();
        assert!((body.base_offset() - 0.9).abs() < 1e-6);
    }
}
