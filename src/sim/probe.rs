//! Ground and ledge probing.
//!
//! Two rays, both anchored at the capsule bottom ("base") and both skipping
//! the agent's own body:
//!
//! * **ground**: straight down from slightly above the base, short range.
//!   A hit means grounded.
//! * **vault**: horizontal, from a fixed height above the base along the
//!   movement direction.  A hit is a vault candidate only when its height
//!   above the base lies strictly inside `(vault_min_height, vault_max_height)`.
//!
//! Probing never mutates the world.

use glam::Vec3;

use crate::config::ProbeConfig;
use crate::physics::PhysicsWorld;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VaultCandidate {
    /// Hit height above the agent's base.
    pub height: f32,
    /// Horizontal distance to the obstacle face.
    pub distance: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProbeResult {
    pub grounded: bool,
    /// World-space height of the surface under the agent, when grounded.
    pub ground_height: Option<f32>,
    pub vault: Option<VaultCandidate>,
}

#[derive(Clone, Copy, Debug)]
pub struct Probe {
    cfg: ProbeConfig,
}

impl Probe {
    pub fn new(cfg: ProbeConfig) -> Self {
        Self { cfg }
    }

    #[inline]
    pub fn config(&self) -> &ProbeConfig {
        &self.cfg
    }

    /// Run the ground ray and, when `vault_direction` is given and the agent
    /// is grounded, the vault ray.
    pub fn sample<W: PhysicsWorld>(
        &self,
        world: &W,
        body: W::Body,
        base: Vec3,
        vault_direction: Option<Vec3>,
    ) -> ProbeResult {
        let ground_height = self.ground(world, body, base);
        let grounded = ground_height.is_some();
        let vault = match vault_direction {
            Some(dir) if grounded => self.vault(world, body, base, dir),
            _ => None,
        };
        ProbeResult {
            grounded,
            ground_height,
            vault,
        }
    }

    /// Height of the walkable surface right under `base`, if any.
    pub fn ground<W: PhysicsWorld>(&self, world: &W, body: W::Body, base: Vec3) -> Option<f32> {
        let origin = base + Vec3::Y * self.cfg.ground_origin_lift;
        world
            .raycast(origin, Vec3::NEG_Y, self.cfg.ground_max_distance, Some(body))
            .map(|hit| hit.point.y)
    }

    /// Cast the forward ray and classify what it hits.
    pub fn vault<W: PhysicsWorld>(
        &self,
        world: &W,
        body: W::Body,
        base: Vec3,
        direction: Vec3,
    ) -> Option<VaultCandidate> {
        let origin = base + Vec3::Y * self.cfg.vault_origin_height;
        let hit = world.raycast(origin, direction, self.cfg.vault_max_distance, Some(body))?;
        let height = hit.point.y - base.y;
        self.is_vaultable(height).then_some(VaultCandidate {
            height,
            distance: hit.distance,
        })
    }

    /// Strict window: both bounds are excluded.
    #[inline]
    pub fn is_vaultable(&self, height: f32) -> bool {
        height > self.cfg.vault_min_height && height < self.cfg.vault_max_height
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::testing::BoxWorld;

    fn probe() -> Probe {
        Probe::new(ProbeConfig::default())
    }

    #[test]
    fn resting_on_the_floor_is_grounded() {
        let world = BoxWorld::floor();
        let r = probe().sample(&world, (), Vec3::new(0.0, 0.0, 0.0), None);
        assert!(r.grounded);
        assert_eq!(r.ground_height, Some(0.0));
        assert_eq!(r.vault, None);
    }

    #[test]
    fn slight_hover_still_grounded_but_a_hop_is_not() {
        let world = BoxWorld::floor();
        // ray spans base + 0.05 down to base - 0.10
        assert!(probe().sample(&world, (), Vec3::new(0.0, 0.08, 0.0), None).grounded);
        assert!(!probe().sample(&world, (), Vec3::new(0.0, 0.2, 0.0), None).grounded);
    }

    #[test]
    fn no_floor_is_a_plain_negative() {
        let world = BoxWorld::empty();
        let r = probe().sample(&world, (), Vec3::ZERO, Some(Vec3::Z));
        assert_eq!(r, ProbeResult::default());
    }

    #[test]
    fn vault_window_excludes_both_bounds() {
        let p = probe();
        assert!(!p.is_vaultable(0.1));
        assert!(p.is_vaultable(0.1001));
        assert!(p.is_vaultable(0.9));
        assert!(!p.is_vaultable(1.2));
        assert!(!p.is_vaultable(0.0));
    }

    #[test]
    fn box_ahead_is_a_candidate() {
        let world = BoxWorld::floor().with_box(Vec3::new(-1.0, 0.0, 0.5), Vec3::new(1.0, 1.2, 1.5));
        let r = probe().sample(&world, (), Vec3::ZERO, Some(Vec3::Z));
        let v = r.vault.expect("obstacle within reach");
        assert!((v.height - 0.9).abs() < 1e-5);
        assert!((v.distance - 0.5).abs() < 1e-5);
    }

    #[test]
    fn box_out_of_reach_or_behind_is_ignored() {
        let world = BoxWorld::floor().with_box(Vec3::new(-1.0, 0.0, 1.0), Vec3::new(1.0, 1.2, 2.0));
        assert_eq!(probe().sample(&world, (), Vec3::ZERO, Some(Vec3::Z)).vault, None);
        assert_eq!(probe().sample(&world, (), Vec3::ZERO, Some(Vec3::NEG_Z)).vault, None);
    }

    #[test]
    fn vault_needs_ground() {
        let world = BoxWorld::floor().with_box(Vec3::new(-1.0, 0.0, 0.5), Vec3::new(1.0, 2.0, 1.5));
        let r = probe().sample(&world, (), Vec3::new(0.0, 0.5, 0.0), Some(Vec3::Z));
        assert!(!r.grounded);
        assert_eq!(r.vault, None);
    }

    #[test]
    fn hit_at_exact_bounds_is_rejected() {
        let world = BoxWorld::floor().with_box(Vec3::new(-1.0, 0.0, 0.5), Vec3::new(1.0, 2.0, 1.5));
        for (origin, expect) in [(0.1, false), (0.5, true), (1.2, false), (1.5, false)] {
            let cfg = ProbeConfig {
                vault_origin_height: origin,
                ..ProbeConfig::default()
            };
            let hit = Probe::new(cfg).vault(&world, (), Vec3::ZERO, Vec3::Z);
            assert_eq!(hit.is_some(), expect, "origin height {origin}");
        }
    }

    #[test]
    fn probing_is_read_only() {
        let world = BoxWorld::floor();
        let before = world.body;
        let _ = probe().sample(&world, (), Vec3::ZERO, Some(Vec3::X));
        assert_eq!(world.body, before);
        assert!(world.impulses.is_empty());
    }
}
