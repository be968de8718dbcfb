//! Clip selection and blending driven by [`MovementState`].
//!
//! Clip names are resolved once, when a [`ClipLibrary`] arrives, into a
//! per-state table of optional handles plus a fallback (the first clip in
//! the file).  After that the machine never looks at names again.

pub mod assets;
mod mixer;

pub use assets::{
    AssetError, AssetStatus, AvatarLoader, ClipHandle, ClipInfo, ClipLibrary, load_clip_library,
};
pub use mixer::{Layer, Mixer};

use log::debug;

use crate::config::AnimConfig;
use crate::sim::MovementState;

/// Candidate clip names per state, most preferred first.
pub const IDLE_CLIPS: &[&str] = &["Idle", "idle", "Armature|Idle", "Armature|mixamo.com|Layer0"];
pub const RUN_CLIPS: &[&str] = &["Run", "Running", "run", "Jog", "Armature|Run"];
pub const JUMP_CLIPS: &[&str] = &["Jump", "jump", "Armature|Jump"];

/// Per-state clip table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClipSlots {
    pub idle: Option<ClipHandle>,
    pub running: Option<ClipHandle>,
    pub airborne: Option<ClipHandle>,
    pub fallback: Option<ClipHandle>,
}

impl ClipSlots {
    pub fn resolve(library: &ClipLibrary) -> Self {
        Self {
            idle: library.find_any(IDLE_CLIPS),
            running: library.find_any(RUN_CLIPS),
            airborne: library.find_any(JUMP_CLIPS),
            fallback: library.handles().next(),
        }
    }

    #[inline]
    pub fn clip_for(&self, state: MovementState) -> Option<ClipHandle> {
        let preferred = match state {
            MovementState::Idle => self.idle,
            MovementState::Running => self.running,
            MovementState::Airborne => self.airborne,
        };
        preferred.or(self.fallback)
    }
}

/// Idle and Running cycle; Airborne plays once and holds the last pose.
#[inline]
pub fn loops(state: MovementState) -> bool {
    !matches!(state, MovementState::Airborne)
}

pub struct AnimationStateMachine {
    library: ClipLibrary,
    slots: ClipSlots,
    mixer: Mixer,
    crossfade: f32,
    state: Option<MovementState>,
}

impl AnimationStateMachine {
    pub fn new(library: ClipLibrary, cfg: &AnimConfig) -> Self {
        let slots = ClipSlots::resolve(&library);
        debug!("clip slots resolved: {slots:?}");
        Self {
            library,
            slots,
            mixer: Mixer::default(),
            crossfade: cfg.crossfade,
            state: None,
        }
    }

    #[inline]
    pub fn slots(&self) -> &ClipSlots {
        &self.slots
    }

    #[inline]
    pub fn state(&self) -> Option<MovementState> {
        self.state
    }

    #[inline]
    pub fn mixer(&self) -> &Mixer {
        &self.mixer
    }

    /// Clip of the newest layer, i.e. the one fading in or fully on.
    #[inline]
    pub fn active_clip(&self) -> Option<ClipHandle> {
        self.mixer.active().map(|l| l.clip)
    }

    pub fn active_clip_name(&self) -> Option<&str> {
        self.active_clip()
            .and_then(|h| self.library.get(h))
            .map(|c| c.name.as_str())
    }

    /// Switch to `state`.
    ///
    /// A different clip starts from frame zero and crossfades in (or snaps
    /// in when nothing is playing yet).  When the state maps to the clip that
    /// is already active, a one-shot clip is rewound and a looping one keeps
    /// playing.
    pub fn enter(&mut self, state: MovementState) {
        let previous = self.state.replace(state);
        let Some(clip) = self.slots.clip_for(state) else {
            return;
        };
        let duration = self.library.get(clip).map_or(0.0, |c| c.duration);
        let looping = loops(state);

        match self.active_clip() {
            Some(current) if current == clip => {
                self.mixer.set_active_looping(looping);
                if !looping {
                    self.mixer.restart_active();
                }
            }
            Some(_) => self.mixer.play(clip, duration, looping, self.crossfade),
            None => self.mixer.play(clip, duration, looping, 0.0),
        }
        debug!("anim {previous:?} -> {state:?} (clip {})", clip.0);
    }

    #[inline]
    pub fn update(&mut self, dt: f32) {
        self.mixer.update(dt);
    }

    /// Teardown: no layer keeps playing afterwards.
    pub fn stop(&mut self) {
        self.mixer.stop_all();
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn library(names: &[(&str, f32)]) -> ClipLibrary {
        ClipLibrary::from_clips(
            names
                .iter()
                .map(|&(n, d)| ClipInfo {
                    name: n.to_string(),
                    duration: d,
                })
                .collect(),
        )
    }

    fn machine(names: &[(&str, f32)]) -> AnimationStateMachine {
        AnimationStateMachine::new(library(names), &AnimConfig::default())
    }

    #[test]
    fn resolves_preferred_names_in_order() {
        let slots = ClipSlots::resolve(&library(&[
            ("Armature|mixamo.com|Layer0", 2.0),
            ("run", 1.0),
            ("Running", 1.0),
            ("Armature|Jump", 1.0),
        ]));
        assert_eq!(slots.idle, Some(ClipHandle(0)));
        assert_eq!(slots.running, Some(ClipHandle(2)));
        assert_eq!(slots.airborne, Some(ClipHandle(3)));
        assert_eq!(slots.fallback, Some(ClipHandle(0)));
    }

    #[test]
    fn missing_clip_falls_back() {
        let mut m = machine(&[("Dance", 3.0), ("Jump", 1.0)]);
        m.enter(MovementState::Idle);
        assert_eq!(m.active_clip_name(), Some("Dance"));
        m.enter(MovementState::Running);
        assert_eq!(m.active_clip_name(), Some("Dance"));
        m.enter(MovementState::Airborne);
        assert_eq!(m.active_clip_name(), Some("Jump"));
    }

    #[test]
    fn shared_fallback_clip_is_not_crossfaded_into_itself() {
        let mut m = machine(&[("Dance", 3.0)]);
        m.enter(MovementState::Idle);
        m.update(1.0);
        m.enter(MovementState::Running);
        assert_eq!(m.mixer().layers().len(), 1);
        assert!((m.mixer().active().unwrap().time - 1.0).abs() < 1e-6);

        // one-shot use of the same clip rewinds it and stops looping
        m.enter(MovementState::Airborne);
        let layer = m.mixer().active().unwrap();
        assert_eq!(layer.time, 0.0);
        assert!(!layer.looping);
    }

    #[test]
    fn empty_library_is_inert() {
        let mut m = machine(&[]);
        m.enter(MovementState::Running);
        m.update(0.5);
        assert_eq!(m.active_clip(), None);
        assert_eq!(m.state(), Some(MovementState::Running));
        assert!(m.mixer().layers().is_empty());
    }

    #[test]
    fn first_clip_starts_at_full_weight() {
        let mut m = machine(&[("Idle", 2.0)]);
        m.enter(MovementState::Idle);
        let layers = m.mixer().layers();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].weight, 1.0);
    }

    #[test]
    fn state_change_crossfades_over_the_blend_time() {
        let mut m = machine(&[("Idle", 2.0), ("Run", 1.0)]);
        m.enter(MovementState::Idle);
        m.update(0.7);
        m.enter(MovementState::Running);

        let layers = m.mixer().layers();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[1].time, 0.0, "new clip starts at frame zero");

        m.update(0.1);
        let w: Vec<f32> = m.mixer().layers().iter().map(|l| l.weight).collect();
        assert!((w[0] - 0.5).abs() < 1e-4 && (w[1] - 0.5).abs() < 1e-4, "{w:?}");

        m.update(0.1);
        let layers = m.mixer().layers();
        assert_eq!(layers.len(), 1, "faded-out layer is dropped");
        assert_eq!(m.active_clip_name(), Some("Run"));
        assert!((layers[0].weight - 1.0).abs() < 1e-6);
    }

    #[test]
    fn idle_loops_and_airborne_holds() {
        let mut m = machine(&[("Idle", 1.0), ("Jump", 0.6)]);
        m.enter(MovementState::Idle);
        m.update(2.25);
        assert!((m.mixer().layers()[0].time - 0.25).abs() < 1e-4);

        m.enter(MovementState::Airborne);
        for _ in 0..10 {
            m.update(0.2);
        }
        let jump = m.mixer().active().unwrap();
        assert_eq!(jump.time, 0.6);
        assert!(!jump.looping);
    }

    #[test]
    fn reentering_one_shot_restarts_it() {
        let mut m = machine(&[("Idle", 1.0), ("Jump", 0.6)]);
        m.enter(MovementState::Idle);
        m.enter(MovementState::Airborne);
        m.update(0.5);
        m.enter(MovementState::Airborne);
        let jump = m.mixer().active().unwrap();
        assert_eq!(jump.time, 0.0);
        // no extra layer from the re-entry
        assert_eq!(m.mixer().layers().len(), 1);
    }

    #[test]
    fn reentering_loop_is_a_no_op() {
        let mut m = machine(&[("Idle", 1.0)]);
        m.enter(MovementState::Idle);
        m.update(0.3);
        m.enter(MovementState::Idle);
        assert!((m.mixer().active().unwrap().time - 0.3).abs() < 1e-6);
    }

    #[test]
    fn stop_clears_every_layer() {
        let mut m = machine(&[("Idle", 1.0), ("Run", 1.0)]);
        m.enter(MovementState::Idle);
        m.enter(MovementState::Running);
        m.stop();
        assert!(m.mixer().layers().is_empty());
        m.update(1.0);
        assert_eq!(m.active_clip(), None);
    }
}
