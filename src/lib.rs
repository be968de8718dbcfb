//! Office parkour sandbox: a capsule agent that walks, runs, jumps and
//! vaults through a procedurally laid out office.
//!
//! * [`world`]: desk layout generator, office scene, camera
//! * [`physics`]: raycast / velocity / impulse seam over rapier3d
//! * [`sim`]: ground probe, locomotion controller, per-frame runner
//! * [`anim`]: clip discovery and the movement-driven state machine
//! * [`renderer`]: top-down software view
//! * [`ui`]: input sampling and the yeller

pub mod anim;
pub mod config;
pub mod physics;
pub mod renderer;
pub mod sim;
pub mod ui;
pub mod world;
