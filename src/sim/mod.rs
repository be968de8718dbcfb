mod components;
mod controller;
mod probe;
mod tic;

#[cfg(test)]
mod testing;

pub use components::{AgentState, InputFlags, InputSnapshot, MovementState, Transition};
pub use controller::{LocomotionController, TickReport};
pub use probe::{Probe, ProbeResult, VaultCandidate};
pub use tic::{AvatarView, MAX_FRAME_DT, SimError, Simulation};
