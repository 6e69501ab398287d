// motion/mod.rs
// Key motion subsystem: the per-key state machine and the fixed-capacity
// arena the frame loop drives. Consumes derived parameters, produces pose
// samples; never reaches back into configuration.

pub mod arena;
pub mod key_state;

pub use arena::{KeyHandle, MotionArena};
pub use key_state::{KeyMotionSample, KeyMotionState, MotionInput, MotionPhase};

#[cfg(test)]
#[path = "tests/state_transitions.rs"]
mod state_transitions;

#[cfg(test)]
#[path = "tests/sample_bounds.rs"]
mod sample_bounds;

#[cfg(test)]
#[path = "tests/arena_handles.rs"]
mod arena_handles;
