//! CLI command implementations.
//!
//! Commands orchestrate the library components to perform user tasks.

pub mod replay;

// Re-export main command functions
pub use replay::{execute_replay, execute_replay_to, validate_args, ReplayArgs};
