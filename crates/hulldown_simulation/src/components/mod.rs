//! ECS components for battle entities.
//!
//! Organization by domain:
//! - tank: per-tank identity and state (Tank, Health, SpawnPoint, Dead)
//! - control: per-tick input snapshots written by the host (ControlState, FireInput)

pub mod control;
pub mod tank;

pub use control::*;
pub use tank::*;
