//! Charge-based shell firing.
//!
//! ECS owns the charge state machine and cooldown; the host engine owns the
//! spawned shell body, aim slider and audio. The seam is events: the FSM emits
//! [`ShellFired`]/[`ChargeLevelChanged`], the host (or the headless ballistics
//! module) consumes them.
//!
//! State machine (per launcher):
//! Idle -> Charging on fire press / Start command, only while cooldown <= 0.
//! Charging accumulates launch speed linearly up to the cap; release, Stop or
//! hitting the cap fires in the same tick and re-enters Idle with the cooldown
//! armed.

pub mod components;
pub mod events;
pub mod systems;

pub use components::{ChargePhase, ShellLauncher};
pub use events::{ChargeCommand, ChargeLevelChanged, ShellFired};
pub use systems::{fire_control, tick_shot_cooldowns};
