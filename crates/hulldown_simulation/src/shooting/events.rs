//! Shooting events: the seam between the charge FSM and the host engine.

use bevy::prelude::*;

use crate::combat::ExplosionSpec;

/// Charging control for computer-driven tanks.
///
/// Replaces the fire button: the tank AI (or a scripted test) sends `Start`
/// to begin charging and `Stop` to release the shot. The state machine is
/// identical to the human path, including the cooldown gate on `Start`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeCommand {
    Start { tank: Entity },
    Stop { tank: Entity },
}

/// A shell left the barrel.
///
/// The host spawns the engine-owned shell body with this velocity; headless
/// runs hand it to the ballistics integrator instead. The explosion spec
/// travels with the shell so impact resolution needs no lookup back into the
/// shooter (which may be dead by then).
#[derive(Event, Debug, Clone, Copy)]
pub struct ShellFired {
    pub shooter: Entity,
    /// Muzzle position, world space.
    pub origin: Vec3,
    /// Launch velocity (direction * charged launch speed).
    pub velocity: Vec3,
    pub explosion: ExplosionSpec,
}

/// Aim-slider feedback: the normalized charge level changed.
#[derive(Event, Debug, Clone, Copy)]
pub struct ChargeLevelChanged {
    pub tank: Entity,
    /// Charge ratio in [0, 1].
    pub ratio: f32,
}
