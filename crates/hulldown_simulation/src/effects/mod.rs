//! Audio/particle cue events: the play-effect half of the host interface.
//!
//! The simulation decides WHAT should play and when; the host engine owns the
//! actual audio sources and particle systems and maps each cue onto them.
//! Headless runs simply drain the channel.

use bevy::prelude::*;

/// One-shot effect cue, consumed by the host glue layer.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub enum EffectRequest {
    /// Engine loop switched to idling. Pitch is pre-randomized by the
    /// simulation so replays with the same seed sound identical.
    EngineIdling { tank: Entity, pitch: f32 },
    /// Engine loop switched to driving.
    EngineDriving { tank: Entity, pitch: f32 },
    /// Shot charge-up started.
    ChargingStarted { tank: Entity },
    /// Shell left the barrel.
    ShellFired { tank: Entity },
    /// Shell exploded on impact.
    ShellExploded { center: Vec3 },
    /// A tank was destroyed.
    TankExploded { center: Vec3 },
}
