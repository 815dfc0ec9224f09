//! Core tank components: Tank, Health, SpawnPoint, Dead.

use bevy::prelude::*;

use crate::components::control::{ControlState, FireInput};
use crate::movement::{EngineAudioState, Locomotion};
use crate::shooting::ShellLauncher;

/// A tank in the arena.
///
/// Required components pull in the full per-tank state, so spawning a tank
/// only needs a `Transform` plus this marker.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
#[require(Health, ControlState, FireInput, Locomotion, ShellLauncher, EngineAudioState, SpawnPoint)]
pub struct Tank {
    /// Player slot (1-based). Purely informational for the host glue.
    pub player_number: u32,
    /// Computer-controlled tanks ignore `FireInput` and are driven through
    /// [`ChargeCommand`](crate::shooting::ChargeCommand) events instead.
    pub computer_controlled: bool,
}

impl Default for Tank {
    fn default() -> Self {
        Self {
            player_number: 1,
            computer_controlled: false,
        }
    }
}

/// Tank hit points.
///
/// `current` is intentionally NOT clamped at zero: logical death is the raw
/// `current <= 0` check, taken exactly once by the death system. UI reads go
/// through [`Health::display_fraction`], which clamps.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub starting: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(200.0)
    }
}

impl Health {
    pub fn new(starting: f32) -> Self {
        Self {
            current: starting,
            starting,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn take_damage(&mut self, amount: f32) {
        self.current -= amount;
    }

    /// Heal, clamped at starting health.
    pub fn increase_health(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.starting);
    }

    /// Fill level for the health bar, clamped to [0, 1].
    pub fn display_fraction(&self) -> f32 {
        (self.current / self.starting).clamp(0.0, 1.0)
    }

    pub fn reset(&mut self) {
        self.current = self.starting;
    }
}

/// Marker: the tank was destroyed. Control and charging systems skip these;
/// the host plays the wreck visuals and hides the body.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Dead;

/// Pose restored on round reset.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SpawnPoint {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for SpawnPoint {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl SpawnPoint {
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            position: transform.translation,
            rotation: transform.rotation,
        }
    }
}
