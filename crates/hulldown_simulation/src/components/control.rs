//! Per-tick input snapshots.
//!
//! Device handling lives in the host engine. Each presentation frame the host
//! samples its input actions and writes these components; the simulation reads
//! them once per fixed tick, so every computation inside a tick sees the same
//! values (no torn reads).

use bevy::prelude::*;

/// Throttle/turn axes, both in [-1, 1].
///
/// In axis mode, throttle drives along the hull forward vector and turn yaws
/// the hull. In direct-control mode, the pair selects a world direction in the
/// camera basis instead.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ControlState {
    pub throttle: f32,
    pub turn: f32,
}

impl ControlState {
    pub fn new(throttle: f32, turn: f32) -> Self {
        Self {
            throttle: throttle.clamp(-1.0, 1.0),
            turn: turn.clamp(-1.0, 1.0),
        }
    }

    /// True when both axes are under the engine-idle deadzone.
    pub fn is_idle(&self) -> bool {
        self.throttle.abs() < 0.1 && self.turn.abs() < 0.1
    }
}

/// Fire button snapshot for the current tick.
///
/// `pressed`/`released` are edge flags valid for one tick only; the host (or a
/// test) rebuilds this component every tick. `held` is level-triggered: a
/// charge keeps accumulating only while it stays true.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct FireInput {
    pub pressed: bool,
    pub held: bool,
    pub released: bool,
}

impl FireInput {
    pub const RELEASED: Self = Self {
        pressed: false,
        held: false,
        released: true,
    };

    pub fn press() -> Self {
        Self {
            pressed: true,
            held: true,
            released: false,
        }
    }

    pub fn hold() -> Self {
        Self {
            pressed: false,
            held: true,
            released: false,
        }
    }

    /// Clear the edge flags, keeping the hold state.
    pub fn next_tick(&mut self) {
        self.pressed = false;
        self.released = false;
    }
}
