//! Shell launcher component and its state machine.

use bevy::prelude::*;

use crate::combat::ExplosionSpec;

/// Launcher state: either idle (possibly cooling down) or charging a shot.
///
/// "Fired" is not a stored state: firing is a single-tick transition that
/// emits the launch speed and lands back in `Idle` with the cooldown armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum ChargePhase {
    #[default]
    Idle,
    Charging,
}

/// Charge-based shell launcher.
///
/// Invariant: `current_launch_speed` stays within
/// `[min_launch_speed, max_launch_speed]` at all times.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct ShellLauncher {
    /// Shell speed when fired with no charge (units/s).
    pub min_launch_speed: f32,
    /// Shell speed at full charge (units/s).
    pub max_launch_speed: f32,
    /// Time to charge from min to max (seconds). Reaching it auto-fires.
    pub max_charge_time: f32,
    /// Time before another charge may start after a shot (seconds).
    pub shot_cooldown: f32,
    /// Muzzle position in hull-local space.
    pub fire_offset: Vec3,
    /// Barrel pitch above the horizon (degrees). Gives shells their arc.
    pub elevation_deg: f32,
    /// Warhead parameters handed to the shell on fire.
    pub explosion: ExplosionSpec,

    pub phase: ChargePhase,
    /// Launch speed the shell would get if fired right now.
    pub current_launch_speed: f32,
    /// Counts down every tick regardless of phase; charging may not start
    /// while above zero.
    pub cooldown_remaining: f32,
}

impl Default for ShellLauncher {
    fn default() -> Self {
        Self {
            min_launch_speed: 5.0,
            max_launch_speed: 20.0,
            max_charge_time: 0.75,
            shot_cooldown: 1.0,
            fire_offset: Vec3::new(0.0, 1.7, -1.35),
            elevation_deg: 10.0,
            explosion: ExplosionSpec::default(),
            phase: ChargePhase::Idle,
            current_launch_speed: 5.0,
            cooldown_remaining: 0.0,
        }
    }
}

impl ShellLauncher {
    /// Launch-speed gain per second of charging.
    pub fn charge_rate(&self) -> f32 {
        (self.max_launch_speed - self.min_launch_speed) / self.max_charge_time
    }

    /// Normalized charge in [0, 1] (aim-slider value).
    pub fn charge_ratio(&self) -> f32 {
        (self.current_launch_speed - self.min_launch_speed)
            / (self.max_launch_speed - self.min_launch_speed)
    }

    pub fn is_charging(&self) -> bool {
        self.phase == ChargePhase::Charging
    }

    /// A new charge may begin: idle and fully cooled down.
    pub fn can_start_charging(&self) -> bool {
        self.phase == ChargePhase::Idle && self.cooldown_remaining <= 0.0
    }

    /// Idle -> Charging. Caller must have checked [`Self::can_start_charging`].
    pub fn start_charging(&mut self) {
        self.phase = ChargePhase::Charging;
        self.current_launch_speed = self.min_launch_speed;
    }

    /// Accumulate charge for one tick. Returns true when the cap was reached
    /// (the caller must fire in the same tick, never overshooting the cap).
    pub fn charge(&mut self, dt: f32) -> bool {
        self.current_launch_speed =
            (self.current_launch_speed + self.charge_rate() * dt).min(self.max_launch_speed);
        self.current_launch_speed >= self.max_launch_speed
    }

    /// Charging -> Idle. Consumes the accumulated charge, arms the cooldown
    /// and returns the launch speed for the shell.
    pub fn fire(&mut self) -> f32 {
        let launch_speed = self.current_launch_speed;
        self.current_launch_speed = self.min_launch_speed;
        self.cooldown_remaining = self.shot_cooldown;
        self.phase = ChargePhase::Idle;
        launch_speed
    }

    pub fn tick_cooldown(&mut self, dt: f32) {
        if self.cooldown_remaining > 0.0 {
            self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
        }
    }

    /// Back to the spawn-time state (round reset).
    pub fn reset(&mut self) {
        self.phase = ChargePhase::Idle;
        self.current_launch_speed = self.min_launch_speed;
        self.cooldown_remaining = 0.0;
    }
}
