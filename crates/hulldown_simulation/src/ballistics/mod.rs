//! Projectile ballistics: closed-form landing prediction and the headless
//! shell integrator.
//!
//! In-engine the shell is an engine-owned physics body; this module is the
//! analytic side (where WILL it land, for the AI and the aim reticle) plus a
//! gravity integrator that stands in for the engine body when running
//! headless (tests, demo binary).

use bevy::prelude::*;

use crate::combat::{ExplosionSpec, ShellImpact};
use crate::shooting::ShellFired;

/// Constant downward gravity (units/s^2).
pub const GRAVITY_Y: f32 = -9.81;

/// Shell lifetime cap (seconds). In-flight shells past this are culled
/// without exploding, mirroring the engine-side cleanup timeout.
pub const MAX_SHELL_LIFETIME: f32 = 2.0;

/// Launch speed for a normalized charge ratio: linear interpolation between
/// the launcher's minimum and maximum.
pub fn launch_speed(min_speed: f32, max_speed: f32, charge_ratio: f32) -> f32 {
    min_speed + (max_speed - min_speed) * charge_ratio.clamp(0.0, 1.0)
}

/// Ground-plane (y = 0) landing point for a projectile launched from `origin`
/// with `velocity` under constant gravity, ignoring obstacles.
///
/// Solves `0.5*g*t^2 + v_y*t + y0 = 0` and takes the larger positive root
/// (the real flight time, after the apex). Degenerate cases (no real root,
/// or no positive root) return the origin unchanged. Launching from below
/// the ground plane is undefined input.
pub fn predict_landing(origin: Vec3, velocity: Vec3) -> Vec3 {
    let a = 0.5 * GRAVITY_Y;
    let b = velocity.y;
    let c = origin.y;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant <= 0.0 {
        return origin;
    }

    let sqrt_d = discriminant.sqrt();
    let root1 = (-b + sqrt_d) / (2.0 * a);
    let root2 = (-b - sqrt_d) / (2.0 * a);

    let flight_time = root1.max(root2);
    if flight_time <= 0.0 {
        return origin;
    }

    let mut landing = origin + Vec3::new(velocity.x, 0.0, velocity.z) * flight_time;
    landing.y = 0.0;
    landing
}

/// A shell in flight (headless mode only; in-engine the body is the host's).
#[derive(Component, Debug, Clone, Copy)]
pub struct Shell {
    pub velocity: Vec3,
    pub explosion: ExplosionSpec,
    /// Seconds since launch.
    pub age: f32,
}

/// System: turn [`ShellFired`] events into headless shell entities.
pub fn spawn_shells(mut fired: EventReader<ShellFired>, mut commands: Commands) {
    for shot in fired.read() {
        commands.spawn((
            Transform::from_translation(shot.origin),
            Shell {
                velocity: shot.velocity,
                explosion: shot.explosion,
                age: 0.0,
            },
        ));
    }
}

/// System: integrate shells under gravity; ground contact explodes them.
pub fn integrate_shells(
    mut shells: Query<(Entity, &mut Shell, &mut Transform)>,
    time: Res<Time<Fixed>>,
    mut impacts: EventWriter<ShellImpact>,
    mut commands: Commands,
) {
    let dt = time.delta_secs();

    for (entity, mut shell, mut transform) in shells.iter_mut() {
        shell.velocity.y += GRAVITY_Y * dt;
        transform.translation += shell.velocity * dt;
        shell.age += dt;

        if transform.translation.y <= 0.0 {
            let mut center = transform.translation;
            center.y = 0.0;
            impacts.write(ShellImpact {
                center,
                spec: shell.explosion,
            });
            commands.entity(entity).despawn();
        } else if shell.age >= MAX_SHELL_LIFETIME {
            // Timed out mid-air (shot over the arena edge): no explosion.
            commands.entity(entity).despawn();
        }
    }
}
