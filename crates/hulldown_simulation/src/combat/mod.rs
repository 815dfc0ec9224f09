//! Explosion damage and death handling.
//!
//! Inbound seam: [`ShellImpact`] (from the headless integrator, or from the
//! host's collision callback when the engine owns the shell body). Outbound:
//! [`ExplosionImpulse`] per affected body so the host physics can shove it,
//! [`HealthChanged`] for the health bars, [`TankDestroyed`] for wreck visuals.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::{Dead, Health, Tank};
use crate::effects::EffectRequest;
use crate::logger;

/// Warhead parameters, attached to every fired shell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct ExplosionSpec {
    /// Blast radius; bodies further away are unaffected.
    pub radius: f32,
    /// Damage dealt at the blast center.
    pub max_damage: f32,
    /// Impulse magnitude handed to the host physics.
    pub force: f32,
}

impl Default for ExplosionSpec {
    fn default() -> Self {
        Self {
            radius: 5.0,
            max_damage: 100.0,
            force: 1000.0,
        }
    }
}

/// A shell detonated at `center`.
#[derive(Event, Debug, Clone, Copy)]
pub struct ShellImpact {
    pub center: Vec3,
    pub spec: ExplosionSpec,
}

/// Outbound: the host applies an explosion impulse to this body.
#[derive(Event, Debug, Clone, Copy)]
pub struct ExplosionImpulse {
    pub body: Entity,
    pub center: Vec3,
    pub radius: f32,
    pub force: f32,
}

/// Outbound: health-bar refresh for one tank.
#[derive(Event, Debug, Clone, Copy)]
pub struct HealthChanged {
    pub tank: Entity,
    /// Fill level in [0, 1].
    pub fraction: f32,
}

/// Outbound: a tank just died (raised exactly once per life).
#[derive(Event, Debug, Clone, Copy)]
pub struct TankDestroyed {
    pub tank: Entity,
    pub at: Vec3,
}

/// Linear radial damage falloff: full damage at the center, zero at the
/// radius and beyond. Caller guards `radius > 0`.
pub fn explosion_damage(distance: f32, radius: f32, max_damage: f32) -> f32 {
    debug_assert!(radius > 0.0, "explosion radius must be positive");
    max_damage * ((radius - distance) / radius).max(0.0)
}

/// System: resolve shell impacts against every tank in range.
///
/// The in-range scan over tank entities is the headless stand-in for the
/// host's overlap query. Dead tanks have left the queryable layer and take
/// nothing further. Bodies without a `Health` component still get the
/// impulse but no damage (skipped, not an error).
pub fn resolve_shell_impacts(
    mut impacts: EventReader<ShellImpact>,
    mut tanks: Query<(Entity, &Transform, Option<&mut Health>), (With<Tank>, Without<Dead>)>,
    mut impulses: EventWriter<ExplosionImpulse>,
    mut health_changes: EventWriter<HealthChanged>,
    mut effects: EventWriter<EffectRequest>,
) {
    for impact in impacts.read() {
        for (entity, transform, health) in tanks.iter_mut() {
            let distance = (transform.translation - impact.center).length();
            if distance >= impact.spec.radius {
                continue;
            }

            impulses.write(ExplosionImpulse {
                body: entity,
                center: impact.center,
                radius: impact.spec.radius,
                force: impact.spec.force,
            });

            let Some(mut health) = health else {
                continue;
            };

            let damage = explosion_damage(distance, impact.spec.radius, impact.spec.max_damage);
            health.take_damage(damage);
            health_changes.write(HealthChanged {
                tank: entity,
                fraction: health.display_fraction(),
            });

            logger::log(&format!(
                "Explosion hit tank {:?} for {:.1} damage ({:.1} units from center)",
                entity, damage, distance
            ));
        }

        effects.write(EffectRequest::ShellExploded {
            center: impact.center,
        });
    }
}

/// System: the once-only dead transition.
///
/// Reads the raw health value (which may be negative); tanks crossing zero get
/// the `Dead` marker, which gates them out of locomotion and fire control.
pub fn handle_deaths(
    tanks: Query<(Entity, &Health, &Transform), (With<Tank>, Without<Dead>)>,
    mut commands: Commands,
    mut destroyed: EventWriter<TankDestroyed>,
    mut effects: EventWriter<EffectRequest>,
) {
    for (entity, health, transform) in tanks.iter() {
        if health.is_alive() {
            continue;
        }

        commands.entity(entity).insert(Dead);
        destroyed.write(TankDestroyed {
            tank: entity,
            at: transform.translation,
        });
        effects.write(EffectRequest::TankExploded {
            center: transform.translation,
        });

        logger::log_info(&format!("Tank {:?} destroyed", entity));
    }
}
