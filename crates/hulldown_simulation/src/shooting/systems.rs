//! Charge state machine systems.

use std::collections::HashMap;

use bevy::prelude::*;

use crate::components::{Dead, FireInput, Tank};
use crate::effects::EffectRequest;
use crate::logger;
use crate::shooting::{ChargeCommand, ChargeLevelChanged, ShellFired, ShellLauncher};

/// System: cooldown timers decay every tick, in every phase.
pub fn tick_shot_cooldowns(mut launchers: Query<&mut ShellLauncher>, time: Res<Time<Fixed>>) {
    let dt = time.delta_secs();
    for mut launcher in launchers.iter_mut() {
        launcher.tick_cooldown(dt);
    }
}

/// System: one state-machine step per launcher per tick.
///
/// Human tanks are driven by their [`FireInput`] snapshot (press starts, a
/// release or a lost hold fires), computer tanks by [`ChargeCommand`] events;
/// both run the identical transitions. Within one tick: a release fires with
/// the charge accumulated so far (no charge gained on the release tick),
/// otherwise the launcher charges and auto-fires the moment it saturates.
pub fn fire_control(
    mut tanks: Query<(Entity, &Tank, &Transform, &mut ShellLauncher, &FireInput), Without<Dead>>,
    mut commands_in: EventReader<ChargeCommand>,
    time: Res<Time<Fixed>>,
    mut shells: EventWriter<ShellFired>,
    mut effects: EventWriter<EffectRequest>,
    mut levels: EventWriter<ChargeLevelChanged>,
) {
    let dt = time.delta_secs();

    // Commands are sampled once per tick, one (start, stop) pair per tank.
    let mut commanded: HashMap<Entity, (bool, bool)> = HashMap::new();
    for command in commands_in.read() {
        match *command {
            ChargeCommand::Start { tank } => commanded.entry(tank).or_default().0 = true,
            ChargeCommand::Stop { tank } => commanded.entry(tank).or_default().1 = true,
        }
    }

    for (entity, tank, transform, mut launcher, input) in tanks.iter_mut() {
        let (start_requested, stop_requested) = if tank.computer_controlled {
            commanded.get(&entity).copied().unwrap_or_default()
        } else {
            // A hold that vanishes without a release edge (dropped input,
            // focus loss) still ends the charge.
            (input.pressed, input.released || !input.held)
        };

        if launcher.is_charging() {
            if stop_requested {
                fire(entity, transform, &mut launcher, &mut shells, &mut effects, &mut levels);
                continue;
            }

            let saturated = launcher.charge(dt);
            levels.write(ChargeLevelChanged {
                tank: entity,
                ratio: launcher.charge_ratio(),
            });

            if saturated {
                // Never overshoots: the cap and the shot land in the same tick.
                fire(entity, transform, &mut launcher, &mut shells, &mut effects, &mut levels);
            }
        } else if start_requested && launcher.can_start_charging() {
            launcher.start_charging();
            effects.write(EffectRequest::ChargingStarted { tank: entity });
            levels.write(ChargeLevelChanged {
                tank: entity,
                ratio: 0.0,
            });
        }
    }
}

/// Consume the charge: emit the shell and the cues, reset the slider.
fn fire(
    entity: Entity,
    transform: &Transform,
    launcher: &mut ShellLauncher,
    shells: &mut EventWriter<ShellFired>,
    effects: &mut EventWriter<EffectRequest>,
    levels: &mut EventWriter<ChargeLevelChanged>,
) {
    let launch_speed = launcher.fire();
    let origin = transform.transform_point(launcher.fire_offset);
    let direction = launch_direction(transform, launcher.elevation_deg);

    shells.write(ShellFired {
        shooter: entity,
        origin,
        velocity: direction * launch_speed,
        explosion: launcher.explosion,
    });
    effects.write(EffectRequest::ShellFired { tank: entity });
    levels.write(ChargeLevelChanged {
        tank: entity,
        ratio: 0.0,
    });

    logger::log(&format!(
        "Tank {:?} fired shell at {:.1} units/s",
        entity, launch_speed
    ));
}

/// Muzzle direction: hull forward pitched up by the barrel elevation.
pub fn launch_direction(transform: &Transform, elevation_deg: f32) -> Vec3 {
    let pitch_up = Quat::from_axis_angle(transform.right().as_vec3(), elevation_deg.to_radians());
    pitch_up * transform.forward().as_vec3()
}
