//! Round flow: in-place scene reset.
//!
//! Rather than tearing the world down and rebuilding it, a round reset puts
//! everything a round touches back to spawn state so the host keeps its
//! engine-side objects alive: poses, health, launchers, inputs, in-flight
//! shells, camera.

use bevy::prelude::*;

use crate::ballistics::Shell;
use crate::camera::CameraRig;
use crate::components::{ControlState, Dead, FireInput, Health, SpawnPoint, Tank};
use crate::logger;
use crate::movement::{EngineAudioState, EngineClip};
use crate::shooting::ShellLauncher;

/// Host request: restart the round. One event resets everything once.
#[derive(Event, Debug, Clone, Copy, Default)]
pub struct ResetRound;

/// System: apply pending round resets.
pub fn apply_round_resets(
    mut resets: EventReader<ResetRound>,
    mut tanks: Query<
        (
            Entity,
            &SpawnPoint,
            &mut Transform,
            &mut Health,
            &mut ShellLauncher,
            &mut ControlState,
            &mut FireInput,
            &mut EngineAudioState,
        ),
        With<Tank>,
    >,
    shells: Query<Entity, With<Shell>>,
    mut rig: ResMut<CameraRig>,
    mut commands: Commands,
) {
    if resets.read().next().is_none() {
        return;
    }
    resets.clear();

    let mut spawn_positions = Vec::new();

    for (entity, spawn, mut transform, mut health, mut launcher, mut control, mut fire, mut audio) in
        tanks.iter_mut()
    {
        transform.translation = spawn.position;
        transform.rotation = spawn.rotation;
        health.reset();
        launcher.reset();
        *control = ControlState::default();
        *fire = FireInput::default();
        // Back to the idle loop so the first post-reset tick emits no
        // spurious clip transition.
        audio.clip = EngineClip::Idling;
        commands.entity(entity).remove::<Dead>();

        spawn_positions.push(spawn.position);
    }

    for shell in shells.iter() {
        commands.entity(shell).despawn();
    }

    rig.snap_to(&spawn_positions);

    logger::log_info(&format!(
        "Round reset: {} tanks respawned",
        spawn_positions.len()
    ));
}
