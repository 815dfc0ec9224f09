//! Tank locomotion integrator.
//!
//! Two control modes:
//! - Axis: throttle drives along the hull forward vector, turn yaws the hull.
//! - Direct: throttle/turn select a world direction in the camera basis; the
//!   hull steers toward it with a per-tick yaw clamp, and forward speed falls
//!   off as the desired direction swings behind the hull.
//!
//! The pose lives in the entity `Transform`. In-engine, the glue layer mirrors
//! it onto the engine-owned rigid body after each tick; headless, it is
//! authoritative. Runs in `FixedUpdate`, before the shooting systems.

use bevy::prelude::*;
use rand::Rng;

use crate::camera::CameraBasis;
use crate::components::{ControlState, Dead, Tank};
use crate::effects::EffectRequest;
use crate::DeterministicRng;

/// Locomotion tuning and per-tick direct-control state.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Locomotion {
    /// Forward speed at full throttle (units/s).
    pub speed: f32,
    /// Yaw rate (degrees/s).
    pub turn_speed: f32,
    pub mode: ControlMode,
    /// World direction the driver wants in direct mode. Rebuilt every tick
    /// from the camera basis; unused in axis mode.
    pub requested_direction: Vec3,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self {
            speed: 12.0,
            turn_speed: 180.0,
            mode: ControlMode::Axis,
            requested_direction: Vec3::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum ControlMode {
    /// Classic tank controls: forward/back plus rotate in place.
    #[default]
    Axis,
    /// Point where you want to go, camera-relative.
    Direct,
}

/// Engine sound bookkeeping: which loop is active, pitch variation bounds.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct EngineAudioState {
    pub clip: EngineClip,
    pub base_pitch: f32,
    pub pitch_range: f32,
}

impl Default for EngineAudioState {
    fn default() -> Self {
        Self {
            clip: EngineClip::Idling,
            base_pitch: 1.0,
            pitch_range: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum EngineClip {
    Idling,
    Driving,
}

/// System: rebuild the requested world direction for direct-control tanks.
///
/// Pressing "up" means "away from the camera", not "hull forward", so the two
/// control axes are projected through the ground-plane camera basis.
pub fn update_requested_direction(
    mut tanks: Query<(&mut Locomotion, &ControlState), (With<Tank>, Without<Dead>)>,
    basis: Res<CameraBasis>,
) {
    for (mut locomotion, control) in tanks.iter_mut() {
        if locomotion.mode == ControlMode::Direct {
            locomotion.requested_direction =
                basis.forward * control.throttle + basis.right * control.turn;
        }
    }
}

/// System: integrate pose from the tick's control inputs.
pub fn integrate_locomotion(
    mut tanks: Query<(&Locomotion, &ControlState, &mut Transform), (With<Tank>, Without<Dead>)>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.delta_secs();

    for (locomotion, control, mut transform) in tanks.iter_mut() {
        let forward = transform.forward().as_vec3();

        match locomotion.mode {
            ControlMode::Axis => {
                transform.translation += forward * control.throttle * locomotion.speed * dt;
                // Positive turn steers clockwise seen from above (negative yaw
                // in a right-handed Y-up frame).
                transform.rotate_y(-control.turn * locomotion.turn_speed.to_radians() * dt);
            }
            ControlMode::Direct => {
                let desired = locomotion.requested_direction;
                if desired.length_squared() < 1e-6 {
                    continue;
                }

                let speed_input = desired.length() * direct_speed_scale(desired, forward);
                transform.translation += forward * speed_input * locomotion.speed * dt;

                // Steer toward the desired direction, clamped so one tick can
                // never overshoot it (prevents oscillation around the target).
                let max_step = locomotion.turn_speed.to_radians() * dt;
                let step = signed_yaw_angle(forward, desired).clamp(-max_step, max_step);
                transform.rotate_y(step);
            }
        }
    }
}

/// Forward-speed scale for direct control: full speed while the desired
/// direction is within 90 degrees of the hull, decaying linearly to zero at
/// 180 degrees (driving away from where you point is slow).
pub fn direct_speed_scale(desired: Vec3, forward: Vec3) -> f32 {
    let angle_deg = angle_between_deg(desired, forward);
    1.0 - ((angle_deg - 90.0) / 90.0).clamp(0.0, 1.0)
}

/// Unsigned angle between two directions, in degrees. Saturates to 0 on
/// degenerate input instead of failing.
pub fn angle_between_deg(a: Vec3, b: Vec3) -> f32 {
    let denom = a.length() * b.length();
    if denom < 1e-8 {
        return 0.0;
    }
    let cos = (a.dot(b) / denom).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Signed yaw (radians, about +Y) that rotates `from` toward `to`, both
/// flattened onto the ground plane. Positive is counter-clockwise seen from
/// above. Zero for degenerate inputs.
pub fn signed_yaw_angle(from: Vec3, to: Vec3) -> f32 {
    let from = Vec3::new(from.x, 0.0, from.z);
    let to = Vec3::new(to.x, 0.0, to.z);
    if from.length_squared() < 1e-8 || to.length_squared() < 1e-8 {
        return 0.0;
    }
    from.cross(to).dot(Vec3::Y).atan2(from.dot(to))
}

/// System: engine loop switching (idling <-> driving).
///
/// Emits an [`EffectRequest`] only on transitions, with the pitch already
/// randomized from the seeded RNG so replays sound identical.
pub fn engine_audio_cues(
    mut tanks: Query<(Entity, &ControlState, &mut EngineAudioState), (With<Tank>, Without<Dead>)>,
    mut rng: ResMut<DeterministicRng>,
    mut effects: EventWriter<EffectRequest>,
) {
    for (entity, control, mut audio) in tanks.iter_mut() {
        let wanted = if control.is_idle() {
            EngineClip::Idling
        } else {
            EngineClip::Driving
        };

        if wanted == audio.clip {
            continue;
        }
        audio.clip = wanted;

        let pitch = rng
            .rng
            .gen_range(audio.base_pitch - audio.pitch_range..=audio.base_pitch + audio.pitch_range);
        effects.write(match wanted {
            EngineClip::Idling => EffectRequest::EngineIdling { tank: entity, pitch },
            EngineClip::Driving => EffectRequest::EngineDriving { tank: entity, pitch },
        });
    }
}
