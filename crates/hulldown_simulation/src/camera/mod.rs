//! Camera framing: keep every live tank on screen.
//!
//! The rig tracks the average position of the live tanks and picks the
//! smallest orthographic size that fits them all with a screen-edge buffer,
//! both critically damped. The actual camera object belongs to the host; it
//! mirrors `position`/`ortho_size` each presentation frame.

use bevy::prelude::*;
use std::f32::consts::FRAC_PI_2;

use crate::components::{Dead, Tank};

/// Ground-plane camera basis for direct-control input.
///
/// Written by the host from the live camera orientation (or left at the
/// default for a fixed top-down rig); read by the locomotion integrator so
/// "up" on the stick means "away from the camera".
#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraBasis {
    pub forward: Vec3,
    pub right: Vec3,
}

impl Default for CameraBasis {
    fn default() -> Self {
        Self::from_forward(Vec3::NEG_Z)
    }
}

impl CameraBasis {
    /// Build from a camera forward vector: flattened onto the ground plane
    /// and normalized, with right completing the basis.
    pub fn from_forward(camera_forward: Vec3) -> Self {
        let flat = Vec3::new(camera_forward.x, 0.0, camera_forward.z);
        let forward = if flat.length_squared() > 1e-8 {
            flat.normalize()
        } else {
            // Camera looking straight down: no usable ground direction.
            Vec3::NEG_Z
        };
        Self {
            forward,
            right: forward.cross(Vec3::Y).normalize(),
        }
    }
}

/// Camera rig state and tuning.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CameraRig {
    /// Approximate refocus time (seconds).
    pub damp_time: f32,
    /// Space between the outermost target and the screen edge.
    pub screen_edge_buffer: f32,
    /// Smallest orthographic size the camera may shrink to.
    pub min_size: f32,
    pub aspect: f32,
    /// Rig orientation; targets are measured in this frame for sizing.
    pub rotation: Quat,

    pub position: Vec3,
    pub ortho_size: f32,
    move_velocity: Vec3,
    zoom_speed: f32,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            damp_time: 0.2,
            screen_edge_buffer: 4.0,
            min_size: 6.5,
            aspect: 16.0 / 9.0,
            rotation: Quat::from_rotation_x(-FRAC_PI_2),
            position: Vec3::new(0.0, 40.0, 0.0),
            ortho_size: 6.5,
            move_velocity: Vec3::ZERO,
            zoom_speed: 0.0,
        }
    }
}

impl CameraRig {
    /// Average position of the targets, at the rig's height. Falls back to
    /// the current position when no target is alive.
    fn desired_position(&self, targets: &[Vec3]) -> Vec3 {
        if targets.is_empty() {
            return self.position;
        }
        let mut average = Vec3::ZERO;
        for target in targets {
            average += *target;
        }
        average /= targets.len() as f32;
        average.y = self.position.y;
        average
    }

    /// Orthographic size that fits every target around `center`, with the
    /// edge buffer, never below the minimum.
    fn required_size(&self, center: Vec3, targets: &[Vec3]) -> f32 {
        let to_local = self.rotation.inverse();
        let mut size: f32 = 0.0;

        for target in targets {
            let local = to_local * (*target - center);
            size = size.max(local.y.abs());
            size = size.max(local.x.abs() / self.aspect);
        }

        (size + self.screen_edge_buffer).max(self.min_size)
    }

    /// Jump straight to the framed pose (round start, no smoothing).
    pub fn snap_to(&mut self, targets: &[Vec3]) {
        let desired = self.desired_position(targets);
        self.position = desired;
        self.ortho_size = self.required_size(desired, targets);
        self.move_velocity = Vec3::ZERO;
        self.zoom_speed = 0.0;
    }
}

/// System: smooth-follow the live tanks.
pub fn update_camera_rig(
    mut rig: ResMut<CameraRig>,
    tanks: Query<&Transform, (With<Tank>, Without<Dead>)>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.delta_secs();
    let targets: Vec<Vec3> = tanks.iter().map(|t| t.translation).collect();

    let desired = rig.desired_position(&targets);
    let (position, move_velocity) =
        smooth_damp_vec3(rig.position, desired, rig.move_velocity, rig.damp_time, dt);
    rig.position = position;
    rig.move_velocity = move_velocity;

    let required = rig.required_size(desired, &targets);
    let (ortho_size, zoom_speed) =
        smooth_damp(rig.ortho_size, required, rig.zoom_speed, rig.damp_time, dt);
    rig.ortho_size = ortho_size;
    rig.zoom_speed = zoom_speed;
}

/// Critically damped spring toward `target`.
/// Returns the new value and the new velocity.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: f32,
    smooth_time: f32,
    dt: f32,
) -> (f32, f32) {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;

    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (velocity + omega * change) * dt;
    let mut new_velocity = (velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Overshoot guard: clamp to the target once we pass it.
    if (target - current > 0.0) == (output > target) {
        output = target;
        new_velocity = 0.0;
    }

    (output, new_velocity)
}

/// Component-wise [`smooth_damp`] over a Vec3.
pub fn smooth_damp_vec3(
    current: Vec3,
    target: Vec3,
    velocity: Vec3,
    smooth_time: f32,
    dt: f32,
) -> (Vec3, Vec3) {
    let (x, vx) = smooth_damp(current.x, target.x, velocity.x, smooth_time, dt);
    let (y, vy) = smooth_damp(current.y, target.y, velocity.y, smooth_time, dt);
    let (z, vz) = smooth_damp(current.z, target.z, velocity.z, smooth_time, dt);
    (Vec3::new(x, y, z), Vec3::new(vx, vy, vz))
}
