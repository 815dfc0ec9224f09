//! Hulldown Simulation Core
//!
//! Headless ECS simulation for a top-down tank battle: locomotion, charge-based
//! shell firing, ballistics, explosion damage and camera framing.
//!
//! HYBRID ARCHITECTURE:
//! - ECS = game state and rules (this crate, engine-agnostic, runs headless)
//! - Host engine = tactical layer (rigid bodies, rendering, audio playback,
//!   UI widgets, input devices), reached only through events and resources:
//!   inbound `ControlState`/`FireInput`/`ShellImpact`/`ResetRound`, outbound
//!   `ShellFired`/`ExplosionImpulse`/`EffectRequest`/`HealthChanged`.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

pub mod ballistics;
pub mod camera;
pub mod combat;
pub mod components;
pub mod effects;
pub mod game;
pub mod logger;
pub mod movement;
pub mod shooting;

pub use ballistics::{launch_speed, predict_landing, Shell, GRAVITY_Y};
pub use camera::{CameraBasis, CameraRig};
pub use combat::{
    explosion_damage, ExplosionImpulse, ExplosionSpec, HealthChanged, ShellImpact, TankDestroyed,
};
pub use components::*;
pub use effects::EffectRequest;
pub use game::ResetRound;
pub use logger::init_logger;
pub use movement::{ControlMode, EngineAudioState, EngineClip, Locomotion};
pub use shooting::{ChargeCommand, ChargeLevelChanged, ChargePhase, ShellFired, ShellLauncher};

/// Fixed simulation rate (one classic 0.02s physics step).
pub const TICK_HZ: f64 = 50.0;

/// Main simulation plugin: all systems in `FixedUpdate`, explicitly chained so
/// one tick always runs locomotion before shooting before damage resolution.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
            .init_resource::<CameraBasis>()
            .init_resource::<CameraRig>();

        // Keep a seed installed by the host/test; default otherwise.
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_event::<EffectRequest>()
            .add_event::<ChargeCommand>()
            .add_event::<ShellFired>()
            .add_event::<ChargeLevelChanged>()
            .add_event::<ShellImpact>()
            .add_event::<ExplosionImpulse>()
            .add_event::<HealthChanged>()
            .add_event::<TankDestroyed>()
            .add_event::<ResetRound>();

        app.add_systems(
            FixedUpdate,
            (
                // Phase 1: locomotion (pose updates before anything aims)
                movement::update_requested_direction,
                movement::integrate_locomotion,
                movement::engine_audio_cues,
                // Phase 2: shooting
                shooting::tick_shot_cooldowns,
                shooting::fire_control,
                // Phase 3: shells in flight (headless fallback for the
                // engine-owned projectile body)
                ballistics::spawn_shells,
                ballistics::integrate_shells,
                // Phase 4: damage and death
                combat::resolve_shell_impacts,
                combat::handle_deaths,
                // Phase 5: round flow and presentation targets
                game::apply_round_resets,
                camera::update_camera_rig,
            )
                .chain(),
        );
    }
}

/// Seeded RNG resource. Everything stochastic (engine-audio pitch) draws from
/// here, so a seed fully determines a run.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Minimal Bevy App for headless simulation (tests, demo binary).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(TICK_HZ));
    app
}

/// Advance the fixed schedule by exactly `ticks` steps.
///
/// Bypasses the real-time accumulator so tests and the demo binary step the
/// simulation deterministically regardless of wall-clock speed.
pub fn run_fixed_ticks(app: &mut App, ticks: usize) {
    let timestep = app.world().resource::<Time<Fixed>>().timestep();
    for _ in 0..ticks {
        app.world_mut()
            .resource_mut::<Time<Fixed>>()
            .advance_by(timestep);
        app.world_mut().run_schedule(FixedUpdate);
    }
}

/// World snapshot for determinism comparisons.
///
/// Collects one component type over all entities, sorted by entity index, and
/// serializes via `Debug`. Crude but enough to compare two runs bit-for-bit.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();
    entities.sort_by_key(|(entity, _)| entity.index());

    let mut snapshot = Vec::new();
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }
    snapshot
}
