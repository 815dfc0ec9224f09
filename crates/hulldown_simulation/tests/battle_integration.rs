//! Battle integration tests: full headless app, scripted tanks.
//!
//! Covered here rather than in unit tests:
//! - the whole tick pipeline (locomotion -> shooting -> ballistics -> damage)
//! - charge/health invariants over long runs
//! - cooldown gating through the event-driven charge commands
//! - round reset

use bevy::prelude::*;
use hulldown_simulation::*;

fn create_battle_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);
    app
}

/// Spawn a computer-controlled tank at `position`, yawed so its muzzle points
/// along `yaw` (0 = world -Z).
fn spawn_tank(world: &mut World, player_number: u32, position: Vec3, yaw: f32) -> Entity {
    let transform = Transform::from_translation(position).with_rotation(Quat::from_rotation_y(yaw));
    world
        .spawn((
            transform,
            Tank {
                player_number,
                computer_controlled: true,
            },
            SpawnPoint::from_transform(&transform),
        ))
        .id()
}

/// Spawn a human-driven tank: fire control reads its `FireInput` snapshot
/// instead of charge command events.
fn spawn_human_tank(world: &mut World, player_number: u32, position: Vec3, yaw: f32) -> Entity {
    let transform = Transform::from_translation(position).with_rotation(Quat::from_rotation_y(yaw));
    world
        .spawn((
            transform,
            Tank {
                player_number,
                computer_controlled: false,
            },
            SpawnPoint::from_transform(&transform),
        ))
        .id()
}

/// Write the tick's fire-button snapshot, as the host does each frame.
fn set_fire_input(app: &mut App, tank: Entity, input: FireInput) {
    *app.world_mut().get_mut::<FireInput>(tank).unwrap() = input;
}

#[test]
fn test_scripted_volley_damages_target() {
    let mut app = create_battle_app(42);

    let attacker = spawn_tank(app.world_mut(), 1, Vec3::ZERO, 0.0);
    let defender = spawn_tank(
        app.world_mut(),
        2,
        Vec3::new(0.0, 0.0, -15.0),
        std::f32::consts::PI,
    );

    // Half-second charge puts the landing point near the defender.
    app.world_mut().send_event(ChargeCommand::Start { tank: attacker });
    run_fixed_ticks(&mut app, 25);
    app.world_mut().send_event(ChargeCommand::Stop { tank: attacker });
    run_fixed_ticks(&mut app, 200);

    let defender_health = app.world().get::<Health>(defender).unwrap();
    assert!(
        defender_health.current < defender_health.starting,
        "defender took no damage (health = {})",
        defender_health.current
    );
    assert!(defender_health.is_alive());

    // The attacker is well outside its own blast radius.
    let attacker_health = app.world().get::<Health>(attacker).unwrap();
    assert_eq!(attacker_health.current, attacker_health.starting);
}

#[test]
fn test_saturated_charge_auto_fires_at_max_speed() {
    let mut app = create_battle_app(42);
    let tank = spawn_tank(app.world_mut(), 1, Vec3::ZERO, 0.0);

    // Start charging and never release: 0.75s of charge time fits in 40
    // ticks, so the launcher must saturate and fire on its own.
    app.world_mut().send_event(ChargeCommand::Start { tank });
    run_fixed_ticks(&mut app, 45);

    let shots: Vec<ShellFired> = app
        .world_mut()
        .resource_mut::<Events<ShellFired>>()
        .drain()
        .collect();
    assert_eq!(shots.len(), 1, "expected exactly one auto-fired shell");

    let launcher = app.world().get::<ShellLauncher>(tank).unwrap();
    let speed = shots[0].velocity.length();
    assert!(
        (speed - launcher.max_launch_speed).abs() < 1e-3,
        "auto-fire should launch at max speed, got {}",
        speed
    );
    // Fired -> Idle is immediate; the slider value is back at minimum.
    assert!(!launcher.is_charging());
    assert_eq!(launcher.current_launch_speed, launcher.min_launch_speed);
}

#[test]
fn test_cooldown_gates_charge_commands() {
    let mut app = create_battle_app(42);
    let tank = spawn_tank(app.world_mut(), 1, Vec3::ZERO, 0.0);

    // Quick shot: one tick of charging, release.
    app.world_mut().send_event(ChargeCommand::Start { tank });
    run_fixed_ticks(&mut app, 2);
    app.world_mut().send_event(ChargeCommand::Stop { tank });
    run_fixed_ticks(&mut app, 1);
    assert!(!app.world().get::<ShellLauncher>(tank).unwrap().is_charging());

    // 0.5s after the shot (cooldown 1.0s): start must be rejected.
    run_fixed_ticks(&mut app, 25);
    app.world_mut().send_event(ChargeCommand::Start { tank });
    run_fixed_ticks(&mut app, 1);
    assert!(
        !app.world().get::<ShellLauncher>(tank).unwrap().is_charging(),
        "charging started while still cooling down"
    );

    // 1.1s after the shot: accepted.
    run_fixed_ticks(&mut app, 30);
    app.world_mut().send_event(ChargeCommand::Start { tank });
    run_fixed_ticks(&mut app, 1);
    assert!(app.world().get::<ShellLauncher>(tank).unwrap().is_charging());
}

#[test]
fn test_human_press_hold_release_fires() {
    let mut app = create_battle_app(42);
    let tank = spawn_human_tank(app.world_mut(), 1, Vec3::ZERO, 0.0);

    // Press tick: charging starts, no charge gained yet.
    set_fire_input(&mut app, tank, FireInput::press());
    run_fixed_ticks(&mut app, 1);
    {
        let launcher = app.world().get::<ShellLauncher>(tank).unwrap();
        assert!(launcher.is_charging());
        assert_eq!(launcher.current_launch_speed, launcher.min_launch_speed);
    }

    // Ten held ticks (0.2s): speed climbs at (max - min) / max_charge_time.
    set_fire_input(&mut app, tank, FireInput::hold());
    run_fixed_ticks(&mut app, 10);
    {
        let launcher = app.world().get::<ShellLauncher>(tank).unwrap();
        assert!((launcher.current_launch_speed - 9.0).abs() < 1e-4);
    }

    // Release tick: exactly one shell, at the accumulated speed.
    set_fire_input(&mut app, tank, FireInput::RELEASED);
    run_fixed_ticks(&mut app, 1);

    let shots: Vec<ShellFired> = app
        .world_mut()
        .resource_mut::<Events<ShellFired>>()
        .drain()
        .collect();
    assert_eq!(shots.len(), 1, "expected exactly one shell from the release");
    assert!((shots[0].velocity.length() - 9.0).abs() < 1e-3);

    let launcher = app.world().get::<ShellLauncher>(tank).unwrap();
    assert!(!launcher.is_charging());
    assert!(launcher.cooldown_remaining > 0.0, "shot must arm the cooldown");

    // 0.5s into the 1.0s cooldown a new press is rejected.
    set_fire_input(&mut app, tank, FireInput::default());
    run_fixed_ticks(&mut app, 25);
    set_fire_input(&mut app, tank, FireInput::press());
    run_fixed_ticks(&mut app, 1);
    assert!(!app.world().get::<ShellLauncher>(tank).unwrap().is_charging());

    // Past the cooldown the press takes.
    set_fire_input(&mut app, tank, FireInput::default());
    run_fixed_ticks(&mut app, 30);
    set_fire_input(&mut app, tank, FireInput::press());
    run_fixed_ticks(&mut app, 1);
    assert!(app.world().get::<ShellLauncher>(tank).unwrap().is_charging());
}

#[test]
fn test_human_lost_hold_ends_charge() {
    let mut app = create_battle_app(42);
    let tank = spawn_human_tank(app.world_mut(), 1, Vec3::ZERO, 0.0);

    set_fire_input(&mut app, tank, FireInput::press());
    run_fixed_ticks(&mut app, 1);
    set_fire_input(&mut app, tank, FireInput::hold());
    run_fixed_ticks(&mut app, 5);

    // The hold disappears with no release edge (dropped input): the charge
    // must still end in a shot, not hang forever.
    set_fire_input(&mut app, tank, FireInput::default());
    run_fixed_ticks(&mut app, 1);

    let shots: Vec<ShellFired> = app
        .world_mut()
        .resource_mut::<Events<ShellFired>>()
        .drain()
        .collect();
    assert_eq!(shots.len(), 1);
    assert!((shots[0].velocity.length() - 7.0).abs() < 1e-3);
    assert!(!app.world().get::<ShellLauncher>(tank).unwrap().is_charging());
}

#[test]
fn test_invariants_over_1000_ticks() {
    let mut app = create_battle_app(123);

    let tank1 = spawn_tank(app.world_mut(), 1, Vec3::ZERO, 0.0);
    let tank2 = spawn_tank(
        app.world_mut(),
        2,
        Vec3::new(3.0, 0.0, -12.0),
        std::f32::consts::PI,
    );

    for tick in 0..1000 {
        // Keep both tanks cycling charge/release forever; the cooldown gate
        // silently drops the starts that come too early.
        if tick % 40 == 0 {
            app.world_mut().send_event(ChargeCommand::Start { tank: tank1 });
            app.world_mut().send_event(ChargeCommand::Start { tank: tank2 });
        }
        if tick % 40 == 25 {
            app.world_mut().send_event(ChargeCommand::Stop { tank: tank1 });
            app.world_mut().send_event(ChargeCommand::Stop { tank: tank2 });
        }

        run_fixed_ticks(&mut app, 1);

        if tick % 100 == 0 {
            check_invariants(&mut app, &[tank1, tank2]);
        }
    }

    check_invariants(&mut app, &[tank1, tank2]);
}

fn check_invariants(app: &mut App, tanks: &[Entity]) {
    for &tank in tanks {
        let launcher = app.world().get::<ShellLauncher>(tank).unwrap();
        assert!(
            launcher.current_launch_speed >= launcher.min_launch_speed
                && launcher.current_launch_speed <= launcher.max_launch_speed,
            "launch speed {} out of [{}, {}]",
            launcher.current_launch_speed,
            launcher.min_launch_speed,
            launcher.max_launch_speed
        );
        assert!(launcher.cooldown_remaining >= 0.0);
        let ratio = launcher.charge_ratio();
        assert!((0.0..=1.0).contains(&ratio), "charge ratio {} out of range", ratio);

        let health = app.world().get::<Health>(tank).unwrap();
        assert!(health.current <= health.starting);
        let fraction = health.display_fraction();
        assert!((0.0..=1.0).contains(&fraction));
    }
}

#[test]
fn test_death_is_raised_exactly_once() {
    let mut app = create_battle_app(7);
    let tank = spawn_tank(app.world_mut(), 1, Vec3::ZERO, 0.0);

    // Overkill damage straight through the public mutator.
    app.world_mut()
        .get_mut::<Health>(tank)
        .unwrap()
        .take_damage(500.0);
    run_fixed_ticks(&mut app, 10);

    assert!(app.world().get::<Dead>(tank).is_some());

    let deaths: Vec<TankDestroyed> = app
        .world_mut()
        .resource_mut::<Events<TankDestroyed>>()
        .drain()
        .collect();
    assert_eq!(deaths.len(), 1, "death must be reported exactly once");
    assert_eq!(deaths[0].tank, tank);
}

#[test]
fn test_dead_tank_ignores_controls() {
    let mut app = create_battle_app(7);
    let tank = spawn_tank(app.world_mut(), 1, Vec3::ZERO, 0.0);

    app.world_mut()
        .get_mut::<Health>(tank)
        .unwrap()
        .take_damage(500.0);
    run_fixed_ticks(&mut app, 1);

    // Full throttle on a wreck: the pose must not move.
    *app.world_mut().get_mut::<ControlState>(tank).unwrap() = ControlState::new(1.0, 0.0);
    let before = app.world().get::<Transform>(tank).unwrap().translation;
    run_fixed_ticks(&mut app, 50);
    let after = app.world().get::<Transform>(tank).unwrap().translation;

    assert_eq!(before, after);

    // And the launcher stays cold.
    app.world_mut().send_event(ChargeCommand::Start { tank });
    run_fixed_ticks(&mut app, 1);
    assert!(!app.world().get::<ShellLauncher>(tank).unwrap().is_charging());
}

#[test]
fn test_dead_tank_is_outside_blast_resolution() {
    let mut app = create_battle_app(7);
    let wreck = spawn_tank(app.world_mut(), 1, Vec3::ZERO, 0.0);

    app.world_mut()
        .get_mut::<Health>(wreck)
        .unwrap()
        .take_damage(500.0);
    run_fixed_ticks(&mut app, 1);
    assert!(app.world().get::<Dead>(wreck).is_some());
    let health_after_death = app.world().get::<Health>(wreck).unwrap().current;

    // Detonate right on top of the wreck. It has left the damage layer, so
    // no impulse and no further damage.
    app.world_mut()
        .resource_mut::<Events<ExplosionImpulse>>()
        .clear();
    app.world_mut().send_event(ShellImpact {
        center: Vec3::ZERO,
        spec: ExplosionSpec::default(),
    });
    run_fixed_ticks(&mut app, 1);

    let impulses: Vec<ExplosionImpulse> = app
        .world_mut()
        .resource_mut::<Events<ExplosionImpulse>>()
        .drain()
        .collect();
    assert!(
        impulses.iter().all(|impulse| impulse.body != wreck),
        "wreck received an explosion impulse"
    );
    assert_eq!(
        app.world().get::<Health>(wreck).unwrap().current,
        health_after_death
    );
}

#[test]
fn test_round_reset_restores_spawn_state() {
    let mut app = create_battle_app(42);
    let tank = spawn_tank(app.world_mut(), 1, Vec3::new(4.0, 0.0, -2.0), 0.5);

    // Wreck the tank and drag it somewhere else.
    app.world_mut()
        .get_mut::<Health>(tank)
        .unwrap()
        .take_damage(500.0);
    app.world_mut().get_mut::<Transform>(tank).unwrap().translation = Vec3::new(20.0, 0.0, 20.0);
    run_fixed_ticks(&mut app, 5);
    assert!(app.world().get::<Dead>(tank).is_some());

    app.world_mut().send_event(ResetRound);
    run_fixed_ticks(&mut app, 1);

    let transform = app.world().get::<Transform>(tank).unwrap();
    assert_eq!(transform.translation, Vec3::new(4.0, 0.0, -2.0));

    let health = app.world().get::<Health>(tank).unwrap();
    assert_eq!(health.current, health.starting);

    assert!(app.world().get::<Dead>(tank).is_none());

    let launcher = app.world().get::<ShellLauncher>(tank).unwrap();
    assert!(!launcher.is_charging());
    assert_eq!(launcher.cooldown_remaining, 0.0);
}

#[test]
fn test_round_reset_restores_engine_idle() {
    let mut app = create_battle_app(42);
    let tank = spawn_tank(app.world_mut(), 1, Vec3::ZERO, 0.0);

    // Drive until the engine loop switches over.
    *app.world_mut().get_mut::<ControlState>(tank).unwrap() = ControlState::new(1.0, 0.0);
    run_fixed_ticks(&mut app, 5);
    assert_eq!(
        app.world().get::<EngineAudioState>(tank).unwrap().clip,
        EngineClip::Driving
    );

    app.world_mut().send_event(ResetRound);
    run_fixed_ticks(&mut app, 1);
    assert_eq!(
        app.world().get::<EngineAudioState>(tank).unwrap().clip,
        EngineClip::Idling
    );

    // With inputs and clip both back at spawn state, the first post-reset
    // tick must not emit a clip transition.
    app.world_mut()
        .resource_mut::<Events<EffectRequest>>()
        .clear();
    run_fixed_ticks(&mut app, 1);
    let cues: Vec<EffectRequest> = app
        .world_mut()
        .resource_mut::<Events<EffectRequest>>()
        .drain()
        .collect();
    assert!(
        cues.iter().all(|cue| !matches!(
            cue,
            EffectRequest::EngineIdling { .. } | EffectRequest::EngineDriving { .. }
        )),
        "round reset leaked an engine clip transition"
    );
}

#[test]
fn test_direct_control_turns_toward_camera_relative_direction() {
    let mut app = create_battle_app(42);
    let tank = spawn_tank(app.world_mut(), 1, Vec3::ZERO, 0.0);
    app.world_mut().get_mut::<Locomotion>(tank).unwrap().mode = ControlMode::Direct;

    // Push "right" relative to the default camera basis (+X).
    *app.world_mut().get_mut::<ControlState>(tank).unwrap() = ControlState::new(0.0, 1.0);
    run_fixed_ticks(&mut app, 100);

    // The hull must have steered to face +X (within clamp tolerance).
    let forward = app
        .world()
        .get::<Transform>(tank)
        .unwrap()
        .forward()
        .as_vec3();
    assert!(
        forward.dot(Vec3::X) > 0.99,
        "hull did not converge on the requested direction, forward = {:?}",
        forward
    );
}
