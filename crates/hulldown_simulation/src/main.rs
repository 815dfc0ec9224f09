//! Headless battle demo.
//!
//! Runs two tanks facing each other, one scripted volley, and prints the
//! outcome. Useful for eyeballing the simulation without any engine attached.

use bevy::prelude::*;
use hulldown_simulation::*;

fn main() {
    let seed = 42;
    println!("Starting headless battle (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin);

    // Two tanks 15 units apart, muzzles pointed at each other.
    let attacker = spawn_tank(app.world_mut(), 1, Vec3::new(0.0, 0.0, 0.0), 0.0);
    let defender = spawn_tank(
        app.world_mut(),
        2,
        Vec3::new(0.0, 0.0, -15.0),
        std::f32::consts::PI,
    );

    // Charge for half a second, then release.
    app.world_mut().send_event(ChargeCommand::Start { tank: attacker });
    run_fixed_ticks(&mut app, 25);
    app.world_mut().send_event(ChargeCommand::Stop { tank: attacker });

    // Let the shell fly and the dust settle.
    run_fixed_ticks(&mut app, 200);

    let shots: Vec<ShellFired> = app
        .world_mut()
        .resource_mut::<Events<ShellFired>>()
        .drain()
        .collect();
    for shot in &shots {
        let landing = predict_landing(shot.origin, shot.velocity);
        println!(
            "shell from {:?}: predicted landing = ({:.1}, {:.1})",
            shot.shooter, landing.x, landing.z
        );
    }

    for (label, entity) in [("attacker", attacker), ("defender", defender)] {
        let health = app.world().get::<Health>(entity).map(|h| h.current);
        println!("{}: health = {:?}", label, health);
    }

    let rig = app.world().resource::<CameraRig>();
    println!(
        "camera: position = {:?}, ortho size = {:.1}",
        rig.position, rig.ortho_size
    );
}

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
