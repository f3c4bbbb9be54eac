//! Тесты детерминизма AI
//!
//! Одинаковый seed → идентичные траектории, состояния FSM и события,
//! включая разброс слуха (sound jitter берёт DeterministicRng).

use bevy::prelude::*;
use npc_simulation::{
    create_headless_app, world_snapshot, AIConfig, AISystems, AgentBundle, AgentController, Detectable, Health,
    SoundBus, SoundEvent, SpatialBody,
};

/// Цель ходит по кругу, чтобы агенты то видели её, то теряли
#[derive(Component, Debug)]
struct Orbit {
    radius: f32,
    angle: f32,
    speed: f32,
}

fn orbit_targets(time: Res<Time<Fixed>>, mut query: Query<(&mut Transform, &mut Orbit)>) {
    for (mut transform, mut orbit) in query.iter_mut() {
        orbit.angle += orbit.speed * time.delta_secs();
        transform.translation = Vec3::new(
            orbit.radius * orbit.angle.cos(),
            0.0,
            orbit.radius * orbit.angle.sin(),
        );
    }
}

/// Раз в 90 tick'ов где-то в центре шумит
fn periodic_noise(mut counter: Local<u32>, mut bus: ResMut<SoundBus>) {
    *counter += 1;
    if *counter % 90 == 0 {
        bus.emit(SoundEvent::new(Vec3::new(0.0, 0.0, 0.0), 60.0));
    }
}

fn run_simulation(seed: u64, tick_count: usize) -> (Vec<u8>, Vec<u8>) {
    let mut app = create_headless_app(seed);
    // До AI, иначе порядок с AI системами не определён
    app.add_systems(FixedUpdate, (orbit_targets, periodic_noise).chain().before(AISystems));

    let config = AIConfig {
        fov_half_angle_degrees: 60.0,
        sound_jitter: 3.0,
        alert_call_radius: Some(15.0),
        ..Default::default()
    };

    for i in 0..6 {
        let angle = i as f32 * std::f32::consts::TAU / 6.0;
        let spawn = Vec3::new(25.0 * angle.cos(), 0.0, 25.0 * angle.sin());
        let waypoints = vec![spawn, spawn * 0.5, Vec3::new(spawn.z, 0.0, -spawn.x) * 0.6];
        let bundle = AgentBundle::new(config.clone(), waypoints, Transform::from_translation(spawn))
            .expect("valid agent");
        app.world_mut().spawn(bundle);
    }

    app.world_mut().spawn((
        Transform::default(),
        Orbit {
            radius: 35.0,
            angle: 0.0,
            speed: 0.3,
        },
        Detectable,
        Health::new(1000),
        SpatialBody::target(),
    ));
    app.world_mut()
        .spawn((Transform::from_xyz(10.0, 1.5, 0.0), SpatialBody::obstacle(3.0)));

    for _ in 0..tick_count {
        app.update();
    }

    (
        world_snapshot::<Transform>(app.world_mut()),
        world_snapshot::<AgentController>(app.world_mut()),
    )
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: usize = 900;

    let first = run_simulation(SEED, TICK_COUNT);
    let second = run_simulation(SEED, TICK_COUNT);

    assert_eq!(
        first.0, second.0,
        "Симуляция с одинаковым seed ({}) дала разные позиции!",
        SEED
    );
    assert_eq!(
        first.1, second.1,
        "Симуляция с одинаковым seed ({}) дала разные состояния FSM!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: usize = 600;

    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(SEED, TICK_COUNT)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(
            snapshots[0], *snapshot,
            "Прогон {} дал результат отличный от прогона 0",
            i
        );
    }
}
