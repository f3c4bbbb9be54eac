//! Headless симуляция NPC
//!
//! Патруль из трёх агентов, блуждающая цель и пара укрытий. Печатает
//! переходы FSM и итоговое состояние агентов.

use bevy::prelude::*;
use rand::Rng;

use npc_simulation::{
    create_headless_app, AIConfig, AISystems, AgentBundle, AgentController, AttackIntent, Detectable,
    DeterministicRng, Health, SpatialBody, StateChanged,
};

const SEED: u64 = 42;
const TICK_COUNT: usize = 1000;

/// Цель демо: бродит между случайными точками
#[derive(Component)]
struct Wanderer {
    goal: Vec3,
    speed: f32,
}

fn wander(
    time: Res<Time<Fixed>>,
    mut rng: ResMut<DeterministicRng>,
    mut wanderers: Query<(&mut Transform, &mut Wanderer)>,
) {
    let delta = time.delta_secs();

    for (mut transform, mut wanderer) in wanderers.iter_mut() {
        let to_goal = wanderer.goal - transform.translation;
        if to_goal.length() < 0.5 {
            wanderer.goal = Vec3::new(rng.rng.gen_range(-30.0..30.0), 0.0, rng.rng.gen_range(-30.0..30.0));
            continue;
        }
        transform.translation += to_goal.normalize() * (wanderer.speed * delta).min(to_goal.length());
    }
}

/// Combat слой демо: каждое попадание снимает 10 HP
fn apply_attacks(mut attacks: EventReader<AttackIntent>, mut targets: Query<&mut Health>) {
    for attack in attacks.read() {
        if let Ok(mut health) = targets.get_mut(attack.target) {
            health.take_damage(10);
        }
    }
}

fn print_transitions(mut events: EventReader<StateChanged>) {
    for event in events.read() {
        println!("  {:?}: {:?} → {:?}", event.agent, event.from, event.to);
    }
}

fn main() {
    println!("Starting NPC headless simulation (seed: {})", SEED);

    let mut app = create_headless_app(SEED);
    app.add_systems(FixedUpdate, (wander, apply_attacks).chain().before(AISystems))
        .add_systems(FixedUpdate, print_transitions.after(AISystems));

    let config = AIConfig::default();
    let squad = [
        (Vec3::new(-10.0, 0.0, -10.0), vec![Vec3::new(-10.0, 0.0, -10.0), Vec3::new(10.0, 0.0, -10.0)]),
        (Vec3::new(10.0, 0.0, 10.0), vec![Vec3::new(10.0, 0.0, 10.0), Vec3::new(-10.0, 0.0, 10.0)]),
        (
            Vec3::new(0.0, 0.0, 0.0),
            vec![Vec3::ZERO, Vec3::new(0.0, 0.0, 15.0), Vec3::new(15.0, 0.0, 15.0)],
        ),
    ];

    for (spawn, waypoints) in squad {
        match AgentBundle::new(config.clone(), waypoints, Transform::from_translation(spawn)) {
            Ok(bundle) => {
                app.world_mut().spawn(bundle);
            }
            Err(error) => {
                eprintln!("Agent rejected: {}", error);
                return;
            }
        }
    }

    app.world_mut().spawn((
        Transform::from_xyz(25.0, 0.0, 0.0),
        Wanderer {
            goal: Vec3::new(-25.0, 0.0, 5.0),
            speed: 2.5,
        },
        Detectable,
        Health::new(200),
        SpatialBody::target(),
    ));

    for position in [Vec3::new(5.0, 1.0, 0.0), Vec3::new(-5.0, 1.0, 5.0)] {
        app.world_mut()
            .spawn((Transform::from_translation(position), SpatialBody::obstacle(1.5)));
    }

    for tick in 0..TICK_COUNT {
        app.update();

        if tick % 100 == 0 {
            let entity_count = app.world().entities().len();
            println!("Tick {}: {} entities", tick, entity_count);
        }
    }

    println!("Simulation complete!");
    let mut agents = app.world_mut().query::<(Entity, &Transform, &AgentController)>();
    for (entity, transform, controller) in agents.iter(app.world()) {
        println!(
            "  {:?} in {:?} at {:?} (target: {:?})",
            entity,
            controller.current_state(),
            transform.translation,
            controller.current_target()
        );
    }
}
