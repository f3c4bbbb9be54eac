//! FSM tick system.

use bevy::prelude::*;

use crate::ai::{
    AIConfig, AgentAction, AgentController, AgentEnv, AttackIntent, SoundBus, SoundEvent,
    StateChanged, TargetLocator,
};
use crate::components::{Detectable, Health, NavAgent};

/// Всё, что может быть целью perception
pub type TargetQuery<'w, 's> =
    Query<'w, 's, (&'static Transform, Option<&'static Health>), With<Detectable>>;

/// TargetLocator поверх ECS: цель валидна пока entity жива, Detectable и HP > 0
pub struct DetectableTargets<'a, 'w, 's> {
    query: &'a TargetQuery<'w, 's>,
}

impl<'a, 'w, 's> DetectableTargets<'a, 'w, 's> {
    pub fn new(query: &'a TargetQuery<'w, 's>) -> Self {
        Self { query }
    }
}

impl TargetLocator for DetectableTargets<'_, '_, '_> {
    fn locate(&self, target: Entity) -> Option<Vec3> {
        let (transform, health) = self.query.get(target).ok()?;
        if health.is_some_and(|health| !health.is_alive()) {
            return None;
        }
        Some(transform.translation)
    }
}

/// System: один tick FSM на каждого живого агента
///
/// Порядок внутри агента: перепроверка цели → tick активного состояния →
/// переход (если запрошен) в этом же кадре. Реентерабельный переход -
/// programmer error, ошибка уходит наверх и роняет систему.
pub fn tick_agents(
    time: Res<Time<Fixed>>,
    mut agents: Query<(
        Entity,
        &Transform,
        &AIConfig,
        &mut AgentController,
        &mut NavAgent,
    )>,
    targets: TargetQuery,
    mut bus: ResMut<SoundBus>,
    mut attack_events: EventWriter<AttackIntent>,
    mut state_events: EventWriter<StateChanged>,
) -> Result {
    let delta = time.delta_secs();
    let locator = DetectableTargets::new(&targets);

    for (entity, transform, config, mut controller, mut nav) in agents.iter_mut() {
        if controller.is_dead() {
            continue;
        }

        let mut env = AgentEnv {
            mover: &mut *nav,
            config,
            targets: &locator,
            position: transform.translation,
            delta,
        };
        controller.tick(&mut env)?;

        for transition in controller.take_transitions() {
            state_events.write(StateChanged {
                agent: entity,
                from: transition.from,
                to: transition.to,
            });
        }

        for action in controller.take_actions() {
            match action {
                AgentAction::Attack { target, position } => {
                    attack_events.write(AttackIntent {
                        attacker: entity,
                        target,
                        position,
                    });

                    // Выстрел слышат все в радиусе - включая других агентов
                    if config.gunfire_radius > 0.0 {
                        bus.emit(SoundEvent::from_source(entity, position, config.gunfire_radius));
                    }

                    crate::log(&format!("⚔️ AI: {:?} attacks {:?}", entity, target));
                }
            }
        }
    }

    Ok(())
}
