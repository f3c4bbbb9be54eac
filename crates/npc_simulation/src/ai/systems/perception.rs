//! Perception system - периодический опрос FOV + LOS.

use bevy::prelude::*;

use crate::ai::{
    perceive, AIConfig, AgentController, Observer, PerceptionResult, PerceptionSchedule,
    SpatialIndex,
};

/// System: опрос perception по расписанию каждого агента
///
/// Мёртвый агент теряет `PerceptionSchedule` - задача больше не перевзводится.
/// Результат пишется прямо в `current_target` контроллера (общее поле для всех
/// состояний; гонок нет - системы FSM идут строго последовательно).
pub fn poll_perception(
    mut commands: Commands,
    time: Res<Time<Fixed>>,
    index: Res<SpatialIndex>,
    mut agents: Query<(
        Entity,
        &Transform,
        &AIConfig,
        &mut AgentController,
        &mut PerceptionSchedule,
    )>,
) {
    let delta = time.delta();

    for (entity, transform, config, mut controller, mut schedule) in agents.iter_mut() {
        if controller.is_dead() {
            commands.entity(entity).remove::<PerceptionSchedule>();
            continue;
        }

        if !schedule.advance(delta) {
            continue;
        }

        let observer = Observer::from_transform(entity, transform);
        match perceive(&observer, config, &*index) {
            PerceptionResult::Acquired { target, position } => {
                if controller.set_target(target, position) {
                    crate::log(&format!(
                        "👁️ Perception: {:?} spotted {:?} at {:?}",
                        entity, target, position
                    ));
                }
            }
            PerceptionResult::Cleared(reason) => {
                if controller.clear_target() {
                    crate::log(&format!(
                        "👻 Perception: {:?} lost target ({:?})",
                        entity, reason
                    ));
                }
            }
        }
    }
}
