//! Death handling - HP == 0 → агент выключен навсегда.

use bevy::prelude::*;

use crate::ai::{AgentController, Mover, PerceptionSchedule};
use crate::components::{Health, NavAgent};

/// System: смерть агента → `is_dead`, остановка, снятие perception расписания
///
/// FSM не знает про смерть как состояние - это ортогональный флаг.
pub fn sync_agent_health(
    mut commands: Commands,
    mut agents: Query<(Entity, &Health, &mut AgentController, &mut NavAgent), Changed<Health>>,
) {
    for (entity, health, mut controller, mut nav) in agents.iter_mut() {
        if health.is_alive() || controller.is_dead() {
            continue;
        }

        controller.mark_dead();
        nav.set_enabled(false);
        commands.entity(entity).remove::<PerceptionSchedule>();

        crate::log_info(&format!("💀 Agent {:?} died → AI disabled", entity));
    }
}
