//! Chase - преследование цели с перестроением пути каждый кадр.

use super::{AgentState, StateContext, StateId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChaseState;

impl AgentState for ChaseState {
    fn id(&self) -> StateId {
        StateId::Chase
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.mover.set_enabled(true);
        ctx.mover.set_speed(ctx.config.pursuit_speed);
        if let Some(target) = ctx.target {
            ctx.mover.set_destination(target.position);
        }
    }

    fn tick(&mut self, ctx: &mut StateContext<'_>) {
        let Some(target) = ctx.target else {
            ctx.investigate_last_known();
            return;
        };

        if target.distance <= ctx.config.attack_range {
            ctx.request_transition(StateId::Attack);
            return;
        }

        // Цель двигается - ведём её каждый tick, а не строим путь один раз
        ctx.mover.set_destination(target.position);
    }

    // exit: движение остаётся включенным, следующее состояние само настроит скорость
}
