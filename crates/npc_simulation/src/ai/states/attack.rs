//! Attack - стоим на месте и атакуем с cooldown'ом.
//!
//! Сам урон/анимации - не здесь: состояние только выпускает `AgentAction::Attack`,
//! дальше его подхватывает combat слой (`AttackIntent`) и Sound Bus (выстрел).

use super::{AgentAction, AgentState, StateContext, StateId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackState {
    cooldown: f32,
}

impl AttackState {
    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }
}

impl AgentState for AttackState {
    fn id(&self) -> StateId {
        StateId::Attack
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        // Останавливаемся там, где стоим
        ctx.mover.set_destination(ctx.position);
        self.cooldown = 0.0;
    }

    fn tick(&mut self, ctx: &mut StateContext<'_>) {
        let Some(target) = ctx.target else {
            ctx.investigate_last_known();
            return;
        };

        if target.distance > ctx.config.attack_range {
            ctx.request_transition(StateId::Chase);
            return;
        }

        self.cooldown -= ctx.delta;
        if self.cooldown <= 0.0 {
            ctx.emit(AgentAction::Attack {
                target: target.entity,
                position: ctx.position,
            });
            self.cooldown = ctx.config.attack_cooldown;
        }
    }
}
