//! Investigate - сходить к точке (звук / последняя позиция цели),
//! осмотреться и вернуться на маршрут патруля.

use super::{AgentState, StateContext, StateId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InvestigatePhase {
    /// Идём к investigation_position
    #[default]
    Travelling,
    /// Дошли, стоим и осматриваемся
    Searching,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvestigateState {
    phase: InvestigatePhase,
    search_timer: f32,
}

impl InvestigateState {
    pub fn phase(&self) -> InvestigatePhase {
        self.phase
    }

    pub fn search_timer(&self) -> f32 {
        self.search_timer
    }
}

impl AgentState for InvestigateState {
    fn id(&self) -> StateId {
        StateId::Investigate
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.mover.set_enabled(true);
        ctx.mover.set_speed(ctx.config.patrol_speed);
        self.search_timer = 0.0;

        let point = ctx
            .memory
            .investigation_position
            .or(ctx.memory.last_known_target_position);

        match point {
            Some(point) => {
                ctx.mover.set_destination(point);
                self.phase = InvestigatePhase::Travelling;
            }
            // Некуда идти - осматриваемся на месте
            None => self.phase = InvestigatePhase::Searching,
        }
    }

    fn tick(&mut self, ctx: &mut StateContext<'_>) {
        if ctx.target.is_some() {
            ctx.request_transition(StateId::Chase);
            return;
        }

        match self.phase {
            InvestigatePhase::Travelling => {
                if ctx.mover.is_arrived_and_idle() {
                    self.phase = InvestigatePhase::Searching;
                }
            }
            InvestigatePhase::Searching => {
                self.search_timer += ctx.delta;
                if self.search_timer >= ctx.config.investigate_dwell_time {
                    let home = ctx.memory.return_point();
                    ctx.mover.set_destination(home);
                    ctx.request_transition(StateId::Patrol);
                }
            }
        }
    }
}
