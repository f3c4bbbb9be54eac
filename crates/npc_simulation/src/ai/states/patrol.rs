//! Patrol - обход waypoint'ов туда-обратно с паузой на каждом.

use super::{AgentState, StateContext, StateId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatrolState {
    waypoint_index: usize,
    /// Идём по маршруту в обратную сторону
    reverse: bool,
    wait_timer: f32,
}

impl PatrolState {
    pub fn waypoint_index(&self) -> usize {
        self.waypoint_index
    }

    pub fn wait_timer(&self) -> f32 {
        self.wait_timer
    }

    /// Ping-pong: A, B, C, B, A, B, ... (никогда C → A)
    ///
    /// Команда на текущий индекс уходит ДО сдвига индекса.
    /// Пустой маршрут - no-op, агент стоит на месте.
    fn go_to_next_waypoint(&mut self, ctx: &mut StateContext<'_>) {
        let count = ctx.waypoints.len();
        if count == 0 {
            return;
        }

        let waypoint = ctx.waypoints[self.waypoint_index];
        ctx.mover.set_destination(waypoint);
        ctx.memory.return_anchor = Some(waypoint);

        if count == 1 {
            return;
        }

        if self.waypoint_index == count - 1 {
            self.reverse = true;
        } else if self.waypoint_index == 0 {
            self.reverse = false;
        }

        if self.reverse {
            self.waypoint_index -= 1;
        } else {
            self.waypoint_index += 1;
        }
    }
}

impl AgentState for PatrolState {
    fn id(&self) -> StateId {
        StateId::Patrol
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        ctx.mover.set_enabled(true);
        ctx.mover.set_speed(ctx.config.patrol_speed);
        self.waypoint_index = 0;
        self.reverse = false;
        self.wait_timer = 0.0;
    }

    fn tick(&mut self, ctx: &mut StateContext<'_>) {
        // Цель важнее всего остального
        if ctx.target.is_some() {
            ctx.request_transition(StateId::Chase);
            return;
        }

        if !ctx.mover.is_arrived_and_idle() {
            return;
        }

        self.wait_timer += ctx.delta;
        if self.wait_timer >= ctx.config.patrol_dwell_time {
            self.go_to_next_waypoint(ctx);
            self.wait_timer = 0.0;
        }
    }
}
