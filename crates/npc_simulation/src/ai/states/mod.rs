//! FSM состояния агента
//!
//! Закрытый набор: Patrol, Chase, Attack, Investigate.
//! Каждое состояние - struct с локальными полями (сбрасываются в `enter`)
//! и реализацией `AgentState`. Экземпляры создаются один раз в `StateSet`
//! и переиспользуются при повторных входах.
//!
//! Переходы состояние только ЗАПРАШИВАЕТ (`ctx.request_transition`),
//! применяет их `AgentController` - после `tick` в том же кадре.

use bevy::prelude::*;

use super::config::AIConfig;
use super::mover::Mover;

pub mod attack;
pub mod chase;
pub mod investigate;
pub mod patrol;


pub use attack::AttackState;
pub use chase::ChaseState;
pub use investigate::{InvestigatePhase, InvestigateState};
pub use patrol::PatrolState;

/// Идентификатор состояния (тег варианта)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum StateId {
    Patrol,
    Chase,
    Attack,
    Investigate,
}

/// Контракт состояния FSM
///
/// - `enter` - ровно один раз на активацию, сбрасывает локальные поля
/// - `tick` - каждый кадр пока активно, вся логика решений
/// - `exit` - ровно один раз на деактивацию, всегда до `enter` следующего
///
/// Запрос перехода из `enter`/`exit` - ошибка (`FsmError::ReentrantTransition`).
pub trait AgentState {
    fn id(&self) -> StateId;

    fn enter(&mut self, _ctx: &mut StateContext<'_>) {}

    fn tick(&mut self, ctx: &mut StateContext<'_>);

    fn exit(&mut self, _ctx: &mut StateContext<'_>) {}
}

/// Валидированная цель на текущий кадр
///
/// Дистанция считается ОДИН раз за tick контроллером и читается всеми
/// состояниями - никаких расхождений между Chase и Attack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub entity: Entity,
    pub position: Vec3,
    pub distance: f32,
}

/// Память агента, общая для всех состояний
#[derive(Debug, Clone, PartialEq)]
pub struct AgentMemory {
    /// Текущая цель (weak: может протухнуть, перепроверяется каждый tick)
    pub current_target: Option<Entity>,
    /// Последняя валидная позиция цели (живёт дольше самой цели)
    pub last_known_target_position: Option<Vec3>,
    /// Куда идти в Investigate
    pub investigation_position: Option<Vec3>,
    /// Последний waypoint патруля - точка возврата на маршрут
    pub return_anchor: Option<Vec3>,
    pub initial_position: Vec3,
    pub initial_rotation: Quat,
}

impl AgentMemory {
    pub fn new(initial_position: Vec3, initial_rotation: Quat) -> Self {
        Self {
            current_target: None,
            last_known_target_position: None,
            investigation_position: None,
            return_anchor: None,
            initial_position,
            initial_rotation,
        }
    }

    /// Куда возвращаться на маршрут: последний waypoint или точка спавна
    pub fn return_point(&self) -> Vec3 {
        self.return_anchor.unwrap_or(self.initial_position)
    }
}

/// Действия агента наружу (исполняет ECS слой)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgentAction {
    Attack { target: Entity, position: Vec3 },
}

/// Всё, что видит состояние во время хука
pub struct StateContext<'a> {
    pub mover: &'a mut dyn Mover,
    pub memory: &'a mut AgentMemory,
    pub waypoints: &'a [Vec3],
    pub config: &'a AIConfig,
    pub target: Option<TargetView>,
    pub position: Vec3,
    pub delta: f32,
    actions: &'a mut Vec<AgentAction>,
    requested: Option<StateId>,
}

impl<'a> StateContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mover: &'a mut dyn Mover,
        memory: &'a mut AgentMemory,
        waypoints: &'a [Vec3],
        config: &'a AIConfig,
        target: Option<TargetView>,
        position: Vec3,
        delta: f32,
        actions: &'a mut Vec<AgentAction>,
    ) -> Self {
        Self {
            mover,
            memory,
            waypoints,
            config,
            target,
            position,
            delta,
            actions,
            requested: None,
        }
    }

    /// Запросить переход (применяется контроллером после хука)
    pub fn request_transition(&mut self, next: StateId) {
        self.requested = Some(next);
    }

    pub(crate) fn take_request(&mut self) -> Option<StateId> {
        self.requested.take()
    }

    pub fn emit(&mut self, action: AgentAction) {
        self.actions.push(action);
    }

    /// Цель пропала: запоминаем где видели последний раз и идём смотреть
    pub fn investigate_last_known(&mut self) {
        self.memory.investigation_position = self.memory.last_known_target_position;
        self.request_transition(StateId::Investigate);
    }
}

/// Экземпляры всех состояний агента (создаются один раз)
#[derive(Debug, Clone, Default)]
pub struct StateSet {
    pub patrol: PatrolState,
    pub chase: ChaseState,
    pub attack: AttackState,
    pub investigate: InvestigateState,
    #[cfg(test)]
    pub(crate) scripted: Option<super::test_support::ScriptedState>,
}

impl StateSet {
    pub fn get_mut(&mut self, id: StateId) -> &mut dyn AgentState {
        #[cfg(test)]
        if let Some(scripted) = self.scripted.as_mut().filter(|state| state.id == id) {
            return scripted;
        }

        match id {
            StateId::Patrol => &mut self.patrol,
            StateId::Chase => &mut self.chase,
            StateId::Attack => &mut self.attack,
            StateId::Investigate => &mut self.investigate,
        }
    }
}
