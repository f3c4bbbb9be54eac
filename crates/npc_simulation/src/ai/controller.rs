//! AgentController - владелец FSM агента.
//!
//! Держит активное состояние, экземпляры всех состояний, память (цель,
//! якоря, таймеры) и маршрут патруля. Все переходы идут только через
//! `change_state`: exit старого → смена → enter нового, без tick между ними.

use std::collections::HashMap;

use bevy::prelude::*;

use super::config::AIConfig;
use super::error::{AgentSetupError, FsmError};
use super::mover::Mover;
use super::sound::SoundKind;
use super::states::{
    AgentAction, AgentMemory, AgentState, StateContext, StateId, StateSet, TargetView,
};

/// Target capability: где сейчас цель (None = цель невалидна/despawned)
pub trait TargetLocator {
    fn locate(&self, target: Entity) -> Option<Vec3>;
}

impl TargetLocator for HashMap<Entity, Vec3> {
    fn locate(&self, target: Entity) -> Option<Vec3> {
        self.get(&target).copied()
    }
}

/// Окружение агента на один вызов (кадр или звук)
pub struct AgentEnv<'a> {
    pub mover: &'a mut dyn Mover,
    pub config: &'a AIConfig,
    pub targets: &'a dyn TargetLocator,
    pub position: Vec3,
    pub delta: f32,
}

/// Запись о переходе (для событий и логов)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateTransition {
    pub from: StateId,
    pub to: StateId,
}

/// Реакция агента на звук
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundResponse {
    /// Мёртв или занят целью (Chase/Attack)
    Ignored,
    /// Ушёл в Investigate; `was_patrolling` - спокойный агент встревожен впервые
    Investigating { was_patrolling: bool },
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hook {
    Enter,
    Tick,
    Exit,
}

#[derive(Component, Debug, Clone)]
pub struct AgentController {
    current: StateId,
    states: StateSet,
    memory: AgentMemory,
    /// Фиксируется при спавне, в runtime не меняется
    waypoints: Vec<Vec3>,
    is_dead: bool,
    /// Начальное состояние уже получило свой enter
    started: bool,
    actions: Vec<AgentAction>,
    transitions: Vec<StateTransition>,
    #[cfg(test)]
    pub(crate) journal: Vec<(StateId, Hook)>,
}

impl AgentController {
    pub const INITIAL_STATE: StateId = StateId::Patrol;

    pub fn new(waypoints: Vec<Vec3>, initial: &Transform) -> Result<Self, AgentSetupError> {
        if !initial.translation.is_finite() {
            return Err(AgentSetupError::InvalidSpawn(initial.translation.to_array()));
        }
        if let Some((index, waypoint)) = waypoints
            .iter()
            .enumerate()
            .find(|(_, waypoint)| !waypoint.is_finite())
        {
            return Err(AgentSetupError::InvalidWaypoint {
                index,
                position: waypoint.to_array(),
            });
        }

        Ok(Self {
            current: Self::INITIAL_STATE,
            states: StateSet::default(),
            memory: AgentMemory::new(initial.translation, initial.rotation),
            waypoints,
            is_dead: false,
            started: false,
            actions: Vec::new(),
            transitions: Vec::new(),
            #[cfg(test)]
            journal: Vec::new(),
        })
    }

    pub fn current_state(&self) -> StateId {
        self.current
    }

    pub fn states(&self) -> &StateSet {
        &self.states
    }

    pub fn memory(&self) -> &AgentMemory {
        &self.memory
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn current_target(&self) -> Option<Entity> {
        self.memory.current_target
    }

    pub fn last_known_target_position(&self) -> Option<Vec3> {
        self.memory.last_known_target_position
    }

    pub fn investigation_position(&self) -> Option<Vec3> {
        self.memory.investigation_position
    }

    pub fn return_anchor(&self) -> Option<Vec3> {
        self.memory.return_anchor
    }

    pub fn is_dead(&self) -> bool {
        self.is_dead
    }

    /// Terminal: после этого ни tick, ни perception, ни звуки
    pub fn mark_dead(&mut self) {
        if !self.is_dead {
            self.is_dead = true;
            crate::log(&format!("💀 AI: agent died in {:?} → FSM halted", self.current));
        }
    }

    #[cfg(test)]
    pub(crate) fn script_state(&mut self, state: super::test_support::ScriptedState) {
        self.states.scripted = Some(state);
    }

    /// Perception: цель найдена (возвращает true если цель сменилась)
    pub fn set_target(&mut self, target: Entity, position: Vec3) -> bool {
        let changed = self.memory.current_target != Some(target);
        self.memory.current_target = Some(target);
        self.memory.last_known_target_position = Some(position);
        changed
    }

    /// Perception: цели нет (возвращает true если цель была)
    pub fn clear_target(&mut self) -> bool {
        self.memory.current_target.take().is_some()
    }

    /// Забрать накопленные действия (атаки) для ECS слоя
    pub fn take_actions(&mut self) -> Vec<AgentAction> {
        std::mem::take(&mut self.actions)
    }

    /// Забрать накопленные переходы для `StateChanged` событий
    pub fn take_transitions(&mut self) -> Vec<StateTransition> {
        std::mem::take(&mut self.transitions)
    }

    /// Один кадр FSM
    pub fn tick(&mut self, env: &mut AgentEnv<'_>) -> Result<(), FsmError> {
        if self.is_dead {
            return Ok(());
        }

        let target = self.resolve_target(env);
        self.ensure_started(target, env)?;

        let requested = {
            let mut ctx = StateContext::new(
                &mut *env.mover,
                &mut self.memory,
                &self.waypoints,
                env.config,
                target,
                env.position,
                env.delta,
                &mut self.actions,
            );
            self.states.get_mut(self.current).tick(&mut ctx);
            ctx.take_request()
        };

        #[cfg(test)]
        self.journal.push((self.current, Hook::Tick));

        if let Some(next) = requested {
            self.transition(next, target, env)?;
        }

        Ok(())
    }

    /// Явный переход (exit → current = next → enter)
    pub fn change_state(&mut self, next: StateId, env: &mut AgentEnv<'_>) -> Result<(), FsmError> {
        let target = self.resolve_target(env);
        self.ensure_started(target, env)?;
        self.transition(next, target, env)
    }

    /// Listener capability: реакция на звук
    ///
    /// В Chase/Attack агент занят целью и звук игнорирует. Иначе идёт
    /// смотреть (`heard_at`), перезапуская Investigate если уже в нём.
    /// Тревога соседа не сбивает агента, который уже идёт на свой звук.
    pub fn respond_to_sound(
        &mut self,
        heard_at: Vec3,
        kind: SoundKind,
        env: &mut AgentEnv<'_>,
    ) -> Result<SoundResponse, FsmError> {
        if self.is_dead {
            return Ok(SoundResponse::Ignored);
        }

        let target = self.resolve_target(env);
        self.ensure_started(target, env)?;

        match self.current {
            StateId::Chase | StateId::Attack => Ok(SoundResponse::Ignored),
            StateId::Investigate if kind == SoundKind::AlertCall => Ok(SoundResponse::Ignored),
            StateId::Patrol | StateId::Investigate => {
                let was_patrolling = self.current == StateId::Patrol;
                self.memory.investigation_position = Some(heard_at);
                self.transition(StateId::Investigate, target, env)?;
                Ok(SoundResponse::Investigating { was_patrolling })
            }
        }
    }

    /// Перепроверка weak-ссылки на цель + дистанция (одна на весь кадр)
    fn resolve_target(&mut self, env: &AgentEnv<'_>) -> Option<TargetView> {
        let entity = self.memory.current_target?;

        match env.targets.locate(entity) {
            Some(position) => {
                self.memory.last_known_target_position = Some(position);
                Some(TargetView {
                    entity,
                    position,
                    distance: env.position.distance(position),
                })
            }
            None => {
                crate::log(&format!("👻 AI: target {:?} is gone → treated as no target", entity));
                self.memory.current_target = None;
                None
            }
        }
    }

    fn ensure_started(
        &mut self,
        target: Option<TargetView>,
        env: &mut AgentEnv<'_>,
    ) -> Result<(), FsmError> {
        if self.started {
            return Ok(());
        }
        self.started = true;

        let initial = self.current;
        let mut ctx = StateContext::new(
            &mut *env.mover,
            &mut self.memory,
            &self.waypoints,
            env.config,
            target,
            env.position,
            env.delta,
            &mut self.actions,
        );
        self.states.get_mut(initial).enter(&mut ctx);
        #[cfg(test)]
        self.journal.push((initial, Hook::Enter));

        match ctx.take_request() {
            Some(requested) => Err(FsmError::ReentrantTransition {
                from: initial,
                to: initial,
                requested,
            }),
            None => Ok(()),
        }
    }

    fn transition(
        &mut self,
        next: StateId,
        target: Option<TargetView>,
        env: &mut AgentEnv<'_>,
    ) -> Result<(), FsmError> {
        let from = self.current;
        self.run_transition(from, next, target, env)?;
        self.transitions.push(StateTransition { from, to: next });
        Ok(())
    }

    /// exit → current = next → enter; запрос перехода из любого хука - ошибка
    fn run_transition(
        &mut self,
        from: StateId,
        next: StateId,
        target: Option<TargetView>,
        env: &mut AgentEnv<'_>,
    ) -> Result<(), FsmError> {
        let reentrant = |requested| FsmError::ReentrantTransition {
            from,
            to: next,
            requested,
        };

        let mut ctx = StateContext::new(
            &mut *env.mover,
            &mut self.memory,
            &self.waypoints,
            env.config,
            target,
            env.position,
            env.delta,
            &mut self.actions,
        );

        let leaving = self.states.get_mut(from);
        leaving.exit(&mut ctx);
        let left = leaving.id();
        #[cfg(test)]
        self.journal.push((left, Hook::Exit));
        if let Some(requested) = ctx.take_request() {
            return Err(reentrant(requested));
        }

        self.current = next;

        let entering = self.states.get_mut(next);
        entering.enter(&mut ctx);
        let entered = entering.id();
        #[cfg(test)]
        self.journal.push((entered, Hook::Enter));
        if let Some(requested) = ctx.take_request() {
            return Err(reentrant(requested));
        }

        crate::log(&format!("AI: {:?} → {:?}", left, entered));
        Ok(())
    }
}
