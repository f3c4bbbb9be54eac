//! Тестовые двойники capability traits (Mover, SpatialQuery, TargetLocator).

use std::collections::HashMap;

use bevy::prelude::*;

use super::config::AIConfig;
use super::controller::AgentEnv;
use super::mover::Mover;
use super::states::{AgentAction, AgentMemory, AgentState, StateContext, StateId, TargetView};

/// Mover, который записывает все команды
///
/// `instant = true` - любая точка достигается мгновенно (агент всегда
/// "дошёл и стоит"); `false` - путь висит в pending до `arrive()`.
#[derive(Debug, Clone)]
pub(crate) struct RecordingMover {
    pub enabled: bool,
    pub speed: f32,
    pub destinations: Vec<Vec3>,
    pub instant: bool,
    pending: bool,
    remaining: f32,
}

impl RecordingMover {
    pub fn instant() -> Self {
        Self {
            enabled: false,
            speed: 0.0,
            destinations: Vec::new(),
            instant: true,
            pending: false,
            remaining: 0.0,
        }
    }

    pub fn travelling() -> Self {
        Self {
            instant: false,
            ..Self::instant()
        }
    }

    pub fn arrive(&mut self) {
        self.pending = false;
        self.remaining = 0.0;
    }

    pub fn last_destination(&self) -> Option<Vec3> {
        self.destinations.last().copied()
    }
}

impl Mover for RecordingMover {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn set_destination(&mut self, destination: Vec3) {
        self.destinations.push(destination);
        if !self.instant {
            self.pending = true;
            self.remaining = 10.0;
        }
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining
    }

    fn has_pending_path(&self) -> bool {
        self.pending
    }

    fn has_active_path(&self) -> bool {
        false
    }

    fn stopping_distance(&self) -> f32 {
        0.5
    }
}

/// Всё, что нужно состоянию вне контроллера
pub(crate) struct StateHarness {
    pub mover: RecordingMover,
    pub memory: AgentMemory,
    pub waypoints: Vec<Vec3>,
    pub config: AIConfig,
    pub actions: Vec<AgentAction>,
    pub position: Vec3,
}

impl StateHarness {
    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self {
            mover: RecordingMover::instant(),
            memory: AgentMemory::new(Vec3::ZERO, Quat::IDENTITY),
            waypoints,
            config: AIConfig::default(),
            actions: Vec::new(),
            position: Vec3::ZERO,
        }
    }

    pub fn ctx(&mut self, target: Option<TargetView>, delta: f32) -> StateContext<'_> {
        StateContext::new(
            &mut self.mover,
            &mut self.memory,
            &self.waypoints,
            &self.config,
            target,
            self.position,
            delta,
            &mut self.actions,
        )
    }
}

/// Окружение контроллера: mover + цели в HashMap
pub(crate) struct EnvHarness {
    pub mover: RecordingMover,
    pub config: AIConfig,
    pub targets: HashMap<Entity, Vec3>,
    pub position: Vec3,
}

impl EnvHarness {
    pub fn new() -> Self {
        Self {
            mover: RecordingMover::instant(),
            config: AIConfig::default(),
            targets: HashMap::new(),
            position: Vec3::ZERO,
        }
    }

    pub fn env(&mut self, delta: f32) -> AgentEnv<'_> {
        AgentEnv {
            mover: &mut self.mover,
            config: &self.config,
            targets: &self.targets,
            position: self.position,
            delta,
        }
    }
}

pub(crate) fn target_at(index: u32, position: Vec3) -> TargetView {
    TargetView {
        entity: Entity::from_raw(index),
        position,
        distance: position.length(),
    }
}

/// Подмена одного из состояний: запрашивает переход из enter/exit
#[derive(Debug, Clone)]
pub(crate) struct ScriptedState {
    pub id: StateId,
    pub request_on_enter: Option<StateId>,
    pub request_on_exit: Option<StateId>,
}

impl ScriptedState {
    pub fn requesting_on_enter(id: StateId, next: StateId) -> Self {
        Self {
            id,
            request_on_enter: Some(next),
            request_on_exit: None,
        }
    }

    pub fn requesting_on_exit(id: StateId, next: StateId) -> Self {
        Self {
            id,
            request_on_enter: None,
            request_on_exit: Some(next),
        }
    }
}

impl AgentState for ScriptedState {
    fn id(&self) -> StateId {
        self.id
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(next) = self.request_on_enter {
            ctx.request_transition(next);
        }
    }

    fn tick(&mut self, _ctx: &mut StateContext<'_>) {}

    fn exit(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(next) = self.request_on_exit {
            ctx.request_transition(next);
        }
    }
}
