//! Sound Bus - точечные звуки (взрывы, выстрелы) → слушатели в радиусе.
//!
//! Архитектура:
//! - `SoundBus` - Resource, создаётся один раз плагином (никакого глобального static)
//! - Продюсеры кладут звук в очередь (`emit`) или шлют `SoundEmitted` event
//! - `flush` раздаёт очередь синхронно: каждому слушателю в радиусе ровно один вызов
//! - Звуки, рождённые ВНУТРИ обработчика (эхо), дописываются в хвост очереди
//!   и раздаются в том же flush - без рекурсии и без deadlock'ов

use std::collections::{HashMap, VecDeque};

use bevy::prelude::*;

use super::error::FsmError;
use super::layers::QueryLayers;
use super::spatial::SpatialQuery;

/// Что за звук
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SoundKind {
    /// Шум мира: выстрел, взрыв, шаги
    #[default]
    Noise,
    /// Тревога агента соседям ("я что-то слышал")
    AlertCall,
}

/// Звук: точка + радиус. Без identity, живёт один broadcast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundEvent {
    pub position: Vec3,
    pub radius: f32,
    /// Кто шумел (сам себя источник не слышит)
    pub source: Option<Entity>,
    pub kind: SoundKind,
}

impl SoundEvent {
    pub fn new(position: Vec3, radius: f32) -> Self {
        Self {
            position,
            radius,
            source: None,
            kind: SoundKind::Noise,
        }
    }

    pub fn from_source(source: Entity, position: Vec3, radius: f32) -> Self {
        Self {
            position,
            radius,
            source: Some(source),
            kind: SoundKind::Noise,
        }
    }

    /// Тревога от агента, который сам что-то услышал
    pub fn alert_call(source: Entity, position: Vec3, radius: f32) -> Self {
        Self {
            kind: SoundKind::AlertCall,
            ..Self::from_source(source, position, radius)
        }
    }
}

/// Listener capability
pub trait SoundListener {
    /// `echoes` - звуки, которые слушатель издаёт в ответ (уйдут в очередь шины)
    fn respond_to_sound(
        &mut self,
        event: &SoundEvent,
        echoes: &mut Vec<SoundEvent>,
    ) -> Result<(), FsmError>;
}

/// Реестр слушателей: по entity из spatial query находит слушателя
pub trait SoundListeners {
    /// false - entity не слушатель (звук ей не доставлен)
    fn deliver(
        &mut self,
        listener: Entity,
        event: &SoundEvent,
        echoes: &mut Vec<SoundEvent>,
    ) -> Result<bool, FsmError>;
}

impl<L: SoundListener> SoundListeners for HashMap<Entity, L> {
    fn deliver(
        &mut self,
        listener: Entity,
        event: &SoundEvent,
        echoes: &mut Vec<SoundEvent>,
    ) -> Result<bool, FsmError> {
        let Some(listener) = self.get_mut(&listener) else {
            return Ok(false);
        };
        listener.respond_to_sound(event, echoes)?;
        Ok(true)
    }
}

/// Итог одного flush
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Сколько звуков разослано
    pub sounds: usize,
    /// Сколько вызовов обработчиков
    pub deliveries: usize,
    /// Сколько звуков осталось в очереди до следующего flush (упёрлись в лимит)
    pub deferred: usize,
}

#[derive(Resource, Debug, Clone)]
pub struct SoundBus {
    queue: VecDeque<SoundEvent>,
    listener_layers: QueryLayers,
    /// Предохранитель от бесконечных каскадов эха
    max_sounds_per_flush: usize,
}

impl Default for SoundBus {
    fn default() -> Self {
        Self::new(QueryLayers::AGENTS, 256)
    }
}

impl SoundBus {
    pub fn new(listener_layers: QueryLayers, max_sounds_per_flush: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            listener_layers,
            max_sounds_per_flush: max_sounds_per_flush.max(1),
        }
    }

    pub fn listener_layers(&self) -> QueryLayers {
        self.listener_layers
    }

    pub fn emit(&mut self, event: SoundEvent) {
        self.queue.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Синхронная раздача одного звука; возвращает число доставок
    ///
    /// Порядок слушателей не гарантируется. Entity вне радиуса не вызываются никогда.
    pub fn broadcast(
        &self,
        event: &SoundEvent,
        spatial: &dyn SpatialQuery,
        listeners: &mut dyn SoundListeners,
        echoes: &mut Vec<SoundEvent>,
    ) -> Result<usize, FsmError> {
        let mut delivered = 0;

        for candidate in spatial.query_radius(event.position, event.radius, self.listener_layers) {
            if Some(candidate.entity) == event.source {
                continue;
            }
            if listeners.deliver(candidate.entity, event, echoes)? {
                delivered += 1;
            }
        }

        Ok(delivered)
    }

    /// Раздать всю очередь (включая эхо, появившееся по ходу)
    pub fn flush(
        &mut self,
        spatial: &dyn SpatialQuery,
        listeners: &mut dyn SoundListeners,
    ) -> Result<FlushReport, FsmError> {
        let mut report = FlushReport::default();
        let mut echoes = Vec::new();

        while report.sounds < self.max_sounds_per_flush {
            let Some(event) = self.queue.pop_front() else {
                break;
            };

            report.deliveries += self.broadcast(&event, spatial, listeners, &mut echoes)?;
            report.sounds += 1;
            self.queue.extend(echoes.drain(..));
        }

        report.deferred = self.queue.len();
        if report.deferred > 0 {
            crate::log_warning(&format!(
                "🔊 SoundBus: flush limit {} reached, {} sounds deferred to next tick",
                self.max_sounds_per_flush, report.deferred
            ));
        }

        Ok(report)
    }
}
