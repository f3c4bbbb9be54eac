//! Perception - захват цели по FOV + line-of-sight.
//!
//! Опрос идёт не каждый кадр, а по своему расписанию (`PerceptionSchedule`,
//! по умолчанию раз в секунду). Таймер повторяющийся: остаток времени сверх
//! интервала переносится в следующий цикл. Расписание снимается с агента
//! при смерти.
//!
//! Семантика "first match wins": решение принимается по ПЕРВОМУ кандидату
//! из radius query. Если он не прошёл FOV или LOS - цель сбрасывается,
//! остальные кандидаты не проверяются.

use std::time::Duration;

use bevy::prelude::*;

use super::config::AIConfig;
use super::spatial::SpatialQuery;

/// Периодическая задача опроса perception (per-agent)
#[derive(Component, Debug, Clone)]
pub struct PerceptionSchedule {
    timer: Timer,
}

impl PerceptionSchedule {
    pub fn new(interval_secs: f32) -> Self {
        Self {
            timer: Timer::from_seconds(interval_secs, TimerMode::Repeating),
        }
    }

    /// Продвинуть время; true - пора опрашивать
    pub fn advance(&mut self, delta: Duration) -> bool {
        self.timer.tick(delta).just_finished()
    }

    pub fn interval(&self) -> Duration {
        self.timer.duration()
    }
}

/// Кто смотрит
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observer {
    /// Сам наблюдатель в query не считается кандидатом
    pub entity: Option<Entity>,
    pub position: Vec3,
    pub forward: Vec3,
}

impl Observer {
    pub fn from_transform(entity: Entity, transform: &Transform) -> Self {
        Self {
            entity: Some(entity),
            position: transform.translation,
            forward: *transform.forward(),
        }
    }
}

/// Почему цель сброшена
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LossReason {
    NoCandidates,
    OutsideFov,
    Occluded,
}

/// Результат одного опроса (не хранится, пересчитывается каждый раз)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerceptionResult {
    Acquired { target: Entity, position: Vec3 },
    Cleared(LossReason),
}

/// Один опрос perception
pub fn perceive(observer: &Observer, config: &AIConfig, spatial: &dyn SpatialQuery) -> PerceptionResult {
    let candidates =
        spatial.query_radius(observer.position, config.detection_radius, config.target_layers);

    let Some(candidate) = candidates
        .into_iter()
        .find(|candidate| Some(candidate.entity) != observer.entity)
    else {
        return PerceptionResult::Cleared(LossReason::NoCandidates);
    };

    let to_candidate = candidate.position - observer.position;
    let distance = to_candidate.length();

    // Кандидат в той же точке - направления нет, считаем что видим
    if distance <= f32::EPSILON {
        return PerceptionResult::Acquired {
            target: candidate.entity,
            position: candidate.position,
        };
    }

    let direction = to_candidate / distance;

    // NaN (нулевой forward) тоже проваливает проверку
    let angle = observer.forward.angle_between(direction);
    if !(angle < config.fov_half_angle_radians()) {
        return PerceptionResult::Cleared(LossReason::OutsideFov);
    }

    let eye = observer.position + Vec3::Y * config.eye_height;
    if spatial
        .raycast(eye, direction, distance, config.obstacle_layers)
        .is_some()
    {
        return PerceptionResult::Cleared(LossReason::Occluded);
    }

    PerceptionResult::Acquired {
        target: candidate.entity,
        position: candidate.position,
    }
}
