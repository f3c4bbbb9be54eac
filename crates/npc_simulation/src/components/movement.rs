//! Movement компоненты: NavAgent (Mover для ECS)

use bevy::prelude::*;

use crate::ai::error::AgentSetupError;
use crate::ai::Mover;

/// Навигационный агент актора (исполняется NavMesh агентом движка)
///
/// Архитектура:
/// - AI пишет команды: `enabled`, `speed`, `destination` (через `Mover`)
/// - Движок читает команду, строит путь и пишет обратно прогресс:
///   `path_pending`, `has_path`, `remaining_distance`
/// - В headless режиме прогресс пишет `drive_nav_agents` (прямая линия)
#[derive(Component, Debug, Clone, PartialEq)]
pub struct NavAgent {
    pub enabled: bool,
    pub speed: f32,
    pub destination: Option<Vec3>,
    pub stopping_distance: f32,

    /// Остаток пути до destination (пишет движок)
    pub remaining_distance: f32,
    /// Путь запрошен, но ещё не посчитан (пишет движок)
    pub path_pending: bool,
    /// Есть активный путь, по которому идём (пишет движок)
    pub has_path: bool,
}

impl Default for NavAgent {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 2.0,
            destination: None,
            stopping_distance: 0.5,
            remaining_distance: 0.0,
            path_pending: false,
            has_path: false,
        }
    }
}

impl NavAgent {
    pub fn with_stopping_distance(stopping_distance: f32) -> Self {
        Self {
            stopping_distance,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), AgentSetupError> {
        if !self.stopping_distance.is_finite() || self.stopping_distance <= 0.0 {
            return Err(AgentSetupError::InvalidNavAgent {
                field: "stopping_distance",
                value: self.stopping_distance,
            });
        }
        if !self.speed.is_finite() || self.speed <= 0.0 {
            return Err(AgentSetupError::InvalidNavAgent {
                field: "speed",
                value: self.speed,
            });
        }
        Ok(())
    }

    /// Движок: путь посчитан
    pub fn path_ready(&mut self, remaining_distance: f32) {
        self.path_pending = false;
        self.has_path = true;
        self.remaining_distance = remaining_distance;
    }

    /// Движок: дошли (или путь сброшен)
    pub fn path_finished(&mut self, remaining_distance: f32) {
        self.path_pending = false;
        self.has_path = false;
        self.remaining_distance = remaining_distance;
    }
}

impl Mover for NavAgent {
    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.path_pending = false;
            self.has_path = false;
        }
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    fn set_destination(&mut self, destination: Vec3) {
        self.destination = Some(destination);
        self.path_pending = true;
    }

    fn remaining_distance(&self) -> f32 {
        self.remaining_distance
    }

    fn has_pending_path(&self) -> bool {
        self.path_pending
    }

    fn has_active_path(&self) -> bool {
        self.has_path
    }

    fn stopping_distance(&self) -> f32 {
        self.stopping_distance
    }
}
