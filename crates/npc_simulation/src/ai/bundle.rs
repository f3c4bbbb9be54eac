//! Сборка агента с проверкой конфигурации на этапе спавна.

use bevy::prelude::*;

use super::config::AIConfig;
use super::controller::AgentController;
use super::error::AgentSetupError;
use super::perception::PerceptionSchedule;
use crate::components::{Health, NavAgent, SpatialBody};

/// Всё, что нужно NPC с FSM
///
/// Конструкторы валидируют config, маршрут и NavAgent - кривая конфигурация
/// падает здесь, а не в runtime.
#[derive(Bundle)]
pub struct AgentBundle {
    pub controller: AgentController,
    pub config: AIConfig,
    pub nav: NavAgent,
    pub perception: PerceptionSchedule,
    pub transform: Transform,
    pub body: SpatialBody,
    pub health: Health,
}

impl AgentBundle {
    pub fn new(
        config: AIConfig,
        waypoints: Vec<Vec3>,
        transform: Transform,
    ) -> Result<Self, AgentSetupError> {
        Self::with_nav_agent(config, waypoints, transform, NavAgent::default())
    }

    pub fn with_nav_agent(
        config: AIConfig,
        waypoints: Vec<Vec3>,
        transform: Transform,
        nav: NavAgent,
    ) -> Result<Self, AgentSetupError> {
        config.validate()?;
        nav.validate()?;
        let controller = AgentController::new(waypoints, &transform)?;

        Ok(Self {
            controller,
            perception: PerceptionSchedule::new(config.perception_interval),
            config,
            nav,
            transform,
            body: SpatialBody::agent(),
            health: Health::default(),
        })
    }
}
