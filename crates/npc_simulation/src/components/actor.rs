//! Базовые компоненты акторов: Health, Detectable, SpatialBody

use bevy::prelude::*;

use crate::ai::QueryLayers;

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max. HP == 0 у агента → `is_dead`, AI отключен.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }
}

/// Marker: perception может выбрать entity целью (игрок, враждебный NPC)
///
/// Валидность цели каждый tick: entity жива, Detectable на месте, Health > 0 (если есть).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Detectable;

/// Тело для headless spatial index (сфера + слои)
///
/// В движке эту роль играют коллайдеры; здесь - минимальная замена,
/// чтобы perception/sound работали без физики.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct SpatialBody {
    pub layers: QueryLayers,
    pub radius: f32,
}

impl SpatialBody {
    pub fn new(layers: QueryLayers, radius: f32) -> Self {
        Self { layers, radius }
    }

    pub fn agent() -> Self {
        Self::new(QueryLayers::AGENTS, 0.5)
    }

    pub fn target() -> Self {
        Self::new(QueryLayers::TARGETS, 0.5)
    }

    pub fn obstacle(radius: f32) -> Self {
        Self::new(QueryLayers::OBSTACLES, radius)
    }
}
