//! AI Events - связь AI слоя с остальной игрой
//!
//! Входящие: `SoundEmitted` (взрывы, выстрелы игрока - любой источник шума)
//! Исходящие: `AttackIntent` (combat слой), `StateChanged` (debug/анимации)

use bevy::prelude::*;

use super::sound::SoundEvent;
use super::states::StateId;

/// Что-то в мире издало звук → Sound Bus
#[derive(Event, Debug, Clone, Copy)]
pub struct SoundEmitted(pub SoundEvent);

/// Агент в Attack state решил атаковать
///
/// Урон/анимацию/projectile считает combat слой движка.
#[derive(Event, Debug, Clone, Copy)]
pub struct AttackIntent {
    pub attacker: Entity,
    pub target: Entity,
    pub position: Vec3,
}

/// FSM агента сменил состояние
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChanged {
    pub agent: Entity,
    pub from: StateId,
    pub to: StateId,
}
