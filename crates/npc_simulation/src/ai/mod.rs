//! AI decision-making module
//!
//! FSM агента (Patrol / Chase / Attack / Investigate), perception по FOV + LOS
//! и Sound Bus. Ядро (controller, states, perception, sound) не знает про ECS
//! и работает через capability traits (`Mover`, `SpatialQuery`, `TargetLocator`);
//! `systems` - тонкая ECS обвязка поверх него.

use bevy::prelude::*;

pub mod bundle;
pub mod config;
pub mod controller;
pub mod error;
pub mod events;
pub mod layers;
pub mod mover;
pub mod perception;
pub mod sound;
pub mod spatial;
pub mod states;
pub mod systems;

#[cfg(test)]
mod controller_tests;
#[cfg(test)]
pub(crate) mod test_support;

// Re-export основных типов
pub use bundle::AgentBundle;
pub use config::AIConfig;
pub use controller::{AgentController, AgentEnv, SoundResponse, StateTransition, TargetLocator};
pub use error::{AgentSetupError, ConfigError, FsmError};
pub use events::{AttackIntent, SoundEmitted, StateChanged};
pub use layers::QueryLayers;
pub use mover::Mover;
pub use perception::{perceive, LossReason, Observer, PerceptionResult, PerceptionSchedule};
pub use sound::{FlushReport, SoundBus, SoundEvent, SoundKind, SoundListener, SoundListeners};
pub use spatial::{IndexedBody, RayHit, SpatialCandidate, SpatialIndex, SpatialQuery};
pub use states::{AgentAction, AgentMemory, AgentState, StateId, TargetView};
pub use systems::{DetectableTargets, TargetQuery};

/// Набор AI систем (для упорядочивания внешних систем относительно AI)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct AISystems;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. sync_agent_health - смерть → FSM остановлен, perception снят
/// 2. rebuild_spatial_index - снимок мира для запросов этого кадра
/// 3. poll_perception - FOV + LOS по расписанию агента
/// 4. tick_agents - tick FSM, переходы, AttackIntent + выстрелы в Sound Bus
/// 5. dispatch_sounds - раздача очереди звуков слушателям
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<SoundEmitted>()
            .add_event::<AttackIntent>()
            .add_event::<StateChanged>()
            .init_resource::<SpatialIndex>()
            .init_resource::<SoundBus>();

        // Jitter слуха берёт RNG; SimulationPlugin кладёт свой seed раньше
        if !app.world().contains_resource::<crate::DeterministicRng>() {
            app.insert_resource(crate::DeterministicRng::new(42));
        }

        app.add_systems(
            FixedUpdate,
            (
                systems::sync_agent_health,
                systems::rebuild_spatial_index,
                systems::poll_perception,
                systems::tick_agents,
                systems::dispatch_sounds,
            )
                .chain() // Последовательное выполнение для детерминизма
                .in_set(AISystems),
        );
    }
}

/// Headless навигация (прямая линия вместо NavMesh)
///
/// Подключается только без движка - там NavAgent исполняет его навигатор.
pub struct HeadlessNavigationPlugin;

impl Plugin for HeadlessNavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, systems::drive_nav_agents.after(AISystems));
    }
}
