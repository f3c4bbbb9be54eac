//! Ошибки AI слоя.
//!
//! Runtime деградации (пустой маршрут, потерянная цель, пустой spatial query)
//! ошибками НЕ являются - здесь только то, что должно упасть громко:
//! невалидная конфигурация при спавне и реентерабельные переходы FSM.

use thiserror::Error;

use super::states::StateId;

/// Невалидные tunables в `AIConfig`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite positive number, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be finite and non-negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("pursuit speed ({pursuit}) must be strictly faster than patrol speed ({patrol})")]
    PursuitNotFaster { patrol: f32, pursuit: f32 },

    #[error("fov half-angle must be within (0, 180] degrees, got {0}")]
    FovOutOfRange(f32),

    #[error("obstacle layers must not include target layers (obstacles {obstacles:#b}, targets {targets:#b})")]
    ObstaclesOverlapTargets { obstacles: u32, targets: u32 },

    #[error("{0} layers must not be empty")]
    EmptyLayers(&'static str),

    #[error("failed to parse AI config: {0}")]
    Parse(String),
}

/// Ошибки сборки агента (construction-time validation)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgentSetupError {
    #[error("invalid AI config: {0}")]
    Config(#[from] ConfigError),

    #[error("patrol waypoint #{index} is not finite: {position:?}")]
    InvalidWaypoint { index: usize, position: [f32; 3] },

    #[error("initial position is not finite: {0:?}")]
    InvalidSpawn([f32; 3]),

    #[error("nav agent {field} must be a finite positive number, got {value}")]
    InvalidNavAgent { field: &'static str, value: f32 },
}

/// Нарушение контракта FSM - programmer error, fail fast
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsmError {
    #[error(
        "re-entrant transition to {requested:?} requested while switching {from:?} -> {to:?}"
    )]
    ReentrantTransition {
        from: StateId,
        to: StateId,
        requested: StateId,
    },
}
