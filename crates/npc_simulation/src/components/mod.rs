//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: здоровье, маркер цели, тело для spatial index
//! - movement: NavAgent (Mover capability для NavMesh агента)

pub mod actor;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
