//! AI systems (ECS обвязка вокруг ядра FSM/perception/sound)

pub mod death;
pub mod fsm;
pub mod movement;
pub mod perception;
pub mod sound;
pub mod spatial;

// Re-export all systems
pub use death::*;
pub use fsm::*;
pub use movement::*;
pub use perception::*;
pub use sound::*;
pub use spatial::*;
