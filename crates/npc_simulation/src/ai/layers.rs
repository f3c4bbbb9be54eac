//! Query Layers - категории для spatial queries
//!
//! ## Архитектура:
//! - **Layers (битовая маска):** к каким категориям относится тело (`SpatialBody`)
//! - **Filter (битовая маска):** какие категории интересуют запрос
//!
//! ## Слои:
//! - Layer 1 (0b1 = 1): Agents (NPC со своим FSM, слушают звуки)
//! - Layer 2 (0b10 = 2): Targets (игрок и всё, что агент может заметить)
//! - Layer 3 (0b100 = 4): Obstacles (стены, укрытия - блокируют line-of-sight)
//!
//! Фильтрация по слоям - оптимизация: функционально это то же самое,
//! что отфильтровать результат запроса после.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Битовая маска слоёв
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryLayers(pub u32);

impl QueryLayers {
    pub const NONE: Self = Self(0);
    pub const AGENTS: Self = Self(0b1);
    pub const TARGETS: Self = Self(0b10);
    pub const OBSTACLES: Self = Self(0b100);
    pub const ALL: Self = Self(u32::MAX);

    /// Есть ли хотя бы один общий слой
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for QueryLayers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
