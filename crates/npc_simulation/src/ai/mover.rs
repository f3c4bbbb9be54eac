//! Mover - внешняя capability навигации (NavMesh агент движка).
//!
//! AI только отдаёт команды (скорость, точка назначения) и читает прогресс.
//! Pathfinding/steering здесь не реализуются.

use bevy::prelude::*;

pub trait Mover {
    fn set_enabled(&mut self, enabled: bool);
    fn set_speed(&mut self, speed: f32);
    fn set_destination(&mut self, destination: Vec3);

    fn remaining_distance(&self) -> f32;
    fn has_pending_path(&self) -> bool;
    fn has_active_path(&self) -> bool;
    fn stopping_distance(&self) -> f32;

    /// "Дошёл и стоит": путь не считается, остаток < stopping distance, активного пути нет
    fn is_arrived_and_idle(&self) -> bool {
        !self.has_pending_path()
            && self.remaining_distance() < self.stopping_distance()
            && !self.has_active_path()
    }
}
