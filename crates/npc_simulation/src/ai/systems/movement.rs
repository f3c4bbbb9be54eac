//! Headless навигация: NavAgent → Transform по прямой.
//!
//! В движке это делает pathfinding (NavMesh); здесь - прямая до точки,
//! чтобы симуляция и тесты работали без внешнего навигатора.

use bevy::prelude::*;

use crate::components::NavAgent;

/// System: двигаем агентов к `destination`
///
/// Путь "строится" за один кадр: `path_pending` → `has_path` с остатком
/// дистанции, дальше шаг `speed * delta` до `stopping_distance`.
pub fn drive_nav_agents(time: Res<Time<Fixed>>, mut agents: Query<(&mut Transform, &mut NavAgent)>) {
    let delta = time.delta_secs();

    for (mut transform, mut nav) in agents.iter_mut() {
        if !nav.enabled {
            continue;
        }
        let Some(destination) = nav.destination else {
            continue;
        };

        let to_target = destination - transform.translation;
        let distance = to_target.length();

        if nav.path_pending {
            nav.path_ready(distance);
        }
        if !nav.has_path {
            continue;
        }

        if distance < nav.stopping_distance {
            nav.path_finished(distance);
            continue;
        }

        let step = (nav.speed * delta).min(distance);
        let direction = to_target / distance;
        transform.translation += direction * step;

        // Поворот только по горизонтали (forward для FOV)
        let horizontal = Vec3::new(direction.x, 0.0, direction.z);
        if horizontal.length_squared() > f32::EPSILON {
            transform.look_to(horizontal, Vec3::Y);
        }

        let remaining = distance - step;
        if remaining < nav.stopping_distance {
            nav.path_finished(remaining);
        } else {
            nav.remaining_distance = remaining;
        }
    }
}
