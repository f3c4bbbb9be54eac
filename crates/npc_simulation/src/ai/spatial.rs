//! SpatialQuery - внешняя capability физики (broad-phase + raycast).
//!
//! AI ядро работает только через trait. `SpatialIndex` - headless реализация
//! на сферах (пересобирается каждый tick из `SpatialBody`), в движке её место
//! занимает физический мир.

use bevy::prelude::*;

use super::layers::QueryLayers;

/// Кандидат из radius query (entity + позиция на момент запроса)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialCandidate {
    pub entity: Entity,
    pub position: Vec3,
}

/// Первое препятствие на луче
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub distance: f32,
}

pub trait SpatialQuery {
    /// Все тела с пересекающимися `layers` в радиусе `radius` от `center`.
    /// Порядок результата стабилен между вызовами (perception берёт первого).
    fn query_radius(&self, center: Vec3, radius: f32, layers: QueryLayers) -> Vec<SpatialCandidate>;

    /// Ближайшее тело с `layers` на луче `origin + direction * t`, `t ∈ [0, max_distance]`.
    /// `direction` - единичный вектор.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: QueryLayers,
    ) -> Option<RayHit>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedBody {
    pub entity: Entity,
    pub position: Vec3,
    pub radius: f32,
    pub layers: QueryLayers,
}

/// Headless spatial index (brute force, детерминированный порядок по Entity)
///
/// Radius query считает тела точками (центр в радиусе),
/// raycast - сферами `radius`. Сфера, внутри которой начинается луч, не блокирует.
#[derive(Resource, Debug, Clone, Default)]
pub struct SpatialIndex {
    bodies: Vec<IndexedBody>,
}

impl SpatialIndex {
    pub fn from_bodies(bodies: impl IntoIterator<Item = IndexedBody>) -> Self {
        let mut index = Self::default();
        index.rebuild(bodies);
        index
    }

    pub fn rebuild(&mut self, bodies: impl IntoIterator<Item = IndexedBody>) {
        self.bodies.clear();
        self.bodies.extend(bodies);
        self.bodies.sort_by_key(|body| body.entity);
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl SpatialQuery for SpatialIndex {
    fn query_radius(&self, center: Vec3, radius: f32, layers: QueryLayers) -> Vec<SpatialCandidate> {
        let radius_sq = radius * radius;

        self.bodies
            .iter()
            .filter(|body| body.layers.intersects(layers))
            .filter(|body| body.position.distance_squared(center) <= radius_sq)
            .map(|body| SpatialCandidate {
                entity: body.entity,
                position: body.position,
            })
            .collect()
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: QueryLayers,
    ) -> Option<RayHit> {
        let mut nearest: Option<RayHit> = None;

        for body in self.bodies.iter().filter(|body| body.layers.intersects(layers)) {
            let Some(distance) = ray_sphere_distance(origin, direction, body.position, body.radius)
            else {
                continue;
            };

            if distance > max_distance {
                continue;
            }

            if nearest.map_or(true, |best| distance < best.distance) {
                nearest = Some(RayHit {
                    entity: body.entity,
                    distance,
                });
            }
        }

        nearest
    }
}

/// Расстояние вдоль луча до входа в сферу (None если промах или старт внутри)
fn ray_sphere_distance(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let to_origin = origin - center;
    let c = to_origin.length_squared() - radius * radius;
    if c < 0.0 {
        return None;
    }

    let b = to_origin.dot(direction);
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    (t >= 0.0).then_some(t)
}
