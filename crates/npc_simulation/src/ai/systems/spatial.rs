//! Headless spatial index sync.

use bevy::prelude::*;

use crate::ai::{IndexedBody, SpatialIndex};
use crate::components::{Health, SpatialBody};

/// System: пересборка `SpatialIndex` из `SpatialBody` (каждый tick)
///
/// Без физики это наш broad-phase: perception и Sound Bus видят мир
/// в том виде, в каком он был в начале кадра. Мёртвые (HP == 0) в индекс
/// не попадают: их не замечают и они не слышат.
pub fn rebuild_spatial_index(
    mut index: ResMut<SpatialIndex>,
    bodies: Query<(Entity, &Transform, &SpatialBody, Option<&Health>)>,
) {
    index.rebuild(
        bodies
            .iter()
            .filter(|(_, _, _, health)| health.is_none_or(|health| health.is_alive()))
            .map(|(entity, transform, body, _)| IndexedBody {
                entity,
                position: transform.translation,
                radius: body.radius,
                layers: body.layers,
            }),
    );
}
