//! Sound dispatch system - очередь SoundBus → агенты в радиусе.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{
    AIConfig, AgentController, AgentEnv, DetectableTargets, FsmError, SoundBus, SoundEmitted,
    SoundEvent, SoundListeners, SoundResponse, SpatialIndex, StateChanged, TargetLocator,
    TargetQuery,
};
use crate::components::NavAgent;
use crate::DeterministicRng;

pub type ListenerQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static Transform,
        &'static AIConfig,
        &'static mut AgentController,
        &'static mut NavAgent,
    ),
>;

/// Уши агентов: реестр слушателей для SoundBus поверх ECS query
struct AgentEars<'a, 'w, 's> {
    agents: &'a mut ListenerQuery<'w, 's>,
    targets: &'a dyn TargetLocator,
    rng: &'a mut DeterministicRng,
    transitions: Vec<StateChanged>,
}

impl SoundListeners for AgentEars<'_, '_, '_> {
    fn deliver(
        &mut self,
        listener: Entity,
        event: &SoundEvent,
        echoes: &mut Vec<SoundEvent>,
    ) -> Result<bool, FsmError> {
        let Ok((transform, config, mut controller, mut nav)) = self.agents.get_mut(listener) else {
            return Ok(false);
        };

        let heard_at = jitter(event.position, config.sound_jitter, self.rng);
        let mut env = AgentEnv {
            mover: &mut *nav,
            config,
            targets: self.targets,
            position: transform.translation,
            delta: 0.0,
        };
        let response = controller.respond_to_sound(heard_at, event.kind, &mut env)?;

        if let SoundResponse::Investigating { was_patrolling } = response {
            crate::log(&format!(
                "🔊 Agent {:?} heard sound at {:?} (radius {:.1}m) → investigating {:?}",
                listener, event.position, event.radius, heard_at
            ));

            // Спокойный агент поднимает тревогу - соседи тоже идут смотреть
            if was_patrolling {
                if let Some(radius) = config.alert_call_radius {
                    echoes.push(SoundEvent::alert_call(listener, transform.translation, radius));
                }
            }
        }

        for transition in controller.take_transitions() {
            self.transitions.push(StateChanged {
                agent: listener,
                from: transition.from,
                to: transition.to,
            });
        }

        Ok(true)
    }
}

/// Неуверенность слуха: разброс по горизонтали
fn jitter(position: Vec3, amount: f32, rng: &mut DeterministicRng) -> Vec3 {
    if amount <= 0.0 {
        return position;
    }
    let offset = Vec3::new(
        rng.rng.gen_range(-1.0..1.0),
        0.0,
        rng.rng.gen_range(-1.0..1.0),
    );
    position + offset * amount
}

/// System: раздача звуков
///
/// Внешние `SoundEmitted` встают в очередь за звуками, накопленными за кадр
/// (выстрелы из Attack), затем очередь раздаётся целиком.
pub fn dispatch_sounds(
    mut bus: ResMut<SoundBus>,
    mut emitted: EventReader<SoundEmitted>,
    index: Res<SpatialIndex>,
    mut rng: ResMut<DeterministicRng>,
    mut agents: ListenerQuery,
    targets: TargetQuery,
    mut state_events: EventWriter<StateChanged>,
) -> Result {
    for SoundEmitted(event) in emitted.read() {
        bus.emit(*event);
    }

    if bus.pending() == 0 {
        return Ok(());
    }

    let locator = DetectableTargets::new(&targets);
    let mut ears = AgentEars {
        agents: &mut agents,
        targets: &locator,
        rng: &mut rng,
        transitions: Vec::new(),
    };
    let report = bus.flush(&*index, &mut ears)?;

    crate::log(&format!(
        "🔊 SoundBus: {} sounds → {} listeners ({} deferred)",
        report.sounds, report.deliveries, report.deferred
    ));

    state_events.write_batch(ears.transitions);
    Ok(())
}
