use bevy::prelude::*;

use super::controller::{AgentController, Hook, SoundResponse, StateTransition};
use super::error::FsmError;
use super::sound::SoundKind;
use super::states::{AgentAction, StateId};
use super::test_support::{EnvHarness, ScriptedState};

const DT: f32 = 0.1;

fn controller() -> AgentController {
    AgentController::new(
        vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 0.0)],
        &Transform::from_xyz(0.0, 0.0, 0.0),
    )
    .expect("valid controller")
}

/// Агент видит цель `target` в точке `position`
fn spot(
    controller: &mut AgentController,
    harness: &mut EnvHarness,
    target: Entity,
    position: Vec3,
) {
    harness.targets.insert(target, position);
    controller.set_target(target, position);
}

#[test]
fn test_initial_enter_runs_once_before_first_tick() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();

    controller.tick(&mut harness.env(DT)).unwrap();
    controller.tick(&mut harness.env(DT)).unwrap();

    assert_eq!(
        controller.journal,
        vec![
            (StateId::Patrol, Hook::Enter),
            (StateId::Patrol, Hook::Tick),
            (StateId::Patrol, Hook::Tick),
        ]
    );
    assert!(controller.take_transitions().is_empty());
}

#[test]
fn test_transition_exits_before_enter_without_tick() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();
    let target = Entity::from_raw(7);
    spot(&mut controller, &mut harness, target, Vec3::new(80.0, 0.0, 0.0));

    controller.tick(&mut harness.env(DT)).unwrap();

    assert_eq!(controller.current_state(), StateId::Chase);
    assert_eq!(
        controller.journal,
        vec![
            (StateId::Patrol, Hook::Enter),
            (StateId::Patrol, Hook::Tick),
            (StateId::Patrol, Hook::Exit),
            (StateId::Chase, Hook::Enter),
        ]
    );
    assert_eq!(
        controller.take_transitions(),
        vec![StateTransition {
            from: StateId::Patrol,
            to: StateId::Chase,
        }]
    );
    assert_eq!(harness.mover.speed, harness.config.pursuit_speed);
}

#[test]
fn test_chase_reaches_attack_and_emits_action() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();
    let target = Entity::from_raw(7);
    spot(&mut controller, &mut harness, target, Vec3::new(10.0, 0.0, 0.0));

    controller.tick(&mut harness.env(DT)).unwrap();
    assert_eq!(controller.current_state(), StateId::Chase);

    controller.tick(&mut harness.env(DT)).unwrap();
    assert_eq!(controller.current_state(), StateId::Attack);

    controller.tick(&mut harness.env(DT)).unwrap();
    assert_eq!(
        controller.take_actions(),
        vec![AgentAction::Attack {
            target,
            position: Vec3::ZERO,
        }]
    );
}

#[test]
fn test_last_known_position_follows_target() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();
    let target = Entity::from_raw(7);
    spot(&mut controller, &mut harness, target, Vec3::new(80.0, 0.0, 0.0));

    controller.tick(&mut harness.env(DT)).unwrap();
    harness.targets.insert(target, Vec3::new(85.0, 0.0, 3.0));
    controller.tick(&mut harness.env(DT)).unwrap();

    assert_eq!(controller.last_known_target_position(), Some(Vec3::new(85.0, 0.0, 3.0)));
    assert_eq!(harness.mover.last_destination(), Some(Vec3::new(85.0, 0.0, 3.0)));
}

#[test]
fn test_stale_target_is_cleared() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();
    let seen_at = Vec3::new(30.0, 0.0, 0.0);

    // Цель видели, но entity уже нет в мире
    controller.set_target(Entity::from_raw(99), seen_at);
    controller.tick(&mut harness.env(DT)).unwrap();

    assert_eq!(controller.current_target(), None);
    assert_eq!(controller.current_state(), StateId::Patrol);
    assert_eq!(controller.last_known_target_position(), Some(seen_at));
}

#[test]
fn test_lost_target_leads_to_investigate_and_back_to_patrol() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();
    harness.config.investigate_dwell_time = 0.3;
    let target = Entity::from_raw(7);
    let last_seen = Vec3::new(70.0, 0.0, 5.0);
    spot(&mut controller, &mut harness, target, last_seen);

    controller.tick(&mut harness.env(DT)).unwrap();
    assert_eq!(controller.current_state(), StateId::Chase);

    harness.targets.clear();
    controller.tick(&mut harness.env(DT)).unwrap();
    assert_eq!(controller.current_state(), StateId::Investigate);
    assert_eq!(controller.investigation_position(), Some(last_seen));
    assert_eq!(harness.mover.last_destination(), Some(last_seen));

    for _ in 0..10 {
        controller.tick(&mut harness.env(DT)).unwrap();
        if controller.current_state() == StateId::Patrol {
            break;
        }
    }
    assert_eq!(controller.current_state(), StateId::Patrol);
    assert_eq!(controller.states().patrol.wait_timer(), 0.0);
    assert_eq!(controller.states().patrol.waypoint_index(), 0);
}

#[test]
fn test_sound_in_patrol_starts_investigation() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();
    let noise = Vec3::new(12.0, 0.0, -6.0);

    let response = controller
        .respond_to_sound(noise, SoundKind::Noise, &mut harness.env(0.0))
        .unwrap();

    assert_eq!(response, SoundResponse::Investigating { was_patrolling: true });
    assert_eq!(controller.current_state(), StateId::Investigate);
    assert_eq!(controller.investigation_position(), Some(noise));
    assert_eq!(harness.mover.last_destination(), Some(noise));
}

#[test]
fn test_sound_while_investigating_restarts_investigation() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();
    controller
        .respond_to_sound(Vec3::new(5.0, 0.0, 0.0), SoundKind::Noise, &mut harness.env(0.0))
        .unwrap();
    controller.journal.clear();

    let second = Vec3::new(-5.0, 0.0, 9.0);
    let response = controller
        .respond_to_sound(second, SoundKind::Noise, &mut harness.env(0.0))
        .unwrap();

    assert_eq!(response, SoundResponse::Investigating { was_patrolling: false });
    assert_eq!(
        controller.journal,
        vec![
            (StateId::Investigate, Hook::Exit),
            (StateId::Investigate, Hook::Enter),
        ]
    );
    assert_eq!(harness.mover.last_destination(), Some(second));
}

#[test]
fn test_alert_call_does_not_redirect_investigation() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();
    let noise = Vec3::new(-5.0, 0.0, 0.0);
    controller
        .respond_to_sound(noise, SoundKind::Noise, &mut harness.env(0.0))
        .unwrap();
    controller.journal.clear();

    let response = controller
        .respond_to_sound(Vec3::new(20.0, 0.0, 0.0), SoundKind::AlertCall, &mut harness.env(0.0))
        .unwrap();

    assert_eq!(response, SoundResponse::Ignored);
    assert_eq!(controller.investigation_position(), Some(noise));
    assert_eq!(harness.mover.last_destination(), Some(noise));
    assert!(controller.journal.is_empty());
}

#[test]
fn test_alert_call_alarms_patrolling_agent() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();
    let caller = Vec3::new(20.0, 0.0, 0.0);

    let response = controller
        .respond_to_sound(caller, SoundKind::AlertCall, &mut harness.env(0.0))
        .unwrap();

    assert_eq!(response, SoundResponse::Investigating { was_patrolling: true });
    assert_eq!(controller.investigation_position(), Some(caller));
}

#[test]
fn test_sound_ignored_while_chasing() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();
    spot(&mut controller, &mut harness, Entity::from_raw(7), Vec3::new(80.0, 0.0, 0.0));
    controller.tick(&mut harness.env(DT)).unwrap();

    let response = controller
        .respond_to_sound(Vec3::new(1.0, 0.0, 1.0), SoundKind::Noise, &mut harness.env(0.0))
        .unwrap();

    assert_eq!(response, SoundResponse::Ignored);
    assert_eq!(controller.current_state(), StateId::Chase);
    assert_eq!(controller.investigation_position(), None);
}

#[test]
fn test_dead_agent_is_inert() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();
    controller.tick(&mut harness.env(DT)).unwrap();
    controller.mark_dead();
    controller.journal.clear();

    spot(&mut controller, &mut harness, Entity::from_raw(7), Vec3::new(5.0, 0.0, 0.0));
    controller.tick(&mut harness.env(DT)).unwrap();
    let response = controller
        .respond_to_sound(Vec3::ONE, SoundKind::Noise, &mut harness.env(0.0))
        .unwrap();

    assert!(controller.is_dead());
    assert_eq!(response, SoundResponse::Ignored);
    assert!(controller.journal.is_empty());
    assert_eq!(controller.current_state(), StateId::Patrol);
}

#[test]
fn test_transition_requested_from_enter_fails() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();
    controller.script_state(ScriptedState::requesting_on_enter(StateId::Chase, StateId::Attack));
    spot(&mut controller, &mut harness, Entity::from_raw(7), Vec3::new(80.0, 0.0, 0.0));

    let result = controller.tick(&mut harness.env(DT));

    assert_eq!(
        result,
        Err(FsmError::ReentrantTransition {
            from: StateId::Patrol,
            to: StateId::Chase,
            requested: StateId::Attack,
        })
    );
    assert!(controller.take_transitions().is_empty());
}

#[test]
fn test_transition_requested_from_exit_fails_before_switch() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();
    controller.script_state(ScriptedState::requesting_on_exit(
        StateId::Patrol,
        StateId::Investigate,
    ));

    let result = controller.change_state(StateId::Chase, &mut harness.env(0.0));

    assert_eq!(
        result,
        Err(FsmError::ReentrantTransition {
            from: StateId::Patrol,
            to: StateId::Chase,
            requested: StateId::Investigate,
        })
    );
    // enter следующего не вызывался
    assert_eq!(controller.current_state(), StateId::Patrol);
    assert_eq!(
        controller.journal,
        vec![(StateId::Patrol, Hook::Enter), (StateId::Patrol, Hook::Exit)]
    );
}

#[test]
fn test_transition_requested_from_initial_enter_fails() {
    let mut controller = controller();
    let mut harness = EnvHarness::new();
    controller.script_state(ScriptedState::requesting_on_enter(StateId::Patrol, StateId::Chase));

    let result = controller.tick(&mut harness.env(DT));

    assert_eq!(
        result,
        Err(FsmError::ReentrantTransition {
            from: StateId::Patrol,
            to: StateId::Patrol,
            requested: StateId::Chase,
        })
    );
    assert_eq!(controller.journal, vec![(StateId::Patrol, Hook::Enter)]);
}

#[test]
fn test_invalid_waypoint_rejected() {
    let result = AgentController::new(
        vec![Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 0.0)],
        &Transform::default(),
    );
    assert!(result.is_err());
}
