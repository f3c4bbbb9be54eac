//! AI tunables.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::ConfigError;
use super::layers::QueryLayers;

/// Параметры AI агента
///
/// Значения по умолчанию - из исходного геймдизайна (юниты = метры).
/// Проверяются `validate()` при спавне, в runtime не меняются.
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AIConfig {
    /// Радиус обнаружения целей (perception query)
    pub detection_radius: f32,
    /// Половина угла обзора (градусы). 100° = конус ~200°, почти круговой обзор -
    /// оставлено как есть, сверять с дизайном
    pub fov_half_angle_degrees: f32,
    /// Высота глаз над pivot'ом агента (начало LOS луча)
    pub eye_height: f32,
    /// Дистанция, с которой Chase переходит в Attack
    pub attack_range: f32,
    /// Скорость патруля (м/с)
    pub patrol_speed: f32,
    /// Скорость преследования (м/с), строго больше patrol_speed
    pub pursuit_speed: f32,
    /// Пауза на waypoint'е (секунды)
    pub patrol_dwell_time: f32,
    /// Период perception опроса (секунды)
    pub perception_interval: f32,
    /// Сколько Investigate "осматривается" на месте звука (секунды)
    pub investigate_dwell_time: f32,
    /// Пауза между атаками (секунды)
    pub attack_cooldown: f32,
    /// Радиус слышимости выстрела агента (0 = атаки бесшумные)
    pub gunfire_radius: f32,
    /// Радиус "тревоги" соседям при реакции на звук из Patrol (None = молчит)
    pub alert_call_radius: Option<f32>,
    /// Разброс услышанной позиции (метры, неуверенность слуха)
    pub sound_jitter: f32,
    /// Кого perception считает целью
    pub target_layers: QueryLayers,
    /// Что блокирует line-of-sight
    pub obstacle_layers: QueryLayers,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self {
            detection_radius: 40.0,
            fov_half_angle_degrees: 100.0,
            eye_height: 1.6,
            attack_range: 50.0,
            patrol_speed: 3.0,
            pursuit_speed: 5.0,
            patrol_dwell_time: 2.0,
            perception_interval: 1.0,
            investigate_dwell_time: 3.0,
            attack_cooldown: 1.0,
            gunfire_radius: 40.0,
            alert_call_radius: None,
            sound_jitter: 0.0,
            target_layers: QueryLayers::TARGETS,
            obstacle_layers: QueryLayers::OBSTACLES,
        }
    }
}

impl AIConfig {
    /// Загрузка из TOML (отсутствующие поля берутся из Default)
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("detection_radius", self.detection_radius),
            ("attack_range", self.attack_range),
            ("patrol_speed", self.patrol_speed),
            ("pursuit_speed", self.pursuit_speed),
            ("perception_interval", self.perception_interval),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("eye_height", self.eye_height),
            ("patrol_dwell_time", self.patrol_dwell_time),
            ("investigate_dwell_time", self.investigate_dwell_time),
            ("attack_cooldown", self.attack_cooldown),
            ("gunfire_radius", self.gunfire_radius),
            ("sound_jitter", self.sound_jitter),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if let Some(radius) = self.alert_call_radius {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(ConfigError::NotPositive {
                    field: "alert_call_radius",
                    value: radius,
                });
            }
        }

        if self.pursuit_speed <= self.patrol_speed {
            return Err(ConfigError::PursuitNotFaster {
                patrol: self.patrol_speed,
                pursuit: self.pursuit_speed,
            });
        }

        let fov = self.fov_half_angle_degrees;
        if !fov.is_finite() || fov <= 0.0 || fov > 180.0 {
            return Err(ConfigError::FovOutOfRange(fov));
        }

        if self.target_layers.is_empty() {
            return Err(ConfigError::EmptyLayers("target"));
        }

        // Иначе луч LOS упирается в саму цель
        if self.obstacle_layers.intersects(self.target_layers) {
            return Err(ConfigError::ObstaclesOverlapTargets {
                obstacles: self.obstacle_layers.0,
                targets: self.target_layers.0,
            });
        }

        Ok(())
    }

    pub fn fov_half_angle_radians(&self) -> f32 {
        self.fov_half_angle_degrees.to_radians()
    }
}
