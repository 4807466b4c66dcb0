//! Per-character movement tuning.
use crate::config::{SettingsError, Validate};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Immutable tuning constants for one character. Loaded once and never mutated during simulation.
#[derive(Component, Clone, Debug, PartialEq, Reflect, Deserialize, Serialize)]
#[reflect(Component, Debug, PartialEq)]
#[serde(default)]
pub struct MovementSettings {
    /// Upward speed of a ground jump, and the magnitude of a wall jump.
    pub jump_speed: f32,
    /// Ticks after leaving a surface during which a jump press still counts.
    pub coyote_frames: u32,
    /// Ticks a jump press is remembered before landing.
    pub jump_ahead_frames: u32,

    /// Horizontal target speed.
    pub move_speed: f32,
    /// Smoothing time of horizontal air control, in seconds.
    pub air_acceleration_time: f32,
    /// Fraction of horizontal velocity lost per tick while grounded.
    pub ground_friction: f32,

    /// Multiplier applied to falling speed each tick while pushing into a wall.
    pub wall_slide_damping: f32,
    /// Wall jump launch angle above the horizontal, in degrees.
    pub wall_jump_angle: f32,
    /// Seconds after a wall jump during which air control is forced away from the wall.
    pub wall_jump_duration: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            jump_speed: 13.0,
            coyote_frames: 6,
            jump_ahead_frames: 6,
            move_speed: 7.0,
            air_acceleration_time: 0.12,
            ground_friction: 0.05,
            wall_slide_damping: 0.9,
            wall_jump_angle: 60.0,
            wall_jump_duration: 0.2,
        }
    }
}

impl MovementSettings {
    pub fn wall_jump_radians(&self) -> f32 {
        self.wall_jump_angle.to_radians()
    }
}

impl Validate for MovementSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |field, reason| Err(SettingsError::Invalid { field, reason });

        if !non_negative(self.jump_speed) {
            return invalid("jump_speed", "must not be negative");
        }
        if !non_negative(self.move_speed) {
            return invalid("move_speed", "must not be negative");
        }
        if !non_negative(self.air_acceleration_time) {
            return invalid("air_acceleration_time", "must not be negative");
        }
        if !non_negative(self.wall_jump_duration) {
            return invalid("wall_jump_duration", "must not be negative");
        }
        if !(0.0..=1.0).contains(&self.ground_friction) {
            return invalid("ground_friction", "must be between 0 and 1");
        }
        if !(0.0..=1.0).contains(&self.wall_slide_damping) {
            return invalid("wall_slide_damping", "must be between 0 and 1");
        }
        if !(0.0..=90.0).contains(&self.wall_jump_angle) {
            return invalid("wall_jump_angle", "must be between 0 and 90 degrees");
        }
        Ok(())
    }
}

/// `false` for NaN as well as negative values.
fn non_negative(value: f32) -> bool {
    value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(MovementSettings::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cases = [
            MovementSettings {
                jump_speed: -1.0,
                ..default()
            },
            MovementSettings {
                wall_jump_duration: -0.1,
                ..default()
            },
            MovementSettings {
                ground_friction: 1.5,
                ..default()
            },
            MovementSettings {
                wall_slide_damping: f32::NAN,
                ..default()
            },
            MovementSettings {
                wall_jump_angle: 120.0,
                ..default()
            },
        ];
        for settings in cases {
            assert!(
                matches!(settings.validate(), Err(SettingsError::Invalid { .. })),
                "{settings:?} should be rejected"
            );
        }
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let settings: MovementSettings =
            ron::de::from_str("(jump_speed: 20.0, coyote_frames: 3)").unwrap();
        assert_eq!(settings.jump_speed, 20.0);
        assert_eq!(settings.coyote_frames, 3);
        assert_eq!(settings.ground_friction, 0.05);
    }
}
