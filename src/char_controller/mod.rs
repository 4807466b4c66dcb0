//! Kinematic platformer character controller.
//!
//! Everything in here is engine-agnostic: the controller only talks to the world through
//! [`ShapeCaster`](sweep::ShapeCaster) and to its owner through [`LevelSink`](controller::LevelSink).
//! The avian2d glue lives in [`crate::physics`] and the ECS systems in [`crate::player`].

pub mod contact;
pub mod controller;
pub mod jump;
pub mod settings;
pub mod smoothing;
pub mod sweep;
#[cfg(test)]
pub(crate) mod testing;

/// Re-exports common types related to character controller functionality.
pub mod prelude {
    pub use super::contact::{ContactKind, GROUND_THRESHOLD, Phase, classify};
    pub use super::controller::{
        AXIS_DEADZONE, CharacterController, CharacterState, ContactState, LatchedInput, LevelSink,
    };
    pub use super::jump::{JumpGate, RETRIGGER_FRAMES, UNSUPPORTED_FRAMES};
    pub use super::settings::MovementSettings;
    pub use super::sweep::{
        CONTACT_CAPACITY, Contact, ContactBuffer, LOOKAHEAD, ShapeCaster, Sweep, clip_velocity,
        project_velocity, sweep,
    };
}
