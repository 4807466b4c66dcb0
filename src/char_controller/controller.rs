//! The per-tick character controller.
//!
//! Each fixed tick runs two swept moves:
//!
//! 1. A horizontal move (along the ground tangent when grounded), which detects walls.
//! 2. A vertical move driven by gravity, which detects ground.
//!
//! Between the two, the [`JumpGate`] decides whether a jump fires. Contact classification is
//! redone from scratch every tick; there is no persistent mode beyond the flags in [`CharacterState`].
use super::contact::{ContactKind, Phase, classify};
use super::jump::JumpGate;
use super::settings::MovementSettings;
use super::smoothing::smooth_damp;
use super::sweep::{ContactBuffer, LOOKAHEAD, ShapeCaster, clip_velocity, sweep};
use bevy::prelude::*;

/// Horizontal input below this magnitude counts as no input.
pub const AXIS_DEADZONE: f32 = 0.1;

/// Receives the character's death. Implemented by whatever owns the level or session.
pub trait LevelSink {
    fn player_died(&mut self);
}

/// Everything the controller remembers between ticks. Reset wholesale on spawn.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct CharacterState {
    /// Linear velocity in units per second.
    pub velocity: Vec2,
    /// Rate state of the air-control damper.
    pub velocity_x_ref: f32,

    pub grounded: bool,
    /// Normal of the last ground contact.
    pub ground_normal: Vec2,

    pub wall_sliding: bool,
    /// Horizontal component of the last wall contact normal. Points away from the wall.
    pub wall_normal_x: f32,
    /// Whether the last support that reset the coyote window was a wall rather than ground.
    /// Decides the jump direction even after support is gone.
    pub last_was_wall: bool,

    pub gate: JumpGate,

    /// Seconds left on the post-wall-jump push.
    pub force_move_timer: f32,
    /// Direction of the post-wall-jump push.
    pub force_move_x: f32,

    pub dead: bool,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            velocity_x_ref: 0.0,
            grounded: false,
            ground_normal: Vec2::ZERO,
            wall_sliding: false,
            wall_normal_x: 0.0,
            last_was_wall: false,
            gate: JumpGate::default(),
            force_move_timer: 0.0,
            force_move_x: 0.0,
            dead: false,
        }
    }
}

/// A summary of [`CharacterState`]'s contact flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum ContactState {
    Airborne,
    Grounded,
    WallSliding,
    Dead,
}

impl CharacterState {
    pub fn contact_state(&self) -> ContactState {
        if self.dead {
            ContactState::Dead
        } else if self.grounded {
            ContactState::Grounded
        } else if self.wall_sliding {
            ContactState::WallSliding
        } else {
            ContactState::Airborne
        }
    }

    fn jump(&mut self, settings: &MovementSettings) {
        if self.last_was_wall {
            let angle = settings.wall_jump_radians();
            let away = self.wall_normal_x.signum();
            self.velocity.x += away * angle.cos() * settings.jump_speed;
            self.velocity.y = angle.sin() * settings.jump_speed;

            self.force_move_timer = settings.wall_jump_duration;
            self.force_move_x = away;
            debug!("wall jump away from {away}");
        } else {
            self.velocity.y = settings.jump_speed;
            debug!("ground jump");
        }
        self.gate.suppress();
    }
}

/// Input latched between a frame's sampling and the fixed tick that consumes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct LatchedInput {
    /// Movement axis; only `x` is used.
    pub axis: Vec2,
    /// Jump was pressed since the last tick.
    pub jump: bool,
}

/// A kinematic platformer character.
///
/// Call [`press_jump`](Self::press_jump) and [`set_axis`](Self::set_axis) at frame rate,
/// then [`tick`](Self::tick) once per fixed step.
#[derive(Component, Clone, Debug, Default, Reflect)]
#[reflect(Component, Debug)]
pub struct CharacterController {
    state: CharacterState,
    input: LatchedInput,
    #[reflect(ignore)]
    contacts: ContactBuffer,
}

impl CharacterController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    pub fn input(&self) -> &LatchedInput {
        &self.input
    }

    pub fn velocity(&self) -> Vec2 {
        self.state.velocity
    }

    pub fn is_dead(&self) -> bool {
        self.state.dead
    }

    pub fn contact_state(&self) -> ContactState {
        self.state.contact_state()
    }

    /// Latches the movement axis for the next tick.
    pub fn set_axis(&mut self, axis: Vec2) {
        if self.state.dead {
            return;
        }
        self.input.axis = axis;
    }

    /// Latches a jump press for the next tick and starts the jump buffer window.
    pub fn press_jump(&mut self) {
        if self.state.dead {
            return;
        }
        self.input.jump = true;
        self.state.gate.mark_pressed();
    }

    /// Advances the character by one fixed step of `dt` seconds, moving `position` in place.
    ///
    /// `gravity` is the vertical acceleration (negative pulls down).
    pub fn tick(
        &mut self,
        position: &mut Vec2,
        dt: f32,
        gravity: f32,
        settings: &MovementSettings,
        caster: &impl ShapeCaster,
    ) {
        let Self {
            state,
            input,
            contacts,
        } = self;

        if state.dead {
            *input = LatchedInput::default();
            state.gate.reset();
            return;
        }

        // horizontal
        state.wall_sliding = false;
        let pushing = input.axis.x.abs() > AXIS_DEADZONE;

        let motion = if state.grounded {
            state.velocity.x *= 1.0 - settings.ground_friction;
            if pushing {
                state.velocity.x = input.axis.x * settings.move_speed;
            }
            state.velocity_x_ref = 0.0;

            let tangent = Vec2::new(state.ground_normal.y, -state.ground_normal.x);
            tangent * state.velocity.x * dt
        } else {
            if pushing {
                let heading = if state.force_move_timer > 0.0 {
                    state.force_move_x
                } else {
                    input.axis.x
                };
                state.velocity.x = smooth_damp(
                    state.velocity.x,
                    settings.move_speed * heading,
                    &mut state.velocity_x_ref,
                    settings.air_acceleration_time,
                    dt,
                );
            }
            Vec2::new(state.velocity.x * dt, 0.0)
        };
        state.force_move_timer -= dt;

        let horizontal = sweep(caster, *position, motion, LOOKAHEAD, contacts);
        for contact in contacts.iter() {
            let mut normal = contact.normal;
            if classify(normal, Phase::Horizontal, state.grounded) == ContactKind::Wall {
                state.wall_sliding = true;
                state.last_was_wall = true;
                state.gate.mark_supported();
                state.wall_normal_x = normal.x;
                // walls only stop horizontal movement
                normal.y = 0.0;
            }
            state.velocity = clip_velocity(state.velocity, normal);
        }
        *position += horizontal.offset();

        let supported = state.grounded || state.wall_sliding;
        if state.gate.should_jump(input.jump, supported, settings) {
            state.jump(settings);
        }

        // vertical
        state.grounded = false;
        state.velocity.y += gravity * dt;

        let into_wall = pushing && input.axis.x.signum() == -state.wall_normal_x.signum();
        if state.wall_sliding && state.velocity.y < 0.0 && into_wall {
            state.velocity.y *= settings.wall_slide_damping;
        }

        let motion = Vec2::new(0.0, state.velocity.y * dt);
        let vertical = sweep(caster, *position, motion, LOOKAHEAD, contacts);
        for contact in contacts.iter() {
            let mut normal = contact.normal;
            if classify(normal, Phase::Vertical, false) == ContactKind::Ground {
                state.grounded = true;
                state.last_was_wall = false;
                state.gate.mark_supported();
                state.ground_normal = normal;
                // ground only stops vertical movement
                normal.x = 0.0;
            }
            state.velocity = clip_velocity(state.velocity, normal);
        }
        *position += vertical.offset();

        // landing ends a wall slide
        if state.grounded {
            state.wall_sliding = false;
        }

        input.jump = false;
        state.gate.advance();
    }

    /// Kills the character, notifying `level` the first time only.
    /// Returns whether this call caused the death.
    pub fn die(&mut self, level: &mut impl LevelSink) -> bool {
        if self.state.dead {
            return false;
        }
        self.state.dead = true;
        debug!("character died");
        level.player_died();
        true
    }

    /// Places the character at `location` with a completely fresh state.
    pub fn spawn(&mut self, position: &mut Vec2, location: Vec2) {
        *position = location;
        self.state = CharacterState::default();
        self.input = LatchedInput::default();
        self.contacts.clear();
        debug!("character spawned at {location}");
    }
}
