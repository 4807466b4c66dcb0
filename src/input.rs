//! Input sampling. Runs at frame rate and latches into the [`CharacterController`],
//! which consumes it on the next fixed tick.
use crate::char_controller::prelude::*;
use crate::player::Player;
use bevy::prelude::*;
use bevy_enhanced_input::prelude::*;

#[derive(InputAction)]
#[action_output(f32)]
pub struct Move;

#[derive(InputAction)]
#[action_output(bool)]
pub struct Jump;

/// Default bindings for the [`Player`] context.
pub fn player_actions() -> impl Bundle {
    actions!(Player[
        (
            Action::<Move>::new(),
            bindings![
                KeyCode::KeyD,
                KeyCode::ArrowRight,
                (KeyCode::KeyA, Negate::all()),
                (KeyCode::ArrowLeft, Negate::all()),
                GamepadAxis::LeftStickX,
            ],
        ),
        (
            Action::<Jump>::new(),
            bindings![KeyCode::Space, KeyCode::KeyW, GamepadButton::South],
        ),
    ])
}

fn record_move(movement: On<Fire<Move>>, mut controllers: Query<&mut CharacterController>) {
    let Ok(mut controller) = controllers.get_mut(movement.context) else {
        return;
    };
    controller.set_axis(Vec2::new(movement.value, 0.0));
}

fn release_move(movement: On<Complete<Move>>, mut controllers: Query<&mut CharacterController>) {
    let Ok(mut controller) = controllers.get_mut(movement.context) else {
        return;
    };
    controller.set_axis(Vec2::ZERO);
}

fn record_jump(jump: On<Start<Jump>>, mut controllers: Query<&mut CharacterController>) {
    let Ok(mut controller) = controllers.get_mut(jump.context) else {
        return;
    };
    controller.press_jump();
}

pub(crate) fn plugin(app: &mut App) {
    app.add_plugins(EnhancedInputPlugin)
        .add_input_context::<Player>()
        .add_observer(record_move)
        .add_observer(release_move)
        .add_observer(record_jump);
}
