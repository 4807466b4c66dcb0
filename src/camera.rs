use crate::char_controller::prelude::*;
use crate::player::Player;
use bevy::{math::StableInterpolate, prelude::*};

/// A camera that trails the player, looking ahead in the direction it moves.
#[derive(Component, Reflect, Clone, Copy, Debug)]
#[reflect(Component)]
pub struct FollowCamera {
    /// Seconds of player velocity to lead the target by.
    pub look_ahead: f32,
    /// Exponential decay rate toward the target; higher is snappier.
    pub decay: f32,
    /// Never look further below the player than this.
    pub max_drop: f32,
}

impl Default for FollowCamera {
    fn default() -> Self {
        Self {
            look_ahead: 0.3,
            decay: 6.0,
            max_drop: 2.0,
        }
    }
}

impl FollowCamera {
    pub fn target(&self, position: Vec2, velocity: Vec2) -> Vec2 {
        let lead = velocity * self.look_ahead;
        position + Vec2::new(lead.x, lead.y.max(-self.max_drop))
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("Camera"),
        Camera2d,
        Projection::Orthographic(OrthographicProjection {
            scale: 1.0 / 40.0,
            ..OrthographicProjection::default_2d()
        }),
        FollowCamera::default(),
    ));
}

pub fn follow_player(
    time: Res<Time>,
    player: Single<(&Transform, &CharacterController), (With<Player>, Without<FollowCamera>)>,
    camera: Single<(&mut Transform, &FollowCamera)>,
) {
    let (player_transform, controller) = player.into_inner();
    let (mut transform, follow) = camera.into_inner();

    let target = follow.target(player_transform.translation.xy(), controller.velocity());
    let z = transform.translation.z;
    transform
        .translation
        .smooth_nudge(&target.extend(z), follow.decay, time.delta_secs());
}

pub(crate) fn plugin(app: &mut App) {
    app.add_systems(Startup, spawn_camera)
        .add_systems(PostUpdate, follow_player);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leads_horizontally_and_caps_the_drop() {
        let follow = FollowCamera::default();
        let target = follow.target(Vec2::new(1.0, 2.0), Vec2::new(10.0, -30.0));
        assert_eq!(target, Vec2::new(4.0, 0.0));
    }

    #[test]
    fn stationary_player_is_centered() {
        let follow = FollowCamera::default();
        assert_eq!(follow.target(Vec2::new(3.0, -1.0), Vec2::ZERO), Vec2::new(3.0, -1.0));
    }
}
