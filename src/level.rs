//! The level/session: demo geometry, the spawn point, and respawning after death.
use crate::char_controller::prelude::*;
use crate::config::{SettingsError, Validate, load_ron_or_default};
use crate::input::player_actions;
use crate::physics::{ColliderShape, GameLayer};
use crate::player::{ControllerSystems, Player, character_bundle};
use avian2d::prelude::*;
use bevy::prelude::*;
use bevy_transform_interpolation::TranslationEasingState;
use serde::{Deserialize, Serialize};

const LEVEL_SETTINGS_PATH: &str = "assets/settings/level.ron";
const MOVEMENT_SETTINGS_PATH: &str = "assets/settings/movement.ron";

/// Notification that a character died. Triggered exactly once per death.
#[derive(Event, Debug, Clone, Copy)]
pub struct PlayerDied {
    pub player: Entity,
}

#[derive(Resource, Clone, Debug, PartialEq, Reflect, Deserialize, Serialize)]
#[reflect(Resource)]
#[serde(default)]
pub struct LevelSettings {
    pub spawn_point: Vec2,
    /// Seconds between death and respawn.
    pub respawn_delay: f32,
    /// Characters below this height count as having touched a hazard.
    pub kill_height: f32,
    pub player_shape: ColliderShape,
}

impl Default for LevelSettings {
    fn default() -> Self {
        Self {
            spawn_point: Vec2::new(-6.0, 2.0),
            respawn_delay: 1.0,
            kill_height: -20.0,
            player_shape: ColliderShape::default(),
        }
    }
}

impl Validate for LevelSettings {
    fn validate(&self) -> Result<(), SettingsError> {
        if self.respawn_delay.is_nan() || self.respawn_delay < 0.0 {
            return Err(SettingsError::Invalid {
                field: "respawn_delay",
                reason: "must not be negative",
            });
        }
        if self.spawn_point.y <= self.kill_height {
            return Err(SettingsError::Invalid {
                field: "spawn_point",
                reason: "must be above kill_height",
            });
        }
        Ok(())
    }
}

/// Deaths so far and any pending respawn.
#[derive(Resource, Debug, Default, Reflect)]
#[reflect(Resource)]
pub struct Session {
    pub deaths: u32,
    respawns: Vec<(Entity, Timer)>,
}

impl Session {
    pub fn pending_respawns(&self) -> usize {
        self.respawns.len()
    }
}

fn record_death(died: On<PlayerDied>, mut session: ResMut<Session>, level: Res<LevelSettings>) {
    let player = died.event().player;
    session.deaths += 1;
    info!("player {player} died ({} deaths)", session.deaths);
    session.respawns.push((
        player,
        Timer::from_seconds(level.respawn_delay, TimerMode::Once),
    ));
}

fn respawn_players(
    time: Res<Time>,
    level: Res<LevelSettings>,
    mut session: ResMut<Session>,
    mut players: Query<(
        &mut CharacterController,
        &mut Position,
        Option<&mut TranslationEasingState>,
    )>,
) {
    let delta = time.delta();
    session.respawns.retain_mut(|(player, timer)| {
        timer.tick(delta);
        if !timer.is_finished() {
            return true;
        }
        let Ok((mut controller, mut position, easing)) = players.get_mut(*player) else {
            warn!("player {player} despawned before it could respawn");
            return false;
        };
        controller.spawn(&mut position.0, level.spawn_point);
        // a teleport, don't ease from the death point
        if let Some(mut easing) = easing {
            *easing = TranslationEasingState::default();
        }
        info!("player {player} respawned at {}", level.spawn_point);
        false
    });
}

fn spawn_player(mut commands: Commands, level: Res<LevelSettings>) {
    let settings: MovementSettings = load_ron_or_default(MOVEMENT_SETTINGS_PATH);
    commands.spawn((
        Name::new("Player"),
        Player,
        character_bundle(settings, level.player_shape, level.spawn_point),
        Sprite::from_color(Color::srgb(0.95, 0.75, 0.3), player_size(level.player_shape)),
        player_actions(),
    ));
}

fn player_size(shape: ColliderShape) -> Vec2 {
    match shape {
        ColliderShape::Ball(radius) => Vec2::splat(radius * 2.0),
        ColliderShape::Cuboid(w, h) => Vec2::new(w, h),
        ColliderShape::Capsule(radius, length) => Vec2::new(radius * 2.0, length + radius * 2.0),
    }
}

fn block(name: &'static str, center: Vec2, size: Vec2) -> impl Bundle {
    (
        Name::new(name),
        Sprite::from_color(Color::srgb(0.35, 0.38, 0.45), size),
        Transform::from_translation(center.extend(0.0)),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]),
    )
}

fn spikes(center: Vec2, width: f32) -> impl Bundle {
    let size = Vec2::new(width, 0.4);
    (
        Name::new("Spikes"),
        Hazard,
        Sprite::from_color(Color::srgb(0.85, 0.2, 0.2), size),
        Transform::from_translation(center.extend(0.0)),
        RigidBody::Static,
        Collider::rectangle(size.x, size.y),
        Sensor,
        CollisionLayers::new(GameLayer::Hazard, [GameLayer::Player]),
    )
}

/// Marks a collider as deadly to touch. Only counted on the [`GameLayer::Hazard`] layer.
#[derive(Component, Default, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
pub struct Hazard;

fn spawn_level(mut commands: Commands) {
    commands.spawn(block("Floor", Vec2::new(-4.0, -0.5), Vec2::new(16.0, 1.0)));
    commands.spawn(block("Far floor", Vec2::new(12.0, -0.5), Vec2::new(8.0, 1.0)));
    commands.spawn(spikes(Vec2::new(6.0, -2.8), 8.0));

    // a shaft to wall-jump up
    commands.spawn(block("Left wall", Vec2::new(-12.5, 5.0), Vec2::new(1.0, 12.0)));
    commands.spawn(block("Shaft wall", Vec2::new(-8.5, 7.0), Vec2::new(1.0, 10.0)));

    commands.spawn((
        Name::new("Ramp"),
        Sprite::from_color(Color::srgb(0.35, 0.38, 0.45), Vec2::new(6.0, 0.5)),
        Transform::from_xyz(1.0, 0.6, 0.0).with_rotation(Quat::from_rotation_z(0.35)),
        RigidBody::Static,
        Collider::rectangle(6.0, 0.5),
        CollisionLayers::new(GameLayer::Ground, [GameLayer::Player]),
    ));
    commands.spawn(block("Ledge", Vec2::new(13.0, 3.5), Vec2::new(3.0, 0.5)));
}

pub(crate) fn plugin(app: &mut App) {
    let settings: LevelSettings = load_ron_or_default(LEVEL_SETTINGS_PATH);
    app.insert_resource(settings)
        .init_resource::<Session>()
        .add_systems(Startup, (spawn_level, spawn_player))
        .add_systems(FixedUpdate, respawn_players.after(ControllerSystems::Hazards))
        .add_observer(record_death);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::char_controller::testing::DeathCounter;
    use bevy::time::TimeUpdateStrategy;
    use std::time::Duration;

    const FIXED_UPDATE_HZ: f64 = 60.0;

    fn session_app(respawn_delay: f32) -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / FIXED_UPDATE_HZ,
        )));
        app.insert_resource(Time::<Fixed>::from_hz(FIXED_UPDATE_HZ));
        app.insert_resource(LevelSettings {
            spawn_point: Vec2::new(-2.0, 5.0),
            respawn_delay,
            ..default()
        });
        app.init_resource::<Session>();
        app.add_systems(FixedUpdate, respawn_players);
        app.add_observer(record_death);
        app
    }

    fn spawn_dead_player(app: &mut App, at: Vec2) -> Entity {
        let mut controller = CharacterController::new();
        controller.die(&mut DeathCounter::default());
        app.world_mut()
            .spawn((
                controller,
                Position(at),
                TranslationEasingState {
                    start: Some(at.extend(1.0)),
                    end: Some(at.extend(1.0)),
                },
            ))
            .id()
    }

    fn run_frames(app: &mut App, frames: usize) {
        for _ in 0..frames {
            app.update();
        }
    }

    #[test]
    fn death_respawns_at_spawn_point_after_delay() {
        let mut app = session_app(0.5);
        let player = spawn_dead_player(&mut app, Vec2::new(8.0, -25.0));

        app.world_mut().trigger(PlayerDied { player });
        assert_eq!(app.world().resource::<Session>().deaths, 1);
        assert_eq!(app.world().resource::<Session>().pending_respawns(), 1);

        // well short of the delay
        run_frames(&mut app, 10);
        assert_eq!(app.world().resource::<Session>().pending_respawns(), 1);
        assert!(app.world().get::<CharacterController>(player).unwrap().is_dead());

        run_frames(&mut app, 60);
        let session = app.world().resource::<Session>();
        assert_eq!(session.deaths, 1);
        assert_eq!(session.pending_respawns(), 0);

        let world = app.world();
        assert_eq!(world.get::<Position>(player).unwrap().0, Vec2::new(-2.0, 5.0));
        let controller = world.get::<CharacterController>(player).unwrap();
        assert_eq!(*controller.state(), CharacterState::default());
        assert_eq!(
            *world.get::<TranslationEasingState>(player).unwrap(),
            TranslationEasingState::default()
        );
    }

    #[test]
    fn despawned_player_is_dropped_from_respawns() {
        let mut app = session_app(0.2);
        let player = spawn_dead_player(&mut app, Vec2::new(0.0, -25.0));

        app.world_mut().trigger(PlayerDied { player });
        app.world_mut().despawn(player);
        run_frames(&mut app, 60);

        let session = app.world().resource::<Session>();
        assert_eq!(session.deaths, 1);
        assert_eq!(session.pending_respawns(), 0);
    }

    #[test]
    fn default_level_settings_are_valid() {
        assert!(LevelSettings::default().validate().is_ok());
    }

    #[test]
    fn spawn_below_kill_height_is_rejected() {
        let settings = LevelSettings {
            spawn_point: Vec2::new(0.0, -30.0),
            ..default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn shipped_level_settings_load() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/settings/level.ron");
        let settings = crate::config::load_ron::<LevelSettings>(path).expect("shipped level should load");
        assert_eq!(settings.respawn_delay, 1.0);
    }
}
