//! The player entity and the fixed-step systems that drive its [`CharacterController`].
use crate::char_controller::prelude::*;
use crate::level::{Hazard, LevelSettings, PlayerDied};
use crate::physics::{ColliderShape, GameLayer, SpatialCaster, ground_filter, hazard_filter};
use avian2d::prelude::*;
use bevy::prelude::*;
use bevy_transform_interpolation::prelude::TranslationInterpolation;

/// Marker for the player character. Also the input context its actions are bound to.
#[derive(Component, Default, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Fixed-step ordering of the character systems.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerSystems {
    /// Run the movement tick.
    Move,
    /// Look for hazards at the new position.
    Hazards,
}

/// Fired when a character overlaps something deadly.
#[derive(EntityEvent, Debug, Clone, Copy)]
pub struct TouchedHazard {
    pub entity: Entity,
}

/// Everything a controllable character needs, minus input bindings.
pub fn character_bundle(settings: MovementSettings, shape: ColliderShape, at: Vec2) -> impl Bundle {
    (
        CharacterController::new(),
        settings,
        RigidBody::Kinematic,
        Collider::from(shape),
        CollisionLayers::new(GameLayer::Player, [GameLayer::Ground, GameLayer::Hazard]),
        Transform::from_translation(at.extend(1.0)),
        TranslationInterpolation,
    )
}

/// Sends deaths to whoever observes [`PlayerDied`].
struct DeathNotifier<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    player: Entity,
}

impl LevelSink for DeathNotifier<'_, '_, '_> {
    fn player_died(&mut self) {
        self.commands.trigger(PlayerDied {
            player: self.player,
        });
    }
}

fn move_characters(
    time: Res<Time>,
    gravity: Res<Gravity>,
    spatial_query: SpatialQuery,
    mut characters: Query<(
        Entity,
        &Collider,
        &Rotation,
        &MovementSettings,
        &mut CharacterController,
        &mut Position,
    )>,
) {
    let dt = time.delta_secs();
    for (entity, collider, rotation, settings, mut controller, mut position) in
        characters.iter_mut()
    {
        let filter = ground_filter(entity);
        let caster = SpatialCaster {
            spatial_query: &spatial_query,
            shape: collider,
            rotation: rotation.as_radians(),
            filter: &filter,
        };
        let mut new_position = position.0;
        controller.tick(&mut new_position, dt, gravity.0.y, settings, &caster);
        if new_position != position.0 {
            position.0 = new_position;
        }
    }
}

fn detect_hazards(
    mut commands: Commands,
    spatial_query: SpatialQuery,
    level: Res<LevelSettings>,
    hazards: Query<(), With<Hazard>>,
    characters: Query<(Entity, &Collider, &Rotation, &Position, &CharacterController)>,
) {
    for (entity, collider, rotation, position, controller) in characters.iter() {
        if controller.is_dead() {
            continue;
        }
        let fell_out = position.y < level.kill_height;
        let touching = spatial_query
            .shape_intersections(collider, position.0, rotation.as_radians(), &hazard_filter(entity))
            .into_iter()
            .any(|hit| hazards.contains(hit));
        if fell_out || touching {
            commands.trigger(TouchedHazard { entity });
        }
    }
}

fn kill_on_hazard(
    touched: On<TouchedHazard>,
    mut commands: Commands,
    mut characters: Query<&mut CharacterController>,
) {
    let player = touched.event().entity;
    let Ok(mut controller) = characters.get_mut(player) else {
        return;
    };
    controller.die(&mut DeathNotifier {
        commands: &mut commands,
        player,
    });
}

/// Runs character controllers every fixed step. Needs avian's physics plugins and a [`LevelSettings`].
pub struct CharacterControllerPlugin;

impl Plugin for CharacterControllerPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LevelSettings>()
            .configure_sets(
                FixedUpdate,
                (ControllerSystems::Move, ControllerSystems::Hazards).chain(),
            )
            .add_systems(
                FixedUpdate,
                (
                    move_characters.in_set(ControllerSystems::Move),
                    detect_hazards.in_set(ControllerSystems::Hazards),
                ),
            )
            .add_observer(kill_on_hazard);
    }
}

pub(crate) fn plugin(app: &mut App) {
    app.add_plugins(CharacterControllerPlugin);
}
