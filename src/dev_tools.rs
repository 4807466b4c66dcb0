//! Development tools for the game. This plugin is only enabled in dev builds.

use crate::char_controller::prelude::*;
use avian2d::prelude::{PhysicsDebugPlugin, PhysicsGizmos};
use bevy::{
    ecs::entity::EntityHashMap, input::common_conditions::input_just_pressed, prelude::*,
};
use bevy_inspector_egui::bevy_egui::EguiPlugin;

pub(super) fn plugin(app: &mut App) {
    // Log contact state changes of every character.
    app.add_systems(FixedPostUpdate, log_contact_transitions);

    // Toggle the collider overlay.
    app.add_systems(
        Update,
        toggle_physics_gizmos.run_if(input_just_pressed(TOGGLE_KEY)),
    );
    //inspect stuff and things
    app.add_plugins((
        EguiPlugin::default(),
        bevy_inspector_egui::quick::WorldInspectorPlugin::new(),
        PhysicsDebugPlugin::default(),
    ));
}

const TOGGLE_KEY: KeyCode = KeyCode::Backquote;

fn toggle_physics_gizmos(mut store: ResMut<GizmoConfigStore>) {
    let (config, _) = store.config_mut::<PhysicsGizmos>();
    config.enabled = !config.enabled;
}

fn log_contact_transitions(
    mut last: Local<EntityHashMap<ContactState>>,
    characters: Query<(Entity, &CharacterController), Changed<CharacterController>>,
) {
    for (entity, controller) in characters.iter() {
        let state = controller.contact_state();
        if last.insert(entity, state) != Some(state) {
            debug!("{entity}: {state:?}");
        }
    }
}
