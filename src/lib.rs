// Support configuring Bevy lints within code.
#![cfg_attr(bevy_lint, feature(register_tool), register_tool(bevy))]

pub mod camera;
pub mod char_controller;
pub mod config;
#[cfg(feature = "dev")]
mod dev_tools;
pub mod input;
pub mod level;
pub mod physics;
pub mod player;

use bevy::{asset::AssetMetaCheck, prelude::*};

pub struct AppPlugin;

impl Plugin for AppPlugin {
    fn build(&self, app: &mut App) {
        // Add Bevy plugins.
        app.add_plugins(
            DefaultPlugins
                .set(AssetPlugin {
                    // Wasm builds will check for meta files (that don't exist) if this isn't set.
                    // This causes errors and even panics on web build on itch.
                    // See https://github.com/bevyengine/bevy_github_ci_template/issues/48.
                    meta_check: AssetMetaCheck::Never,
                    ..default()
                })
                .set(WindowPlugin {
                    primary_window: Window {
                        title: "Wallhop".to_string(),
                        fit_canvas_to_parent: true,
                        ..default()
                    }
                    .into(),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        );

        // Add other plugins.
        app.add_plugins((
            physics::plugin,
            input::plugin,
            player::plugin,
            level::plugin,
            camera::plugin,
            #[cfg(feature = "dev")]
            dev_tools::plugin,
        ));

        app.insert_resource(Time::<Fixed>::from_hz(FIXED_UPDATE_HZ));
    }
}

/// Simulation rate of the character controllers.
pub const FIXED_UPDATE_HZ: f64 = 60.0;
