//! Test doubles for the controller's collaborators.
use super::controller::LevelSink;
use super::sweep::{Contact, ContactBuffer, ShapeCaster};
use bevy::{math::Dir2, prelude::*};

/// A world made of infinite half-planes, cast against as if the character were a point.
///
/// Each plane is `(normal, offset)`: the surface is `normal · p = offset` and everything on the
/// negative side of it is solid.
pub(crate) struct Planes(pub Vec<(Vec2, f32)>);

impl Planes {
    pub fn new(planes: impl IntoIterator<Item = (Vec2, f32)>) -> Self {
        Self(planes.into_iter().collect())
    }

    pub fn open_air() -> Self {
        Self(Vec::new())
    }

    pub fn floor(height: f32) -> Self {
        Self::new([(Vec2::Y, height)])
    }
}

impl ShapeCaster for Planes {
    fn cast(&self, origin: Vec2, direction: Dir2, max_distance: f32, hits: &mut ContactBuffer) {
        for &(normal, offset) in &self.0 {
            let approach = -direction.dot(normal);
            if approach <= 0.0 {
                continue;
            }
            let height = origin.dot(normal) - offset;
            let distance = (height / approach).max(0.0);
            if distance <= max_distance && !hits.push(Contact { distance, normal }) {
                return;
            }
        }
    }
}

/// Counts death notifications.
#[derive(Default)]
pub(crate) struct DeathCounter(pub u32);

impl LevelSink for DeathCounter {
    fn player_died(&mut self) {
        self.0 += 1;
    }
}
