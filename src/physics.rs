use crate::char_controller::sweep::{Contact, ContactBuffer, ShapeCaster};
use avian2d::math::Scalar;
use avian2d::prelude::*;
use bevy::{math::Dir2, prelude::*};
use serde::{Deserialize, Serialize};

/// Downward acceleration of the world, in units per second squared.
pub const GRAVITY: f32 = 30.0;

#[derive(PhysicsLayer, Clone, Copy, Debug, Default)]
pub enum GameLayer {
    #[default]
    Default,
    Player,
    Ground,
    Hazard,
}

#[derive(Clone, Copy, Debug, PartialEq, Reflect, Deserialize, Serialize)]
pub enum ColliderShape {
    Ball(f32),
    Cuboid(f32, f32),
    Capsule(f32, f32),
}

impl From<ColliderShape> for Collider {
    fn from(value: ColliderShape) -> Self {
        match value {
            ColliderShape::Ball(radius) => Collider::circle(radius),
            ColliderShape::Cuboid(w, h) => Collider::rectangle(w, h),
            ColliderShape::Capsule(radius, length) => Collider::capsule(radius, length),
        }
    }
}

impl Default for ColliderShape {
    fn default() -> Self {
        ColliderShape::Cuboid(0.8, 1.4)
    }
}

/// [`ShapeCaster`] backed by avian's spatial query pipeline.
///
/// Casts `shape` against solid ground only: sensors such as hazards live on their own layer
/// and the character's own collider is excluded through `filter`.
pub struct SpatialCaster<'a, 'w, 's> {
    pub spatial_query: &'a SpatialQuery<'w, 's>,
    pub shape: &'a Collider,
    pub rotation: Scalar,
    pub filter: &'a SpatialQueryFilter,
}

impl ShapeCaster for SpatialCaster<'_, '_, '_> {
    fn cast(&self, origin: Vec2, direction: Dir2, max_distance: f32, hits: &mut ContactBuffer) {
        let config = ShapeCastConfig::from_max_distance(max_distance);
        self.spatial_query.shape_hits_callback(
            self.shape,
            origin,
            self.rotation,
            direction,
            &config,
            self.filter,
            |hit| {
                hits.push(Contact {
                    distance: hit.distance,
                    normal: hit.normal1,
                })
            },
        );
    }
}

/// The filter a character uses to find solid geometry.
pub fn ground_filter(character: Entity) -> SpatialQueryFilter {
    SpatialQueryFilter::from_mask(GameLayer::Ground).with_excluded_entities([character])
}

/// The filter a character uses to find hazards it overlaps.
pub fn hazard_filter(character: Entity) -> SpatialQueryFilter {
    SpatialQueryFilter::from_mask(GameLayer::Hazard).with_excluded_entities([character])
}

pub(crate) fn plugin(app: &mut App) {
    app.add_plugins(PhysicsPlugins::default())
        .insert_resource(Gravity(Vec2::NEG_Y * GRAVITY));
}
