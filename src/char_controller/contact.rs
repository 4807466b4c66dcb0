//! Classification of contact normals into ground, wall, or neither.
use bevy::prelude::*;

/// A contact normal whose `y` exceeds this is walkable ground.
/// Anything flatter (in absolute value) counts as a wall during the horizontal phase.
pub const GROUND_THRESHOLD: f32 = 0.65;

/// The movement phase a contact was found in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum Phase {
    Horizontal,
    Vertical,
}

/// What a contact means for the character's support state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum ContactKind {
    Ground,
    Wall,
    Ignore,
}

/// Classifies a contact `normal` found during `phase`.
///
/// Vertical-phase contacts are only ever ground, and horizontal-phase contacts are only ever walls.
/// A grounded character never gets reclassified as touching a wall.
#[must_use]
pub fn classify(normal: Vec2, phase: Phase, already_grounded: bool) -> ContactKind {
    match phase {
        Phase::Vertical if normal.y > GROUND_THRESHOLD => ContactKind::Ground,
        Phase::Horizontal if normal.y.abs() < GROUND_THRESHOLD && !already_grounded => {
            ContactKind::Wall
        }
        _ => ContactKind::Ignore,
    }
}
