//! Swept movement: casting the character's shape along a motion vector and
//! clipping velocity against whatever it hits.
//!
//! See [`sweep`] and [`clip_velocity`].
use bevy::{math::Dir2, prelude::*};

/// Extra distance added to every cast and subtracted from every hit,
/// so the character always comes to rest a hair before geometry instead of touching it.
pub const LOOKAHEAD: f32 = 0.01;

/// Maximum number of contacts kept from a single cast. Further hits are dropped.
pub const CONTACT_CAPACITY: usize = 32;

/// A single hit reported by a [`ShapeCaster`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Reflect)]
pub struct Contact {
    /// Distance travelled along the cast direction before touching the surface.
    pub distance: f32,
    /// The outward surface normal of the thing that was hit.
    pub normal: Vec2,
}

/// Fixed-capacity contact storage reused across casts so the per-tick path never allocates.
#[derive(Clone, Debug)]
pub struct ContactBuffer {
    contacts: [Contact; CONTACT_CAPACITY],
    len: usize,
}

impl Default for ContactBuffer {
    fn default() -> Self {
        Self {
            contacts: [Contact::default(); CONTACT_CAPACITY],
            len: 0,
        }
    }
}

impl ContactBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logically empties the buffer.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Stores `contact`, returning `false` if the buffer is already full and the contact was dropped.
    /// Casters should stop reporting hits once this returns `false`.
    pub fn push(&mut self, contact: Contact) -> bool {
        let Some(slot) = self.contacts.get_mut(self.len) else {
            return false;
        };
        *slot = contact;
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == CONTACT_CAPACITY
    }

    pub fn as_slice(&self) -> &[Contact] {
        &self.contacts[..self.len]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.as_slice().iter()
    }
}

/// The collision query collaborator.
///
/// Implementors own the shape being cast (plus its rotation and layer filter) and report every
/// surface hit when that shape is moved from `origin` along `direction` for up to `max_distance`.
/// Hits may be pushed in any order.
pub trait ShapeCaster {
    fn cast(&self, origin: Vec2, direction: Dir2, max_distance: f32, hits: &mut ContactBuffer);
}

/// Result of a [`sweep`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sweep {
    /// Direction of the requested motion, or `None` if the motion had zero length.
    pub direction: Option<Dir2>,
    /// How far along `direction` it is safe to move.
    /// May be slightly negative when the shape starts closer than [`LOOKAHEAD`] to something,
    /// which backs it out again.
    pub distance: f32,
}

impl Sweep {
    pub const NONE: Self = Self {
        direction: None,
        distance: 0.0,
    };

    /// The displacement to apply to the shape's position.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.direction
            .map_or(Vec2::ZERO, |direction| direction * self.distance)
    }
}

/// Casts along `motion` and returns the longest safe sub-motion.
///
/// `contacts` is cleared and refilled with everything within `|motion| + lookahead`.
/// The allowed distance starts at `|motion|` and is clamped to `hit.distance - lookahead` for every hit,
/// so the shape never passes the nearest obstacle no matter how fast it is moving.
///
/// Zero-length motion short-circuits to no movement and no contacts.
#[must_use]
pub fn sweep(
    caster: &impl ShapeCaster,
    origin: Vec2,
    motion: Vec2,
    lookahead: f32,
    contacts: &mut ContactBuffer,
) -> Sweep {
    contacts.clear();
    let Ok((direction, length)) = Dir2::new_and_length(motion) else {
        return Sweep::NONE;
    };
    caster.cast(origin, direction, length + lookahead, contacts);

    let distance = contacts
        .iter()
        .fold(length, |allowed, hit| allowed.min(hit.distance - lookahead));

    Sweep {
        direction: Some(direction),
        distance,
    }
}

/// Removes the component of `velocity` that points into a surface with the given `normal`.
/// Velocity that is already moving away from (or along) the surface is returned unchanged.
///
/// `normal` does not have to be unit length; the controller deliberately flattens wall and ground
/// normals to a single axis before clipping.
#[must_use]
pub fn clip_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    let into = velocity.dot(normal);
    if into < 0.0 {
        velocity - into * normal
    } else {
        velocity
    }
}

/// Clips `velocity` against each normal in turn.
///
/// This is an iterative per-contact correction, not a simultaneous solve: when two normals disagree
/// the later one wins along its own axis, and a non-orthogonal pair can leave a little penetrating
/// velocity against the earlier one.
#[must_use]
pub fn project_velocity(velocity: Vec2, normals: impl IntoIterator<Item = Vec2>) -> Vec2 {
    normals.into_iter().fold(velocity, clip_velocity)
}
