//! Coyote time and jump buffering.
use super::settings::MovementSettings;
use bevy::prelude::*;

/// Added to both counters after a jump fires so the same press or support window can't fire again.
pub const RETRIGGER_FRAMES: u32 = 100;

/// Counter value meaning "no support and no press in recent memory", used on spawn and while dead.
pub const UNSUPPORTED_FRAMES: u32 = 100;

/// Decides each tick whether a jump should fire.
///
/// Both counters count ticks up from the last event that zeroed them; they only ever go back
/// down through [`mark_supported`](Self::mark_supported), [`mark_pressed`](Self::mark_pressed)
/// and [`reset`](Self::reset).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub struct JumpGate {
    /// Ticks since the character last stood on ground or slid on a wall.
    pub ground_frames: u32,
    /// Ticks since jump was last pressed.
    pub jump_frames: u32,
}

impl Default for JumpGate {
    fn default() -> Self {
        Self {
            ground_frames: UNSUPPORTED_FRAMES,
            jump_frames: UNSUPPORTED_FRAMES,
        }
    }
}

impl JumpGate {
    /// Whether a jump fires this tick.
    ///
    /// While `supported`, a fresh press or one buffered within `jump_ahead_frames` fires.
    /// While airborne, only a fresh press within `coyote_frames` of leaving support fires.
    #[must_use]
    pub fn should_jump(
        &self,
        pressed_this_tick: bool,
        supported: bool,
        settings: &MovementSettings,
    ) -> bool {
        if supported {
            pressed_this_tick || self.jump_frames < settings.jump_ahead_frames
        } else {
            pressed_this_tick && self.ground_frames < settings.coyote_frames
        }
    }

    pub fn mark_supported(&mut self) {
        self.ground_frames = 0;
    }

    pub fn mark_pressed(&mut self) {
        self.jump_frames = 0;
    }

    /// Pushes both windows out of reach after a jump has fired.
    pub fn suppress(&mut self) {
        self.ground_frames = self.ground_frames.saturating_add(RETRIGGER_FRAMES);
        self.jump_frames = self.jump_frames.saturating_add(RETRIGGER_FRAMES);
    }

    /// Forgets any support or press, as on spawn or death.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// End-of-tick bookkeeping.
    pub fn advance(&mut self) {
        self.ground_frames = self.ground_frames.saturating_add(1);
        self.jump_frames = self.jump_frames.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> MovementSettings {
        MovementSettings {
            coyote_frames: 5,
            jump_ahead_frames: 4,
            ..default()
        }
    }

    #[test]
    fn fresh_gate_never_fires_without_a_press() {
        let gate = JumpGate::default();
        assert!(!gate.should_jump(false, true, &settings()));
        assert!(!gate.should_jump(false, false, &settings()));
        assert!(gate.should_jump(true, true, &settings()));
    }

    #[test]
    fn coyote_window_boundary() {
        let settings = settings();
        let gate = JumpGate {
            ground_frames: settings.coyote_frames - 1,
            jump_frames: 0,
        };
        assert!(gate.should_jump(true, false, &settings));

        let gate = JumpGate {
            ground_frames: settings.coyote_frames,
            jump_frames: 0,
        };
        assert!(!gate.should_jump(true, false, &settings));
    }

    #[test]
    fn coyote_needs_a_fresh_press() {
        let settings = settings();
        let gate = JumpGate {
            ground_frames: 0,
            jump_frames: 0,
        };
        assert!(!gate.should_jump(false, false, &settings));
    }

    #[test]
    fn buffer_window_boundary() {
        let settings = settings();
        let gate = JumpGate {
            ground_frames: 0,
            jump_frames: settings.jump_ahead_frames - 1,
        };
        assert!(gate.should_jump(false, true, &settings));

        let gate = JumpGate {
            ground_frames: 0,
            jump_frames: settings.jump_ahead_frames,
        };
        assert!(!gate.should_jump(false, true, &settings));
    }

    #[test]
    fn suppress_closes_both_windows() {
        let settings = settings();
        let mut gate = JumpGate::default();
        gate.mark_supported();
        gate.mark_pressed();
        assert!(gate.should_jump(false, true, &settings));

        gate.suppress();
        gate.advance();
        assert!(!gate.should_jump(false, true, &settings));
        assert!(!gate.should_jump(true, false, &settings));
        assert_eq!(gate.ground_frames, RETRIGGER_FRAMES + 1);
    }

    #[test]
    fn counters_saturate() {
        let mut gate = JumpGate {
            ground_frames: u32::MAX,
            jump_frames: u32::MAX - 1,
        };
        gate.advance();
        gate.suppress();
        assert_eq!(gate.ground_frames, u32::MAX);
        assert_eq!(gate.jump_frames, u32::MAX);
    }
}
