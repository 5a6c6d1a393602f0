//! Volume control
//!
//! Linear 0.0-1.0 level plus a mute flag that preserves the level.
//! The level survives track changes and is applied to every new handle.

/// Volume controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves volume level)
    muted: bool,
}

impl Volume {
    /// Create new volume controller
    pub fn new(level: f32) -> Self {
        Self {
            level: Self::clamp(level),
            muted: false,
        }
    }

    /// Restore a persisted level and mute flag
    pub fn with_mute(level: f32, muted: bool) -> Self {
        Self {
            level: Self::clamp(level),
            muted,
        }
    }

    /// Set volume level, clamped to 0.0-1.0
    ///
    /// A level of zero counts as muted; any other level unmutes.
    pub fn set_level(&mut self, level: f32) {
        self.level = Self::clamp(level);
        self.muted = self.level == 0.0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Gain to hand to the resource: 0.0 if muted, otherwise the level
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.level
        }
    }

    fn clamp(level: f32) -> f32 {
        if level.is_nan() {
            0.0
        } else {
            level.clamp(0.0, 1.0)
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(0.8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_to_unit_range() {
        let mut volume = Volume::new(1.5);
        assert_eq!(volume.level(), 1.0);

        volume.set_level(-0.2);
        assert_eq!(volume.level(), 0.0);

        volume.set_level(f32::NAN);
        assert_eq!(volume.level(), 0.0);
    }

    #[test]
    fn mute_preserves_level() {
        let mut volume = Volume::new(0.6);
        assert!(volume.toggle_mute());
        assert_eq!(volume.gain(), 0.0);
        assert_eq!(volume.level(), 0.6);

        assert!(!volume.toggle_mute());
        assert_eq!(volume.gain(), 0.6);
    }

    #[test]
    fn zero_level_mutes_and_nonzero_unmutes() {
        let mut volume = Volume::default();
        volume.set_level(0.0);
        assert!(volume.is_muted());

        volume.set_level(0.3);
        assert!(!volume.is_muted());
        assert_eq!(volume.gain(), 0.3);
    }
}
