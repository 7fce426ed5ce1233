//! Lock screen slider

use super::mode::InteractionMode;

/// Slider end that unlocks
pub const UNLOCK_AT: u8 = 100;

const STEP: u8 = 10;

/// What a click on the lock screen did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockOutcome {
    /// Slider was short of the end and snapped back
    Reset,
    /// Unlocked; resume this mode
    Unlocked(InteractionMode),
}

/// Lock screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LockState {
    pub slider: u8,
    pub return_mode: InteractionMode,
}

impl LockState {
    pub fn new(return_mode: InteractionMode) -> Self {
        Self {
            slider: 0,
            return_mode,
        }
    }

    /// Move the slider one step; returns true if it moved
    pub fn rotate(&mut self, delta: i8) -> bool {
        let before = self.slider;
        self.slider = if delta > 0 {
            self.slider.saturating_add(STEP).min(UNLOCK_AT)
        } else if delta < 0 {
            self.slider.saturating_sub(STEP)
        } else {
            self.slider
        };
        self.slider != before
    }

    pub fn click(&mut self) -> LockOutcome {
        if self.slider >= UNLOCK_AT {
            LockOutcome::Unlocked(self.return_mode)
        } else {
            self.slider = 0;
            LockOutcome::Reset
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlock_requires_full_slide() {
        let mut lock = LockState::new(InteractionMode::Menu);
        for _ in 0..9 {
            lock.rotate(1);
        }
        assert_eq!(lock.slider, 90);
        assert_eq!(lock.click(), LockOutcome::Reset);
        assert_eq!(lock.slider, 0);

        for _ in 0..12 {
            lock.rotate(1);
        }
        assert_eq!(lock.slider, UNLOCK_AT);
        assert_eq!(lock.click(), LockOutcome::Unlocked(InteractionMode::Menu));
    }

    #[test]
    fn test_slider_does_not_go_below_zero() {
        let mut lock = LockState::new(InteractionMode::Main);
        assert!(!lock.rotate(-1));
        assert_eq!(lock.slider, 0);
    }
}
