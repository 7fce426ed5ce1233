//! Top-level interaction mode

/// What the screen is showing and how input is interpreted
///
/// Exactly one mode is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InteractionMode {
    /// Main screen with the four icon buttons
    #[default]
    Main,
    /// Print monitor
    Print,
    /// A menu from the navigation stack
    Menu,
    /// Numeric edit in place
    Value,
    /// Option list edit in place
    Option,
    /// Media file browser
    File,
    /// Two-choice popup
    Popup,
    /// Single-button acknowledgement
    Confirm,
    /// Blocking machine operation in progress
    Wait,
    /// Lock screen
    Locked,
    /// Print stop in progress
    Cancel,
}

impl InteractionMode {
    /// Modes a popup may return to; popups never return to another popup
    pub fn is_resumable(self) -> bool {
        !matches!(
            self,
            InteractionMode::Popup | InteractionMode::Confirm | InteractionMode::Wait
        )
    }

    /// Modes that belong to a running print
    pub fn is_print_context(self) -> bool {
        matches!(self, InteractionMode::Print | InteractionMode::Cancel)
    }
}

/// How much of the screen an input changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Redraw {
    #[default]
    None,
    /// Selection moved between two visible rows
    Rows { from: u8, to: u8 },
    /// One row changed in place
    Row(u8),
    /// Everything
    Full,
}

impl Redraw {
    /// Combine two redraw requests into one that covers both
    pub fn merge(self, other: Redraw) -> Redraw {
        match (self, other) {
            (Redraw::None, r) | (r, Redraw::None) => r,
            (a, b) if a == b => a,
            _ => Redraw::Full,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resumable_modes() {
        assert!(InteractionMode::Menu.is_resumable());
        assert!(InteractionMode::Print.is_resumable());
        assert!(InteractionMode::Locked.is_resumable());
        assert!(!InteractionMode::Wait.is_resumable());
        assert!(!InteractionMode::Confirm.is_resumable());
    }

    #[test]
    fn test_redraw_merge() {
        assert_eq!(Redraw::None.merge(Redraw::Row(2)), Redraw::Row(2));
        assert_eq!(Redraw::Row(2).merge(Redraw::Row(2)), Redraw::Row(2));
        assert_eq!(Redraw::Row(2).merge(Redraw::Row(3)), Redraw::Full);
    }
}
