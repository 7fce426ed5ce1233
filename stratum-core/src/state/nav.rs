//! Navigation history
//!
//! Each open menu is a [`NavFrame`] remembering its selected row and scroll
//! position, so going back restores the parent exactly as it was left.

use heapless::Vec;

use super::mode::InteractionMode;
use crate::menu::MenuId;

/// Deepest menu nesting
pub const MAX_DEPTH: usize = 6;

/// One entry of the history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavFrame {
    pub menu: MenuId,
    /// 0 is the back row
    pub selected_row: u8,
    /// First visible row
    pub scroll: u8,
}

/// Result of moving the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Already at the bound
    Unchanged,
    /// Selection moved within the visible page; screen rows
    Moved { from: u8, to: u8 },
    /// Page scrolled by one row
    Scrolled,
}

impl NavFrame {
    pub const fn new(menu: MenuId) -> Self {
        Self {
            menu,
            selected_row: 0,
            scroll: 0,
        }
    }

    /// Selected row relative to the top of the page
    pub fn screen_row(&self) -> u8 {
        self.selected_row.saturating_sub(self.scroll)
    }

    /// Move the selection one row, clamped to `0..item_count`
    pub fn step(&mut self, delta: i8, item_count: u8, visible: u8) -> Step {
        let last = item_count.saturating_sub(1);
        let from = self.selected_row;
        let to = if delta > 0 {
            from.saturating_add(1).min(last)
        } else if delta < 0 {
            from.saturating_sub(1)
        } else {
            from
        };
        if to == from {
            return Step::Unchanged;
        }

        let old_screen = self.screen_row();
        self.selected_row = to;
        if to < self.scroll {
            self.scroll = to;
            Step::Scrolled
        } else if visible > 0 && to >= self.scroll + visible {
            self.scroll = to + 1 - visible;
            Step::Scrolled
        } else {
            Step::Moved {
                from: old_screen,
                to: self.screen_row(),
            }
        }
    }

    /// Jump to a row, scrolling so it is visible
    pub fn select(&mut self, row: u8, item_count: u8, visible: u8) {
        self.selected_row = row.min(item_count.saturating_sub(1));
        if self.selected_row < self.scroll {
            self.scroll = self.selected_row;
        } else if visible > 0 && self.selected_row >= self.scroll + visible {
            self.scroll = self.selected_row + 1 - visible;
        }
    }

    /// `scroll <= selected_row < scroll + visible`
    pub fn is_consistent(&self, visible: u8) -> bool {
        self.scroll <= self.selected_row && self.selected_row < self.scroll.saturating_add(visible)
    }
}

/// Bounded stack of open menus
///
/// `base` is the mode shown once the last menu is closed: the main screen,
/// or the print screen when the menus were opened from it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NavigationStack {
    frames: Vec<NavFrame, MAX_DEPTH>,
    base: InteractionMode,
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationStack {
    pub const fn new() -> Self {
        Self {
            frames: Vec::new(),
            base: InteractionMode::Main,
        }
    }

    /// Open a menu on top of the current one
    ///
    /// Returns false, leaving the stack untouched, when already at
    /// [`MAX_DEPTH`].
    pub fn push(&mut self, menu: MenuId) -> bool {
        match self.frames.push(NavFrame::new(menu)) {
            Ok(()) => {
                debug!("nav push {}, depth {}", menu, self.frames.len());
                true
            }
            Err(_) => {
                warn!("nav push {} rejected at max depth", menu);
                false
            }
        }
    }

    /// Close the current menu
    ///
    /// At an empty stack this is a no-op returning `None`.
    pub fn pop(&mut self) -> Option<NavFrame> {
        let frame = self.frames.pop();
        if frame.is_none() {
            warn!("nav pop at root ignored");
        }
        frame
    }

    /// Start over from a base mode
    pub fn reset(&mut self, base: InteractionMode) {
        self.frames.clear();
        self.base = base;
    }

    pub fn base(&self) -> InteractionMode {
        self.base
    }

    pub fn current(&self) -> Option<&NavFrame> {
        self.frames.last()
    }

    pub fn current_mut(&mut self) -> Option<&mut NavFrame> {
        self.frames.last_mut()
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[NavFrame] {
        &self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_six_pop_seven() {
        let mut nav = NavigationStack::new();
        let menus = [
            MenuId::Control,
            MenuId::Motion,
            MenuId::MaxSpeed,
            MenuId::Visual,
            MenuId::ColorSettings,
            MenuId::Advanced,
        ];
        for menu in menus {
            assert!(nav.push(menu));
        }
        assert!(!nav.push(MenuId::Info));
        assert_eq!(nav.depth(), MAX_DEPTH);
        assert_eq!(nav.current().map(|f| f.menu), Some(MenuId::Advanced));

        for _ in 0..MAX_DEPTH {
            assert!(nav.pop().is_some());
        }
        assert_eq!(nav.pop(), None);
        assert!(nav.is_empty());
        assert_eq!(nav.base(), InteractionMode::Main);
    }

    #[test]
    fn test_step_clamps_at_bounds() {
        let mut frame = NavFrame::new(MenuId::Prepare);
        assert_eq!(frame.step(-1, 4, 6), Step::Unchanged);
        assert_eq!(frame.step(1, 4, 6), Step::Moved { from: 0, to: 1 });
        frame.step(1, 4, 6);
        frame.step(1, 4, 6);
        assert_eq!(frame.selected_row, 3);
        assert_eq!(frame.step(1, 4, 6), Step::Unchanged);
    }

    #[test]
    fn test_step_scrolls_past_page() {
        let mut frame = NavFrame::new(MenuId::Control);
        for _ in 0..5 {
            frame.step(1, 10, 6);
        }
        assert_eq!(frame.scroll, 0);
        assert_eq!(frame.step(1, 10, 6), Step::Scrolled);
        assert_eq!((frame.selected_row, frame.scroll), (6, 1));
        assert_eq!(frame.screen_row(), 5);

        for _ in 0..5 {
            frame.step(-1, 10, 6);
        }
        assert_eq!(frame.scroll, 1);
        assert_eq!(frame.step(-1, 10, 6), Step::Scrolled);
        assert_eq!((frame.selected_row, frame.scroll), (0, 0));
    }

    #[test]
    fn test_select_restores_visibility() {
        let mut frame = NavFrame::new(MenuId::Control);
        frame.select(8, 10, 6);
        assert_eq!((frame.selected_row, frame.scroll), (8, 3));
        frame.select(20, 10, 6);
        assert_eq!(frame.selected_row, 9);
        assert!(frame.is_consistent(6));
    }

    proptest! {
        #[test]
        fn prop_selection_stays_visible(steps in proptest::collection::vec(any::<bool>(), 0..64), count in 1u8..30) {
            let mut frame = NavFrame::new(MenuId::Control);
            for up in steps {
                frame.step(if up { 1 } else { -1 }, count, 6);
                prop_assert!(frame.is_consistent(6));
                prop_assert!(frame.selected_row < count);
            }
        }
    }
}
