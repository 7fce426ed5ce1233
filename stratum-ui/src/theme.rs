//! Resolved screen colors
//!
//! The settings record stores one color index per themed element. A
//! [`Theme`] holds the RGB565 values those indices resolve to, plus the
//! fixed colors that are not themeable.

use stratum_core::config::{ColorSlot, PersistedSettings};
use stratum_display::color::{self, theme_color};

/// RGB565 colors used by the renderers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Theme {
    pub background: u16,
    pub text: u16,
    /// Selection cursor bar at the left edge of a menu row
    pub cursor: u16,
    pub split_line: u16,
    pub title_bg: u16,
    pub title_text: u16,
    /// Frame around the selected main/print button
    pub highlight: u16,
    pub percent: u16,
    pub progress_time: u16,
    pub status_bar_text: u16,
    pub status_area_text: u16,
    pub coordinates_text: u16,
    pub coordinates_line: u16,
    /// Value being edited
    pub selected: u16,
    pub popup_bg: u16,
    pub popup_text: u16,
    pub alert_bg: u16,
    pub alert_text: u16,
    pub bar_fill: u16,
    pub indicator: u16,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_settings(&PersistedSettings::default())
    }
}

impl Theme {
    /// Resolve the themed colors of `settings`
    pub fn from_settings(settings: &PersistedSettings) -> Self {
        let pick = |slot: ColorSlot, original: u16, light: bool| {
            theme_color(settings.color(slot), original, light)
        };
        Self {
            background: color::DEF_BACKGROUND,
            text: color::DEF_TEXT,
            cursor: pick(ColorSlot::Cursor, color::DEF_CURSOR, false),
            split_line: pick(ColorSlot::MenuSplitLine, color::DEF_SPLIT_LINE, true),
            title_bg: pick(ColorSlot::MenuTopBg, color::DEF_TITLE_BG, false),
            title_text: pick(ColorSlot::MenuTopText, color::DEF_TITLE_TEXT, false),
            highlight: pick(ColorSlot::HighlightBox, color::DEF_HIGHLIGHT, false),
            percent: pick(ColorSlot::ProgressPercent, color::DEF_PERCENT_TEXT, false),
            progress_time: pick(ColorSlot::ProgressTime, color::DEF_TEXT, false),
            status_bar_text: pick(ColorSlot::StatusBarText, color::DEF_STATUS_TEXT, false),
            status_area_text: pick(ColorSlot::StatusAreaText, color::DEF_TEXT, false),
            coordinates_text: pick(ColorSlot::CoordinatesText, color::DEF_COORDINATE, false),
            coordinates_line: pick(ColorSlot::CoordinatesSplitLine, color::DEF_SPLIT_LINE, true),
            selected: color::DEF_SELECTED,
            popup_bg: color::DEF_POPUP_BG,
            popup_text: color::DEF_POPUP_TEXT,
            alert_bg: color::DEF_ALERT_BG,
            alert_text: color::DEF_ALERT_TEXT,
            bar_fill: color::DEF_BAR_FILL,
            indicator: color::DEF_INDICATOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_indices_keep_original_colors() {
        let theme = Theme::default();
        assert_eq!(theme.cursor, color::DEF_CURSOR);
        assert_eq!(theme.title_bg, color::DEF_TITLE_BG);
        assert_eq!(theme.status_bar_text, color::DEF_STATUS_TEXT);
    }

    #[test]
    fn test_split_line_uses_light_variant() {
        let mut settings = PersistedSettings::default();
        settings.set_color(ColorSlot::MenuSplitLine, 6);
        settings.set_color(ColorSlot::Cursor, 6);
        let theme = Theme::from_settings(&settings);
        assert_eq!(theme.split_line, color::LIGHT_RED);
        assert_eq!(theme.cursor, color::RED);
    }
}
