//! Screen renderers
//!
//! Every function here draws one screen or one part of a screen from
//! scratch. The panel keeps nothing between commands, so a renderer never
//! assumes what is already on screen beyond the area it owns.

pub mod menu;
pub mod mesh;
pub mod popup;
pub mod screens;

use stratum_display::layout::TITLE_HEIGHT;
use stratum_display::{Surface, TextStyle, Transport};
use stratum_protocol::{Font, RectMode, DISPLAY_WIDTH};

use crate::theme::Theme;

/// Title bar with centered text
pub fn draw_title<T: Transport>(surface: &mut Surface<T>, theme: &Theme, title: &str) {
    surface.draw_rectangle(RectMode::Fill, theme.title_bg, 0, 0, DISPLAY_WIDTH - 1, TITLE_HEIGHT - 1);
    let style = TextStyle::new(Font::HEADING, theme.title_text);
    surface.draw_centered_string(style, 5, title);
}
