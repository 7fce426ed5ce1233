//! Popup window

use stratum_core::state::{Choice, PopupKind, PopupState};
use stratum_core::traits::Endstops;
use stratum_display::{icons, Surface, TextStyle, Transport};
use stratum_protocol::{Font, RectMode};

use crate::theme::Theme;

const WINDOW: (u16, u16, u16, u16) = (13, 59, 259, 351);
const BUTTON_Y: u16 = 280;
/// Left edge of the A and B buttons
const BUTTON_A_X: u16 = 26;
const BUTTON_B_X: u16 = 146;
const SINGLE_BUTTON_X: u16 = 87;
const BUTTON_W: u16 = 100;
const BUTTON_H: u16 = 38;

fn line_y(index: usize, with_icon: bool) -> u16 {
    let first = if with_icon { 180 } else { 110 };
    first + index as u16 * 30
}

/// Window frame, icon, text lines and buttons
pub fn draw_popup<T: Transport>(surface: &mut Surface<T>, theme: &Theme, popup: &PopupState) {
    let descriptor = &popup.descriptor;
    draw_window(surface, theme, &descriptor.lines, descriptor.icon);

    match descriptor.kind {
        PopupKind::Choice => {
            surface.draw_icon_with_background(icons::CONFIRM_E, BUTTON_A_X, BUTTON_Y);
            surface.draw_icon_with_background(icons::CANCEL_E, BUTTON_B_X, BUTTON_Y);
            draw_selection(surface, theme, popup.selection);
        }
        PopupKind::Acknowledge => {
            surface.draw_icon_with_background(icons::CONTINUE_E, SINGLE_BUTTON_X, BUTTON_Y);
            frame_button(surface, theme.highlight, SINGLE_BUTTON_X);
        }
        PopupKind::Wait => {}
    }
}

const ENDSTOP_LABEL_X: u16 = 60;
const ENDSTOP_STATE_X: u16 = 140;
const ENDSTOP_FIRST_Y: u16 = 200;
const ENDSTOP_PITCH: u16 = 18;

/// Endstop table inside the diagnostic popup
///
/// States are drawn over the popup background so a later call repaints
/// them in place. The probe row only shows on machines with a probe.
pub fn draw_endstops<T: Transport>(surface: &mut Surface<T>, theme: &Theme, endstops: &Endstops, probe: bool) {
    let label = TextStyle::new(Font::MENU, theme.popup_text);
    let state = TextStyle::new(Font::MENU, theme.popup_text).with_background(theme.popup_bg);
    let rows = [
        ("X Min", endstops.x),
        ("Y Min", endstops.y),
        ("Z Min", endstops.z),
        ("Probe", endstops.probe),
    ];
    let shown = if probe { rows.len() } else { rows.len() - 1 };
    for (index, (name, triggered)) in rows.iter().take(shown).enumerate() {
        let y = ENDSTOP_FIRST_Y + index as u16 * ENDSTOP_PITCH;
        surface.draw_string_styled(label, ENDSTOP_LABEL_X, y, name);
        let text = if *triggered { "TRIGGERED" } else { "open     " };
        surface.draw_string_styled(state, ENDSTOP_STATE_X, y, text);
    }
}

/// Window with text but no buttons, for transient messages
pub fn draw_message<T: Transport>(surface: &mut Surface<T>, theme: &Theme, lines: &[&str; 3]) {
    draw_window(surface, theme, lines, None);
}

fn draw_window<T: Transport>(surface: &mut Surface<T>, theme: &Theme, lines: &[&str; 3], icon: Option<u8>) {
    let (x0, y0, x1, y1) = WINDOW;
    surface.draw_rectangle(RectMode::Frame, theme.text, x0, y0, x1, y1);
    surface.draw_rectangle(RectMode::Fill, theme.popup_bg, x0 + 1, y0 + 1, x1 - 1, y1 - 1);

    if let Some(icon) = icon {
        surface.draw_icon(icon, 101, 105);
    }
    let style = TextStyle::new(Font::ALERT, theme.popup_text);
    for (index, line) in lines.iter().enumerate().filter(|(_, l)| !l.is_empty()) {
        surface.draw_centered_string(style, line_y(index, icon.is_some()), line);
    }
}

/// Frame the selected button and clear the frame of the other
pub fn draw_selection<T: Transport>(surface: &mut Surface<T>, theme: &Theme, selection: Choice) {
    let (on, off) = match selection {
        Choice::A => (BUTTON_A_X, BUTTON_B_X),
        Choice::B => (BUTTON_B_X, BUTTON_A_X),
    };
    frame_button(surface, theme.highlight, on);
    frame_button(surface, theme.popup_bg, off);
}

fn frame_button<T: Transport>(surface: &mut Surface<T>, color: u16, x: u16) {
    for inset in 0..2 {
        surface.draw_rectangle(
            RectMode::Frame,
            color,
            x - 1 - inset,
            BUTTON_Y - 1 - inset,
            x + BUTTON_W + inset,
            BUTTON_Y + BUTTON_H + inset,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_core::state::{Continuation, PopupId};
    use stratum_core::InteractionMode;
    use stratum_display::CaptureTransport;
    use stratum_protocol::command::CMD_ICON_SHOW;

    fn state(id: PopupId) -> PopupState {
        PopupState::new(id, InteractionMode::Menu, Continuation::Return, Continuation::Return)
    }

    #[test]
    fn test_choice_popup_has_two_buttons() {
        let mut surface = Surface::new(CaptureTransport::<64>::new());
        draw_popup(&mut surface, &Theme::default(), &state(PopupId::UI));
        assert!(surface.transport().contains_text("Are you sure?"));
        assert_eq!(surface.transport().count_command(CMD_ICON_SHOW), 2);
    }

    #[test]
    fn test_wait_popup_has_no_buttons() {
        let mut surface = Surface::new(CaptureTransport::<64>::new());
        draw_popup(&mut surface, &Theme::default(), &state(PopupId::Home));
        assert!(surface.transport().contains_text("Homing XYZ"));
        // only the popup icon
        assert_eq!(surface.transport().count_command(CMD_ICON_SHOW), 1);
    }

    #[test]
    fn test_endstop_table_hides_probe_without_one() {
        let mut surface = Surface::new(CaptureTransport::<64>::new());
        let endstops = Endstops {
            z: true,
            ..Endstops::default()
        };
        draw_endstops(&mut surface, &Theme::default(), &endstops, false);
        let capture = surface.transport();
        assert!(capture.contains_text("Z Min"));
        assert!(capture.contains_text("TRIGGERED"));
        assert!(!capture.contains_text("Probe"));
        assert_eq!(capture.strings().count(), 6);
    }

    #[test]
    fn test_empty_lines_skipped() {
        let mut surface = Surface::new(CaptureTransport::<64>::new());
        draw_message(&mut surface, &Theme::default(), &["Stopping Print", "", ""]);
        let strings = surface.transport().strings().count();
        assert_eq!(strings, 1);
    }
}
