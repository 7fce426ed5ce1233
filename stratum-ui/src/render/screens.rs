//! Full screens: main, print monitor, file browser, lock screen, and the
//! status area shared by most of them

use core::fmt::Write;

use heapless::String;
use stratum_core::traits::{MachineHost, MachineStatus, PrintStatus};
use stratum_display::layout::{mbase, LBLX, MENU_CHR_W, STATUS_Y, STAT_CHR_W, TROWS};
use stratum_display::{icons, NumberStyle, Surface, TextStyle, Transport};
use stratum_protocol::{Font, RectMode, DISPLAY_HEIGHT, DISPLAY_WIDTH};

use super::draw_title;
use super::menu::{clear_row, draw_cursor, draw_split_line};
use crate::theme::Theme;

/// Buttons on the main screen
pub const MAIN_BUTTONS: u8 = 4;
/// Buttons on the print screen
pub const PRINT_BUTTONS: u8 = 3;

const MAIN_POS: [(u16, u16); MAIN_BUTTONS as usize] = [(17, 130), (145, 130), (17, 246), (145, 246)];
const PRINT_POS: [(u16, u16); PRINT_BUTTONS as usize] = [(8, 252), (96, 252), (184, 252)];

/// Characters of a file name that fit between label and right edge
const FILE_NAME_CHARS: u16 = (DISPLAY_WIDTH - LBLX) / MENU_CHR_W - 1;

/// Elapsed or remaining time, `1h 05m` or `01:05`
pub fn format_time(seconds: u32, textual: bool) -> String<16> {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let mut text = String::new();
    let _ = if textual {
        write!(text, "{}h {:02}m", hours, minutes)
    } else {
        write!(text, "{:02}:{:02}", hours, minutes)
    };
    text
}

// Main screen

/// Title, logo and the four buttons
pub fn draw_main<T: Transport>(surface: &mut Surface<T>, theme: &Theme, title: &str, leveling: bool, selected: u8) {
    surface.frame_clear(theme.background);
    draw_title(surface, theme, title);
    surface.draw_icon(icons::LOGO, 71, 52);
    for index in 0..MAIN_BUTTONS {
        draw_main_button(surface, theme, index, index == selected, leveling);
    }
}

/// One main screen button; the fourth is Leveling or Info
pub fn draw_main_button<T: Transport>(
    surface: &mut Surface<T>,
    theme: &Theme,
    index: u8,
    selected: bool,
    leveling: bool,
) {
    let Some(&(x, y)) = MAIN_POS.get(index as usize) else {
        return;
    };
    let (normal, active) = match index {
        0 => (icons::PRINT_0, icons::PRINT_1),
        1 => (icons::PREPARE_0, icons::PREPARE_1),
        2 => (icons::CONTROL_0, icons::CONTROL_1),
        _ if leveling => (icons::LEVELING_0, icons::LEVELING_1),
        _ => (icons::INFO_0, icons::INFO_1),
    };
    surface.draw_icon_with_background(if selected { active } else { normal }, x, y);
    let frame = if selected { theme.highlight } else { theme.background };
    surface.draw_rectangle(RectMode::Frame, frame, x, y, x + 109, y + 99);
}

// Print screen

/// What the print screen shows
#[derive(Debug, Clone, Copy)]
pub struct PrintView<'a> {
    pub title: &'a str,
    pub filename: &'a str,
    pub status: &'a MachineStatus,
    pub textual_time: bool,
    pub selected: u8,
}

pub fn draw_print<T: Transport>(surface: &mut Surface<T>, theme: &Theme, view: &PrintView<'_>) {
    surface.frame_clear(theme.background);
    draw_title(surface, theme, view.title);
    let name = TextStyle::new(Font::MENU, theme.text);
    surface.draw_centered_string(name, 60, view.filename);

    draw_progress(surface, theme, view.status, view.textual_time);
    let paused = view.status.print == PrintStatus::Paused;
    for index in 0..PRINT_BUTTONS {
        draw_print_button(surface, theme, index, index == view.selected, paused);
    }
}

/// Progress bar, percentage and both times
pub fn draw_progress<T: Transport>(surface: &mut Surface<T>, theme: &Theme, status: &MachineStatus, textual: bool) {
    let percent = status.progress.min(100) as u16;
    surface.draw_icon_with_background(icons::BAR, 15, 93);
    surface.draw_rectangle(RectMode::Fill, theme.bar_fill, 16 + percent * 240 / 100, 93, 256, 113);

    let digits = NumberStyle::new(Font::Font16x32, theme.percent).with_background(theme.background);
    surface.draw_int(digits, 3, 109, 133, percent as i32);
    surface.draw_string_styled(TextStyle::new(Font::Font16x32, theme.percent), 157, 133, "%");

    let time = TextStyle::new(Font::MENU, theme.progress_time).with_background(theme.background);
    surface.draw_icon(icons::PRINT_TIME, 15, 173);
    surface.draw_string_styled(time, 46, 192, &format_time(status.elapsed_s, textual));
    surface.draw_icon(icons::REMAIN_TIME, 150, 171);
    match status.remaining_s {
        Some(remaining) => surface.draw_string_styled(time, 176, 192, &format_time(remaining, textual)),
        None => surface.draw_string_styled(time, 176, 192, "--:--"),
    }
}

/// Tune, Pause/Resume or Stop
pub fn draw_print_button<T: Transport>(surface: &mut Surface<T>, theme: &Theme, index: u8, selected: bool, paused: bool) {
    let Some(&(x, y)) = PRINT_POS.get(index as usize) else {
        return;
    };
    let (normal, active) = match index {
        0 => (icons::SETUP_0, icons::SETUP_1),
        1 if paused => (icons::CONTINUE_0, icons::CONTINUE_1),
        1 => (icons::PAUSE_0, icons::PAUSE_1),
        _ => (icons::STOP_0, icons::STOP_1),
    };
    surface.draw_icon_with_background(if selected { active } else { normal }, x, y);
    let frame = if selected { theme.highlight } else { theme.background };
    surface.draw_rectangle(RectMode::Frame, frame, x, y, x + 79, y + 72);
}

// File browser

/// Listing page starting at entry `scroll`; entry 0 is the back row
pub fn draw_files<T: Transport, H: MachineHost + ?Sized>(
    surface: &mut Surface<T>,
    theme: &Theme,
    host: &H,
    selected: u16,
    scroll: u16,
) {
    surface.set_background_color(theme.background);
    surface.clear_menu_area();
    draw_title(surface, theme, "Select File");
    let rows = host.file_count().saturating_add(1);
    for screen_row in 0..TROWS {
        let index = scroll.saturating_add(screen_row as u16);
        if index >= rows {
            break;
        }
        draw_file_row(surface, theme, host, index, screen_row);
    }
    draw_cursor(surface, theme.cursor, selected.saturating_sub(scroll) as u8);
}

/// One listing row
pub fn draw_file_row<T: Transport, H: MachineHost + ?Sized>(
    surface: &mut Surface<T>,
    theme: &Theme,
    host: &H,
    index: u16,
    row: u8,
) {
    clear_row(surface, theme, row);
    let y = mbase(row);
    let style = TextStyle::new(Font::MENU, theme.text);
    if index == 0 {
        surface.draw_icon(icons::BACK, 26, y - 3);
        let label = if host.in_subfolder() { ".." } else { "Back" };
        surface.draw_string_styled(style, LBLX, y - 1, label);
    } else if let Some(entry) = host.file_entry(index - 1) {
        let icon = if entry.is_dir { icons::FOLDER } else { icons::FILE };
        surface.draw_icon(icon, 26, y - 3);
        surface.draw_string_limited(style, LBLX, y - 1, &entry.name, FILE_NAME_CHARS);
    }
    draw_split_line(surface, theme, row);
}

// Lock screen

pub fn draw_lock<T: Transport>(surface: &mut Surface<T>, theme: &Theme, slider: u8) {
    surface.frame_clear(theme.background);
    draw_title(surface, theme, "Lock Screen");
    surface.draw_icon(icons::LOGO, 71, 52);
    let style = TextStyle::new(Font::MENU, theme.text);
    surface.draw_centered_string(style, 180, "Printer is Locked,");
    surface.draw_centered_string(style, 200, "Scroll to unlock.");
    draw_slider(surface, theme, slider);
}

/// Unlock slider, `slider` in 0..=100
pub fn draw_slider<T: Transport>(surface: &mut Surface<T>, theme: &Theme, slider: u8) {
    let fill = slider.min(100) as u16 * 240 / 100;
    surface.draw_rectangle(RectMode::Frame, theme.text, 15, 260, 257, 290);
    surface.draw_rectangle(RectMode::Fill, theme.background, 16, 261, 256, 289);
    if fill > 0 {
        surface.draw_rectangle(RectMode::Fill, theme.cursor, 16, 261, 16 + fill, 289);
    }
    let number = NumberStyle::new(Font::MENU, theme.text).with_background(theme.background);
    surface.draw_int(number, 3, 116, 300, slider as i32);
    surface.draw_string_styled(TextStyle::new(Font::MENU, theme.text), 140, 300, "%");
}

// Status area

/// Temperatures, fan, feedrate, Z offset and coordinates
pub fn draw_status_area<T: Transport>(surface: &mut Surface<T>, theme: &Theme, status: &MachineStatus, fan: bool) {
    surface.draw_rectangle(
        RectMode::Fill,
        theme.background,
        0,
        STATUS_Y,
        DISPLAY_WIDTH - 1,
        DISPLAY_HEIGHT - 1,
    );

    let text = TextStyle::new(Font::STATUS, theme.status_area_text);
    let number = NumberStyle::new(Font::STATUS, theme.status_area_text).with_background(theme.background);
    let temp = |value: f32| value.clamp(0.0, 999.0) as i32;

    for (icon, y, current, target) in [
        (icons::HOTEND_TEMP, 383, status.hotend_temp, status.hotend_target),
        (icons::BED_TEMP, 416, status.bed_temp, status.bed_target),
    ] {
        surface.draw_icon(icon, 10, y);
        surface.draw_int(number, 3, 28, y + 1, temp(current));
        surface.draw_string_styled(text, 25 + 3 * STAT_CHR_W + 5, y + 1, "/");
        surface.draw_int(number, 3, 25 + 4 * STAT_CHR_W + 6, y + 1, temp(target));
        surface.draw_degree_symbol(theme.status_area_text, 25 + 7 * STAT_CHR_W + 5, y + 3);
    }

    surface.draw_icon(icons::SPEED, 113, 383);
    surface.draw_int(number, 3, 116 + 2 * STAT_CHR_W, 384, status.feedrate_percent as i32);
    surface.draw_string_styled(text, 116 + 5 * STAT_CHR_W + 2, 384, "%");

    if fan {
        surface.draw_icon(icons::FAN_SPEED, 187, 383);
        surface.draw_int(number, 3, 195 + 2 * STAT_CHR_W, 384, status.fan_speed as i32);
    }

    surface.draw_icon(icons::ZOFFSET, 187, 416);
    surface.draw_signed_float(number, 2, 2, 191 + 2 * STAT_CHR_W, 417, status.z_offset);

    surface.draw_rectangle(RectMode::Fill, theme.coordinates_line, 0, 449, DISPLAY_WIDTH - 1, 451);
    let label = TextStyle::new(Font::MENU, theme.coordinates_text);
    let coordinate = NumberStyle::new(Font::MENU, theme.coordinates_text).with_background(theme.background);
    for (axis, x, value) in [("X:", 10, status.position[0]), ("Y:", 95, status.position[1]), ("Z:", 180, status.position[2])] {
        surface.draw_string_styled(label, x, 459, axis);
        surface.draw_float(coordinate, 3, 1, x + 18, 459, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::MockHost;
    use stratum_display::CaptureTransport;
    use stratum_protocol::command::CMD_DRAW_VALUE;

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(3900, true).as_str(), "1h 05m");
        assert_eq!(format_time(3900, false).as_str(), "01:05");
        assert_eq!(format_time(0, false).as_str(), "00:00");
        assert_eq!(format_time(100 * 3600, true).as_str(), "100h 00m");
    }

    #[test]
    fn test_file_rows_show_entries() {
        let host = MockHost::with_files(&[("cube.gcode", false), ("parts", true)]);
        let mut surface = Surface::new(CaptureTransport::<128>::new());
        draw_files(&mut surface, &Theme::default(), &host, 0, 0);
        let capture = surface.transport();
        assert!(capture.contains_text("Back"));
        assert!(capture.contains_text("cube.gcode"));
        assert!(capture.contains_text("parts"));
    }

    #[test]
    fn test_status_area_values() {
        let status = MachineStatus {
            hotend_temp: 205.0,
            hotend_target: 210.0,
            feedrate_percent: 100,
            ..MachineStatus::default()
        };
        let mut surface = Surface::new(CaptureTransport::<128>::new());
        draw_status_area(&mut surface, &Theme::default(), &status, false);
        // two temperatures with targets, feedrate, z offset, three coordinates
        assert_eq!(surface.transport().count_command(CMD_DRAW_VALUE), 9);
    }

    #[test]
    fn test_print_screen_shows_filename_and_time() {
        let status = MachineStatus {
            print: PrintStatus::Printing,
            progress: 42,
            elapsed_s: 3900,
            remaining_s: Some(600),
            ..MachineStatus::default()
        };
        let view = PrintView {
            title: "Printing...",
            filename: "benchy.gcode",
            status: &status,
            textual_time: false,
            selected: 1,
        };
        let mut surface = Surface::new(CaptureTransport::<128>::new());
        draw_print(&mut surface, &Theme::default(), &view);
        let capture = surface.transport();
        assert!(capture.contains_text("benchy.gcode"));
        assert!(capture.contains_text("01:05"));
        assert!(capture.contains_text("00:10"));
    }
}
