//! Menu pages and rows

use stratum_core::menu::{ItemAction, MenuId, MenuItem, MenuModel, Task};
use stratum_core::state::{Editor, NavFrame};
use stratum_core::traits::MachineHost;
use stratum_core::ValueStore;
use stratum_display::layout::{mbase, mypos, ICOX, LBLX, MENU_CHR_W, MLINE, TROWS, VALX};
use stratum_display::{icons, NumberStyle, Surface, TextStyle, Transport};
use stratum_protocol::{Font, RectMode, DISPLAY_WIDTH};

use super::{draw_title, mesh};
use crate::theme::Theme;

/// Right edge of the value column
const VALUE_RIGHT: u16 = 258;
/// X of the trailing glyph (submenu arrow, checkbox)
const GLYPH_X: u16 = 226;
/// Cursor bar width
const CURSOR_W: u16 = 14;

/// What a row shows right of its label
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowValue {
    None,
    /// Opens another menu
    Submenu,
    Number { value: f32, decimals: u8, signed: bool },
    Text(&'static str),
    Check(bool),
}

impl RowValue {
    /// Stored value of a row
    pub fn of<H: MachineHost + ?Sized>(action: &ItemAction, values: &ValueStore, host: &H) -> Self {
        match action {
            ItemAction::Navigate(_) => RowValue::Submenu,
            ItemAction::Edit(spec) => RowValue::Number {
                value: values.get(spec.slot, host),
                decimals: spec.decimals,
                signed: spec.min < 0.0,
            },
            ItemAction::Choose(spec) => {
                let index = values.option(spec.slot) as usize;
                RowValue::Text(spec.slot.labels().get(index).copied().unwrap_or(""))
            }
            ItemAction::Toggle(slot) => RowValue::Check(values.toggled(*slot, host)),
            ItemAction::Back | ItemAction::Run(_) | ItemAction::Label => RowValue::None,
        }
    }

    /// Live value of an open editor
    pub fn editing(editor: &Editor) -> Self {
        match editor {
            Editor::Value(session) => RowValue::Number {
                value: session.value(),
                decimals: session.decimals,
                signed: session.min < 0.0,
            },
            Editor::Option(session) => RowValue::Text(session.label()),
        }
    }
}

/// Value shown for `item` on `screen_row`, taking an open editor into account
///
/// Returns the value and whether it is being edited.
pub fn resolve_value<H: MachineHost + ?Sized>(
    item: &MenuItem,
    screen_row: u8,
    values: &ValueStore,
    editor: Option<&Editor>,
    host: &H,
) -> (RowValue, bool) {
    match editor {
        Some(editor) if editor.row() == screen_row => (RowValue::editing(editor), true),
        _ => (RowValue::of(&item.action, values, host), false),
    }
}

/// Row label; host action rows show the label the host configured
pub fn row_label<'a>(item: &MenuItem, values: &'a ValueStore) -> &'a str {
    match item.action {
        ItemAction::Run(Task::HostAction(index)) => values
            .settings
            .host_action_labels
            .get(index as usize)
            .map(|label| label.as_str())
            .filter(|label| !label.is_empty())
            .unwrap_or(item.label),
        _ => item.label,
    }
}

/// Whole menu page for `frame`
pub fn draw_menu<T: Transport, H: MachineHost + ?Sized>(
    surface: &mut Surface<T>,
    theme: &Theme,
    model: &MenuModel,
    frame: &NavFrame,
    values: &ValueStore,
    editor: Option<&Editor>,
    host: &H,
) {
    surface.set_background_color(theme.background);
    surface.clear_menu_area();
    draw_title(surface, theme, model.title(frame.menu));

    let items = model.items(frame.menu);
    for screen_row in 0..TROWS {
        let index = frame.scroll.saturating_add(screen_row) as usize;
        let Some(item) = items.get(index) else {
            break;
        };
        let (value, editing) = resolve_value(item, screen_row, values, editor, host);
        draw_item(surface, theme, item, row_label(item, values), screen_row, value, editing);
    }

    if frame.menu == MenuId::LevelView {
        mesh::draw_mesh(surface, theme, host);
    }
    draw_cursor(surface, theme.cursor, frame.screen_row());
}

/// One row: icon, label, value and split line
pub fn draw_item<T: Transport>(
    surface: &mut Surface<T>,
    theme: &Theme,
    item: &MenuItem,
    label: &str,
    row: u8,
    value: RowValue,
    editing: bool,
) {
    let y = mbase(row);
    clear_row(surface, theme, row);

    let icon = match item.action {
        ItemAction::Back => icons::BACK,
        _ => item.icon,
    };
    surface.draw_icon(icon, ICOX, y - 3);
    surface.draw_string_styled(TextStyle::new(Font::MENU, theme.text), LBLX, y - 1, label);
    draw_value(surface, theme, value, y, editing);

    draw_split_line(surface, theme, row);
}

/// Blank a row right of the cursor bar
pub fn clear_row<T: Transport>(surface: &mut Surface<T>, theme: &Theme, row: u8) {
    let top = mypos(row);
    surface.draw_rectangle(
        RectMode::Fill,
        theme.background,
        CURSOR_W + 1,
        top,
        DISPLAY_WIDTH - 1,
        top + MLINE - 1,
    );
}

/// Divider under a row
pub fn draw_split_line<T: Transport>(surface: &mut Surface<T>, theme: &Theme, row: u8) {
    let y = mbase(row);
    surface.draw_rectangle(RectMode::Fill, theme.split_line, 16, y + 33, 256, y + 34);
}

fn draw_value<T: Transport>(surface: &mut Surface<T>, theme: &Theme, value: RowValue, y: u16, editing: bool) {
    let background = if editing { theme.selected } else { theme.background };
    match value {
        RowValue::None => {}
        RowValue::Submenu => surface.draw_icon(icons::MORE, GLYPH_X, y - 3),
        RowValue::Number {
            value,
            decimals: 0,
            signed: false,
        } => {
            let style = NumberStyle::new(Font::MENU, theme.text).with_background(background);
            let rounded = if value >= 0.0 { value + 0.5 } else { value - 0.5 };
            surface.draw_int(style, 5, VALX + MENU_CHR_W, y, rounded as i32);
        }
        RowValue::Number {
            value,
            decimals,
            signed,
        } => {
            let style = NumberStyle::new(Font::MENU, theme.text).with_background(background);
            let i_num = 5u8.saturating_sub(decimals).max(1);
            if signed {
                surface.draw_signed_float(style, i_num, decimals, VALX, y, value);
            } else {
                surface.draw_float(style, i_num, decimals, VALX, y, value);
            }
        }
        RowValue::Text(text) => {
            let width = text.len() as u16 * MENU_CHR_W;
            let x = VALUE_RIGHT.saturating_sub(width).max(VALX - MENU_CHR_W * 4);
            let style = TextStyle::new(Font::MENU, theme.text).with_background(background);
            surface.draw_string_styled(style, x, y - 1, text);
        }
        RowValue::Check(checked) => {
            surface.draw_checkbox(theme.text, background, GLYPH_X, y - 2, checked);
        }
    }
}

/// Selection bar left of `row`
pub fn draw_cursor<T: Transport>(surface: &mut Surface<T>, color: u16, row: u8) {
    let y = mbase(row);
    surface.draw_rectangle(RectMode::Fill, color, 0, y - 18, CURSOR_W, y + 31);
}

/// Remove the selection bar from `row`
pub fn erase_cursor<T: Transport>(surface: &mut Surface<T>, theme: &Theme, row: u8) {
    draw_cursor(surface, theme.background, row);
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_core::config::PersistedSettings;
    use stratum_core::menu::{EditSpec, OptionSpec};
    use stratum_core::state::{EditSession, OptionSession};
    use stratum_core::traits::MachineParam;
    use stratum_core::values::{OptionSlot, ValueSlot};
    use stratum_display::CaptureTransport;
    use stratum_protocol::command::{CMD_DRAW_STRING, CMD_DRAW_VALUE};

    fn item(label: &'static str, action: ItemAction) -> MenuItem {
        MenuItem {
            label,
            icon: icons::AXIS,
            action,
        }
    }

    #[test]
    fn test_row_draws_label_and_value() {
        let mut surface = Surface::new(CaptureTransport::<64>::new());
        let edit = EditSpec::new(ValueSlot::Machine(MachineParam::HotendTarget), 0.0, 300.0, 1.0, 0);
        let row = item("Hotend", ItemAction::Edit(edit));
        let value = RowValue::Number {
            value: 200.0,
            decimals: 0,
            signed: false,
        };
        draw_item(&mut surface, &Theme::default(), &row, row.label, 2, value, false);

        let capture = surface.transport();
        assert!(capture.contains_text("Hotend"));
        assert_eq!(capture.count_command(CMD_DRAW_VALUE), 1);
    }

    #[test]
    fn test_signed_value_draws_sign_glyph() {
        let mut surface = Surface::new(CaptureTransport::<64>::new());
        let value = RowValue::Number {
            value: -0.25,
            decimals: 2,
            signed: true,
        };
        draw_item(
            &mut surface,
            &Theme::default(),
            &item("Offset", ItemAction::Label),
            "Offset",
            1,
            value,
            true,
        );
        let capture = surface.transport();
        assert!(capture.contains_text("-"));
        assert_eq!(capture.count_command(CMD_DRAW_STRING), 2);
    }

    #[test]
    fn test_host_action_row_uses_configured_label() {
        let mut values = ValueStore::new(PersistedSettings::default());
        let first = item("Host Action 1", ItemAction::Run(Task::HostAction(0)));
        let second = item("Host Action 2", ItemAction::Run(Task::HostAction(1)));
        values.settings.host_action_labels[0] = stratum_core::config::sanitize_label("Cool");
        assert_eq!(row_label(&first, &values), "Cool");
        assert_eq!(row_label(&second, &values), "Host Action 2");
        assert_eq!(row_label(&item("Move", ItemAction::Label), &values), "Move");
    }

    #[test]
    fn test_editor_value_overrides_stored() {
        let values = ValueStore::new(PersistedSettings::default());
        let spec = OptionSpec {
            slot: OptionSlot::PreheatMode,
        };
        let mut session = OptionSession::new(&spec, 0, 3);
        session.rotate(1);
        let editor = Editor::Option(session);
        let row = item("Preheat Mode", ItemAction::Choose(spec));
        let host = crate::controller::tests::MockHost::default();

        assert_eq!(
            resolve_value(&row, 3, &values, Some(&editor), &host),
            (RowValue::Text("Hotend"), true)
        );
        assert_eq!(
            resolve_value(&row, 2, &values, Some(&editor), &host),
            (RowValue::Text("Both"), false)
        );
    }

    #[test]
    fn test_editing_value_reports_session_value() {
        let spec = EditSpec::new(ValueSlot::Machine(MachineParam::FanSpeed), 0.0, 255.0, 1.0, 0);
        let mut session = EditSession::new(&spec, 10.0, 1);
        session.rotate(1);
        assert_eq!(
            RowValue::editing(&Editor::Value(session)),
            RowValue::Number {
                value: 11.0,
                decimals: 0,
                signed: false
            }
        );
    }
}
