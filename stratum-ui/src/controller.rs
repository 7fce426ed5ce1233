//! UI controller
//!
//! [`Controller`] owns every piece of UI state: the interaction mode, the
//! navigation stack, the open editor, popup or lock screen, and the values
//! being edited. Input arrives one encoder event at a time through
//! [`Controller::handle_input`]; machine state is polled through
//! [`Controller::tick`]. Each call works out how much of the screen changed
//! and draws only that part.

use heapless::String;
use stratum_core::config::{sanitize_label, FeatureSet, PersistedSettings, SettingField};
use stratum_core::menu::{ItemAction, MenuId, MenuModel, Task};
use stratum_core::state::{
    Continuation, EditSession, Editor, InteractionMode, LockOutcome, LockState, NavigationStack, OptionSession,
    PopupId, PopupState, Redraw, Step,
};
use stratum_core::traits::{Endstops, Heater, MachineCommand, MachineHost, MachineParam, PrintStatus};
use stratum_core::values::{LocalField, OptionSlot, ValueSlot, ValueStore, ZOffsetMode};
use stratum_display::layout::TROWS;
use stratum_display::{Surface, Transport};
use stratum_hal::storage::SettingsStore;
use stratum_protocol::EncoderEvent;

use crate::render::{self, menu, popup, screens};
use crate::storage::{load_settings, save_settings, PersistError};
use crate::theme::Theme;

/// Longest status message kept
pub const STATUS_LEN: usize = 64;

const SETTINGS_RESET_MSG: &str = "Settings reset to defaults";
const CANCEL_LINES: [&str; 3] = ["Stopping Print", "Please wait until done.", ""];

/// Selection in the file browser; entry 0 is the back row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FileCursor {
    pub selected: u16,
    pub scroll: u16,
}

impl FileCursor {
    fn step(&mut self, delta: i8, rows: u16) -> Redraw {
        let from = self.selected;
        let to = if delta > 0 {
            from.saturating_add(1).min(rows.saturating_sub(1))
        } else if delta < 0 {
            from.saturating_sub(1)
        } else {
            from
        };
        if to == from {
            return Redraw::None;
        }

        let visible = TROWS as u16;
        let old_row = from.saturating_sub(self.scroll) as u8;
        self.selected = to;
        if to < self.scroll {
            self.scroll = to;
            Redraw::Full
        } else if to >= self.scroll + visible {
            self.scroll = to + 1 - visible;
            Redraw::Full
        } else {
            Redraw::Rows {
                from: old_row,
                to: (to - self.scroll) as u8,
            }
        }
    }

    fn screen_row(&self) -> u8 {
        self.selected.saturating_sub(self.scroll) as u8
    }
}

fn step_clamped(value: u8, delta: i8, count: u8) -> u8 {
    if delta > 0 {
        value.saturating_add(1).min(count.saturating_sub(1))
    } else if delta < 0 {
        value.saturating_sub(1)
    } else {
        value
    }
}

fn title_or<'a>(status: &'a str, fallback: &'a str) -> &'a str {
    if status.is_empty() {
        fallback
    } else {
        status
    }
}

fn read_settings<S: SettingsStore>(store: &mut S, features: &FeatureSet) -> (PersistedSettings, Option<&'static str>) {
    match load_settings(store, features) {
        Ok(settings) => (settings, None),
        Err(e) if e.is_empty_store() => {
            debug!("no stored settings, using defaults");
            (PersistedSettings::defaults(features), None)
        }
        Err(_e) => {
            warn!("settings load failed ({}), using defaults", _e);
            (PersistedSettings::defaults(features), Some(SETTINGS_RESET_MSG))
        }
    }
}

/// Menu and interaction state machine driving one display
pub struct Controller<T: Transport, S: SettingsStore> {
    surface: Surface<T>,
    store: S,
    model: MenuModel,
    values: ValueStore,
    theme: Theme,
    mode: InteractionMode,
    nav: NavigationStack,
    editor: Option<Editor>,
    popup: Option<PopupState>,
    lock: Option<LockState>,
    main_selection: u8,
    print_selection: u8,
    files: FileCursor,
    /// Shown in the title of the main and print screens
    status: String<STATUS_LEN>,
    /// Print state seen by the previous tick
    last_print: PrintStatus,
    /// Endstop states last drawn by the diagnostic popup
    endstops: Option<Endstops>,
}

impl<T: Transport, S: SettingsStore> Controller<T, S> {
    /// Create a controller, restoring the stored settings
    ///
    /// A missing record silently yields defaults. A corrupt one yields
    /// defaults plus a status message.
    pub fn new(transport: T, mut store: S, features: FeatureSet) -> Self {
        let (settings, notice) = read_settings(&mut store, &features);
        let theme = Theme::from_settings(&settings);
        let model = MenuModel::new(features, &settings);
        let mut controller = Self {
            surface: Surface::new(transport),
            store,
            model,
            values: ValueStore::new(settings),
            theme,
            mode: InteractionMode::Main,
            nav: NavigationStack::new(),
            editor: None,
            popup: None,
            lock: None,
            main_selection: 0,
            print_selection: 0,
            files: FileCursor::default(),
            status: String::new(),
            last_print: PrintStatus::Idle,
            endstops: None,
        };
        if let Some(text) = notice {
            controller.set_status(text);
        }
        controller
    }

    /// Backlight level applied by [`start`](Self::start)
    pub fn with_brightness(mut self, level: u8) -> Self {
        self.values.local.brightness = level;
        self
    }

    /// Handshake, backlight and first full draw
    pub fn start<H: MachineHost + ?Sized>(&mut self, host: &H) {
        self.surface.init();
        self.surface.backlight(self.values.local.brightness);
        self.last_print = host.status().print;
        info!("ui started");
        self.redraw_screen(host);
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn nav(&self) -> &NavigationStack {
        &self.nav
    }

    pub fn editor(&self) -> Option<&Editor> {
        self.editor.as_ref()
    }

    pub fn popup(&self) -> Option<&PopupState> {
        self.popup.as_ref()
    }

    pub fn lock_state(&self) -> Option<&LockState> {
        self.lock.as_ref()
    }

    pub fn values(&self) -> &ValueStore {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut ValueStore {
        &mut self.values
    }

    pub fn settings(&self) -> &PersistedSettings {
        &self.values.settings
    }

    pub fn model(&self) -> &MenuModel {
        &self.model
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn main_selection(&self) -> u8 {
        self.main_selection
    }

    pub fn print_selection(&self) -> u8 {
        self.print_selection
    }

    pub fn file_cursor(&self) -> FileCursor {
        self.files
    }

    pub fn surface(&self) -> &Surface<T> {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface<T> {
        &mut self.surface
    }

    /// Process one encoder event
    pub fn handle_input<H: MachineHost + ?Sized>(&mut self, event: EncoderEvent, host: &mut H) -> Redraw {
        let delta = event.rotation_delta();
        trace!("input {} in {}", delta, self.mode);
        let redraw = match self.mode {
            InteractionMode::Main => self.on_main(delta),
            InteractionMode::Print => self.on_print(delta, host),
            InteractionMode::Menu => self.on_menu(delta, host),
            InteractionMode::Value => self.on_value(delta, host),
            InteractionMode::Option => self.on_option(delta),
            InteractionMode::File => self.on_file(delta, host),
            InteractionMode::Popup | InteractionMode::Confirm => self.on_popup(delta, host),
            InteractionMode::Locked => self.on_locked(delta),
            InteractionMode::Wait | InteractionMode::Cancel => Redraw::None,
        };
        self.render(redraw, host);
        redraw
    }

    /// Poll the machine: print transitions, wait completion, live values
    pub fn tick<H: MachineHost + ?Sized>(&mut self, host: &mut H) -> Redraw {
        let status = host.status();
        let mut redraw = Redraw::None;
        if status.print != self.last_print {
            let previous = self.last_print;
            self.last_print = status.print;
            redraw = self.on_print_change(previous, status.print, host);
        }
        if redraw == Redraw::None {
            redraw = match self.mode {
                InteractionMode::Wait if !host.is_busy() => self.finish_wait(),
                InteractionMode::Cancel if !status.print.is_active() => self.go_main(),
                _ => Redraw::None,
            };
        }

        self.render(redraw, host);
        if redraw != Redraw::Full {
            self.refresh(host);
        }
        redraw
    }

    /// Replace the status message, redrawing the title where it shows
    pub fn update_status(&mut self, text: &str) {
        self.set_status(text);
        let fallback = match self.mode {
            InteractionMode::Main => "Main Menu",
            InteractionMode::Print => "Printing...",
            _ => return,
        };
        render::draw_title(&mut self.surface, &self.theme, title_or(&self.status, fallback));
    }

    /// Raise a popup with its usual button actions
    pub fn show_popup<H: MachineHost + ?Sized>(&mut self, id: PopupId, host: &mut H) -> Redraw {
        let (on_a, on_b) = id.default_continuations();
        self.show_popup_with(id, on_a, on_b, host)
    }

    /// Raise a popup with explicit button actions
    pub fn show_popup_with<H: MachineHost + ?Sized>(
        &mut self,
        id: PopupId,
        on_a: Continuation,
        on_b: Continuation,
        host: &mut H,
    ) -> Redraw {
        let redraw = self.open_popup(id, on_a, on_b, host);
        self.render(redraw, host);
        redraw
    }

    /// Open a menu from the main or print screen, or on top of the current menu
    pub fn open_menu<H: MachineHost + ?Sized>(&mut self, menu: MenuId, host: &H) -> Redraw {
        let redraw = match self.mode {
            InteractionMode::Main | InteractionMode::Print => {
                self.nav.reset(self.mode);
                self.push_menu(menu)
            }
            InteractionMode::Menu => self.push_menu(menu),
            _ => {
                warn!("cannot open {} in {}", menu, self.mode);
                Redraw::None
            }
        };
        self.render(redraw, host);
        redraw
    }

    /// Leave the current menu or abandon the open edit
    ///
    /// Outside the menus and editors this does nothing.
    pub fn back<H: MachineHost + ?Sized>(&mut self, host: &mut H) -> Redraw {
        let redraw = match self.mode {
            InteractionMode::Menu => self.go_back(),
            InteractionMode::Value | InteractionMode::Option => self.abort_edit(host),
            _ => Redraw::None,
        };
        self.render(redraw, host);
        redraw
    }

    /// Abandon the open edit, restoring the original value
    pub fn cancel_edit<H: MachineHost + ?Sized>(&mut self, host: &mut H) -> Redraw {
        let redraw = self.abort_edit(host);
        self.render(redraw, host);
        redraw
    }

    /// Show the lock screen over the current mode
    pub fn lock<H: MachineHost + ?Sized>(&mut self, host: &mut H) -> Redraw {
        let redraw = self.enter_lock(host);
        self.render(redraw, host);
        redraw
    }

    /// Act on row `index` of `menu`, or with `draw` set only repaint it
    pub fn dispatch_item<H: MachineHost + ?Sized>(
        &mut self,
        menu: MenuId,
        index: u8,
        draw: bool,
        host: &mut H,
    ) -> Redraw {
        let Some(frame) = self.nav.current().copied().filter(|f| f.menu == menu) else {
            warn!("dispatch to {} which is not open", menu);
            return Redraw::None;
        };
        if index < frame.scroll || index - frame.scroll >= TROWS {
            return Redraw::None;
        }
        let row = index - frame.scroll;
        if draw {
            self.draw_menu_row(row, host);
            return Redraw::None;
        }
        let redraw = self.activate(menu, index, row, host);
        self.render(redraw, host);
        redraw
    }

    /// Name host action `index`, reduced to what the settings record holds
    ///
    /// Returns false for an index without a slot.
    pub fn set_host_action_label(&mut self, index: u8, text: &str) -> bool {
        let Some(slot) = self.values.settings.host_action_labels.get_mut(index as usize) else {
            return false;
        };
        *slot = sanitize_label(text);
        true
    }

    /// Encode and write the settings record
    pub fn store_settings(&mut self) -> Result<usize, PersistError> {
        save_settings(&mut self.store, self.model.features(), &self.values.settings)
    }

    /// Re-read the settings record and repaint
    pub fn reload_settings<H: MachineHost + ?Sized>(&mut self, host: &H) {
        self.reload();
        self.redraw_screen(host);
    }

    /// Restore and store the default settings, then repaint
    pub fn reset_settings<H: MachineHost + ?Sized>(&mut self, host: &H) {
        self.reset_values();
        self.redraw_screen(host);
    }

    /// Repaint the whole screen for the current mode
    pub fn redraw_screen<H: MachineHost + ?Sized>(&mut self, host: &H) {
        match self.mode {
            InteractionMode::Main => {
                let title = title_or(&self.status, "Main Menu");
                let leveling = self.model.features().mesh;
                screens::draw_main(&mut self.surface, &self.theme, title, leveling, self.main_selection);
            }
            InteractionMode::Print => {
                let status = host.status();
                let fallback = if status.print == PrintStatus::Paused {
                    "Print Paused"
                } else {
                    "Printing..."
                };
                let view = screens::PrintView {
                    title: title_or(&self.status, fallback),
                    filename: host.print_filename(),
                    status: &status,
                    textual_time: self.values.settings.time_format_textual,
                    selected: self.print_selection,
                };
                screens::draw_print(&mut self.surface, &self.theme, &view);
            }
            InteractionMode::Menu | InteractionMode::Value | InteractionMode::Option => {
                if let Some(frame) = self.nav.current() {
                    menu::draw_menu(
                        &mut self.surface,
                        &self.theme,
                        &self.model,
                        frame,
                        &self.values,
                        self.editor.as_ref(),
                        host,
                    );
                }
            }
            InteractionMode::File => {
                screens::draw_files(&mut self.surface, &self.theme, host, self.files.selected, self.files.scroll);
            }
            InteractionMode::Popup | InteractionMode::Confirm | InteractionMode::Wait => {
                if let Some(state) = &self.popup {
                    popup::draw_popup(&mut self.surface, &self.theme, state);
                }
                self.endstops = None;
                self.draw_endstops(host);
            }
            InteractionMode::Locked => {
                let slider = self.lock.map(|l| l.slider).unwrap_or(0);
                screens::draw_lock(&mut self.surface, &self.theme, slider);
            }
            InteractionMode::Cancel => popup::draw_message(&mut self.surface, &self.theme, &CANCEL_LINES),
        }
        self.draw_status(host);
    }

    fn set_status(&mut self, text: &str) {
        self.status.clear();
        for c in text.chars() {
            if self.status.push(c).is_err() {
                break;
            }
        }
    }

    fn set_mode(&mut self, mode: InteractionMode) {
        // While locked, only overlays may replace the lock screen. Any other
        // target is remembered for the unlock.
        let mode = match self.lock.as_mut() {
            Some(lock) if !Self::shows_over_lock(mode) => {
                lock.return_mode = mode;
                InteractionMode::Locked
            }
            _ => mode,
        };
        if self.mode != mode {
            debug!("mode {} -> {}", self.mode, mode);
            self.mode = mode;
        }
    }

    fn shows_over_lock(mode: InteractionMode) -> bool {
        matches!(
            mode,
            InteractionMode::Locked
                | InteractionMode::Popup
                | InteractionMode::Confirm
                | InteractionMode::Wait
                | InteractionMode::Cancel
        )
    }

    // Input per mode

    fn on_main(&mut self, delta: i8) -> Redraw {
        if delta != 0 {
            let from = self.main_selection;
            let to = step_clamped(from, delta, screens::MAIN_BUTTONS);
            if to == from {
                return Redraw::None;
            }
            self.main_selection = to;
            return Redraw::Rows { from, to };
        }
        match self.main_selection {
            0 => self.open_files(),
            1 => self.enter_menus(InteractionMode::Main, MenuId::Prepare),
            2 => self.enter_menus(InteractionMode::Main, MenuId::Control),
            _ if self.model.features().mesh => self.enter_menus(InteractionMode::Main, MenuId::Leveling),
            _ => self.enter_menus(InteractionMode::Main, MenuId::Info),
        }
    }

    fn on_print<H: MachineHost + ?Sized>(&mut self, delta: i8, host: &mut H) -> Redraw {
        if delta != 0 {
            let from = self.print_selection;
            let to = step_clamped(from, delta, screens::PRINT_BUTTONS);
            if to == from {
                return Redraw::None;
            }
            self.print_selection = to;
            return Redraw::Rows { from, to };
        }
        match self.print_selection {
            0 => self.enter_menus(InteractionMode::Print, MenuId::Tune),
            1 if host.status().print == PrintStatus::Paused => {
                host.execute(MachineCommand::ResumePrint);
                Redraw::Row(1)
            }
            1 => self.open_default_popup(PopupId::Pause, host),
            _ => self.open_default_popup(PopupId::Stop, host),
        }
    }

    fn on_menu<H: MachineHost + ?Sized>(&mut self, delta: i8, host: &mut H) -> Redraw {
        let Some(frame) = self.nav.current().copied() else {
            let base = self.nav.base();
            return self.resume(base);
        };
        if delta != 0 {
            let count = self.model.item_count(frame.menu);
            let Some(current) = self.nav.current_mut() else {
                return Redraw::None;
            };
            return match current.step(delta, count, TROWS) {
                Step::Unchanged => Redraw::None,
                Step::Moved { from, to } => Redraw::Rows { from, to },
                Step::Scrolled => Redraw::Full,
            };
        }
        self.activate(frame.menu, frame.selected_row, frame.screen_row(), host)
    }

    fn on_value<H: MachineHost + ?Sized>(&mut self, delta: i8, host: &mut H) -> Redraw {
        let Some(Editor::Value(mut session)) = self.editor else {
            self.editor = None;
            self.set_mode(InteractionMode::Menu);
            return Redraw::Full;
        };
        if delta != 0 {
            if !session.rotate(delta) {
                return Redraw::None;
            }
            self.editor = Some(Editor::Value(session));
            if self.is_live_zoffset(session.slot) {
                self.values.set(session.slot, session.value(), host);
            }
            return Redraw::Row(session.row);
        }

        self.editor = None;
        let (value, completion) = session.confirm();
        self.commit_value(session.slot, value, host);
        if let Some(command) = completion {
            host.execute(command);
        }
        self.set_mode(InteractionMode::Menu);
        Redraw::Row(session.row)
    }

    fn on_option(&mut self, delta: i8) -> Redraw {
        let Some(Editor::Option(mut session)) = self.editor else {
            self.editor = None;
            self.set_mode(InteractionMode::Menu);
            return Redraw::Full;
        };
        if delta != 0 {
            if !session.rotate(delta) {
                return Redraw::None;
            }
            self.editor = Some(Editor::Option(session));
            return Redraw::Row(session.row);
        }

        self.editor = None;
        let slot = session.slot;
        let row = session.row;
        self.values.set_option(slot, session.confirm());
        self.set_mode(InteractionMode::Menu);
        if let OptionSlot::Theme(_) = slot {
            self.theme = Theme::from_settings(&self.values.settings);
            return Redraw::Full;
        }
        Redraw::Row(row)
    }

    fn on_file<H: MachineHost + ?Sized>(&mut self, delta: i8, host: &mut H) -> Redraw {
        if delta != 0 {
            let rows = host.file_count().saturating_add(1);
            return self.files.step(delta, rows);
        }
        let index = self.files.selected;
        if index == 0 {
            if host.in_subfolder() {
                host.execute(MachineCommand::FolderUp);
                self.files = FileCursor::default();
                return Redraw::Full;
            }
            return self.go_main();
        }
        match host.file_entry(index - 1) {
            Some(entry) if entry.is_dir => {
                host.execute(MachineCommand::OpenFolder { index: index - 1 });
                self.files = FileCursor::default();
                Redraw::Full
            }
            Some(_) => {
                host.execute(MachineCommand::StartPrint { index: index - 1 });
                self.enter_print()
            }
            None => Redraw::None,
        }
    }

    fn on_popup<H: MachineHost + ?Sized>(&mut self, delta: i8, host: &mut H) -> Redraw {
        let Some(mut state) = self.popup else {
            return self.go_main();
        };
        if delta != 0 {
            if !state.rotate(delta) {
                return Redraw::None;
            }
            self.popup = Some(state);
            return Redraw::Row(0);
        }
        self.popup = None;
        let (_choice, next) = state.resolve();
        debug!("popup {} answered {}", state.id(), _choice);
        self.continue_with(next, state.return_mode, host)
    }

    fn on_locked(&mut self, delta: i8) -> Redraw {
        let Some(mut lock) = self.lock else {
            return self.go_main();
        };
        if delta != 0 {
            let moved = lock.rotate(delta);
            self.lock = Some(lock);
            return if moved { Redraw::Row(0) } else { Redraw::None };
        }
        match lock.click() {
            LockOutcome::Reset => {
                self.lock = Some(lock);
                Redraw::Row(0)
            }
            LockOutcome::Unlocked(mode) => {
                self.lock = None;
                info!("unlocked");
                self.resume(mode)
            }
        }
    }

    // Menu rows

    fn activate<H: MachineHost + ?Sized>(&mut self, menu: MenuId, index: u8, row: u8, host: &mut H) -> Redraw {
        let Some(item) = self.model.item(menu, index) else {
            return Redraw::None;
        };
        match item.action {
            ItemAction::Back => self.go_back(),
            ItemAction::Navigate(target) => self.push_menu(target),
            ItemAction::Edit(spec) => {
                let current = self.values.get(spec.slot, host);
                self.editor = Some(Editor::Value(EditSession::new(&spec, current, row)));
                self.set_mode(InteractionMode::Value);
                Redraw::Row(row)
            }
            ItemAction::Choose(spec) => {
                let current = self.values.option(spec.slot);
                self.editor = Some(Editor::Option(OptionSession::new(&spec, current, row)));
                self.set_mode(InteractionMode::Option);
                Redraw::Row(row)
            }
            ItemAction::Toggle(slot) => {
                self.values.toggle(slot, host);
                Redraw::Row(row)
            }
            ItemAction::Run(task) => self.run_task(task, host),
            ItemAction::Label => Redraw::None,
        }
    }

    fn is_live_zoffset(&self, slot: ValueSlot) -> bool {
        slot == ValueSlot::Machine(MachineParam::ZOffset) && self.values.local.zoffset_mode == ZOffsetMode::Live
    }

    fn commit_value<H: MachineHost + ?Sized>(&mut self, slot: ValueSlot, value: f32, host: &mut H) {
        self.values.set(slot, value, host);
        match slot {
            ValueSlot::Local(LocalField::Brightness) => self.surface.backlight(self.values.local.brightness),
            ValueSlot::Machine(MachineParam::ZOffset) if self.values.local.zoffset_mode == ZOffsetMode::OnClick => {
                let [x, y, _] = host.status().position;
                host.execute(MachineCommand::MoveTo { x, y, z: 0.0 });
            }
            ValueSlot::Setting(_) => self.model.follow_settings(&self.values.settings),
            _ => {}
        }
    }

    fn abort_edit<H: MachineHost + ?Sized>(&mut self, host: &mut H) -> Redraw {
        let Some(editor) = self.editor.take() else {
            return Redraw::None;
        };
        if let Editor::Value(session) = editor {
            let slot = session.slot;
            let original = session.cancel();
            if self.is_live_zoffset(slot) {
                self.values.set(slot, original, host);
            }
        }
        self.set_mode(InteractionMode::Menu);
        Redraw::Row(editor.row())
    }

    fn run_task<H: MachineHost + ?Sized>(&mut self, task: Task, host: &mut H) -> Redraw {
        debug!("task {}", task);
        match task {
            Task::Command(command) => {
                host.execute(command);
                Redraw::None
            }
            Task::WaitFor(command, wait) => {
                if command == MachineCommand::AutoLevel {
                    self.preheat_for_leveling(host);
                }
                host.execute(command);
                self.open_popup(wait, Continuation::Return, Continuation::Return, host)
            }
            Task::ConfirmThenWait(ask, command, wait) => self.open_popup(
                ask,
                Continuation::MachineThenWait(command, wait),
                Continuation::Return,
                host,
            ),
            Task::Preheat(index) => {
                let mode = self.values.local.preheat_mode;
                host.execute(MachineCommand::Preheat {
                    index,
                    hotend: mode.heats_hotend(),
                    bed: mode.heats_bed(),
                });
                Redraw::None
            }
            Task::MoveToCorner(corner) => {
                let inset = self.values.settings.get(SettingField::CornerPos);
                let (x, y) = corner.position(&self.values.settings.geometry, inset);
                host.execute(MachineCommand::MoveTo { x, y, z: 0.0 });
                self.open_popup(PopupId::MoveWait, Continuation::Return, Continuation::Return, host)
            }
            Task::PidAutotune(heater) => {
                let local = self.values.local;
                let target = match heater {
                    Heater::Hotend => local.pid_hotend_target,
                    Heater::Bed => local.pid_bed_target,
                };
                host.execute(MachineCommand::PidAutotune {
                    heater,
                    target,
                    cycles: local.pid_cycles,
                });
                self.open_popup(PopupId::PIDWait, Continuation::Return, Continuation::Return, host)
            }
            Task::SaveMesh => {
                host.execute(MachineCommand::SaveMesh {
                    slot: self.values.local.mesh_slot,
                });
                self.set_status("Mesh saved");
                Redraw::None
            }
            Task::StoreSettings => {
                host.execute(MachineCommand::StoreSettings);
                self.persist("Settings stored");
                Redraw::None
            }
            Task::LoadSettings => {
                host.execute(MachineCommand::LoadSettings);
                self.reload();
                Redraw::Full
            }
            Task::ResetSettings => {
                self.open_popup(PopupId::UI, Continuation::ResetSettings, Continuation::Return, host)
            }
            Task::Reboot => self.open_popup(PopupId::UI, Continuation::Reboot, Continuation::Return, host),
            Task::Lock => self.enter_lock(host),
            Task::EndstopDiag => {
                self.open_popup(PopupId::ESDiagPopup, Continuation::Return, Continuation::Return, host)
            }
            Task::HostAction(index) => {
                host.execute(MachineCommand::HostAction { index });
                Redraw::None
            }
        }
    }

    fn preheat_for_leveling<H: MachineHost + ?Sized>(&self, host: &mut H) {
        if !self.model.features().preheat_before_leveling {
            return;
        }
        let s = &self.values.settings;
        let hotend = s.level_preheat_hotend.then_some(s.level_hotend_temp);
        let bed = s.level_preheat_bed.then_some(s.level_bed_temp);
        if hotend.is_some() || bed.is_some() {
            host.execute(MachineCommand::PreheatForLeveling { hotend, bed });
        }
    }

    // Mode changes

    fn go_main(&mut self) -> Redraw {
        self.nav.reset(InteractionMode::Main);
        self.editor = None;
        self.set_mode(InteractionMode::Main);
        Redraw::Full
    }

    fn enter_print(&mut self) -> Redraw {
        self.nav.reset(InteractionMode::Print);
        self.editor = None;
        self.print_selection = 0;
        self.set_mode(InteractionMode::Print);
        Redraw::Full
    }

    fn open_files(&mut self) -> Redraw {
        self.files = FileCursor::default();
        self.set_mode(InteractionMode::File);
        Redraw::Full
    }

    fn enter_menus(&mut self, base: InteractionMode, menu: MenuId) -> Redraw {
        self.nav.reset(base);
        self.push_menu(menu)
    }

    fn push_menu(&mut self, menu: MenuId) -> Redraw {
        if !self.model.is_available(menu) {
            warn!("menu {} not available", menu);
            return Redraw::None;
        }
        if !self.nav.push(menu) {
            return Redraw::None;
        }
        self.set_mode(InteractionMode::Menu);
        Redraw::Full
    }

    fn go_back(&mut self) -> Redraw {
        self.nav.pop();
        if self.nav.is_empty() {
            let base = self.nav.base();
            return self.resume(base);
        }
        Redraw::Full
    }

    /// Return to `mode` after a popup or the lock screen
    fn resume(&mut self, mode: InteractionMode) -> Redraw {
        match mode {
            InteractionMode::Main => return self.go_main(),
            InteractionMode::Menu | InteractionMode::Value | InteractionMode::Option if self.nav.is_empty() => {
                return self.go_main()
            }
            // an edit never survives an interruption
            InteractionMode::Value | InteractionMode::Option => {
                self.editor = None;
                self.set_mode(InteractionMode::Menu);
            }
            InteractionMode::Locked if self.lock.is_none() => return self.go_main(),
            m => self.set_mode(m),
        }
        Redraw::Full
    }

    fn open_default_popup<H: MachineHost + ?Sized>(&mut self, id: PopupId, host: &mut H) -> Redraw {
        let (on_a, on_b) = id.default_continuations();
        self.open_popup(id, on_a, on_b, host)
    }

    fn open_popup<H: MachineHost + ?Sized>(
        &mut self,
        id: PopupId,
        on_a: Continuation,
        on_b: Continuation,
        host: &mut H,
    ) -> Redraw {
        let return_mode = match self.mode {
            InteractionMode::Value | InteractionMode::Option => {
                self.abort_edit(host);
                InteractionMode::Menu
            }
            InteractionMode::Popup | InteractionMode::Confirm | InteractionMode::Wait => {
                self.popup.map(|p| p.return_mode).unwrap_or(InteractionMode::Main)
            }
            mode => mode,
        };
        let state = PopupState::new(id, return_mode, on_a, on_b);
        debug!("popup {} over {}", id, state.return_mode);
        self.set_mode(state.descriptor.kind.mode());
        self.popup = Some(state);
        Redraw::Full
    }

    fn continue_with<H: MachineHost + ?Sized>(
        &mut self,
        next: Continuation,
        return_mode: InteractionMode,
        host: &mut H,
    ) -> Redraw {
        match next {
            Continuation::Return => self.resume(return_mode),
            Continuation::Machine(command) => {
                host.execute(command);
                self.resume(return_mode)
            }
            Continuation::MachineThenWait(command, wait) => {
                host.execute(command);
                let state = PopupState::new(wait, return_mode, Continuation::Return, Continuation::Return);
                self.set_mode(state.descriptor.kind.mode());
                self.popup = Some(state);
                Redraw::Full
            }
            Continuation::StopPrint => {
                host.execute(MachineCommand::StopPrint);
                self.nav.reset(InteractionMode::Main);
                self.set_mode(InteractionMode::Cancel);
                Redraw::Full
            }
            Continuation::SaveMesh => {
                host.execute(MachineCommand::SaveMesh {
                    slot: self.values.local.mesh_slot,
                });
                self.resume(return_mode)
            }
            Continuation::ResetSettings => {
                host.execute(MachineCommand::ResetSettings);
                self.reset_values();
                self.resume(return_mode)
            }
            Continuation::Reboot => {
                host.execute(MachineCommand::Reboot);
                self.resume(return_mode)
            }
            Continuation::GoMain => self.go_main(),
            Continuation::OpenMenu(menu) => {
                self.resume(return_mode);
                match self.mode {
                    InteractionMode::Menu => {}
                    InteractionMode::Print => self.nav.reset(InteractionMode::Print),
                    _ => self.nav.reset(InteractionMode::Main),
                }
                self.push_menu(menu);
                Redraw::Full
            }
        }
    }

    fn enter_lock<H: MachineHost + ?Sized>(&mut self, host: &mut H) -> Redraw {
        if !self.model.features().lock_screen {
            return Redraw::None;
        }
        let return_mode = match self.mode {
            InteractionMode::Value | InteractionMode::Option => {
                self.abort_edit(host);
                InteractionMode::Menu
            }
            InteractionMode::Popup
            | InteractionMode::Confirm
            | InteractionMode::Wait
            | InteractionMode::Locked => {
                warn!("lock ignored in {}", self.mode);
                return Redraw::None;
            }
            mode => mode,
        };
        info!("locked");
        self.lock = Some(LockState::new(return_mode));
        self.set_mode(InteractionMode::Locked);
        Redraw::Full
    }

    // Machine polling

    fn on_print_change<H: MachineHost + ?Sized>(
        &mut self,
        previous: PrintStatus,
        current: PrintStatus,
        host: &mut H,
    ) -> Redraw {
        debug!("print {} -> {}", previous, current);
        match current {
            PrintStatus::Complete if previous.is_active() => {
                info!("print complete");
                self.open_default_popup(PopupId::Complete, host)
            }
            PrintStatus::Printing
                if !previous.is_active()
                    && matches!(self.mode, InteractionMode::Main | InteractionMode::File) =>
            {
                self.enter_print()
            }
            PrintStatus::Idle if previous.is_active() && self.mode == InteractionMode::Print => self.go_main(),
            PrintStatus::Paused | PrintStatus::Printing if self.mode == InteractionMode::Print => Redraw::Row(1),
            _ => Redraw::None,
        }
    }

    fn finish_wait(&mut self) -> Redraw {
        let Some(state) = self.popup.take() else {
            return self.go_main();
        };
        debug!("wait {} done", state.id());
        if state.id() == PopupId::Level {
            let (on_a, on_b) = PopupId::SaveLevel.default_continuations();
            let next = PopupState::new(PopupId::SaveLevel, state.return_mode, on_a, on_b);
            self.set_mode(next.descriptor.kind.mode());
            self.popup = Some(next);
            return Redraw::Full;
        }
        self.resume(state.return_mode)
    }

    // Settings

    fn persist(&mut self, done: &str) {
        match self.store_settings() {
            Ok(_) => self.set_status(done),
            Err(_e) => {
                warn!("settings store failed ({})", _e);
                self.set_status("Error storing settings");
            }
        }
    }

    fn apply_settings(&mut self, settings: PersistedSettings) {
        self.values.settings = settings;
        self.model.follow_settings(&self.values.settings);
        self.theme = Theme::from_settings(&self.values.settings);
    }

    fn reload(&mut self) {
        let features = *self.model.features();
        let (settings, notice) = read_settings(&mut self.store, &features);
        self.apply_settings(settings);
        self.set_status(notice.unwrap_or("Settings restored"));
    }

    fn reset_values(&mut self) {
        let defaults = PersistedSettings::defaults(self.model.features());
        self.apply_settings(defaults);
        self.persist("Settings reset");
    }

    // Drawing

    fn render<H: MachineHost + ?Sized>(&mut self, redraw: Redraw, host: &H) {
        match redraw {
            Redraw::None => {}
            Redraw::Full => self.redraw_screen(host),
            Redraw::Row(row) => self.draw_part(row, row, host),
            Redraw::Rows { from, to } => self.draw_part(from, to, host),
        }
    }

    fn draw_part<H: MachineHost + ?Sized>(&mut self, from: u8, to: u8, host: &H) {
        match self.mode {
            InteractionMode::Main => {
                let leveling = self.model.features().mesh;
                for index in [from, to] {
                    let selected = index == self.main_selection;
                    screens::draw_main_button(&mut self.surface, &self.theme, index, selected, leveling);
                }
            }
            InteractionMode::Print => {
                let paused = host.status().print == PrintStatus::Paused;
                for index in [from, to] {
                    let selected = index == self.print_selection;
                    screens::draw_print_button(&mut self.surface, &self.theme, index, selected, paused);
                }
            }
            InteractionMode::Menu | InteractionMode::Value | InteractionMode::Option => {
                self.draw_menu_row(from, host);
                if to != from {
                    self.draw_menu_row(to, host);
                    menu::erase_cursor(&mut self.surface, &self.theme, from);
                }
                if let Some(frame) = self.nav.current() {
                    menu::draw_cursor(&mut self.surface, self.theme.cursor, frame.screen_row());
                }
            }
            InteractionMode::File => {
                for row in [from, to] {
                    let index = self.files.scroll.saturating_add(row as u16);
                    screens::draw_file_row(&mut self.surface, &self.theme, host, index, row);
                }
                if to != from {
                    menu::erase_cursor(&mut self.surface, &self.theme, from);
                }
                menu::draw_cursor(&mut self.surface, self.theme.cursor, self.files.screen_row());
            }
            InteractionMode::Popup | InteractionMode::Confirm => {
                if let Some(state) = self.popup.filter(|p| p.descriptor.two_choices()) {
                    popup::draw_selection(&mut self.surface, &self.theme, state.selection);
                }
            }
            InteractionMode::Locked => {
                if let Some(lock) = self.lock {
                    screens::draw_slider(&mut self.surface, &self.theme, lock.slider);
                }
            }
            InteractionMode::Wait | InteractionMode::Cancel => {}
        }
    }

    fn draw_menu_row<H: MachineHost + ?Sized>(&mut self, screen_row: u8, host: &H) {
        let Some(frame) = self.nav.current().copied() else {
            return;
        };
        let index = frame.scroll.saturating_add(screen_row);
        let Some(item) = self.model.item(frame.menu, index) else {
            return;
        };
        let (value, editing) = menu::resolve_value(&item, screen_row, &self.values, self.editor.as_ref(), host);
        let label = menu::row_label(&item, &self.values);
        menu::draw_item(&mut self.surface, &self.theme, &item, label, screen_row, value, editing);
    }

    fn draw_status<H: MachineHost + ?Sized>(&mut self, host: &H) {
        if self.mode == InteractionMode::Locked {
            return;
        }
        let status = host.status();
        screens::draw_status_area(&mut self.surface, &self.theme, &status, self.model.features().fan);
    }

    /// Repaint the endstop table when the diagnostic is open and a switch changed
    fn draw_endstops<H: MachineHost + ?Sized>(&mut self, host: &H) {
        if self.popup.map(|p| p.id()) != Some(PopupId::ESDiagPopup) {
            return;
        }
        let now = host.endstops();
        if self.endstops == Some(now) {
            return;
        }
        let probe = self.model.features().bed_probe;
        popup::draw_endstops(&mut self.surface, &self.theme, &now, probe);
        self.endstops = Some(now);
    }

    /// Periodic update of live values
    fn refresh<H: MachineHost + ?Sized>(&mut self, host: &H) {
        self.draw_status(host);
        self.draw_endstops(host);
        if self.mode == InteractionMode::Print {
            let status = host.status();
            let textual = self.values.settings.time_format_textual;
            screens::draw_progress(&mut self.surface, &self.theme, &status, textual);
        }
    }
}
