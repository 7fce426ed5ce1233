//! Popups, acknowledgements and wait screens

use stratum_protocol::icons;

use super::mode::InteractionMode;
use crate::menu::MenuId;
use crate::traits::MachineCommand;

/// Every popup the UI can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PopupId {
    Pause,
    Stop,
    Resume,
    SaveLevel,
    ETemp,
    ConfFilChange,
    PurgeMore,
    MeshSlot,
    Level,
    Home,
    MoveWait,
    Heating,
    FilLoad,
    FilChange,
    TempWarn,
    Runout,
    PIDWait,
    Resuming,
    ManualProbing,
    FilInsert,
    HeaterTime,
    UserInput,
    LevelError,
    InvalidMesh,
    UI,
    Complete,
    ESDiagPopup,
}

/// How a popup takes input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PopupKind {
    /// Confirm / cancel buttons
    Choice,
    /// A single button
    Acknowledge,
    /// No input; closes when the machine is idle
    Wait,
}

impl PopupKind {
    /// Interaction mode while shown
    pub fn mode(self) -> InteractionMode {
        match self {
            PopupKind::Choice => InteractionMode::Popup,
            PopupKind::Acknowledge => InteractionMode::Confirm,
            PopupKind::Wait => InteractionMode::Wait,
        }
    }
}

/// Fixed content of a popup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PopupDescriptor {
    pub id: PopupId,
    pub kind: PopupKind,
    pub lines: [&'static str; 3],
    pub icon: Option<u8>,
}

impl PopupDescriptor {
    pub fn two_choices(&self) -> bool {
        self.kind == PopupKind::Choice
    }
}

const fn choice(id: PopupId, lines: [&'static str; 3], icon: Option<u8>) -> PopupDescriptor {
    PopupDescriptor {
        id,
        kind: PopupKind::Choice,
        lines,
        icon,
    }
}

const fn ack(id: PopupId, lines: [&'static str; 3], icon: Option<u8>) -> PopupDescriptor {
    PopupDescriptor {
        id,
        kind: PopupKind::Acknowledge,
        lines,
        icon,
    }
}

const fn wait(id: PopupId, lines: [&'static str; 3], icon: Option<u8>) -> PopupDescriptor {
    PopupDescriptor {
        id,
        kind: PopupKind::Wait,
        lines,
        icon,
    }
}

impl PopupId {
    pub fn descriptor(self) -> PopupDescriptor {
        use PopupId::*;
        match self {
            Pause => choice(self, ["Pause Print", "", ""], Some(icons::PAUSE_0)),
            Stop => choice(self, ["Stop Print", "", ""], Some(icons::STOP_0)),
            Resume => choice(
                self,
                ["Resume Print?", "Looks Like the last", "print was interrupted."],
                Some(icons::CONTINUE_0),
            ),
            SaveLevel => choice(
                self,
                ["Leveling Complete", "Save to EEPROM?", ""],
                Some(icons::AUTOLEVELING),
            ),
            ETemp => choice(
                self,
                ["Nozzle is too cold", "Open Preheat Menu?", ""],
                Some(icons::TEMP_TOO_LOW),
            ),
            ConfFilChange => choice(self, ["Confirm Filament Change", "", ""], None),
            PurgeMore => choice(
                self,
                ["Purge more filament?", "(Cancel to finish process)", ""],
                None,
            ),
            MeshSlot => ack(
                self,
                ["Mesh slot not selected", "(Confirm to select slot 0)", ""],
                None,
            ),
            Level => wait(
                self,
                ["Auto Bed Leveling", "Please wait until done.", ""],
                Some(icons::AUTOLEVELING),
            ),
            Home => wait(self, ["Homing XYZ", "Please wait until done.", ""], Some(icons::HOMING)),
            MoveWait => wait(self, ["Moving to Point", "Please wait until done.", ""], None),
            Heating => wait(self, ["Heating", "Please wait until done.", ""], Some(icons::TEMP_TOO_LOW)),
            FilLoad => wait(self, ["Loading Filament", "Please wait until done.", ""], None),
            FilChange => wait(self, ["Filament Change", "Please wait for prompt.", ""], None),
            TempWarn => ack(
                self,
                ["Nozzle temp too low!", "Heat before extruding", ""],
                Some(icons::TEMP_TOO_LOW),
            ),
            Runout => ack(self, ["Filament Runout", "", ""], None),
            PIDWait => wait(self, ["PID Autotune", "in process", "Please wait until done."], None),
            Resuming => wait(self, ["Resuming Print", "Please wait until done.", ""], None),
            ManualProbing => choice(
                self,
                ["Manual Probing", "(Confirm to probe)", "(cancel to exit)"],
                None,
            ),
            FilInsert => ack(self, ["Insert Filament", "Press to Continue", ""], None),
            HeaterTime => ack(self, ["Heater Timed Out", "Press to Reheat", ""], None),
            UserInput => ack(self, ["Waiting For Input", "Press to Continue", ""], None),
            LevelError => ack(
                self,
                ["Couldn't enable Leveling", "(Valid mesh must exist)", ""],
                None,
            ),
            InvalidMesh => ack(
                self,
                ["Valid mesh must exist", "before tuning can be", "performed"],
                None,
            ),
            UI => choice(self, ["Are you sure?", "", ""], None),
            Complete => ack(self, ["Print Finished", "", ""], Some(icons::INFO_1)),
            ESDiagPopup => ack(self, ["Endstop Diagnostic", "", ""], Some(icons::ESDIAG)),
        }
    }

    /// Conditions after which the interrupted screen makes no sense
    pub fn is_unrecoverable(self) -> bool {
        matches!(self, PopupId::TempWarn | PopupId::LevelError | PopupId::Complete)
    }

    /// What each button does when the popup is raised from outside the UI
    pub fn default_continuations(self) -> (Continuation, Continuation) {
        use Continuation::*;
        match self {
            PopupId::Pause => (Machine(MachineCommand::PausePrint), Return),
            PopupId::Stop => (StopPrint, Return),
            PopupId::Resume => (Machine(MachineCommand::ResumePrint), Machine(MachineCommand::StopPrint)),
            PopupId::SaveLevel => (SaveMesh, Return),
            PopupId::ETemp => (OpenMenu(MenuId::Preheat), Return),
            PopupId::ConfFilChange => (
                MachineThenWait(MachineCommand::ChangeFilament, PopupId::FilChange),
                Return,
            ),
            PopupId::PurgeMore => (
                Machine(MachineCommand::PurgeMore),
                Machine(MachineCommand::HostPromptResponse { choice: 1 }),
            ),
            PopupId::ManualProbing => (Machine(MachineCommand::NextMeshPoint), Return),
            PopupId::FilInsert | PopupId::HeaterTime | PopupId::UserInput => (
                Machine(MachineCommand::HostPromptResponse { choice: 0 }),
                Return,
            ),
            _ => (Return, Return),
        }
    }
}

/// What runs when a popup button is pressed
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Continuation {
    /// Back to the interrupted screen
    Return,
    /// Send a command, then return
    Machine(MachineCommand),
    /// Send a command and show a wait screen until the machine is idle
    MachineThenWait(MachineCommand, PopupId),
    /// Stop the print and show the cancel screen
    StopPrint,
    /// Store the mesh in the selected slot
    SaveMesh,
    /// Restore and persist the default settings
    ResetSettings,
    Reboot,
    /// Leave everything and show the main screen
    GoMain,
    /// Open a menu from the main screen
    OpenMenu(MenuId),
}

/// Popup button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Choice {
    A,
    B,
}

/// The popup currently shown
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PopupState {
    pub descriptor: PopupDescriptor,
    pub selection: Choice,
    /// Mode shown before the popup opened
    pub return_mode: InteractionMode,
    pub on_a: Continuation,
    pub on_b: Continuation,
}

impl PopupState {
    pub fn new(id: PopupId, return_mode: InteractionMode, on_a: Continuation, on_b: Continuation) -> Self {
        let return_mode = if id.is_unrecoverable() {
            InteractionMode::Main
        } else {
            return_mode
        };
        Self {
            descriptor: id.descriptor(),
            selection: Choice::A,
            return_mode,
            on_a,
            on_b,
        }
    }

    pub fn id(&self) -> PopupId {
        self.descriptor.id
    }

    /// Move between the two buttons; returns true if the selection changed
    pub fn rotate(&mut self, delta: i8) -> bool {
        if !self.descriptor.two_choices() {
            return false;
        }
        let next = match (self.selection, delta) {
            (Choice::A, d) if d > 0 => Choice::B,
            (Choice::B, d) if d < 0 => Choice::A,
            (current, _) => current,
        };
        let changed = next != self.selection;
        self.selection = next;
        changed
    }

    /// Continuation for the selected button
    ///
    /// Single-button popups always resolve to option A.
    pub fn resolve(&self) -> (Choice, Continuation) {
        match self.selection {
            Choice::B if self.descriptor.two_choices() => (Choice::B, self.on_b),
            _ => (Choice::A, self.on_a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_map_to_modes() {
        assert_eq!(PopupId::Stop.descriptor().kind.mode(), InteractionMode::Popup);
        assert_eq!(PopupId::Runout.descriptor().kind.mode(), InteractionMode::Confirm);
        assert_eq!(PopupId::Home.descriptor().kind.mode(), InteractionMode::Wait);
    }

    #[test]
    fn test_rotation_between_buttons() {
        let mut popup = PopupState::new(
            PopupId::Pause,
            InteractionMode::Print,
            Continuation::Machine(MachineCommand::PausePrint),
            Continuation::Return,
        );
        assert!(!popup.rotate(-1));
        assert!(popup.rotate(1));
        assert!(!popup.rotate(1));
        assert_eq!(popup.resolve(), (Choice::B, Continuation::Return));
    }

    #[test]
    fn test_single_button_resolves_to_a() {
        let mut popup = PopupState::new(
            PopupId::FilInsert,
            InteractionMode::Menu,
            Continuation::GoMain,
            Continuation::Return,
        );
        assert!(!popup.rotate(1));
        assert_eq!(popup.resolve(), (Choice::A, Continuation::GoMain));
    }

    #[test]
    fn test_unrecoverable_returns_to_main() {
        let popup = PopupState::new(
            PopupId::LevelError,
            InteractionMode::Menu,
            Continuation::Return,
            Continuation::Return,
        );
        assert_eq!(popup.return_mode, InteractionMode::Main);

        let popup = PopupState::new(
            PopupId::ETemp,
            InteractionMode::Menu,
            Continuation::Return,
            Continuation::Return,
        );
        assert_eq!(popup.return_mode, InteractionMode::Menu);
    }
}
