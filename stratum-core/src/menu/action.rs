//! What a menu row does when clicked

use super::ids::MenuId;
use crate::config::Geometry;
use crate::state::PopupId;
use crate::traits::{Heater, MachineCommand};
use crate::values::{OptionSlot, ToggleSlot, ValueSlot};

/// Numeric edit parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EditSpec {
    pub slot: ValueSlot,
    pub min: f32,
    pub max: f32,
    /// Change per detent
    pub unit: f32,
    /// Digits after the point on screen
    pub decimals: u8,
    /// Sent once after the value is stored
    pub completion: Option<MachineCommand>,
}

impl EditSpec {
    pub const fn new(slot: ValueSlot, min: f32, max: f32, unit: f32, decimals: u8) -> Self {
        Self {
            slot,
            min,
            max,
            unit,
            decimals,
            completion: None,
        }
    }

    pub const fn then(mut self, command: MachineCommand) -> Self {
        self.completion = Some(command);
        self
    }
}

/// Option list parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OptionSpec {
    pub slot: OptionSlot,
}

/// Manual leveling target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Corner {
    FrontLeft,
    BackLeft,
    BackRight,
    FrontRight,
    Center,
}

impl Corner {
    /// Bed position in mm, `inset` mm in from the edges
    pub fn position(self, geometry: &Geometry, inset: f32) -> (f32, f32) {
        let x_size = geometry.x_bed_size as f32;
        let y_size = geometry.y_bed_size as f32;
        match self {
            Corner::FrontLeft => (inset, inset),
            Corner::BackLeft => (inset, y_size - inset),
            Corner::BackRight => (x_size - inset, y_size - inset),
            Corner::FrontRight => (x_size - inset, inset),
            Corner::Center => (x_size / 2.0, y_size / 2.0),
        }
    }
}

/// One-shot actions
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Task {
    /// Send a command and stay in the menu
    Command(MachineCommand),
    /// Send a command and wait for the machine behind a wait screen
    WaitFor(MachineCommand, PopupId),
    /// Ask first; option A sends the command and waits
    ConfirmThenWait(PopupId, MachineCommand, PopupId),
    /// Heat to a preset according to the preheat mode
    Preheat(u8),
    /// Move the nozzle over a leveling point
    MoveToCorner(Corner),
    PidAutotune(Heater),
    /// Store the active mesh in the selected slot
    SaveMesh,
    StoreSettings,
    LoadSettings,
    /// Ask, then restore default settings
    ResetSettings,
    /// Ask, then reboot
    Reboot,
    Lock,
    /// Show live endstop states until acknowledged
    EndstopDiag,
    /// Run host action `index`
    HostAction(u8),
}

/// Tagged action of a menu row
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ItemAction {
    /// Row 0 of every menu
    Back,
    Navigate(MenuId),
    Edit(EditSpec),
    Choose(OptionSpec),
    Toggle(ToggleSlot),
    Run(Task),
    /// Display-only row
    Label,
}

impl ItemAction {
    /// Rows that show a value next to the label
    pub fn shows_value(&self) -> bool {
        matches!(self, ItemAction::Edit(_) | ItemAction::Choose(_) | ItemAction::Toggle(_))
    }
}

/// One row of a menu
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuItem {
    pub label: &'static str,
    pub icon: u8,
    pub action: ItemAction,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PersistedSettings;

    #[test]
    fn test_corner_positions() {
        let geometry = PersistedSettings::default().geometry;
        assert_eq!(Corner::FrontLeft.position(&geometry, 32.5), (32.5, 32.5));
        assert_eq!(Corner::BackRight.position(&geometry, 32.5), (197.5, 197.5));
        assert_eq!(Corner::Center.position(&geometry, 32.5), (115.0, 115.0));
    }
}
