//! Editable value slots
//!
//! Menu rows edit values that live in three places: the machine (read and
//! written through [`MachineHost`]), the persisted settings record, and a
//! handful of UI-local values that are neither. A [`ValueSlot`] names one of
//! them; [`ValueStore`] reads and writes it.

use stratum_hal::uart::UartConfig;

use crate::config::{BoolSetting, ColorSlot, LevelPreheat, PersistedSettings, SettingField, COLOR_NAMES};
use crate::traits::{MachineCommand, MachineFlag, MachineHost, MachineParam};

/// Values owned by the UI itself
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LocalField {
    PidHotendTarget,
    PidBedTarget,
    PidCycles,
    /// Z of the manual mesh point being adjusted
    MeshPointZ,
    MeshSlot,
    Brightness,
}

/// Target of a numeric edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ValueSlot {
    Machine(MachineParam),
    Setting(SettingField),
    Local(LocalField),
}

/// Target of an option list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OptionSlot {
    Theme(ColorSlot),
    PreheatMode,
    ZOffsetMode,
    LevelPreheat,
}

impl OptionSlot {
    /// Labels in index order
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            OptionSlot::Theme(_) => &COLOR_NAMES,
            OptionSlot::PreheatMode => &PreheatMode::NAMES,
            OptionSlot::ZOffsetMode => &ZOffsetMode::NAMES,
            OptionSlot::LevelPreheat => &LevelPreheat::NAMES,
        }
    }
}

/// Target of a checkbox row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ToggleSlot {
    Setting(BoolSetting),
    Machine(MachineFlag),
}

/// Which heaters a preheat preset drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PreheatMode {
    #[default]
    Both,
    Hotend,
    Bed,
}

impl PreheatMode {
    pub const NAMES: [&'static str; 3] = ["Both", "Hotend", "Bed"];

    pub const fn from_index(index: u8) -> Self {
        match index {
            1 => PreheatMode::Hotend,
            2 => PreheatMode::Bed,
            _ => PreheatMode::Both,
        }
    }

    pub const fn heats_hotend(self) -> bool {
        !matches!(self, PreheatMode::Bed)
    }

    pub const fn heats_bed(self) -> bool {
        !matches!(self, PreheatMode::Hotend)
    }
}

/// When a Z offset edit reaches the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ZOffsetMode {
    /// Offset stored on confirm, nozzle stays put
    #[default]
    NoLive,
    /// Offset stored and nozzle moved on confirm
    OnClick,
    /// Every detent is sent immediately
    Live,
}

impl ZOffsetMode {
    pub const NAMES: [&'static str; 3] = ["No Live", "OnClick", "   Live"];

    pub const fn from_index(index: u8) -> Self {
        match index {
            1 => ZOffsetMode::OnClick,
            2 => ZOffsetMode::Live,
            _ => ZOffsetMode::NoLive,
        }
    }
}

/// UI-local values, reset on every boot
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalValues {
    pub pid_hotend_target: u16,
    pub pid_bed_target: u16,
    pub pid_cycles: u8,
    pub mesh_point_z: f32,
    pub mesh_slot: u8,
    pub brightness: u8,
    pub preheat_mode: PreheatMode,
    pub zoffset_mode: ZOffsetMode,
}

impl Default for LocalValues {
    fn default() -> Self {
        Self {
            pid_hotend_target: 200,
            pid_bed_target: 60,
            pid_cycles: 5,
            mesh_point_z: 0.0,
            mesh_slot: 0,
            brightness: 230,
            preheat_mode: PreheatMode::Both,
            zoffset_mode: ZOffsetMode::NoLive,
        }
    }
}

fn to_u16(value: f32) -> u16 {
    if value <= 0.0 {
        0
    } else if value >= u16::MAX as f32 {
        u16::MAX
    } else {
        (value + 0.5) as u16
    }
}

fn to_u8(value: f32) -> u8 {
    to_u16(value).min(u8::MAX as u16) as u8
}

/// Reads and writes every kind of slot
#[derive(Debug, Clone, PartialEq)]
pub struct ValueStore {
    pub settings: PersistedSettings,
    pub local: LocalValues,
}

impl ValueStore {
    pub fn new(settings: PersistedSettings) -> Self {
        Self {
            settings,
            local: LocalValues::default(),
        }
    }

    /// Current value of a numeric slot
    pub fn get<H: MachineHost + ?Sized>(&self, slot: ValueSlot, host: &H) -> f32 {
        match slot {
            ValueSlot::Machine(param) => host.parameter(param),
            ValueSlot::Setting(field) => self.settings.get(field),
            ValueSlot::Local(field) => match field {
                LocalField::PidHotendTarget => self.local.pid_hotend_target as f32,
                LocalField::PidBedTarget => self.local.pid_bed_target as f32,
                LocalField::PidCycles => self.local.pid_cycles as f32,
                LocalField::MeshPointZ => self.local.mesh_point_z,
                LocalField::MeshSlot => self.local.mesh_slot as f32,
                LocalField::Brightness => self.local.brightness as f32,
            },
        }
    }

    /// Store a numeric slot
    ///
    /// Machine parameters and the manual mesh point are forwarded to the host.
    pub fn set<H: MachineHost + ?Sized>(&mut self, slot: ValueSlot, value: f32, host: &mut H) {
        match slot {
            ValueSlot::Machine(param) => host.execute(MachineCommand::SetParameter(param, value)),
            ValueSlot::Setting(field) => self.settings.set(field, value),
            ValueSlot::Local(field) => match field {
                LocalField::PidHotendTarget => self.local.pid_hotend_target = to_u16(value),
                LocalField::PidBedTarget => self.local.pid_bed_target = to_u16(value),
                LocalField::PidCycles => self.local.pid_cycles = to_u8(value),
                LocalField::MeshPointZ => {
                    self.local.mesh_point_z = value;
                    host.execute(MachineCommand::SetMeshPoint(value));
                }
                LocalField::MeshSlot => self.local.mesh_slot = to_u8(value),
                LocalField::Brightness => self.local.brightness = to_u8(value),
            },
        }
    }

    /// Selected index of an option slot
    pub fn option(&self, slot: OptionSlot) -> u8 {
        match slot {
            OptionSlot::Theme(color) => self.settings.color(color),
            OptionSlot::PreheatMode => self.local.preheat_mode as u8,
            OptionSlot::ZOffsetMode => self.local.zoffset_mode as u8,
            OptionSlot::LevelPreheat => self.settings.level_preheat().index(),
        }
    }

    pub fn set_option(&mut self, slot: OptionSlot, index: u8) {
        match slot {
            OptionSlot::Theme(color) => self.settings.set_color(color, index),
            OptionSlot::PreheatMode => self.local.preheat_mode = PreheatMode::from_index(index),
            OptionSlot::ZOffsetMode => self.local.zoffset_mode = ZOffsetMode::from_index(index),
            OptionSlot::LevelPreheat => self
                .settings
                .set_level_preheat(LevelPreheat::from_index(index)),
        }
    }

    pub fn toggled<H: MachineHost + ?Sized>(&self, slot: ToggleSlot, host: &H) -> bool {
        match slot {
            ToggleSlot::Setting(setting) => self.settings.flag(setting),
            ToggleSlot::Machine(flag) => host.flag(flag),
        }
    }

    /// Flip a checkbox, returning the new state
    ///
    /// Settings that the firmware acts on (host baud rate, extruder
    /// direction) are also sent to the host.
    pub fn toggle<H: MachineHost + ?Sized>(&mut self, slot: ToggleSlot, host: &mut H) -> bool {
        let value = !self.toggled(slot, host);
        match slot {
            ToggleSlot::Setting(setting) => {
                self.settings.set_flag(setting, value);
                match setting {
                    BoolSetting::Baud115k => host.execute(MachineCommand::SetBaudRate(
                        UartConfig::host(value).baudrate,
                    )),
                    BoolSetting::InvertE0 => host.execute(MachineCommand::InvertE0(value)),
                    BoolSetting::TimeFormatTextual => {}
                }
            }
            ToggleSlot::Machine(flag) => host.execute(MachineCommand::SetFlag(flag, value)),
        }
        value
    }
}
