//! Menu identifiers and titles

use crate::config::MAX_PREHEAT_PRESETS;

/// Preset names, indexed by preset number
pub const PRESET_NAMES: [&str; MAX_PREHEAT_PRESETS as usize] = ["PLA", "ABS", "PETG", "TPU", "Custom"];

const PRESET_TITLES: [&str; MAX_PREHEAT_PRESETS as usize] = [
    "PLA Settings",
    "ABS Settings",
    "PETG Settings",
    "TPU Settings",
    "Custom Settings",
];

/// One addressable menu screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuId {
    Prepare,
    Move,
    HomeMenu,
    ManualLevel,
    ZOffset,
    Preheat,
    ChangeFilament,
    Control,
    TempMenu,
    Pid,
    HotendPid,
    BedPid,
    /// Settings of one preheat preset
    PreheatPreset(u8),
    Motion,
    HomeOffsets,
    MaxSpeed,
    MaxAcceleration,
    MaxJerk,
    Steps,
    FwRetraction,
    Parkmenu,
    Visual,
    ColorSettings,
    Advanced,
    ProbeMenu,
    PhySetMenu,
    Info,
    Leveling,
    LevelView,
    LevelSettings,
    ManualMesh,
    UblMesh,
    Tune,
    /// Labelled commands handed to the print host
    HostActions,
}

impl MenuId {
    pub fn title(self) -> &'static str {
        match self {
            MenuId::Prepare => "Prepare",
            MenuId::Move => "Move",
            MenuId::HomeMenu => "Homing",
            MenuId::ManualLevel => "Manual Leveling",
            MenuId::ZOffset => "Z Offset",
            MenuId::Preheat => "Preheat",
            MenuId::ChangeFilament => "Change Filament",
            MenuId::Control => "Control",
            MenuId::TempMenu => "Temperature",
            MenuId::Pid => "PID Menu",
            MenuId::HotendPid => "Hotend PID Settings",
            MenuId::BedPid => "Bed PID Settings",
            MenuId::PreheatPreset(index) => PRESET_TITLES
                .get(index as usize)
                .copied()
                .unwrap_or("Preheat Settings"),
            MenuId::Motion => "Motion Settings",
            MenuId::HomeOffsets => "Home Offsets",
            MenuId::MaxSpeed => "Max Speed",
            MenuId::MaxAcceleration => "Max Acceleration",
            MenuId::MaxJerk => "Max Jerk",
            MenuId::Steps => "Steps/mm",
            MenuId::FwRetraction => "Firmware Retraction",
            MenuId::Parkmenu => "Park Settings",
            MenuId::Visual => "Visual Settings",
            MenuId::ColorSettings => "UI Color Settings",
            MenuId::Advanced => "Advanced Settings",
            MenuId::ProbeMenu => "Probe Menu",
            MenuId::PhySetMenu => "Physical Settings",
            MenuId::Info => "Info",
            MenuId::Leveling => "Leveling",
            MenuId::LevelView => "Mesh View",
            MenuId::LevelSettings => "Mesh Settings",
            MenuId::ManualMesh => "Mesh Manual",
            MenuId::UblMesh => "UBL Mesh",
            MenuId::Tune => "Tune",
            MenuId::HostActions => "Host Actions",
        }
    }
}
