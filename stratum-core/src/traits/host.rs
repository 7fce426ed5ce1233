//! Machine-host collaborator
//!
//! The UI never drives motion, heaters or the print job itself. It reads
//! status from a [`MachineHost`] and hands it [`MachineCommand`]s; whatever
//! the firmware does with them is outside this crate.

use heapless::String;

/// Maximum length of a file or print name the UI keeps
pub const MAX_NAME_LEN: usize = 64;

/// Motion axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    X,
    Y,
    Z,
    E,
}

impl Axis {
    pub const fn label(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
            Axis::E => "E",
        }
    }
}

/// Heater selection for autotune
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Heater {
    Hotend,
    Bed,
}

/// Axes to home
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HomeAxes {
    All,
    Single(Axis),
}

/// Live machine parameters the UI can read and edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineParam {
    HotendTarget,
    BedTarget,
    FanSpeed,
    FeedratePercent,
    FlowPercent,
    ZOffset,
    Position(Axis),
    HomeOffset(Axis),
    MaxFeedrate(Axis),
    MaxAcceleration(Axis),
    MaxJerk(Axis),
    StepsPerMm(Axis),
    RetractLength,
    RetractSpeed,
    RetractZRaise,
    RecoverExtra,
    RecoverSpeed,
    PreheatHotend(u8),
    PreheatBed(u8),
    PreheatFan(u8),
    ProbeOffset(Axis),
}

/// Boolean machine switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineFlag {
    AutoRetract,
    ProbeDeployed,
}

/// State of the print job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PrintStatus {
    #[default]
    Idle,
    Printing,
    Paused,
    Complete,
}

impl PrintStatus {
    /// A job exists, running or paused
    pub fn is_active(self) -> bool {
        matches!(self, PrintStatus::Printing | PrintStatus::Paused)
    }
}

/// Values shown in the status area and on the print screen
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineStatus {
    pub hotend_temp: f32,
    pub hotend_target: f32,
    pub bed_temp: f32,
    pub bed_target: f32,
    /// 0..=255
    pub fan_speed: u8,
    pub feedrate_percent: u16,
    pub z_offset: f32,
    pub position: [f32; 3],
    pub print: PrintStatus,
    /// 0..=100
    pub progress: u8,
    pub elapsed_s: u32,
    pub remaining_s: Option<u32>,
}

/// Endstop switches, true when triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Endstops {
    pub x: bool,
    pub y: bool,
    pub z: bool,
    pub probe: bool,
}

/// One entry of the file listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String<MAX_NAME_LEN>,
    pub is_dir: bool,
}

/// Commands the UI hands to the firmware
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MachineCommand {
    SetParameter(MachineParam, f32),
    SetFlag(MachineFlag, bool),
    Home(HomeAxes),
    DisableSteppers,
    Cooldown,
    /// Heat to preset `index`; each part is skipped when false
    Preheat { index: u8, hotend: bool, bed: bool },
    /// Heat hotend and bed to explicit temperatures before leveling
    PreheatForLeveling { hotend: Option<u16>, bed: Option<u16> },
    MoveTo { x: f32, y: f32, z: f32 },
    ChangeFilament,
    LoadFilament,
    UnloadFilament,
    PurgeMore,
    PidAutotune { heater: Heater, target: u16, cycles: u8 },
    AutoLevel,
    /// Store the active mesh in a slot
    SaveMesh { slot: u8 },
    /// Probe the next manual mesh point
    NextMeshPoint,
    /// Set Z of the current manual mesh point
    SetMeshPoint(f32),
    ApplyMeshLimits,
    ProbeTest,
    Park,
    PausePrint,
    ResumePrint,
    StopPrint,
    StartPrint { index: u16 },
    OpenFolder { index: u16 },
    FolderUp,
    /// Persist machine settings (the firmware's own store)
    StoreSettings,
    LoadSettings,
    ResetSettings,
    SetBaudRate(u32),
    InvertE0(bool),
    Reboot,
    /// Answer to a host prompt
    HostPromptResponse { choice: u8 },
    /// Ask the print host to run its labelled action `index`
    HostAction { index: u8 },
}

/// Read side and command sink of the machine
pub trait MachineHost {
    /// Snapshot of the values shown on screen
    fn status(&self) -> MachineStatus;

    /// Current value of an editable parameter
    fn parameter(&self, param: MachineParam) -> f32;

    /// Current state of a switch
    fn flag(&self, flag: MachineFlag) -> bool;

    /// True while a blocking operation (homing, heating, probing) runs
    fn is_busy(&self) -> bool;

    /// Name of the file being printed
    fn print_filename(&self) -> &str;

    /// Entries in the current folder
    fn file_count(&self) -> u16;

    fn file_entry(&self, index: u16) -> Option<FileEntry>;

    /// True when the listing is below the media root
    fn in_subfolder(&self) -> bool;

    /// Mesh grid dimensions (points along X and Y)
    fn mesh_size(&self) -> (u8, u8);

    /// Z deviation at grid point, `None` when unprobed
    fn mesh_point(&self, x: u8, y: u8) -> Option<f32>;

    /// Current endstop states
    fn endstops(&self) -> Endstops;

    /// Hand a command to the firmware
    fn execute(&mut self, command: MachineCommand);
}
