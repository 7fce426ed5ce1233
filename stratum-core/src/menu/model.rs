//! Menu item tables
//!
//! Tables are built on demand from the [`FeatureSet`] and the machine
//! geometry, so a menu only lists what the firmware provides and edit bounds
//! follow the configured bed.

use heapless::Vec;
use stratum_protocol::icons;

use super::action::{Corner, EditSpec, ItemAction, MenuItem, OptionSpec, Task};
use super::ids::{MenuId, PRESET_NAMES};
use crate::config::settings::{Geometry, MeshLimits, PersistedSettings};
use crate::config::{BoolSetting, ColorSlot, FeatureSet, SettingField};
use crate::state::PopupId;
use crate::traits::{Axis, Heater, HomeAxes, MachineCommand, MachineFlag, MachineParam};
use crate::values::{LocalField, OptionSlot, ToggleSlot, ValueSlot};

/// Most rows in any menu, back row included
pub const MAX_ITEMS: usize = 24;

/// Rows of one menu
pub type Items = Vec<MenuItem, MAX_ITEMS>;

/// Smallest gap kept between opposite mesh limits, mm
const MESH_GAP: f32 = 0.1;

/// Row labels used while a host action has no label of its own
pub const HOST_ACTION_ROWS: [&str; 3] = ["Host Action 1", "Host Action 2", "Host Action 3"];

const AXES: [Axis; 4] = [Axis::X, Axis::Y, Axis::Z, Axis::E];
const AXIS_LABELS: [&str; 4] = ["X Axis", "Y Axis", "Z Axis", "Extruder"];

const PREHEAT_LABELS: [&str; 5] = [
    "Preheat PLA",
    "Preheat ABS",
    "Preheat PETG",
    "Preheat TPU",
    "Preheat Custom",
];

fn preset_icon(index: u8) -> u8 {
    if index == 1 {
        icons::ABS_PREHEAT
    } else {
        icons::PLA_PREHEAT
    }
}

fn preset_settings_icon(index: u8) -> u8 {
    if index == 1 {
        icons::SET_ABS_PREHEAT
    } else {
        icons::SET_PLA_PREHEAT
    }
}

fn machine(param: MachineParam, min: f32, max: f32, unit: f32, decimals: u8) -> ItemAction {
    ItemAction::Edit(EditSpec::new(ValueSlot::Machine(param), min, max, unit, decimals))
}

fn setting(field: SettingField, min: f32, max: f32, unit: f32, decimals: u8) -> ItemAction {
    ItemAction::Edit(EditSpec::new(ValueSlot::Setting(field), min, max, unit, decimals))
}

fn local(field: LocalField, min: f32, max: f32, unit: f32, decimals: u8) -> ItemAction {
    ItemAction::Edit(EditSpec::new(ValueSlot::Local(field), min, max, unit, decimals))
}

fn choose(slot: OptionSlot) -> ItemAction {
    ItemAction::Choose(OptionSpec { slot })
}

fn run(task: Task) -> ItemAction {
    ItemAction::Run(task)
}

struct Builder {
    items: Items,
}

impl Builder {
    fn new() -> Self {
        let mut builder = Self { items: Vec::new() };
        builder.add("Back", icons::BACK, ItemAction::Back);
        builder
    }

    fn add(&mut self, label: &'static str, icon: u8, action: ItemAction) -> &mut Self {
        if self.items.push(MenuItem { label, icon, action }).is_err() {
            warn!("menu row {} dropped", label);
        }
        self
    }

    fn add_if(&mut self, cond: bool, label: &'static str, icon: u8, action: ItemAction) -> &mut Self {
        if cond {
            self.add(label, icon, action);
        }
        self
    }

    fn finish(self) -> Items {
        self.items
    }
}

/// The menu tree
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MenuModel {
    features: FeatureSet,
    geometry: Geometry,
    mesh: MeshLimits,
}

impl MenuModel {
    pub fn new(features: FeatureSet, settings: &PersistedSettings) -> Self {
        Self {
            features,
            geometry: settings.geometry,
            mesh: settings.mesh,
        }
    }

    pub fn features(&self) -> &FeatureSet {
        &self.features
    }

    /// Follow geometry and mesh limit changes from the settings
    pub fn follow_settings(&mut self, settings: &PersistedSettings) {
        self.geometry = settings.geometry;
        self.mesh = settings.mesh;
    }

    pub fn title(&self, menu: MenuId) -> &'static str {
        menu.title()
    }

    /// Rows in a menu, back row included
    pub fn item_count(&self, menu: MenuId) -> u8 {
        self.items(menu).len() as u8
    }

    pub fn item(&self, menu: MenuId, index: u8) -> Option<MenuItem> {
        self.items(menu).get(index as usize).copied()
    }

    /// Whether a menu can be opened with this feature set
    pub fn is_available(&self, menu: MenuId) -> bool {
        let f = &self.features;
        match menu {
            MenuId::ChangeFilament => f.advanced_pause,
            MenuId::Pid | MenuId::HotendPid | MenuId::BedPid => f.pid_autotune,
            MenuId::PreheatPreset(index) => index < f.preheat_count,
            MenuId::FwRetraction => f.firmware_retract,
            MenuId::Parkmenu => f.nozzle_park,
            MenuId::ProbeMenu => f.bed_probe,
            MenuId::Leveling | MenuId::LevelView | MenuId::LevelSettings => f.mesh,
            MenuId::ManualMesh => f.mesh && !f.bed_probe,
            MenuId::UblMesh => f.ubl,
            MenuId::HostActions => f.host_action_commands,
            _ => true,
        }
    }

    /// Build the rows of a menu
    pub fn items(&self, menu: MenuId) -> Items {
        let f = &self.features;
        let g = &self.geometry;
        let mut b = Builder::new();
        match menu {
            MenuId::Prepare => {
                b.add("Move", icons::AXIS, ItemAction::Navigate(MenuId::Move))
                    .add("Auto Home", icons::SET_HOME, ItemAction::Navigate(MenuId::HomeMenu))
                    .add("Manual Leveling", icons::PRINT_SIZE, ItemAction::Navigate(MenuId::ManualLevel))
                    .add("Z-Offset", icons::ZOFFSET, ItemAction::Navigate(MenuId::ZOffset))
                    .add("Preheat", icons::TEMPERATURE, ItemAction::Navigate(MenuId::Preheat))
                    .add("Cooldown", icons::COOL, run(Task::Command(MachineCommand::Cooldown)))
                    .add_if(
                        f.advanced_pause,
                        "Change Filament",
                        icons::RESUME_EEPROM,
                        ItemAction::Navigate(MenuId::ChangeFilament),
                    )
                    .add(
                        "Disable Stepper",
                        icons::CLOSE_MOTOR,
                        run(Task::Command(MachineCommand::DisableSteppers)),
                    );
            }
            MenuId::Move => {
                b.add(
                    "Move X",
                    icons::MOVE_X,
                    machine(MachineParam::Position(Axis::X), g.x_min as f32, g.x_max as f32, 0.1, 1),
                )
                .add(
                    "Move Y",
                    icons::MOVE_Y,
                    machine(MachineParam::Position(Axis::Y), g.y_min as f32, g.y_max as f32, 0.1, 1),
                )
                .add(
                    "Move Z",
                    icons::MOVE_Z,
                    machine(MachineParam::Position(Axis::Z), 0.0, g.z_max as f32, 0.1, 1),
                )
                .add(
                    "Extruder",
                    icons::EXTRUDER,
                    machine(MachineParam::Position(Axis::E), -500.0, 500.0, 0.1, 1),
                )
                .add_if(
                    f.bed_probe,
                    "Deploy Probe",
                    icons::PROBE,
                    ItemAction::Toggle(ToggleSlot::Machine(MachineFlag::ProbeDeployed)),
                );
            }
            MenuId::HomeMenu => {
                let home = |axes| run(Task::WaitFor(MachineCommand::Home(axes), PopupId::Home));
                b.add("Home All", icons::HOMING, home(HomeAxes::All))
                    .add("Home X", icons::MOVE_X, home(HomeAxes::Single(Axis::X)))
                    .add("Home Y", icons::MOVE_Y, home(HomeAxes::Single(Axis::Y)))
                    .add("Home Z", icons::MOVE_Z, home(HomeAxes::Single(Axis::Z)));
            }
            MenuId::ManualLevel => {
                b.add("Front Left", icons::AXIS, run(Task::MoveToCorner(Corner::FrontLeft)))
                    .add("Back Left", icons::AXIS, run(Task::MoveToCorner(Corner::BackLeft)))
                    .add("Back Right", icons::AXIS, run(Task::MoveToCorner(Corner::BackRight)))
                    .add("Front Right", icons::AXIS, run(Task::MoveToCorner(Corner::FrontRight)))
                    .add("Center", icons::AXIS, run(Task::MoveToCorner(Corner::Center)))
                    .add("Z-Offset", icons::ZOFFSET, ItemAction::Navigate(MenuId::ZOffset));
            }
            MenuId::ZOffset => {
                b.add("Live Adjustment", icons::ZOFFSET, choose(OptionSlot::ZOffsetMode))
                    .add(
                        "Z Offset",
                        icons::ZOFFSET,
                        machine(MachineParam::ZOffset, -10.0, 10.0, 0.01, 2),
                    )
                    .add(
                        "Save",
                        icons::WRITE_EEPROM,
                        run(Task::Command(MachineCommand::StoreSettings)),
                    );
            }
            MenuId::Preheat => {
                b.add("Preheat Mode", icons::HOMING, choose(OptionSlot::PreheatMode));
                for index in 0..f.preheat_count {
                    b.add(PREHEAT_LABELS[index as usize], preset_icon(index), run(Task::Preheat(index)));
                }
                b.add("Cooldown", icons::COOL, run(Task::Command(MachineCommand::Cooldown)));
            }
            MenuId::ChangeFilament => {
                b.add(
                    "Load Filament",
                    icons::WRITE_EEPROM,
                    run(Task::WaitFor(MachineCommand::LoadFilament, PopupId::FilLoad)),
                )
                .add(
                    "Unload Filament",
                    icons::READ_EEPROM,
                    run(Task::WaitFor(MachineCommand::UnloadFilament, PopupId::FilLoad)),
                )
                .add(
                    "Change Filament",
                    icons::RESUME_EEPROM,
                    run(Task::ConfirmThenWait(
                        PopupId::ConfFilChange,
                        MachineCommand::ChangeFilament,
                        PopupId::FilChange,
                    )),
                );
            }
            MenuId::Control => {
                b.add("Temperature", icons::TEMPERATURE, ItemAction::Navigate(MenuId::TempMenu))
                    .add("Motion", icons::MOTION, ItemAction::Navigate(MenuId::Motion))
                    .add("Visual", icons::PRINT_SIZE, ItemAction::Navigate(MenuId::Visual))
                    .add("Advanced", icons::VERSION, ItemAction::Navigate(MenuId::Advanced))
                    .add("Store Settings", icons::WRITE_EEPROM, run(Task::StoreSettings))
                    .add("Restore Settings", icons::READ_EEPROM, run(Task::LoadSettings))
                    .add("Reset to Defaults", icons::RESUME_EEPROM, run(Task::ResetSettings))
                    .add("Reboot Printer", icons::REBOOT, run(Task::Reboot))
                    .add("Info", icons::INFO, ItemAction::Navigate(MenuId::Info))
                    .add_if(
                        f.host_action_commands,
                        "Host Actions",
                        icons::SET_HOME,
                        ItemAction::Navigate(MenuId::HostActions),
                    );
            }
            MenuId::HostActions => {
                for (index, label) in HOST_ACTION_ROWS.into_iter().enumerate() {
                    b.add(label, icons::SET_HOME, run(Task::HostAction(index as u8)));
                }
            }
            MenuId::TempMenu => {
                b.add(
                    "Hotend",
                    icons::SET_END_TEMP,
                    machine(MachineParam::HotendTarget, 0.0, 275.0, 1.0, 0),
                )
                .add(
                    "Bed",
                    icons::SET_BED_TEMP,
                    machine(MachineParam::BedTarget, 0.0, 120.0, 1.0, 0),
                )
                .add_if(
                    f.fan,
                    "Fan",
                    icons::FAN_SPEED,
                    machine(MachineParam::FanSpeed, 0.0, 255.0, 1.0, 0),
                )
                .add_if(f.pid_autotune, "PID", icons::STEP, ItemAction::Navigate(MenuId::Pid));
                for index in 0..f.preheat_count {
                    b.add(
                        MenuId::PreheatPreset(index).title(),
                        preset_settings_icon(index),
                        ItemAction::Navigate(MenuId::PreheatPreset(index)),
                    );
                }
            }
            MenuId::Pid => {
                b.add("Hotend", icons::HOTEND_TEMP, ItemAction::Navigate(MenuId::HotendPid))
                    .add("Bed", icons::BED_TEMP, ItemAction::Navigate(MenuId::BedPid));
            }
            MenuId::HotendPid => {
                b.add("Autotune", icons::HOTEND_TEMP, run(Task::PidAutotune(Heater::Hotend)))
                    .add(
                        "Temperature",
                        icons::TEMPERATURE,
                        local(LocalField::PidHotendTarget, 0.0, 275.0, 1.0, 0),
                    )
                    .add(
                        "Cycles",
                        icons::RESUME_EEPROM,
                        local(LocalField::PidCycles, 3.0, 50.0, 1.0, 0),
                    );
            }
            MenuId::BedPid => {
                b.add("Autotune", icons::BED_TEMP, run(Task::PidAutotune(Heater::Bed)))
                    .add(
                        "Temperature",
                        icons::TEMPERATURE,
                        local(LocalField::PidBedTarget, 0.0, 120.0, 1.0, 0),
                    )
                    .add(
                        "Cycles",
                        icons::RESUME_EEPROM,
                        local(LocalField::PidCycles, 3.0, 50.0, 1.0, 0),
                    );
            }
            MenuId::PreheatPreset(index) => {
                b.add(
                    "Hotend",
                    icons::SET_END_TEMP,
                    machine(MachineParam::PreheatHotend(index), 0.0, 275.0, 1.0, 0),
                )
                .add(
                    "Bed",
                    icons::SET_BED_TEMP,
                    machine(MachineParam::PreheatBed(index), 0.0, 120.0, 1.0, 0),
                )
                .add_if(
                    f.fan,
                    "Fan",
                    icons::FAN_SPEED,
                    machine(MachineParam::PreheatFan(index), 0.0, 255.0, 1.0, 0),
                );
            }
            MenuId::Motion => {
                b.add("Home Offsets", icons::HOME_OFFSET, ItemAction::Navigate(MenuId::HomeOffsets))
                    .add("Max Speed", icons::MAX_SPEED, ItemAction::Navigate(MenuId::MaxSpeed))
                    .add(
                        "Max Acceleration",
                        icons::MAX_ACCELERATED,
                        ItemAction::Navigate(MenuId::MaxAcceleration),
                    )
                    .add("Max Jerk", icons::MAX_JERK, ItemAction::Navigate(MenuId::MaxJerk))
                    .add("Steps/mm", icons::STEP, ItemAction::Navigate(MenuId::Steps))
                    .add(
                        "Flow Rate",
                        icons::SPEED,
                        machine(MachineParam::FlowPercent, 10.0, 200.0, 1.0, 0),
                    )
                    .add_if(
                        f.firmware_retract,
                        "Firmware Retract",
                        icons::FW_RET_LENGTH,
                        ItemAction::Navigate(MenuId::FwRetraction),
                    );
            }
            MenuId::HomeOffsets => {
                for (i, axis) in AXES[..3].iter().enumerate() {
                    b.add(
                        AXIS_LABELS[i],
                        icons::MOVE_X + i as u8,
                        machine(MachineParam::HomeOffset(*axis), -50.0, 50.0, 0.1, 1),
                    );
                }
            }
            MenuId::MaxSpeed => {
                const MAX: [f32; 4] = [1000.0, 1000.0, 60.0, 200.0];
                for (i, axis) in AXES.iter().enumerate() {
                    b.add(
                        AXIS_LABELS[i],
                        icons::MAX_SPEED_X + i as u8,
                        machine(MachineParam::MaxFeedrate(*axis), 1.0, MAX[i], 1.0, 0),
                    );
                }
            }
            MenuId::MaxAcceleration => {
                const MAX: [f32; 4] = [9999.0, 9999.0, 999.0, 9999.0];
                for (i, axis) in AXES.iter().enumerate() {
                    b.add(
                        AXIS_LABELS[i],
                        icons::MAX_ACC_X + i as u8,
                        machine(MachineParam::MaxAcceleration(*axis), 1.0, MAX[i], 1.0, 0),
                    );
                }
            }
            MenuId::MaxJerk => {
                for (i, axis) in AXES.iter().enumerate() {
                    b.add(
                        AXIS_LABELS[i],
                        icons::MAX_JERK_X + i as u8,
                        machine(MachineParam::MaxJerk(*axis), 0.1, 99.9, 0.1, 1),
                    );
                }
            }
            MenuId::Steps => {
                for (i, axis) in AXES.iter().enumerate() {
                    b.add(
                        AXIS_LABELS[i],
                        icons::STEP_X + i as u8,
                        machine(MachineParam::StepsPerMm(*axis), 1.0, 999.9, 0.1, 1),
                    );
                }
            }
            MenuId::FwRetraction => {
                b.add(
                    "Auto-Retract",
                    icons::STEP_E,
                    ItemAction::Toggle(ToggleSlot::Machine(MachineFlag::AutoRetract)),
                )
                .add(
                    "Retract Length",
                    icons::FW_RET_LENGTH,
                    machine(MachineParam::RetractLength, 0.0, 10.0, 0.01, 2),
                )
                .add(
                    "Retract Speed",
                    icons::FW_RET_SPEED,
                    machine(MachineParam::RetractSpeed, 1.0, 90.0, 1.0, 0),
                )
                .add(
                    "Retract Z Lift",
                    icons::FW_RET_Z_RAISE,
                    machine(MachineParam::RetractZRaise, 0.0, 2.0, 0.01, 2),
                )
                .add(
                    "Recover Extra",
                    icons::FW_RET_LENGTH,
                    machine(MachineParam::RecoverExtra, -5.0, 5.0, 0.01, 2),
                )
                .add(
                    "Recover Speed",
                    icons::FW_RET_SPEED,
                    machine(MachineParam::RecoverSpeed, 1.0, 90.0, 1.0, 0),
                );
            }
            MenuId::Parkmenu => {
                b.add(
                    "Park X",
                    icons::MOVE_X,
                    setting(SettingField::ParkX, g.x_min as f32, g.x_max as f32, 1.0, 0),
                )
                .add(
                    "Park Y",
                    icons::MOVE_Y,
                    setting(SettingField::ParkY, g.y_min as f32, g.y_max as f32, 1.0, 0),
                )
                .add(
                    "Park Z Raise",
                    icons::MOVE_Z,
                    setting(SettingField::ParkZ, 0.0, g.z_max as f32, 1.0, 0),
                )
                .add(
                    "Park Nozzle",
                    icons::PARK,
                    run(Task::WaitFor(MachineCommand::Park, PopupId::MoveWait)),
                );
            }
            MenuId::Visual => {
                b.add(
                    "LCD Brightness",
                    icons::VERSION,
                    local(LocalField::Brightness, 0.0, 255.0, 1.0, 0),
                )
                .add(
                    "Progress as __h__m",
                    icons::PRINT_TIME,
                    ItemAction::Toggle(ToggleSlot::Setting(BoolSetting::TimeFormatTextual)),
                )
                .add("UI Color Settings", icons::MAX_SPEED, ItemAction::Navigate(MenuId::ColorSettings));
            }
            MenuId::ColorSettings => {
                for slot in ColorSlot::ALL {
                    b.add(slot.label(), icons::MAX_SPEED, choose(OptionSlot::Theme(slot)));
                }
            }
            MenuId::Advanced => {
                b.add_if(f.bed_probe, "Probe", icons::PROBE, ItemAction::Navigate(MenuId::ProbeMenu))
                    .add(
                        "Physical Settings",
                        icons::PRINT_SIZE,
                        ItemAction::Navigate(MenuId::PhySetMenu),
                    )
                    .add_if(
                        f.nozzle_park,
                        "Park Settings",
                        icons::PARK,
                        ItemAction::Navigate(MenuId::Parkmenu),
                    )
                    .add_if(
                        f.advanced_pause,
                        "Unload Feedrate",
                        icons::READ_EEPROM,
                        setting(SettingField::FilUnloadFeedrate, 1.0, 99.0, 1.0, 0),
                    )
                    .add_if(
                        f.advanced_pause,
                        "Fast Load Feedrate",
                        icons::WRITE_EEPROM,
                        setting(SettingField::FilFastLoadFeedrate, 1.0, 99.0, 1.0, 0),
                    )
                    .add_if(
                        f.baud_rate_gcode,
                        "115K Baud",
                        icons::SET_SPEED,
                        ItemAction::Toggle(ToggleSlot::Setting(BoolSetting::Baud115k)),
                    )
                    .add(
                        "Invert E0 Dir",
                        icons::EXTRUDER,
                        ItemAction::Toggle(ToggleSlot::Setting(BoolSetting::InvertE0)),
                    )
                    .add_if(f.lock_screen, "Lock Screen", icons::LOCK, run(Task::Lock))
                    .add("Endstop Diagnostic", icons::ESDIAG, run(Task::EndstopDiag));
            }
            MenuId::ProbeMenu => {
                b.add(
                    "Probe X Offset",
                    icons::MOVE_X,
                    machine(MachineParam::ProbeOffset(Axis::X), -50.0, 50.0, 0.1, 1),
                )
                .add(
                    "Probe Y Offset",
                    icons::MOVE_Y,
                    machine(MachineParam::ProbeOffset(Axis::Y), -50.0, 50.0, 0.1, 1),
                )
                .add(
                    "Probing Margin",
                    icons::PRINT_SIZE,
                    setting(SettingField::ProbingMargin, 0.0, 50.0, 0.1, 1),
                )
                .add(
                    "Fast Feedrate",
                    icons::SET_SPEED,
                    setting(SettingField::ProbeFeedFast, 1.0, 999.0, 1.0, 0),
                )
                .add(
                    "Slow Feedrate",
                    icons::SET_SPEED,
                    setting(SettingField::ProbeFeedSlow, 1.0, 999.0, 1.0, 0),
                )
                .add(
                    "Probe Test",
                    icons::BLTOUCH,
                    run(Task::WaitFor(MachineCommand::ProbeTest, PopupId::Home)),
                );
            }
            MenuId::PhySetMenu => {
                b.add(
                    "Bed Size X",
                    icons::PRINT_SIZE,
                    setting(SettingField::XBedSize, 50.0, 1000.0, 1.0, 0),
                )
                .add(
                    "Bed Size Y",
                    icons::PRINT_SIZE,
                    setting(SettingField::YBedSize, 50.0, 1000.0, 1.0, 0),
                )
                .add("X Min", icons::MOVE_X, setting(SettingField::XMin, -100.0, 100.0, 1.0, 0))
                .add("Y Min", icons::MOVE_Y, setting(SettingField::YMin, -100.0, 100.0, 1.0, 0))
                .add("X Max", icons::MOVE_X, setting(SettingField::XMax, 101.0, 1100.0, 1.0, 0))
                .add("Y Max", icons::MOVE_Y, setting(SettingField::YMax, 101.0, 1100.0, 1.0, 0))
                .add("Z Max", icons::MOVE_Z, setting(SettingField::ZMax, 50.0, 1000.0, 1.0, 0));
            }
            MenuId::Info => {
                b.add("Stratum Display UI", icons::VERSION, ItemAction::Label)
                    .add("Bed Size", icons::PRINT_SIZE, ItemAction::Label)
                    .add("Host Firmware", icons::CONTACT, ItemAction::Label);
            }
            MenuId::Leveling => {
                b.add_if(
                    f.bed_probe,
                    "Level Bed",
                    icons::AUTOLEVELING,
                    run(Task::WaitFor(MachineCommand::AutoLevel, PopupId::Level)),
                )
                .add("Mesh Viewer", icons::MESH, ItemAction::Navigate(MenuId::LevelView))
                .add("Leveling Settings", icons::STEP, ItemAction::Navigate(MenuId::LevelSettings))
                .add_if(
                    !f.bed_probe,
                    "Manual Mesh",
                    icons::PRINT_SIZE,
                    ItemAction::Navigate(MenuId::ManualMesh),
                )
                .add_if(f.ubl, "UBL Mesh", icons::TILT, ItemAction::Navigate(MenuId::UblMesh))
                .add("Save Mesh", icons::WRITE_EEPROM, run(Task::SaveMesh));
            }
            MenuId::LevelView => {}
            MenuId::LevelSettings => {
                let bed_x = g.x_bed_size as f32;
                let bed_y = g.y_bed_size as f32;
                let m = &self.mesh;
                let apply = MachineCommand::ApplyMeshLimits;
                // each limit stays clear of its opposite
                let limit = |field, min: f32, max: f32| {
                    ItemAction::Edit(
                        EditSpec::new(ValueSlot::Setting(field), min, max.max(min), 0.1, 1).then(apply),
                    )
                };
                b.add_if(
                    f.preheat_before_leveling,
                    "Preheat Mode",
                    icons::HOMING,
                    choose(OptionSlot::LevelPreheat),
                )
                .add_if(
                    f.preheat_before_leveling,
                    "Hotend Temp",
                    icons::SET_END_TEMP,
                    setting(SettingField::LevelHotendTemp, 0.0, 300.0, 1.0, 0),
                )
                .add_if(
                    f.preheat_before_leveling,
                    "Bed Temp",
                    icons::SET_BED_TEMP,
                    setting(SettingField::LevelBedTemp, 0.0, 150.0, 1.0, 0),
                )
                .add(
                    "Mesh Min X",
                    icons::MOVE_X,
                    limit(SettingField::MeshMinX, 0.0, m.max_x - MESH_GAP),
                )
                .add(
                    "Mesh Max X",
                    icons::MOVE_X,
                    limit(SettingField::MeshMaxX, (m.min_x + MESH_GAP).min(bed_x), bed_x),
                )
                .add(
                    "Mesh Min Y",
                    icons::MOVE_Y,
                    limit(SettingField::MeshMinY, 0.0, m.max_y - MESH_GAP),
                )
                .add(
                    "Mesh Max Y",
                    icons::MOVE_Y,
                    limit(SettingField::MeshMaxY, (m.min_y + MESH_GAP).min(bed_y), bed_y),
                )
                .add(
                    "Corner Inset",
                    icons::PRINT_SIZE,
                    setting(SettingField::CornerPos, 1.0, 100.0, 0.1, 1),
                )
                .add_if(
                    f.ubl,
                    "Tilting Grid Size",
                    icons::TILT,
                    setting(SettingField::TiltGridSize, 1.0, 8.0, 1.0, 0),
                );
            }
            MenuId::ManualMesh => {
                b.add(
                    "Next Point",
                    icons::MORE,
                    run(Task::WaitFor(MachineCommand::NextMeshPoint, PopupId::MoveWait)),
                )
                .add(
                    "Point Z",
                    icons::ZOFFSET,
                    local(LocalField::MeshPointZ, -2.0, 2.0, 0.01, 2),
                );
            }
            MenuId::UblMesh => {
                b.add("Mesh Slot", icons::VERSION, local(LocalField::MeshSlot, 0.0, 9.0, 1.0, 0))
                    .add(
                        "Tilt Mesh",
                        icons::TILT,
                        run(Task::WaitFor(MachineCommand::AutoLevel, PopupId::Level)),
                    )
                    .add(
                        "Next Point",
                        icons::MORE,
                        run(Task::WaitFor(MachineCommand::NextMeshPoint, PopupId::MoveWait)),
                    )
                    .add(
                        "Point Z",
                        icons::ZOFFSET,
                        local(LocalField::MeshPointZ, -2.0, 2.0, 0.01, 2),
                    )
                    .add("Save Mesh", icons::WRITE_EEPROM, run(Task::SaveMesh));
            }
            MenuId::Tune => {
                b.add(
                    "Print Speed",
                    icons::SPEED,
                    machine(MachineParam::FeedratePercent, 10.0, 999.0, 1.0, 0),
                )
                .add(
                    "Flow Rate",
                    icons::SPEED,
                    machine(MachineParam::FlowPercent, 10.0, 200.0, 1.0, 0),
                )
                .add(
                    "Hotend",
                    icons::SET_END_TEMP,
                    machine(MachineParam::HotendTarget, 0.0, 275.0, 1.0, 0),
                )
                .add(
                    "Bed",
                    icons::SET_BED_TEMP,
                    machine(MachineParam::BedTarget, 0.0, 120.0, 1.0, 0),
                )
                .add_if(
                    f.fan,
                    "Fan",
                    icons::FAN_SPEED,
                    machine(MachineParam::FanSpeed, 0.0, 255.0, 1.0, 0),
                )
                .add(
                    "Z-Offset",
                    icons::ZOFFSET,
                    machine(MachineParam::ZOffset, -10.0, 10.0, 0.01, 2),
                )
                .add_if(
                    f.advanced_pause,
                    "Change Filament",
                    icons::RESUME_EEPROM,
                    run(Task::ConfirmThenWait(
                        PopupId::ConfFilChange,
                        MachineCommand::ChangeFilament,
                        PopupId::FilChange,
                    )),
                )
                .add_if(f.lock_screen, "Lock Screen", icons::LOCK, run(Task::Lock));
            }
        }
        b.finish()
    }
}

/// Preset display name
pub fn preset_name(index: u8) -> &'static str {
    PRESET_NAMES.get(index as usize).copied().unwrap_or("Custom")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_MENUS: [MenuId; 34] = [
        MenuId::Prepare,
        MenuId::Move,
        MenuId::HomeMenu,
        MenuId::ManualLevel,
        MenuId::ZOffset,
        MenuId::Preheat,
        MenuId::ChangeFilament,
        MenuId::Control,
        MenuId::TempMenu,
        MenuId::Pid,
        MenuId::HotendPid,
        MenuId::BedPid,
        MenuId::PreheatPreset(0),
        MenuId::Motion,
        MenuId::HomeOffsets,
        MenuId::MaxSpeed,
        MenuId::MaxAcceleration,
        MenuId::MaxJerk,
        MenuId::Steps,
        MenuId::FwRetraction,
        MenuId::Parkmenu,
        MenuId::Visual,
        MenuId::ColorSettings,
        MenuId::Advanced,
        MenuId::ProbeMenu,
        MenuId::PhySetMenu,
        MenuId::Info,
        MenuId::Leveling,
        MenuId::LevelView,
        MenuId::LevelSettings,
        MenuId::ManualMesh,
        MenuId::UblMesh,
        MenuId::Tune,
        MenuId::HostActions,
    ];

    fn model(features: FeatureSet) -> MenuModel {
        MenuModel::new(features, &PersistedSettings::default())
    }

    #[test]
    fn test_every_menu_starts_with_back_and_fits() {
        for features in [FeatureSet::default(), FeatureSet::full()] {
            let model = model(features);
            for menu in ALL_MENUS {
                let items = model.items(menu);
                assert_eq!(items[0].action, ItemAction::Back, "{:?}", menu);
                assert!(items.len() < MAX_ITEMS, "{:?}", menu);
            }
        }
    }

    #[test]
    fn test_feature_dependent_rows() {
        let stock = model(FeatureSet::default());
        let full = model(FeatureSet::full());
        assert_eq!(stock.item_count(MenuId::Preheat), 1 + 1 + 2 + 1);
        assert_eq!(full.item_count(MenuId::Preheat), 1 + 1 + 5 + 1);
        assert!(full.item_count(MenuId::Advanced) > stock.item_count(MenuId::Advanced));
        assert!(!stock.is_available(MenuId::Leveling));
        assert!(!stock.is_available(MenuId::PreheatPreset(2)));
        assert!(full.is_available(MenuId::PreheatPreset(4)));
    }

    #[test]
    fn test_navigation_targets_are_available() {
        for features in [FeatureSet::default(), FeatureSet::full()] {
            let model = model(features);
            for menu in ALL_MENUS.iter().filter(|m| model.is_available(**m)) {
                for item in model.items(*menu) {
                    if let ItemAction::Navigate(target) = item.action {
                        assert!(model.is_available(target), "{:?} -> {:?}", menu, target);
                    }
                }
            }
        }
    }

    #[test]
    fn test_mesh_limit_edits_apply_limits() {
        let model = model(FeatureSet::full());
        let item = model.item(MenuId::LevelSettings, 4);
        match item.map(|i| i.action) {
            Some(ItemAction::Edit(spec)) => {
                assert_eq!(spec.slot, ValueSlot::Setting(SettingField::MeshMinX));
                assert_eq!(spec.completion, Some(MachineCommand::ApplyMeshLimits));
                assert_eq!(spec.min, 0.0);
                assert_eq!(spec.max, 205.0 - MESH_GAP);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    fn edit_bounds(model: &MenuModel, row: u8) -> (f32, f32) {
        match model.item(MenuId::LevelSettings, row).map(|i| i.action) {
            Some(ItemAction::Edit(spec)) => (spec.min, spec.max),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_mesh_limits_bound_each_other() {
        let mut settings = PersistedSettings::default();
        let mut model = MenuModel::new(FeatureSet::full(), &settings);
        // rows 4..=7: min X, max X, min Y, max Y
        assert_eq!(edit_bounds(&model, 5), (25.0 + MESH_GAP, 230.0));
        assert_eq!(edit_bounds(&model, 7), (25.0 + MESH_GAP, 230.0));

        settings.mesh.max_x = 120.0;
        settings.mesh.min_y = 60.0;
        model.follow_settings(&settings);
        assert_eq!(edit_bounds(&model, 4), (0.0, 120.0 - MESH_GAP));
        assert_eq!(edit_bounds(&model, 7), (60.0 + MESH_GAP, 230.0));

        // a degenerate record never yields an inverted range
        settings.mesh.min_x = 230.0;
        model.follow_settings(&settings);
        let (min, max) = edit_bounds(&model, 5);
        assert!(min <= max);
    }

    #[test]
    fn test_host_actions_follow_feature() {
        let stock = model(FeatureSet::default());
        let full = model(FeatureSet::full());
        assert!(!stock.is_available(MenuId::HostActions));
        assert!(full.is_available(MenuId::HostActions));
        assert_eq!(full.item_count(MenuId::Control), stock.item_count(MenuId::Control) + 1);

        let last = full.item(MenuId::Control, full.item_count(MenuId::Control) - 1);
        assert_eq!(last.map(|i| i.action), Some(ItemAction::Navigate(MenuId::HostActions)));
        assert_eq!(
            full.item(MenuId::HostActions, 3).map(|i| i.action),
            Some(ItemAction::Run(Task::HostAction(2)))
        );
    }

    #[test]
    fn test_item_out_of_range() {
        let model = model(FeatureSet::default());
        assert_eq!(model.item(MenuId::Pid, 3), None);
    }
}
