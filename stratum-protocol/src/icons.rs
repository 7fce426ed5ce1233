//! Icon identifiers
//!
//! Bitmaps live in the panel's own flash, library [`ICON_LIBRARY`]. Only the
//! ids are known here; several entries share a bitmap where the stock icon
//! set has nothing more specific.

/// Icon library holding the UI set
pub const ICON_LIBRARY: u8 = 0x09;

pub const LOGO: u8 = 0;
pub const PRINT_0: u8 = 1;
pub const PRINT_1: u8 = 2;
pub const PREPARE_0: u8 = 3;
pub const PREPARE_1: u8 = 4;
pub const CONTROL_0: u8 = 5;
pub const CONTROL_1: u8 = 6;
pub const LEVELING_0: u8 = 7;
pub const LEVELING_1: u8 = 8;
pub const HOTEND_TEMP: u8 = 9;
pub const BED_TEMP: u8 = 10;
pub const SPEED: u8 = 11;
pub const ZOFFSET: u8 = 12;
pub const BACK: u8 = 13;
pub const FILE: u8 = 14;
pub const PRINT_TIME: u8 = 15;
pub const REMAIN_TIME: u8 = 16;
pub const SETUP_0: u8 = 17;
pub const SETUP_1: u8 = 18;
pub const PAUSE_0: u8 = 19;
pub const PAUSE_1: u8 = 20;
pub const CONTINUE_0: u8 = 21;
pub const CONTINUE_1: u8 = 22;
pub const STOP_0: u8 = 23;
pub const STOP_1: u8 = 24;
pub const BAR: u8 = 25;
pub const MORE: u8 = 26;
pub const AXIS: u8 = 27;
pub const CLOSE_MOTOR: u8 = 28;
pub const HOMING: u8 = 29;
pub const SET_HOME: u8 = 30;
pub const PLA_PREHEAT: u8 = 31;
pub const ABS_PREHEAT: u8 = 32;
pub const COOL: u8 = 33;
pub const LANGUAGE: u8 = 34;
pub const MOVE_X: u8 = 35;
pub const MOVE_Y: u8 = 36;
pub const MOVE_Z: u8 = 37;
pub const EXTRUDER: u8 = 38;
pub const TEMPERATURE: u8 = 40;
pub const MOTION: u8 = 41;
pub const WRITE_EEPROM: u8 = 42;
pub const READ_EEPROM: u8 = 43;
pub const RESUME_EEPROM: u8 = 44;
pub const INFO: u8 = 45;
pub const SET_END_TEMP: u8 = 46;
pub const SET_BED_TEMP: u8 = 47;
pub const FAN_SPEED: u8 = 48;
pub const SET_PLA_PREHEAT: u8 = 49;
pub const SET_ABS_PREHEAT: u8 = 50;
pub const MAX_SPEED: u8 = 51;
pub const MAX_ACCELERATED: u8 = 52;
pub const MAX_JERK: u8 = 53;
pub const STEP: u8 = 54;
pub const PRINT_SIZE: u8 = 55;
pub const VERSION: u8 = 56;
pub const CONTACT: u8 = 57;
pub const STOCK_CONFIGURATION: u8 = 58;
pub const MAX_SPEED_X: u8 = 59;
pub const MAX_SPEED_Y: u8 = 60;
pub const MAX_SPEED_Z: u8 = 61;
pub const MAX_SPEED_E: u8 = 62;
pub const MAX_ACC_X: u8 = 63;
pub const MAX_ACC_Y: u8 = 64;
pub const MAX_ACC_Z: u8 = 65;
pub const MAX_ACC_E: u8 = 66;
pub const MAX_JERK_X: u8 = 67;
pub const MAX_JERK_Y: u8 = 68;
pub const MAX_JERK_Z: u8 = 69;
pub const MAX_JERK_E: u8 = 70;
pub const STEP_X: u8 = 71;
pub const STEP_Y: u8 = 72;
pub const STEP_Z: u8 = 73;
pub const STEP_E: u8 = 74;
pub const SET_SPEED: u8 = 75;
pub const HOME_OFFSET: u8 = 76;
pub const INFO_0: u8 = 90;
pub const INFO_1: u8 = 91;
pub const CONFIRM_E: u8 = 97;
pub const CANCEL_E: u8 = 99;
pub const CONTINUE_E: u8 = 96;
pub const TEMP_TOO_LOW: u8 = 108;
pub const AUTOLEVELING: u8 = 109;
pub const TEMP_TOO_HIGH: u8 = 110;
pub const BLTOUCH: u8 = 116;
pub const UNLOCK: u8 = 117;

// Aliases for entries without a dedicated bitmap
pub const FOLDER: u8 = MORE;
pub const LOCK: u8 = COOL;
pub const REBOOT: u8 = RESUME_EEPROM;
pub const ESDIAG: u8 = INFO;
pub const PROBE: u8 = SET_END_TEMP;
pub const FW_RET_LENGTH: u8 = STEP_E;
pub const FW_RET_SPEED: u8 = SET_SPEED;
pub const FW_RET_Z_RAISE: u8 = MOVE_Z;
pub const MESH: u8 = VERSION;
pub const TILT: u8 = VERSION;
pub const PARK: u8 = AXIS;
