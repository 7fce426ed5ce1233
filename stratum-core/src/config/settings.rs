//! Persisted UI settings
//!
//! A fixed-size record, bit-packed field by field:
//!
//! ```text
//! ┌──────┬─────────┬──────────────────────────────┬───────────┐
//! │ SIZE │ VERSION │ FIELDS (LSB-first bitstream) │ CRC-32 LE │
//! │ 1B   │ 1B      │ zero padded                  │ 4B        │
//! └──────┴─────────┴──────────────────────────────┴───────────┘
//! ```
//!
//! SIZE is 64 for the compact layout and 96 when host action labels are
//! carried. Fields of disabled features are still present and hold their
//! defaults. A record that fails any check decodes to an error; callers fall
//! back to [`PersistedSettings::defaults`].

use heapless::String;

use super::bits::{crc32, BitReader, BitWriter, Overflow};
use super::features::FeatureSet;

/// Record format version
pub const SETTINGS_VERSION: u8 = 1;

/// Record size without host action labels
pub const COMPACT_SIZE: usize = 64;

/// Record size with host action labels
pub const EXTENDED_SIZE: usize = 96;

const HEADER_LEN: usize = 2;
const CRC_LEN: usize = 4;

/// Characters per host action label
pub const LABEL_LEN: usize = 8;

/// Host action label
pub type HostLabel = String<LABEL_LEN>;

/// Errors while encoding or decoding a settings record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// Output buffer smaller than the record
    BufferTooSmall,
    /// Size tag does not match the layout for this feature set
    WrongSize,
    /// Unknown format version
    WrongVersion,
    /// CRC mismatch
    Checksum,
    /// A field holds a value outside its legal range
    OutOfRange,
}

impl From<Overflow> for SettingsError {
    fn from(_: Overflow) -> Self {
        SettingsError::BufferTooSmall
    }
}

/// Record size for a feature set
pub const fn record_size(features: &FeatureSet) -> usize {
    if features.host_action_commands {
        EXTENDED_SIZE
    } else {
        COMPACT_SIZE
    }
}

/// Theme slots, each holding a color index 0..=10
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ColorSlot {
    Cursor,
    MenuSplitLine,
    MenuTopBg,
    MenuTopText,
    HighlightBox,
    ProgressPercent,
    ProgressTime,
    StatusBarText,
    StatusAreaText,
    CoordinatesText,
    CoordinatesSplitLine,
}

impl ColorSlot {
    pub const COUNT: usize = 11;

    pub const ALL: [ColorSlot; Self::COUNT] = [
        ColorSlot::Cursor,
        ColorSlot::MenuSplitLine,
        ColorSlot::MenuTopBg,
        ColorSlot::MenuTopText,
        ColorSlot::HighlightBox,
        ColorSlot::ProgressPercent,
        ColorSlot::ProgressTime,
        ColorSlot::StatusBarText,
        ColorSlot::StatusAreaText,
        ColorSlot::CoordinatesText,
        ColorSlot::CoordinatesSplitLine,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ColorSlot::Cursor => "Cursor",
            ColorSlot::MenuSplitLine => "Menu Split Line",
            ColorSlot::MenuTopBg => "Menu Header Bg",
            ColorSlot::MenuTopText => "Menu Header Text",
            ColorSlot::HighlightBox => "Highlight Box",
            ColorSlot::ProgressPercent => "Progress Percent",
            ColorSlot::ProgressTime => "Progress Time",
            ColorSlot::StatusBarText => "Status Bar Text",
            ColorSlot::StatusAreaText => "Status Area Text",
            ColorSlot::CoordinatesText => "Coordinates Text",
            ColorSlot::CoordinatesSplitLine => "Coordinates Line",
        }
    }
}

/// Names of the color indices, in index order
pub const COLOR_NAMES: [&str; 11] = [
    "Default", "White", "Green", "Cyan", "Blue", "Magenta", "Red", "Orange", "Yellow", "Brown",
    "Black",
];

/// Highest valid color index
pub const MAX_COLOR_INDEX: u8 = 10;

/// Boolean settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BoolSetting {
    TimeFormatTextual,
    Baud115k,
    InvertE0,
}

/// Numeric settings, read and written as `f32`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingField {
    /// Manual leveling corner inset, mm
    CornerPos,
    /// Tilt grid points per side, 1..=8
    TiltGridSize,
    LevelHotendTemp,
    LevelBedTemp,
    XBedSize,
    YBedSize,
    XMin,
    YMin,
    XMax,
    YMax,
    ZMax,
    ProbingMargin,
    ProbeFeedFast,
    ProbeFeedSlow,
    MeshMinX,
    MeshMaxX,
    MeshMinY,
    MeshMaxY,
    FilUnloadFeedrate,
    FilFastLoadFeedrate,
    ParkX,
    ParkY,
    ParkZ,
}

/// What to heat before leveling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LevelPreheat {
    Both,
    Hotend,
    Bed,
    None,
}

impl LevelPreheat {
    pub const NAMES: [&'static str; 4] = ["   Both", " Hotend", "    Bed", "   None"];

    pub const fn index(self) -> u8 {
        self as u8
    }

    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => LevelPreheat::Both,
            1 => LevelPreheat::Hotend,
            2 => LevelPreheat::Bed,
            _ => LevelPreheat::None,
        }
    }

    const fn from_flags(hotend: bool, bed: bool) -> Self {
        match (hotend, bed) {
            (true, true) => LevelPreheat::Both,
            (true, false) => LevelPreheat::Hotend,
            (false, true) => LevelPreheat::Bed,
            (false, false) => LevelPreheat::None,
        }
    }

    const fn flags(self) -> (bool, bool) {
        match self {
            LevelPreheat::Both => (true, true),
            LevelPreheat::Hotend => (true, false),
            LevelPreheat::Bed => (false, true),
            LevelPreheat::None => (false, false),
        }
    }
}

/// Nozzle park point, mm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParkPoint {
    pub x: i16,
    pub y: i16,
    pub z: i16,
}

/// Machine geometry overrides, mm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    pub x_bed_size: i16,
    pub y_bed_size: i16,
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
    pub z_max: i16,
}

/// Mesh bounds, mm
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeshLimits {
    pub min_x: f32,
    pub max_x: f32,
    pub min_y: f32,
    pub max_y: f32,
}

/// The persisted settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PersistedSettings {
    pub time_format_textual: bool,
    /// Tilt grid size minus one
    pub tilt_grid_size: u8,
    /// Corner inset, tenths of a millimetre
    pub corner_pos: u16,
    /// Color index per [`ColorSlot`]
    pub colors: [u8; ColorSlot::COUNT],
    pub baud_115k: bool,
    pub level_preheat_hotend: bool,
    pub level_preheat_bed: bool,
    pub level_hotend_temp: u16,
    pub level_bed_temp: u16,
    pub host_action_labels: [HostLabel; 3],
    pub invert_e0: bool,
    pub geometry: Geometry,
    pub probing_margin: f32,
    pub probe_feed_fast: u16,
    pub probe_feed_slow: u16,
    pub mesh: MeshLimits,
    pub fil_unload_feedrate: u8,
    pub fil_fast_load_feedrate: u8,
    pub park: ParkPoint,
}

/// Highest leveling preheat temperatures, °C
pub const MAX_LEVEL_HOTEND_TEMP: u16 = 300;
pub const MAX_LEVEL_BED_TEMP: u16 = 150;

/// Corner inset bounds, tenths of a millimetre
pub const CORNER_POS_MIN: u16 = 10;
pub const CORNER_POS_MAX: u16 = 1000;

impl Default for PersistedSettings {
    fn default() -> Self {
        Self {
            time_format_textual: false,
            tilt_grid_size: 0,
            corner_pos: 325,
            colors: [0; ColorSlot::COUNT],
            baud_115k: false,
            level_preheat_hotend: true,
            level_preheat_bed: true,
            level_hotend_temp: 120,
            level_bed_temp: 50,
            host_action_labels: [HostLabel::new(), HostLabel::new(), HostLabel::new()],
            invert_e0: false,
            geometry: Geometry {
                x_bed_size: 230,
                y_bed_size: 230,
                x_min: 0,
                y_min: 0,
                x_max: 230,
                y_max: 230,
                z_max: 250,
            },
            probing_margin: 10.0,
            probe_feed_fast: 240,
            probe_feed_slow: 120,
            mesh: MeshLimits {
                min_x: 25.0,
                max_x: 205.0,
                min_y: 25.0,
                max_y: 205.0,
            },
            fil_unload_feedrate: 10,
            fil_fast_load_feedrate: 6,
            park: ParkPoint { x: 10, y: 220, z: 20 },
        }
    }
}

fn round_to<T: TryFrom<i32>>(value: f32, scale: f32, fallback: T) -> T {
    let scaled = value * scale;
    let rounded = if scaled >= 0.0 {
        (scaled + 0.5) as i32
    } else {
        (scaled - 0.5) as i32
    };
    T::try_from(rounded).unwrap_or(fallback)
}

// Label charset: space, A-Z, a-z, 0-9, '-'
fn label_code(c: u8) -> u8 {
    match c {
        b'A'..=b'Z' => c - b'A' + 1,
        b'a'..=b'z' => c - b'a' + 27,
        b'0'..=b'9' => c - b'0' + 53,
        b'-' => 63,
        _ => 0,
    }
}

fn label_char(code: u8) -> char {
    match code {
        1..=26 => (b'A' + code - 1) as char,
        27..=52 => (b'a' + code - 27) as char,
        53..=62 => (b'0' + code - 53) as char,
        63 => '-',
        _ => ' ',
    }
}

fn pack_label(label: &str) -> u64 {
    let mut packed = 0u64;
    for i in 0..LABEL_LEN {
        let code = label.as_bytes().get(i).map_or(0, |&c| label_code(c));
        packed |= (code as u64) << (6 * i);
    }
    packed
}

fn unpack_label(packed: u64) -> HostLabel {
    let mut label = HostLabel::new();
    for i in 0..LABEL_LEN {
        // Capacity equals LABEL_LEN, push cannot fail
        let _ = label.push(label_char(((packed >> (6 * i)) & 0x3F) as u8));
    }
    let trimmed = label.trim_end().len();
    label.truncate(trimmed);
    label
}

/// Convert a label to what the record can hold
pub fn sanitize_label(text: &str) -> HostLabel {
    unpack_label(pack_label(text))
}

impl PersistedSettings {
    /// Compiled-in defaults for a feature set
    pub fn defaults(features: &FeatureSet) -> Self {
        Self::default().normalized(features)
    }

    /// Reset fields of disabled features to their defaults
    pub fn normalized(mut self, features: &FeatureSet) -> Self {
        let d = Self::default();
        if !features.ubl {
            self.tilt_grid_size = d.tilt_grid_size;
        }
        if !features.baud_rate_gcode {
            self.baud_115k = d.baud_115k;
        }
        if !features.preheat_before_leveling {
            self.level_preheat_hotend = d.level_preheat_hotend;
            self.level_preheat_bed = d.level_preheat_bed;
            self.level_hotend_temp = d.level_hotend_temp;
            self.level_bed_temp = d.level_bed_temp;
        }
        if !features.host_action_commands {
            self.host_action_labels = d.host_action_labels;
        }
        if !features.bed_probe {
            self.probing_margin = d.probing_margin;
            self.probe_feed_fast = d.probe_feed_fast;
            self.probe_feed_slow = d.probe_feed_slow;
        }
        if !features.mesh {
            self.mesh = d.mesh;
        }
        if !features.advanced_pause {
            self.fil_unload_feedrate = d.fil_unload_feedrate;
            self.fil_fast_load_feedrate = d.fil_fast_load_feedrate;
        }
        if !features.nozzle_park {
            self.park = d.park;
        }
        self
    }

    /// Range checks applied on decode
    pub fn validate(&self) -> Result<(), SettingsError> {
        let g = &self.geometry;
        let m = &self.mesh;
        let ok = self.colors.iter().all(|&c| c <= MAX_COLOR_INDEX)
            && (CORNER_POS_MIN..=CORNER_POS_MAX).contains(&self.corner_pos)
            && self.level_hotend_temp <= MAX_LEVEL_HOTEND_TEMP
            && self.level_bed_temp <= MAX_LEVEL_BED_TEMP
            && g.x_bed_size > 0
            && g.y_bed_size > 0
            && g.x_min < g.x_max
            && g.y_min < g.y_max
            && g.z_max > 0
            && self.probing_margin.is_finite()
            && [m.min_x, m.max_x, m.min_y, m.max_y].iter().all(|v| v.is_finite())
            && m.min_x < m.max_x
            && m.min_y < m.max_y;
        if ok {
            Ok(())
        } else {
            Err(SettingsError::OutOfRange)
        }
    }

    /// Encode into `buf`, returning the record size
    pub fn encode(&self, features: &FeatureSet, buf: &mut [u8]) -> Result<usize, SettingsError> {
        let size = record_size(features);
        let record = buf.get_mut(..size).ok_or(SettingsError::BufferTooSmall)?;
        let s = self.clone().normalized(features);

        record[0] = size as u8;
        record[1] = SETTINGS_VERSION;
        {
            let mut w = BitWriter::new(&mut record[HEADER_LEN..size - CRC_LEN]);
            w.write_bool(s.time_format_textual)?;
            w.write(s.tilt_grid_size as u64, 3)?;
            w.write(s.corner_pos as u64, 10)?;
            for &color in &s.colors {
                w.write(color as u64, 4)?;
            }
            w.write_bool(s.baud_115k)?;
            w.write_bool(s.level_preheat_hotend)?;
            w.write_bool(s.level_preheat_bed)?;
            w.write_u16(s.level_hotend_temp)?;
            w.write_u16(s.level_bed_temp)?;
            if features.host_action_commands {
                for label in &s.host_action_labels {
                    w.write(pack_label(label), 48)?;
                }
            }
            w.write_bool(s.invert_e0)?;
            let g = &s.geometry;
            for v in [g.x_bed_size, g.y_bed_size, g.x_min, g.y_min, g.x_max, g.y_max, g.z_max] {
                w.write_i16(v)?;
            }
            w.write_f32(s.probing_margin)?;
            w.write_u16(s.probe_feed_fast)?;
            w.write_u16(s.probe_feed_slow)?;
            for v in [s.mesh.min_x, s.mesh.max_x, s.mesh.min_y, s.mesh.max_y] {
                w.write_f32(v)?;
            }
            w.write_u8(s.fil_unload_feedrate)?;
            w.write_u8(s.fil_fast_load_feedrate)?;
            w.write_i16(s.park.x)?;
            w.write_i16(s.park.y)?;
            w.write_i16(s.park.z)?;
        }
        let crc = crc32(&record[..size - CRC_LEN]);
        record[size - CRC_LEN..].copy_from_slice(&crc.to_le_bytes());
        Ok(size)
    }

    /// Decode and validate a record
    pub fn decode(features: &FeatureSet, bytes: &[u8]) -> Result<Self, SettingsError> {
        let size = record_size(features);
        if bytes.first().map(|&b| b as usize) != Some(size) {
            return Err(SettingsError::WrongSize);
        }
        let record = bytes.get(..size).ok_or(SettingsError::WrongSize)?;
        if record[1] != SETTINGS_VERSION {
            return Err(SettingsError::WrongVersion);
        }
        let mut stored = [0u8; CRC_LEN];
        stored.copy_from_slice(&record[size - CRC_LEN..]);
        if u32::from_le_bytes(stored) != crc32(&record[..size - CRC_LEN]) {
            return Err(SettingsError::Checksum);
        }

        let mut r = BitReader::new(&record[HEADER_LEN..size - CRC_LEN]);
        let mut s = Self::default();
        s.time_format_textual = r.read_bool()?;
        s.tilt_grid_size = r.read(3)? as u8;
        s.corner_pos = r.read(10)? as u16;
        for color in s.colors.iter_mut() {
            *color = r.read(4)? as u8;
        }
        s.baud_115k = r.read_bool()?;
        s.level_preheat_hotend = r.read_bool()?;
        s.level_preheat_bed = r.read_bool()?;
        s.level_hotend_temp = r.read_u16()?;
        s.level_bed_temp = r.read_u16()?;
        if features.host_action_commands {
            for label in s.host_action_labels.iter_mut() {
                *label = unpack_label(r.read(48)?);
            }
        }
        s.invert_e0 = r.read_bool()?;
        s.geometry = Geometry {
            x_bed_size: r.read_i16()?,
            y_bed_size: r.read_i16()?,
            x_min: r.read_i16()?,
            y_min: r.read_i16()?,
            x_max: r.read_i16()?,
            y_max: r.read_i16()?,
            z_max: r.read_i16()?,
        };
        s.probing_margin = r.read_f32()?;
        s.probe_feed_fast = r.read_u16()?;
        s.probe_feed_slow = r.read_u16()?;
        s.mesh = MeshLimits {
            min_x: r.read_f32()?,
            max_x: r.read_f32()?,
            min_y: r.read_f32()?,
            max_y: r.read_f32()?,
        };
        s.fil_unload_feedrate = r.read_u8()?;
        s.fil_fast_load_feedrate = r.read_u8()?;
        s.park = ParkPoint {
            x: r.read_i16()?,
            y: r.read_i16()?,
            z: r.read_i16()?,
        };

        s.validate()?;
        Ok(s.normalized(features))
    }

    /// Decode, falling back to defaults on any failure
    pub fn decode_or_defaults(features: &FeatureSet, bytes: &[u8]) -> Self {
        match Self::decode(features, bytes) {
            Ok(settings) => settings,
            Err(_e) => {
                warn!("settings rejected ({}), using defaults", _e);
                Self::defaults(features)
            }
        }
    }

    pub fn flag(&self, setting: BoolSetting) -> bool {
        match setting {
            BoolSetting::TimeFormatTextual => self.time_format_textual,
            BoolSetting::Baud115k => self.baud_115k,
            BoolSetting::InvertE0 => self.invert_e0,
        }
    }

    pub fn set_flag(&mut self, setting: BoolSetting, value: bool) {
        match setting {
            BoolSetting::TimeFormatTextual => self.time_format_textual = value,
            BoolSetting::Baud115k => self.baud_115k = value,
            BoolSetting::InvertE0 => self.invert_e0 = value,
        }
    }

    pub fn color(&self, slot: ColorSlot) -> u8 {
        self.colors[slot as usize]
    }

    /// Set a color index; indices above 10 are ignored
    pub fn set_color(&mut self, slot: ColorSlot, index: u8) {
        if index <= MAX_COLOR_INDEX {
            self.colors[slot as usize] = index;
        }
    }

    pub fn level_preheat(&self) -> LevelPreheat {
        LevelPreheat::from_flags(self.level_preheat_hotend, self.level_preheat_bed)
    }

    pub fn set_level_preheat(&mut self, mode: LevelPreheat) {
        let (hotend, bed) = mode.flags();
        self.level_preheat_hotend = hotend;
        self.level_preheat_bed = bed;
    }

    /// Read a numeric field in its display unit
    pub fn get(&self, field: SettingField) -> f32 {
        let g = &self.geometry;
        match field {
            SettingField::CornerPos => self.corner_pos as f32 / 10.0,
            SettingField::TiltGridSize => (self.tilt_grid_size + 1) as f32,
            SettingField::LevelHotendTemp => self.level_hotend_temp as f32,
            SettingField::LevelBedTemp => self.level_bed_temp as f32,
            SettingField::XBedSize => g.x_bed_size as f32,
            SettingField::YBedSize => g.y_bed_size as f32,
            SettingField::XMin => g.x_min as f32,
            SettingField::YMin => g.y_min as f32,
            SettingField::XMax => g.x_max as f32,
            SettingField::YMax => g.y_max as f32,
            SettingField::ZMax => g.z_max as f32,
            SettingField::ProbingMargin => self.probing_margin,
            SettingField::ProbeFeedFast => self.probe_feed_fast as f32,
            SettingField::ProbeFeedSlow => self.probe_feed_slow as f32,
            SettingField::MeshMinX => self.mesh.min_x,
            SettingField::MeshMaxX => self.mesh.max_x,
            SettingField::MeshMinY => self.mesh.min_y,
            SettingField::MeshMaxY => self.mesh.max_y,
            SettingField::FilUnloadFeedrate => self.fil_unload_feedrate as f32,
            SettingField::FilFastLoadFeedrate => self.fil_fast_load_feedrate as f32,
            SettingField::ParkX => self.park.x as f32,
            SettingField::ParkY => self.park.y as f32,
            SettingField::ParkZ => self.park.z as f32,
        }
    }

    /// Write a numeric field given in its display unit
    ///
    /// Values that do not fit the field's integer type leave it unchanged.
    pub fn set(&mut self, field: SettingField, value: f32) {
        let g = &mut self.geometry;
        match field {
            SettingField::CornerPos => {
                self.corner_pos = round_to(value, 10.0, self.corner_pos)
                    .clamp(CORNER_POS_MIN, CORNER_POS_MAX)
            }
            SettingField::TiltGridSize => {
                let size: u8 = round_to(value, 1.0, self.tilt_grid_size + 1);
                self.tilt_grid_size = size.clamp(1, 8) - 1;
            }
            SettingField::LevelHotendTemp => {
                self.level_hotend_temp = round_to(value, 1.0, self.level_hotend_temp)
            }
            SettingField::LevelBedTemp => {
                self.level_bed_temp = round_to(value, 1.0, self.level_bed_temp)
            }
            SettingField::XBedSize => g.x_bed_size = round_to(value, 1.0, g.x_bed_size),
            SettingField::YBedSize => g.y_bed_size = round_to(value, 1.0, g.y_bed_size),
            SettingField::XMin => g.x_min = round_to(value, 1.0, g.x_min),
            SettingField::YMin => g.y_min = round_to(value, 1.0, g.y_min),
            SettingField::XMax => g.x_max = round_to(value, 1.0, g.x_max),
            SettingField::YMax => g.y_max = round_to(value, 1.0, g.y_max),
            SettingField::ZMax => g.z_max = round_to(value, 1.0, g.z_max),
            SettingField::ProbingMargin => self.probing_margin = value,
            SettingField::ProbeFeedFast => {
                self.probe_feed_fast = round_to(value, 1.0, self.probe_feed_fast)
            }
            SettingField::ProbeFeedSlow => {
                self.probe_feed_slow = round_to(value, 1.0, self.probe_feed_slow)
            }
            SettingField::MeshMinX => self.mesh.min_x = value,
            SettingField::MeshMaxX => self.mesh.max_x = value,
            SettingField::MeshMinY => self.mesh.min_y = value,
            SettingField::MeshMaxY => self.mesh.max_y = value,
            SettingField::FilUnloadFeedrate => {
                self.fil_unload_feedrate = round_to(value, 1.0, self.fil_unload_feedrate)
            }
            SettingField::FilFastLoadFeedrate => {
                self.fil_fast_load_feedrate = round_to(value, 1.0, self.fil_fast_load_feedrate)
            }
            SettingField::ParkX => self.park.x = round_to(value, 1.0, self.park.x),
            SettingField::ParkY => self.park.y = round_to(value, 1.0, self.park.y),
            SettingField::ParkZ => self.park.z = round_to(value, 1.0, self.park.z),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sample() -> PersistedSettings {
        let mut s = PersistedSettings::default();
        s.time_format_textual = true;
        s.corner_pos = 250;
        s.set_color(ColorSlot::Cursor, 3);
        s.set_color(ColorSlot::CoordinatesSplitLine, 10);
        s.geometry.x_bed_size = 235;
        s.park = ParkPoint { x: -5, y: 200, z: 30 };
        s
    }

    fn encoded(settings: &PersistedSettings, features: &FeatureSet) -> [u8; EXTENDED_SIZE] {
        let mut buf = [0u8; EXTENDED_SIZE];
        settings.encode(features, &mut buf).unwrap();
        buf
    }

    #[test]
    fn test_compact_record_fits() {
        let features = FeatureSet::default();
        let mut buf = [0xAAu8; COMPACT_SIZE];
        let len = sample().encode(&features, &mut buf).unwrap();
        assert_eq!(len, COMPACT_SIZE);
        assert_eq!(buf[0], 64);
        assert_eq!(buf[1], SETTINGS_VERSION);
    }

    #[test]
    fn test_compact_round_trip() {
        let features = FeatureSet::default();
        let buf = encoded(&sample(), &features);
        let decoded = PersistedSettings::decode(&features, &buf[..COMPACT_SIZE]).unwrap();
        assert_eq!(decoded, sample().normalized(&features));
        assert_eq!(decoded.color(ColorSlot::Cursor), 3);
        assert_eq!(decoded.park.x, -5);
    }

    #[test]
    fn test_extended_round_trip_with_labels() {
        let features = FeatureSet::full();
        let mut s = sample();
        s.host_action_labels[0] = sanitize_label("Resume");
        s.host_action_labels[2] = sanitize_label("Cool-2");
        s.tilt_grid_size = 4;
        s.mesh.min_x = 12.5;
        let buf = encoded(&s, &features);
        assert_eq!(buf[0], 96);
        let decoded = PersistedSettings::decode(&features, &buf).unwrap();
        assert_eq!(decoded, s);
        assert_eq!(decoded.host_action_labels[2].as_str(), "Cool-2");
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buf = [0u8; 32];
        assert_eq!(
            sample().encode(&FeatureSet::default(), &mut buf),
            Err(SettingsError::BufferTooSmall)
        );
    }

    #[test]
    fn test_size_tag_must_match_features() {
        let buf = encoded(&sample(), &FeatureSet::default());
        assert_eq!(
            PersistedSettings::decode(&FeatureSet::full(), &buf),
            Err(SettingsError::WrongSize)
        );
    }

    #[test]
    fn test_wrong_version() {
        let features = FeatureSet::default();
        let mut buf = encoded(&sample(), &features);
        buf[1] = 2;
        assert_eq!(
            PersistedSettings::decode(&features, &buf),
            Err(SettingsError::WrongVersion)
        );
    }

    #[test]
    fn test_corrupt_byte_yields_defaults() {
        let features = FeatureSet::default();
        let mut buf = encoded(&sample(), &features);
        buf[10] ^= 0x40;
        assert_eq!(
            PersistedSettings::decode(&features, &buf),
            Err(SettingsError::Checksum)
        );
        assert_eq!(
            PersistedSettings::decode_or_defaults(&features, &buf),
            PersistedSettings::defaults(&features)
        );
    }

    #[test]
    fn test_out_of_range_rejected_despite_valid_crc() {
        let features = FeatureSet::default();
        let mut bad = sample();
        bad.colors[4] = 12;
        let buf = encoded(&bad, &features);
        assert_eq!(
            PersistedSettings::decode(&features, &buf),
            Err(SettingsError::OutOfRange)
        );

        let mut bad = sample();
        bad.geometry.x_min = 300;
        let buf = encoded(&bad, &features);
        assert_eq!(
            PersistedSettings::decode(&features, &buf),
            Err(SettingsError::OutOfRange)
        );
    }

    #[test]
    fn test_non_finite_float_rejected() {
        let features = FeatureSet::full();
        let mut bad = sample();
        bad.mesh.max_y = f32::NAN;
        let buf = encoded(&bad, &features);
        assert_eq!(
            PersistedSettings::decode(&features, &buf),
            Err(SettingsError::OutOfRange)
        );
    }

    #[test]
    fn test_disabled_fields_hold_defaults() {
        let features = FeatureSet {
            mesh: false,
            nozzle_park: false,
            ..FeatureSet::default()
        };
        let mut s = sample();
        s.mesh.min_x = 40.0;
        let decoded = PersistedSettings::decode(&features, &encoded(&s, &features)).unwrap();
        assert_eq!(decoded.mesh, PersistedSettings::default().mesh);
        assert_eq!(decoded.park, PersistedSettings::default().park);
    }

    #[test]
    fn test_label_charset() {
        assert_eq!(sanitize_label("Ab9-z").as_str(), "Ab9-z");
        assert_eq!(sanitize_label("a.b").as_str(), "a b");
        assert_eq!(sanitize_label("LongerThan8").as_str(), "LongerTh");
    }

    #[test]
    fn test_field_accessors() {
        let mut s = PersistedSettings::default();
        s.set(SettingField::CornerPos, 29.96);
        assert_eq!(s.corner_pos, 300);
        assert_eq!(s.get(SettingField::CornerPos), 30.0);

        s.set(SettingField::TiltGridSize, 5.0);
        assert_eq!(s.tilt_grid_size, 4);
        assert_eq!(s.get(SettingField::TiltGridSize), 5.0);

        s.set(SettingField::FilUnloadFeedrate, 400.0);
        assert_eq!(s.fil_unload_feedrate, 10);

        s.set_level_preheat(LevelPreheat::Bed);
        assert!(!s.level_preheat_hotend && s.level_preheat_bed);
        assert_eq!(s.level_preheat(), LevelPreheat::Bed);
    }

    proptest! {
        #[test]
        fn prop_any_single_byte_corruption_falls_back(index in 0usize..COMPACT_SIZE, flip in 1u8..=255) {
            let features = FeatureSet::default();
            let mut buf = encoded(&sample(), &features);
            buf[index] ^= flip;
            prop_assert!(PersistedSettings::decode(&features, &buf[..COMPACT_SIZE]).is_err());
            prop_assert_eq!(
                PersistedSettings::decode_or_defaults(&features, &buf[..COMPACT_SIZE]),
                PersistedSettings::defaults(&features)
            );
        }
    }
}
