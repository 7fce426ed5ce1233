//! Feature set and persisted settings

pub mod bits;
pub mod features;
pub mod settings;

pub use features::{FeatureError, FeatureSet, MAX_PREHEAT_PRESETS};
pub use settings::{
    record_size, sanitize_label, BoolSetting, ColorSlot, Geometry, HostLabel, LevelPreheat, MeshLimits, ParkPoint,
    PersistedSettings, SettingField, SettingsError, COLOR_NAMES, COMPACT_SIZE, EXTENDED_SIZE,
};
