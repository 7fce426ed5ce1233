//! TOML feature profiles
//!
//! A profile describes which subsystems the firmware build provides, so the
//! same UI binary can be configured per printer without recompiling:
//!
//! ```toml
//! [features]
//! bed_probe = true
//! mesh = true
//! preheat_count = 3
//!
//! [display]
//! brightness = 200
//! ```
//!
//! Missing keys take their defaults; unknown keys are rejected.

use serde::Deserialize;
use stratum_core::config::{FeatureError, FeatureSet};
use stratum_display::Transport;
use stratum_hal::storage::SettingsStore;

use crate::controller::Controller;

/// Profile parsing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Not valid TOML, wrong types or unknown keys
    Parse,
    /// Parsed but describes an impossible build
    Invalid(FeatureError),
}

impl From<FeatureError> for ConfigError {
    fn from(e: FeatureError) -> Self {
        ConfigError::Invalid(e)
    }
}

/// Panel settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Backlight level at startup
    pub brightness: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { brightness: 230 }
    }
}

/// A parsed profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub features: FeatureSet,
    pub display: DisplayConfig,
}

/// Parse and validate a profile
pub fn parse_profile(text: &str) -> Result<Profile, ConfigError> {
    let profile: Profile = toml::from_str(text).map_err(|_e| {
        warn!("profile parse failed");
        ConfigError::Parse
    })?;
    profile.features.validate()?;
    info!("profile loaded, {} preheat presets", profile.features.preheat_count);
    Ok(profile)
}

impl<T: Transport, S: SettingsStore> Controller<T, S> {
    /// Create a controller for the build and panel a profile describes
    pub fn from_profile(transport: T, store: S, profile: &Profile) -> Self {
        Controller::new(transport, store, profile.features).with_brightness(profile.display.brightness)
    }
}
