//! Capability set resolved once at startup
//!
//! Firmware builds differ in which subsystems exist (probe, mesh leveling,
//! filament change, ...). The UI learns this from a [`FeatureSet`] and builds
//! its menus and settings layout from it.

/// Largest number of preheat presets
pub const MAX_PREHEAT_PRESETS: u8 = 5;

/// Which optional subsystems the firmware provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct FeatureSet {
    /// Unified bed leveling: tilt grid and mesh slots
    pub ubl: bool,
    /// Z probe fitted
    pub bed_probe: bool,
    /// A bed mesh exists (any mesh leveling flavor)
    pub mesh: bool,
    /// Host baud rate selectable from the UI
    pub baud_rate_gcode: bool,
    /// Heat up before leveling
    pub preheat_before_leveling: bool,
    /// Host action labels stored in the settings record
    pub host_action_commands: bool,
    /// Filament change (M600) available
    pub advanced_pause: bool,
    /// Nozzle park position available
    pub nozzle_park: bool,
    /// Number of preheat presets, 1..=5
    pub preheat_count: u8,
    /// Part cooling fan fitted
    pub fan: bool,
    /// Lock screen available
    pub lock_screen: bool,
    /// Firmware retraction (G10/G11)
    pub firmware_retract: bool,
    /// PID autotune menu
    pub pid_autotune: bool,
}

impl Default for FeatureSet {
    /// A stock printer: no probe, no mesh, two presets
    fn default() -> Self {
        Self {
            ubl: false,
            bed_probe: false,
            mesh: false,
            baud_rate_gcode: false,
            preheat_before_leveling: false,
            host_action_commands: false,
            advanced_pause: true,
            nozzle_park: true,
            preheat_count: 2,
            fan: true,
            lock_screen: true,
            firmware_retract: false,
            pid_autotune: true,
        }
    }
}

impl FeatureSet {
    /// Everything enabled
    pub const fn full() -> Self {
        Self {
            ubl: true,
            bed_probe: true,
            mesh: true,
            baud_rate_gcode: true,
            preheat_before_leveling: true,
            host_action_commands: true,
            advanced_pause: true,
            nozzle_park: true,
            preheat_count: MAX_PREHEAT_PRESETS,
            fan: true,
            lock_screen: true,
            firmware_retract: true,
            pid_autotune: true,
        }
    }

    /// Check the combinations that cannot be built
    pub fn validate(&self) -> Result<(), FeatureError> {
        if !(1..=MAX_PREHEAT_PRESETS).contains(&self.preheat_count) {
            return Err(FeatureError::PreheatCount);
        }
        if self.ubl && !self.mesh {
            return Err(FeatureError::UblWithoutMesh);
        }
        Ok(())
    }
}

/// Invalid feature combination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FeatureError {
    /// `preheat_count` outside 1..=5
    PreheatCount,
    /// UBL requires a mesh
    UblWithoutMesh,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_valid() {
        assert_eq!(FeatureSet::default().validate(), Ok(()));
        assert_eq!(FeatureSet::full().validate(), Ok(()));
    }

    #[test]
    fn test_preheat_count_bounds() {
        let mut features = FeatureSet::default();
        features.preheat_count = 0;
        assert_eq!(features.validate(), Err(FeatureError::PreheatCount));
        features.preheat_count = 6;
        assert_eq!(features.validate(), Err(FeatureError::PreheatCount));
        features.preheat_count = 5;
        assert_eq!(features.validate(), Ok(()));
    }

    #[test]
    fn test_ubl_requires_mesh() {
        let features = FeatureSet {
            ubl: true,
            mesh: false,
            ..FeatureSet::default()
        };
        assert_eq!(features.validate(), Err(FeatureError::UblWithoutMesh));
    }
}
