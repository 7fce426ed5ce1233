//! Loading and saving the settings record

use stratum_core::config::{record_size, FeatureSet, PersistedSettings, SettingsError};
use stratum_hal::storage::{SettingsStore, StorageError, MAX_BLOCK_SIZE};

/// Settings persistence errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PersistError {
    /// Storage medium failed or is empty
    Storage(StorageError),
    /// Stored block failed to decode
    Settings(SettingsError),
}

impl From<StorageError> for PersistError {
    fn from(e: StorageError) -> Self {
        PersistError::Storage(e)
    }
}

impl From<SettingsError> for PersistError {
    fn from(e: SettingsError) -> Self {
        PersistError::Settings(e)
    }
}

impl PersistError {
    /// Nothing stored yet; not worth telling the user about
    pub fn is_empty_store(&self) -> bool {
        matches!(self, PersistError::Storage(StorageError::NotFound))
    }
}

/// Read and decode the stored record
pub fn load_settings<S: SettingsStore>(
    store: &mut S,
    features: &FeatureSet,
) -> Result<PersistedSettings, PersistError> {
    let mut buf = [0u8; MAX_BLOCK_SIZE];
    let len = store.read(&mut buf)?;
    let settings = PersistedSettings::decode(features, &buf[..len])?;
    debug!("settings loaded ({} bytes)", len);
    Ok(settings)
}

/// Encode and store the record
pub fn save_settings<S: SettingsStore>(
    store: &mut S,
    features: &FeatureSet,
    settings: &PersistedSettings,
) -> Result<usize, PersistError> {
    let mut buf = [0u8; MAX_BLOCK_SIZE];
    let len = settings.encode(features, &mut buf)?;
    store.write(&buf[..len])?;
    debug!("settings stored ({} bytes)", len);
    Ok(len)
}

/// Size of the record [`save_settings`] writes for `features`
pub const fn stored_size(features: &FeatureSet) -> usize {
    record_size(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_hal::storage::MemoryStore;

    #[test]
    fn test_save_then_load() {
        let features = FeatureSet::full();
        let mut store = MemoryStore::new();
        let mut settings = PersistedSettings::defaults(&features);
        settings.level_bed_temp = 70;
        settings.time_format_textual = true;

        let len = save_settings(&mut store, &features, &settings).unwrap();
        assert_eq!(len, stored_size(&features));
        assert_eq!(load_settings(&mut store, &features), Ok(settings));
    }

    #[test]
    fn test_empty_store() {
        let mut store = MemoryStore::new();
        let err = load_settings(&mut store, &FeatureSet::default()).unwrap_err();
        assert!(err.is_empty_store());
    }

    #[test]
    fn test_corrupt_block_reports_codec_error() {
        let features = FeatureSet::default();
        let mut store = MemoryStore::new();
        save_settings(&mut store, &features, &PersistedSettings::defaults(&features)).unwrap();
        if let Some(bytes) = store.bytes_mut() {
            bytes[5] ^= 0x10;
        }
        let err = load_settings(&mut store, &features).unwrap_err();
        assert_eq!(err, PersistError::Settings(SettingsError::Checksum));
        assert!(!err.is_empty_store());
    }

    #[test]
    fn test_layout_mismatch_rejected() {
        let mut store = MemoryStore::new();
        save_settings(&mut store, &FeatureSet::full(), &PersistedSettings::defaults(&FeatureSet::full())).unwrap();
        let err = load_settings(&mut store, &FeatureSet::default()).unwrap_err();
        assert!(matches!(err, PersistError::Settings(_)));
    }
}
