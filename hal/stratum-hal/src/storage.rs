//! Persistent storage for the UI settings record
//!
//! The UI owns one fixed-size block (64 or 96 bytes). How the block reaches
//! the medium (EEPROM emulation, SD file, flash page) is the board's
//! business; the UI only hands over bytes and reads them back.

use heapless::Vec;

/// Largest settings block any layout produces
pub const MAX_BLOCK_SIZE: usize = 96;

/// Errors from settings storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Medium read or write failed
    Io,
    /// Nothing has been stored yet
    NotFound,
    /// Buffer too small for the data
    BufferTooSmall,
}

/// Settings block storage
///
/// Implementations store the block verbatim; integrity checking is done by
/// the settings codec, not the medium.
pub trait SettingsStore {
    /// Read the stored block into `buffer`
    ///
    /// Returns the number of bytes read.
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StorageError>;

    /// Replace the stored block with `data`
    fn write(&mut self, data: &[u8]) -> Result<(), StorageError>;

    /// Forget the stored block
    fn erase(&mut self) -> Result<(), StorageError>;
}

/// RAM-backed store
///
/// Used by hosts that persist through another channel and by tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    block: Option<Vec<u8, MAX_BLOCK_SIZE>>,
}

impl MemoryStore {
    /// Create an empty store
    pub const fn new() -> Self {
        Self { block: None }
    }

    /// Raw access to the stored bytes
    pub fn bytes(&self) -> Option<&[u8]> {
        self.block.as_deref()
    }

    /// Mutable access to the stored bytes (for fault injection)
    pub fn bytes_mut(&mut self) -> Option<&mut [u8]> {
        self.block.as_deref_mut()
    }
}

impl SettingsStore for MemoryStore {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize, StorageError> {
        let block = self.block.as_ref().ok_or(StorageError::NotFound)?;
        if buffer.len() < block.len() {
            return Err(StorageError::BufferTooSmall);
        }
        buffer[..block.len()].copy_from_slice(block);
        Ok(block.len())
    }

    fn write(&mut self, data: &[u8]) -> Result<(), StorageError> {
        let mut block = Vec::new();
        block
            .extend_from_slice(data)
            .map_err(|_| StorageError::BufferTooSmall)?;
        self.block = Some(block);
        Ok(())
    }

    fn erase(&mut self) -> Result<(), StorageError> {
        self.block = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_reports_not_found() {
        let mut store = MemoryStore::new();
        let mut buf = [0u8; 64];
        assert_eq!(store.read(&mut buf), Err(StorageError::NotFound));
    }

    #[test]
    fn test_write_then_read() {
        let mut store = MemoryStore::new();
        store.write(&[1, 2, 3]).unwrap();

        let mut buf = [0u8; 8];
        let len = store.read(&mut buf).unwrap();
        assert_eq!(&buf[..len], &[1, 2, 3]);
    }

    #[test]
    fn test_read_into_short_buffer() {
        let mut store = MemoryStore::new();
        store.write(&[0u8; 64]).unwrap();

        let mut buf = [0u8; 16];
        assert_eq!(store.read(&mut buf), Err(StorageError::BufferTooSmall));
    }

    #[test]
    fn test_oversized_block_rejected() {
        let mut store = MemoryStore::new();
        assert_eq!(
            store.write(&[0u8; MAX_BLOCK_SIZE + 1]),
            Err(StorageError::BufferTooSmall)
        );
    }

    #[test]
    fn test_erase() {
        let mut store = MemoryStore::new();
        store.write(&[9]).unwrap();
        store.erase().unwrap();
        assert!(store.bytes().is_none());
    }
}
