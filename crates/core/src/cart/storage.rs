//! Durable storage slot for the cart.
//!
//! A slot holds one serialized value: the JSON array of line items. The store
//! reads it once when opened and overwrites it after every mutation.

/// Errors reported by a [`CartStorage`] backend.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// Filesystem or other I/O failure.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused the write (quota, read-only medium, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A single named slot of durable storage.
pub trait CartStorage {
    /// Read the slot. `Ok(None)` means nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn load(&self) -> Result<Option<String>, StorageError>;

    /// Overwrite the slot with `value`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the write fails.
    fn save(&mut self, value: &str) -> Result<(), StorageError>;

    /// Remove whatever the slot holds.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be modified.
    fn clear(&mut self) -> Result<(), StorageError>;
}

/// In-memory slot.
///
/// Used directly in tests, and by the web server as the hand-off between a
/// request's session data and the cart store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStorage {
    value: Option<String>,
    writes: usize,
}

impl MemoryStorage {
    /// An empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: None,
            writes: 0,
        }
    }

    /// A slot pre-filled with a previously stored value.
    #[must_use]
    pub const fn with_value(value: Option<String>) -> Self {
        Self { value, writes: 0 }
    }

    /// Current contents of the slot.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Consume the slot and return its contents.
    #[must_use]
    pub fn into_value(self) -> Option<String> {
        self.value
    }

    /// Number of successful `save`/`clear` calls since creation.
    ///
    /// Callers use this to skip writing back a slot nothing touched.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self.value.clone())
    }

    fn save(&mut self, value: &str) -> Result<(), StorageError> {
        self.value = Some(value.to_owned());
        self.writes += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        self.value = None;
        self.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_round_trip() {
        let mut slot = MemoryStorage::new();
        assert_eq!(slot.load().unwrap(), None);

        slot.save("[]").unwrap();
        assert_eq!(slot.load().unwrap().as_deref(), Some("[]"));

        slot.clear().unwrap();
        assert_eq!(slot.load().unwrap(), None);
        assert_eq!(slot.writes(), 2);
    }

    #[test]
    fn test_with_value_counts_no_writes() {
        let slot = MemoryStorage::with_value(Some("[]".to_string()));
        assert_eq!(slot.value(), Some("[]"));
        assert_eq!(slot.writes(), 0);
    }
}
