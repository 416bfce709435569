//! File-backed cart storage.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use elegance_core::cart::{CartStorage, StorageError};

use crate::error::CliError;

/// Environment variable overriding the cart file location.
pub const CART_FILE_ENV: &str = "ELEGANCE_CART_FILE";

/// Resolve the cart file path.
///
/// `$ELEGANCE_CART_FILE` wins; otherwise `<data dir>/elegance/cart.json`.
///
/// # Errors
///
/// Returns `CliError::NoCartLocation` if neither is available.
pub fn default_cart_path() -> Result<PathBuf, CliError> {
    if let Some(path) = std::env::var_os(CART_FILE_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    dirs::data_dir()
        .map(|dir| dir.join("elegance").join("cart.json"))
        .ok_or(CliError::NoCartLocation)
}

/// A cart slot stored as one JSON file.
///
/// Writes go to a sibling temp file which is then renamed over the target, so
/// a crash mid-write leaves the previous cart intact.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CartStorage for FileStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, value: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.temp_path();
        let mut file = fs::File::create(&temp)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("cart.json"));
        assert_eq!(storage.load().unwrap(), None);
    }

    #[test]
    fn test_save_creates_parent_dirs_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cart.json");
        let mut storage = FileStorage::new(&path);

        storage.save("[1]").unwrap();
        storage.save("[2]").unwrap();

        assert_eq!(storage.load().unwrap().as_deref(), Some("[2]"));
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn test_clear_removes_file_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = FileStorage::new(dir.path().join("cart.json"));

        storage.save("[]").unwrap();
        storage.clear().unwrap();
        assert!(!storage.path().exists());

        storage.clear().unwrap();
    }

    #[test]
    fn test_unreadable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.load().is_err());
    }
}
