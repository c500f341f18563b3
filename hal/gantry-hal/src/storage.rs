//! Job-file storage abstractions
//!
//! Provides the trait through which stored print jobs are opened and read
//! one byte at a time. The implementation owns the file system (SD card,
//! flash, host directory); callers only ever hold a [`FileHandle`].

/// Maximum simultaneously open files on the reference board
pub const MAX_FILES: usize = 7;

/// Opaque handle to an open file
///
/// Handles are small integers handed out by the store; they are only
/// meaningful to the store that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FileHandle(pub u8);

impl FileHandle {
    /// Get the handle as an index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Errors from file store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// No file with that name in the directory
    NotFound,
    /// Every file handle is already in use
    NoFreeHandle,
    /// Card or bus failure
    Io,
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            StorageError::NotFound => f.write_str("file not found"),
            StorageError::NoFreeHandle => f.write_str("no free file handle"),
            StorageError::Io => f.write_str("storage I/O error"),
        }
    }
}

/// File store trait
///
/// Read access to named files within a directory. Implementations should:
/// - Hand out at most [`MAX_FILES`] handles (or their own limit)
/// - Never block in `read_byte`; a slow card reports end-of-data only at
///   the real end of the file
/// - Make `close` idempotent
pub trait FileStore {
    /// Open `name` inside `directory` for reading
    ///
    /// # Arguments
    /// * `directory` - Directory prefix, including its trailing separator
    /// * `name` - File name within the directory
    fn open(&mut self, directory: &str, name: &str) -> Result<FileHandle, StorageError>;

    /// Read the next byte of an open file
    ///
    /// Returns `None` at end of file.
    fn read_byte(&mut self, file: FileHandle) -> Option<u8>;

    /// Close a file and release its handle
    fn close(&mut self, file: FileHandle);
}

/// A store with no files in it
///
/// For machines without removable storage.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStorage;

impl FileStore for NoStorage {
    fn open(&mut self, _directory: &str, _name: &str) -> Result<FileHandle, StorageError> {
        Err(StorageError::NotFound)
    }

    fn read_byte(&mut self, _file: FileHandle) -> Option<u8> {
        None
    }

    fn close(&mut self, _file: FileHandle) {}
}
