//! Filesystem port for file I/O operations.

use std::path::Path;

/// Provides filesystem access for reading descriptors and writing step
/// outputs.
///
/// Abstracting the filesystem keeps the descriptor parsing and output
/// emission testable without touching the real disk.
pub trait FileSystem: Send + Sync {
    /// Reads the entire contents of a file as a UTF-8 string.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or is not valid UTF-8.
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;

    /// Appends the given contents to a file, creating it if absent.
    ///
    /// Step output files are shared with other pipeline steps, so emission
    /// must never clobber lines written before this step ran.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails (permissions, disk full, etc.).
    fn append(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
