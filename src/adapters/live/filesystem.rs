//! Live filesystem adapter using `std::fs`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::ports::filesystem::FileSystem;

/// Live filesystem adapter backed by real disk I/O.
pub struct LiveFileSystem;

impl FileSystem for LiveFileSystem {
    fn read_to_string(
        &self,
        path: &Path,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(std::fs::read_to_string(path)?)
    }

    fn append(
        &self,
        path: &Path,
        contents: &str,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_creates_and_extends_file() {
        let dir = std::env::temp_dir().join("retask_live_fs_append");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("outputs.txt");
        let _ = std::fs::remove_file(&path);

        let fs = LiveFileSystem;
        fs.append(&path, "first=1\n").unwrap();
        fs.append(&path, "second=2\n").unwrap();

        let content = fs.read_to_string(&path).unwrap();
        assert_eq!(content, "first=1\nsecond=2\n");

        let _ = std::fs::remove_dir_all(&dir);
    }
}
