//! The temporary test file and its guaranteed removal
//!
//! [`TempTestFile`] owns both the open handle and the path. Removal happens
//! exactly once: either through an explicit [`TempTestFile::cleanup`], which
//! reports the result, or from `Drop` on any path that skipped it.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand::RngCore;

use crate::error::{Error, Result};

/// Number of random bytes in a test file name
const NAME_RANDOM_BYTES: usize = 8;

/// A writer that can force its data to stable storage
pub trait DurableWrite: Write {
    /// Flush buffered data all the way to the device
    fn sync_durable(&mut self) -> io::Result<()>;
}

impl DurableWrite for File {
    fn sync_durable(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

impl<T: DurableWrite + ?Sized> DurableWrite for &mut T {
    fn sync_durable(&mut self) -> io::Result<()> {
        (**self).sync_durable()
    }
}

/// Build a random `<prefix>-test-<16 hex>.tmp` file name
pub fn random_file_name(prefix: &str) -> String {
    let mut bytes = [0u8; NAME_RANDOM_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
    format!("{}-test-{}.tmp", prefix, hex)
}

/// Exclusively owned, pre-sized test file that is deleted on release
#[derive(Debug)]
pub struct TempTestFile {
    path: PathBuf,
    file: Option<File>,
    removed: bool,
}

impl TempTestFile {
    /// Create a new, empty file with a random name in `dir`
    ///
    /// The file is created exclusively and is removed when this value is
    /// dropped.
    pub fn create(dir: &Path, prefix: &str) -> Result<Self> {
        let path = dir.join(random_file_name(prefix));

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|source| Error::CreateFile {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "created test file");
        Ok(Self {
            path,
            file: Some(file),
            removed: false,
        })
    }

    /// Truncate the file to `size` bytes
    ///
    /// On failure the file is removed before the error is returned.
    pub fn allocate(&mut self, size: u64) -> Result<()> {
        let result = self.open_file().and_then(|file| file.set_len(size));

        if let Err(source) = result {
            if let Err(e) = self.cleanup() {
                tracing::warn!(path = %self.path.display(), "failed to remove test file: {}", e);
            }
            return Err(Error::Allocate {
                path: self.path.clone(),
                size,
                source,
            });
        }

        tracing::debug!(path = %self.path.display(), size, "allocated test file");
        Ok(())
    }

    /// Path of the test file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the handle and delete the file
    ///
    /// Returns `Ok(true)` when this call removed the file and `Ok(false)`
    /// when there was nothing left to remove. Safe to call repeatedly.
    pub fn cleanup(&mut self) -> io::Result<bool> {
        if self.removed {
            return Ok(false);
        }

        // Close before unlinking; open files cannot be deleted on Windows
        drop(self.file.take());
        self.removed = true;

        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "removed test file");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn open_file(&mut self) -> io::Result<&mut File> {
        self.file
            .as_mut()
            .ok_or_else(|| io::Error::other("test file already closed"))
    }
}

impl Write for TempTestFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.open_file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.open_file()?.flush()
    }
}

impl AsMut<TempTestFile> for TempTestFile {
    fn as_mut(&mut self) -> &mut TempTestFile {
        self
    }
}

impl DurableWrite for TempTestFile {
    fn sync_durable(&mut self) -> io::Result<()> {
        self.open_file()?.sync_all()
    }
}

impl Drop for TempTestFile {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            tracing::warn!(path = %self.path.display(), "failed to remove test file: {}", e);
        }
    }
}
