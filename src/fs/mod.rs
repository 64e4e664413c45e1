// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

pub mod mock;

/// A readable handle returned by [`FileSystem::open`].
pub trait FileHandle: Read + Send {
    /// Size of the underlying file in bytes.
    fn size(&self) -> io::Result<u64>;
}

/// What [`FileSystem::stat`] reports about a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    pub size: u64,
    pub is_dir: bool,
}

/// Abstract filesystem interface.
///
/// Errors are plain `std::io::Error`s so callers can tell a missing file
/// (`ErrorKind::NotFound`) apart from every other failure.
pub trait FileSystem: Send + Sync + Debug {
    fn open(&self, path: &Path) -> io::Result<Box<dyn FileHandle>>;

    /// Create (or truncate) the file at `path` for writing.
    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + Send>>;

    fn stat(&self, path: &Path) -> io::Result<FileInfo>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileHandle for fs::File {
    fn size(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }
}

impl FileSystem for RealFileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn FileHandle>> {
        let file = fs::File::open(path)?;
        Ok(Box::new(file))
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        let file = fs::File::create(path)?;
        Ok(Box::new(file))
    }

    fn stat(&self, path: &Path) -> io::Result<FileInfo> {
        let meta = fs::metadata(path)?;
        Ok(FileInfo {
            size: meta.len(),
            is_dir: meta.is_dir(),
        })
    }
}
