// src/fs/mock.rs

use super::{FileHandle, FileInfo, FileSystem};
use std::collections::HashMap;
use std::io::{self, Cursor, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir,
}

/// In-memory filesystem for tests.
///
/// Clones share the same storage, so a test can keep one handle for seeding
/// and inspection while the repository owns another.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    read_only: bool,
    accesses: Arc<AtomicUsize>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// A view over the same storage that rejects `create` with
    /// `PermissionDenied`.
    pub fn read_only(&self) -> Self {
        Self {
            files: Arc::clone(&self.files),
            read_only: true,
            accesses: Arc::clone(&self.accesses),
        }
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.entries()
            .insert(path.as_ref().to_path_buf(), MockEntry::File(content.into()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        self.entries()
            .insert(path.as_ref().to_path_buf(), MockEntry::Dir);
    }

    /// Current contents of a file, if one exists at `path`.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.entries().get(path.as_ref()) {
            Some(MockEntry::File(content)) => Some(content.clone()),
            _ => None,
        }
    }

    /// Number of `open`/`create`/`stat` calls made so far.
    pub fn access_count(&self) -> usize {
        self.accesses.load(Ordering::SeqCst)
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        self.files.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn touch(&self) {
        self.accesses.fetch_add(1, Ordering::SeqCst);
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("file not found: {:?}", path))
}

struct MockReader {
    cursor: Cursor<Vec<u8>>,
}

impl Read for MockReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl FileHandle for MockReader {
    fn size(&self) -> io::Result<u64> {
        Ok(self.cursor.get_ref().len() as u64)
    }
}

/// Writes straight through to the shared map, like a real unbuffered file.
struct MockWriter {
    path: PathBuf,
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
}

impl Write for MockWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut files = self.files.lock().unwrap_or_else(PoisonError::into_inner);
        match files.get_mut(&self.path) {
            Some(MockEntry::File(content)) => {
                content.extend_from_slice(buf);
                Ok(buf.len())
            }
            _ => Err(not_found(&self.path)),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl FileSystem for MockFileSystem {
    fn open(&self, path: &Path) -> io::Result<Box<dyn FileHandle>> {
        self.touch();
        match self.entries().get(path) {
            Some(MockEntry::File(content)) => Ok(Box::new(MockReader {
                cursor: Cursor::new(content.clone()),
            })),
            Some(MockEntry::Dir) => Err(io::Error::other(format!(
                "is a directory: {:?}",
                path
            ))),
            None => Err(not_found(path)),
        }
    }

    fn create(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        self.touch();
        if self.read_only {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("read-only filesystem: {:?}", path),
            ));
        }

        let mut files = self.entries();
        if let Some(MockEntry::Dir) = files.get(path) {
            return Err(io::Error::other(format!("is a directory: {:?}", path)));
        }
        files.insert(path.to_path_buf(), MockEntry::File(Vec::new()));

        Ok(Box::new(MockWriter {
            path: path.to_path_buf(),
            files: Arc::clone(&self.files),
        }))
    }

    fn stat(&self, path: &Path) -> io::Result<FileInfo> {
        self.touch();
        match self.entries().get(path) {
            Some(MockEntry::File(content)) => Ok(FileInfo {
                size: content.len() as u64,
                is_dir: false,
            }),
            Some(MockEntry::Dir) => Ok(FileInfo {
                size: 0,
                is_dir: true,
            }),
            None => Err(not_found(path)),
        }
    }
}
