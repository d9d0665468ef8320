//! File store: where save and settings documents live.
//!
//! RULE: The engine never touches the filesystem directly.
//! Everything goes through a `FileStore` handed in by the caller.

use crate::error::SimResult;
use std::{
    cell::RefCell,
    collections::HashMap,
    io::ErrorKind,
    path::PathBuf,
    rc::Rc,
};

pub trait FileStore {
    /// Contents of `path`, or `None` when nothing was written there yet.
    fn read_file(&self, path: &str) -> SimResult<Option<Vec<u8>>>;

    /// Replace the contents of `path`. Last write wins.
    fn write_file(&self, path: &str, bytes: &[u8]) -> SimResult<()>;
}

impl<T: FileStore + ?Sized> FileStore for Rc<T> {
    fn read_file(&self, path: &str) -> SimResult<Option<Vec<u8>>> {
        (**self).read_file(path)
    }

    fn write_file(&self, path: &str, bytes: &[u8]) -> SimResult<()> {
        (**self).write_file(path, bytes)
    }
}

/// Files under a root directory on disk.
#[derive(Debug, Clone)]
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FileStore for DiskFileStore {
    fn read_file(&self, path: &str) -> SimResult<Option<Vec<u8>>> {
        match std::fs::read(self.root.join(path)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_file(&self, path: &str, bytes: &[u8]) -> SimResult<()> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.root.join(path), bytes)?;
        Ok(())
    }
}

/// In-memory files. Clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryFileStore {
    files: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path)
    }
}

impl FileStore for MemoryFileStore {
    fn read_file(&self, path: &str) -> SimResult<Option<Vec<u8>>> {
        Ok(self.files.borrow().get(path).cloned())
    }

    fn write_file(&self, path: &str, bytes: &[u8]) -> SimResult<()> {
        self.files.borrow_mut().insert(path.to_string(), bytes.to_vec());
        Ok(())
    }
}
