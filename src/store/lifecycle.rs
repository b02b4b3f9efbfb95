//! Creating and opening store files.
//!
//! Responsibilities:
//! - Exclusive creation, so an existing store is never truncated.
//! - Header validation on every open; a handle never exists over a store
//!   whose identity fields have not been checked.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{Result, TasklogError};
use crate::io::header::HeaderCodec;
use crate::store::TaskStore;
use crate::types::Header;

impl TaskStore {
    /// Create a new, empty store at `path` and write its initial header.
    ///
    /// Fails with [`TasklogError::StoreAlreadyExists`] if a file is already
    /// present; an existing store is never overwritten.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path_ref)
            .map_err(|source| {
                if source.kind() == ErrorKind::AlreadyExists {
                    TasklogError::StoreAlreadyExists {
                        path: path_ref.to_path_buf(),
                    }
                } else {
                    TasklogError::io("create store file", source)
                }
            })?;

        HeaderCodec::initialize(&mut file)?;
        tracing::debug!(store.path = %path_ref.display(), "created store");

        Ok(Self {
            file,
            path: path_ref.to_path_buf(),
            read_only: false,
        })
    }

    /// Open an existing store read-write and validate its header.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_internal(path.as_ref(), false)
    }

    /// Open an existing store for reading only.
    pub fn open_read_only<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_internal(path.as_ref(), true)
    }

    fn open_internal(path: &Path, read_only: bool) -> Result<Self> {
        let mut options = OpenOptions::new();
        options.read(true);
        if !read_only {
            options.write(true);
        }

        let mut file = options.open(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                TasklogError::StoreMissing {
                    path: path.to_path_buf(),
                }
            } else {
                TasklogError::io("open store file", source)
            }
        })?;

        let header = HeaderCodec::validate(&mut file)?;
        tracing::debug!(
            store.path = %path.display(),
            store.entry_count = header.entry_count,
            store.read_only = read_only,
            "opened store"
        );

        Ok(Self {
            file,
            path: path.to_path_buf(),
            read_only,
        })
    }

    /// Fresh header straight from disk. Counters are never cached on the
    /// handle, so sequential operations each see the latest values.
    pub fn header(&mut self) -> Result<Header> {
        HeaderCodec::read(&mut self.file)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
