//! Error types shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = TasklogError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum TasklogError {
    #[error("store does not exist at {path}; run `tasklog init` first")]
    StoreMissing { path: PathBuf },

    #[error("store already exists at {path}")]
    StoreAlreadyExists { path: PathBuf },

    #[error("invalid store magic: expected {expected:#x}, found {found:#x}")]
    InvalidMagic { expected: u64, found: u64 },

    #[error("unsupported store format version {found} (expected {expected})")]
    InvalidVersion { expected: u32, found: u32 },

    #[error("corrupted record at offset {offset}: {reason}")]
    CorruptedRecord { offset: u64, reason: String },

    #[error("task text is {len} bytes, maximum is {max}")]
    TextTooLong { len: usize, max: usize },

    #[error("encode buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall { needed: usize, available: usize },

    #[error("no entry with id {id}")]
    NotFound { id: u64 },

    #[error("i/o failure during {op}: {source}")]
    Io {
        op: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl TasklogError {
    pub(crate) fn io(op: &'static str, source: std::io::Error) -> Self {
        Self::Io { op, source }
    }
}

/// Attaches the failing operation's identity to raw `io::Result`s.
pub(crate) trait IoResultExt<T> {
    fn during(self, op: &'static str) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn during(self, op: &'static str) -> Result<T> {
        self.map_err(|source| TasklogError::io(op, source))
    }
}
