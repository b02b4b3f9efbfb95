//! The task store: a single flat file holding a fixed header followed by an
//! append-only stream of length-prefixed records.
//!
//! One handle performs one logical operation and is then dropped; nothing is
//! cached across operations. The format has no locking, so single writer at a
//! time is an external precondition, not something this module enforces.

mod lifecycle;
mod mutation;
mod query;

use std::fs::File;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Handle to an opened store file.
///
/// Obtained from [`TaskStore::create`], [`TaskStore::open`], or
/// [`TaskStore::open_read_only`]; the header is validated on open, not on
/// every call.
#[derive(Debug)]
pub struct TaskStore {
    pub(crate) file: File,
    pub(crate) path: PathBuf,
    pub(crate) read_only: bool,
}

/// Milliseconds since the Unix epoch. Clocks before the epoch collapse to 0,
/// the format's "not set" sentinel.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as u64)
}
