#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![allow(clippy::module_name_repetitions)]
//
// Cast policy: the on-disk format fixes every width (u32 lengths, u64 ids and
// timestamps) and all casts are bounded by those widths.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_lossless)]
//
// Documentation lints: internal helpers stay lightly documented; the public
// surface carries the real docs.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Single-file append-only task store.
//!
//! A store is one flat file: a fixed 28-byte header (identity tag, format
//! version, size and id counters) followed by a stream of length-prefixed,
//! big-endian records, one per task. Records are never moved or removed; the
//! only in-place mutations the format permits are the header's counter fields
//! and the eight `done_at` bytes of an individual record.
//!
//! There is no locking and no multi-writer coordination: one writer at a time
//! is an external precondition. Header counters are patched field by field
//! after an append, not transactionally, so a crash between append and patch
//! can leave the counters behind the stream.

/// The tasklog crate version (matches `Cargo.toml`).
pub const TASKLOG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod constants;
pub mod error;
pub mod io;
pub mod store;
pub mod types;

pub use error::{Result, TasklogError};
pub use store::TaskStore;
pub use types::{Entry, Header, HeaderDelta, ListFilter};
