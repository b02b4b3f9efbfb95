//! Public types exposed by the `tasklog` crate.

use crate::constants::{FORMAT_VERSION, HEADER_SIZE, MAGIC};

/// Fixed 28-byte metadata block at the start of every store file.
///
/// `magic` and `version` are written once at initialization and never change;
/// the three counters are maintained by every append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub magic: u64,
    pub version: u32,
    /// Self-reported total file length, header included.
    pub filesize: u32,
    /// Highest id ever assigned. Ids are never reused.
    pub last_entry_id: u64,
    /// Number of records in the stream after the header.
    pub entry_count: u32,
}

impl Header {
    /// Header for a freshly initialized, empty store.
    #[must_use]
    pub fn new_empty() -> Self {
        Self {
            magic: MAGIC,
            version: FORMAT_VERSION,
            filesize: HEADER_SIZE as u32,
            last_entry_id: 0,
            entry_count: 0,
        }
    }
}

/// One logical task item.
///
/// `deleted_at` and `done_at` use 0 as the "not set" sentinel. An entry is
/// created once and appended once; the only later mutation the format permits
/// is an in-place overwrite of its `done_at` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: u64,
    pub text: Vec<u8>,
    /// Millisecond timestamp of creation.
    pub created_at: u64,
    /// Millisecond timestamp of soft-deletion, 0 while active. Modeled in the
    /// format but never set by the current operation set.
    pub deleted_at: u64,
    /// Millisecond timestamp of completion, 0 while open.
    pub done_at: u64,
}

impl Entry {
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done_at != 0
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at != 0
    }

    /// Task text for display. Stored bytes are expected to be UTF-8 but the
    /// format does not enforce it.
    #[must_use]
    pub fn text_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }
}

/// New value for the header's `filesize` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilesizeUpdate {
    Set(u32),
    /// Add to the value currently on disk.
    Add(u32),
}

/// New value for the header's `entry_count` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountUpdate {
    Set(u32),
    /// Add to the value currently on disk.
    Add(u32),
    /// Add exactly one to the value currently on disk.
    Increment,
}

/// Names the header fields to change in a partial patch; absent fields are
/// left untouched on disk.
///
/// Fields are patched independently, in declaration order, and NOT as one
/// transaction: a failure partway through leaves the fields written so far in
/// place. Callers rely on single-writer discipline (see crate docs).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderDelta {
    pub filesize: Option<FilesizeUpdate>,
    pub last_entry_id: Option<u64>,
    pub entry_count: Option<CountUpdate>,
}

impl HeaderDelta {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn grow_filesize(mut self, delta: u32) -> Self {
        self.filesize = Some(FilesizeUpdate::Add(delta));
        self
    }

    #[must_use]
    pub fn set_filesize(mut self, value: u32) -> Self {
        self.filesize = Some(FilesizeUpdate::Set(value));
        self
    }

    #[must_use]
    pub fn set_last_entry_id(mut self, id: u64) -> Self {
        self.last_entry_id = Some(id);
        self
    }

    #[must_use]
    pub fn set_entry_count(mut self, count: u32) -> Self {
        self.entry_count = Some(CountUpdate::Set(count));
        self
    }

    #[must_use]
    pub fn increment_entry_count(mut self) -> Self {
        self.entry_count = Some(CountUpdate::Increment);
        self
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filesize.is_none() && self.last_entry_id.is_none() && self.entry_count.is_none()
    }

    /// Whether any field needs the current on-disk header to compute its new
    /// value (the add/increment modifiers).
    #[must_use]
    pub fn needs_current_header(&self) -> bool {
        matches!(self.filesize, Some(FilesizeUpdate::Add(_)))
            || matches!(
                self.entry_count,
                Some(CountUpdate::Add(_) | CountUpdate::Increment)
            )
    }
}

/// Selection applied by [`TaskStore::list`](crate::store::TaskStore::list).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListFilter {
    /// Every record in the stream, soft-deleted ones included.
    #[default]
    All,
    /// Everything not soft-deleted.
    ExceptDeleted,
    /// Not soft-deleted and not completed.
    OnlyActive,
}

impl ListFilter {
    #[must_use]
    pub fn matches(&self, entry: &Entry) -> bool {
        match self {
            Self::All => true,
            Self::ExceptDeleted => !entry.is_deleted(),
            Self::OnlyActive => !entry.is_deleted() && !entry.is_done(),
        }
    }
}
