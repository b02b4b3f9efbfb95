//! Write-path operations: appending entries and patching completion state.

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};

use crate::constants::MAX_RECORD_SIZE;
use crate::error::{IoResultExt, Result, TasklogError};
use crate::io::codec::EntryCodec;
use crate::io::header::HeaderCodec;
use crate::io::scanner;
use crate::store::{TaskStore, now_millis};
use crate::types::{Entry, HeaderDelta};

impl TaskStore {
    /// Append a new entry with the given task text and return it.
    ///
    /// The id comes from `last_entry_id` read fresh off the header, so
    /// sequential adds each see the previous one's counter update. The record
    /// is appended with a single write on an append-mode handle; the header
    /// counters are patched afterwards, with no atomicity claim across the
    /// two steps.
    pub fn add(&mut self, text: &[u8]) -> Result<Entry> {
        self.assert_writable()?;

        let header = self.header()?;
        let entry = Entry {
            id: header.last_entry_id + 1,
            text: text.to_vec(),
            created_at: now_millis(),
            deleted_at: 0,
            done_at: 0,
        };

        let mut buf = vec![0u8; MAX_RECORD_SIZE];
        let written = EntryCodec::encode(&entry, &mut buf)?;

        let mut appender = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .during("open store for append")?;
        appender
            .write_all(&buf[..written])
            .during("append record")?;

        let delta = HeaderDelta::new()
            .grow_filesize(written as u32)
            .set_last_entry_id(entry.id)
            .increment_entry_count();
        HeaderCodec::patch(&mut self.file, &delta)?;

        tracing::debug!(
            entry.id = entry.id,
            entry.bytes = written,
            "appended entry"
        );
        Ok(entry)
    }

    /// Mark the entry with `id` completed by overwriting exactly the eight
    /// `done_at` bytes of its record in place. No other byte of the file, the
    /// header included, changes.
    pub fn mark_done(&mut self, id: u64) -> Result<()> {
        self.assert_writable()?;

        let header = self.header()?;
        let outcome = scanner::scan(&mut self.file, &header, Some(id))?;
        let Some(offset) = outcome.done_at_offset() else {
            return Err(TasklogError::NotFound { id });
        };

        let done_at = now_millis();
        self.file
            .seek(SeekFrom::Start(offset))
            .during("seek done_at field")?;
        self.file
            .write_all(&done_at.to_be_bytes())
            .during("write done_at field")?;

        tracing::debug!(entry.id = id, entry.done_at = done_at, "marked entry done");
        Ok(())
    }

    fn assert_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(TasklogError::io(
                "write to read-only store",
                std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "store was opened read-only",
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{HEADER_SIZE, RECORD_OVERHEAD};
    use crate::types::ListFilter;
    use tempfile::tempdir;

    #[test]
    fn sequential_adds_assign_increasing_ids() {
        let dir = tempdir().expect("tempdir");
        let mut store = TaskStore::create(dir.path().join("tasks.db")).expect("create");

        let first = store.add(b"buy milk").expect("add first");
        let second = store.add(b"call mom").expect("add second");
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);

        let header = store.header().expect("header");
        assert_eq!(header.last_entry_id, 2);
        assert_eq!(header.entry_count, 2);
        assert_eq!(
            u64::from(header.filesize),
            HEADER_SIZE + 2 * (RECORD_OVERHEAD as u64 + 8)
        );
    }

    #[test]
    fn add_rejects_oversized_text() {
        let dir = tempdir().expect("tempdir");
        let mut store = TaskStore::create(dir.path().join("tasks.db")).expect("create");

        let err = store
            .add(&vec![b'x'; crate::constants::MAX_TEXT_LEN + 1])
            .expect_err("should reject");
        assert!(matches!(err, TasklogError::TextTooLong { .. }));

        // Nothing was appended and no counter moved.
        let header = store.header().expect("header");
        assert_eq!(header.entry_count, 0);
        assert_eq!(u64::from(header.filesize), HEADER_SIZE);
    }

    #[test]
    fn mark_done_sets_only_the_target_entry() {
        let dir = tempdir().expect("tempdir");
        let mut store = TaskStore::create(dir.path().join("tasks.db")).expect("create");
        store.add(b"buy milk").expect("add");
        store.add(b"call mom").expect("add");

        store.mark_done(1).expect("mark done");

        let entries = store.list(ListFilter::All).expect("list");
        assert!(entries[0].is_done());
        assert_eq!(entries[1].done_at, 0);
    }

    #[test]
    fn mark_done_unknown_id_reports_not_found() {
        let dir = tempdir().expect("tempdir");
        let mut store = TaskStore::create(dir.path().join("tasks.db")).expect("create");
        store.add(b"buy milk").expect("add");

        let err = store.mark_done(42).expect_err("should fail");
        assert!(matches!(err, TasklogError::NotFound { id: 42 }));
    }

    #[test]
    fn writes_through_a_read_only_handle_are_refused() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("tasks.db");
        TaskStore::create(&path).expect("create");

        let mut store = TaskStore::open_read_only(&path).expect("open");
        assert!(store.add(b"nope").is_err());
        assert!(store.mark_done(1).is_err());
    }
}
