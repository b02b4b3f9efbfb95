//! Sequential scan over the record stream.
//!
//! The scanner is the only reader of record bytes. It walks the stream from
//! the end of the header, decoding at most `header.entry_count` records, and
//! tracks exactly how many bytes each record consumed so a caller can later
//! patch a field of a matched record in place without a second pass.

use std::fs::File;
use std::io::{Seek, SeekFrom};

use crate::constants::{DONE_AT_RECORD_OFFSET, HEADER_SIZE};
use crate::error::{IoResultExt, Result};
use crate::io::codec::EntryCodec;
use crate::types::{Entry, Header};

/// Result of one scan pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Records decoded, in stream (= insertion) order. When the scan stopped
    /// early this is the prefix up to and including the matched record.
    pub entries: Vec<Entry>,
    /// Total bytes consumed from the record stream, length prefixes included.
    pub bytes_read: u64,
    /// Index into `entries` of the record that matched `stop_id`.
    pub matched: Option<usize>,
    /// Absolute file offset of the matched record's first byte.
    matched_record_start: Option<u64>,
}

impl ScanOutcome {
    /// Absolute file offset of the matched record's `done_at` field, derived
    /// from the record's start offset and the fixed layout.
    #[must_use]
    pub fn done_at_offset(&self) -> Option<u64> {
        self.matched_record_start
            .map(|start| start + DONE_AT_RECORD_OFFSET)
    }

    #[must_use]
    pub fn matched_entry(&self) -> Option<&Entry> {
        self.matched.and_then(|index| self.entries.get(index))
    }
}

/// Decode up to `header.entry_count` records starting right after the header.
///
/// With `stop_id` set, the scan halts as soon as the just-decoded record's id
/// equals it; the outcome then carries both the decoded prefix and enough
/// offset information to patch the matched record in place.
pub fn scan(file: &mut File, header: &Header, stop_id: Option<u64>) -> Result<ScanOutcome> {
    file.seek(SeekFrom::Start(HEADER_SIZE))
        .during("seek past header")?;

    let mut entries = Vec::with_capacity(header.entry_count as usize);
    let mut bytes_read = 0u64;
    let mut matched = None;
    let mut matched_record_start = None;

    for index in 0..header.entry_count as usize {
        let record_start = HEADER_SIZE + bytes_read;
        let decoded = EntryCodec::decode(file, record_start)?;
        bytes_read += decoded.total_size;

        let id = decoded.entry.id;
        entries.push(decoded.entry);

        if stop_id == Some(id) {
            matched = Some(index);
            matched_record_start = Some(record_start);
            break;
        }
    }

    tracing::debug!(
        scan.records = entries.len(),
        scan.bytes_read = bytes_read,
        scan.matched = matched.is_some(),
        "scan complete"
    );

    Ok(ScanOutcome {
        entries,
        bytes_read,
        matched,
        matched_record_start,
    })
}
