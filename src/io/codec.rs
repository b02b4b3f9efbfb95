//! Fixed-layout record serialization.
//!
//! Wire layout, all integers big-endian:
//!
//! ```text
//! [u32 total_length][u64 id][u64 created_at][u64 deleted_at][u64 done_at]
//! [u32 text_length][text_length bytes of text]
//! ```
//!
//! `total_length` covers the whole record, its own four bytes included, and is
//! back-patched into the front of the buffer once everything else is laid out.

use std::io::Read;

use crate::constants::{LENGTH_PREFIX_SIZE, MAX_TEXT_LEN, RECORD_FIXED_SIZE, RECORD_OVERHEAD};
use crate::error::{Result, TasklogError};
use crate::types::Entry;

/// One decoded record together with its on-disk footprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    pub entry: Entry,
    /// Total bytes the record occupies in the stream, length prefix included.
    pub total_size: u64,
}

pub struct EntryCodec;

impl EntryCodec {
    /// Encoded size of `entry`, length prefix included.
    #[must_use]
    pub fn encoded_size(entry: &Entry) -> usize {
        RECORD_OVERHEAD + entry.text.len()
    }

    /// Serialize `entry` into `out`, returning the number of bytes written.
    pub fn encode(entry: &Entry, out: &mut [u8]) -> Result<usize> {
        let text_len = entry.text.len();
        if text_len > MAX_TEXT_LEN {
            return Err(TasklogError::TextTooLong {
                len: text_len,
                max: MAX_TEXT_LEN,
            });
        }

        let required = RECORD_OVERHEAD + text_len;
        if out.len() < required {
            return Err(TasklogError::BufferTooSmall {
                needed: required,
                available: out.len(),
            });
        }

        // Length prefix is back-patched after the rest is laid out.
        let mut offset = LENGTH_PREFIX_SIZE;
        out[offset..offset + 8].copy_from_slice(&entry.id.to_be_bytes());
        offset += 8;
        out[offset..offset + 8].copy_from_slice(&entry.created_at.to_be_bytes());
        offset += 8;
        out[offset..offset + 8].copy_from_slice(&entry.deleted_at.to_be_bytes());
        offset += 8;
        out[offset..offset + 8].copy_from_slice(&entry.done_at.to_be_bytes());
        offset += 8;
        out[offset..offset + 4].copy_from_slice(&(text_len as u32).to_be_bytes());
        offset += 4;
        out[offset..offset + text_len].copy_from_slice(&entry.text);
        offset += text_len;

        out[..LENGTH_PREFIX_SIZE].copy_from_slice(&(offset as u32).to_be_bytes());
        Ok(offset)
    }

    /// Decode one record from `reader`.
    ///
    /// `record_offset` is the absolute file offset of the record's first byte
    /// and is only used to report where corruption was found. The stored
    /// `total_length` is checked against the length recomputed from
    /// `text_length` on every decode; a mismatch is the format's only
    /// corruption signal and parsing past it would misread the stream.
    pub fn decode(reader: &mut impl Read, record_offset: u64) -> Result<DecodedRecord> {
        let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
        read_record_bytes(reader, &mut prefix, record_offset, "read record length")?;
        let total_length = u32::from_be_bytes(prefix);

        let mut fixed = [0u8; RECORD_FIXED_SIZE];
        read_record_bytes(reader, &mut fixed, record_offset, "read record fields")?;

        let id = u64::from_be_bytes(fixed[..8].try_into().map_err(|_| malformed(record_offset))?);
        let created_at =
            u64::from_be_bytes(fixed[8..16].try_into().map_err(|_| malformed(record_offset))?);
        let deleted_at =
            u64::from_be_bytes(fixed[16..24].try_into().map_err(|_| malformed(record_offset))?);
        let done_at =
            u64::from_be_bytes(fixed[24..32].try_into().map_err(|_| malformed(record_offset))?);
        let text_length =
            u32::from_be_bytes(fixed[32..36].try_into().map_err(|_| malformed(record_offset))?);

        if text_length as usize > MAX_TEXT_LEN {
            return Err(TasklogError::CorruptedRecord {
                offset: record_offset,
                reason: format!("text length {text_length} exceeds maximum {MAX_TEXT_LEN}"),
            });
        }

        let expected = (RECORD_OVERHEAD + text_length as usize) as u32;
        if total_length != expected {
            return Err(TasklogError::CorruptedRecord {
                offset: record_offset,
                reason: format!(
                    "length prefix {total_length} disagrees with computed size {expected}"
                ),
            });
        }

        let mut text = vec![0u8; text_length as usize];
        read_record_bytes(reader, &mut text, record_offset, "read record text")?;

        Ok(DecodedRecord {
            entry: Entry {
                id,
                text,
                created_at,
                deleted_at,
                done_at,
            },
            total_size: u64::from(total_length),
        })
    }
}

fn malformed(offset: u64) -> TasklogError {
    TasklogError::CorruptedRecord {
        offset,
        reason: "malformed record field slice".into(),
    }
}

/// A record that ends mid-field is corruption, not a transient i/o condition.
fn read_record_bytes(
    reader: &mut impl Read,
    buf: &mut [u8],
    record_offset: u64,
    op: &'static str,
) -> Result<()> {
    reader.read_exact(buf).map_err(|source| {
        if source.kind() == std::io::ErrorKind::UnexpectedEof {
            TasklogError::CorruptedRecord {
                offset: record_offset,
                reason: "truncated record".into(),
            }
        } else {
            TasklogError::io(op, source)
        }
    })
}
