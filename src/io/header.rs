//! Fixed-preamble encode/decode and partial in-place patching.
//!
//! The header is the only region of the file that is ever rewritten; records
//! are append-only apart from the `done_at` patch performed by the store.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};

use crate::constants::{
    FORMAT_VERSION, HEADER_COUNT_OFFSET, HEADER_FILESIZE_OFFSET, HEADER_LAST_ID_OFFSET,
    HEADER_SIZE, MAGIC,
};
use crate::error::{IoResultExt, Result, TasklogError};
use crate::types::{CountUpdate, FilesizeUpdate, Header, HeaderDelta};

pub struct HeaderCodec;

impl HeaderCodec {
    /// Write a fresh header for an empty store at offset 0.
    pub fn initialize(file: &mut File) -> Result<()> {
        Self::write(file, &Header::new_empty())
    }

    /// Rewrite the full 28-byte header.
    pub fn write(file: &mut File, header: &Header) -> Result<()> {
        let mut buf = [0u8; HEADER_SIZE as usize];
        buf[..8].copy_from_slice(&header.magic.to_be_bytes());
        buf[8..12].copy_from_slice(&header.version.to_be_bytes());
        buf[12..16].copy_from_slice(&header.filesize.to_be_bytes());
        buf[16..24].copy_from_slice(&header.last_entry_id.to_be_bytes());
        buf[24..28].copy_from_slice(&header.entry_count.to_be_bytes());

        file.seek(SeekFrom::Start(0)).during("seek header")?;
        file.write_all(&buf).during("write header")?;
        Ok(())
    }

    /// Read and decode the header. Fails on short read; performs no
    /// validity checks beyond length.
    pub fn read(file: &mut File) -> Result<Header> {
        let mut buf = [0u8; HEADER_SIZE as usize];
        file.seek(SeekFrom::Start(0)).during("seek header")?;
        file.read_exact(&mut buf).during("read header")?;

        Ok(Header {
            magic: u64::from_be_bytes(buf[..8].try_into().map_err(malformed)?),
            version: u32::from_be_bytes(buf[8..12].try_into().map_err(malformed)?),
            filesize: u32::from_be_bytes(buf[12..16].try_into().map_err(malformed)?),
            last_entry_id: u64::from_be_bytes(buf[16..24].try_into().map_err(malformed)?),
            entry_count: u32::from_be_bytes(buf[24..28].try_into().map_err(malformed)?),
        })
    }

    /// Read the header and check its identity fields.
    pub fn validate(file: &mut File) -> Result<Header> {
        let header = Self::read(file)?;
        if header.magic != MAGIC {
            return Err(TasklogError::InvalidMagic {
                expected: MAGIC,
                found: header.magic,
            });
        }
        if header.version != FORMAT_VERSION {
            return Err(TasklogError::InvalidVersion {
                expected: FORMAT_VERSION,
                found: header.version,
            });
        }
        Ok(header)
    }

    /// Advisory cross-check of the self-reported filesize against the actual
    /// file length. Mid-operation the header write can lag or lead the real
    /// length, so this is kept separate from [`validate`](Self::validate) and
    /// callers decide when it is meaningful.
    pub fn verify_filesize(file: &File, header: &Header) -> Result<()> {
        let actual = file.metadata().during("stat store file")?.len();
        if u64::from(header.filesize) != actual {
            return Err(TasklogError::CorruptedRecord {
                offset: HEADER_FILESIZE_OFFSET,
                reason: format!(
                    "header filesize {} disagrees with actual file length {actual}",
                    header.filesize
                ),
            });
        }
        Ok(())
    }

    /// Patch only the fields named by `delta`, each with its own seek+write at
    /// the field's fixed offset.
    ///
    /// The fields are NOT updated as one transaction. A failure partway
    /// through leaves the already-written fields in place; the error names
    /// the field whose write failed. Single-writer discipline is the caller's
    /// responsibility.
    pub fn patch(file: &mut File, delta: &HeaderDelta) -> Result<()> {
        if delta.is_empty() {
            return Ok(());
        }

        // Add/increment modifiers are relative to what is on disk right now,
        // not to any cached copy.
        let current = if delta.needs_current_header() {
            Some(Self::read(file)?)
        } else {
            None
        };

        if let Some(update) = delta.filesize {
            let value = match update {
                FilesizeUpdate::Set(value) => value,
                FilesizeUpdate::Add(added) => current_field(&current, |h| h.filesize) + added,
            };
            tracing::debug!(header.filesize = value, "patch header filesize");
            file.seek(SeekFrom::Start(HEADER_FILESIZE_OFFSET))
                .during("seek header filesize")?;
            file.write_all(&value.to_be_bytes())
                .during("write header filesize")?;
        }

        if let Some(id) = delta.last_entry_id {
            tracing::debug!(header.last_entry_id = id, "patch header last entry id");
            file.seek(SeekFrom::Start(HEADER_LAST_ID_OFFSET))
                .during("seek header last_entry_id")?;
            file.write_all(&id.to_be_bytes())
                .during("write header last_entry_id")?;
        }

        if let Some(update) = delta.entry_count {
            let value = match update {
                CountUpdate::Set(value) => value,
                CountUpdate::Add(added) => current_field(&current, |h| h.entry_count) + added,
                CountUpdate::Increment => current_field(&current, |h| h.entry_count) + 1,
            };
            tracing::debug!(header.entry_count = value, "patch header entry count");
            file.seek(SeekFrom::Start(HEADER_COUNT_OFFSET))
                .during("seek header entry_count")?;
            file.write_all(&value.to_be_bytes())
                .during("write header entry_count")?;
        }

        Ok(())
    }
}

fn malformed(_: std::array::TryFromSliceError) -> TasklogError {
    TasklogError::CorruptedRecord {
        offset: 0,
        reason: "malformed header field slice".into(),
    }
}

fn current_field<T>(current: &Option<Header>, get: impl Fn(&Header) -> T) -> T
where
    T: Default,
{
    current.as_ref().map(get).unwrap_or_default()
}
