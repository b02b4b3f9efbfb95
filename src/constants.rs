//! On-disk layout constants for the tasklog store format.

/// Identity tag at offset 0 of every store file.
pub const MAGIC: u64 = 0x004e_4e4e;

/// Current (and only) format revision. The legacy 24-byte header without an
/// entry count is not readable by this crate.
pub const FORMAT_VERSION: u32 = 1;

/// Fixed header size. Records start immediately after.
pub const HEADER_SIZE: u64 = 28;

// Byte offsets of the individual header fields, used by partial patching.
pub const HEADER_MAGIC_OFFSET: u64 = 0;
pub const HEADER_VERSION_OFFSET: u64 = 8;
pub const HEADER_FILESIZE_OFFSET: u64 = 12;
pub const HEADER_LAST_ID_OFFSET: u64 = 16;
pub const HEADER_COUNT_OFFSET: u64 = 24;

/// Upper bound on task text, in bytes.
pub const MAX_TEXT_LEN: usize = 4096;

/// Size of the `total_length` prefix on every record.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Record block between the length prefix and the text:
/// id + created_at + deleted_at + done_at + text_length.
pub const RECORD_FIXED_SIZE: usize = 8 + 8 + 8 + 8 + 4;

/// Everything in a record except the text itself.
pub const RECORD_OVERHEAD: usize = LENGTH_PREFIX_SIZE + RECORD_FIXED_SIZE;

/// Largest possible encoded record.
pub const MAX_RECORD_SIZE: usize = RECORD_OVERHEAD + MAX_TEXT_LEN;

/// Offset of the `done_at` field within a record, relative to the record start
/// (length prefix + id + created_at + deleted_at).
pub const DONE_AT_RECORD_OFFSET: u64 = 4 + 8 + 8 + 8;
