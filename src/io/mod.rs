//! Byte-level store i/o: header codec, record codec, and the stream scanner.

pub mod codec;
pub mod header;
pub mod scanner;
