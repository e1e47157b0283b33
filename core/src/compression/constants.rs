//! compression/constants.rs
//! Stable algorithm ids, level bounds and defaults.

/// Stable algorithm ids (u8) used by `Algorithm`'s `#[repr(u8)]`.
pub mod algorithm_ids {
    pub const DEFLATE: u8 = 0x00;
    pub const GZIP: u8    = 0x01;
    pub const LZ4: u8     = 0x02;
    pub const ZSTD: u8    = 0x03;
}

/// Default compression levels (balanced).
pub const DEFAULT_LEVEL_DEFLATE: i32 = 6;
pub const DEFAULT_LEVEL_GZIP: i32 = 6;
pub const DEFAULT_LEVEL_LZ4: i32 = 1;
pub const DEFAULT_LEVEL_ZSTD: i32 = 3;

/// Accepted level bounds (inclusive).
pub const MIN_LEVEL: i32 = 1;
pub const MAX_LEVEL_FLATE: i32 = 9;
pub const MAX_LEVEL_LZ4: i32 = 12; // accepted, lz4_flex frames have no level knob
pub const MAX_LEVEL_ZSTD: i32 = 22;

/// gzip member framing (RFC 1952).
pub const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
pub const GZIP_METHOD_DEFLATE: u8 = 0x08;
pub const GZIP_OS_UNKNOWN: u8 = 0xff;
pub const GZIP_HEADER_LEN: usize = 10;
