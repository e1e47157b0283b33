//! compression/codecs/mod.rs
//! Per-algorithm codec adapters. The registry resolves an `Algorithm` to one
//! of these.

pub mod deflate;
pub mod gzip;
pub mod lz4;
pub mod zstd;

pub use deflate::DeflateSession;
pub use gzip::GzipSession;
pub use zstd::ZstdSession;
