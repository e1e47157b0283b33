//! compression/types.rs
//! Algorithm model, algorithm sets, codec errors and the encoder capability.
use std::fmt;
use std::io::{self, Write};
use std::ops::RangeInclusive;

use bitflags::bitflags;
use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compression::constants::*;

/// Algorithm a stream uses until told otherwise.
pub const DEFAULT_ALGORITHM: Algorithm = Algorithm::Gzip;

/// Closed set of compression algorithms the dispatch core can route.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Deflate = algorithm_ids::DEFLATE,
    Gzip    = algorithm_ids::GZIP,
    Lz4     = algorithm_ids::LZ4,
    Zstd    = algorithm_ids::ZSTD,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [Algorithm::Deflate, Algorithm::Gzip, Algorithm::Lz4, Algorithm::Zstd];

    /// Membership check over raw ids.
    pub fn is_valid(raw: u8) -> bool {
        Algorithm::try_from_primitive(raw).is_ok()
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Deflate => "deflate",
            Algorithm::Gzip => "gzip",
            Algorithm::Lz4 => "lz4",
            Algorithm::Zstd => "zstd",
        }
    }

    pub fn level_range(self) -> RangeInclusive<i32> {
        match self {
            Algorithm::Deflate | Algorithm::Gzip => MIN_LEVEL..=MAX_LEVEL_FLATE,
            Algorithm::Lz4 => MIN_LEVEL..=MAX_LEVEL_LZ4,
            Algorithm::Zstd => MIN_LEVEL..=MAX_LEVEL_ZSTD,
        }
    }

    pub fn default_level(self) -> i32 {
        match self {
            Algorithm::Deflate => DEFAULT_LEVEL_DEFLATE,
            Algorithm::Gzip => DEFAULT_LEVEL_GZIP,
            Algorithm::Lz4 => DEFAULT_LEVEL_LZ4,
            Algorithm::Zstd => DEFAULT_LEVEL_ZSTD,
        }
    }

    pub fn validate_level(self, level: i32) -> Result<(), CompressionError> {
        let range = self.level_range();
        if range.contains(&level) {
            Ok(())
        } else {
            Err(CompressionError::InvalidLevel {
                algorithm: self,
                level,
                min: *range.start(),
                max: *range.end(),
            })
        }
    }

    /// Engine symbol used by the offload accelerator.
    pub fn offload_symbol(self) -> OffloadSymbol {
        match self {
            Algorithm::Deflate => OffloadSymbol::Deflate,
            Algorithm::Gzip => OffloadSymbol::DeflateGzip,
            Algorithm::Lz4 => OffloadSymbol::Lz4,
            Algorithm::Zstd => OffloadSymbol::Zstd,
        }
    }

    pub fn flag(self) -> AlgorithmSet {
        match self {
            Algorithm::Deflate => AlgorithmSet::DEFLATE,
            Algorithm::Gzip => AlgorithmSet::GZIP,
            Algorithm::Lz4 => AlgorithmSet::LZ4,
            Algorithm::Zstd => AlgorithmSet::ZSTD,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Engine-side algorithm selector. gzip is deflate with gzip member framing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OffloadSymbol {
    Deflate,
    DeflateGzip,
    Lz4,
    Zstd,
}

bitflags! {
    /// Set of algorithms a backend can serve.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    pub struct AlgorithmSet: u8 {
        const DEFLATE = 1 << algorithm_ids::DEFLATE;
        const GZIP    = 1 << algorithm_ids::GZIP;
        const LZ4     = 1 << algorithm_ids::LZ4;
        const ZSTD    = 1 << algorithm_ids::ZSTD;
    }
}

impl AlgorithmSet {
    pub fn supports(self, algorithm: Algorithm) -> bool {
        self.contains(algorithm.flag())
    }

    pub fn algorithms(self) -> impl Iterator<Item = Algorithm> {
        Algorithm::ALL.into_iter().filter(move |a| self.supports(*a))
    }
}

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("invalid compression level {level} for {algorithm}: must be in range [{min}, {max}]")]
    InvalidLevel { algorithm: Algorithm, level: i32, min: i32, max: i32 },

    #[error("codec {codec} init failed: {msg}")]
    CodecInitFailed { codec: &'static str, msg: String },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: &'static str, msg: String },

    #[error("decoded {codec} frame does not fit in a {capacity}-byte buffer")]
    FrameExceedsBuffer { codec: &'static str, capacity: usize },

    #[error("compression state error: {0}")]
    StateError(String),

    #[error("compression I/O error: {0}")]
    Io(#[from] io::Error),
}

impl CompressionError {
    pub(crate) fn init(algorithm: Algorithm) -> impl FnOnce(io::Error) -> CompressionError {
        move |e| CompressionError::CodecInitFailed { codec: algorithm.name(), msg: e.to_string() }
    }

    pub(crate) fn process(algorithm: Algorithm) -> impl FnOnce(io::Error) -> CompressionError {
        move |e| CompressionError::CodecProcessFailed { codec: algorithm.name(), msg: e.to_string() }
    }
}

/// A frame encoder over some sink. `finish` writes the container trailer.
pub trait FrameEncoder: Write + Send {
    fn finish(self: Box<Self>) -> io::Result<()>;
}

/// A streaming frame decoder over some source.
pub type FrameDecoder = Box<dyn io::Read + Send>;
