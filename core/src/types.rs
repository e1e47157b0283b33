use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compression::{Algorithm, CompressionError};
use crate::strategy::{HandlerError, StrategyType};

/// Process-unique handle of one in-flight job. Never zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId(pub(crate) u64);

impl JobId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Compress,
    Decompress,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Compress => f.write_str("compress"),
            Direction::Decompress => f.write_str("decompress"),
        }
    }
}

/// Errors surfaced across the dispatch boundary.
/// - Configuration errors are rejected before any handler runs.
/// - Capacity/environment errors never escape on their own; they end up as
///   `NoWorkingStrategies` once every candidate was skipped.
/// - Hard handler errors propagate verbatim through `Handler`.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid strategy given by the policy: {0}")]
    InvalidStrategy(StrategyType),

    #[error("all strategies failed")]
    NoWorkingStrategies,

    #[error("unable to find job with id {0}")]
    JobNotFound(JobId),

    #[error("invalid compression level {level} for {algorithm}")]
    InvalidLevel { algorithm: Algorithm, level: i32 },

    #[error("{direction} job submitted with a {buffer} buffer")]
    BufferMismatch { direction: Direction, buffer: &'static str },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("stream is closed")]
    Closed,

    #[error("cannot apply {option} to a {target}")]
    InvalidOption { option: &'static str, target: &'static str },

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl From<CompressionError> for DispatchError {
    fn from(e: CompressionError) -> Self {
        match e {
            CompressionError::InvalidLevel { algorithm, level, .. } => DispatchError::InvalidLevel { algorithm, level },
            other => DispatchError::Handler(HandlerError::Compression(other)),
        }
    }
}

impl From<DispatchError> for std::io::Error {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::Handler(HandlerError::Compression(CompressionError::Io(io))) => io,
            other => std::io::Error::other(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
