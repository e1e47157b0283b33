//! strategy/handler.rs
//! The capability every backend implements, and the error taxonomy it
//! reports to the manager.
use std::io::{Read, Write};

use thiserror::Error;

use crate::compression::{Algorithm, CompressionError, FrameDecoder, FrameEncoder};
use crate::stream::{SinkHandle, SourceHandle};
use crate::strategy::StrategyType;
use crate::types::{Direction, JobId};

/// One unit of work for a handler.
pub enum Work<'a> {
    /// Encode `input` as a complete container into `sink`.
    Compress { input: &'a [u8], sink: &'a SinkHandle },
    /// Decode from `source` into `output`.
    Decompress { output: &'a mut [u8], source: &'a SourceHandle },
}

impl Work<'_> {
    pub fn direction(&self) -> Direction {
        match self {
            Work::Compress { .. } => Direction::Compress,
            Work::Decompress { .. } => Direction::Decompress,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Work::Compress { input, .. } => input.len(),
            Work::Decompress { output, .. } => output.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct JobRequest<'a> {
    pub id: JobId,
    pub algorithm: Algorithm,
    pub level: i32,
    pub work: Work<'a>,
}

/// Result of a successful unit of work.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct Progress {
    pub bytes: usize,
    /// Decompress only: the decoder has no more output for this job.
    pub end_of_stream: bool,
}

#[derive(Debug, Error)]
pub enum HandlerError {
    /// Engine missing on this host. The strategy should be disabled.
    #[error("{0} engine is not installed on this host")]
    NotInstalled(StrategyType),

    /// Binding pool full. Transient.
    #[error("{strategy} binding pool exhausted ({capacity} sessions)")]
    NotAvailable { strategy: StrategyType, capacity: usize },

    #[error("{algorithm} is not supported by {strategy}")]
    Unsupported { strategy: StrategyType, algorithm: Algorithm },

    #[error("{strategy} has no session for job {id}")]
    JobNotFound { strategy: StrategyType, id: JobId },

    #[error("{strategy} session for job {id} is still in use")]
    SessionBusy { strategy: StrategyType, id: JobId },

    #[error(transparent)]
    Compression(#[from] CompressionError),
}

impl HandlerError {
    /// Errors after which the manager moves on to the next candidate.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            HandlerError::NotInstalled(_) | HandlerError::NotAvailable { .. } | HandlerError::Unsupported { .. }
        )
    }

    pub fn is_job_not_found(&self) -> bool {
        matches!(self, HandlerError::JobNotFound { .. })
    }
}

pub trait Handler: Send + Sync {
    fn strategy(&self) -> StrategyType;

    /// Perform one unit of work. Installation and algorithm support are
    /// checked before anything is bound.
    fn request(&self, req: &mut JobRequest<'_>) -> Result<Progress, HandlerError>;

    /// Continue a decompress job this handler already holds state for.
    ///
    /// Never opens a session: a job released between the caller's lookup
    /// and this call fails with `JobNotFound` instead of restarting the
    /// decoder partway through the source.
    fn resume(&self, req: &mut JobRequest<'_>) -> Result<Progress, HandlerError>;

    /// Tear down per-job state and free its pool slot.
    fn release(&self, id: JobId) -> Result<(), HandlerError>;

    /// Whether this handler currently holds state for `id`.
    fn is_bound(&self, id: JobId) -> bool;
}

/// Shared precondition of every backend.
pub(crate) fn admit(strategy: StrategyType, installed: bool, algorithm: Algorithm) -> Result<(), HandlerError> {
    if !installed {
        return Err(HandlerError::NotInstalled(strategy));
    }
    if !strategy.supports(algorithm) {
        return Err(HandlerError::Unsupported { strategy, algorithm });
    }
    Ok(())
}

/// Read from `decoder` until `output` is full or the stream ends.
pub(crate) fn fill(decoder: &mut FrameDecoder, output: &mut [u8], algorithm: Algorithm) -> Result<Progress, HandlerError> {
    let mut n = 0;
    while n < output.len() {
        let read = decoder.read(&mut output[n..]).map_err(CompressionError::process(algorithm))?;
        if read == 0 {
            return Ok(Progress { bytes: n, end_of_stream: true });
        }
        n += read;
    }
    Ok(Progress { bytes: n, end_of_stream: false })
}

/// Write the whole chunk and finalize the container.
pub(crate) fn encode_once(mut encoder: Box<dyn FrameEncoder>, input: &[u8], algorithm: Algorithm) -> Result<Progress, HandlerError> {
    encoder.write_all(input).map_err(CompressionError::process(algorithm))?;
    encoder.finish().map_err(CompressionError::process(algorithm))?;
    Ok(Progress { bytes: input.len(), end_of_stream: false })
}
