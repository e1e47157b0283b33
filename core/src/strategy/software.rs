//! strategy/software.rs
//! Portable software backend. Always installed, every algorithm.
//!
//! Stateless between calls: a compress call emits one complete frame, a
//! decompress call decodes exactly one frame into the caller's buffer and
//! reports end-of-stream. Live jobs are only tracked so that `release` can
//! tell a known job from an unknown one.
use std::collections::HashSet;
use std::io::Read;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::compression::{create_decoder, create_encoder, CompressionError, DecoderFraming};
use crate::strategy::handler::{admit, encode_once, fill};
use crate::strategy::{Handler, HandlerError, JobRequest, Progress, StrategyType, Work};
use crate::types::JobId;

#[derive(Default)]
pub struct SoftwareHandler {
    in_flight: Mutex<HashSet<JobId>>,
}

impl SoftwareHandler {
    pub fn new() -> Self {
        Self::default()
    }

    fn jobs(&self) -> MutexGuard<'_, HashSet<JobId>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Handler for SoftwareHandler {
    fn strategy(&self) -> StrategyType {
        StrategyType::Software
    }

    fn request(&self, req: &mut JobRequest<'_>) -> Result<Progress, HandlerError> {
        admit(StrategyType::Software, true, req.algorithm)?;

        let (id, algorithm, level) = (req.id, req.algorithm, req.level);
        let progress = match &mut req.work {
            Work::Compress { input, sink } => {
                let encoder = create_encoder(algorithm, level, (*sink).clone())?;
                encode_once(encoder, input, algorithm)?
            }
            Work::Decompress { output, source } => {
                let mut decoder = create_decoder(algorithm, (*source).clone(), DecoderFraming::SingleFrame)?;
                let progress = fill(&mut decoder, output, algorithm)?;
                if !progress.end_of_stream {
                    let mut extra = [0u8; 1];
                    let more = decoder.read(&mut extra).map_err(CompressionError::process(algorithm))?;
                    if more > 0 {
                        return Err(CompressionError::FrameExceedsBuffer {
                            codec: algorithm.name(),
                            capacity: output.len(),
                        }
                        .into());
                    }
                }
                Progress { bytes: progress.bytes, end_of_stream: true }
            }
        };

        self.jobs().insert(id);
        Ok(progress)
    }

    /// Every decompress call ends its frame, so there is never a job to resume.
    fn resume(&self, req: &mut JobRequest<'_>) -> Result<Progress, HandlerError> {
        Err(HandlerError::JobNotFound { strategy: StrategyType::Software, id: req.id })
    }

    fn release(&self, id: JobId) -> Result<(), HandlerError> {
        if self.jobs().remove(&id) {
            Ok(())
        } else {
            Err(HandlerError::JobNotFound { strategy: StrategyType::Software, id })
        }
    }

    fn is_bound(&self, id: JobId) -> bool {
        self.jobs().contains(&id)
    }
}
