//! strategy/isa.rs
//! ISA-optimized gzip backend.
//!
//! Compress runs in safe mode: every chunk is encoded by a fresh encoder into
//! a complete gzip member. Reusing one encoder state across chunks of a job
//! produces corrupt output for inputs that span calls, so nothing of the
//! encoder outlives `request`. The job still holds a pool slot from its first
//! call until release, which keeps the binding count honest.
//!
//! Decompress keeps one decoder per job; consecutive members are read as a
//! single stream.
use crate::compression::{create_encoder, DecoderFraming};
use crate::constants::MAX_ISA_BINDINGS;
use crate::strategy::handler::{admit, encode_once};
use crate::strategy::pool::{lock_session, SessionPool};
use crate::strategy::session::{resume_decode, CodecSession};
use crate::strategy::{Handler, HandlerError, JobRequest, Progress, StrategyType, Work};
use crate::types::JobId;

pub struct IsaHandler {
    installed: bool,
    pool: SessionPool<CodecSession>,
}

impl IsaHandler {
    pub fn new(installed: bool, capacity: usize) -> Self {
        Self { installed, pool: SessionPool::new(StrategyType::Isa, capacity) }
    }
}

impl Default for IsaHandler {
    fn default() -> Self {
        Self::new(true, MAX_ISA_BINDINGS)
    }
}

impl Handler for IsaHandler {
    fn strategy(&self) -> StrategyType {
        StrategyType::Isa
    }

    fn request(&self, req: &mut JobRequest<'_>) -> Result<Progress, HandlerError> {
        admit(StrategyType::Isa, self.installed, req.algorithm)?;

        let (id, algorithm, level) = (req.id, req.algorithm, req.level);
        match &mut req.work {
            Work::Compress { input, sink } => {
                self.pool.acquire(id, || Ok(CodecSession::Reserved))?;
                let encoder = create_encoder(algorithm, level, (*sink).clone())?;
                encode_once(encoder, input, algorithm)
            }
            Work::Decompress { output, source } => {
                let session = self
                    .pool
                    .acquire(id, || CodecSession::decoder(algorithm, source, DecoderFraming::Concatenated))?;
                let mut guard = lock_session(&session);
                guard.read(output)
            }
        }
    }

    fn resume(&self, req: &mut JobRequest<'_>) -> Result<Progress, HandlerError> {
        resume_decode(&self.pool, req)
    }

    fn release(&self, id: JobId) -> Result<(), HandlerError> {
        self.pool.remove(id)?.close()
    }

    fn is_bound(&self, id: JobId) -> bool {
        self.pool.contains(id)
    }
}
