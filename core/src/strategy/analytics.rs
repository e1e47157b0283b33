//! strategy/analytics.rs
//! In-memory analytics accelerator backend (deflate, gzip).
//!
//! Each job owns one session for its lifetime: an open encoder for compress
//! jobs, a streaming decoder for decompress jobs. Compressed chunks from
//! repeated calls land in the same container, which is closed on release.
use crate::compression::DecoderFraming;
use crate::constants::MAX_ANALYTICS_BINDINGS;
use crate::strategy::handler::admit;
use crate::strategy::pool::{lock_session, SessionPool};
use crate::strategy::session::{resume_decode, CodecSession};
use crate::strategy::{Handler, HandlerError, JobRequest, Progress, StrategyType, Work};
use crate::types::JobId;

pub struct AnalyticsHandler {
    installed: bool,
    pool: SessionPool<CodecSession>,
}

impl AnalyticsHandler {
    pub fn new(installed: bool, capacity: usize) -> Self {
        Self { installed, pool: SessionPool::new(StrategyType::Analytics, capacity) }
    }

    pub fn sessions(&self) -> usize {
        self.pool.len()
    }
}

impl Default for AnalyticsHandler {
    fn default() -> Self {
        Self::new(true, MAX_ANALYTICS_BINDINGS)
    }
}

impl Handler for AnalyticsHandler {
    fn strategy(&self) -> StrategyType {
        StrategyType::Analytics
    }

    fn request(&self, req: &mut JobRequest<'_>) -> Result<Progress, HandlerError> {
        admit(StrategyType::Analytics, self.installed, req.algorithm)?;

        let (id, algorithm, level) = (req.id, req.algorithm, req.level);
        match &mut req.work {
            Work::Compress { input, sink } => {
                let session = self.pool.acquire(id, || CodecSession::encoder(algorithm, level, sink))?;
                let mut guard = lock_session(&session);
                guard.write(input)
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
