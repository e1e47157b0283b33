//! strategy/offload.rs
//! Offload accelerator backend (deflate, gzip, zstd).
//!
//! Two ways of driving the engine:
//! - `Direct`: a stream encoder bound to the job's sink. The chunk is written
//!   in `request`; the container is finalized when the job is released.
//! - `Session`: a low-level binding compresses into its own output buffer.
//!   The buffer doubles whenever the engine reports it too small, and the
//!   engine is re-invoked until the whole chunk is consumed. The finished
//!   frame is then copied to the sink.
//!
//! Decompression always keeps a streaming decoder per job.
use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::compression::{create_session, run_to_completion, Algorithm, CompressionError, DecoderFraming};
use crate::constants::{DEFAULT_OUT_BUFFER_SIZE, MAX_OFFLOAD_BINDINGS};
use crate::strategy::handler::admit;
use crate::strategy::pool::{lock_session, SessionPool};
use crate::strategy::session::{resume_decode, CodecSession};
use crate::strategy::{Handler, HandlerError, JobRequest, Progress, StrategyType, Work};
use crate::stream::SinkHandle;
use crate::types::JobId;

#[derive(Copy, Clone)]
struct Job {
    id: JobId,
    algorithm: Algorithm,
    level: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OffloadMode {
    #[default]
    Direct,
    Session,
}

pub struct OffloadHandler {
    installed: bool,
    mode: OffloadMode,
    out_buffer_size: usize,
    pool: SessionPool<CodecSession>,
}

impl OffloadHandler {
    pub fn new(installed: bool, capacity: usize, mode: OffloadMode, out_buffer_size: usize) -> Self {
        Self {
            installed,
            mode,
            out_buffer_size: out_buffer_size.max(1),
            pool: SessionPool::new(StrategyType::Offload, capacity),
        }
    }

    pub fn mode(&self) -> OffloadMode {
        self.mode
    }

    pub fn bindings(&self) -> usize {
        self.pool.len()
    }

    fn compress_direct(&self, job: Job, input: &[u8], sink: &SinkHandle) -> Result<Progress, HandlerError> {
        let session = self.pool.acquire(job.id, || CodecSession::encoder(job.algorithm, job.level, sink))?;
        let mut guard = lock_session(&session);
        guard.write(input)
    }

    fn compress_session(&self, job: Job, input: &[u8], sink: &SinkHandle) -> Result<Progress, HandlerError> {
        let size = self.out_buffer_size;
        let session = self.pool.acquire(job.id, || Ok(CodecSession::Binding { out: vec![0u8; size] }))?;
        let mut engine = create_session(job.algorithm, job.level)?;

        let mut guard = lock_session(&session);
        let CodecSession::Binding { out } = &mut *guard else {
            return Err(CompressionError::StateError("offload binding expected".into()).into());
        };
        let before = out.len();
        let produced = run_to_completion(engine.as_mut(), input, out)?;
        if out.len() != before {
            trace!(job = %job.id, from = before, to = out.len(), "offload output buffer grown");
        }

        let mut sink = sink.clone();
        sink.write_all(&out[..produced]).map_err(CompressionError::process(job.algorithm))?;
        Ok(Progress { bytes: input.len(), end_of_stream: false })
    }
}

impl Default for OffloadHandler {
    fn default() -> Self {
        Self::new(true, MAX_OFFLOAD_BINDINGS, OffloadMode::Direct, DEFAULT_OUT_BUFFER_SIZE)
    }
}

impl Handler for OffloadHandler {
    fn strategy(&self) -> StrategyType {
        StrategyType::Offload
    }

    fn request(&self, req: &mut JobRequest<'_>) -> Result<Progress, HandlerError> {
        admit(StrategyType::Offload, self.installed, req.algorithm)?;

        let job = Job { id: req.id, algorithm: req.algorithm, level: req.level };
        match &mut req.work {
            Work::Compress { input, sink } => match self.mode {
                OffloadMode::Direct => self.compress_direct(job, input, sink),
                OffloadMode::Session => self.compress_session(job, input, sink),
            },
            Work::Decompress { output, source } => {
                let session = self
                    .pool
                    .acquire(job.id, || CodecSession::decoder(job.algorithm, source, DecoderFraming::Concatenated))?;
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
