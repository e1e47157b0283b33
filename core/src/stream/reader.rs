//! stream/reader.rs
//! `io::Read` over the dispatch manager.
//!
//! The first read starts a decompress job; later reads continue it under the
//! id the manager handed back until end-of-stream, after which `read`
//! returns `Ok(0)`. A reader dropped or closed mid-stream releases its job.
//!
//! Jobs are submitted into a staging buffer owned by the reader, at least
//! `DEFAULT_SIZE_THRESHOLD` bytes and grown to the largest caller request.
//! Decoded bytes are handed out from it across `read` calls, so the caller's
//! buffer size never decides which backend can serve the stream. The software
//! backend still decodes one whole frame per call: a frame that decodes to
//! more than the staging buffer fails with `FrameExceedsBuffer`.
use std::io::{self, Read};
use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tracing::debug;

use crate::compression::{Algorithm, DEFAULT_ALGORITHM};
use crate::constants::DEFAULT_SIZE_THRESHOLD;
use crate::dispatch::{Buffer, Endpoint, JobParams, Manager, Submission};
use crate::scheduler::PolicyFn;
use crate::stream::io::SourceHandle;
use crate::stream::options::{Configurable, StreamOption};
use crate::types::{DispatchError, Result};

pub struct Reader {
    manager: Arc<Manager>,
    params: JobParams,
    policy: Option<PolicyFn>,
    closed: bool,
    finished: bool,
    last: Option<Submission>,
    /// Decoded bytes not yet handed to the caller.
    staging: BytesMut,
}

impl Reader {
    pub fn new<R: Read + Send + 'static>(manager: Arc<Manager>, source: R) -> Self {
        Self::with_handle(manager, SourceHandle::new(source))
    }

    pub fn with_handle(manager: Arc<Manager>, source: SourceHandle) -> Self {
        let params = JobParams::decompress(DEFAULT_ALGORITHM, source);
        Self {
            manager,
            params,
            policy: None,
            closed: false,
            finished: false,
            last: None,
            staging: BytesMut::new(),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.params.algorithm
    }

    pub fn set_policy(&mut self, policy: PolicyFn) {
        self.policy = Some(policy);
    }

    pub fn last_submission(&self) -> Option<Submission> {
        self.last
    }

    /// Bytes decoded but not yet handed to the caller.
    pub fn buffered(&self) -> usize {
        self.staging.len()
    }

    fn submit(&mut self, wanted: usize) -> Result<()> {
        let mut scratch = std::mem::take(&mut self.staging);
        scratch.clear();
        scratch.resize(wanted.max(DEFAULT_SIZE_THRESHOLD), 0);

        let outcome = match &self.policy {
            Some(policy) => self.manager.submit_with_policy(Buffer::Output(&mut scratch[..]), &self.params, policy.as_ref()),
            None => self.manager.submit(Buffer::Output(&mut scratch[..]), &self.params),
        };
        let submission = match outcome {
            Ok(s) => s,
            Err(e) => {
                // the manager already dropped the job
                self.params.id = None;
                return Err(e);
            }
        };

        self.last = Some(submission);
        scratch.truncate(submission.bytes);
        self.staging = scratch;
        if submission.end_of_stream {
            self.params.id = None;
            self.finished = true;
        } else {
            self.params.id = Some(submission.id);
        }
        Ok(())
    }

    fn read_staged(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.closed {
            return Err(DispatchError::Closed);
        }
        if buf.is_empty() {
            return Ok(0);
        }
        while self.buffered() == 0 {
            if self.finished {
                return Ok(0);
            }
            self.submit(buf.len())?;
        }

        let n = buf.len().min(self.buffered());
        buf[..n].copy_from_slice(&self.staging[..n]);
        self.staging.advance(n);
        Ok(n)
    }

    fn abandon(&mut self) {
        self.staging.clear();
        if let Some(id) = self.params.id.take() {
            match self.manager.release(id) {
                Ok(()) | Err(DispatchError::JobNotFound(_)) => {}
                Err(e) => debug!(job = %id, error = %e, "reader release failed"),
            }
        }
    }

    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(DispatchError::Closed);
        }
        self.abandon();
        self.closed = true;
        Ok(())
    }

    /// Point the reader at a new source and reopen it.
    pub fn reset<R: Read + Send + 'static>(&mut self, source: R) {
        self.abandon();
        self.params.endpoint = Endpoint::Source(SourceHandle::new(source));
        self.closed = false;
        self.finished = false;
        self.last = None;
    }
}

impl Configurable for Reader {
    fn apply_one(&mut self, option: StreamOption) -> Result<()> {
        match option {
            StreamOption::Algorithm(a) => {
                self.params.algorithm = a;
                Ok(())
            }
            StreamOption::Level(_) => Err(DispatchError::InvalidOption { option: option.name(), target: "reader" }),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Read for Reader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_staged(buf)?)
    }
}

impl Drop for Reader {
    fn drop(&mut self) {
        self.abandon();
    }
}
