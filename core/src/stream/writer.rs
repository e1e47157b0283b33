//! stream/writer.rs
//! `io::Write` over the dispatch manager.
//!
//! Each `write` call is one compress job and emits one complete container
//! into the sink. Callers that want a single container must hand the whole
//! payload to one `write`.
use std::io::{self, Write};
use std::sync::Arc;

use crate::compression::{Algorithm, DEFAULT_ALGORITHM};
use crate::constants::DEFAULT_WRITER_LEVEL;
use crate::dispatch::{Buffer, Endpoint, JobParams, Manager, Submission};
use crate::scheduler::PolicyFn;
use crate::stream::io::SinkHandle;
use crate::stream::options::{Configurable, StreamOption};
use crate::types::{DispatchError, Result};

pub struct Writer {
    manager: Arc<Manager>,
    params: JobParams,
    sink: SinkHandle,
    policy: Option<PolicyFn>,
    closed: bool,
    last: Option<Submission>,
}

impl Writer {
    pub fn new<W: Write + Send + 'static>(manager: Arc<Manager>, sink: W) -> Self {
        Self::with_handle(manager, SinkHandle::new(sink))
    }

    pub fn with_handle(manager: Arc<Manager>, sink: SinkHandle) -> Self {
        let params = JobParams::compress(DEFAULT_ALGORITHM, sink.clone()).with_level(DEFAULT_WRITER_LEVEL);
        Self { manager, params, sink, policy: None, closed: false, last: None }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.params.algorithm
    }

    pub fn level(&self) -> i32 {
        self.params.level
    }

    /// Per-stream policy; overrides the manager's.
    pub fn set_policy(&mut self, policy: PolicyFn) {
        self.policy = Some(policy);
    }

    /// Outcome of the most recent write.
    pub fn last_submission(&self) -> Option<Submission> {
        self.last
    }

    fn submit(&mut self, data: &[u8]) -> Result<usize> {
        if self.closed {
            return Err(DispatchError::Closed);
        }
        let submission = match &self.policy {
            Some(policy) => self.manager.submit_with_policy(Buffer::Input(data), &self.params, policy.as_ref())?,
            None => self.manager.submit(Buffer::Input(data), &self.params)?,
        };
        self.last = Some(submission);
        Ok(submission.bytes)
    }

    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(DispatchError::Closed);
        }
        self.closed = true;
        Ok(())
    }

    /// Point the writer at a new sink and reopen it. Algorithm and level are
    /// kept.
    pub fn reset<W: Write + Send + 'static>(&mut self, sink: W) {
        self.sink = SinkHandle::new(sink);
        self.params.endpoint = Endpoint::Sink(self.sink.clone());
        self.params.id = None;
        self.closed = false;
        self.last = None;
    }
}

impl Configurable for Writer {
    fn apply_one(&mut self, option: StreamOption) -> Result<()> {
        match option {
            StreamOption::Algorithm(a) => self.params.algorithm = a,
            StreamOption::Level(level) if level <= 0 => {
                return Err(DispatchError::InvalidLevel { algorithm: self.params.algorithm, level });
            }
            StreamOption::Level(level) => self.params.level = level,
        }
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.submit(buf)?)
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.closed {
            return Err(DispatchError::Closed.into());
        }
        self.sink.flush()
    }
}
