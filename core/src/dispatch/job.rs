//! dispatch/job.rs
//! Job records and the parameters a caller submits with.
use crate::compression::Algorithm;
use crate::stream::{SinkHandle, SourceHandle};
use crate::strategy::StrategyType;
use crate::types::{Direction, JobId};

/// Where a job's bytes go (compress) or come from (decompress).
#[derive(Clone, Debug)]
pub enum Endpoint {
    Sink(SinkHandle),
    Source(SourceHandle),
}

impl Endpoint {
    pub fn direction(&self) -> Direction {
        match self {
            Endpoint::Sink(_) => Direction::Compress,
            Endpoint::Source(_) => Direction::Decompress,
        }
    }
}

/// Caller-side snapshot of one operation.
///
/// `id` is `None` for a fresh operation. A decompress caller echoes the id it
/// got back to continue the same stream.
#[derive(Clone, Debug)]
pub struct JobParams {
    pub algorithm: Algorithm,
    pub level: i32,
    pub id: Option<JobId>,
    pub endpoint: Endpoint,
}

impl JobParams {
    pub fn compress(algorithm: Algorithm, sink: SinkHandle) -> Self {
        Self { algorithm, level: algorithm.default_level(), id: None, endpoint: Endpoint::Sink(sink) }
    }

    pub fn decompress(algorithm: Algorithm, source: SourceHandle) -> Self {
        Self { algorithm, level: algorithm.default_level(), id: None, endpoint: Endpoint::Source(source) }
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn with_id(mut self, id: JobId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn direction(&self) -> Direction {
        self.endpoint.direction()
    }
}

/// The bytes of one call.
pub enum Buffer<'a> {
    /// Data to compress.
    Input(&'a [u8]),
    /// Space to decompress into.
    Output(&'a mut [u8]),
}

impl Buffer<'_> {
    pub fn len(&self) -> usize {
        match self {
            Buffer::Input(b) => b.len(),
            Buffer::Output(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn direction(&self) -> Direction {
        match self {
            Buffer::Input(_) => Direction::Compress,
            Buffer::Output(_) => Direction::Decompress,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Buffer::Input(_) => "input",
            Buffer::Output(_) => "output",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum JobState {
    Unbound,
    Bound(StrategyType),
}

/// Registry record of one operation.
#[derive(Debug)]
pub struct Job {
    pub id: JobId,
    pub params: JobParams,
    pub state: JobState,
    /// Successful handler calls so far.
    pub calls: u64,
    pub last_buffer_len: usize,
}

impl Job {
    pub fn new(id: JobId, params: &JobParams) -> Self {
        Self { id, params: params.clone(), state: JobState::Unbound, calls: 0, last_buffer_len: 0 }
    }

    pub fn bind(&mut self, strategy: StrategyType) {
        self.state = JobState::Bound(strategy);
    }

    pub fn strategy(&self) -> Option<StrategyType> {
        match self.state {
            JobState::Bound(s) => Some(s),
            JobState::Unbound => None,
        }
    }

    pub fn direction(&self) -> Direction {
        self.params.direction()
    }
}

/// What happens to a job after a successful call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    /// Released and deregistered in the same call.
    Finished,
    /// Kept registered for the next continuation.
    Retained,
}

impl Completion {
    /// Compress jobs are one-shot; decompress jobs live until end-of-stream.
    pub fn after(direction: Direction, end_of_stream: bool) -> Self {
        match direction {
            Direction::Compress => Completion::Finished,
            Direction::Decompress if end_of_stream => Completion::Finished,
            Direction::Decompress => Completion::Retained,
        }
    }
}

/// Outcome of one submit call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Submission {
    pub bytes: usize,
    pub id: JobId,
    pub end_of_stream: bool,
    pub strategy: StrategyType,
}
