//! dispatch/ids.rs
//! Job id allocation.
//!
//! Ids are strictly monotonic and never reused, so a released id can never
//! alias a job still held by the registry or by a handler's pool.
use std::sync::atomic::{AtomicU64, Ordering};

use crate::types::JobId;

#[derive(Debug)]
pub struct JobIdAllocator {
    next: AtomicU64,
}

impl JobIdAllocator {
    pub fn new() -> Self {
        Self { next: AtomicU64::new(1) }
    }

    pub fn allocate(&self) -> JobId {
        JobId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed) - 1
    }
}

impl Default for JobIdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
