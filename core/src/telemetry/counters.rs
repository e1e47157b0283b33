//! telemetry/counters.rs
//! Dispatch counters.
//!
//! The manager keeps one set behind a mutex and hands out clones, so callers
//! can diff, merge or encode snapshots without touching live state.
use std::ops::AddAssign;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::strategy::StrategyType;
use crate::types::Direction;

#[derive(Default, Clone, Debug, PartialEq, Eq, Encode, Decode, Serialize, Deserialize)]
pub struct DispatchCounters {
    pub jobs_created: u64,
    pub jobs_completed: u64,
    pub continuations: u64,
    /// Candidates passed over because they were not installed, full, or
    /// did not support the algorithm.
    pub skipped_candidates: u64,
    pub disabled_strategies: u64,
    pub failed_submissions: u64,
    /// Jobs torn down through `Manager::release` before finishing.
    pub jobs_abandoned: u64,
    /// Input consumed by compress calls.
    pub bytes_compressed: u64,
    /// Output produced by decompress calls.
    pub bytes_decompressed: u64,
    /// Successful submissions per strategy, indexed by strategy id.
    pub served: [u64; 4],
}

impl DispatchCounters {
    pub fn record_served(&mut self, strategy: StrategyType, direction: Direction, bytes: usize) {
        self.served[strategy as usize] += 1;
        match direction {
            Direction::Compress => self.bytes_compressed += bytes as u64,
            Direction::Decompress => self.bytes_decompressed += bytes as u64,
        }
    }

    pub fn served_by(&self, strategy: StrategyType) -> u64 {
        self.served[strategy as usize]
    }

    pub fn total_served(&self) -> u64 {
        self.served.iter().sum()
    }

    pub fn merge(&mut self, other: &DispatchCounters) {
        self.jobs_created += other.jobs_created;
        self.jobs_completed += other.jobs_completed;
        self.continuations += other.continuations;
        self.skipped_candidates += other.skipped_candidates;
        self.disabled_strategies += other.disabled_strategies;
        self.failed_submissions += other.failed_submissions;
        self.jobs_abandoned += other.jobs_abandoned;
        self.bytes_compressed += other.bytes_compressed;
        self.bytes_decompressed += other.bytes_decompressed;
        for (mine, theirs) in self.served.iter_mut().zip(other.served) {
            *mine += theirs;
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::error::EncodeError> {
        bincode::encode_to_vec(self, bincode::config::standard())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::error::DecodeError> {
        bincode::decode_from_slice(bytes, bincode::config::standard()).map(|(c, _)| c)
    }
}

impl AddAssign for DispatchCounters {
    fn add_assign(&mut self, rhs: Self) {
        self.merge(&rhs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_adds_every_field() {
        let mut a = DispatchCounters::default();
        a.jobs_created = 2;
        a.record_served(StrategyType::Isa, Direction::Compress, 10);

        let mut b = DispatchCounters::default();
        b.jobs_created = 1;
        b.record_served(StrategyType::Isa, Direction::Compress, 5);
        b.record_served(StrategyType::Software, Direction::Decompress, 3);

        a += b;
        assert_eq!(a.jobs_created, 3);
        assert_eq!(a.served_by(StrategyType::Isa), 2);
        assert_eq!(a.total_served(), 3);
        assert_eq!(a.bytes_compressed, 15);
        assert_eq!(a.bytes_decompressed, 3);
    }

    #[test]
    fn bincode_snapshot_decodes() {
        let mut c = DispatchCounters::default();
        c.continuations = 4;
        c.record_served(StrategyType::Offload, Direction::Compress, 1 << 20);
        let bytes = c.to_bytes().expect("encode");
        assert_eq!(DispatchCounters::from_bytes(&bytes).expect("decode"), c);
    }
}
