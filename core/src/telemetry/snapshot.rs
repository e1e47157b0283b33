//! telemetry/snapshot.rs
//! Derived, read-only view of a counter set.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::strategy::StrategyType;
use crate::telemetry::counters::DispatchCounters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchSnapshot {
    pub counters: DispatchCounters,
    /// Share of candidate attempts that were skipped; 0.0 before any attempt.
    pub skip_rate: f64,
    /// Strategies that served at least one call.
    pub served: BTreeMap<StrategyType, u64>,
}

impl From<&DispatchCounters> for DispatchSnapshot {
    fn from(counters: &DispatchCounters) -> Self {
        let attempts = counters.skipped_candidates + counters.total_served();
        let skip_rate = if attempts > 0 {
            counters.skipped_candidates as f64 / attempts as f64
        } else {
            0.0
        };
        let served = StrategyType::ALL
            .into_iter()
            .map(|s| (s, counters.served_by(s)))
            .filter(|(_, n)| *n > 0)
            .collect();
        Self { counters: counters.clone(), skip_rate, served }
    }
}

impl DispatchSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    #[test]
    fn skip_rate_and_served_map() {
        let mut c = DispatchCounters::default();
        c.record_served(StrategyType::Analytics, Direction::Compress, 200);
        c.skipped_candidates = 3;
        let snap = DispatchSnapshot::from(&c);
        assert!((snap.skip_rate - 0.75).abs() < f64::EPSILON);
        assert_eq!(snap.served.get(&StrategyType::Analytics), Some(&1));
        assert!(!snap.served.contains_key(&StrategyType::Offload));
        assert!(snap.to_json().expect("json").contains("\"analytics\":1"));
    }

    #[test]
    fn empty_counters_have_zero_skip_rate() {
        assert_eq!(DispatchSnapshot::from(&DispatchCounters::default()).skip_rate, 0.0);
    }
}
