//! strategy/types.rs
//! Backend kinds and their static algorithm support tables.
use std::fmt;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};

use crate::compression::{Algorithm, AlgorithmSet};

/// Stable strategy ids (u8).
pub mod strategy_ids {
    pub const OFFLOAD: u8   = 0x00;
    pub const ISA: u8       = 0x01;
    pub const ANALYTICS: u8 = 0x02;
    pub const SOFTWARE: u8  = 0x03;
}

pub const OFFLOAD_ALGORITHMS: AlgorithmSet = AlgorithmSet::DEFLATE.union(AlgorithmSet::GZIP).union(AlgorithmSet::ZSTD);
pub const ANALYTICS_ALGORITHMS: AlgorithmSet = AlgorithmSet::DEFLATE.union(AlgorithmSet::GZIP);
pub const ISA_ALGORITHMS: AlgorithmSet = AlgorithmSet::GZIP;
pub const SOFTWARE_ALGORITHMS: AlgorithmSet = AlgorithmSet::all();

/// Which engine serves a job.
///
/// Three hardware-accelerated kinds and the software default:
/// - `Offload`: accelerator card reached through a binding; widest coverage,
///   direct and session modes.
/// - `Analytics`: in-memory analytics accelerator; deflate family only.
/// - `Isa`: ISA-optimized gzip library.
/// - `Software`: portable codecs, always present.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyType {
    Offload   = strategy_ids::OFFLOAD,
    Isa       = strategy_ids::ISA,
    Analytics = strategy_ids::ANALYTICS,
    Software  = strategy_ids::SOFTWARE,
}

impl StrategyType {
    pub const ALL: [StrategyType; 4] = [
        StrategyType::Offload,
        StrategyType::Isa,
        StrategyType::Analytics,
        StrategyType::Software,
    ];

    /// Membership check over raw ids.
    pub fn is_valid(raw: u8) -> bool {
        StrategyType::try_from_primitive(raw).is_ok()
    }

    pub fn name(self) -> &'static str {
        match self {
            StrategyType::Offload => "offload",
            StrategyType::Isa => "isa",
            StrategyType::Analytics => "analytics",
            StrategyType::Software => "software",
        }
    }

    pub fn supported_algorithms(self) -> AlgorithmSet {
        match self {
            StrategyType::Offload => OFFLOAD_ALGORITHMS,
            StrategyType::Analytics => ANALYTICS_ALGORITHMS,
            StrategyType::Isa => ISA_ALGORITHMS,
            StrategyType::Software => SOFTWARE_ALGORITHMS,
        }
    }

    pub fn supports(self, algorithm: Algorithm) -> bool {
        self.supported_algorithms().supports(algorithm)
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn support_tables() {
        assert!(StrategyType::Offload.supports(Algorithm::Zstd));
        assert!(!StrategyType::Offload.supports(Algorithm::Lz4));
        assert!(StrategyType::Analytics.supports(Algorithm::Deflate));
        assert!(!StrategyType::Analytics.supports(Algorithm::Zstd));
        assert_eq!(StrategyType::Isa.supported_algorithms().algorithms().collect::<Vec<_>>(), vec![Algorithm::Gzip]);
        for a in Algorithm::ALL {
            assert!(StrategyType::Software.supports(a));
        }
    }

    #[test]
    fn raw_strategy_ids() {
        for s in StrategyType::ALL {
            assert!(StrategyType::is_valid(s as u8));
        }
        assert!(!StrategyType::is_valid(9));
    }
}
