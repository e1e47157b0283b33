//! scheduler/policy.rs
//! Strategy ordering policies.
//!
//! A policy maps the parameters of one submission to an ordered list of
//! strategies to try. The manager walks the list front to back.
use std::sync::Arc;

use crate::constants::DEFAULT_SIZE_THRESHOLD;
use crate::dispatch::JobParams;
use crate::strategy::StrategyType;

/// What a policy gets to look at. Read-only.
pub struct PolicyParameters<'a> {
    pub buffer_size: usize,
    /// Strategies currently available to the manager.
    pub strategies: &'a [StrategyType],
    pub params: &'a JobParams,
}

pub type PolicyFn = Arc<dyn Fn(&PolicyParameters<'_>) -> Vec<StrategyType> + Send + Sync>;

/// Wrap a closure as a shareable policy.
pub fn policy_fn<F>(f: F) -> PolicyFn
where
    F: Fn(&PolicyParameters<'_>) -> Vec<StrategyType> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Size-threshold ordering.
///
/// Below the threshold the order is `Offload, Analytics, Isa`. At or above it
/// the hardware order is reversed. Software is always last.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BufferSizePolicy {
    pub threshold: usize,
}

impl Default for BufferSizePolicy {
    fn default() -> Self {
        Self { threshold: DEFAULT_SIZE_THRESHOLD }
    }
}

impl BufferSizePolicy {
    pub fn new(threshold: usize) -> Self {
        Self { threshold }
    }

    pub fn order(&self, p: &PolicyParameters<'_>) -> Vec<StrategyType> {
        let preferred: [StrategyType; 4] = if p.buffer_size < self.threshold {
            [StrategyType::Offload, StrategyType::Analytics, StrategyType::Isa, StrategyType::Software]
        } else {
            [StrategyType::Isa, StrategyType::Analytics, StrategyType::Offload, StrategyType::Software]
        };
        preferred.into_iter().filter(|s| p.strategies.contains(s)).collect()
    }

    pub fn into_policy(self) -> PolicyFn {
        policy_fn(move |p| self.order(p))
    }
}

pub fn buffer_size_policy(threshold: usize) -> PolicyFn {
    BufferSizePolicy::new(threshold).into_policy()
}

pub fn default_policy() -> PolicyFn {
    BufferSizePolicy::default().into_policy()
}

/// Always returns `order` as given, regardless of availability. Used to pin a
/// job to a backend.
pub fn fixed_order(order: Vec<StrategyType>) -> PolicyFn {
    policy_fn(move |_| order.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::Algorithm;
    use crate::stream::SharedBuffer;

    fn params() -> JobParams {
        JobParams::compress(Algorithm::Gzip, SharedBuffer::new().sink())
    }

    #[test]
    fn threshold_flips_hardware_order() {
        let jp = params();
        let policy = BufferSizePolicy::new(100);
        let small = PolicyParameters { buffer_size: 99, strategies: &StrategyType::ALL, params: &jp };
        let large = PolicyParameters { buffer_size: 100, strategies: &StrategyType::ALL, params: &jp };

        use StrategyType::*;
        assert_eq!(policy.order(&small), vec![Offload, Analytics, Isa, Software]);
        assert_eq!(policy.order(&large), vec![Isa, Analytics, Offload, Software]);
    }

    #[test]
    fn unavailable_strategies_are_filtered() {
        let jp = params();
        let available = [StrategyType::Software, StrategyType::Analytics];
        let p = PolicyParameters { buffer_size: 1, strategies: &available, params: &jp };
        assert_eq!(default_policy()(&p), vec![StrategyType::Analytics, StrategyType::Software]);
    }

    #[test]
    fn fixed_order_ignores_availability() {
        let jp = params();
        let p = PolicyParameters { buffer_size: 1, strategies: &[], params: &jp };
        assert_eq!(fixed_order(vec![StrategyType::Isa])(&p), vec![StrategyType::Isa]);
    }
}
