//! stream/options.rs
//! Options a caller applies to a stream before use.
use crate::compression::Algorithm;
use crate::types::{DispatchError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StreamOption {
    Algorithm(Algorithm),
    /// Compression level; writers only. Must be positive, the range for the
    /// chosen algorithm is checked on submit.
    Level(i32),
}

impl StreamOption {
    pub fn name(&self) -> &'static str {
        match self {
            StreamOption::Algorithm(_) => "algorithm",
            StreamOption::Level(_) => "level",
        }
    }
}

/// Something options can be applied to.
pub trait Configurable {
    /// Apply a single option.
    fn apply_one(&mut self, option: StreamOption) -> Result<()>;

    fn is_closed(&self) -> bool;

    /// Apply options in order, stopping at the first failure.
    fn apply(&mut self, options: &[StreamOption]) -> Result<()> {
        if self.is_closed() {
            return Err(DispatchError::Closed);
        }
        options.iter().try_for_each(|o| self.apply_one(*o))
    }
}
