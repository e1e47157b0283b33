//! dispatch-core
//!
//! Routes compress/decompress operations across several codec backends.
//! A policy orders the candidates, the manager binds each job to the first
//! backend that accepts it and keeps decompress jobs alive across calls.
//! No FFI, no async runtime; all work runs on the caller's thread.

#![forbid(unsafe_code)]

// Shared and top level
pub mod config;
pub mod constants;
pub mod types;

pub mod compression;
pub mod strategy;
pub mod scheduler;
pub mod dispatch;
pub mod telemetry;

// Byte-stream facade
pub mod stream;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::Algorithm;
    pub use crate::config::{BackendConfig, ManagerConfig};
    pub use crate::dispatch::{Buffer, JobParams, Manager, Submission};
    pub use crate::scheduler::{default_policy, fixed_order, policy_fn, PolicyFn, PolicyParameters};
    pub use crate::stream::{Configurable, Reader, SharedBuffer, StreamOption, Writer};
    pub use crate::strategy::{OffloadMode, StrategyType};
    pub use crate::types::{DispatchError, JobId};
}
