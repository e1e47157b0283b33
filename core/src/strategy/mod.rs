//! Execution backends and the handler capability they share.
pub mod types;
pub mod handler;
pub mod pool;
pub(crate) mod session;

pub mod analytics;
pub mod isa;
pub mod offload;
pub mod software;

pub use analytics::AnalyticsHandler;
pub use handler::{Handler, HandlerError, JobRequest, Progress, Work};
pub use isa::IsaHandler;
pub use offload::{OffloadHandler, OffloadMode};
pub use pool::SessionPool;
pub use software::SoftwareHandler;
pub use types::StrategyType;
