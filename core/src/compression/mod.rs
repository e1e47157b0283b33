//! compression/mod.rs
//! Algorithm model and the codec engines the backends delegate to.
//!
//! Notes:
//! - Container formats are exactly those of flate2 / zstd / lz4_flex.
//! - The registry resolves an `Algorithm` to an encoder, decoder or session
//!   engine; handlers never name a codec crate directly.

pub mod constants;
pub mod types;
pub mod registry;
pub mod codecs;
pub mod session;

pub use constants::*;
pub use types::*;
pub use registry::*;
pub use session::{run_to_completion, SessionEngine, SessionStep};
