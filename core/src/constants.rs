//! constants.rs
//! Tunables shared by the policy, the handlers and the configuration layer.

/// Buffer size at which the default policy flips from the low-setup-cost
/// order to the high-throughput order (64 KiB).
pub const DEFAULT_SIZE_THRESHOLD: usize = 64 * 1024;

/// Binding pool caps per hardware backend.
pub const MAX_OFFLOAD_BINDINGS: usize = 8;
pub const MAX_ANALYTICS_BINDINGS: usize = 8;
pub const MAX_ISA_BINDINGS: usize = 16;

/// Initial output buffer for offload session mode (10 KiB). Doubles on demand.
pub const DEFAULT_OUT_BUFFER_SIZE: usize = 10 * 1024;

/// Level a fresh stream writer starts with.
pub const DEFAULT_WRITER_LEVEL: i32 = 1;
