pub mod policy;

pub use policy::{buffer_size_policy, default_policy, fixed_order, policy_fn, BufferSizePolicy, PolicyFn, PolicyParameters};
