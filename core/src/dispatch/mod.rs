//! Job identity, job records and the manager that drives them.
pub mod ids;
pub mod job;
pub mod manager;

pub use ids::JobIdAllocator;
pub use job::{Buffer, Completion, Endpoint, Job, JobParams, JobState, Submission};
pub use manager::Manager;
