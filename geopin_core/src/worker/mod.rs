//! Long running background tasks of the pipeline.
//!
//! Both workers are single instance and run until the runtime shuts down.

mod resolver;
mod snapshot_writer;

pub use resolver::{ResolverWorker, StepOutcome};
pub use snapshot_writer::SnapshotWriter;
