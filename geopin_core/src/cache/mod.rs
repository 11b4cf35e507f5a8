//! Shared in-memory state of the geocoding pipeline.

mod marker_cache;
mod pending_queue;

pub use marker_cache::MarkerCache;
pub use pending_queue::PendingQueue;
