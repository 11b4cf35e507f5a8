//! Value types shared by the cache, the resolver and the HTTP surface.

pub mod location_key;
mod marker;

pub use marker::Marker;
