//! geopin configuration.
//!
//! - [`Config`]: top-level loader and YAML parser
//! - [`ServerConfig`]: address to listen on
//! - [`StreamConfig`]: pacing of the marker stream
//! - [`GeocodingConfig`](geopin_core::GeocodingConfig): resolver, lookup and snapshot settings
//!
//! Command line arguments override values from the file.

pub(crate) mod main;
mod server;
mod stream;

pub use main::Config;
pub use server::ServerConfig;
pub use stream::StreamConfig;
