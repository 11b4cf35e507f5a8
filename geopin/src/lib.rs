//! # geopin
//!
//! HTTP and command line front end of the geocoding pipeline in [`geopin_core`].
//!
//! - [`config`]: YAML configuration of server, geocoding and streaming.
//! - [`directory`]: which location keys belong to which entity.
//! - [`server`]: axum server with the live marker stream.

pub mod config;
pub mod directory;
pub mod server;

pub use config::{Config, ServerConfig, StreamConfig};
pub use geopin_core as core;
