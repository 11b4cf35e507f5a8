//! # geopin core
//!
//! Resolves location keys such as `"osaka-japan"` into map markers.
//!
//! The pipeline consists of:
//! - a concurrent [`MarkerCache`] and a [`PendingQueue`] of keys awaiting resolution,
//! - a single rate-limited [`ResolverWorker`](worker::ResolverWorker) calling the external [`Geocoder`],
//! - a [`SnapshotWriter`](worker::SnapshotWriter) that persists the cache, and the [`snapshot`] loader,
//! - the [`Lookup`] API that waits for the resolver with a retry budget,
//! - [`stream_markers`] which streams the markers of many locations as they arrive.
//!
//! [`GeocodingService`] wires all of it together.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use geopin_core::{GeocodingConfig, GeocodingService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut service = GeocodingService::from_config(GeocodingConfig::default())?;
//!     service.bootstrap()?;
//!     service.start();
//!
//!     let marker = service.lookup().resolve("osaka-japan").await?;
//!     println!("{}: {}, {}", marker.location, marker.lat, marker.lon);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod geocoder;
pub mod lookup;
pub mod service;
pub mod snapshot;
pub mod stream;
pub mod types;
pub mod worker;

pub use cache::{MarkerCache, PendingQueue};
pub use config::GeocodingConfig;
pub use geocoder::{Geocoder, Nominatim};
pub use lookup::{Lookup, ResolveError};
pub use service::GeocodingService;
pub use stream::{MarkerEvent, stream_markers};
pub use types::Marker;
