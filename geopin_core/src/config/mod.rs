//! Runtime settings of the geocoding pipeline.

mod geocoding;

pub use geocoding::GeocodingConfig;
