//! HTTP server for lookups and live marker streams.

mod geo_server;
mod handlers;
mod routes;

pub use geo_server::GeoServer;
pub use handlers::AppState;
