//! Access to the external geocoding service.
//!
//! - [`Geocoder`] is the seam the resolver talks to; tests plug in fakes here.
//! - [`Nominatim`] is the HTTP implementation.
//! - [`query`] turns a location key into the service's search string.
//! - [`disambiguate`] picks one marker out of the returned candidates.

pub mod disambiguate;
mod nominatim;
pub mod query;

use crate::types::Marker;
use anyhow::Result;
use async_trait::async_trait;
pub use nominatim::Nominatim;

/// A forward geocoding provider.
#[async_trait]
pub trait Geocoder: Send + Sync + 'static {
	/// Returns the candidate markers for a search query, in the service's order.
	async fn search(&self, query: &str) -> Result<Vec<Marker>>;
}
