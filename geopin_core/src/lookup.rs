//! Blocking-with-timeout lookup on top of the cache and the pending queue.

use crate::{
	cache::{MarkerCache, PendingQueue},
	config::GeocodingConfig,
	types::Marker,
};
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tokio::time::sleep;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
	#[error("can't fetch marker for '{location}', retry timeout reached after {attempts} attempts")]
	Timeout { location: String, attempts: u32 },
}

/// Cheap to clone handle used by request handlers.
#[derive(Debug, Clone)]
pub struct Lookup {
	cache: Arc<MarkerCache>,
	queue: Arc<PendingQueue>,
	poll_interval: Duration,
	retry_budget: u32,
}

impl Lookup {
	pub fn new(cache: Arc<MarkerCache>, queue: Arc<PendingQueue>, config: &GeocodingConfig) -> Self {
		Self {
			cache,
			queue,
			poll_interval: config.poll_interval(),
			retry_budget: config.retry_budget,
		}
	}

	/// Cached marker with a freshly derived display label.
	pub fn cached(&self, location: &str) -> Option<Marker> {
		self.cache.get(location).map(|marker| marker.labelled(location))
	}

	/// Returns the marker for a location key, waiting for the resolver if needed.
	///
	/// A miss enqueues the key once and then re-checks the cache every poll
	/// interval until the retry budget is spent.
	pub async fn resolve(&self, location: &str) -> Result<Marker, ResolveError> {
		if let Some(marker) = self.cached(location) {
			log::debug!("cache hit for '{location}'");
			return Ok(marker);
		}

		if !self.queue.add(location) {
			log::debug!("'{location}' is already waiting for the resolver");
		}

		for attempt in 1..=self.retry_budget {
			sleep(self.poll_interval).await;

			if let Some(marker) = self.cached(location) {
				log::debug!("'{location}' resolved after {attempt} polls");
				return Ok(marker);
			}
			log::trace!("'{location}' still unresolved after {attempt} polls");
		}

		log::warn!("giving up on '{location}' after {} polls", self.retry_budget);
		Err(ResolveError::Timeout {
			location: location.to_owned(),
			attempts: self.retry_budget,
		})
	}
}
