use crate::{
	cache::{MarkerCache, PendingQueue},
	config::GeocodingConfig,
	geocoder::{Geocoder, disambiguate, query::build_query},
	types::Marker,
};
use std::{collections::BTreeMap, sync::Arc, time::Duration};
use tokio::time::{Instant, sleep};

/// Result of a single resolver iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
	/// The queue was empty.
	Idle,
	/// The key was resolved while it waited in the queue.
	AlreadyCached,
	/// The key has no city/country separator; no request was made.
	Invalid,
	/// The request failed; the key is dropped until someone asks again.
	Failed,
	/// The service answered without a usable candidate.
	Unresolved,
	/// A marker was written to the cache.
	Resolved,
}

/// Drains the pending queue one key at a time, at most one request per rate-limit interval.
///
/// Must be the only writer of new cache entries and the only client of the
/// external service, otherwise the rate limit does not hold.
pub struct ResolverWorker {
	cache: Arc<MarkerCache>,
	queue: Arc<PendingQueue>,
	geocoder: Arc<dyn Geocoder>,
	manual_fixes: BTreeMap<String, String>,
	idle_interval: Duration,
	rate_limit_interval: Duration,
}

impl ResolverWorker {
	pub fn new(
		cache: Arc<MarkerCache>,
		queue: Arc<PendingQueue>,
		geocoder: Arc<dyn Geocoder>,
		config: &GeocodingConfig,
	) -> Self {
		Self {
			cache,
			queue,
			geocoder,
			manual_fixes: config.manual_fixes.clone(),
			idle_interval: config.idle_interval(),
			rate_limit_interval: config.rate_limit_interval(),
		}
	}

	pub async fn run(self) {
		log::info!("geocoding resolver started");
		loop {
			self.step().await;
		}
	}

	pub async fn step(&self) -> StepOutcome {
		let Some(key) = self.queue.pop() else {
			sleep(self.idle_interval).await;
			return StepOutcome::Idle;
		};

		if self.cache.contains(&key) {
			log::debug!("'{key}' is already cached, skipping");
			return StepOutcome::AlreadyCached;
		}

		let Some(query) = build_query(&key, &self.manual_fixes) else {
			log::warn!("location key '{key}' has no city-country separator, skipping");
			return StepOutcome::Invalid;
		};

		let outcome = self.resolve(&key, &query).await;

		// one request per interval, whatever the outcome
		sleep(self.rate_limit_interval).await;
		outcome
	}

	async fn resolve(&self, key: &str, query: &str) -> StepOutcome {
		log::info!("downloading marker for '{key}' (query '{query}')");
		let start = Instant::now();

		let candidates = match self.geocoder.search(query).await {
			Ok(candidates) => candidates,
			Err(err) => {
				log::warn!("geocoding '{key}' failed after {:?}: {err:#}", start.elapsed());
				return StepOutcome::Failed;
			}
		};
		log::debug!(
			"geocoding '{key}' returned {} candidates in {:?}",
			candidates.len(),
			start.elapsed()
		);

		match disambiguate::pick(candidates) {
			Some(marker) if marker.has_coordinates() => {
				log::info!("resolved '{key}' to {}, {}", marker.lat, marker.lon);
				self.cache.set(key, Marker {
					location: String::new(),
					..marker
				});
				StepOutcome::Resolved
			}
			_ => {
				log::info!("no usable geocoding candidate for '{key}'");
				StepOutcome::Unresolved
			}
		}
	}
}
