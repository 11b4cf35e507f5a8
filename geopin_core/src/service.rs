//! Owner of the geocoding pipeline.
//!
//! [`GeocodingService`] creates the cache and the pending queue, loads the
//! snapshot into the cache, spawns the resolver and the snapshot writer, and
//! hands out [`Lookup`] handles to everything that needs coordinates.

use crate::{
	cache::{MarkerCache, PendingQueue},
	config::GeocodingConfig,
	geocoder::{Geocoder, Nominatim},
	lookup::Lookup,
	snapshot::{load_snapshot, write_snapshot},
	worker::{ResolverWorker, SnapshotWriter},
};
use anyhow::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;

pub struct GeocodingService {
	config: GeocodingConfig,
	cache: Arc<MarkerCache>,
	queue: Arc<PendingQueue>,
	geocoder: Arc<dyn Geocoder>,
	workers: Vec<JoinHandle<()>>,
}

impl GeocodingService {
	pub fn new(config: GeocodingConfig, geocoder: Arc<dyn Geocoder>) -> Self {
		Self {
			queue: Arc::new(PendingQueue::with_dedupe(config.dedupe_queue)),
			cache: Arc::new(MarkerCache::new()),
			config,
			geocoder,
			workers: Vec::new(),
		}
	}

	/// Uses the Nominatim client configured by `config`.
	pub fn from_config(config: GeocodingConfig) -> Result<Self> {
		let geocoder = Arc::new(Nominatim::from_config(&config)?);
		Ok(Self::new(config, geocoder))
	}

	/// Loads the snapshot file into the cache. Must run before [`start`](Self::start).
	///
	/// Returns the number of loaded markers. A missing file loads nothing; an
	/// unreadable or malformed file is an error and leaves the cache untouched.
	pub fn bootstrap(&self) -> Result<usize> {
		if self.is_running() {
			log::warn!("bootstrapping the geocoding cache after the workers started");
		}
		let entries = load_snapshot(&self.config.snapshot_path)?;
		let count = entries.len();
		self.cache.extend(entries);
		log::info!("loaded {count} markers from {:?}", self.config.snapshot_path);
		Ok(count)
	}

	/// Spawns the resolver and the snapshot writer on the current tokio runtime.
	///
	/// Calling it again is a no-op.
	pub fn start(&mut self) {
		if self.is_running() {
			return;
		}

		let resolver = ResolverWorker::new(
			Arc::clone(&self.cache),
			Arc::clone(&self.queue),
			Arc::clone(&self.geocoder),
			&self.config,
		);
		let writer = SnapshotWriter::new(Arc::clone(&self.cache), &self.config);

		self.workers.push(tokio::spawn(resolver.run()));
		self.workers.push(tokio::spawn(writer.run()));
	}

	pub fn is_running(&self) -> bool {
		!self.workers.is_empty()
	}

	pub fn lookup(&self) -> Lookup {
		Lookup::new(Arc::clone(&self.cache), Arc::clone(&self.queue), &self.config)
	}

	/// Writes the current cache to the snapshot file right away.
	pub async fn save_snapshot(&self) -> Result<usize> {
		write_snapshot(&self.config.snapshot_path, &self.cache.entries()).await
	}

	pub fn cache(&self) -> &Arc<MarkerCache> {
		&self.cache
	}

	pub fn queue(&self) -> &Arc<PendingQueue> {
		&self.queue
	}

	pub fn config(&self) -> &GeocodingConfig {
		&self.config
	}
}
