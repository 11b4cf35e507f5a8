use crate::{cache::MarkerCache, config::GeocodingConfig, snapshot::write_snapshot};
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::time::sleep;

/// Persists the whole cache whenever it has grown.
///
/// The in-memory cache stays authoritative; failed writes are logged and retried
/// with the next growth.
pub struct SnapshotWriter {
	cache: Arc<MarkerCache>,
	path: PathBuf,
	interval: Duration,
	cooldown: Duration,
	last_len: usize,
}

impl SnapshotWriter {
	/// The current cache size is the baseline, so entries loaded at bootstrap do not trigger a write.
	pub fn new(cache: Arc<MarkerCache>, config: &GeocodingConfig) -> Self {
		let last_len = cache.len();
		Self {
			cache,
			path: config.snapshot_path.clone(),
			interval: config.snapshot_interval(),
			cooldown: config.snapshot_cooldown(),
			last_len,
		}
	}

	pub async fn run(mut self) {
		log::info!("geocoding snapshot writer started for {:?}", self.path);
		loop {
			sleep(self.interval).await;
			if self.check_once().await {
				sleep(self.cooldown).await;
			}
		}
	}

	/// Writes a snapshot if the cache grew since the last check. Returns whether it tried.
	pub async fn check_once(&mut self) -> bool {
		let len = self.cache.len();
		if len <= self.last_len {
			return false;
		}
		self.last_len = len;

		match write_snapshot(&self.path, &self.cache.entries()).await {
			Ok(bytes) => log::info!("saved {len} markers ({bytes} bytes) to {:?}", self.path),
			Err(err) => log::error!("saving geocoding snapshot failed: {err:#}"),
		}
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{snapshot::load_snapshot, types::Marker};
	use anyhow::Result;
	use tempfile::TempDir;

	fn writer(dir: &TempDir, cache: &Arc<MarkerCache>) -> SnapshotWriter {
		let config = GeocodingConfig {
			snapshot_path: dir.path().join("geodata.txt"),
			..GeocodingConfig::default()
		};
		SnapshotWriter::new(Arc::clone(cache), &config)
	}

	#[tokio::test]
	async fn writes_only_after_growth() -> Result<()> {
		let dir = TempDir::new()?;
		let cache = Arc::new(MarkerCache::new());
		cache.set("osaka-japan", Marker::new("135.5", "34.7"));

		let mut writer = writer(&dir, &cache);
		assert!(!writer.check_once().await);
		assert!(!dir.path().join("geodata.txt").exists());

		cache.set("london-uk", Marker::new("-0.12", "51.5"));
		assert!(writer.check_once().await);
		assert_eq!(load_snapshot(&dir.path().join("geodata.txt"))?.len(), 2);

		assert!(!writer.check_once().await);
		Ok(())
	}

	#[tokio::test]
	async fn write_failure_is_not_fatal() -> Result<()> {
		let dir = TempDir::new()?;
		// a directory where the file should be makes the write fail
		std::fs::create_dir(dir.path().join("geodata.txt"))?;

		let cache = Arc::new(MarkerCache::new());
		let mut writer = writer(&dir, &cache);
		cache.set("london-uk", Marker::new("-0.12", "51.5"));

		assert!(writer.check_once().await);
		assert_eq!(cache.len(), 1);
		Ok(())
	}

	#[tokio::test]
	async fn run_picks_up_new_entries() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("geodata.txt");
		let cache = Arc::new(MarkerCache::new());
		let config = GeocodingConfig {
			snapshot_path: path.clone(),
			snapshot_interval_ms: 10,
			snapshot_cooldown_ms: 10,
			..GeocodingConfig::default()
		};

		tokio::spawn(SnapshotWriter::new(Arc::clone(&cache), &config).run());
		cache.set("lima-peru", Marker::new("-77.04", "-12.05"));

		let expected = vec![("lima-peru".to_string(), Marker::new("-77.04", "-12.05"))];
		for _ in 0..200 {
			if load_snapshot(&path).ok() == Some(expected.clone()) {
				return Ok(());
			}
			sleep(Duration::from_millis(10)).await;
		}
		panic!("snapshot was not written to {path:?}");
	}
}
