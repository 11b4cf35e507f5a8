use serde::Deserialize;
use std::{
	collections::BTreeMap,
	path::{Path, PathBuf},
	time::Duration,
};

pub const DEFAULT_SERVICE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_SNAPSHOT_PATH: &str = "geodata/geodata.txt";

/// Settings for the resolver, the lookup API and the snapshot writer.
///
/// Every field has a default, so an empty `geocoding:` section is valid.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct GeocodingConfig {
	/// Base URL of the Nominatim compatible geocoding service.
	pub service_url: String,

	/// Identifying `User-Agent` sent with every request. Nominatim rejects anonymous clients.
	pub user_agent: String,

	/// File the cache snapshot is loaded from and written to.
	pub snapshot_path: PathBuf,

	/// Skip enqueueing a key that is already waiting in the queue.
	pub dedupe_queue: bool,

	/// Textual corrections applied to the search query, e.g. `los angeles: la`.
	pub manual_fixes: BTreeMap<String, String>,

	/// Resolver sleep while the queue is empty.
	pub idle_interval_ms: u64,

	/// Resolver sleep after every external request.
	pub rate_limit_interval_ms: u64,

	/// Interval between cache checks while a lookup waits.
	pub poll_interval_ms: u64,

	/// Number of cache checks before a lookup times out.
	pub retry_budget: u32,

	/// Interval between cache growth checks of the snapshot writer.
	pub snapshot_interval_ms: u64,

	/// Pause after each snapshot write.
	pub snapshot_cooldown_ms: u64,

	/// Timeout of a single external request.
	pub request_timeout_ms: u64,
}

impl Default for GeocodingConfig {
	fn default() -> Self {
		Self {
			service_url: DEFAULT_SERVICE_URL.to_owned(),
			user_agent: format!(
				"geopin/{} (+https://nominatim.org/release-docs/latest/api/Search/)",
				env!("CARGO_PKG_VERSION")
			),
			snapshot_path: PathBuf::from(DEFAULT_SNAPSHOT_PATH),
			dedupe_queue: false,
			manual_fixes: BTreeMap::from([("los angeles".to_owned(), "la".to_owned())]),
			idle_interval_ms: 100,
			rate_limit_interval_ms: 1000,
			poll_interval_ms: 250,
			retry_budget: 200,
			snapshot_interval_ms: 1000,
			snapshot_cooldown_ms: 10_000,
			request_timeout_ms: 15_000,
		}
	}
}

impl GeocodingConfig {
	pub fn idle_interval(&self) -> Duration {
		Duration::from_millis(self.idle_interval_ms)
	}

	pub fn rate_limit_interval(&self) -> Duration {
		Duration::from_millis(self.rate_limit_interval_ms)
	}

	pub fn poll_interval(&self) -> Duration {
		Duration::from_millis(self.poll_interval_ms)
	}

	pub fn snapshot_interval(&self) -> Duration {
		Duration::from_millis(self.snapshot_interval_ms)
	}

	pub fn snapshot_cooldown(&self) -> Duration {
		Duration::from_millis(self.snapshot_cooldown_ms)
	}

	pub fn request_timeout(&self) -> Duration {
		Duration::from_millis(self.request_timeout_ms)
	}

	/// Worst case wait of a lookup for an unknown key.
	pub fn lookup_timeout(&self) -> Duration {
		self.poll_interval() * self.retry_budget
	}

	pub fn override_optional_snapshot_path(&mut self, snapshot_path: &Option<PathBuf>) {
		if let Some(path) = snapshot_path {
			self.snapshot_path = path.clone();
		}
	}

	pub fn override_optional_service_url(&mut self, service_url: &Option<String>) {
		if let Some(url) = service_url {
			self.service_url = url.clone();
		}
	}

	/// Resolves a relative snapshot path against the directory of the config file.
	pub fn resolve_paths(&mut self, base: &Path) {
		if self.snapshot_path.is_relative() {
			self.snapshot_path = base.join(&self.snapshot_path);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	#[test]
	fn defaults_match_the_service_contract() {
		let config = GeocodingConfig::default();
		assert_eq!(config.idle_interval(), Duration::from_millis(100));
		assert_eq!(config.rate_limit_interval(), Duration::from_secs(1));
		assert_eq!(config.poll_interval(), Duration::from_millis(250));
		assert_eq!(config.retry_budget, 200);
		assert_eq!(config.lookup_timeout(), Duration::from_secs(50));
		assert_eq!(config.snapshot_interval(), Duration::from_secs(1));
		assert_eq!(config.snapshot_cooldown(), Duration::from_secs(10));
		assert_eq!(config.manual_fixes.get("los angeles").map(String::as_str), Some("la"));
		assert!(config.user_agent.starts_with("geopin/"));
		assert!(!config.dedupe_queue);
	}

	#[test]
	fn overrides_only_apply_when_set() {
		let mut config = GeocodingConfig::default();
		config.override_optional_snapshot_path(&None);
		assert_eq!(config.snapshot_path, PathBuf::from(DEFAULT_SNAPSHOT_PATH));
		config.override_optional_snapshot_path(&Some(PathBuf::from("/tmp/geo.txt")));
		assert_eq!(config.snapshot_path, PathBuf::from("/tmp/geo.txt"));

		config.override_optional_service_url(&Some("http://localhost:1234".into()));
		assert_eq!(config.service_url, "http://localhost:1234");
	}

	#[test]
	fn resolve_paths_keeps_absolute_paths() {
		let mut config = GeocodingConfig::default();
		config.resolve_paths(Path::new("/etc/geopin"));
		assert_eq!(config.snapshot_path, PathBuf::from("/etc/geopin/geodata/geodata.txt"));

		config.snapshot_path = PathBuf::from("/var/geo.txt");
		config.resolve_paths(Path::new("/etc/geopin"));
		assert_eq!(config.snapshot_path, PathBuf::from("/var/geo.txt"));
	}
}
