use super::{ServerConfig, StreamConfig};
use anyhow::{Context, Result};
use geopin_core::GeocodingConfig;
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

#[derive(Default, Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
	/// HTTP server configuration
	#[serde(default)]
	pub server: ServerConfig,

	/// Geocoding service, lookup and snapshot settings
	#[serde(default)]
	pub geocoding: GeocodingConfig,

	/// Marker stream settings
	#[serde(default)]
	pub stream: StreamConfig,

	/// Relation index with the locations of every entity: a local file or an http(s) URL
	#[serde(default)]
	pub relations: Option<String>,
}

impl Config {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	/// Parse from a file path; relative paths inside are resolved against the file's directory.
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path).with_context(|| format!("opening config file {path:?}"))?;
		let mut cfg =
			Config::from_reader(BufReader::new(file)).with_context(|| format!("parsing config file {path:?}"))?;

		cfg.resolve_paths(path.parent().unwrap_or(Path::new("")));
		Ok(cfg)
	}

	pub fn resolve_paths(&mut self, base: &Path) {
		self.geocoding.resolve_paths(base);

		if let Some(relations) = &self.relations {
			if !is_url(relations) && Path::new(relations).is_relative() {
				self.relations = Some(base.join(relations).to_string_lossy().into_owned());
			}
		}
	}

	pub fn override_optional_relations(&mut self, relations: &Option<String>) {
		if relations.is_some() {
			self.relations = relations.clone();
		}
	}
}

pub(crate) fn is_url(source: &str) -> bool {
	source.starts_with("http://") || source.starts_with("https://")
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use std::{collections::BTreeMap, path::PathBuf};

	#[test]
	fn parse_example_config() {
		let path = Path::new("../testdata/config1.yml");
		let cfg = Config::from_path(path).unwrap();

		assert_eq!(
			cfg,
			Config {
				server: ServerConfig {
					ip: Some("127.0.0.1".to_string()),
					port: Some(51234),
				},
				geocoding: GeocodingConfig {
					service_url: "http://127.0.0.1:51235".to_string(),
					user_agent: "geopin-tests (ops@example.org)".to_string(),
					snapshot_path: PathBuf::from("../testdata/geodata.txt"),
					dedupe_queue: true,
					manual_fixes: BTreeMap::from([
						("los angeles".to_string(), "la".to_string()),
						("new york city".to_string(), "new york".to_string()),
					]),
					poll_interval_ms: 100,
					retry_budget: 50,
					..GeocodingConfig::default()
				},
				stream: StreamConfig { pacing_ms: 50 },
				relations: Some("https://example.org/api/relation".to_string()),
			}
		);
	}

	#[test]
	fn parse_empty_config() {
		assert_eq!(Config::from_string("").unwrap(), Config::default());
	}

	#[test]
	fn parse_invalid_config() {
		assert!(Config::from_string("server:\n  pi: 3.14.15.9").is_err());
		assert!(Config::from_string("geocoding:\n  retry_budget: lots").is_err());
	}

	#[test]
	fn relative_relations_follow_the_config_file() {
		let mut cfg = Config::from_string("relations: data/relations.json").unwrap();
		cfg.resolve_paths(Path::new("/srv/geopin"));
		assert_eq!(cfg.relations.as_deref(), Some("/srv/geopin/data/relations.json"));

		cfg.override_optional_relations(&Some("https://example.org/relation".into()));
		cfg.resolve_paths(Path::new("/srv/geopin"));
		assert_eq!(cfg.relations.as_deref(), Some("https://example.org/relation"));
	}

	#[test]
	fn missing_file_names_the_path() {
		let err = Config::from_path(Path::new("../testdata/nope.yml")).unwrap_err();
		assert!(err.to_string().contains("nope.yml"));
	}
}
