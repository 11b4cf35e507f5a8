pub mod label;
pub mod resolve;
pub mod serve;

use anyhow::Result;
use geopin::Config;
use std::path::PathBuf;

/// Reads the config file if one was given, otherwise uses the defaults.
fn load_config(path: &Option<PathBuf>) -> Result<Config> {
	match path {
		Some(path) => Config::from_path(path),
		None => Ok(Config::default()),
	}
}
