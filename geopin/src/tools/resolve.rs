use super::load_config;
use anyhow::{Result, bail};
use futures::future::join_all;
use geopin::core::GeocodingService;
use std::path::PathBuf;

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// Location keys like "osaka-japan". Keys missing from the snapshot are looked up online.
	#[arg(num_args = 1.., required = true)]
	pub locations: Vec<String>,

	/// Path to a configuration file (YAML format).
	#[arg(short = 'c', long, value_name = "FILE", display_order = 0)]
	pub config: Option<PathBuf>,

	/// Snapshot file with already resolved markers. Default: geodata/geodata.txt
	#[arg(long, value_name = "FILE", display_order = 1)]
	pub snapshot: Option<PathBuf>,

	/// Base URL of a Nominatim compatible geocoding service. Default: https://nominatim.openstreetmap.org
	#[arg(long, value_name = "URL", display_order = 2)]
	pub service_url: Option<String>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let mut config = load_config(&arguments.config)?;
	config.geocoding.override_optional_snapshot_path(&arguments.snapshot);
	config.geocoding.override_optional_service_url(&arguments.service_url);

	let mut service = GeocodingService::from_config(config.geocoding)?;
	if let Err(err) = service.bootstrap() {
		log::error!("starting with an empty cache: {err:#}");
	}
	let known = service.cache().len();
	service.start();

	let lookup = service.lookup();
	let results = join_all(arguments.locations.iter().map(|location| lookup.resolve(location))).await;

	let mut failures = 0;
	for result in results {
		match result {
			Ok(marker) => println!("{}: {}, {}", marker.location, marker.lat, marker.lon),
			Err(err) => {
				eprintln!("{err}");
				failures += 1;
			}
		}
	}

	if service.cache().len() > known {
		service.save_snapshot().await?;
	}

	if failures > 0 {
		bail!("{failures} of {} locations could not be resolved", arguments.locations.len());
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use crate::tests::run_command;
	use anyhow::Result;

	#[test]
	fn resolves_from_the_snapshot() -> Result<()> {
		run_command(vec![
			"geopin",
			"resolve",
			"--snapshot",
			"../testdata/geodata.txt",
			"osaka-japan",
			"north_carolina-usa",
		])?;
		Ok(())
	}
}
