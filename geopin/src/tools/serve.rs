use super::load_config;
use anyhow::Result;
use geopin::server::GeoServer;
use std::path::PathBuf;
use tokio::time::{Duration, sleep};

#[derive(clap::Args, Debug)]
#[command(disable_version_flag = true, verbatim_doc_comment)]
pub struct Subcommand {
	/// Path to a configuration file (YAML format) to configure the server, geocoding and streams.
	/// Command line arguments will override configuration file settings.
	#[arg(short = 'c', long, value_name = "FILE", display_order = 0, verbatim_doc_comment)]
	pub config: Option<PathBuf>,

	/// Serve via socket ip. Default: 0.0.0.0
	#[arg(short = 'i', long, display_order = 0)]
	pub ip: Option<String>,

	/// Serve via port. Default: 8080
	#[arg(short, long, display_order = 0)]
	pub port: Option<u16>,

	/// Relation index listing the locations of every entity: a local JSON file or an http(s) URL.
	#[arg(short = 'r', long, display_order = 1)]
	pub relations: Option<String>,

	/// Snapshot file with resolved markers. Default: geodata/geodata.txt
	#[arg(long, value_name = "FILE", display_order = 1)]
	pub snapshot: Option<PathBuf>,

	/// Base URL of a Nominatim compatible geocoding service. Default: https://nominatim.openstreetmap.org
	#[arg(long, value_name = "URL", display_order = 2)]
	pub service_url: Option<String>,

	/// Shutdown server automatically after x milliseconds.
	#[arg(long, display_order = 4)]
	pub auto_shutdown: Option<u64>,
}

#[tokio::main]
pub async fn run(arguments: &Subcommand) -> Result<()> {
	let mut config = load_config(&arguments.config)?;
	config.server.override_optional_ip(&arguments.ip);
	config.server.override_optional_port(&arguments.port);
	config.override_optional_relations(&arguments.relations);
	config.geocoding.override_optional_snapshot_path(&arguments.snapshot);
	config.geocoding.override_optional_service_url(&arguments.service_url);

	let mut server = GeoServer::from_config(config).await?;
	eprintln!(
		"{} cached markers, {} entities",
		server.service().cache().len(),
		server.directory().len()
	);

	server.start().await?;

	if let Some(milliseconds) = arguments.auto_shutdown {
		sleep(Duration::from_millis(milliseconds)).await;
		server.stop().await;
	} else {
		loop {
			sleep(Duration::from_secs(60)).await;
		}
	}

	Ok(())
}
