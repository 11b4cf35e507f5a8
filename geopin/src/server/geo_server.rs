//! HTTP server lifecycle.
//!
//! `GeoServer` owns the geocoding pipeline and the entity directory, builds the
//! router from `routes`, listens on a socket and shuts down gracefully. Request
//! handling lives in `handlers`.

use super::{handlers::format_error_chain, routes};
use crate::{
	config::{Config, ServerConfig},
	directory::LocationDirectory,
	server::AppState,
};
use anyhow::{Context, Result};
use axum::Router;
use geopin_core::GeocodingService;
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};
use tower_http::catch_panic::CatchPanicLayer;

/// Start and stop are idempotent: starting twice stops the previous instance
/// first, stopping a stopped server does nothing.
///
/// ```no_run
/// # use geopin::{Config, server::GeoServer};
/// # async fn demo() -> anyhow::Result<()> {
/// let mut server = GeoServer::from_config(Config::default()).await?;
/// server.start().await?;
/// // ... run requests ...
/// server.stop().await;
/// # Ok(())
/// # }
/// ```
pub struct GeoServer {
	ip: String,
	port: u16,
	service: GeocodingService,
	directory: Arc<LocationDirectory>,
	pacing: Duration,
	/// One-shot channel to signal graceful shutdown to the serving task.
	exit_signal: Option<oneshot::Sender<()>>,
	join: Option<JoinHandle<()>>,
	local_addr: Option<SocketAddr>,
}

impl GeoServer {
	pub fn new(
		server: &ServerConfig,
		service: GeocodingService,
		directory: LocationDirectory,
		pacing: Duration,
	) -> Self {
		GeoServer {
			ip: server.ip_or_default().to_owned(),
			port: server.port_or_default(),
			service,
			directory: Arc::new(directory),
			pacing,
			exit_signal: None,
			join: None,
			local_addr: None,
		}
	}

	/// Builds the geocoding pipeline, loads the snapshot and the relation index.
	///
	/// A broken snapshot is logged and the server starts with an empty cache.
	/// A relation index that cannot be loaded is an error.
	pub async fn from_config(config: Config) -> Result<GeoServer> {
		let service = GeocodingService::from_config(config.geocoding)?;
		if let Err(err) = service.bootstrap() {
			log::error!("starting with an empty cache:\n{}", format_error_chain(&err));
		}

		let directory = match &config.relations {
			Some(source) => LocationDirectory::load(source)
				.await
				.with_context(|| format!("loading relation index from {source}"))?,
			None => {
				log::warn!("no relation index configured, marker streams will answer 404");
				LocationDirectory::default()
			}
		};

		Ok(GeoServer::new(&config.server, service, directory, config.stream.pacing()))
	}

	/// Start the geocoding workers, then listen and serve requests.
	pub async fn start(&mut self) -> Result<()> {
		if self.exit_signal.is_some() || self.join.is_some() {
			self.stop().await;
		}

		log::info!("starting server");
		self.service.start();

		let state = AppState {
			lookup: self.service.lookup(),
			directory: Arc::clone(&self.directory),
			pacing: self.pacing,
		};

		let mut router = routes::add_status_to_app(Router::new());
		router = routes::add_api_to_app(router, state.clone());
		router = routes::add_marker_stream_to_app(router, state);
		router = router.layer(CatchPanicLayer::new());

		let addr = format!("{}:{}", self.ip, self.port);
		let listener = TcpListener::bind(&addr)
			.await
			.with_context(|| format!("binding server to {addr}"))?;
		let local_addr = listener.local_addr()?;
		log::info!("server listening on {local_addr}");

		let (tx, rx) = oneshot::channel::<()>();

		let handle = tokio::spawn(async move {
			if let Err(err) = axum::serve(listener, router.into_make_service())
				.with_graceful_shutdown(async {
					rx.await.ok();
				})
				.await
			{
				log::error!("server task exited with error: {err}");
			}
		});

		self.exit_signal = Some(tx);
		self.join = Some(handle);
		self.local_addr = Some(local_addr);

		Ok(())
	}

	/// Trigger graceful shutdown and wait for the server task to finish (with timeout).
	///
	/// Open marker streams keep a graceful shutdown waiting, so this gives up
	/// after ten seconds. The geocoding workers keep running.
	pub async fn stop(&mut self) {
		if self.exit_signal.is_none() && self.join.is_none() {
			return;
		}

		log::info!("stopping server");
		self.local_addr = None;

		if let Some(tx) = self.exit_signal.take() {
			let _ = tx.send(());
		}

		if let Some(handle) = self.join.take() {
			match tokio::time::timeout(Duration::from_secs(10), handle).await {
				Ok(Err(join_err)) => log::warn!("server task join error: {join_err}"),
				Ok(Ok(())) => {}
				Err(_) => log::warn!("server task did not shutdown within timeout; continuing"),
			}
		}
	}

	/// Bound address while running. Useful when listening on port 0.
	pub fn local_addr(&self) -> Option<SocketAddr> {
		self.local_addr
	}

	pub fn service(&self) -> &GeocodingService {
		&self.service
	}

	pub fn directory(&self) -> &LocationDirectory {
		&self.directory
	}
}
