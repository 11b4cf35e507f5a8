//! Router composition.
//!
//! Wires handlers into an axum `Router`; lifecycle and middleware live in `geo_server`.

use super::handlers::{AppState, ok_json, resolve_location, stream_entity_markers};
use axum::{Router, routing::get};

/// Liveness probe at `/status`.
pub fn add_status_to_app(app: Router) -> Router {
	app.route("/status", get(|| async { "ready!" }))
}

/// JSON API: `/api/status` and `/api/resolve?location=<key>`.
pub fn add_api_to_app(app: Router, state: AppState) -> Router {
	let api_app = Router::new()
		.route("/api/status", get(|| async { ok_json("{\"status\":\"ready\"}") }))
		.route("/api/resolve", get(resolve_location))
		.with_state(state);
	app.merge(api_app)
}

/// Server-sent marker stream at `/api/markers/{id}`.
pub fn add_marker_stream_to_app(app: Router, state: AppState) -> Router {
	let stream_app = Router::new()
		.route("/api/markers/{id}", get(stream_entity_markers))
		.with_state(state);
	app.merge(stream_app)
}
