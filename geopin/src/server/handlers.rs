//! HTTP handlers and small response helpers.
//!
//! - `resolve_location` answers a single lookup as JSON.
//! - `stream_entity_markers` streams the markers of one entity as server-sent events.

use crate::directory::LocationDirectory;
use axum::{
	body::Body,
	extract::{Path, Query, State},
	http::{HeaderValue, StatusCode, header},
	response::{
		IntoResponse, Response,
		sse::{Event, KeepAlive, Sse},
	},
};
use geopin_core::{Lookup, MarkerEvent, stream_markers, types::location_key::split_segments};
use serde::Deserialize;
use std::{sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tokio_stream::{StreamExt, wrappers::ReceiverStream};

/// Shared by every request.
#[derive(Clone)]
pub struct AppState {
	pub lookup: Lookup,
	pub directory: Arc<LocationDirectory>,
	pub pacing: Duration,
}

#[derive(Debug, Deserialize)]
pub struct ResolveParams {
	location: String,
}

pub async fn resolve_location(Query(params): Query<ResolveParams>, State(state): State<AppState>) -> Response<Body> {
	let location = params.location.trim();
	log::debug!("handle resolve request: {location}");

	if split_segments(location).is_none() {
		log::debug!("send 400 for resolve request without a city-country key: '{location}'");
		return error_with(StatusCode::BAD_REQUEST, "expected a location key like 'city-country'");
	}

	match state.lookup.resolve(location).await {
		Ok(marker) => match serde_json::to_string(&marker) {
			Ok(json) => ok_json(&json),
			Err(err) => {
				log::error!("serializing marker for '{location}': {err}");
				error_500()
			}
		},
		Err(err) => {
			log::warn!("send 504 for resolve request: {err}");
			error_with(StatusCode::GATEWAY_TIMEOUT, &err.to_string())
		}
	}
}

pub async fn stream_entity_markers(Path(id): Path<String>, State(state): State<AppState>) -> Response<Body> {
	let Some(locations) = id.parse::<u64>().ok().and_then(|id| state.directory.locations(id)) else {
		log::debug!("send 404 for marker stream of unknown entity '{id}'");
		return error_404();
	};
	log::debug!("stream {} markers for entity {id}", locations.len());

	let (tx, rx) = mpsc::channel(16);
	tokio::spawn(stream_markers(state.lookup.clone(), locations.to_vec(), state.pacing, tx));

	let events =
		ReceiverStream::new(rx).filter_map(|event| to_sse_event(&event).map(Ok::<_, std::convert::Infallible>));

	let mut response = Sse::new(events).keep_alive(KeepAlive::default()).into_response();
	let headers = response.headers_mut();
	headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
	headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
	response
}

fn to_sse_event(event: &MarkerEvent) -> Option<Event> {
	let json = match event.to_json() {
		Ok(json) => json,
		Err(err) => {
			log::error!("serializing marker event {event:?}: {err}");
			return None;
		}
	};
	let sse = if event.is_failure() {
		Event::default().event("error")
	} else {
		Event::default()
	};
	Some(sse.data(json))
}

// --- small helpers -----------------------------------------------------------

pub fn format_error_chain(err: &anyhow::Error) -> String {
	let mut result = err.to_string();

	for (i, cause) in err.chain().skip(1).enumerate() {
		if i == 0 {
			result.push_str("\n  Caused by:");
		}
		result.push_str(&format!("\n    {cause}"));
	}

	result
}

fn error_with(status: StatusCode, message: &str) -> Response<Body> {
	let mut response = Response::new(Body::from(message.to_owned()));
	*response.status_mut() = status;
	response.headers_mut().insert(
		header::CONTENT_TYPE,
		HeaderValue::from_static("text/plain; charset=utf-8"),
	);
	response
}

pub fn error_404() -> Response<Body> {
	error_with(StatusCode::NOT_FOUND, "Not Found")
}

pub fn error_500() -> Response<Body> {
	error_with(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}

/// Tiny JSON helper used by API routes.
pub fn ok_json(message: &str) -> Response<Body> {
	let mut response = Response::new(Body::from(message.to_owned()));
	let headers = response.headers_mut();
	headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
	headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
	response
}
