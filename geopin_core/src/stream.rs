//! Fans out lookups for the locations of one entity and streams the markers as they arrive.

use crate::{lookup::Lookup, types::Marker};
use serde::Serialize;
use std::{collections::BTreeSet, time::Duration};
use tokio::{sync::mpsc, task::JoinSet, time::sleep};

/// One item of a marker stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerEvent {
	Marker(Marker),
	/// A lookup that did not produce a marker. Still counts as a completion.
	Failed { location: String, error: String },
	/// Sentinel after every lookup has completed.
	Finished,
}

/// Wire shape of data events; every value is carried as text.
#[derive(Debug, Serialize)]
struct MarkerRecord<'a> {
	lat: &'a str,
	lon: &'a str,
	location: &'a str,
	finished: &'a str,
}

#[derive(Debug, Serialize)]
struct FailureRecord<'a> {
	location: &'a str,
	error: &'a str,
}

impl MarkerEvent {
	pub fn is_finished(&self) -> bool {
		matches!(self, Self::Finished)
	}

	pub fn is_failure(&self) -> bool {
		matches!(self, Self::Failed { .. })
	}

	/// JSON payload, e.g. `{"lat":"34.7","lon":"135.5","location":"Osaka - Japan","finished":"false"}`.
	pub fn to_json(&self) -> serde_json::Result<String> {
		match self {
			Self::Marker(marker) => serde_json::to_string(&MarkerRecord {
				lat: &marker.lat,
				lon: &marker.lon,
				location: &marker.location,
				finished: "false",
			}),
			Self::Failed { location, error } => serde_json::to_string(&FailureRecord { location, error }),
			Self::Finished => serde_json::to_string(&MarkerRecord {
				lat: "",
				lon: "",
				location: "",
				finished: "true",
			}),
		}
	}
}

/// Resolves all `locations` concurrently and sends one event per completion, in
/// arrival order, followed by [`MarkerEvent::Finished`].
///
/// Marker events are spaced by `pacing`. Failed lookups are reported as
/// [`MarkerEvent::Failed`] so the stream always closes after every launched
/// lookup has completed. Returns early, aborting outstanding lookups, if the
/// receiver is dropped.
pub async fn stream_markers(
	lookup: Lookup,
	locations: Vec<String>,
	pacing: Duration,
	sink: mpsc::Sender<MarkerEvent>,
) {
	let locations: BTreeSet<String> = locations.into_iter().collect();
	log::debug!("streaming markers for {} locations", locations.len());

	let mut pending = JoinSet::new();
	for location in locations {
		let lookup = lookup.clone();
		pending.spawn(async move {
			let result = lookup.resolve(&location).await;
			(location, result)
		});
	}

	while let Some(completion) = pending.join_next().await {
		let event = match completion {
			Ok((_, Ok(marker))) => MarkerEvent::Marker(marker),
			Ok((location, Err(err))) => {
				log::warn!("{location}: {err}");
				MarkerEvent::Failed {
					location,
					error: err.to_string(),
				}
			}
			Err(err) => {
				log::error!("marker lookup task failed: {err}");
				MarkerEvent::Failed {
					location: String::new(),
					error: err.to_string(),
				}
			}
		};

		let paced = matches!(event, MarkerEvent::Marker(_));
		if sink.send(event).await.is_err() {
			log::debug!("marker stream receiver closed, dropping {} lookups", pending.len());
			return;
		}
		if paced {
			sleep(pacing).await;
		}
	}

	if sink.send(MarkerEvent::Finished).await.is_err() {
		log::debug!("marker stream receiver closed before the end marker");
	}
}
