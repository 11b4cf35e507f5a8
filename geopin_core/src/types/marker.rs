use super::location_key::display_label;
use serde::{Deserialize, Serialize};

/// A resolved geocoding result.
///
/// Coordinates are kept as the decimal text the geocoding service returned, so
/// a marker survives a snapshot round-trip without any float formatting drift.
/// The same type is used to decode candidate results from the service; fields
/// the service does not send default to empty strings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Marker {
	#[serde(default)]
	pub lon: String,
	#[serde(default)]
	pub lat: String,
	#[serde(default)]
	pub class: String,
	#[serde(default)]
	pub addresstype: String,
	/// Display label, derived from the location key at read time. Never persisted.
	#[serde(default, skip_deserializing)]
	pub location: String,
}

impl Marker {
	pub fn new(lon: &str, lat: &str) -> Self {
		Self {
			lon: lon.to_owned(),
			lat: lat.to_owned(),
			..Self::default()
		}
	}

	/// Both coordinates are present.
	pub fn has_coordinates(&self) -> bool {
		!self.lat.is_empty() && !self.lon.is_empty()
	}

	/// Returns a copy labelled for the given location key.
	pub fn labelled(&self, key: &str) -> Self {
		Self {
			location: display_label(key),
			..self.clone()
		}
	}
}
