//! Durable snapshot of the marker cache.
//!
//! The file holds one record per line, `key, longitude, latitude`. Only the key
//! and the coordinates are persisted; labels are derived again on read and the
//! classification tags are not needed after disambiguation.
//!
//! The format has no escaping. Keys containing the field delimiter or a line
//! break are skipped when writing so that the file always stays loadable.

use crate::types::Marker;
use anyhow::{Context, Result, bail};
use std::{fs, io::ErrorKind, path::Path};

const DELIMITER: &str = ", ";

/// Reads a snapshot file. A missing file is an empty snapshot.
pub fn load_snapshot(path: &Path) -> Result<Vec<(String, Marker)>> {
	let text = match fs::read_to_string(path) {
		Ok(text) => text,
		Err(err) if err.kind() == ErrorKind::NotFound => {
			log::debug!("no geocoding snapshot at {path:?}");
			return Ok(Vec::new());
		}
		Err(err) => return Err(err).with_context(|| format!("reading geocoding snapshot {path:?}")),
	};

	parse_snapshot(&text).with_context(|| format!("parsing geocoding snapshot {path:?}"))
}

/// Parses snapshot text. Any malformed line fails the whole parse.
pub fn parse_snapshot(text: &str) -> Result<Vec<(String, Marker)>> {
	let text = text.replace('\r', "");
	let mut entries = Vec::new();

	for (index, line) in text.split('\n').enumerate() {
		if line.is_empty() {
			continue;
		}
		let fields: Vec<&str> = line.split(DELIMITER).collect();
		if fields.len() != 3 || fields.iter().any(|field| field.is_empty()) {
			bail!(
				"line {}: expected 'key, longitude, latitude', found '{line}'",
				index + 1
			);
		}
		entries.push((fields[0].to_owned(), Marker::new(fields[1], fields[2])));
	}

	Ok(entries)
}

/// Whether a key can be written without breaking the line format.
pub fn is_storable_key(key: &str) -> bool {
	!key.is_empty() && !key.contains(DELIMITER) && !key.contains(['\n', '\r'])
}

/// Serializes entries into snapshot text, skipping keys the format cannot hold.
pub fn render_snapshot(entries: &[(String, Marker)]) -> String {
	let mut text = String::new();
	for (key, marker) in entries {
		if !is_storable_key(key) {
			log::warn!("skipping location key {key:?} in snapshot, it cannot be stored in the line format");
			continue;
		}
		text.push_str(key);
		text.push_str(DELIMITER);
		text.push_str(&marker.lon);
		text.push_str(DELIMITER);
		text.push_str(&marker.lat);
		text.push('\n');
	}
	text
}

/// Overwrites the snapshot file with all given entries. Returns the number of bytes written.
pub async fn write_snapshot(path: &Path, entries: &[(String, Marker)]) -> Result<usize> {
	let text = render_snapshot(entries);

	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		tokio::fs::create_dir_all(parent)
			.await
			.with_context(|| format!("creating snapshot directory {parent:?}"))?;
	}

	tokio::fs::write(path, text.as_bytes())
		.await
		.with_context(|| format!("writing geocoding snapshot {path:?}"))?;

	Ok(text.len())
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use tempfile::TempDir;

	fn entry(key: &str, lon: &str, lat: &str) -> (String, Marker) {
		(key.to_owned(), Marker::new(lon, lat))
	}

	#[test]
	fn missing_file_is_empty() -> Result<()> {
		let dir = TempDir::new()?;
		assert!(load_snapshot(&dir.path().join("nothing.txt"))?.is_empty());
		Ok(())
	}

	#[test]
	fn parses_lines_and_ignores_blank_ones() -> Result<()> {
		let entries = parse_snapshot("osaka-japan, 135.5023, 34.6937\r\n\nlondon-uk, -0.1276, 51.5073\n")?;
		assert_eq!(
			entries,
			vec![
				entry("osaka-japan", "135.5023", "34.6937"),
				entry("london-uk", "-0.1276", "51.5073"),
			]
		);
		Ok(())
	}

	#[test]
	fn malformed_line_fails_the_load() {
		let err = parse_snapshot("osaka-japan, 135.5, 34.7\nbroken line\n").unwrap_err();
		assert!(err.to_string().contains("line 2"), "{err}");

		assert!(parse_snapshot(", 1, 2\n").is_err());
		assert!(parse_snapshot("osaka-japan, 135.5\n").is_err());

		// a delimiter inside the key would shift the coordinates
		let err = parse_snapshot("osaka-japan, 135.5, 34.7\nnew, york-usa, -74.0, 40.7\n").unwrap_err();
		assert!(err.to_string().contains("line 2"), "{err}");

		// empty coordinates would become a permanent cache hit without a position
		let err = parse_snapshot("osaka-japan, , \n").unwrap_err();
		assert!(err.to_string().contains("line 1"), "{err}");
		assert!(parse_snapshot("osaka-japan, 135.5, \n").is_err());
	}

	#[test]
	fn render_skips_unstorable_keys() {
		let text = render_snapshot(&[
			entry("osaka-japan", "135.5", "34.7"),
			entry("bad, key", "1", "2"),
			entry("bad\nkey", "1", "2"),
		]);
		assert_eq!(text, "osaka-japan, 135.5, 34.7\n");
	}

	#[tokio::test]
	async fn round_trip_through_a_file() -> Result<()> {
		let dir = TempDir::new()?;
		let path = dir.path().join("geodata").join("geodata.txt");

		let entries = vec![
			entry("london-uk", "-0.1276", "51.5073"),
			entry("north_carolina-usa", "-79.0193", "35.7596"),
			entry("osaka-japan", "135.5023", "34.6937"),
		];
		write_snapshot(&path, &entries).await?;
		assert_eq!(load_snapshot(&path)?, entries);

		// a second write replaces the file instead of appending
		write_snapshot(&path, &entries[..1]).await?;
		assert_eq!(load_snapshot(&path)?, entries[..1].to_vec());
		Ok(())
	}
}
