use crate::types::Marker;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Concurrent mapping from location key to resolved marker.
///
/// Unbounded: entries are never evicted. The lock is only held for a single
/// map operation.
#[derive(Debug, Default)]
pub struct MarkerCache {
	map: Mutex<HashMap<String, Marker>>,
}

impl MarkerCache {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn get(&self, key: &str) -> Option<Marker> {
		self.map.lock().get(key).cloned()
	}

	pub fn contains(&self, key: &str) -> bool {
		self.map.lock().contains_key(key)
	}

	/// Inserts a marker, overwriting any previous entry for the key.
	pub fn set(&self, key: &str, marker: Marker) {
		self.map.lock().insert(key.to_owned(), marker);
	}

	/// Bulk insert used when bootstrapping from a snapshot.
	pub fn extend<I>(&self, entries: I)
	where
		I: IntoIterator<Item = (String, Marker)>,
	{
		self.map.lock().extend(entries);
	}

	pub fn len(&self) -> usize {
		self.map.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.lock().is_empty()
	}

	/// Consistent copy of all entries, sorted by key.
	pub fn entries(&self) -> Vec<(String, Marker)> {
		let mut entries: Vec<(String, Marker)> = self
			.map
			.lock()
			.iter()
			.map(|(key, marker)| (key.clone(), marker.clone()))
			.collect();
		entries.sort_by(|a, b| a.0.cmp(&b.0));
		entries
	}
}
