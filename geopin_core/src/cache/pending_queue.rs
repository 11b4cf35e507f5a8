use parking_lot::Mutex;
use std::collections::{HashSet, VecDeque};

#[derive(Debug, Default)]
struct QueueState {
	keys: VecDeque<String>,
	queued: HashSet<String>,
}

/// FIFO of location keys waiting for the resolver.
///
/// Duplicates are accepted by default. With `dedupe` enabled a key that is
/// already waiting is not appended a second time; the membership set shares the
/// queue's lock.
#[derive(Debug, Default)]
pub struct PendingQueue {
	state: Mutex<QueueState>,
	dedupe: bool,
}

impl PendingQueue {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_dedupe(dedupe: bool) -> Self {
		Self {
			state: Mutex::default(),
			dedupe,
		}
	}

	/// Appends a key to the tail. Returns `false` if dedupe skipped it.
	pub fn add(&self, key: &str) -> bool {
		let mut state = self.state.lock();
		if self.dedupe && !state.queued.insert(key.to_owned()) {
			return false;
		}
		state.keys.push_back(key.to_owned());
		true
	}

	/// Removes and returns the head, or `None` if nothing is waiting.
	pub fn pop(&self) -> Option<String> {
		let mut state = self.state.lock();
		let key = state.keys.pop_front()?;
		if self.dedupe {
			state.queued.remove(&key);
		}
		Some(key)
	}

	pub fn len(&self) -> usize {
		self.state.lock().keys.len()
	}

	pub fn is_empty(&self) -> bool {
		self.state.lock().keys.is_empty()
	}
}
