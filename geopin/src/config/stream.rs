use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StreamConfig {
	/// Minimum gap between two marker events, smoothing client-side rendering.
	pub pacing_ms: u64,
}

impl Default for StreamConfig {
	fn default() -> Self {
		Self { pacing_ms: 300 }
	}
}

impl StreamConfig {
	pub fn pacing(&self) -> Duration {
		Duration::from_millis(self.pacing_ms)
	}
}
