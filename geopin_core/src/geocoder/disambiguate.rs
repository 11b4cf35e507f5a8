//! Picks the best marker among the candidates returned for one query.
//!
//! Preference order:
//! 1. settlement-like: `town`, `village`, `county`, `municipality`, `district`, `city`
//! 2. region-like: `state`, `province`, `region`, `boundary`
//! 3. the first candidate
//!
//! A candidate matches a tier if either its `class` or its `addresstype` is in it.

use crate::types::Marker;

pub const SETTLEMENT_TAGS: [&str; 6] = ["town", "village", "county", "municipality", "district", "city"];
pub const REGION_TAGS: [&str; 4] = ["state", "province", "region", "boundary"];

/// Returns `None` only for an empty candidate list.
pub fn pick(candidates: Vec<Marker>) -> Option<Marker> {
	let index = first_tagged(&candidates, &SETTLEMENT_TAGS)
		.or_else(|| first_tagged(&candidates, &REGION_TAGS))
		.unwrap_or(0);
	candidates.into_iter().nth(index)
}

fn first_tagged(candidates: &[Marker], tags: &[&str]) -> Option<usize> {
	candidates
		.iter()
		.position(|c| tags.contains(&c.class.as_str()) || tags.contains(&c.addresstype.as_str()))
}
