//! Builds the search string sent to the geocoding service.
//!
//! `"osaka-japan"` becomes `"japan, osaka"`: country first, then city, each as
//! space separated words. URL encoding later turns the spaces into `+`.

use crate::types::location_key::{search_words, split_segments};
use std::collections::BTreeMap;

/// Returns `None` if the key has no city/country separator.
pub fn build_query(key: &str, manual_fixes: &BTreeMap<String, String>) -> Option<String> {
	let (city, country) = split_segments(key)?;
	let city = search_words(city).join(" ");
	let country = search_words(country).join(" ");
	if city.is_empty() || country.is_empty() {
		return None;
	}
	Some(apply_manual_fixes(&format!("{country}, {city}"), manual_fixes))
}

/// Replaces known problematic phrases with forms the service resolves correctly.
pub fn apply_manual_fixes(query: &str, manual_fixes: &BTreeMap<String, String>) -> String {
	manual_fixes
		.iter()
		.fold(query.to_owned(), |query, (from, to)| query.replace(from.as_str(), to))
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::GeocodingConfig;
	use rstest::rstest;

	#[rstest]
	#[case("osaka-japan", Some("japan, osaka"))]
	#[case("north_carolina-usa", Some("usa, north carolina"))]
	#[case("los_angeles-usa", Some("usa, la"))]
	#[case("saint_gallen-switzerland", Some("switzerland, saint gallen"))]
	#[case("nowhere", None)]
	#[case("__-usa", None)]
	fn builds_country_first_queries(#[case] key: &str, #[case] expected: Option<&str>) {
		let fixes = GeocodingConfig::default().manual_fixes;
		assert_eq!(build_query(key, &fixes).as_deref(), expected);
	}

	#[test]
	fn without_fixes_the_query_is_untouched() {
		assert_eq!(
			build_query("los_angeles-usa", &BTreeMap::new()).as_deref(),
			Some("usa, los angeles")
		);
	}
}
