//! Helpers for location keys such as `"osaka-japan"` or `"north_carolina-usa"`.
//!
//! A key is lowercase, joins the words of a multi-word name with `_`, and uses a
//! single `-` between the city segment and the country segment.

/// Splits a key into its city and country segments at the first `-`.
pub fn split_segments(key: &str) -> Option<(&str, &str)> {
	let (city, country) = key.split_once('-')?;
	if city.is_empty() || country.is_empty() {
		return None;
	}
	Some((city, country))
}

/// Lowercases a segment and splits it into alphanumeric search words.
pub fn search_words(segment: &str) -> Vec<String> {
	segment
		.to_lowercase()
		.split(|c: char| !c.is_ascii_alphanumeric())
		.filter(|word| !word.is_empty())
		.map(str::to_owned)
		.collect()
}

/// Formats a key for display: `"north_carolina-usa"` becomes `"North Carolina - USA"`.
pub fn display_label(key: &str) -> String {
	let spaced = key.replace('_', " ");

	let mut title = String::with_capacity(spaced.len());
	let mut capitalize = true;
	for c in spaced.chars() {
		if c == ' ' || c == '-' {
			capitalize = true;
			title.push(c);
		} else if capitalize {
			title.extend(c.to_uppercase());
			capitalize = false;
		} else {
			title.push(c);
		}
	}

	let mut label = title.replace('-', " - ").replace("Usa", "USA");
	if label.ends_with("Uk") {
		label = label.replace("Uk", "UK");
	}
	label
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("osaka-japan", Some(("osaka", "japan")))]
	#[case("north_carolina-usa", Some(("north_carolina", "usa")))]
	#[case("a-b-c", Some(("a", "b-c")))]
	#[case("nowhere", None)]
	#[case("-japan", None)]
	#[case("osaka-", None)]
	fn splits_segments(#[case] key: &str, #[case] expected: Option<(&str, &str)>) {
		assert_eq!(split_segments(key), expected);
	}

	#[test]
	fn search_words_drop_separators() {
		assert_eq!(search_words("north_carolina"), ["north", "carolina"]);
		assert_eq!(search_words("Saint--Gallen "), ["saint", "gallen"]);
		assert_eq!(search_words("b-c"), ["b", "c"]);
		assert!(search_words("__").is_empty());
	}

	#[rstest]
	#[case("osaka-japan", "Osaka - Japan")]
	#[case("north_carolina-usa", "North Carolina - USA")]
	#[case("london-uk", "London - UK")]
	#[case("los_angeles-usa", "Los Angeles - USA")]
	#[case("dunedin-new_zealand", "Dunedin - New Zealand")]
	#[case("", "")]
	fn formats_display_labels(#[case] key: &str, #[case] label: &str) {
		assert_eq!(display_label(key), label);
	}
}
