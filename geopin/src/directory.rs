//! Which location keys belong to which entity.
//!
//! The directory is read from a relation index:
//! `{"index":[{"id":1,"datesLocations":{"osaka-japan":["28-01-2020"]}}]}`.
//! Only the keys of `datesLocations` are used.

use crate::config::main::is_url;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::{
	collections::{BTreeMap, BTreeSet, HashMap},
	path::Path,
	time::Duration,
};
use tokio::time::sleep;

/// Retry policy for fetching the relation index over http.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
	pub attempts: u32,
	pub delay: Duration,
	pub timeout: Duration,
}

impl Default for FetchPolicy {
	fn default() -> Self {
		Self {
			attempts: 20,
			delay: Duration::from_secs(2),
			timeout: Duration::from_secs(1),
		}
	}
}

#[derive(Debug, Deserialize)]
struct RelationIndex {
	index: Vec<Relation>,
}

#[derive(Debug, Deserialize)]
struct Relation {
	id: u64,
	#[serde(rename = "datesLocations", default)]
	dates_locations: HashMap<String, Vec<String>>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LocationDirectory {
	entities: BTreeMap<u64, Vec<String>>,
}

impl LocationDirectory {
	pub fn from_json(text: &str) -> Result<Self> {
		let relations: RelationIndex = serde_json::from_str(text).context("parsing relation index")?;

		let mut entities: BTreeMap<u64, BTreeSet<String>> = BTreeMap::new();
		for relation in relations.index {
			entities
				.entry(relation.id)
				.or_default()
				.extend(relation.dates_locations.into_keys());
		}

		Ok(Self {
			entities: entities
				.into_iter()
				.map(|(id, keys)| (id, keys.into_iter().collect()))
				.collect(),
		})
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).with_context(|| format!("reading relation index {path:?}"))?;
		Self::from_json(&text).with_context(|| format!("loading relation index {path:?}"))
	}

	/// Fetches the index, trying again after `policy.delay` whenever a request
	/// fails, times out or returns something that is not a relation index.
	pub async fn from_url(url: &str, policy: FetchPolicy) -> Result<Self> {
		let client = reqwest::Client::builder()
			.timeout(policy.timeout)
			.build()
			.context("building http client")?;

		let mut last_error = None;
		for attempt in 1..=policy.attempts {
			match fetch(&client, url).await {
				Ok(directory) => {
					log::info!("loaded relation index from {url} with {} entities", directory.len());
					return Ok(directory);
				}
				Err(err) => {
					log::warn!("attempt {attempt}/{} to load {url} failed: {err:#}", policy.attempts);
					last_error = Some(err);
				}
			}
			if attempt < policy.attempts {
				sleep(policy.delay).await;
			}
		}

		match last_error {
			Some(err) => Err(err.context(format!("failed to fetch {url} after {} attempts", policy.attempts))),
			None => bail!("failed to fetch {url}: no attempts allowed"),
		}
	}

	/// Loads from an http(s) URL or a local file.
	pub async fn load(source: &str) -> Result<Self> {
		if is_url(source) {
			Self::from_url(source, FetchPolicy::default()).await
		} else {
			Self::from_path(Path::new(source))
		}
	}

	/// Distinct location keys of an entity, sorted.
	pub fn locations(&self, id: u64) -> Option<&[String]> {
		self.entities.get(&id).map(Vec::as_slice)
	}

	pub fn len(&self) -> usize {
		self.entities.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<LocationDirectory> {
	let response = client.get(url).send().await?.error_for_status()?;
	let text = response.text().await?;
	LocationDirectory::from_json(&text)
}

#[cfg(test)]
mod tests {
	use super::*;
	use axum::{Router, routing::get};
	use pretty_assertions::assert_eq;
	use tokio::net::TcpListener;

	const INDEX: &str = r#"{"index":[
		{"id":1,"datesLocations":{"osaka-japan":["28-01-2020"],"london-uk":["01-02-2020","02-02-2020"]}},
		{"id":2,"datesLocations":{}},
		{"id":1,"datesLocations":{"osaka-japan":["29-01-2020"],"lima-peru":["03-03-2020"]}}
	]}"#;

	#[test]
	fn keys_are_sorted_and_distinct() -> Result<()> {
		let directory = LocationDirectory::from_json(INDEX)?;
		assert_eq!(directory.len(), 2);
		assert_eq!(
			directory.locations(1).unwrap(),
			["lima-peru", "london-uk", "osaka-japan"]
		);
		assert!(directory.locations(2).unwrap().is_empty());
		assert_eq!(directory.locations(3), None);
		Ok(())
	}

	#[test]
	fn rejects_other_json() {
		assert!(LocationDirectory::from_json(r#"{"relations":[]}"#).is_err());
		assert!(LocationDirectory::from_json("[").is_err());
	}

	#[test]
	fn loads_the_test_file() -> Result<()> {
		let directory = LocationDirectory::from_path(Path::new("../testdata/relations.json"))?;
		assert_eq!(directory.locations(1).unwrap(), ["london-uk", "osaka-japan"]);
		Ok(())
	}

	async fn serve(router: Router) -> String {
		let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
		let addr = listener.local_addr().unwrap();
		tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
		format!("http://{addr}/api/relation")
	}

	fn quick_policy(attempts: u32) -> FetchPolicy {
		FetchPolicy {
			attempts,
			delay: Duration::from_millis(10),
			timeout: Duration::from_millis(500),
		}
	}

	#[tokio::test]
	async fn loads_from_url() -> Result<()> {
		let url = serve(Router::new().route("/api/relation", get(|| async { INDEX }))).await;
		let directory = LocationDirectory::from_url(&url, quick_policy(3)).await?;
		assert_eq!(directory.len(), 2);
		Ok(())
	}

	#[tokio::test]
	async fn gives_up_after_the_last_attempt() {
		let url = serve(Router::new().route("/api/relation", get(|| async { "not json" }))).await;
		let err = LocationDirectory::from_url(&url, quick_policy(3)).await.unwrap_err();
		assert!(err.to_string().contains("after 3 attempts"), "{err}");
	}
}
