use super::Geocoder;
use crate::{config::GeocodingConfig, types::Marker};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::{Client, Url, header::USER_AGENT};
use std::time::Duration;

/// Client for the `/search` endpoint of a Nominatim compatible service.
#[derive(Debug, Clone)]
pub struct Nominatim {
	client: Client,
	search_url: Url,
	user_agent: String,
}

impl Nominatim {
	pub fn new(service_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
		let search_url = Url::parse(&format!("{}/search", service_url.trim_end_matches('/')))
			.with_context(|| format!("invalid geocoding service url '{service_url}'"))?;

		match search_url.scheme() {
			"http" | "https" => (),
			other => bail!("unsupported URL scheme '{other}' in '{service_url}', expected 'http' or 'https'"),
		}

		if user_agent.trim().is_empty() {
			bail!("the geocoding service requires an identifying user agent");
		}

		let client = Client::builder().timeout(timeout).build()?;

		Ok(Self {
			client,
			search_url,
			user_agent: user_agent.to_owned(),
		})
	}

	pub fn from_config(config: &GeocodingConfig) -> Result<Self> {
		Self::new(&config.service_url, &config.user_agent, config.request_timeout())
	}

	pub fn search_url(&self) -> &Url {
		&self.search_url
	}
}

#[async_trait]
impl Geocoder for Nominatim {
	async fn search(&self, query: &str) -> Result<Vec<Marker>> {
		let response = self
			.client
			.get(self.search_url.clone())
			.query(&[("q", query), ("format", "json")])
			.header(USER_AGENT, &self.user_agent)
			.send()
			.await
			.with_context(|| format!("requesting '{}' for query '{query}'", self.search_url))?;

		let status = response.status();
		if !status.is_success() {
			bail!("geocoding service returned status {status} for query '{query}'");
		}

		let body = response.text().await.context("reading geocoding response body")?;
		let candidates: Vec<Marker> =
			serde_json::from_str(&body).with_context(|| format!("parsing geocoding response for query '{query}'"))?;
		Ok(candidates)
	}
}
