//! Places-style structured API source.
//!
//! A text search returns place ids page by page; each id is then resolved with
//! a details request, which is the only place the website field is exposed.

use crate::domain::model::{RawCategory, RawListing};
use crate::domain::ports::SourceAdapter;
use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::validate_url;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

pub const PLACES_SOURCE: &str = "google_places_api";
pub const API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";
pub const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY_HERE";

pub const DEFAULT_SEARCH_URL: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";
pub const DEFAULT_DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";

/// The API rejects a page token that is used too soon after it was issued.
pub const PAGE_TOKEN_DELAY: Duration = Duration::from_secs(2);

const DETAIL_FIELDS: &str =
    "name,formatted_address,website,formatted_phone_number,types,rating,user_ratings_total";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceSummary>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceSummary {
    place_id: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<PlaceDetails>,
}

#[derive(Debug, Deserialize)]
struct PlaceDetails {
    name: Option<String>,
    formatted_address: Option<String>,
    website: Option<String>,
    formatted_phone_number: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    rating: Option<f64>,
    user_ratings_total: Option<u64>,
}

pub struct PlacesApiAdapter {
    client: Client,
    api_key: String,
    search_url: String,
    details_url: String,
    page_delay: Duration,
}

impl fmt::Debug for PlacesApiAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacesApiAdapter")
            .field("api_key", &"<redacted>")
            .field("search_url", &self.search_url)
            .field("details_url", &self.details_url)
            .field("page_delay", &self.page_delay)
            .finish()
    }
}

impl PlacesApiAdapter {
    /// Fails with a configuration error when the key is blank or still the placeholder.
    pub fn new(api_key: &str) -> Result<Self> {
        let api_key = api_key.trim();
        if api_key.is_empty() || api_key == PLACEHOLDER_API_KEY {
            return Err(ScoutError::config(format!(
                "Places API key not found. Set {} or pass an explicit key",
                API_KEY_ENV
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
            search_url: DEFAULT_SEARCH_URL.to_string(),
            details_url: DEFAULT_DETAILS_URL.to_string(),
            page_delay: PAGE_TOKEN_DELAY,
        })
    }

    pub fn from_env() -> Result<Self> {
        let key = std::env::var(API_KEY_ENV).map_err(|_| ScoutError::MissingConfigError {
            field: API_KEY_ENV.to_string(),
        })?;
        Self::new(&key)
    }

    pub fn with_endpoints(mut self, search_url: &str, details_url: &str) -> Result<Self> {
        validate_url("places.search_url", search_url)?;
        validate_url("places.details_url", details_url)?;
        self.search_url = search_url.to_string();
        self.details_url = details_url.to_string();
        Ok(self)
    }

    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    async fn place_details(&self, place_id: &str, location: &str) -> Result<Option<RawListing>> {
        let response = self
            .client
            .get(&self.details_url)
            .query(&[
                ("place_id", place_id),
                ("key", self.api_key.as_str()),
                ("fields", DETAIL_FIELDS),
            ])
            .send()
            .await?
            .error_for_status()?;

        let details: DetailsResponse = response.json().await?;
        if details.status != "OK" {
            tracing::debug!("Details for {} returned status {}", place_id, details.status);
            return Ok(None);
        }
        let Some(place) = details.result else {
            tracing::debug!("Details for {} had no result body", place_id);
            return Ok(None);
        };

        Ok(Some(RawListing {
            name: place.name,
            address: place.formatted_address,
            website: place.website,
            phone: place.formatted_phone_number,
            category: RawCategory::Types(place.types),
            location: Some(location.to_string()),
            source: PLACES_SOURCE.to_string(),
            rating: place.rating,
            reviews: place.user_ratings_total,
            place_id: Some(place_id.to_string()),
        }))
    }
}

#[async_trait]
impl SourceAdapter for PlacesApiAdapter {
    fn name(&self) -> &str {
        PLACES_SOURCE
    }

    async fn search(
        &self,
        query: &str,
        location: &str,
        max_results: usize,
    ) -> Result<Vec<RawListing>> {
        tracing::info!("🔎 Searching Places API: {} in {}", query, location);

        let text_query = format!("{} {}", query, location);
        let mut listings = Vec::new();
        let mut page_token: Option<String> = None;

        while listings.len() < max_results {
            let mut request = self.client.get(&self.search_url).query(&[
                ("query", text_query.as_str()),
                ("key", self.api_key.as_str()),
                ("type", "establishment"),
            ]);

            if let Some(token) = &page_token {
                tokio::time::sleep(self.page_delay).await;
                request = request.query(&[("pagetoken", token.as_str())]);
            }

            let response = request.send().await?.error_for_status()?;
            let page: SearchResponse = response.json().await?;

            if page.status != "OK" {
                let err = ScoutError::UpstreamError {
                    source_name: PLACES_SOURCE.to_string(),
                    status: page.status,
                };
                tracing::warn!("⚠️ {} (keeping {} results)", err, listings.len());
                break;
            }

            for place in page.results {
                if listings.len() >= max_results {
                    break;
                }
                match self.place_details(&place.place_id, location).await {
                    Ok(Some(listing)) => listings.push(listing),
                    Ok(None) => {}
                    Err(e) => {
                        tracing::warn!("Dropping place {}: {}", place.place_id, e);
                    }
                }
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }

        tracing::info!("Found {} businesses for '{}'", listings.len(), query);
        Ok(listings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_missing_and_placeholder_keys() {
        let err = PlacesApiAdapter::new("").unwrap_err();
        assert!(err.is_fatal());
        let err = PlacesApiAdapter::new(PLACEHOLDER_API_KEY).unwrap_err();
        assert!(err.is_fatal());
        assert!(PlacesApiAdapter::new("real-key").is_ok());
    }

    #[test]
    fn test_debug_redacts_key() {
        let adapter = PlacesApiAdapter::new("secret-key-123").unwrap();
        let debug = format!("{:?}", adapter);
        assert!(!debug.contains("secret-key-123"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_custom_endpoints_are_validated() {
        let adapter = PlacesApiAdapter::new("key").unwrap();
        assert!(adapter.with_endpoints("not a url", "http://x").is_err());
    }

    #[test]
    fn test_details_payload_parses() {
        let body = serde_json::json!({
            "status": "OK",
            "result": {
                "name": "City Plumbing Services",
                "formatted_address": "3 Smithfield, Dublin 7",
                "formatted_phone_number": "+353 86 123 4567",
                "types": ["plumber", "point_of_interest"],
                "rating": 4.0,
                "user_ratings_total": 23
            }
        });
        let parsed: DetailsResponse = serde_json::from_value(body).unwrap();
        let place = parsed.result.unwrap();
        assert!(place.website.is_none());
        assert_eq!(place.types.len(), 2);
        assert_eq!(place.user_ratings_total, Some(23));
    }
}
