//! Geocode Module
//!
//! Proxies address autocomplete to the public French address API (BAN) and maps
//! its GeoJSON features to `GeocodeCandidate`s.
//!
//! - `GET /api/addresses/search?q=` - at most ten candidates; queries shorter than
//!   three characters return `[]` without calling the API

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;

use crate::backend::error::BackendError;
use crate::backend::notify::dispatcher::OUTBOUND_TIMEOUT;
use crate::shared::directory::address::{
    is_geocodable, BanFeatureCollection, GeocodeCandidate, GEOCODE_RESULT_LIMIT,
};

/// Client for the address API
#[derive(Clone, Debug)]
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("Falling back to default HTTP client for address search: {}", e);
                reqwest::Client::new()
            });
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Search addresses matching free text
    pub async fn search(&self, query: &str) -> Result<Vec<GeocodeCandidate>, BackendError> {
        let query = query.trim();
        if !is_geocodable(query) {
            return Ok(Vec::new());
        }

        let limit = GEOCODE_RESULT_LIMIT.to_string();
        let response = self
            .client
            .get(format!("{}/search/", self.base_url))
            .query(&[("q", query), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Address API unreachable: {}", e);
                BackendError::upstream("Address search is unavailable")
            })?;

        if !response.status().is_success() {
            tracing::warn!("Address API answered {}", response.status());
            return Err(BackendError::upstream(format!(
                "Address search failed with status {}",
                response.status().as_u16()
            )));
        }

        let collection: BanFeatureCollection = response.json().await.map_err(|e| {
            tracing::warn!("Unreadable address API response: {}", e);
            BackendError::upstream("Address search returned an unreadable response")
        })?;

        Ok(collection
            .features
            .into_iter()
            .take(GEOCODE_RESULT_LIMIT)
            .map(GeocodeCandidate::from)
            .collect())
    }
}

#[derive(Debug, Deserialize)]
pub struct AddressSearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/addresses/search
pub async fn search_addresses(
    State(geocoder): State<Geocoder>,
    Query(params): Query<AddressSearchQuery>,
) -> Result<Json<Vec<GeocodeCandidate>>, BackendError> {
    Ok(Json(geocoder.search(&params.q).await?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_short_query_skips_upstream() {
        let geocoder = Geocoder::new("http://127.0.0.1:9");
        assert!(geocoder.search("ab").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_bad_gateway() {
        let geocoder = Geocoder::new("http://127.0.0.1:9");
        let err = geocoder.search("rue de rivoli").await.unwrap_err();
        assert_eq!(err.status_code(), axum::http::StatusCode::BAD_GATEWAY);
    }
}
