//! Google Places client.

use super::{LocationProvider, PlacesApi, RawPlace, normalize};
use crate::config::{HttpConfig, build_http_client};
use crate::models::{CategoryFilter, LatLng, Place, Suggestion};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Fields requested on a place-details lookup.
const DETAILS_FIELDS: &str = "name,geometry,formatted_address,types,vicinity,rating";

/// Google Places API client.
pub struct GooglePlacesClient {
    /// API endpoint.
    endpoint: String,
    /// API key.
    api_key: String,
    /// Autocomplete language hint.
    language: Option<String>,
    /// HTTP client.
    client: reqwest::Client,
}

impl GooglePlacesClient {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://maps.googleapis.com/maps/api/place";

    /// Creates a new client with the given API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            language: None,
            client: build_http_client(HttpConfig::default()),
        }
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the autocomplete language hint.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Sets HTTP client timeouts.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    /// Issues a GET against one of the provider endpoints and decodes `T`.
    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let response = self
            .client
            .get(format!("{}/{path}/json", self.endpoint))
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                let error_kind = if e.is_timeout() {
                    "timeout"
                } else if e.is_connect() {
                    "connect"
                } else if e.is_request() {
                    "request"
                } else {
                    "unknown"
                };
                tracing::error!(
                    operation,
                    error = %e,
                    error_kind,
                    "places request failed"
                );
                Error::Upstream {
                    operation: operation.to_string(),
                    cause: format!("{error_kind} error: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(operation, status = %status, "places API returned error status");
            return Err(Error::Upstream {
                operation: operation.to_string(),
                cause: format!("HTTP status {status}"),
            });
        }

        response.json::<T>().await.map_err(|e| Error::Upstream {
            operation: operation.to_string(),
            cause: format!("decode error: {e}"),
        })
    }

    fn location_param(center: LatLng) -> String {
        format!("{},{}", center.lat, center.lng)
    }
}

#[async_trait]
impl PlacesApi for GooglePlacesClient {
    async fn nearby_search(
        &self,
        center: LatLng,
        radius_m: u32,
        category: Option<CategoryFilter>,
    ) -> Result<Vec<Place>> {
        let mut params = vec![
            ("location", Self::location_param(center)),
            ("radius", radius_m.to_string()),
        ];
        if let Some(category) = category {
            params.push(("type", category.as_str().to_string()));
        }
        let response: SearchResponse = self.request("nearby_search", "nearbysearch", &params).await?;
        response.into_places("nearby_search")
    }

    async fn text_search(&self, query: &str, center: LatLng, radius_m: u32) -> Result<Vec<Place>> {
        let params = [
            ("query", query.to_string()),
            ("location", Self::location_param(center)),
            ("radius", radius_m.to_string()),
        ];
        let response: SearchResponse = self.request("text_search", "textsearch", &params).await?;
        response.into_places("text_search")
    }

    async fn autocomplete(
        &self,
        input: &str,
        center: LatLng,
        radius_m: u32,
    ) -> Result<Vec<Suggestion>> {
        let mut params = vec![
            ("input", input.to_string()),
            ("location", Self::location_param(center)),
            ("radius", radius_m.to_string()),
        ];
        if let Some(language) = &self.language {
            params.push(("language", language.clone()));
        }
        let response: AutocompleteResponse =
            self.request("autocomplete", "autocomplete", &params).await?;

        match response.status.as_str() {
            "OK" => Ok(response
                .predictions
                .into_iter()
                .map(RawPrediction::into_suggestion)
                .collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            status => Err(Error::Upstream {
                operation: "autocomplete".to_string(),
                cause: format!("status {status}"),
            }),
        }
    }

    async fn place_details(&self, place_id: &str) -> Result<Place> {
        let params = [
            ("place_id", place_id.to_string()),
            ("fields", DETAILS_FIELDS.to_string()),
        ];
        let response: DetailsResponse = self.request("place_details", "details", &params).await?;

        if response.status != "OK" {
            return Err(Error::Upstream {
                operation: "place_details".to_string(),
                cause: format!("status {}", response.status),
            });
        }
        let mut raw = response.result.ok_or_else(|| Error::Upstream {
            operation: "place_details".to_string(),
            cause: "missing result".to_string(),
        })?;
        // The details endpoint omits place_id when not in the field mask.
        raw.place_id.get_or_insert_with(|| place_id.to_string());

        normalize(raw).ok_or_else(|| Error::Upstream {
            operation: "place_details".to_string(),
            cause: "result missing geometry".to_string(),
        })
    }
}

/// Search response envelope shared by nearby and text search.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<RawPlace>,
}

impl SearchResponse {
    /// Applies the provider status contract: `OK` is success, `ZERO_RESULTS`
    /// is empty success, anything else is failure.
    fn into_places(self, operation: &'static str) -> Result<Vec<Place>> {
        match self.status.as_str() {
            "OK" => Ok(self.results.into_iter().filter_map(normalize).collect()),
            "ZERO_RESULTS" => Ok(Vec::new()),
            status => Err(Error::Upstream {
                operation: operation.to_string(),
                cause: format!("status {status}"),
            }),
        }
    }
}

/// Autocomplete response envelope.
#[derive(Debug, Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<RawPrediction>,
}

/// Raw autocomplete candidate.
#[derive(Debug, Deserialize)]
struct RawPrediction {
    place_id: String,
    #[serde(default)]
    description: String,
    structured_formatting: Option<RawStructuredFormatting>,
}

#[derive(Debug, Deserialize)]
struct RawStructuredFormatting {
    #[serde(default)]
    main_text: String,
    #[serde(default)]
    secondary_text: String,
}

impl RawPrediction {
    fn into_suggestion(self) -> Suggestion {
        let (primary, secondary) = self
            .structured_formatting
            .map_or_else(Default::default, |f| (f.main_text, f.secondary_text));
        Suggestion {
            place_id: self.place_id,
            description: self.description,
            primary_text: primary,
            secondary_text: secondary,
        }
    }
}

/// Details response envelope.
#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<RawPlace>,
}

/// Location provider backed by the host platform's geolocation bridge.
///
/// The mobile shell injects an implementation; this type exists so native
/// test harnesses can run against a fixed coordinate.
pub struct FixedLocationProvider {
    location: LatLng,
}

impl FixedLocationProvider {
    /// Creates a provider that always reports the given coordinate.
    #[must_use]
    pub const fn new(location: LatLng) -> Self {
        Self { location }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_location(&self) -> Result<LatLng> {
        Ok(self.location)
    }
}
