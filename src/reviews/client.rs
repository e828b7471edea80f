//! REST client for the reviews backend.

use super::{ReviewsApi, TokenProvider};
use crate::config::{HttpConfig, build_http_client};
use crate::models::{NewReview, PlaceId, Review, ReviewUpdate};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Reviews backend client.
pub struct ReviewsClient {
    /// Backend base URL.
    base_url: String,
    /// Auth token accessor for authenticated endpoints.
    tokens: Arc<dyn TokenProvider>,
    /// HTTP client.
    client: reqwest::Client,
}

impl ReviewsClient {
    /// Creates a new client.
    #[must_use]
    pub fn new(base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        Self {
            base_url: base_url.into(),
            tokens,
            client: build_http_client(HttpConfig::default()),
        }
    }

    /// Sets HTTP client timeouts.
    #[must_use]
    pub fn with_http_config(mut self, config: HttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        let token = self.tokens.token().ok_or_else(|| Error::ReviewBackend {
            operation: "authorize".to_string(),
            cause: "no active session".to_string(),
        })?;
        Ok(request.bearer_auth(token))
    }

    async fn execute<T: serde::de::DeserializeOwned>(
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T> {
        let response = Self::send(operation, request).await?;
        response.json::<T>().await.map_err(|e| Error::ReviewBackend {
            operation: operation.to_string(),
            cause: format!("decode error: {e}"),
        })
    }

    async fn send(
        operation: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            tracing::error!(operation, error = %e, "reviews request failed");
            Error::Network(format!("reviews {operation}: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(operation, status = %status, body = %body, "reviews backend rejected call");
            return Err(Error::ReviewBackend {
                operation: operation.to_string(),
                cause: format!("HTTP status {status}: {body}"),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl ReviewsApi for ReviewsClient {
    async fn reviews_for_place(&self, place_id: &PlaceId) -> Result<Vec<Review>> {
        let request = self
            .client
            .get(self.url(&format!("reviews/{}", place_id.as_str())));
        Self::execute("reviews_for_place", request).await
    }

    async fn all_reviews(&self) -> Result<Vec<Review>> {
        let request = self.client.get(self.url("reviews"));
        Self::execute("all_reviews", request).await
    }

    async fn my_reviews(&self) -> Result<Vec<Review>> {
        let request = self.authorize(self.client.get(self.url("reviews/mine")))?;
        Self::execute("my_reviews", request).await
    }

    async fn create(&self, review: NewReview) -> Result<Review> {
        review.validate()?;
        let request = self.authorize(self.client.post(self.url("reviews")))?.json(&review);
        Self::execute("create_review", request).await
    }

    async fn update(&self, review_id: &str, update: ReviewUpdate) -> Result<Review> {
        if let Some(rating) = update.rating {
            if !(1..=5).contains(&rating) {
                return Err(Error::InvalidInput(format!(
                    "rating must be 1-5, got {rating}"
                )));
            }
        }
        let request = self
            .authorize(self.client.put(self.url(&format!("reviews/{review_id}"))))?
            .json(&update);
        Self::execute("update_review", request).await
    }

    async fn delete(&self, review_id: &str) -> Result<()> {
        let request =
            self.authorize(self.client.delete(self.url(&format!("reviews/{review_id}"))))?;
        Self::send("delete_review", request).await?;
        Ok(())
    }
}
