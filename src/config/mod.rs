//! Configuration management.

use crate::models::CategoryFilter;
use std::time::Duration;

/// Keyword probes issued as text searches during a fan-out fetch.
///
/// Names the nearby endpoint is known to miss in the pilot deployment area.
pub const DEFAULT_KEYWORD_PROBES: &[&str] = &[
    "Federzoni",
    "Supermercado",
    "Shopping",
    "McDonald's",
    "Bella Sushi",
];

/// Secondary categories queried in parallel when the filter is `All`.
pub const DEFAULT_FAN_OUT_CATEGORIES: &[CategoryFilter] = &[
    CategoryFilter::Restaurant,
    CategoryFilter::Supermarket,
    CategoryFilter::Hospital,
    CategoryFilter::Store,
];

/// Main configuration for the aggregation engine.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Debounce window for typed-search autocomplete.
    pub suggestion_debounce: Duration,
    /// Debounce window for viewport-settle events.
    pub viewport_debounce: Duration,
    /// Minimum query length before autocomplete fires.
    pub min_query_len: usize,
    /// Latitude span above which fetching is suppressed and the set cleared.
    pub zoom_threshold_span_lat: f64,
    /// Fixed radius in meters for manual-recenter fetches.
    pub recenter_radius_m: u32,
    /// Radius in meters for ranking fetches.
    pub ranking_radius_m: u32,
    /// Radius in meters biasing autocomplete toward the viewport center.
    pub autocomplete_radius_m: u32,
    /// Default latitude span for the initial and recentered viewport.
    pub default_span_lat: f64,
    /// Default longitude span for the initial and recentered viewport.
    pub default_span_lng: f64,
    /// Latitude/longitude span used when centering on a selected suggestion.
    pub selection_span: f64,
    /// Secondary categories queried in parallel for the `All` filter.
    pub fan_out_categories: Vec<CategoryFilter>,
    /// Keyword probes issued as text searches for the `All` filter.
    pub keyword_probes: Vec<String>,
    /// Autocomplete language hint passed to the provider.
    pub language: Option<String>,
    /// HTTP client settings for the upstream collaborators.
    pub http: HttpConfig,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            suggestion_debounce: Duration::from_millis(300),
            viewport_debounce: Duration::from_millis(800),
            min_query_len: 2,
            zoom_threshold_span_lat: 0.08,
            recenter_radius_m: 3000,
            ranking_radius_m: 5000,
            autocomplete_radius_m: 5000,
            default_span_lat: 0.015,
            default_span_lng: 0.0121,
            selection_span: 0.005,
            fan_out_categories: DEFAULT_FAN_OUT_CATEGORIES.to_vec(),
            keyword_probes: DEFAULT_KEYWORD_PROBES
                .iter()
                .map(ToString::to_string)
                .collect(),
            language: Some("pt-BR".to_string()),
            http: HttpConfig::default(),
        }
    }
}

impl CoreConfig {
    /// Loads the default configuration with environment overrides applied.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(ms) = env_u64("ACCESSMAP_SUGGESTION_DEBOUNCE_MS") {
            self.suggestion_debounce = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("ACCESSMAP_VIEWPORT_DEBOUNCE_MS") {
            self.viewport_debounce = Duration::from_millis(ms);
        }
        if let Some(span) = env_f64("ACCESSMAP_ZOOM_THRESHOLD_SPAN_LAT") {
            self.zoom_threshold_span_lat = span;
        }
        if let Some(m) = env_u64("ACCESSMAP_RECENTER_RADIUS_M") {
            self.recenter_radius_m = u32::try_from(m).unwrap_or(u32::MAX);
        }
        self.http = self.http.with_env_overrides();
        self
    }

    /// Sets the suggestion debounce window.
    #[must_use]
    pub const fn with_suggestion_debounce(mut self, debounce: Duration) -> Self {
        self.suggestion_debounce = debounce;
        self
    }

    /// Sets the viewport debounce window.
    #[must_use]
    pub const fn with_viewport_debounce(mut self, debounce: Duration) -> Self {
        self.viewport_debounce = debounce;
        self
    }

    /// Sets the zoom-gating threshold.
    #[must_use]
    pub const fn with_zoom_threshold(mut self, span_lat: f64) -> Self {
        self.zoom_threshold_span_lat = span_lat;
        self
    }

    /// Sets the keyword probe list.
    #[must_use]
    pub fn with_keyword_probes(mut self, probes: Vec<String>) -> Self {
        self.keyword_probes = probes;
        self
    }

    /// Sets the fan-out category list.
    #[must_use]
    pub fn with_fan_out_categories(mut self, categories: Vec<CategoryFilter>) -> Self {
        self.fan_out_categories = categories;
        self
    }
}

/// HTTP client configuration for the upstream collaborators.
#[derive(Debug, Clone, Copy)]
pub struct HttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl HttpConfig {
    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(timeout_ms) = env_u64("ACCESSMAP_HTTP_TIMEOUT_MS") {
            self.timeout_ms = timeout_ms;
        }
        if let Some(connect_timeout_ms) = env_u64("ACCESSMAP_HTTP_CONNECT_TIMEOUT_MS") {
            self.connect_timeout_ms = connect_timeout_ms;
        }
        self
    }
}

fn env_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok()?.parse().ok()
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok()?.parse().ok()
}

/// Builds an HTTP client for collaborator requests with configured timeouts.
#[must_use]
pub fn build_http_client(config: HttpConfig) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build HTTP client: {err}");
        reqwest::Client::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CoreConfig::default();
        assert_eq!(config.suggestion_debounce, Duration::from_millis(300));
        assert_eq!(config.viewport_debounce, Duration::from_millis(800));
        assert_eq!(config.min_query_len, 2);
        assert_eq!(config.fan_out_categories.len(), 4);
        assert_eq!(config.keyword_probes.len(), 5);
    }

    #[test]
    fn test_builder_overrides() {
        let config = CoreConfig::default()
            .with_zoom_threshold(0.2)
            .with_keyword_probes(vec!["Mercado Central".to_string()]);
        assert!((config.zoom_threshold_span_lat - 0.2).abs() < f64::EPSILON);
        assert_eq!(config.keyword_probes, vec!["Mercado Central"]);
    }
}
