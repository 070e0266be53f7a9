//! Wikipedia API client
//!
//! Talks to the MediaWiki Action API (`/w/api.php`, `formatversion=2`):
//! - search: `list=search` → ordered page titles
//! - summary: `prop=extracts|pageprops` → plain-text intro of one exact title,
//!   redirects followed, disambiguation pages flagged
//!
//! Requests carry a descriptive User-Agent as required by Wikimedia's API
//! etiquette. Rate limiting and request timeout are both opt-in.

use async_trait::async_trait;
use serde::de::IgnoredAny;
use serde::Deserialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::config::WikipediaConfig;
use crate::services::encyclopedia::{Encyclopedia, LookupError};

/// Error body returned by the Action API with HTTP 200
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    info: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    query: Option<T>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    extract: Option<String>,
    pageprops: Option<PageProps>,
}

#[derive(Debug, Deserialize)]
struct PageProps {
    disambiguation: Option<IgnoredAny>,
}

/// Spaces Wikipedia requests `spacing` apart
///
/// Holds the earliest instant the next request may leave. Callers queue on the
/// mutex, so concurrent lookups are released one slot at a time.
struct RequestThrottle {
    spacing: Duration,
    next_slot: Mutex<Option<Instant>>,
}

impl RequestThrottle {
    fn new(spacing_ms: u64) -> Self {
        Self {
            spacing: Duration::from_millis(spacing_ms),
            next_slot: Mutex::new(None),
        }
    }

    async fn acquire_slot(&self) {
        let mut next_slot = self.next_slot.lock().await;

        if let Some(slot) = *next_slot {
            if slot > Instant::now() {
                tracing::debug!(
                    delay_ms = (slot - Instant::now()).as_millis() as u64,
                    "Holding Wikipedia request for throttle slot"
                );
                tokio::time::sleep_until(slot).await;
            }
        }

        *next_slot = Some(Instant::now() + self.spacing);
    }
}

/// Wikipedia client implementing [`Encyclopedia`]
pub struct WikipediaClient {
    http_client: reqwest::Client,
    api_url: String,
    search_limit: u32,
    throttle: Option<RequestThrottle>,
}

impl WikipediaClient {
    pub fn new(config: &WikipediaConfig) -> Result<Self, LookupError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| LookupError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_url: config.api_url.clone(),
            search_limit: config.search_limit,
            throttle: config.rate_limit_ms.map(RequestThrottle::new),
        })
    }

    /// Issue one Action API query and unwrap its `query` object
    async fn query<T>(&self, params: &[(&str, &str)]) -> Result<T, LookupError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if let Some(throttle) = &self.throttle {
            throttle.acquire_slot().await;
        }

        tracing::debug!(url = %self.api_url, params = ?params, "Querying Wikipedia API");

        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[("action", "query"), ("format", "json"), ("formatversion", "2")])
            .query(params)
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LookupError::Api(status.as_u16(), error_text));
        }

        let body: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| LookupError::Parse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(LookupError::Rejected {
                code: error.code,
                info: error.info,
            });
        }

        body.query
            .ok_or_else(|| LookupError::Parse("response has no query object".to_string()))
    }
}

#[async_trait]
impl Encyclopedia for WikipediaClient {
    fn name(&self) -> &'static str {
        "wikipedia"
    }

    async fn search(&self, query: &str) -> Result<Vec<String>, LookupError> {
        let limit = self.search_limit.to_string();
        let result: SearchQuery = self
            .query(&[
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", limit.as_str()),
                ("srprop", ""),
            ])
            .await?;

        Ok(result.search.into_iter().map(|hit| hit.title).collect())
    }

    async fn summary(&self, title: &str, sentences: u32) -> Result<String, LookupError> {
        let sentences = sentences.to_string();
        let result: PagesQuery = self
            .query(&[
                ("prop", "extracts|pageprops"),
                ("ppprop", "disambiguation"),
                ("explaintext", "1"),
                ("exsentences", sentences.as_str()),
                ("redirects", "1"),
                ("titles", title),
            ])
            .await?;

        let page = result
            .pages
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NotFound(title.to_string()))?;

        if page.missing || page.invalid {
            return Err(LookupError::NotFound(title.to_string()));
        }

        if page
            .pageprops
            .as_ref()
            .is_some_and(|props| props.disambiguation.is_some())
        {
            return Err(LookupError::Ambiguous(page.title));
        }

        match page.extract.map(|e| e.trim().to_string()) {
            Some(extract) if !extract.is_empty() => {
                tracing::info!(
                    title = %page.title,
                    chars = extract.len(),
                    "Retrieved summary from Wikipedia"
                );
                Ok(extract)
            }
            _ => Err(LookupError::EmptySummary(page.title)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = WikipediaClient::new(&WikipediaConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_throttle_spaces_requests() {
        let throttle = RequestThrottle::new(150);

        let start = Instant::now();
        throttle.acquire_slot().await;
        assert!(start.elapsed() < Duration::from_millis(50));

        throttle.acquire_slot().await;
        throttle.acquire_slot().await;
        assert!(start.elapsed() >= Duration::from_millis(290));
    }

    #[tokio::test]
    async fn test_throttle_idle_gap_needs_no_wait() {
        let throttle = RequestThrottle::new(100);
        throttle.acquire_slot().await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        let before = Instant::now();
        throttle.acquire_slot().await;
        assert!(before.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_disambiguation_flag_parsed() {
        let body = r#"{"query":{"pages":[{"title":"Mercury","pageprops":{"disambiguation":""}}]}}"#;
        let parsed: ApiResponse<PagesQuery> = serde_json::from_str(body).unwrap();
        let page = &parsed.query.unwrap().pages[0];
        assert!(page.pageprops.as_ref().unwrap().disambiguation.is_some());
    }

    #[test]
    fn test_missing_page_parsed() {
        let body = r#"{"query":{"pages":[{"ns":0,"title":"Zzzq","missing":true}]}}"#;
        let parsed: ApiResponse<PagesQuery> = serde_json::from_str(body).unwrap();
        let page = &parsed.query.unwrap().pages[0];
        assert!(page.missing);
        assert!(page.extract.is_none());
    }
}
