//! reqwest-backed [`TransportChannel`] for the AniList GraphQL endpoint.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use url::Url;

use super::error::TransportError;
use super::types::GraphQLResponse;
use crate::traits::TransportChannel;

/// Public AniList GraphQL endpoint.
pub const API_URL: &str = "https://graphql.anilist.co";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_RETRIES: u32 = 2;
const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_millis(500);

/// Upper bound for a server-provided `Retry-After`.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(30);

/// HTTP transport posting `{query, variables}` to one fixed endpoint.
///
/// Transient failures (connection errors, timeouts, 429, 5xx) are retried
/// with linear backoff; everything else is returned on the first attempt.
/// Cloning is cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    endpoint: Url,
    max_retries: u32,
    retry_backoff: Duration,
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    endpoint: Option<Url>,
    timeout: Duration,
    max_retries: u32,
    retry_backoff: Duration,
    user_agent: Option<String>,
}

impl HttpTransportBuilder {
    fn new() -> Self {
        Self {
            endpoint: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
            user_agent: None,
        }
    }

    /// Overrides the endpoint (config, or wiremock in tests).
    #[must_use]
    pub fn endpoint(mut self, url: Url) -> Self {
        self.endpoint = Some(url);
        self
    }

    /// Per-request timeout (default: 10s).
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Retries after the first attempt for transient failures (default: 2).
    #[must_use]
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    /// Base backoff, multiplied by the attempt number (default: 500ms).
    #[must_use]
    pub fn retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Builds the transport.
    ///
    /// # Errors
    ///
    /// Fails if the reqwest client cannot be built.
    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let endpoint = match self.endpoint {
            Some(url) => url,
            None => Url::parse(API_URL)
                .map_err(|e| TransportError::Malformed(format!("invalid default endpoint: {e}")))?,
        };

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("fl8ma/{}", env!("CARGO_PKG_VERSION")));

        let http = Client::builder()
            .user_agent(user_agent)
            .timeout(self.timeout)
            .build()?;

        Ok(HttpTransport {
            http,
            endpoint,
            max_retries: self.max_retries,
            retry_backoff: self.retry_backoff,
        })
    }
}

impl HttpTransport {
    #[must_use]
    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::new()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// One POST round trip, without retries.
    ///
    /// On failure also returns the server's `Retry-After` hint, if any.
    async fn post_once(
        &self,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, (TransportError, Option<Duration>)> {
        let resp = self
            .http
            .post(self.endpoint.clone())
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| (TransportError::from(e), None))?;

        let status = resp.status();
        let retry_after = retry_after(resp.headers());
        let text = resp
            .text()
            .await
            .map_err(|e| (TransportError::from(e), None))?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "AniList API error");
            // AniList reports query errors (including unknown ids) as a
            // GraphQL envelope with a non-2xx status.
            if let Ok(envelope) = serde_json::from_str::<GraphQLResponse<serde_json::Value>>(&text)
            {
                if !envelope.errors.is_empty()
                    && status.is_client_error()
                    && status != StatusCode::TOO_MANY_REQUESTS
                {
                    return Err((service_error(Some(status.as_u16()), envelope), None));
                }
            }
            return Err((
                TransportError::Status {
                    status: status.as_u16(),
                    message: text,
                },
                retry_after,
            ));
        }

        tracing::debug!(status = %status, "AniList response received");
        let envelope: GraphQLResponse<serde_json::Value> = serde_json::from_str(&text)
            .map_err(|e| (TransportError::Malformed(e.to_string()), None))?;

        if !envelope.errors.is_empty() {
            return Err((service_error(None, envelope), None));
        }

        envelope
            .data
            .ok_or_else(|| (TransportError::Malformed("response has no data".into()), None))
    }
}

fn service_error(
    status: Option<u16>,
    envelope: GraphQLResponse<serde_json::Value>,
) -> TransportError {
    let status = status.or_else(|| envelope.errors.iter().find_map(|e| e.status));
    TransportError::Service {
        status,
        messages: envelope.errors.into_iter().map(|e| e.message).collect(),
    }
}

/// `Retry-After` in delta-seconds form, capped at [`MAX_RETRY_AFTER`].
fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    let secs: u64 = headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()?;
    Some(Duration::from_secs(secs).min(MAX_RETRY_AFTER))
}

impl TransportChannel for HttpTransport {
    async fn send(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<serde_json::Value, TransportError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let mut attempt = 0u32;
        loop {
            tracing::debug!(endpoint = %self.endpoint, attempt, "AniList GraphQL request");
            match self.post_once(&body).await {
                Ok(data) => return Ok(data),
                Err((e, hint)) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    let delay = hint.unwrap_or_else(|| self.retry_backoff.saturating_mul(attempt));
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "transient AniList failure, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err((e, _)) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::header::HeaderValue;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn transport_for(server: &MockServer) -> HttpTransport {
        HttpTransport::builder()
            .endpoint(Url::parse(&server.uri()).unwrap())
            .timeout(Duration::from_millis(500))
            .max_retries(2)
            .retry_backoff(Duration::from_millis(10))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_send_returns_data_member() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/"))
            .and(header("content-type", "application/json"))
            .and(body_partial_json(serde_json::json!({
                "variables": { "id": 21 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "Media": { "id": 21 } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport_for(&server).await;
        let data = transport
            .send("query ($id: Int) { Media(id: $id) { id } }", serde_json::json!({ "id": 21 }))
            .await
            .unwrap();
        assert_eq!(data["Media"]["id"], 21);
    }

    #[tokio::test]
    async fn test_graphql_errors_become_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "errors": [{ "message": "Not Found.", "status": 404 }],
                "data": { "Media": null }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport_for(&server).await;
        let err = transport
            .send("query { Media { id } }", serde_json::json!({}))
            .await
            .unwrap_err();
        match err {
            TransportError::Service { status, messages } => {
                assert_eq!(status, Some(404));
                assert_eq!(messages, vec!["Not Found."]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_errors_in_success_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "errors": [{ "message": "Cannot query field \"foo\"" }],
                "data": null
            })))
            .mount(&server)
            .await;

        let transport = transport_for(&server).await;
        let err = transport
            .send("query { foo }", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Service { status: None, .. }));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport_for(&server).await;
        let err = transport
            .send("query { Page { media { id } } }", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_server_error_retried_then_succeeds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "Page": { "media": [] } }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport_for(&server).await;
        let data = transport
            .send("query { Page { media { id } } }", serde_json::json!({}))
            .await
            .unwrap();
        assert!(data["Page"]["media"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(3)
            .mount(&server)
            .await;

        let transport = transport_for(&server).await;
        let err = transport
            .send("query { Page { media { id } } }", serde_json::json!({}))
            .await
            .unwrap_err();
        match err {
            TransportError::Status { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "boom");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_client_error_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad request"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = transport_for(&server).await;
        let err = transport
            .send("query", serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, TransportError::Status { status: 400, .. }));
    }

    #[test]
    fn test_retry_after_parsing_and_cap() {
        let mut headers = HeaderMap::new();
        assert_eq!(retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static("2"));
        assert_eq!(retry_after(&headers), Some(Duration::from_secs(2)));

        headers.insert(RETRY_AFTER, HeaderValue::from_static("120"));
        assert_eq!(retry_after(&headers), Some(MAX_RETRY_AFTER));

        // HTTP-date form is not supported; the regular backoff applies.
        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(retry_after(&headers), None);
    }

    #[tokio::test]
    async fn test_rate_limit_honors_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": { "ok": true }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::builder()
            .endpoint(Url::parse(&server.uri()).unwrap())
            .max_retries(1)
            .retry_backoff(Duration::from_millis(1))
            .build()
            .unwrap();
        let started = std::time::Instant::now();
        let data = transport
            .send("query", serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(data["ok"], true);
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_timeout_is_transient_and_bounded() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "data": {} }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::builder()
            .endpoint(Url::parse(&server.uri()).unwrap())
            .timeout(Duration::from_millis(50))
            .max_retries(1)
            .retry_backoff(Duration::from_millis(1))
            .build()
            .unwrap();
        let err = transport
            .send("query", serde_json::json!({}))
            .await
            .unwrap_err();
        match err {
            TransportError::Http(e) => assert!(e.is_timeout()),
            other => panic!("unexpected {other:?}"),
        }
    }
}
