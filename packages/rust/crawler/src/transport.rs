//! Single-shot HTTP GET with bounded, manually followed redirects.
//!
//! Redirects are followed here instead of by reqwest so the hop limit and the
//! "too many redirects" failure are explicit. There are no retries, no backoff
//! and no request timeout: one call is one logical operation.

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, LOCATION};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use gradiomd_shared::{AppConfig, GradioMdError, Result};

/// Media type the GitHub REST API expects.
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// How much of an error response body is quoted in the error message.
const ERROR_BODY_PREVIEW_CHARS: usize = 300;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Headers and limits applied to every request.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// User-Agent header.
    pub user_agent: String,
    /// Accept header.
    pub accept: String,
    /// Sent as `Authorization: Bearer <token>` when present.
    pub bearer_token: Option<String>,
    /// Redirect hops followed before giving up.
    pub max_redirects: usize,
}

impl TransportOptions {
    /// Build options from the app config, reading the token from the environment.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            user_agent: config.fetch.user_agent.clone(),
            accept: GITHUB_ACCEPT.to_string(),
            bearer_token: config.repository.resolve_token(),
            max_redirects: config.fetch.max_redirects,
        }
    }
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// RawResponse
// ---------------------------------------------------------------------------

/// Final response after redirects.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// URL that produced this response (after redirects).
    pub url: Url,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Turn a non-2xx response into a network error, quoting the body.
    fn into_success(self) -> Result<Self> {
        if self.is_success() {
            return Ok(self);
        }
        let preview: String = self.body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect();
        Err(GradioMdError::Network(format!(
            "request failed ({}) for {}. {}",
            self.status.as_u16(),
            self.url,
            preview.trim()
        )))
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// Cheap-to-clone HTTP GET capability shared by the browser and the workers.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    max_redirects: usize,
}

impl Transport {
    /// Create a transport; fails only if the headers or the TLS client cannot be built.
    pub fn new(opts: &TransportOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let accept = HeaderValue::from_str(&opts.accept)
            .map_err(|e| GradioMdError::config(format!("invalid Accept header: {e}")))?;
        headers.insert(ACCEPT, accept);

        if let Some(token) = &opts.bearer_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                GradioMdError::config("token contains characters not allowed in an HTTP header")
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(opts.user_agent.as_str())
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| GradioMdError::Network(format!("failed to build HTTP client: {e}")))?;

        debug!(
            authenticated = opts.bearer_token.is_some(),
            max_redirects = opts.max_redirects,
            "HTTP transport ready"
        );

        Ok(Self {
            client,
            max_redirects: opts.max_redirects,
        })
    }

    /// GET `url`, following up to `max_redirects` redirects.
    ///
    /// Any status is returned as-is except a 3xx with a `Location` header,
    /// which is followed. Exceeding the hop limit is an error.
    pub async fn get(&self, url: &Url) -> Result<RawResponse> {
        let mut current = url.clone();
        let mut hops = 0usize;

        loop {
            let response = self
                .client
                .get(current.clone())
                .send()
                .await
                .map_err(|e| GradioMdError::Network(format!("{current}: {e}")))?;

            let status = response.status();
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);

            if let (true, Some(location)) = (status.is_redirection(), location) {
                if hops >= self.max_redirects {
                    return Err(GradioMdError::Network(format!("too many redirects for {url}")));
                }
                let next = current.join(&location).map_err(|e| {
                    GradioMdError::Network(format!(
                        "{current}: invalid redirect location '{location}': {e}"
                    ))
                })?;
                debug!(from = %current, to = %next, status = status.as_u16(), "following redirect");
                current = next;
                hops += 1;
                continue;
            }

            let headers = response.headers().clone();
            let body = response.text().await.map_err(|e| {
                GradioMdError::Network(format!("{current}: failed to read body: {e}"))
            })?;

            return Ok(RawResponse {
                url: current,
                status,
                headers,
                body,
            });
        }
    }

    /// GET `url` and return the body, failing on any non-2xx final status.
    pub async fn get_text(&self, url: &Url) -> Result<String> {
        Ok(self.get(url).await?.into_success()?.body)
    }

    /// GET `url` and decode the JSON body, failing on any non-2xx final status.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T> {
        let response = self.get(url).await?.into_success()?;
        serde_json::from_str(&response.body)
            .map_err(|e| GradioMdError::parse(format!("invalid JSON from {}: {e}", response.url)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options() -> TransportOptions {
        TransportOptions {
            user_agent: "gradio-md-test".into(),
            accept: GITHUB_ACCEPT.into(),
            bearer_token: None,
            max_redirects: 5,
        }
    }

    fn url(server: &MockServer, p: &str) -> Url {
        Url::parse(&format!("{}{p}", server.uri())).unwrap()
    }

    #[tokio::test]
    async fn get_text_returns_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/guides/intro.md"))
            .and(header("accept", GITHUB_ACCEPT))
            .and(header("user-agent", "gradio-md-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("# Intro\n"))
            .mount(&server)
            .await;

        let transport = Transport::new(&options()).unwrap();
        let body = transport.get_text(&url(&server, "/guides/intro.md")).await.unwrap();
        assert_eq!(body, "# Intro\n");
    }

    #[tokio::test]
    async fn follows_relative_redirects_up_to_the_limit() {
        let server = MockServer::start().await;
        for hop in 0..5 {
            let next = if hop == 4 {
                "/final".to_string()
            } else {
                format!("/hop/{}", hop + 1)
            };
            Mock::given(path(format!("/hop/{hop}")))
                .respond_with(ResponseTemplate::new(302).insert_header("Location", next.as_str()))
                .mount(&server)
                .await;
        }
        Mock::given(path("/final"))
            .respond_with(ResponseTemplate::new(200).set_body_string("done"))
            .mount(&server)
            .await;

        let transport = Transport::new(&options()).unwrap();
        let response = transport.get(&url(&server, "/hop/0")).await.unwrap();
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.body, "done");
        assert_eq!(response.url.path(), "/final");
    }

    #[tokio::test]
    async fn redirect_loop_fails_after_limit() {
        let server = MockServer::start().await;
        Mock::given(path("/loop"))
            .respond_with(ResponseTemplate::new(301).insert_header("Location", "/loop"))
            .mount(&server)
            .await;

        let transport = Transport::new(&options()).unwrap();
        let err = transport.get(&url(&server, "/loop")).await.unwrap_err();
        assert!(err.to_string().contains("too many redirects"), "{err}");

        // The original request plus five followed hops.
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 6);
    }

    #[tokio::test]
    async fn redirect_without_location_is_returned_as_is() {
        let server = MockServer::start().await;
        Mock::given(path("/moved"))
            .respond_with(ResponseTemplate::new(304))
            .mount(&server)
            .await;

        let transport = Transport::new(&options()).unwrap();
        let response = transport.get(&url(&server, "/moved")).await.unwrap();
        assert_eq!(response.status.as_u16(), 304);
        assert!(transport.get_text(&url(&server, "/moved")).await.is_err());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error_with_body_preview() {
        let server = MockServer::start().await;
        let long_body = format!("rate limited {}", "x".repeat(1_000));
        Mock::given(path("/repos/gradio-app/gradio"))
            .respond_with(ResponseTemplate::new(403).set_body_string(long_body))
            .mount(&server)
            .await;

        let transport = Transport::new(&options()).unwrap();
        let err = transport
            .get_text(&url(&server, "/repos/gradio-app/gradio"))
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("request failed (403)"), "{msg}");
        assert!(msg.contains("rate limited"));
        assert!(msg.len() < 500, "body preview should be truncated");
    }

    #[tokio::test]
    async fn bearer_token_is_sent_when_configured() {
        let server = MockServer::start().await;
        Mock::given(path("/private"))
            .and(header("authorization", "Bearer s3cret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let anonymous = Transport::new(&options()).unwrap();
        assert!(anonymous.get_text(&url(&server, "/private")).await.is_err());

        let authed = Transport::new(&TransportOptions {
            bearer_token: Some("s3cret".into()),
            ..options()
        })
        .unwrap();
        assert_eq!(authed.get_text(&url(&server, "/private")).await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn get_json_reports_parse_errors() {
        let server = MockServer::start().await;
        Mock::given(path("/broken"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let transport = Transport::new(&options()).unwrap();
        let err = transport
            .get_json::<serde_json::Value>(&url(&server, "/broken"))
            .await
            .unwrap_err();
        assert!(matches!(err, GradioMdError::Parse { .. }));
    }

    #[test]
    fn options_from_default_config() {
        let opts = TransportOptions::from_config(&AppConfig::default());
        assert_eq!(opts.user_agent, "gradio-guides-aggregator");
        assert_eq!(opts.accept, GITHUB_ACCEPT);
        assert_eq!(opts.max_redirects, 5);
    }
}
