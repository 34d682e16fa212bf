// Content API HTTP client
//
// Wraps `reqwest::Client` with URL construction under `{base}/api/`,
// bearer authorization and envelope unwrapping. Collection endpoints and
// the local auth endpoint are implemented as inherent methods in separate
// files to keep this module focused on transport mechanics.

use std::time::Duration;

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::envelope::{Envelope, ErrorBody};
use crate::error::Error;
use crate::transport::TransportConfig;

/// Raw HTTP client for the hotel content API.
///
/// Every data call takes the bearer token to use explicitly: the token
/// is resolved by the caller per request and never cached here.
#[derive(Debug, Clone)]
pub struct CmsClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl CmsClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the CMS root (e.g. `http://localhost:1337`); the `/api`
    /// prefix is added per call.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout: TransportConfig::default().timeout,
        }
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The CMS base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Client-wide request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Start a request with the bearer header applied.
    pub(crate) fn request(&self, method: Method, url: Url, token: &SecretString) -> RequestBuilder {
        debug!("{method} {url}");
        self.http
            .request(method, url)
            .bearer_auth(token.expose_secret())
    }

    /// Wrap `body` as `{ "data": body }`, the shape every write expects.
    pub(crate) fn with_data<B: Serialize + ?Sized>(builder: RequestBuilder, body: &B) -> RequestBuilder {
        builder.json(&serde_json::json!({ "data": body }))
    }

    /// Send a request and return the parsed envelope plus the raw body.
    pub(crate) async fn send(&self, builder: RequestBuilder) -> Result<(Envelope, String), Error> {
        self.send_within(builder, self.timeout).await
    }

    /// Like [`send`](Self::send) for a request carrying its own `timeout`,
    /// which is what a timeout error reports.
    pub(crate) async fn send_within(
        &self,
        builder: RequestBuilder,
        timeout: Duration,
    ) -> Result<(Envelope, String), Error> {
        let resp = builder
            .send()
            .await
            .map_err(|e| map_transport(e, timeout))?;
        let body = Self::check_status(resp).await?;

        let envelope: Envelope = serde_json::from_str(&body).map_err(|e| {
            let preview = preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;
        Ok((envelope, body))
    }

    /// Send a request whose response body is irrelevant beyond its status.
    pub(crate) async fn send_unit(&self, builder: RequestBuilder) -> Result<(), Error> {
        let resp = builder
            .send()
            .await
            .map_err(|e| map_transport(e, self.timeout))?;
        Self::check_status(resp).await.map(|_| ())
    }

    /// Turn a non-success response into `Error::Api`, otherwise return the body.
    pub(crate) async fn check_status(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status.is_success() {
            return Ok(body);
        }

        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error);
        let (name, message) = match detail {
            Some(d) => (d.name, d.message),
            None => (None, None),
        };
        let message = message.unwrap_or_else(|| match status {
            StatusCode::UNAUTHORIZED => "missing or invalid bearer token".into(),
            StatusCode::FORBIDDEN => "insufficient permissions".into(),
            _ => format!("HTTP {status}: {}", preview(&body)),
        });

        Err(Error::Api {
            status: status.as_u16(),
            message,
            name,
        })
    }
}

fn map_transport(err: reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        Error::Timeout {
            timeout_secs: timeout.as_secs(),
        }
    } else {
        Error::Transport(err)
    }
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> CmsClient {
        CmsClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn api_url_joins_with_single_slashes() {
        let c = client("http://localhost:1337/");
        assert_eq!(
            c.api_url("/guests/4").unwrap().as_str(),
            "http://localhost:1337/api/guests/4"
        );
    }

    #[test]
    fn api_url_keeps_base_path() {
        let c = client("https://cms.example.com/backend");
        assert_eq!(
            c.api_url("rooms").unwrap().as_str(),
            "https://cms.example.com/backend/api/rooms"
        );
    }

    #[test]
    fn preview_respects_char_boundaries() {
        let body = "é".repeat(150);
        assert!(preview(&body).len() <= 200);
    }
}
