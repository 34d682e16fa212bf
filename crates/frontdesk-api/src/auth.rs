// Local (username/password) authentication
//
// The content API issues a bearer token from `POST /api/auth/local`.
// A response only counts as a login when it carries both the token and
// the user object; anything else is an authentication error.

use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::client::CmsClient;
use crate::error::Error;

/// The authenticated user as reported by the identity endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Successful login: the issued bearer token and its user.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub jwt: SecretString,
    pub user: AuthUser,
}

#[derive(Deserialize)]
struct RawLogin {
    #[serde(default)]
    jwt: Option<String>,
    #[serde(default)]
    user: Option<AuthUser>,
}

impl CmsClient {
    /// Exchange credentials for a bearer token.
    ///
    /// `POST /api/auth/local` with `{"identifier": ..., "password": ...}`
    pub async fn login(&self, identifier: &str, password: &SecretString) -> Result<LoginResponse, Error> {
        let url = self.api_url("auth/local")?;
        debug!("logging in at {}", url);

        let resp = self
            .http()
            .request(Method::POST, url)
            .json(&json!({
                "identifier": identifier,
                "password": password.expose_secret(),
            }))
            .send()
            .await
            .map_err(Error::Transport)?;

        let body = Self::check_status(resp)
            .await
            .map_err(|e| match e {
                Error::Api { status, message, .. } => Error::Authentication {
                    message: format!("login failed (HTTP {status}): {message}"),
                },
                other => other,
            })?;

        let raw: RawLogin = serde_json::from_str(&body).map_err(|e| Error::Authentication {
            message: format!("unreadable login response: {e}"),
        })?;

        match (raw.jwt, raw.user) {
            (Some(jwt), Some(user)) if !jwt.is_empty() => {
                debug!(user = %user.username, "login successful");
                Ok(LoginResponse {
                    jwt: SecretString::from(jwt),
                    user,
                })
            }
            _ => Err(Error::Authentication {
                message: "login response missing token or user".into(),
            }),
        }
    }
}
