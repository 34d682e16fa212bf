// ── Session provider ──
//
// Exchanges username/password for a bearer token at the content API and
// keeps the resulting session. Sessions are made portable as HS256-signed
// tokens with a fixed claim set; a token that does not decode into exactly
// that claim set is rejected.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use frontdesk_api::CmsClient;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;

/// Whether a usable session is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AuthStatus {
    Authenticated,
    Unauthenticated,
}

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    /// User id as reported by the identity endpoint, in string form.
    pub id: String,
    pub name: String,
    pub email: Option<String>,
}

/// An authenticated session: the user and the bearer token issued for them.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: SessionUser,
    pub jwt: SecretString,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Signed, portable form of a [`Session`].
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for SessionToken {
    fn from(raw: String) -> Self {
        Self(raw.trim().to_owned())
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken([REDACTED])")
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SessionClaims {
    sub: String,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    jwt: String,
    iat: i64,
    exp: i64,
}

/// Anything that can report the current session.
///
/// Stores hold an `Arc<dyn SessionSource>` and ask it on every request.
pub trait SessionSource: Send + Sync {
    fn current_session(&self) -> Result<Option<Session>, CoreError>;
}

/// Signs users in against the content API and keeps the current session.
pub struct SessionProvider {
    client: CmsClient,
    secret: SecretString,
    max_age: Duration,
    state: watch::Sender<Option<Arc<Session>>>,
}

impl SessionProvider {
    pub fn new(client: CmsClient, secret: SecretString, max_age: Duration) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            client,
            secret,
            max_age,
            state,
        }
    }

    /// Sign in with username (or email) and password.
    ///
    /// Returns `None` on any failure: rejected credentials, a response
    /// without token or user, or an unreachable API. The reason is logged.
    pub async fn authenticate(&self, username: &str, password: &SecretString) -> Option<Session> {
        let login = match self.client.login(username, password).await {
            Ok(login) => login,
            Err(e) => {
                warn!(username, error = %e, "sign-in failed");
                return None;
            }
        };

        let session = Session {
            user: SessionUser {
                id: login.user.id.to_string(),
                name: login.user.username,
                email: login.user.email,
            },
            jwt: login.jwt,
            expires_at: self.expiry_from(Utc::now()),
        };
        info!(user = %session.user.name, "signed in");
        self.state.send_replace(Some(Arc::new(session.clone())));
        Some(session)
    }

    /// Sign `session` into a portable token.
    pub fn issue_token(&self, session: &Session) -> Result<SessionToken, CoreError> {
        let claims = SessionClaims {
            sub: session.user.id.clone(),
            name: session.user.name.clone(),
            email: session.user.email.clone(),
            jwt: session.jwt.expose_secret().to_owned(),
            iat: Utc::now().timestamp(),
            exp: session.expires_at.timestamp(),
        };
        let key = EncodingKey::from_secret(self.signing_secret()?.as_bytes());
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
            .map(SessionToken)
            .map_err(|e| CoreError::Session {
                message: format!("cannot sign session: {e}"),
            })
    }

    /// Verify a token and make its session current.
    ///
    /// A bad signature, an expired token or an unexpected claim set is an
    /// error and leaves the current session as it was.
    pub fn restore(&self, token: &SessionToken) -> Result<Session, CoreError> {
        let key = DecodingKey::from_secret(self.signing_secret()?.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = jsonwebtoken::decode::<SessionClaims>(token.as_str(), &key, &validation)
            .map_err(|e| CoreError::Session {
                message: format!("invalid session token: {e}"),
            })?
            .claims;

        let expires_at =
            DateTime::from_timestamp(claims.exp, 0).ok_or_else(|| CoreError::Session {
                message: "session expiry out of range".into(),
            })?;
        let session = Session {
            user: SessionUser {
                id: claims.sub,
                name: claims.name,
                email: claims.email,
            },
            jwt: SecretString::from(claims.jwt),
            expires_at,
        };
        debug!(user = %session.user.name, "session restored");
        self.state.send_replace(Some(Arc::new(session.clone())));
        Ok(session)
    }

    pub fn sign_out(&self) {
        if self.state.send_replace(None).is_some() {
            info!("signed out");
        }
    }

    /// The current session, unless there is none or it has expired.
    pub fn current(&self) -> Option<Arc<Session>> {
        let now = Utc::now();
        self.state
            .borrow()
            .as_ref()
            .filter(|s| !s.is_expired(now))
            .map(Arc::clone)
    }

    pub fn status(&self) -> AuthStatus {
        if self.current().is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }

    /// Observe sign-in, restore and sign-out.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Session>>> {
        self.state.subscribe()
    }

    fn signing_secret(&self) -> Result<&str, CoreError> {
        let secret = self.secret.expose_secret();
        if secret.is_empty() {
            return Err(CoreError::Config {
                message: "no session secret configured (set auth_secret)".into(),
            });
        }
        Ok(secret)
    }

    fn expiry_from(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        TimeDelta::from_std(self.max_age)
            .ok()
            .and_then(|age| now.checked_add_signed(age))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

impl SessionSource for SessionProvider {
    fn current_session(&self) -> Result<Option<Session>, CoreError> {
        Ok(self.current().map(|s| Session::clone(&s)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use frontdesk_api::TransportConfig;
    use url::Url;

    use super::*;

    fn provider(secret: &str) -> SessionProvider {
        let client = CmsClient::new(
            Url::parse("http://127.0.0.1:9").unwrap(),
            &TransportConfig::default(),
        )
        .unwrap();
        SessionProvider::new(
            client,
            SecretString::from(secret.to_owned()),
            Duration::from_secs(3600),
        )
    }

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            user: SessionUser {
                id: "4".into(),
                name: "reception".into(),
                email: Some("desk@hotel.test".into()),
            },
            jwt: SecretString::from("upstream.bearer.token".to_owned()),
            expires_at,
        }
    }

    #[test]
    fn token_round_trip_restores_session() {
        let p = provider("s3cret");
        let token = p.issue_token(&session(Utc::now() + TimeDelta::hours(1))).unwrap();

        assert_eq!(p.status(), AuthStatus::Unauthenticated);
        let restored = p.restore(&token).unwrap();
        assert_eq!(restored.user.name, "reception");
        assert_eq!(restored.jwt.expose_secret(), "upstream.bearer.token");
        assert_eq!(p.status(), AuthStatus::Authenticated);
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = provider("one")
            .issue_token(&session(Utc::now() + TimeDelta::hours(1)))
            .unwrap();
        let p = provider("two");
        assert!(matches!(p.restore(&token), Err(CoreError::Session { .. })));
        assert_eq!(p.status(), AuthStatus::Unauthenticated);
    }

    #[test]
    fn expired_token_is_rejected() {
        let p = provider("s3cret");
        let token = p.issue_token(&session(Utc::now() - TimeDelta::minutes(5))).unwrap();
        assert!(p.restore(&token).is_err());
    }

    #[test]
    fn unexpected_claims_are_rejected() {
        #[derive(Serialize)]
        struct Foreign {
            sub: String,
            exp: i64,
            token: String,
        }
        let foreign = Foreign {
            sub: "4".into(),
            exp: (Utc::now() + TimeDelta::hours(1)).timestamp(),
            token: "a.b.c".into(),
        };
        let raw = jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &foreign,
            &EncodingKey::from_secret(b"s3cret"),
        )
        .unwrap();

        let p = provider("s3cret");
        assert!(p.restore(&SessionToken::from(raw)).is_err());
        assert_eq!(p.status(), AuthStatus::Unauthenticated);
    }

    #[test]
    fn missing_secret_is_a_config_error() {
        let p = provider("");
        let err = p
            .issue_token(&session(Utc::now() + TimeDelta::hours(1)))
            .unwrap_err();
        assert!(matches!(err, CoreError::Config { .. }));
    }

    #[test]
    fn sign_out_clears_session() {
        let p = provider("s3cret");
        let token = p.issue_token(&session(Utc::now() + TimeDelta::hours(1))).unwrap();
        p.restore(&token).unwrap();
        let mut rx = p.subscribe();

        p.sign_out();

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
        assert!(p.current_session().unwrap().is_none());
    }
}
