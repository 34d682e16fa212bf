// ── Bearer token resolution ──
//
// Stores never hold a token. They ask for one right before each request:
// the signed-in user's token when there is a session, the static service
// token otherwise.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::session::SessionSource;

#[derive(Clone)]
pub(crate) struct BearerResolver {
    session: Arc<dyn SessionSource>,
    service_token: SecretString,
}

impl BearerResolver {
    pub(crate) fn new(session: Arc<dyn SessionSource>, service_token: SecretString) -> Self {
        Self {
            session,
            service_token,
        }
    }

    pub(crate) fn resolve(&self) -> SecretString {
        match self.session.current_session() {
            Ok(Some(session)) if !session.jwt.expose_secret().is_empty() => {
                debug!(user = %session.user.name, "using session token");
                return session.jwt;
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "cannot read session, using service token"),
        }
        if self.service_token.expose_secret().is_empty() {
            warn!("no session and no service token configured; sending empty bearer");
        }
        self.service_token.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeDelta, Utc};

    use super::*;
    use crate::error::CoreError;
    use crate::session::{Session, SessionUser};

    /// Fixed session source for store tests.
    enum FixedSession {
        None,
        Token(&'static str),
        Broken,
    }

    impl SessionSource for FixedSession {
        fn current_session(&self) -> Result<Option<Session>, CoreError> {
            match self {
                Self::None => Ok(None),
                Self::Token(jwt) => Ok(Some(Session {
                    user: SessionUser {
                        id: "1".into(),
                        name: "desk".into(),
                        email: None,
                    },
                    jwt: SecretString::from((*jwt).to_owned()),
                    expires_at: Utc::now() + TimeDelta::hours(1),
                })),
                Self::Broken => Err(CoreError::Session {
                    message: "store unreadable".into(),
                }),
            }
        }
    }

    fn resolver(source: FixedSession) -> BearerResolver {
        BearerResolver::new(Arc::new(source), SecretString::from("service".to_owned()))
    }

    #[test]
    fn prefers_session_token() {
        let token = resolver(FixedSession::Token("user-jwt")).resolve();
        assert_eq!(token.expose_secret(), "user-jwt");
    }

    #[test]
    fn falls_back_to_service_token() {
        assert_eq!(resolver(FixedSession::None).resolve().expose_secret(), "service");
        assert_eq!(resolver(FixedSession::Token("")).resolve().expose_secret(), "service");
    }

    #[test]
    fn session_errors_fall_back() {
        assert_eq!(resolver(FixedSession::Broken).resolve().expose_secret(), "service");
    }
}
