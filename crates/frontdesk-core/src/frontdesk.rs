// ── Front desk facade ──
//
// Builds one HTTP client from the configuration and hands it, together
// with the session provider, to every component that talks to the API.

use std::sync::Arc;

use frontdesk_api::{CmsClient, TlsMode, TransportConfig};
use secrecy::SecretString;

use crate::config::{FrontDeskConfig, TlsVerification};
use crate::error::CoreError;
use crate::guard::GuardDecision;
use crate::seed::GuestSeeder;
use crate::session::{AuthStatus, Session, SessionProvider, SessionSource, SessionToken};
use crate::store::{GuestStore, RoomStore};

/// Entry point for consumers.
///
/// Cheaply cloneable; clones share the client, the session and both
/// stores.
#[derive(Clone)]
pub struct FrontDesk {
    inner: Arc<FrontDeskInner>,
}

struct FrontDeskInner {
    config: FrontDeskConfig,
    client: CmsClient,
    session: Arc<SessionProvider>,
    guests: GuestStore,
    rooms: RoomStore,
}

impl FrontDesk {
    /// Wire everything from `config`. Does no I/O.
    pub fn new(config: FrontDeskConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig {
            tls: tls_to_transport(&config.tls),
            timeout: config.timeout,
        };
        let client = CmsClient::new(config.api_url.clone(), &transport)?;

        let session = Arc::new(SessionProvider::new(
            client.clone(),
            config.auth_secret.clone(),
            config.session_max_age,
        ));
        let source: Arc<dyn SessionSource> = session.clone();

        let guests = GuestStore::new(
            client.clone(),
            Arc::clone(&source),
            config.service_token.clone(),
            config.write_policy,
        )
        .with_publish_on_create(config.publish_on_create);
        let rooms = RoomStore::new(
            client.clone(),
            source,
            config.service_token.clone(),
            config.write_policy,
        );

        Ok(Self {
            inner: Arc::new(FrontDeskInner {
                config,
                client,
                session,
                guests,
                rooms,
            }),
        })
    }

    pub fn config(&self) -> &FrontDeskConfig {
        &self.inner.config
    }

    pub fn session(&self) -> &SessionProvider {
        &self.inner.session
    }

    pub fn guests(&self) -> &GuestStore {
        &self.inner.guests
    }

    pub fn rooms(&self) -> &RoomStore {
        &self.inner.rooms
    }

    // ── Session shortcuts ────────────────────────────────────────────

    pub async fn sign_in(&self, username: &str, password: &SecretString) -> Option<Session> {
        self.inner.session.authenticate(username, password).await
    }

    pub fn restore_session(&self, token: &SessionToken) -> Result<Session, CoreError> {
        self.inner.session.restore(token)
    }

    pub fn auth_status(&self) -> AuthStatus {
        self.inner.session.status()
    }

    /// Decide whether navigating to `path` may proceed right now.
    pub fn check_route(&self, path: &str) -> GuardDecision {
        self.inner.config.guard.check(path, self.auth_status())
    }

    /// A seeder that posts with the service token.
    pub fn seeder(&self) -> GuestSeeder {
        GuestSeeder::new(self.inner.client.clone(), self.inner.config.service_token.clone())
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::WritePolicy;

    #[test]
    fn wires_stores_from_config() {
        let desk = FrontDesk::new(FrontDeskConfig {
            write_policy: WritePolicy::Optimistic,
            ..FrontDeskConfig::default()
        })
        .unwrap();

        assert_eq!(desk.guests().write_policy(), WritePolicy::Optimistic);
        assert_eq!(desk.rooms().write_policy(), WritePolicy::Optimistic);
        assert_eq!(desk.auth_status(), AuthStatus::Unauthenticated);
        assert!(desk.guests().all().is_empty());
    }

    #[test]
    fn unauthenticated_dashboard_redirects() {
        let desk = FrontDesk::new(FrontDeskConfig::default()).unwrap();
        assert_eq!(
            desk.check_route("/dashboard/rooms"),
            GuardDecision::Redirect("/login".into())
        );
        assert_eq!(desk.check_route("/login"), GuardDecision::Allow);
    }
}
