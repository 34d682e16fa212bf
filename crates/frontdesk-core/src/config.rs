// ── Runtime configuration ──
//
// These types describe *how* to reach the content API and how the
// stores behave. They carry credential data but never touch disk:
// the CLI builds a `FrontDeskConfig` (via `frontdesk-config`) and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::guard::RouteGuard;

/// What a store does with its cache when a write to the API fails.
///
/// One policy per store instance, applied to every write operation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum WritePolicy {
    /// The error propagates and the cached record is left untouched.
    #[default]
    Strict,
    /// The error is logged, the patch is applied to the cached record,
    /// and the locally patched record is returned.
    Optimistic,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed local CMS).
    DangerAcceptInvalid,
}

/// Everything the core needs to talk to one content API.
#[derive(Debug, Clone)]
pub struct FrontDeskConfig {
    /// Content API root (e.g., `http://localhost:1337`).
    pub api_url: Url,
    /// Public URL of the front-desk site.
    pub site_url: Url,
    /// Static service-level bearer token, used when no user session exists.
    pub service_token: SecretString,
    /// Secret used to sign session tokens.
    pub auth_secret: SecretString,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Cache behaviour on failed writes.
    pub write_policy: WritePolicy,
    /// Fire the publish action right after creating a guest.
    pub publish_on_create: bool,
    /// Lifetime of an issued session token.
    pub session_max_age: Duration,
    /// Protected-path guard.
    pub guard: RouteGuard,
}

impl Default for FrontDeskConfig {
    fn default() -> Self {
        Self {
            api_url: Url::parse("http://localhost:1337").expect("valid default URL"),
            site_url: Url::parse("http://localhost:3000").expect("valid default URL"),
            service_token: SecretString::from(String::new()),
            auth_secret: SecretString::from(String::new()),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            write_policy: WritePolicy::default(),
            publish_on_create: true,
            session_max_age: Duration::from_secs(30 * 24 * 60 * 60),
            guard: RouteGuard::default(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn write_policy_parses_lowercase() {
        assert_eq!(WritePolicy::from_str("optimistic").unwrap(), WritePolicy::Optimistic);
        assert_eq!(WritePolicy::Strict.to_string(), "strict");
        assert!(WritePolicy::from_str("eventual").is_err());
    }

    #[test]
    fn defaults_point_at_local_services() {
        let config = FrontDeskConfig::default();
        assert_eq!(config.api_url.as_str(), "http://localhost:1337/");
        assert_eq!(config.write_policy, WritePolicy::Strict);
        assert!(config.publish_on_create);
    }
}
