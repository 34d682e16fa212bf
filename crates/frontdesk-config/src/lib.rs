//! Configuration for the front-desk tools.
//!
//! One TOML file plus `FRONTDESK_*` environment variables, credential
//! resolution (env var, keyring, plaintext), and translation to
//! `frontdesk_core::FrontDeskConfig`. The CLI layers its flag overrides
//! on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use frontdesk_core::{FrontDeskConfig, RouteGuard, TlsVerification, WritePolicy};

/// Keyring service name for every secret the tools store.
pub const KEYRING_SERVICE: &str = "frontdesk";
/// Keyring entry holding the service-level API token.
pub const KEYRING_API_TOKEN: &str = "api-token";

const ENV_PREFIX: &str = "FRONTDESK_";
const CONFIG_PATH_ENV: &str = "FRONTDESK_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// The configuration file, after environment overrides.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Content API root.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Service token (plaintext; prefer the keyring or `api_token_env`).
    pub api_token: Option<String>,

    /// Name of an environment variable holding the service token.
    pub api_token_env: Option<String>,

    /// Secret used to sign session tokens.
    pub auth_secret: Option<String>,

    /// Public URL of the front-desk site.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub write_policy: WritePolicy,

    #[serde(default = "default_true")]
    pub publish_on_create: bool,

    /// Session lifetime in days.
    #[serde(default = "default_session_days")]
    pub session_max_age_days: u64,

    /// Paths under this prefix need a signed-in user.
    #[serde(default = "default_protected_prefix")]
    pub protected_prefix: String,

    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Default output format for the CLI.
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: None,
            api_token_env: None,
            auth_secret: None,
            site_url: default_site_url(),
            timeout: default_timeout(),
            write_policy: WritePolicy::default(),
            publish_on_create: true,
            session_max_age_days: default_session_days(),
            protected_prefix: default_protected_prefix(),
            login_path: default_login_path(),
            insecure: false,
            ca_cert: None,
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:1337".into()
}
fn default_site_url() -> String {
    "http://localhost:3000".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}
fn default_session_days() -> u64 {
    30
}
fn default_protected_prefix() -> String {
    "/dashboard".into()
}
fn default_login_path() -> String {
    "/login".into()
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `FRONTDESK_CONFIG` if set, else the
/// platform config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "frontdesk", "frontdesk").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("frontdesk");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path and the environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Defaults, then the TOML file at `path` (if it exists), then
/// `FRONTDESK_*` variables.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
        .extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve the service token: the variable named by `api_token_env`, the
/// keyring, then the plaintext `api_token`. Empty when none is set;
/// requests then go out with an empty bearer.
pub fn resolve_service_token(cfg: &Config) -> SecretString {
    // 1. Named env var
    if let Some(ref env_name) = cfg.api_token_env {
        if let Ok(val) = std::env::var(env_name) {
            return SecretString::from(val);
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, KEYRING_API_TOKEN) {
        if let Ok(secret) = entry.get_password() {
            return SecretString::from(secret);
        }
    }

    // 3. Plaintext in config (or FRONTDESK_API_TOKEN)
    SecretString::from(cfg.api_token.clone().unwrap_or_default())
}

/// Build a `FrontDeskConfig` from the file config and a resolved token.
pub fn to_frontdesk_config(
    cfg: &Config,
    service_token: SecretString,
) -> Result<FrontDeskConfig, ConfigError> {
    let api_url = parse_url("api_url", &cfg.api_url)?;
    let site_url = parse_url("site_url", &cfg.site_url)?;

    let tls = if cfg.insecure {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    if !cfg.login_path.starts_with('/') {
        return Err(ConfigError::Validation {
            field: "login_path".into(),
            reason: format!("must start with '/', got '{}'", cfg.login_path),
        });
    }

    Ok(FrontDeskConfig {
        api_url,
        site_url,
        service_token,
        auth_secret: SecretString::from(cfg.auth_secret.clone().unwrap_or_default()),
        tls,
        timeout: Duration::from_secs(cfg.timeout),
        write_policy: cfg.write_policy,
        publish_on_create: cfg.publish_on_create,
        session_max_age: Duration::from_secs(cfg.session_max_age_days * 24 * 60 * 60),
        guard: RouteGuard::new(cfg.protected_prefix.as_str(), cfg.login_path.as_str()),
    })
}

fn parse_url(field: &str, raw: &str) -> Result<url::Url, ConfigError> {
    raw.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {raw}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use figment::Jail;
    use secrecy::ExposeSecret;

    use super::*;

    #[test]
    fn defaults_without_file() {
        Jail::expect_with(|jail| {
            let cfg = load_config_from(&jail.directory().join("missing.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(cfg.api_url, "http://localhost:1337");
            assert_eq!(cfg.site_url, "http://localhost:3000");
            assert_eq!(cfg.timeout, 30);
            assert_eq!(cfg.write_policy, WritePolicy::Strict);
            assert_eq!(cfg.protected_prefix, "/dashboard");
            Ok(())
        });
    }

    #[test]
    fn file_then_env_override() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                    api_url = "https://cms.hotel.test"
                    timeout = 5
                    write_policy = "optimistic"
                "#,
            )?;
            jail.set_env("FRONTDESK_TIMEOUT", "12");
            jail.set_env("FRONTDESK_AUTH_SECRET", "from-env");

            let cfg = load_config_from(&jail.directory().join("config.toml"))
                .map_err(|e| e.to_string())?;
            assert_eq!(cfg.api_url, "https://cms.hotel.test");
            assert_eq!(cfg.timeout, 12);
            assert_eq!(cfg.write_policy, WritePolicy::Optimistic);
            assert_eq!(cfg.auth_secret.as_deref(), Some("from-env"));
            Ok(())
        });
    }

    #[test]
    fn token_from_named_env_var() {
        Jail::expect_with(|jail| {
            jail.set_env("HOTEL_CMS_TOKEN", "env-token");
            let cfg = Config {
                api_token_env: Some("HOTEL_CMS_TOKEN".into()),
                api_token: Some("plaintext".into()),
                ..Config::default()
            };
            assert_eq!(resolve_service_token(&cfg).expose_secret(), "env-token");
            Ok(())
        });
    }

    #[test]
    fn translates_to_core_config() {
        let cfg = Config {
            api_url: "https://cms.hotel.test".into(),
            auth_secret: Some("s".into()),
            insecure: true,
            protected_prefix: "/admin".into(),
            ..Config::default()
        };
        let core = to_frontdesk_config(&cfg, SecretString::from("t".to_string())).unwrap();

        assert_eq!(core.api_url.as_str(), "https://cms.hotel.test/");
        assert_eq!(core.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(core.timeout, Duration::from_secs(30));
        assert_eq!(core.session_max_age, Duration::from_secs(30 * 86_400));
        assert_eq!(core.guard.protected_prefix(), "/admin");
    }

    #[test]
    fn rejects_bad_url() {
        let cfg = Config {
            api_url: "not a url".into(),
            ..Config::default()
        };
        let err = to_frontdesk_config(&cfg, SecretString::from(String::new())).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));
    }

    #[test]
    fn save_then_load() {
        Jail::expect_with(|jail| {
            let path = jail.directory().join("nested").join("config.toml");
            let cfg = Config {
                api_url: "https://cms.hotel.test".into(),
                ..Config::default()
            };
            save_config_to(&cfg, &path).map_err(|e| e.to_string())?;
            let loaded = load_config_from(&path).map_err(|e| e.to_string())?;
            assert_eq!(loaded.api_url, "https://cms.hotel.test");
            Ok(())
        });
    }
}
