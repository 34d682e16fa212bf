//! CLI side of configuration: flag overrides on top of `frontdesk-config`,
//! the stored session token, and construction of the `FrontDesk` facade.

use clap::ValueEnum;
use secrecy::SecretString;
use tracing::{debug, warn};

use frontdesk_config::{Config, KEYRING_SERVICE};
use frontdesk_core::{FrontDesk, SessionToken};

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

/// Keyring entry holding the signed session token.
pub const KEYRING_SESSION: &str = "session";

// ── Loading ──────────────────────────────────────────────────────────

/// Load file + env config and layer the global flags on top.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = frontdesk_config::load_config()?;
    apply_overrides(&mut cfg, global);
    Ok(cfg)
}

fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref url) = global.api_url {
        cfg.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if global.insecure {
        cfg.insecure = true;
    }
}

/// Fill `--output` / `--color` from the config when not given as flags.
pub fn apply_display_defaults(global: &mut GlobalOpts, cfg: &Config) {
    if global.output.is_none() {
        global.output = match OutputFormat::from_str(&cfg.output, true) {
            Ok(format) => Some(format),
            Err(_) => {
                warn!(output = %cfg.output, "unknown output format in config, using table");
                None
            }
        };
    }
    if global.color.is_none() {
        global.color = ColorMode::from_str(&cfg.color, true).ok();
    }
}

// ── Facade ───────────────────────────────────────────────────────────

/// Build the facade and restore the stored session, if any.
///
/// A stored session that no longer verifies is dropped with a warning;
/// the command then runs signed out.
pub fn build_desk(cfg: &Config, global: &GlobalOpts) -> Result<FrontDesk, CliError> {
    let service_token = match global.api_token {
        Some(ref token) => SecretString::from(token.clone()),
        None => frontdesk_config::resolve_service_token(cfg),
    };
    let desk = FrontDesk::new(frontdesk_config::to_frontdesk_config(cfg, service_token)?)?;

    if let Some(token) = stored_session_token(global) {
        match desk.restore_session(&token) {
            Ok(session) => debug!(user = %session.user.name, "using stored session"),
            Err(e) => warn!(error = %e, "stored session is not usable, continuing signed out"),
        }
    }
    Ok(desk)
}

// ── Session token storage ────────────────────────────────────────────

/// `--session-token` / `FRONTDESK_SESSION_TOKEN`, else the keyring.
pub fn stored_session_token(global: &GlobalOpts) -> Option<SessionToken> {
    if let Some(ref raw) = global.session_token {
        return Some(SessionToken::from(raw.clone()));
    }
    let entry = keyring::Entry::new(KEYRING_SERVICE, KEYRING_SESSION).ok()?;
    match entry.get_password() {
        Ok(raw) => Some(SessionToken::from(raw)),
        Err(keyring::Error::NoEntry) => None,
        Err(e) => {
            debug!(error = %e, "keyring read failed");
            None
        }
    }
}

pub fn store_session_token(token: &SessionToken) -> Result<(), CliError> {
    keyring::Entry::new(KEYRING_SERVICE, KEYRING_SESSION)
        .and_then(|entry| entry.set_password(token.as_str()))
        .map_err(|e| CliError::Keyring {
            message: e.to_string(),
        })
}

/// Remove the stored session. `Ok(false)` when there was none.
pub fn clear_session_token() -> Result<bool, CliError> {
    let entry =
        keyring::Entry::new(KEYRING_SERVICE, KEYRING_SESSION).map_err(|e| CliError::Keyring {
            message: e.to_string(),
        })?;
    match entry.delete_credential() {
        Ok(()) => Ok(true),
        Err(keyring::Error::NoEntry) => Ok(false),
        Err(e) => Err(CliError::Keyring {
            message: e.to_string(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["frontdesk"];
        argv.extend_from_slice(args);
        argv.push("logout");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_override_file_values() {
        let mut cfg = Config::default();
        apply_overrides(
            &mut cfg,
            &global(&["--api-url", "http://cms.test:1337", "--timeout", "5", "-k"]),
        );
        assert_eq!(cfg.api_url, "http://cms.test:1337");
        assert_eq!(cfg.timeout, 5);
        assert!(cfg.insecure);
    }

    #[test]
    fn output_falls_back_to_config() {
        let cfg = Config {
            output: "yaml".into(),
            ..Config::default()
        };
        let mut opts = global(&[]);
        opts.output = None;
        apply_display_defaults(&mut opts, &cfg);
        assert_eq!(opts.format(), OutputFormat::Yaml);

        let mut opts = global(&["-o", "json"]);
        apply_display_defaults(&mut opts, &cfg);
        assert_eq!(opts.format(), OutputFormat::Json);
    }

    #[test]
    fn unknown_config_output_means_table() {
        let cfg = Config {
            output: "xml".into(),
            ..Config::default()
        };
        let mut opts = global(&[]);
        opts.output = None;
        apply_display_defaults(&mut opts, &cfg);
        assert_eq!(opts.format(), OutputFormat::Table);
    }
}
