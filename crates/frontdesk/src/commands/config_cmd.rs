//! Config subcommand handlers.

use std::fmt::Write as _;

use dialoguer::{Confirm, Input, Select};
use rand::Rng;

use frontdesk_config::{Config, KEYRING_API_TOKEN, KEYRING_SERVICE};
use frontdesk_core::WritePolicy;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const REDACTED: &str = "********";

/// Copy of `cfg` safe to print.
fn redacted(cfg: &Config) -> Config {
    let mut shown = cfg.clone();
    if shown.api_token.is_some() {
        shown.api_token = Some(REDACTED.into());
    }
    if shown.auth_secret.is_some() {
        shown.auth_secret = Some(REDACTED.into());
    }
    shown
}

/// 32 random bytes, hex encoded.
fn generate_secret() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes.iter().fold(String::with_capacity(64), |mut out, b| {
        let _ = write!(out, "{b:02x}");
        out
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, cfg: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", frontdesk_config::config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let shown = redacted(cfg);
            let out = output::render_single(
                global.format(),
                &shown,
                |c| toml::to_string_pretty(c).unwrap_or_else(|e| format!("# cannot render: {e}")),
                |c| c.api_url.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Init => init(cfg),
    }
}

/// Interactive wizard. Starts from the current values.
fn init(current: &Config) -> Result<(), CliError> {
    let path = frontdesk_config::config_path();
    eprintln!("frontdesk configuration wizard");
    eprintln!("   Config path: {}\n", path.display());

    let mut cfg = current.clone();

    // 1. Endpoints
    cfg.api_url = Input::<String>::new()
        .with_prompt("Content API URL")
        .default(current.api_url.clone())
        .interact_text()
        .map_err(prompt_err)?;
    cfg.site_url = Input::<String>::new()
        .with_prompt("Front-desk site URL")
        .default(current.site_url.clone())
        .interact_text()
        .map_err(prompt_err)?;

    // 2. Service token
    let token = rpassword::prompt_password("Service API token (empty to skip): ")
        .map_err(prompt_err)?;
    if !token.is_empty() {
        let store_choices = &[
            "Store in system keyring (recommended)",
            "Save to config file (plaintext)",
        ];
        let store_selection = Select::new()
            .with_prompt("Where to store the API token?")
            .items(store_choices)
            .default(0)
            .interact()
            .map_err(prompt_err)?;

        if store_selection == 0 {
            keyring::Entry::new(KEYRING_SERVICE, KEYRING_API_TOKEN)
                .and_then(|entry| entry.set_password(&token))
                .map_err(|e| CliError::Keyring {
                    message: e.to_string(),
                })?;
            cfg.api_token = None;
            eprintln!("   API token stored in system keyring");
        } else {
            cfg.api_token = Some(token);
        }
    }

    // 3. Session signing secret
    if cfg.auth_secret.is_none()
        || Confirm::new()
            .with_prompt("Replace the session signing secret? (signs everyone out)")
            .default(false)
            .interact()
            .map_err(prompt_err)?
    {
        cfg.auth_secret = Some(generate_secret());
        eprintln!("   New session signing secret generated");
    }

    // 4. Write policy
    let policies = [WritePolicy::Strict, WritePolicy::Optimistic];
    let labels = &[
        "strict: failed writes leave the cache untouched",
        "optimistic: failed writes are applied locally anyway",
    ];
    let selected = Select::new()
        .with_prompt("When a write to the API fails")
        .items(labels)
        .default(usize::from(current.write_policy == WritePolicy::Optimistic))
        .interact()
        .map_err(prompt_err)?;
    cfg.write_policy = policies.get(selected).copied().unwrap_or_default();

    // 5. Write config
    let written = frontdesk_config::save_config(&cfg)?;
    eprintln!("\nConfiguration written to {}", written.display());
    eprintln!("\n  Test it: frontdesk rooms list");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn show_never_prints_secrets() {
        let cfg = Config {
            api_token: Some("service-token".into()),
            auth_secret: Some("signing-secret".into()),
            ..Config::default()
        };
        let shown = redacted(&cfg);
        assert_eq!(shown.api_token.as_deref(), Some(REDACTED));
        assert_eq!(shown.auth_secret.as_deref(), Some(REDACTED));
        assert_eq!(shown.api_url, cfg.api_url);
    }

    #[test]
    fn unset_secrets_stay_unset() {
        let shown = redacted(&Config::default());
        assert!(shown.api_token.is_none());
        assert!(shown.auth_secret.is_none());
    }

    #[test]
    fn generated_secret_is_64_hex_chars() {
        let secret = generate_secret();
        assert_eq!(secret.len(), 64);
        assert!(secret.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(secret, generate_secret());
    }
}
