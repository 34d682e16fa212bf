//! Login, logout and session status.

use chrono::{DateTime, Utc};
use dialoguer::Input;
use secrecy::SecretString;
use serde::Serialize;
use tracing::warn;

use frontdesk_core::{AuthStatus, FrontDesk, Session};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── View ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SessionView {
    status: AuthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expires_at: Option<DateTime<Utc>>,
}

impl SessionView {
    fn signed_out() -> Self {
        Self {
            status: AuthStatus::Unauthenticated,
            user: None,
            email: None,
            expires_at: None,
        }
    }
}

impl From<&Session> for SessionView {
    fn from(s: &Session) -> Self {
        Self {
            status: AuthStatus::Authenticated,
            user: Some(s.user.name.clone()),
            email: s.user.email.clone(),
            expires_at: Some(s.expires_at),
        }
    }
}

fn detail(v: &SessionView, color: bool) -> String {
    let status = v.status.to_string();
    let mut lines = vec![format!(
        "Status:   {}",
        output::paint(&status, v.status == AuthStatus::Authenticated, color)
    )];
    if let Some(ref user) = v.user {
        lines.push(format!("User:     {user}"));
    }
    if let Some(ref email) = v.email {
        lines.push(format!("Email:    {email}"));
    }
    if let Some(expires) = v.expires_at {
        lines.push(format!("Expires:  {}", expires.format("%Y-%m-%d %H:%M UTC")));
    }
    lines.join("\n")
}

fn print_view(view: &SessionView, global: &GlobalOpts) {
    let color = output::should_color(global.color_mode());
    let out = output::render_single(
        global.format(),
        view,
        |v| detail(v, color),
        |v| v.status.to_string(),
    );
    output::print_output(&out, global.quiet);
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn login(desk: &FrontDesk, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let username = match args.username {
        Some(u) => u,
        None => Input::<String>::new()
            .with_prompt("Username or email")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let password = match args.password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ").map_err(util::prompt_err)?,
    };
    let password = SecretString::from(password);

    let Some(session) = desk.sign_in(&username, &password).await else {
        return Err(CliError::AuthFailed { username });
    };
    let token = desk.session().issue_token(&session)?;

    if let Err(e) = config::store_session_token(&token) {
        warn!(error = %e, "cannot store session in the keyring");
        eprintln!("Keyring unavailable; export this token as FRONTDESK_SESSION_TOKEN:");
        println!("{}", token.as_str());
    }

    print_view(&SessionView::from(&session), global);
    Ok(())
}

pub fn logout(global: &GlobalOpts) -> Result<(), CliError> {
    let removed = config::clear_session_token()?;
    if !global.quiet {
        if removed {
            eprintln!("Signed out");
        } else {
            eprintln!("No stored session");
        }
    }
    Ok(())
}

pub fn show(desk: &FrontDesk, global: &GlobalOpts) {
    let view = desk
        .session()
        .current()
        .map_or_else(SessionView::signed_out, |s| SessionView::from(s.as_ref()));
    print_view(&view, global);
}
