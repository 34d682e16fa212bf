//! Route guard evaluation.

use serde::Serialize;

use frontdesk_core::{AuthStatus, FrontDesk, GuardDecision};

use crate::cli::{GlobalOpts, RouteArgs, RouteCommand};
use crate::output;

#[derive(Debug, Serialize)]
struct RouteView {
    path: String,
    status: AuthStatus,
    decision: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect: Option<String>,
}

impl RouteView {
    fn new(path: String, status: AuthStatus, decision: GuardDecision) -> Self {
        match decision {
            GuardDecision::Allow => Self {
                path,
                status,
                decision: "allow",
                redirect: None,
            },
            GuardDecision::Redirect(to) => Self {
                path,
                status,
                decision: "redirect",
                redirect: Some(to),
            },
        }
    }

    /// Where navigation ends up.
    fn target(&self) -> &str {
        self.redirect.as_deref().unwrap_or(&self.path)
    }
}

pub fn handle(desk: &FrontDesk, args: RouteArgs, global: &GlobalOpts) {
    match args.command {
        RouteCommand::Check { path } => {
            let decision = desk.check_route(&path);
            let view = RouteView::new(path, desk.auth_status(), decision);
            let color = output::should_color(global.color_mode());

            let out = output::render_single(
                global.format(),
                &view,
                |v| {
                    let verdict = output::paint(v.decision, v.redirect.is_none(), color);
                    match v.redirect {
                        Some(ref to) => format!("{verdict} {} -> {to} ({})", v.path, v.status),
                        None => format!("{verdict} {} ({})", v.path, v.status),
                    }
                },
                |v| v.target().to_owned(),
            );
            output::print_output(&out, global.quiet);
        }
    }
}
