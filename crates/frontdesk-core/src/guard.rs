// ── Route guard ──
//
// Navigation predicate for protected paths. Pure: takes the target path
// and the current auth status, returns a decision, touches nothing else.

use crate::session::AuthStatus;

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Navigation proceeds.
    Allow,
    /// Navigation is replaced by the given path.
    Redirect(String),
}

/// Redirects unauthenticated navigation under `protected_prefix` to `login_path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteGuard {
    protected_prefix: String,
    login_path: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new("/dashboard", "/login")
    }
}

impl RouteGuard {
    pub fn new(protected_prefix: impl Into<String>, login_path: impl Into<String>) -> Self {
        let prefix: String = protected_prefix.into();
        Self {
            protected_prefix: prefix.trim_end_matches('/').to_owned(),
            login_path: login_path.into(),
        }
    }

    pub fn protected_prefix(&self) -> &str {
        &self.protected_prefix
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Whether `path` lies under the protected prefix.
    ///
    /// Matches whole segments: with prefix `/dashboard`, `/dashboard` and
    /// `/dashboard/rooms` are protected, `/dashboards` is not. Query string
    /// and fragment are ignored.
    pub fn is_protected(&self, path: &str) -> bool {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        if self.protected_prefix.is_empty() {
            return true;
        }
        match path.strip_prefix(self.protected_prefix.as_str()) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    pub fn check(&self, path: &str, status: AuthStatus) -> GuardDecision {
        if status != AuthStatus::Authenticated && self.is_protected(path) {
            GuardDecision::Redirect(self.login_path.clone())
        } else {
            GuardDecision::Allow
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthenticated_protected_path_redirects() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.check("/dashboard/rooms", AuthStatus::Unauthenticated),
            GuardDecision::Redirect("/login".into())
        );
        assert_eq!(
            guard.check("/dashboard", AuthStatus::Unauthenticated),
            GuardDecision::Redirect("/login".into())
        );
    }

    #[test]
    fn authenticated_protected_path_is_allowed() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.check("/dashboard/guests?page=2", AuthStatus::Authenticated),
            GuardDecision::Allow
        );
    }

    #[test]
    fn unprotected_paths_never_redirect() {
        let guard = RouteGuard::default();
        for path in ["/", "/login", "/dashboards", "/about/dashboard"] {
            assert_eq!(guard.check(path, AuthStatus::Unauthenticated), GuardDecision::Allow, "{path}");
        }
    }

    #[test]
    fn trailing_slash_in_prefix_is_ignored() {
        let guard = RouteGuard::new("/admin/", "/signin");
        assert!(guard.is_protected("/admin/settings"));
        assert_eq!(
            guard.check("/admin", AuthStatus::Unauthenticated),
            GuardDecision::Redirect("/signin".into())
        );
    }
}
