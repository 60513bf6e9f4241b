//! View-state resolution for the application entrypoint.
//!
//! Every request to `/` lands on exactly one of three views: the login
//! screen, the owner's dashboard, or the public portal. Which one is a
//! pure function of the URL's `folder` parameter and whether the request
//! carries a live session.

use serde::Serialize;

/// The three mutually exclusive top-level views.
#[derive(Serialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    /// No session and no portal parameter: the login screen.
    Unauthenticated,
    /// A signed-in owner without a portal parameter: their folders.
    Dashboard,
    /// A non-empty `folder` parameter is present: the public gallery.
    /// Terminal for the request; the dashboard is unreachable from here
    /// even for a signed-in visitor.
    Portal,
}

/// Resolve which view a request lands on.
///
/// The portal parameter wins over everything: a share link opens the
/// gallery even when the visitor holds a valid session. Without it, the
/// session decides between dashboard and login.
pub fn resolve_view(portal_param: Option<&str>, authenticated: bool) -> ViewState {
    match portal_param {
        Some(folder) if !folder.is_empty() => ViewState::Portal,
        _ if authenticated => ViewState::Dashboard,
        _ => ViewState::Unauthenticated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portal_param_wins_even_with_session() {
        assert_eq!(resolve_view(Some("some-id"), true), ViewState::Portal);
        assert_eq!(resolve_view(Some("some-id"), false), ViewState::Portal);
    }

    #[test]
    fn empty_portal_param_is_ignored() {
        assert_eq!(resolve_view(Some(""), true), ViewState::Dashboard);
        assert_eq!(resolve_view(Some(""), false), ViewState::Unauthenticated);
    }

    #[test]
    fn session_without_portal_param_lands_on_dashboard() {
        assert_eq!(resolve_view(None, true), ViewState::Dashboard);
    }

    #[test]
    fn no_session_no_param_lands_on_login() {
        assert_eq!(resolve_view(None, false), ViewState::Unauthenticated);
    }

    #[test]
    fn ending_the_session_returns_to_login() {
        // Same entry point before and after sign-out.
        assert_eq!(resolve_view(None, true), ViewState::Dashboard);
        assert_eq!(resolve_view(None, false), ViewState::Unauthenticated);
    }
}
