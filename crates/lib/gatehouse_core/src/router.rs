//! Path routing and layout, driven by a freshly evaluated [`Session`].

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::auth::{Session, SessionGuard};
use crate::models::Role;
use crate::notify::{NotificationRelay, NotificationSink, PushChannel, RelayHandle};

pub const ROOT_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

/// Redirect chains never need more than two hops (`/` → `/dashboard` → `/login`).
const MAX_REDIRECTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardKind {
    Resident,
    Guard,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Dashboard(DashboardKind),
    /// Authenticated, but the role claim is missing or unrecognised.
    UnknownRole,
    NotFound,
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Page::Login => f.write_str("Login"),
            Page::Dashboard(DashboardKind::Resident) => f.write_str("Resident Dashboard"),
            Page::Dashboard(DashboardKind::Guard) => f.write_str("Guard Dashboard"),
            Page::Dashboard(DashboardKind::Admin) => f.write_str("Admin Dashboard"),
            Page::UnknownRole => f.write_str("Error: Unknown Role"),
            Page::NotFound => f.write_str("404 - Page Not Found"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Redirect(&'static str),
    Render(Page),
}

/// Dashboard for a role. `None` for [`Role::Unknown`].
pub fn dashboard_for(role: Role) -> Option<DashboardKind> {
    match role {
        Role::Resident => Some(DashboardKind::Resident),
        Role::Guard => Some(DashboardKind::Guard),
        Role::Admin => Some(DashboardKind::Admin),
        Role::Unknown => None,
    }
}

fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { ROOT_PATH } else { trimmed }
}

/// Decide what `path` shows for `session`.
pub fn resolve(path: &str, session: &Session) -> Route {
    let authenticated = session.is_authenticated();
    match normalize(path) {
        ROOT_PATH if authenticated => Route::Redirect(DASHBOARD_PATH),
        ROOT_PATH => Route::Redirect(LOGIN_PATH),
        LOGIN_PATH if authenticated => Route::Redirect(DASHBOARD_PATH),
        LOGIN_PATH => Route::Render(Page::Login),
        DASHBOARD_PATH => match session.role() {
            None => Route::Redirect(LOGIN_PATH),
            Some(role) => match dashboard_for(role) {
                Some(kind) => Route::Render(Page::Dashboard(kind)),
                None => Route::Render(Page::UnknownRole),
            },
        },
        _ => Route::Render(Page::NotFound),
    }
}

/// Chrome around every page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub show_logout: bool,
    /// Whether the push relay should be attached.
    pub notifications: bool,
}

impl Layout {
    pub fn for_session(session: &Session) -> Self {
        let authenticated = session.is_authenticated();
        Self {
            show_logout: authenticated,
            notifications: authenticated,
        }
    }

    /// Attach the foreground push relay if this layout has notifications on.
    ///
    /// The caller owns the returned handle for the lifetime of the session
    /// and detaches it once on teardown.
    pub fn attach_relay(
        &self,
        channel: &dyn PushChannel,
        sink: Arc<dyn NotificationSink>,
    ) -> Option<RelayHandle> {
        self.notifications
            .then(|| NotificationRelay::attach(channel, sink))
    }
}

/// Outcome of a navigation after redirects have been followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Path that was finally rendered.
    pub path: String,
    pub page: Page,
    pub layout: Layout,
    pub session: Session,
}

/// Re-evaluates the session on every navigation.
#[derive(Clone)]
pub struct Router {
    guard: SessionGuard,
}

impl Router {
    pub fn new(guard: SessionGuard) -> Self {
        Self { guard }
    }

    pub fn navigate(&self, path: &str) -> Navigation {
        let session = self.guard.evaluate();
        let mut path = normalize(path).to_string();
        let mut page = Page::NotFound;
        for _ in 0..MAX_REDIRECTS {
            match resolve(&path, &session) {
                Route::Redirect(to) => {
                    debug!(from = %path, to, "redirect");
                    path = to.to_string();
                }
                Route::Render(p) => {
                    page = p;
                    break;
                }
            }
        }
        Navigation {
            path,
            page,
            layout: Layout::for_session(&session),
            session,
        }
    }
}
