//! Route Table
//!
//! Maps paths to screens and applies the auth guard. Anything the user may
//! not see, or that does not exist, lands on the login screen.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Login,
    Signup,
    Dashboard,
    Profile,
    Readings,
    Medications,
}

impl Route {
    pub const ALL: [Route; 6] = [
        Route::Login,
        Route::Signup,
        Route::Dashboard,
        Route::Profile,
        Route::Readings,
        Route::Medications,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Signup => "/signup",
            Route::Dashboard => "/dashboard",
            Route::Profile => "/profile",
            Route::Readings => "/readings",
            Route::Medications => "/medications",
        }
    }

    /// The route whose path is `path` or a segment prefix of it, so
    /// `/readings/7` is the readings screen but `/readingsx` is nothing.
    /// `/` and unknown paths are `None`.
    pub fn from_path(path: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|r| {
            path.strip_prefix(r.path())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login | Route::Signup)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Where a navigation to `path` ends up
pub fn resolve(path: &str, is_authed: bool) -> Route {
    match Route::from_path(path) {
        Some(route) if route.requires_auth() && !is_authed => {
            tracing::debug!(path, "Private route while logged out, redirecting to login");
            Route::Login
        }
        Some(route) => route,
        None => {
            tracing::debug!(path, "Unknown route, redirecting to login");
            Route::Login
        }
    }
}

/// Entry in the navigation bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NavLink {
    Home,
    Route(Route),
    Logout,
}

impl NavLink {
    pub fn label(&self) -> &'static str {
        match self {
            NavLink::Home => "Home",
            NavLink::Route(Route::Login) => "Login",
            NavLink::Route(Route::Signup) => "Signup",
            NavLink::Route(Route::Dashboard) => "Dashboard",
            NavLink::Route(Route::Profile) => "Profile",
            NavLink::Route(Route::Readings) => "Readings",
            NavLink::Route(Route::Medications) => "Medications",
            NavLink::Logout => "Logout",
        }
    }
}

pub fn nav_links(is_authed: bool) -> Vec<NavLink> {
    if is_authed {
        vec![
            NavLink::Home,
            NavLink::Route(Route::Dashboard),
            NavLink::Route(Route::Readings),
            NavLink::Route(Route::Medications),
            NavLink::Route(Route::Profile),
            NavLink::Logout,
        ]
    } else {
        vec![
            NavLink::Home,
            NavLink::Route(Route::Login),
            NavLink::Route(Route::Signup),
        ]
    }
}
