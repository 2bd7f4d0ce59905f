//
//  releasehub-cli
//  router/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Routes and Navigation
//!
//! Console screens are addressed by SPA-style route paths (`/iterations`,
//! `/runs`, …). The route table carries per-screen metadata for the guard
//! and for titles; [`RouteState`] tracks the current route and implements
//! the HTTP client's [`Navigator`] seam, so a session-expiry redirect and a
//! guard redirect go through the same mechanism.

mod guard;

pub use guard::{admit, Admission};

use std::sync::RwLock;

use crate::api::http::Navigator;

/// Route of the login screen.
pub const LOGIN_ROUTE: &str = "/login";

/// Route of the home screen.
pub const HOME_ROUTE: &str = "/";

/// Per-route metadata consumed by the guard and the screens.
#[derive(Debug, Clone)]
pub struct RouteMeta {
    /// Title shown for the screen.
    pub title: &'static str,
    /// Public routes skip the auth chain entirely.
    pub public: bool,
    /// Permission required to act on the screen, if any.
    pub required_perm: Option<&'static str>,
}

/// One entry of the route table.
#[derive(Debug, Clone)]
pub struct Route {
    /// Route path, e.g. `/release-windows`.
    pub path: &'static str,
    /// Screen metadata.
    pub meta: RouteMeta,
}

const ROUTES: &[Route] = &[
    Route {
        path: LOGIN_ROUTE,
        meta: RouteMeta {
            title: "Sign in",
            public: true,
            required_perm: None,
        },
    },
    Route {
        path: HOME_ROUTE,
        meta: RouteMeta {
            title: "Overview",
            public: false,
            required_perm: None,
        },
    },
    Route {
        path: "/iterations",
        meta: RouteMeta {
            title: "Iterations",
            public: false,
            required_perm: Some("iteration:read"),
        },
    },
    Route {
        path: "/repositories",
        meta: RouteMeta {
            title: "Repositories",
            public: false,
            required_perm: Some("repository:read"),
        },
    },
    Route {
        path: "/release-windows",
        meta: RouteMeta {
            title: "Release Windows",
            public: false,
            required_perm: Some("release-window:read"),
        },
    },
    Route {
        path: "/branch-rules",
        meta: RouteMeta {
            title: "Branch Rules",
            public: false,
            required_perm: Some("branch-rule:read"),
        },
    },
    Route {
        path: "/version-policies",
        meta: RouteMeta {
            title: "Version Policies",
            public: false,
            required_perm: Some("version-policy:read"),
        },
    },
    Route {
        path: "/runs",
        meta: RouteMeta {
            title: "Run History",
            public: false,
            required_perm: Some("run:read"),
        },
    },
];

/// The full route table.
pub fn routes() -> &'static [Route] {
    ROUTES
}

/// Finds the route matching a path, ignoring any query string.
///
/// Matching is by longest path prefix, so `/runs/r-1/tasks` resolves to the
/// `/runs` screen.
pub fn find_route(path: &str) -> Option<&'static Route> {
    let path = path.split('?').next().unwrap_or(path);
    ROUTES
        .iter()
        .filter(|route| {
            path == route.path
                || (route.path != HOME_ROUTE && path.starts_with(&format!("{}/", route.path)))
        })
        .max_by_key(|route| route.path.len())
}

/// Mutable navigation state shared between the guard, the screens, and the
/// HTTP client.
///
/// The client calls [`Navigator::replace_to_login`] on session expiry; the
/// console inspects [`redirect_target`](Self::redirect_target) afterwards to
/// tell the user where they will return after re-authenticating.
pub struct RouteState {
    current: RwLock<String>,
}

impl RouteState {
    /// Creates navigation state positioned at `initial`.
    pub fn new(initial: &str) -> Self {
        Self {
            current: RwLock::new(initial.to_string()),
        }
    }

    /// Full path of the current route, including any query string.
    pub fn current(&self) -> String {
        self.current
            .read()
            .map(|current| current.clone())
            .unwrap_or_default()
    }

    /// Replaces the current route.
    pub fn replace(&self, path: &str) {
        if let Ok(mut current) = self.current.write() {
            *current = path.to_string();
        }
        tracing::debug!("route replaced: {path}");
    }

    /// Whether the login screen is the current route.
    pub fn on_login(&self) -> bool {
        self.current().starts_with(LOGIN_ROUTE)
    }

    /// The `redirect` query parameter of the current route, if present.
    pub fn redirect_target(&self) -> Option<String> {
        let current = self.current();
        let (_, query) = current.split_once('?')?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "redirect")
            .map(|(_, value)| value.into_owned())
    }
}

impl Navigator for RouteState {
    fn current_route(&self) -> String {
        self.current()
    }

    fn replace_to_login(&self, redirect: &str) {
        let encoded: String = url::form_urlencoded::byte_serialize(redirect.as_bytes()).collect();
        self.replace(&format!("{LOGIN_ROUTE}?redirect={encoded}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_routes_by_prefix() {
        assert_eq!(find_route("/runs").map(|r| r.path), Some("/runs"));
        assert_eq!(find_route("/runs/r-1/tasks").map(|r| r.path), Some("/runs"));
        assert_eq!(
            find_route("/release-windows?name=x").map(|r| r.path),
            Some("/release-windows")
        );
        assert!(find_route("/nope").is_none());
    }

    #[test]
    fn login_is_the_only_public_route() {
        let public: Vec<_> = routes()
            .iter()
            .filter(|route| route.meta.public)
            .map(|route| route.path)
            .collect();
        assert_eq!(public, vec![LOGIN_ROUTE]);
    }

    #[test]
    fn replace_to_login_preserves_the_redirect() {
        let state = RouteState::new("/iterations?keyword=api");
        state.replace_to_login("/iterations?keyword=api");
        assert!(state.on_login());
        assert_eq!(
            state.redirect_target().as_deref(),
            Some("/iterations?keyword=api")
        );
    }

    #[test]
    fn redirect_target_absent_without_query() {
        let state = RouteState::new("/login");
        assert_eq!(state.redirect_target(), None);
    }
}
