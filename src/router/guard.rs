//
//  releasehub-cli
//  router/guard.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Navigation guard.
//!
//! One ordered predicate chain decides whether a screen is admitted:
//!
//! 1. Login screen with a token → go home instead
//! 2. Public routes pass
//! 3. No token → login, carrying the target as `redirect`
//! 4. Token without a profile → fetch it; failure → login with `redirect`
//! 5. Otherwise proceed
//!
//! The chain is linear on purpose: every screen goes through the same five
//! steps, and the first match wins.

use crate::api::http::ApiClient;
use crate::session::SessionStore;

use super::{find_route, LOGIN_ROUTE};

/// Outcome of the guard chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The screen may render.
    Proceed,
    /// An authenticated user asked for the login screen; show home instead.
    RedirectHome,
    /// Authentication is needed first; `redirect` is where to return after.
    RedirectLogin {
        /// Full path of the originally requested screen.
        redirect: String,
    },
}

/// Runs the guard chain for a target route.
///
/// The profile fetch in step 4 goes through the session store, so a token
/// that the backend rejects tears the session down before the redirect is
/// returned.
pub async fn admit(to: &str, session: &SessionStore, client: &ApiClient) -> Admission {
    // 1. Login screen: an authenticated user goes straight home.
    if to.split('?').next().unwrap_or(to).starts_with(LOGIN_ROUTE) {
        return if session.is_authenticated() {
            Admission::RedirectHome
        } else {
            Admission::Proceed
        };
    }

    // 2. Public routes skip the auth chain.
    if find_route(to).map(|route| route.meta.public).unwrap_or(false) {
        return Admission::Proceed;
    }

    // 3. No token: authenticate first, then come back.
    if !session.is_authenticated() {
        return Admission::RedirectLogin {
            redirect: to.to_string(),
        };
    }

    // 4. Token but no profile yet: fetch it before admitting.
    if session.profile().is_none() {
        if let Err(err) = session.fetch_me(client).await {
            tracing::debug!("profile fetch rejected during guard: {err}");
            return Admission::RedirectLogin {
                redirect: to.to_string(),
            };
        }
    }

    // 5. Admitted.
    Admission::Proceed
}
