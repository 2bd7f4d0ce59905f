//
//  releasehub-cli
//  session/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Session Management
//!
//! The session holds the bearer token, the user profile, and the permission
//! list. Only the token is persisted (via [`KeyringTokenStore`]); profile and
//! permissions are refetched on every session, typically by the route guard.
//!
//! The session is shared mutable state: the HTTP client reads the token
//! while building requests and tears the session down on session expiry,
//! the login/logout flows write it. [`SessionStore`] implements the client's
//! [`SessionState`] seam so the store stays the single source of truth
//! without an import cycle.

mod token_store;

pub use token_store::{KeyringTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};

use std::sync::RwLock;

use crate::api::auth::{self, LoginPayload, UserProfile};
use crate::api::http::{ApiClient, ApiError, SessionState};

/// How permission checks behave when the grant list is missing or empty.
///
/// Mirrors the console's permission modes: `soft` keeps screens usable while
/// the backend's permission model is still being rolled out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PermMode {
    /// Every check passes.
    Off,
    /// Checks pass while the permission list is empty.
    #[default]
    Soft,
    /// Checks require an explicit grant.
    Strict,
}

impl PermMode {
    /// Parses a config value; unknown values fall back to `Soft`.
    pub fn parse(value: &str) -> Self {
        match value {
            "off" => Self::Off,
            "strict" => Self::Strict,
            _ => Self::Soft,
        }
    }
}

/// Session state shared by the console.
///
/// Created once per invocation. The token is loaded from durable storage at
/// construction so an earlier login survives; everything else starts empty.
pub struct SessionStore {
    token: RwLock<Option<String>>,
    profile: RwLock<Option<UserProfile>>,
    permissions: RwLock<Vec<String>>,
    perm_mode: PermMode,
    storage: Box<dyn TokenStore>,
}

impl SessionStore {
    /// Creates a session backed by the given token storage.
    ///
    /// A storage read failure is logged and treated as "no token"; the
    /// user can always log in again.
    pub fn load(storage: Box<dyn TokenStore>, perm_mode: PermMode) -> Self {
        let token = storage.load().unwrap_or_else(|err| {
            tracing::warn!("failed to read stored token: {err:#}");
            None
        });
        Self {
            token: RwLock::new(token),
            profile: RwLock::new(None),
            permissions: RwLock::new(Vec::new()),
            perm_mode,
            storage,
        }
    }

    /// An ephemeral session with in-memory token storage.
    pub fn in_memory() -> Self {
        Self::load(Box::new(MemoryTokenStore::new()), PermMode::Soft)
    }

    /// Current bearer token, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|token| token.clone())
    }

    /// The fetched profile, if [`fetch_me`](Self::fetch_me) has run.
    pub fn profile(&self) -> Option<UserProfile> {
        self.profile.read().ok().and_then(|profile| profile.clone())
    }

    /// Current permission grants.
    pub fn permissions(&self) -> Vec<String> {
        self.permissions
            .read()
            .map(|permissions| permissions.clone())
            .unwrap_or_default()
    }

    /// Whether a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Logs in and persists the returned token.
    ///
    /// Only the token is stored; the profile is fetched separately so a
    /// persisted token from a previous session goes through the same
    /// [`fetch_me`](Self::fetch_me) path as a fresh login.
    pub async fn login(&self, client: &ApiClient, payload: &LoginPayload) -> Result<(), ApiError> {
        let result = auth::login(client, payload).await?;
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(result.token.clone());
        }
        if let Err(err) = self.storage.save(&result.token) {
            tracing::warn!("failed to persist token: {err:#}");
        }
        Ok(())
    }

    /// Fetches the profile and permissions for the current token.
    ///
    /// A failure usually means the token is no longer valid, so the session
    /// is logged out before the error propagates.
    pub async fn fetch_me(&self, client: &ApiClient) -> Result<(), ApiError> {
        match auth::me(client).await {
            Ok(me) => {
                if let Ok(mut slot) = self.profile.write() {
                    *slot = Some(UserProfile {
                        id: me.id,
                        username: me.username,
                        display_name: me.display_name,
                    });
                }
                if let Ok(mut slot) = self.permissions.write() {
                    *slot = me.permissions;
                }
                Ok(())
            }
            Err(err) => {
                self.logout();
                Err(err)
            }
        }
    }

    /// Clears the session and deletes the persisted token.
    pub fn logout(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
        if let Ok(mut slot) = self.profile.write() {
            *slot = None;
        }
        if let Ok(mut slot) = self.permissions.write() {
            slot.clear();
        }
        if let Err(err) = self.storage.delete() {
            tracing::warn!("failed to delete stored token: {err:#}");
        }
    }

    /// Checks a permission grant under the configured [`PermMode`].
    ///
    /// `None` means the action requires no permission and always passes.
    pub fn has_permission(&self, required: Option<&str>) -> bool {
        let Some(required) = required else {
            return true;
        };
        match self.perm_mode {
            PermMode::Off => true,
            mode => {
                let permissions = self.permissions();
                if mode == PermMode::Soft && permissions.is_empty() {
                    return true;
                }
                permissions.iter().any(|grant| grant == required)
            }
        }
    }
}

impl SessionState for SessionStore {
    fn token(&self) -> Option<String> {
        SessionStore::token(self)
    }

    fn clear(&self) {
        self.logout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(perm_mode: PermMode, grants: &[&str]) -> SessionStore {
        let store = SessionStore::load(Box::new(MemoryTokenStore::new()), perm_mode);
        if let Ok(mut slot) = store.permissions.write() {
            *slot = grants.iter().map(|grant| grant.to_string()).collect();
        }
        store
    }

    #[test]
    fn persisted_token_survives_construction() {
        let store = SessionStore::load(
            Box::new(MemoryTokenStore::with_token("tok-9")),
            PermMode::Soft,
        );
        assert_eq!(store.token().as_deref(), Some("tok-9"));
        assert!(store.is_authenticated());
        assert!(store.profile().is_none());
    }

    #[test]
    fn logout_clears_everything() {
        let store = SessionStore::load(
            Box::new(MemoryTokenStore::with_token("tok-9")),
            PermMode::Soft,
        );
        store.logout();
        assert!(store.token().is_none());
        assert!(store.permissions().is_empty());
        assert_eq!(store.storage.load().unwrap(), None);
    }

    #[test]
    fn no_requirement_always_passes() {
        let store = store_with(PermMode::Strict, &[]);
        assert!(store.has_permission(None));
    }

    #[test]
    fn soft_mode_passes_on_empty_grants() {
        let store = store_with(PermMode::Soft, &[]);
        assert!(store.has_permission(Some("release-window:write")));

        let store = store_with(PermMode::Soft, &["iteration:read"]);
        assert!(!store.has_permission(Some("release-window:write")));
        assert!(store.has_permission(Some("iteration:read")));
    }

    #[test]
    fn strict_mode_requires_explicit_grant() {
        let store = store_with(PermMode::Strict, &[]);
        assert!(!store.has_permission(Some("iteration:read")));

        let store = store_with(PermMode::Strict, &["iteration:read"]);
        assert!(store.has_permission(Some("iteration:read")));
    }

    #[test]
    fn off_mode_passes_everything() {
        let store = store_with(PermMode::Off, &[]);
        assert!(store.has_permission(Some("anything")));
    }

    #[test]
    fn perm_mode_parses_with_soft_fallback() {
        assert_eq!(PermMode::parse("off"), PermMode::Off);
        assert_eq!(PermMode::parse("strict"), PermMode::Strict);
        assert_eq!(PermMode::parse("soft"), PermMode::Soft);
        assert_eq!(PermMode::parse("bogus"), PermMode::Soft);
    }
}
