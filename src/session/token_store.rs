//
//  releasehub-cli
//  session/token_store.rs
//
//  Created by Ngonidzashe Mangudya on 2026/02/16.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Durable bearer-token storage.
//!
//! The token is the only piece of session state that survives between
//! invocations; profile and permissions are refetched every session. The
//! default backend is the system's native keyring service (Keychain on
//! macOS, Secret Service on Linux, Credential Manager on Windows) under a
//! fixed service/key pair. An in-memory variant backs tests and ephemeral
//! sessions.

use anyhow::Result;
use keyring::Entry;
use std::sync::RwLock;

/// The service name used to identify this application in the system keyring.
const SERVICE_NAME: &str = "releasehub-cli";

/// The fixed key the bearer token is stored under.
pub const TOKEN_KEY: &str = "rh-token";

/// Storage backend for the persisted bearer token.
pub trait TokenStore: Send + Sync {
    /// Reads the stored token, if any.
    fn load(&self) -> Result<Option<String>>;

    /// Stores or replaces the token.
    fn save(&self, token: &str) -> Result<()>;

    /// Deletes the stored token. Deleting a missing token is not an error.
    fn delete(&self) -> Result<()>;
}

/// Token storage backed by the system's native keyring service.
///
/// # Notes
///
/// - The keyring may require user interaction (password, biometrics) on
///   first access.
/// - Entries persist across application restarts and system reboots.
/// - On Linux, a secret service daemon (GNOME Keyring, KWallet) must be
///   running.
pub struct KeyringTokenStore {
    /// Service name identifying this application in the keyring.
    service: String,
    /// Fixed entry key for the token.
    key: String,
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringTokenStore {
    /// Creates a store using the default service name and token key.
    ///
    /// No keyring access occurs during construction; the keyring is touched
    /// only when the trait methods are called.
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
            key: TOKEN_KEY.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Ok(Entry::new(&self.service, &self.key)?)
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        self.entry()?.set_password(token)?;
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory token storage for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with a token, as if one had been persisted earlier.
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.read().ok().and_then(|token| token.clone()))
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.to_string());
        }
        Ok(())
    }

    fn delete(&self) -> Result<()> {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load().unwrap(), None);

        store.save("tok-1").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("tok-1"));

        store.delete().unwrap();
        assert_eq!(store.load().unwrap(), None);
        store.delete().unwrap(); // idempotent
    }

    #[test]
    fn seeded_store_exposes_token() {
        let store = MemoryTokenStore::with_token("tok-2");
        assert_eq!(store.load().unwrap().as_deref(), Some("tok-2"));
    }
}
