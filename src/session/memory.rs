//! In-memory token store for tests and short-lived processes.

use std::sync::{Mutex, MutexGuard, PoisonError};

use secrecy::{ExposeSecret as _, SecretString};

use super::TokenStore;
use crate::error::Result;

/// Thread-safe token store that forgets everything on drop.
///
/// # Example
///
/// ```rust
/// use secrecy::SecretString;
/// use sunshine_shop::session::{InMemoryTokenStore, TokenStore};
///
/// let store = InMemoryTokenStore::with_token(SecretString::from("jwt".to_owned()));
/// assert!(store.load().unwrap().is_some());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    /// Current token text.
    token: Mutex<Option<SecretString>>,
}

impl InMemoryTokenStore {
    /// Creates an empty (logged-out) store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store already holding `token`.
    #[inline]
    #[must_use]
    pub fn with_token(token: SecretString) -> Self {
        Self {
            token: Mutex::new(Some(token)),
        }
    }

    /// Acquires the lock, recovering from poisoning.
    fn with_lock(&self) -> MutexGuard<'_, Option<SecretString>> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for InMemoryTokenStore {
    #[inline]
    fn load(&self) -> Result<Option<SecretString>> {
        Ok(self
            .with_lock()
            .as_ref()
            .map(|token| SecretString::from(token.expose_secret().to_owned())))
    }

    #[inline]
    fn save(&self, token: &SecretString) -> Result<()> {
        *self.with_lock() = Some(SecretString::from(token.expose_secret().to_owned()));
        Ok(())
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        *self.with_lock() = None;
        Ok(())
    }
}
