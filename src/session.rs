//! Pluggable storage for the bearer token of the logged-in user.
//!
//! The token is the only piece of session state the storefront needs. It
//! is saved under the fixed key [`TOKEN_KEY`] and read back before every
//! authenticated request, so a logout in one place is seen everywhere.

#[cfg(feature = "session-file")]
mod file;
mod memory;

#[cfg(feature = "session-file")]
pub use file::FileTokenStore;
pub use memory::InMemoryTokenStore;

use secrecy::SecretString;

use crate::error::Result;

/// Key under which the bearer token is persisted.
pub const TOKEN_KEY: &str = "token";

/// Storage for the session's bearer token.
///
/// Implementations must be safe to share between threads; the shop reads
/// the token on every call and never caches it.
pub trait TokenStore: core::fmt::Debug + Send + Sync {
    /// Returns the stored token, or `Ok(None)` when logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read.
    fn load(&self) -> Result<Option<SecretString>>;

    /// Replaces the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn save(&self, token: &SecretString) -> Result<()>;

    /// Removes the stored token. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write.
    fn clear(&self) -> Result<()>;
}
