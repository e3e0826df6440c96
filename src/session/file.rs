//! JSON-file-based token store.
//!
//! Keeps the token in `session.json` under a configurable directory
//! (default: `$XDG_DATA_HOME/sunshine-shop/`), so the CLI stays logged in
//! between runs.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use secrecy::{ExposeSecret as _, SecretString};

use super::{TOKEN_KEY, TokenStore};
use crate::error::{Result, ShopError};

/// Application name used for the XDG data directory.
const APP_NAME: &str = "sunshine-shop";

/// File holding the session entries.
const SESSION_FILE: &str = "session.json";

/// Sentinel file used for cross-process file locking.
const LOCK_FILE: &str = "session.lock";

/// On-disk session entries, keyed like browser local storage.
type Entries = BTreeMap<String, String>;

/// File-backed token store.
///
/// # Concurrency
///
/// An in-process [`Mutex`] serializes access within the process, and an
/// advisory lock on `session.lock` serializes it across processes. Writes
/// go to a temporary file first and are renamed into place.
///
/// # File layout
///
/// ```text
/// <dir>/
///   session.lock
///   session.json     {"token": "<jwt>"}
/// ```
#[derive(Debug)]
pub struct FileTokenStore {
    /// Directory holding the session files.
    dir: PathBuf,
    /// Mutex serializing concurrent in-process access.
    lock: Mutex<()>,
    /// Sentinel file for cross-process advisory locking.
    lock_file: fs::File,
}

impl FileTokenStore {
    /// Creates a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the lock
    /// file cannot be opened.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(storage_io_error)?;
        let lock_file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(storage_io_error)?;
        Ok(Self {
            dir,
            lock: Mutex::new(()),
            lock_file,
        })
    }

    /// Returns the default XDG-compliant data directory for this application.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|data_path| data_path.join(APP_NAME))
            .ok_or_else(|| {
                ShopError::TokenStorage("could not determine platform data directory".into())
            })
    }

    /// Returns the directory this store writes to.
    #[inline]
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Runs `op` while holding both the in-process and the file lock.
    fn with_exclusive_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self
            .lock
            .lock()
            .map_err(|err| ShopError::TokenStorage(err.to_string().into()))?;
        self.lock_file.lock().map_err(storage_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Reads the session entries. A missing file means no entries.
    fn read_entries(&self) -> Result<Entries> {
        match fs::read_to_string(self.dir.join(SESSION_FILE)) {
            Ok(contents) => serde_json::from_str(&contents).map_err(ShopError::from),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
            Err(err) => Err(storage_io_error(err)),
        }
    }

    /// Atomically writes the session entries (write-to-tmp then rename).
    ///
    /// On Unix the file is readable and writable by the owner only.
    fn write_entries(&self, entries: &Entries) -> Result<()> {
        let path = self.dir.join(SESSION_FILE);
        let tmp_path = self.dir.join(format!("{SESSION_FILE}.tmp"));
        let json = serde_json::to_string_pretty(entries)?;
        let mut file = owner_only_file(&tmp_path).map_err(storage_io_error)?;
        file.write_all(json.as_bytes()).map_err(storage_io_error)?;
        file.sync_all().map_err(storage_io_error)?;
        drop(file);
        fs::rename(&tmp_path, &path).map_err(storage_io_error)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    #[inline]
    fn load(&self) -> Result<Option<SecretString>> {
        self.with_exclusive_lock(|| {
            let mut entries = self.read_entries()?;
            Ok(entries
                .remove(TOKEN_KEY)
                .filter(|token| !token.is_empty())
                .map(SecretString::from))
        })
    }

    #[inline]
    fn save(&self, token: &SecretString) -> Result<()> {
        self.with_exclusive_lock(|| {
            let mut entries = self.read_entries()?;
            let _old = entries.insert(TOKEN_KEY.to_owned(), token.expose_secret().to_owned());
            self.write_entries(&entries)
        })
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.with_exclusive_lock(|| {
            let mut entries = self.read_entries()?;
            if entries.remove(TOKEN_KEY).is_none() {
                return Ok(());
            }
            self.write_entries(&entries)
        })
    }
}

/// Opens `path` for writing, truncated, with mode `0600` on Unix.
fn owner_only_file(path: &Path) -> std::io::Result<fs::File> {
    let mut options = fs::OpenOptions::new();
    _ = options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt as _;
        _ = options.mode(0o600);
    }
    let file = options.open(path)?;
    // `mode` only applies on creation; a leftover tmp file keeps its bits.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    Ok(file)
}

/// Wraps an I/O error into a [`ShopError::TokenStorage`].
fn storage_io_error(err: std::io::Error) -> ShopError {
    ShopError::TokenStorage(Box::new(err))
}
