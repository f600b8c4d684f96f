//! JSON-file credential store.
//!
//! Maps an account email to an Argon2id password hash. Plaintext passwords
//! are hashed on the way in and never persisted. This store is independent
//! of the inventory engine; nothing here touches stock cards.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use kardex_core::auth::{hash_password, verify_password, PasswordError};

/// Errors that can occur during credential operations.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The account email is already registered.
    #[error("Account already registered: {0}")]
    AccountExists(String),

    /// No account with this email exists.
    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    /// Hashing or verification failed.
    #[error("{0}")]
    Password(#[from] PasswordError),

    /// The credential file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The credential file is not valid JSON.
    #[error("Credential file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One stored account record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredential {
    /// Argon2id hash in PHC string format.
    password_hash: String,
}

/// File-backed account credentials, keyed by email.
#[derive(Debug)]
pub struct CredentialStore {
    path: PathBuf,
    accounts: RwLock<HashMap<String, StoredCredential>>,
}

impl CredentialStore {
    /// Opens the store at `path`, loading existing accounts if the file
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Io`] or [`CredentialError::Json`] if an
    /// existing file cannot be read or parsed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, CredentialError> {
        let path = path.into();
        let accounts = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            accounts: RwLock::new(accounts),
        })
    }

    /// Returns true if an account with this email exists.
    #[must_use]
    pub fn contains(&self, email: &str) -> bool {
        let accounts = self.accounts.read().expect("credential store lock poisoned");
        accounts.contains_key(email)
    }

    /// Registers a new account.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::AccountExists`] for a duplicate email, or
    /// hashing/persistence failures.
    pub fn register(&self, email: &str, password: &str) -> Result<(), CredentialError> {
        let mut accounts = self.accounts.write().expect("credential store lock poisoned");
        if accounts.contains_key(email) {
            return Err(CredentialError::AccountExists(email.to_string()));
        }
        let record = StoredCredential {
            password_hash: hash_password(password)?,
        };
        accounts.insert(email.to_string(), record);
        Self::persist(&self.path, &accounts)?;
        info!(account = %email, "account registered");
        Ok(())
    }

    /// Checks a password attempt against the stored hash.
    ///
    /// Returns `Ok(false)` on a wrong password.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::UnknownAccount`] if no such account
    /// exists, or [`CredentialError::Password`] on a malformed stored hash.
    pub fn verify(&self, email: &str, password: &str) -> Result<bool, CredentialError> {
        let accounts = self.accounts.read().expect("credential store lock poisoned");
        let record = accounts
            .get(email)
            .ok_or_else(|| CredentialError::UnknownAccount(email.to_string()))?;
        Ok(verify_password(password, &record.password_hash)?)
    }

    /// Replaces an account's password.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::UnknownAccount`] if no such account
    /// exists, or hashing/persistence failures.
    pub fn reset_password(&self, email: &str, new_password: &str) -> Result<(), CredentialError> {
        let mut accounts = self.accounts.write().expect("credential store lock poisoned");
        let record = accounts
            .get_mut(email)
            .ok_or_else(|| CredentialError::UnknownAccount(email.to_string()))?;
        record.password_hash = hash_password(new_password)?;
        Self::persist(&self.path, &accounts)?;
        info!(account = %email, "password reset");
        Ok(())
    }

    fn persist(
        path: &Path,
        accounts: &HashMap<String, StoredCredential>,
    ) -> Result<(), CredentialError> {
        fs::write(path, serde_json::to_string_pretty(accounts)?)?;
        Ok(())
    }
}
