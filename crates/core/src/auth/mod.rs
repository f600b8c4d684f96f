//! Credential hashing primitives.
//!
//! Pure string-in/string-out password hashing used by the credential
//! store. Authentication *policy* (sessions, roles, lockout) is an
//! external concern and does not live in this crate.

mod password;

pub use password::{PasswordError, hash_password, verify_password};
