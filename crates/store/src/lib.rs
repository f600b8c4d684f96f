//! File-backed persistence for Kardex.
//!
//! The engine in `kardex-core` is pure; this crate owns every side effect:
//! - `items` - per-item CSV stock card tables under a data directory
//! - `credentials` - JSON account file with Argon2id password hashes
//! - `codec` - the flat CSV table format, also the export surface
//! - `config` - data locations, layered files + `KARDEX__` env overrides
//!
//! Mutating operations hold the store's write lock across apply-and-persist,
//! closing the load-modify-save race a multi-user caller would otherwise hit.

pub mod codec;
pub mod config;
pub mod credentials;
pub mod error;
pub mod items;

pub use codec::{read_rows, write_card};
pub use config::StoreConfig;
pub use credentials::{CredentialError, CredentialStore};
pub use error::StoreError;
pub use items::{ItemStore, OpeningBalance};
