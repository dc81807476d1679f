//! Profiles account directory and status feed.
//!
//! - `AccountDirectory`: user and superuser creation, lookup, authentication
//! - `FeedLog`: per-account status entries
//! - `Argon2Hasher`: one-way credential derivation behind `CredentialHasher`
//!
//! Both services are generic over the store traits in `profiles-types`, so
//! they run against SQLite in production and an in-memory map in tests.

pub mod credential;
pub mod directory;
pub mod email;
pub mod error;
pub mod feed;

#[cfg(test)]
mod test_support;

pub use credential::{Argon2Hasher, CredentialError, CredentialHasher, CredentialedIdentity};
pub use directory::AccountDirectory;
pub use email::normalize_email;
pub use error::ProfileError;
pub use feed::FeedLog;
