use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ValidationError;

/// Upper bound, in characters, for email, name and status text columns.
pub const MAX_FIELD_LEN: usize = 255;

/// One-way credential material. Never holds a plaintext password.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Credential {
    /// No password can authenticate this account.
    #[default]
    Unusable,
    /// PHC-format hash string.
    Hashed(String),
}

impl Credential {
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Hashed(_))
    }

    pub fn encoded(&self) -> Option<&str> {
        match self {
            Self::Hashed(encoded) => Some(encoded),
            Self::Unusable => None,
        }
    }
}

/// A user identity. The email is the login identifier and is stored
/// normalized; the flags may be reassigned freely and persisted with `save`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub credential: Credential,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<DateTime<Utc>>,
}

impl Account {
    /// Active, unprivileged account with no usable password.
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            name: name.into(),
            credential: Credential::Unusable,
            is_active: true,
            is_staff: false,
            is_superuser: false,
            last_login: None,
        }
    }

    pub fn full_name(&self) -> &str {
        &self.name
    }

    /// Same as the full name; there is no separate short form.
    pub fn short_name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

/// A validated status update that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedEntry {
    pub owner_id: Uuid,
    pub status_text: String,
}

impl NewFeedEntry {
    pub fn new(owner: &Account, status_text: impl Into<String>) -> Result<Self, ValidationError> {
        let status_text = status_text.into();

        if status_text.trim().is_empty() {
            return Err(ValidationError::StatusRequired);
        }
        let len = status_text.chars().count();
        if len > MAX_FIELD_LEN {
            return Err(ValidationError::StatusTooLong {
                len,
                max: MAX_FIELD_LEN,
            });
        }

        Ok(Self {
            owner_id: owner.id,
            status_text,
        })
    }
}

/// A persisted status update. `created_on` is fixed at insert time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub status_text: String,
    pub created_on: DateTime<Utc>,
}

impl fmt::Display for FeedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_account_defaults() {
        let account = Account::new("ada@example.com", "Ada Lovelace");
        assert!(account.is_active);
        assert!(!account.is_staff);
        assert!(!account.is_superuser);
        assert_eq!(account.credential, Credential::Unusable);
        assert!(account.last_login.is_none());
    }

    #[test]
    fn names_and_display() {
        let account = Account::new("ada@example.com", "Ada Lovelace");
        assert_eq!(account.full_name(), "Ada Lovelace");
        assert_eq!(account.short_name(), "Ada Lovelace");
        assert_eq!(account.to_string(), "ada@example.com");
    }

    #[test]
    fn serialized_account_omits_credential() {
        let mut account = Account::new("ada@example.com", "Ada");
        account.credential = Credential::Hashed("$argon2id$v=19$secret".into());

        let json = serde_json::to_string(&account).unwrap();
        assert!(json.contains("ada@example.com"));
        assert!(!json.contains("argon2id"));

        let back: Account = serde_json::from_str(&json).unwrap();
        assert_eq!(back.credential, Credential::Unusable);
    }

    #[test]
    fn feed_entry_limits() {
        let owner = Account::new("ada@example.com", "Ada");

        let max = "x".repeat(MAX_FIELD_LEN);
        assert!(NewFeedEntry::new(&owner, max).is_ok());

        let over = "x".repeat(MAX_FIELD_LEN + 1);
        assert_eq!(
            NewFeedEntry::new(&owner, over),
            Err(ValidationError::StatusTooLong { len: 256, max: 255 })
        );

        assert_eq!(
            NewFeedEntry::new(&owner, "   "),
            Err(ValidationError::StatusRequired)
        );
    }

    #[test]
    fn feed_entry_length_counts_characters() {
        let owner = Account::new("ada@example.com", "Ada");
        // 255 multi-byte characters is still within bounds.
        let text = "é".repeat(MAX_FIELD_LEN);
        let entry = NewFeedEntry::new(&owner, text).unwrap();
        assert_eq!(entry.owner_id, owner.id);
    }
}
