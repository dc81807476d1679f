use std::sync::Arc;

use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{Account, FeedEntry, NewFeedEntry};

/// Persistence for accounts. Emails handed to `find_by_email` are expected to
/// be normalized already; lookups are exact.
pub trait AccountStore: Send + Sync {
    fn insert_account(&self, account: &Account) -> Result<(), StoreError>;

    /// Persist every field of an existing account.
    fn save_account(&self, account: &Account) -> Result<(), StoreError>;

    fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError>;

    /// Remove an account together with every feed entry it owns.
    /// Returns false when no such account existed.
    fn delete_account(&self, id: Uuid) -> Result<bool, StoreError>;
}

/// Persistence for feed entries.
pub trait FeedStore: Send + Sync {
    /// Insert an entry, stamping `created_on`. Fails with
    /// `StoreError::UnknownAccount` when the owner is gone.
    fn insert_entry(&self, entry: &NewFeedEntry) -> Result<FeedEntry, StoreError>;

    /// Entries of one owner, oldest first.
    fn entries_for(&self, owner_id: Uuid) -> Result<Vec<FeedEntry>, StoreError>;
}

impl<T: AccountStore + ?Sized> AccountStore for Arc<T> {
    fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        (**self).insert_account(account)
    }

    fn save_account(&self, account: &Account) -> Result<(), StoreError> {
        (**self).save_account(account)
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        (**self).find_by_email(email)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        (**self).find_by_id(id)
    }

    fn delete_account(&self, id: Uuid) -> Result<bool, StoreError> {
        (**self).delete_account(id)
    }
}

impl<T: FeedStore + ?Sized> FeedStore for Arc<T> {
    fn insert_entry(&self, entry: &NewFeedEntry) -> Result<FeedEntry, StoreError> {
        (**self).insert_entry(entry)
    }

    fn entries_for(&self, owner_id: Uuid) -> Result<Vec<FeedEntry>, StoreError> {
        (**self).entries_for(owner_id)
    }
}
