use tracing::debug;

use profiles_types::{Account, FeedEntry, FeedStore, NewFeedEntry};

use crate::error::ProfileError;

/// Status updates, each owned by one account.
pub struct FeedLog<S> {
    store: S,
}

impl<S: FeedStore> FeedLog<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Validate and persist a status update for `owner`. The entry's
    /// timestamp is assigned by the store.
    pub fn post(
        &self,
        owner: &Account,
        status_text: impl Into<String>,
    ) -> Result<FeedEntry, ProfileError> {
        let entry = NewFeedEntry::new(owner, status_text)?;
        let stored = self.store.insert_entry(&entry)?;

        debug!(entry_id = %stored.id, owner_id = %owner.id, "Posted status");
        Ok(stored)
    }

    pub fn entries_for(&self, owner: &Account) -> Result<Vec<FeedEntry>, ProfileError> {
        Ok(self.store.entries_for(owner.id)?)
    }
}
