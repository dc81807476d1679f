use std::collections::HashMap;
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use profiles_types::{Account, AccountStore, FeedEntry, FeedStore, NewFeedEntry, StoreError};

use crate::credential::Argon2Hasher;

/// Minimum-cost Argon2id so unit tests stay quick.
pub fn fast_hasher() -> Argon2Hasher {
    Argon2Hasher::with_params(8, 1, 1).unwrap()
}

/// Map-backed store with the same uniqueness, foreign-key and cascade rules
/// as the SQLite schema.
#[derive(Default)]
pub struct MemoryStore {
    accounts: Mutex<HashMap<Uuid, Account>>,
    entries: Mutex<Vec<FeedEntry>>,
}

impl MemoryStore {
    pub fn account_count(&self) -> usize {
        self.accounts.lock().unwrap().len()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl AccountStore for MemoryStore {
    fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::DuplicateEmail(account.email.clone()));
        }
        accounts.insert(account.id, account.clone());
        Ok(())
    }

    fn save_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts
            .values()
            .any(|a| a.id != account.id && a.email == account.email)
        {
            return Err(StoreError::DuplicateEmail(account.email.clone()));
        }
        match accounts.get_mut(&account.id) {
            Some(existing) => {
                *existing = account.clone();
                Ok(())
            }
            None => Err(StoreError::UnknownAccount(account.id)),
        }
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.lock().unwrap();
        Ok(accounts.values().find(|a| a.email == email).cloned())
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        Ok(self.accounts.lock().unwrap().get(&id).cloned())
    }

    fn delete_account(&self, id: Uuid) -> Result<bool, StoreError> {
        let removed = self.accounts.lock().unwrap().remove(&id).is_some();
        if removed {
            self.entries.lock().unwrap().retain(|e| e.owner_id != id);
        }
        Ok(removed)
    }
}

impl FeedStore for MemoryStore {
    fn insert_entry(&self, entry: &NewFeedEntry) -> Result<FeedEntry, StoreError> {
        if !self.accounts.lock().unwrap().contains_key(&entry.owner_id) {
            return Err(StoreError::UnknownAccount(entry.owner_id));
        }
        let stored = FeedEntry {
            id: Uuid::new_v4(),
            owner_id: entry.owner_id,
            status_text: entry.status_text.clone(),
            created_on: Utc::now(),
        };
        self.entries.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    fn entries_for(&self, owner_id: Uuid) -> Result<Vec<FeedEntry>, StoreError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries
            .iter()
            .filter(|e| e.owner_id == owner_id)
            .cloned()
            .collect())
    }
}
