use anyhow::Result;
use chrono::Utc;
use rusqlite::{Connection, ErrorCode, Row, params};
use tracing::debug;
use uuid::Uuid;

use profiles_types::{Account, AccountStore, FeedEntry, FeedStore, NewFeedEntry, StoreError};

use crate::Database;
use crate::models::{AccountRow, FeedEntryRow, format_timestamp};

const ACCOUNT_COLUMNS: &str =
    "id, email, name, credential, is_active, is_staff, is_superuser, last_login";

impl Database {
    // -- Accounts --

    pub fn insert_account_row(&self, row: &AccountRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO accounts (id, email, name, credential, is_active, is_staff, is_superuser, last_login)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                params![
                    row.id,
                    row.email,
                    row.name,
                    row.credential,
                    row.is_active,
                    row.is_staff,
                    row.is_superuser,
                    row.last_login,
                ],
            )?;
            Ok(())
        })
    }

    /// Returns the number of rows touched (0 or 1).
    pub fn update_account_row(&self, row: &AccountRow) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE accounts
                 SET email = ?2, name = ?3, credential = ?4, is_active = ?5,
                     is_staff = ?6, is_superuser = ?7, last_login = ?8
                 WHERE id = ?1",
                params![
                    row.id,
                    row.email,
                    row.name,
                    row.credential,
                    row.is_active,
                    row.is_staff,
                    row.is_superuser,
                    row.last_login,
                ],
            )?;
            Ok(changed)
        })
    }

    pub fn get_account_by_email(&self, email: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| query_account(conn, "email", email))
    }

    pub fn get_account_by_id(&self, id: &str) -> Result<Option<AccountRow>> {
        self.with_conn(|conn| query_account(conn, "id", id))
    }

    /// Feed entries go with the account through ON DELETE CASCADE.
    pub fn delete_account_row(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM accounts WHERE id = ?1", [id])?;
            Ok(changed > 0)
        })
    }

    // -- Feed entries --

    pub fn insert_feed_entry_row(&self, row: &FeedEntryRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO feed_entries (id, owner_id, status_text, created_on) VALUES (?1, ?2, ?3, ?4)",
                params![row.id, row.owner_id, row.status_text, row.created_on],
            )?;
            Ok(())
        })
    }

    pub fn get_feed_entries(&self, owner_id: &str) -> Result<Vec<FeedEntryRow>> {
        self.with_conn(|conn| query_feed_entries(conn, owner_id))
    }
}

impl AccountStore for Database {
    fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        self.insert_account_row(&AccountRow::from(account))
            .map_err(|e| account_write_error(e, account))
    }

    fn save_account(&self, account: &Account) -> Result<(), StoreError> {
        let changed = self
            .update_account_row(&AccountRow::from(account))
            .map_err(|e| account_write_error(e, account))?;
        if changed == 0 {
            return Err(StoreError::UnknownAccount(account.id));
        }
        Ok(())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        debug!(email, "Looking up account by email");
        let row = self.get_account_by_email(email)?;
        Ok(row.map(Account::try_from).transpose()?)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<Account>, StoreError> {
        let row = self.get_account_by_id(&id.to_string())?;
        Ok(row.map(Account::try_from).transpose()?)
    }

    fn delete_account(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.delete_account_row(&id.to_string())?)
    }
}

impl FeedStore for Database {
    fn insert_entry(&self, entry: &NewFeedEntry) -> Result<FeedEntry, StoreError> {
        let stored = FeedEntry {
            id: Uuid::new_v4(),
            owner_id: entry.owner_id,
            status_text: entry.status_text.clone(),
            created_on: Utc::now(),
        };

        let row = FeedEntryRow {
            id: stored.id.to_string(),
            owner_id: stored.owner_id.to_string(),
            status_text: stored.status_text.clone(),
            created_on: format_timestamp(&stored.created_on),
        };

        self.insert_feed_entry_row(&row).map_err(|e| match constraint_code(&e) {
            Some(rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY) => {
                StoreError::UnknownAccount(entry.owner_id)
            }
            Some(_) => StoreError::Constraint(e.to_string()),
            None => StoreError::Backend(e),
        })?;

        Ok(stored)
    }

    fn entries_for(&self, owner_id: Uuid) -> Result<Vec<FeedEntry>, StoreError> {
        let rows = self.get_feed_entries(&owner_id.to_string())?;
        let entries = rows
            .into_iter()
            .map(FeedEntry::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(entries)
    }
}

fn account_write_error(err: anyhow::Error, account: &Account) -> StoreError {
    match constraint_code(&err) {
        Some(rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE) => {
            StoreError::DuplicateEmail(account.email.clone())
        }
        Some(_) => StoreError::Constraint(err.to_string()),
        None => StoreError::Backend(err),
    }
}

/// Extended SQLite result code when the error is a constraint violation.
fn constraint_code(err: &anyhow::Error) -> Option<i32> {
    match err.downcast_ref::<rusqlite::Error>() {
        Some(rusqlite::Error::SqliteFailure(failure, _))
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            Some(failure.extended_code)
        }
        _ => None,
    }
}

fn query_account(conn: &Connection, column: &str, value: &str) -> Result<Option<AccountRow>> {
    let sql = format!("SELECT {} FROM accounts WHERE {} = ?1", ACCOUNT_COLUMNS, column);
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt.query_row([value], account_row).optional()?;

    Ok(row)
}

fn account_row(row: &Row<'_>) -> rusqlite::Result<AccountRow> {
    Ok(AccountRow {
        id: row.get(0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        credential: row.get(3)?,
        is_active: row.get(4)?,
        is_staff: row.get(5)?,
        is_superuser: row.get(6)?,
        last_login: row.get(7)?,
    })
}

fn query_feed_entries(conn: &Connection, owner_id: &str) -> Result<Vec<FeedEntryRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, owner_id, status_text, created_on
         FROM feed_entries
         WHERE owner_id = ?1
         ORDER BY created_on ASC, rowid ASC",
    )?;

    let rows = stmt
        .query_map([owner_id], |row| {
            Ok(FeedEntryRow {
                id: row.get(0)?,
                owner_id: row.get(1)?,
                status_text: row.get(2)?,
                created_on: row.get(3)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profiles_types::Credential;

    fn account(email: &str) -> Account {
        let mut account = Account::new(email, "Someone");
        account.credential = Credential::Hashed("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into());
        account
    }

    #[test]
    fn insert_and_find() {
        let db = Database::open_in_memory().unwrap();
        let stored = account("ada@example.com");
        db.insert_account(&stored).unwrap();

        let by_email = db.find_by_email("ada@example.com").unwrap().unwrap();
        assert_eq!(by_email, stored);

        let by_id = db.find_by_id(stored.id).unwrap().unwrap();
        assert_eq!(by_id.email, "ada@example.com");

        assert!(db.find_by_email("ADA@example.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected() {
        let db = Database::open_in_memory().unwrap();
        db.insert_account(&account("ada@example.com")).unwrap();

        let err = db.insert_account(&account("ada@example.com")).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail(ref e) if e == "ada@example.com"));
    }

    #[test]
    fn oversized_name_violates_constraint() {
        let db = Database::open_in_memory().unwrap();
        let mut long = account("ada@example.com");
        long.name = "n".repeat(256);

        let err = db.insert_account(&long).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[test]
    fn empty_name_violates_constraint() {
        let db = Database::open_in_memory().unwrap();
        let mut nameless = account("ada@example.com");
        nameless.name = String::new();

        let err = db.insert_account(&nameless).unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
        assert!(db.find_by_email("ada@example.com").unwrap().is_none());
    }

    #[test]
    fn save_persists_flag_changes() {
        let db = Database::open_in_memory().unwrap();
        let mut stored = account("ada@example.com");
        db.insert_account(&stored).unwrap();

        stored.is_active = false;
        stored.is_superuser = true;
        stored.last_login = Some(Utc::now());
        db.save_account(&stored).unwrap();

        let reloaded = db.find_by_id(stored.id).unwrap().unwrap();
        assert!(!reloaded.is_active);
        assert!(reloaded.is_superuser);
        assert!(!reloaded.is_staff);
        assert_eq!(reloaded.last_login, stored.last_login);
    }

    #[test]
    fn save_unknown_account_fails() {
        let db = Database::open_in_memory().unwrap();
        let err = db.save_account(&account("ghost@example.com")).unwrap_err();
        assert!(matches!(err, StoreError::UnknownAccount(_)));
    }

    #[test]
    fn entries_are_listed_oldest_first() {
        let db = Database::open_in_memory().unwrap();
        let owner = account("ada@example.com");
        db.insert_account(&owner).unwrap();

        for text in ["first", "second", "third"] {
            db.insert_entry(&NewFeedEntry::new(&owner, text).unwrap()).unwrap();
        }

        let texts: Vec<String> = db
            .entries_for(owner.id)
            .unwrap()
            .into_iter()
            .map(|e| e.status_text)
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[test]
    fn entry_for_missing_owner_fails() {
        let db = Database::open_in_memory().unwrap();
        let ghost = account("ghost@example.com");

        let err = db
            .insert_entry(&NewFeedEntry::new(&ghost, "boo").unwrap())
            .unwrap_err();
        assert!(matches!(err, StoreError::UnknownAccount(id) if id == ghost.id));
    }

    #[test]
    fn deleting_account_cascades_to_its_entries_only() {
        let db = Database::open_in_memory().unwrap();
        let ada = account("ada@example.com");
        let bob = account("bob@example.com");
        db.insert_account(&ada).unwrap();
        db.insert_account(&bob).unwrap();

        db.insert_entry(&NewFeedEntry::new(&ada, "ada 1").unwrap()).unwrap();
        db.insert_entry(&NewFeedEntry::new(&ada, "ada 2").unwrap()).unwrap();
        db.insert_entry(&NewFeedEntry::new(&bob, "bob 1").unwrap()).unwrap();

        assert!(db.delete_account(ada.id).unwrap());
        assert!(!db.delete_account(ada.id).unwrap());

        assert!(db.entries_for(ada.id).unwrap().is_empty());
        let remaining: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM feed_entries", [], |r| r.get(0))?)
            })
            .unwrap();
        assert_eq!(remaining, 1);
        assert_eq!(db.entries_for(bob.id).unwrap()[0].status_text, "bob 1");
    }
}
