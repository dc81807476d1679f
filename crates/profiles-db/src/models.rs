//! Database row types. These map directly to SQLite rows and are converted
//! to and from the `profiles-types` models at the store boundary.

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use profiles_types::{Account, Credential, FeedEntry};

pub struct AccountRow {
    pub id: String,
    pub email: String,
    pub name: String,
    pub credential: Option<String>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub last_login: Option<String>,
}

pub struct FeedEntryRow {
    pub id: String,
    pub owner_id: String,
    pub status_text: String,
    pub created_on: String,
}

/// Fixed-width RFC 3339 so text ordering in SQLite matches time ordering.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let ts = DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("Bad timestamp in database: {}", raw))?;
    Ok(ts.with_timezone(&Utc))
}

fn parse_id(raw: &str) -> Result<Uuid> {
    raw.parse()
        .with_context(|| format!("Bad id in database: {}", raw))
}

impl From<&Account> for AccountRow {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.clone(),
            name: account.name.clone(),
            credential: account.credential.encoded().map(str::to_string),
            is_active: account.is_active,
            is_staff: account.is_staff,
            is_superuser: account.is_superuser,
            last_login: account.last_login.as_ref().map(format_timestamp),
        }
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = anyhow::Error;

    fn try_from(row: AccountRow) -> Result<Self> {
        Ok(Self {
            id: parse_id(&row.id)?,
            email: row.email,
            name: row.name,
            credential: row.credential.map_or(Credential::Unusable, Credential::Hashed),
            is_active: row.is_active,
            is_staff: row.is_staff,
            is_superuser: row.is_superuser,
            last_login: row.last_login.as_deref().map(parse_timestamp).transpose()?,
        })
    }
}

impl TryFrom<FeedEntryRow> for FeedEntry {
    type Error = anyhow::Error;

    fn try_from(row: FeedEntryRow) -> Result<Self> {
        Ok(Self {
            id: parse_id(&row.id)?,
            owner_id: parse_id(&row.owner_id)?,
            status_text: row.status_text,
            created_on: parse_timestamp(&row.created_on)?,
        })
    }
}
