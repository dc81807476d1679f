use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use profiles_types::{Account, AccountStore, ValidationError};

use crate::credential::{Argon2Hasher, CredentialHasher, CredentialedIdentity};
use crate::email::normalize_email;
use crate::error::ProfileError;

/// Creates, finds and authenticates accounts. Owns no state beyond its store
/// and hasher.
pub struct AccountDirectory<S, H = Argon2Hasher> {
    store: S,
    hasher: H,
}

impl<S: AccountStore> AccountDirectory<S> {
    pub fn new(store: S) -> Self {
        Self::with_hasher(store, Argon2Hasher::default())
    }
}

impl<S: AccountStore, H: CredentialHasher> AccountDirectory<S, H> {
    pub fn with_hasher(store: S, hasher: H) -> Self {
        Self { store, hasher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Create an active, unprivileged account. Without a password the
    /// account cannot log in until one is set.
    pub fn create_user(
        &self,
        email: &str,
        name: &str,
        password: Option<&str>,
    ) -> Result<Account, ProfileError> {
        if email.is_empty() {
            return Err(ValidationError::EmailRequired.into());
        }

        let mut account = Account::new(normalize_email(email), name);
        account.set_password(&self.hasher, password)?;

        self.store.insert_account(&account)?;

        info!(account_id = %account.id, email = %account.email, "Created account");
        Ok(account)
    }

    /// Create an account with staff and superuser rights.
    pub fn create_superuser(
        &self,
        email: &str,
        name: &str,
        password: &str,
    ) -> Result<Account, ProfileError> {
        if password.is_empty() {
            warn!(email, "Creating superuser with an empty password");
        }

        let mut account = self.create_user(email, name, Some(password))?;

        account.is_superuser = true;
        account.is_staff = true;
        self.store.save_account(&account)?;

        info!(account_id = %account.id, "Granted superuser");
        Ok(account)
    }

    /// Look up by login email; the input is normalized first.
    pub fn get_by_email(&self, email: &str) -> Result<Option<Account>, ProfileError> {
        Ok(self.store.find_by_email(&normalize_email(email))?)
    }

    pub fn get_by_id(&self, id: Uuid) -> Result<Option<Account>, ProfileError> {
        Ok(self.store.find_by_id(id)?)
    }

    /// Returns the account when the password matches an active account,
    /// recording the login time. Unknown emails, inactive accounts and
    /// unusable credentials all yield `None`.
    pub fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, ProfileError> {
        let Some(mut account) = self.get_by_email(email)? else {
            // Hash anyway so a miss costs as much as a wrong password
            let _ = self.hasher.hash(password);
            debug!(email, "Authentication failed: unknown email");
            return Ok(None);
        };

        if !account.is_active {
            debug!(account_id = %account.id, "Authentication failed: inactive");
            return Ok(None);
        }

        if !account.check_password(&self.hasher, password) {
            debug!(account_id = %account.id, "Authentication failed: bad credential");
            return Ok(None);
        }

        account.last_login = Some(Utc::now());
        self.store.save_account(&account)?;

        Ok(Some(account))
    }

    /// Replace the credential of an existing account.
    pub fn set_password(
        &self,
        account: &mut Account,
        password: Option<&str>,
    ) -> Result<(), ProfileError> {
        account.set_password(&self.hasher, password)?;
        self.store.save_account(account)?;
        Ok(())
    }

    /// Persist direct field changes.
    pub fn save(&self, account: &Account) -> Result<(), ProfileError> {
        Ok(self.store.save_account(account)?)
    }

    /// Remove an account and, with it, every feed entry it owns.
    pub fn delete_account(&self, id: Uuid) -> Result<bool, ProfileError> {
        let removed = self.store.delete_account(id)?;
        if removed {
            info!(account_id = %id, "Deleted account");
        }
        Ok(removed)
    }
}
