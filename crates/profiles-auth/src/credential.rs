use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{SaltString, rand_core::OsRng},
};
use thiserror::Error;

use profiles_types::{Account, Credential};

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("invalid hasher parameters: {0}")]
    Params(String),
}

/// One-way password transform. `hash` output is opaque; `verify` is the only
/// way to compare a password against it.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, CredentialError>;

    fn verify(&self, password: &str, encoded: &str) -> bool;
}

/// Argon2id with a fresh random salt per hash, producing PHC strings.
pub struct Argon2Hasher {
    argon2: Argon2<'static>,
}

impl Argon2Hasher {
    /// Custom cost parameters: memory in KiB, iterations, lanes.
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, CredentialError> {
        let params = Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| CredentialError::Params(e.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, password: &str, encoded: &str) -> bool {
        // Cost parameters come from the PHC string, not from `self`
        match PasswordHash::new(encoded) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

/// Password handling for anything that carries a `Credential`.
pub trait CredentialedIdentity {
    fn credential(&self) -> &Credential;

    fn set_credential(&mut self, credential: Credential);

    /// Derive and store a credential. `None` leaves the identity unable to
    /// authenticate by password.
    fn set_password(
        &mut self,
        hasher: &dyn CredentialHasher,
        password: Option<&str>,
    ) -> Result<(), CredentialError> {
        let credential = match password {
            Some(password) => Credential::Hashed(hasher.hash(password)?),
            None => Credential::Unusable,
        };
        self.set_credential(credential);
        Ok(())
    }

    fn set_unusable_password(&mut self) {
        self.set_credential(Credential::Unusable);
    }

    fn has_usable_password(&self) -> bool {
        self.credential().is_usable()
    }

    fn check_password(&self, hasher: &dyn CredentialHasher, password: &str) -> bool {
        match self.credential().encoded() {
            Some(encoded) => hasher.verify(password, encoded),
            None => false,
        }
    }
}

impl CredentialedIdentity for Account {
    fn credential(&self) -> &Credential {
        &self.credential
    }

    fn set_credential(&mut self, credential: Credential) {
        self.credential = credential;
    }
}
