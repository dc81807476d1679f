use std::path::PathBuf;

use anyhow::{Context, Result};

use profiles_auth::Argon2Hasher;

const DEFAULT_DB_PATH: &str = "profiles.db";

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "profiles_admin=info,profiles_auth=info,profiles_db=warn";

/// Argon2 cost override: memory (KiB), iterations, lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub lanes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    /// `None` keeps the argon2 crate defaults.
    pub hash_cost: Option<HashCost>,
}

impl Config {
    /// Read settings from the process environment (after `.env` is loaded).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("PROFILES_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.into());

        let hash_cost = match lookup("PROFILES_HASH_MEMORY_KIB") {
            Some(memory) => Some(HashCost {
                memory_kib: parse_u32("PROFILES_HASH_MEMORY_KIB", &memory)?,
                iterations: lookup("PROFILES_HASH_ITERATIONS")
                    .map(|v| parse_u32("PROFILES_HASH_ITERATIONS", &v))
                    .transpose()?
                    .unwrap_or(2),
                lanes: lookup("PROFILES_HASH_LANES")
                    .map(|v| parse_u32("PROFILES_HASH_LANES", &v))
                    .transpose()?
                    .unwrap_or(1),
            }),
            None => None,
        };

        Ok(Self {
            db_path: PathBuf::from(db_path),
            hash_cost,
        })
    }

    pub fn hasher(&self) -> Result<Argon2Hasher> {
        match self.hash_cost {
            Some(cost) => Ok(Argon2Hasher::with_params(
                cost.memory_kib,
                cost.iterations,
                cost.lanes,
            )?),
            None => Ok(Argon2Hasher::default()),
        }
    }
}

fn parse_u32(key: &str, raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .with_context(|| format!("{} must be a positive integer, got {:?}", key, raw))
}
