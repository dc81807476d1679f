use thiserror::Error;
use uuid::Uuid;

/// Input rejected before anything reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("email required")]
    EmailRequired,

    #[error("status text required")]
    StatusRequired,

    #[error("status text is {len} characters, at most {max} allowed")]
    StatusTooLong { len: usize, max: usize },
}

/// Failures surfaced by a store backend. Constraint violations are reported
/// as-is; nothing here is retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("an account with email {0} already exists")]
    DuplicateEmail(String),

    #[error("account {0} does not exist")]
    UnknownAccount(Uuid),

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}
